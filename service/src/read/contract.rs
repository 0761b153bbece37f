//! [`Contract`]-related read definitions.

use derive_more::Deref;

#[cfg(doc)]
use crate::domain::Contract;

/// Indicator whether any [`Contract`] references the selected entity.
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct Exists(pub bool);

impl PartialEq<bool> for Exists {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}
