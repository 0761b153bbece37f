//! Markers of abstract operations.

use std::marker::PhantomData;

use crate::Handler;

/// Operation inserting a value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation updating a value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Operation deleting a value.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Operation selecting a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation locking a value.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Operation starting a long-running value.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Operation performing a single run of a value.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Operation dispatching a value to an external recipient.
#[derive(Clone, Copy, Debug)]
pub struct Dispatch<T>(pub T);

/// Operation starting a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// [`Transact`]ed value.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Operation committing a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of `W` by `B`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the value being selected.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] out of the given value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Unwraps this [`By`] into the value it selects by.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
