//! [`Payment`]-related read definitions.

use crate::domain::{client, property, Payment};

/// Wrapper around [`Payment`] indicating that it's unpaid and past due.
#[derive(Clone, Copy, Debug)]
pub struct Overdue<T>(pub T);

/// Wrapper around [`Payment`] indicating that it's the next [`Pending`] one to
/// come due.
///
/// [`Pending`]: crate::domain::payment::Status::Pending
#[derive(Clone, Copy, Debug)]
pub struct Upcoming<T>(pub T);

/// [`Payment`] expanded with the details needed to remind a tenant about it.
#[derive(Clone, Debug)]
pub struct Reminder {
    /// [`Payment`] to remind about.
    pub payment: Payment,

    /// [`client::Name`] of the tenant owing the [`Payment`].
    pub tenant: client::Name,

    /// [`client::Email`] to deliver the reminder to, if the tenant has one.
    pub email: Option<client::Email>,

    /// [`property::Title`] of the rented [`Property`].
    ///
    /// [`Property`]: crate::domain::Property
    pub property: property::Title,
}
