//! Background [`Task`]s definitions.

mod background;
pub mod reconcile_payments;

pub use common::Handler as Task;

pub use self::{
    background::Background, reconcile_payments::ReconcilePayments,
};
