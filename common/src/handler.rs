//! [`Handler`] abstractions.

use std::future::Future;

/// Abstract executor of a single operation.
pub trait Handler<Args = ()> {
    /// Value produced by a successful execution.
    type Ok;

    /// Error produced by a failed execution.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
