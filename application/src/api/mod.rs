//! GraphQL API definitions.

pub mod client;
pub mod contract;
mod mutation;
pub mod payment;
pub mod property;
mod query;
pub mod scalar;
pub mod user;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{
    client::Client, contract::Contract, mutation::Mutation, payment::Payment,
    property::Property, query::Query, user::User,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
