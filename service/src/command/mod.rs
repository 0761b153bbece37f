//! [`Command`] definition.

pub mod authorize_user_session;
pub mod confirm_payment;
pub mod create_client;
pub mod create_contract;
pub mod create_property;
pub mod create_user;
pub mod create_user_session;
pub mod delete_client;
pub mod delete_property;
pub mod update_property;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    confirm_payment::ConfirmPayment, create_client::CreateClient,
    create_contract::CreateContract, create_property::CreateProperty,
    create_user::CreateUser, create_user_session::CreateUserSession,
    delete_client::DeleteClient, delete_property::DeleteProperty,
    update_property::UpdateProperty,
};
