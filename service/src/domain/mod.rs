//! Domain definitions.

pub mod client;
pub mod contract;
pub mod payment;
pub mod property;
pub mod user;

pub use self::{
    client::Client, contract::Contract, payment::Payment, property::Property,
    user::User,
};
