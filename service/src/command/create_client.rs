//! [`Command`] for registering a new [`Client`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::client::{Email, Name, Phone};
use crate::{
    domain::{client, user, Client, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`Client`].
#[derive(Clone, Debug)]
pub struct CreateClient {
    /// Full [`Name`] of a new [`Client`].
    pub name: client::Name,

    /// [`Email`] address of a new [`Client`].
    pub email: Option<client::Email>,

    /// [`Phone`] number of a new [`Client`].
    pub phone: Option<client::Phone>,

    /// ID of the [`User`] a new [`Client`] should be able to sign in as.
    pub user_id: Option<user::Id>,
}

impl<Db, M> Command<CreateClient> for Service<Db, M>
where
    Db: for<'e> Database<
            Select<By<Option<Client>, &'e client::Email>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Client>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Client;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateClient) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateClient {
            name,
            email,
            phone,
            user_id,
        } = cmd;

        if let Some(id) = user_id {
            drop(
                self.database()
                    .execute(Select(By::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or_else(|| E::UserNotExists(id))
                    .map_err(tracerr::wrap!())?,
            );
        }

        if let Some(email) = &email {
            let existing = self
                .database()
                .execute(Select(By::new(email)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if existing.is_some() {
                return Err(tracerr::new!(E::EmailOccupied(email.clone())));
            }
        }

        let client = Client {
            id: client::Id::new(),
            user_id,
            name,
            email,
            phone,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(client.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(client)
    }
}

/// Error of [`CreateClient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`client::Email`] address is occupied by another [`Client`] already.
    #[display("`{_0}` email address is occupied")]
    #[from(ignore)]
    EmailOccupied(#[error(not(source))] client::Email),

    /// [`User`] to link a new [`Client`] with does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}
