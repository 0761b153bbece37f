//! [`Command`] registering a new [`User`] account.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Login, Name, Password};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] registering a new [`User`] account.
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Name`] shown for the new [`User`].
    pub name: user::Name,

    /// [`Login`] the new [`User`] signs in with.
    pub login: user::Login,

    /// [`Password`] the new [`User`] signs in with.
    pub password: SecretBox<user::Password>,
}

impl<Db, M> Command<CreateUser> for Service<Db, M>
where
    Db: for<'l> Database<
            Select<By<Option<User>, &'l user::Login>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            name,
            login,
            password,
        } = cmd;

        let occupied = self
            .database()
            .execute(Select(By::new(&login)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some();
        if occupied {
            return Err(tracerr::new!(E::LoginOccupied(login)));
        }

        let user = User {
            id: user::Id::new(),
            name,
            login,
            password_hash: user::PasswordHash::new(password.expose_secret()),
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`user::Login`] is taken by another [`User`] already.
    #[display("`{_0}` login is occupied")]
    LoginOccupied(#[error(not(source))] user::Login),
}
