//! [`Command`] for deleting a [`Client`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Contract;
use crate::{
    domain::{client, Client},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting a [`Client`].
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteClient {
    /// ID of the [`Client`] to be deleted.
    pub id: client::Id,
}

impl<Db, M> Command<DeleteClient> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::contract::Exists, client::Id>>,
            Ok = read::contract::Exists,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Client, client::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteClient) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteClient { id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        drop(
            tx.execute(Select(By::<Option<Client>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or_else(|| E::ClientNotExists(id))
                .map_err(tracerr::wrap!())?,
        );
        let contracted = tx
            .execute(Select(By::<read::contract::Exists, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *contracted {
            return Err(tracerr::new!(E::ReferencedByContracts(id)));
        }
        tx.execute(Delete(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(())
    }
}

/// Error of [`DeleteClient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Client`] does not exist.
    #[display("`Client(id: {_0})` does not exist")]
    #[from(ignore)]
    ClientNotExists(#[error(not(source))] client::Id),

    /// [`Client`] is referenced by a [`Contract`].
    #[display("`Client(id: {_0})` is referenced by a `Contract`")]
    #[from(ignore)]
    ReferencedByContracts(#[error(not(source))] client::Id),
}
