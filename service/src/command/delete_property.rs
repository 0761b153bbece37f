//! [`Command`] for deleting a [`Property`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Contract;
use crate::{
    domain::{property, Property},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting a [`Property`] along with its photos.
///
/// Deletion is refused while any [`Contract`] still references the
/// [`Property`].
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteProperty {
    /// ID of the [`Property`] to delete.
    pub id: property::Id,
}

impl<Db, M> Command<DeleteProperty> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::contract::Exists, property::Id>>,
            Ok = read::contract::Exists,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Property, property::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Property, property::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteProperty { id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Property`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Select(By::<Option<Property>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let contracted = tx
            .execute(Select(By::<read::contract::Exists, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *contracted {
            return Err(tracerr::new!(E::ReferencedByContracts(id)));
        }

        tx.execute(Delete(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(())
    }
}

/// Error of [`DeleteProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Property`] doesn't exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`Property`] is still referenced by a [`Contract`].
    #[display("`Property(id: {_0})` is referenced by a `Contract`")]
    #[from(ignore)]
    ReferencedByContracts(#[error(not(source))] property::Id),
}
