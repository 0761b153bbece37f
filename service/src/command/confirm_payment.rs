//! [`Command`] for confirming a rent [`Payment`] as received.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::payment::Status;
use crate::{
    domain::{payment, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for confirming a rent [`Payment`] as received.
///
/// Only [`Payment`]s in [`Status::Pending`] are confirmable: ones already
/// swept into [`Status::Overdue`] or confirmed before are rejected.
#[derive(Clone, Copy, Debug)]
pub struct ConfirmPayment {
    /// ID of the [`Payment`] to confirm.
    pub id: payment::Id,

    /// [`Date`] the [`Payment`] was received on.
    pub paid_on: Date,
}

impl<Db, M> Command<ConfirmPayment> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Payment, payment::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Payment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ConfirmPayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ConfirmPayment { id, paid_on } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Payment`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut payment = tx
            .execute(Select(By::<Option<Payment>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PaymentNotExists(id))
            .map_err(tracerr::wrap!())?;
        if payment.status != payment::Status::Pending {
            return Err(tracerr::new!(E::PaymentNotPending(
                id,
                payment.status,
            )));
        }

        payment.status = payment::Status::Paid;
        payment.paid_on = Some(paid_on);
        tx.execute(Update(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(payment)
    }
}

/// Error of [`ConfirmPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Payment`] does not exist.
    #[display("`Payment(id: {_0})` does not exist")]
    #[from(ignore)]
    PaymentNotExists(#[error(not(source))] payment::Id),

    /// [`Payment`] is not awaiting confirmation.
    #[display("`Payment(id: {_0})` is in `{_1}` status, not `PENDING`")]
    #[from(ignore)]
    PaymentNotPending(
        #[error(not(source))] payment::Id,
        #[error(not(source))] payment::Status,
    ),
}
