//! [`Command`] for signing a new rent [`Contract`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Date, DateTime, Money, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        client, contract, payment::schedule, property, Client, Contract,
        Payment, Property,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for signing a new rent [`Contract`].
///
/// The full series of monthly rent [`Payment`]s is scheduled atomically with
/// the [`Contract`] itself.
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// ID of the [`Property`] to rent out.
    pub property_id: property::Id,

    /// ID of the tenant [`Client`].
    pub tenant_id: client::Id,

    /// First day the new [`Contract`] is in force.
    pub starts_on: Date,

    /// Last day the new [`Contract`] is in force.
    pub ends_on: Date,

    /// Monthly rent to charge.
    pub rent: Money,

    /// Day of month every rent [`Payment`] is due on.
    pub due_day: contract::DueDay,

    /// Number of months between two consecutive rent escalations.
    pub escalation_period: contract::EscalationPeriod,

    /// [`Percent`] the rent grows by on every escalation boundary.
    pub escalation_percent: Percent,
}

impl<Db, M> Command<CreateContract> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Insert<Vec<Payment>>, Err = Traced<database::Error>>
        + Database<
            Lock<By<Property, property::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            property_id,
            tenant_id,
            starts_on,
            ends_on,
            rent,
            due_day,
            escalation_period,
            escalation_percent,
        } = cmd;

        drop(
            self.database()
                .execute(Select(By::<Option<Property>, _>::new(property_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::PropertyNotExists(property_id))
                .map_err(tracerr::wrap!())?,
        );
        drop(
            self.database()
                .execute(Select(By::<Option<Client>, _>::new(tenant_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::ClientNotExists(tenant_id))
                .map_err(tracerr::wrap!())?,
        );

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Property`.
        tx.execute(Lock(By::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let property = tx
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;
        if property.operation != property::Operation::Rent
            || property.status != property::Status::Available
        {
            return Err(tracerr::new!(E::PropertyNotRentable(property_id)));
        }

        let contract = Contract {
            id: contract::Id::new(),
            property_id: property.id,
            tenant_id,
            starts_on,
            ends_on,
            rent,
            due_day,
            escalation_period,
            escalation_percent,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let payments = schedule::for_contract(&contract);
        if payments.is_empty() {
            log::warn!(
                "`Contract(id: {})` produced no payment schedule: the end \
                 date `{}` precedes the first due date",
                contract.id,
                contract.ends_on.to_iso8601(),
            );
        } else {
            tx.execute(Insert(payments))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Tenant [`Client`] does not exist.
    #[display("`Client(id: {_0})` does not exist")]
    #[from(ignore)]
    ClientNotExists(#[error(not(source))] client::Id),

    /// [`Property`] does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`Property`] is not available for rent.
    #[display("`Property(id: {_0})` is not available for rent")]
    #[from(ignore)]
    PropertyNotRentable(#[error(not(source))] property::Id),
}
