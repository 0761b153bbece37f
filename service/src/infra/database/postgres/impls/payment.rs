//! [`Payment`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Date,
};
use tracerr::Traced;

use crate::{
    domain::{client, contract, payment, Payment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::{
        self,
        payment::{Overdue, Upcoming},
    },
};

impl<C, IDs> Database<Select<By<HashMap<payment::Id, Payment>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[payment::Id]>,
{
    type Ok = HashMap<payment::Id, Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<payment::Id, Payment>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[payment::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, contract_id, \
                   amount, due_on, \
                   status, paid_on \
            FROM payments \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Payment {
                        id,
                        contract_id: row.get("contract_id"),
                        amount: row.get("amount"),
                        due_on: row.get("due_on"),
                        status: row.get("status"),
                        paid_on: row.get("paid_on"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Payment>, payment::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<payment::Id, Payment>, [payment::Id; 1]>>,
        Ok = HashMap<payment::Id, Payment>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Vec<Payment>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payments): Insert<Vec<Payment>>,
    ) -> Result<Self::Ok, Self::Err> {
        if payments.is_empty() {
            return Ok(());
        }

        let mut ids = Vec::with_capacity(payments.len());
        let mut contract_ids = Vec::with_capacity(payments.len());
        let mut amounts = Vec::with_capacity(payments.len());
        let mut due_dates = Vec::with_capacity(payments.len());
        let mut statuses = Vec::with_capacity(payments.len());
        let mut paid_dates = Vec::with_capacity(payments.len());
        for payment in payments {
            let Payment {
                id,
                contract_id,
                amount,
                due_on,
                status,
                paid_on,
            } = payment;
            ids.push(id);
            contract_ids.push(contract_id);
            amounts.push(amount);
            due_dates.push(due_on);
            statuses.push(status);
            paid_dates.push(paid_on);
        }

        const SQL: &str = "\
            INSERT INTO payments (\
                id, contract_id, \
                amount, due_on, \
                status, paid_on\
            ) \
            SELECT * \
            FROM unnest(\
                $1::UUID[], $2::UUID[], \
                $3::NUMERIC[], $4::DATE[], \
                $5::INT2[], $6::DATE[]\
            )";
        self.exec(
            SQL,
            &[
                &ids,
                &contract_ids,
                &amounts,
                &due_dates,
                &statuses,
                &paid_dates,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(payment): Update<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            contract_id,
            amount,
            due_on,
            status,
            paid_on,
        } = payment;

        const SQL: &str = "\
            INSERT INTO payments (\
                id, contract_id, \
                amount, due_on, \
                status, paid_on\
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::NUMERIC, $4::DATE, \
                $5::INT2, $6::DATE\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET contract_id = EXCLUDED.contract_id, \
                amount = EXCLUDED.amount, \
                due_on = EXCLUDED.due_on, \
                status = EXCLUDED.status, \
                paid_on = EXCLUDED.paid_on";
        self.exec(SQL, &[&id, &contract_id, &amount, &due_on, &status, &paid_on])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Payment, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Payment, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO payments_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Payment>, contract::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<payment::Id, Payment>, Vec<payment::Id>>>,
        Ok = HashMap<payment::Id, Payment>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let contract_id: contract::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM payments \
            WHERE contract_id = $1::UUID \
            ORDER BY due_on, id";
        let ids = self
            .query(SQL, &[&contract_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<payment::Id>>();

        let mut payments = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids
            .into_iter()
            .filter_map(|id| payments.remove(&id))
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Overdue<Payment>>, client::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<payment::Id, Payment>, Vec<payment::Id>>>,
        Ok = HashMap<payment::Id, Payment>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Overdue<Payment>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Overdue<Payment>>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let tenant_id: client::Id = by.into_inner();

        const SQL: &str = "\
            SELECT payments.id \
            FROM payments \
            JOIN contracts ON contracts.id = payments.contract_id \
            WHERE contracts.tenant_id = $1::UUID \
              AND payments.status <> $2::INT2 \
              AND payments.due_on < CURRENT_DATE \
            ORDER BY payments.due_on, payments.id";
        let ids = self
            .query(SQL, &[&tenant_id, &payment::Status::Paid])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<payment::Id>>();

        let mut payments = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids
            .into_iter()
            .filter_map(|id| payments.remove(&id))
            .map(Overdue)
            .collect())
    }
}

impl<C> Database<Select<By<Option<Upcoming<Payment>>, client::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Payment>, payment::Id>>,
        Ok = Option<Payment>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Upcoming<Payment>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Upcoming<Payment>>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let tenant_id: client::Id = by.into_inner();

        const SQL: &str = "\
            SELECT payments.id \
            FROM payments \
            JOIN contracts ON contracts.id = payments.contract_id \
            WHERE contracts.tenant_id = $1::UUID \
              AND payments.status = $2::INT2 \
              AND payments.due_on >= CURRENT_DATE \
            ORDER BY payments.due_on, payments.id \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&tenant_id, &payment::Status::Pending])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let payment_id = row.get("id");
        Ok(self
            .execute(Select(By::new(payment_id)))
            .await
            .map_err(tracerr::wrap!())?
            .map(Upcoming))
    }
}

impl<C> Database<Update<By<Payment, Date>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Payment, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let today: Date = by.into_inner();

        const SQL: &str = "\
            UPDATE payments \
            SET status = $1::INT2 \
            WHERE status = $2::INT2 \
              AND due_on < $3::DATE";
        self.exec(
            SQL,
            &[
                &payment::Status::Overdue,
                &payment::Status::Pending,
                &today,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<read::payment::Reminder>, Date>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::payment::Reminder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::payment::Reminder>, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let due_on: Date = by.into_inner();

        const SQL: &str = "\
            SELECT payments.id, payments.contract_id, \
                   payments.amount, payments.due_on, \
                   payments.status, payments.paid_on, \
                   clients.name AS tenant, \
                   clients.email AS email, \
                   properties.title AS property \
            FROM payments \
            JOIN contracts ON contracts.id = payments.contract_id \
            JOIN clients ON clients.id = contracts.tenant_id \
            JOIN properties ON properties.id = contracts.property_id \
            WHERE payments.status = $1::INT2 \
              AND payments.due_on = $2::DATE \
            ORDER BY payments.id";
        Ok(self
            .query(SQL, &[&payment::Status::Pending, &due_on])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| read::payment::Reminder {
                payment: Payment {
                    id: row.get("id"),
                    contract_id: row.get("contract_id"),
                    amount: row.get("amount"),
                    due_on: row.get("due_on"),
                    status: row.get("status"),
                    paid_on: row.get("paid_on"),
                },
                tenant: row.get("tenant"),
                email: row.get("email"),
                property: row.get("property"),
            })
            .collect())
    }
}
