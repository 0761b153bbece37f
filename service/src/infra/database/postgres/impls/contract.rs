//! [`Contract`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{client, contract, property, Contract},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<contract::Id, Contract>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[contract::Id]>,
{
    type Ok = HashMap<contract::Id, Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<contract::Id, Contract>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[contract::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, property_id, tenant_id, \
                   starts_on, ends_on, \
                   rent, due_day, \
                   escalation_period, escalation_percent, \
                   created_at \
            FROM contracts \
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
                    Contract {
                        id,
                        property_id: row.get("property_id"),
                        tenant_id: row.get("tenant_id"),
                        starts_on: row.get("starts_on"),
                        ends_on: row.get("ends_on"),
                        rent: row.get("rent"),
                        due_day: row.get("due_day"),
                        escalation_period: row.get("escalation_period"),
                        escalation_percent: row.get("escalation_percent"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Contract>, contract::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<contract::Id, Contract>, [contract::Id; 1]>>,
        Ok = HashMap<contract::Id, Contract>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Contract>, client::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<contract::Id, Contract>, Vec<contract::Id>>>,
        Ok = HashMap<contract::Id, Contract>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let tenant_id: client::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM contracts \
            WHERE tenant_id = $1::UUID \
            ORDER BY starts_on DESC, id";
        let ids = self
            .query(SQL, &[&tenant_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<contract::Id>>();

        let mut contracts = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids
            .into_iter()
            .filter_map(|id| contracts.remove(&id))
            .collect())
    }
}

impl<C> Database<Insert<Contract>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(contract))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Contract>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let Contract {
            id,
            property_id,
            tenant_id,
            starts_on,
            ends_on,
            rent,
            due_day,
            escalation_period,
            escalation_percent,
            created_at,
        } = contract;

        const SQL: &str = "\
            INSERT INTO contracts (\
                id, property_id, tenant_id, \
                starts_on, ends_on, \
                rent, due_day, \
                escalation_period, escalation_percent, \
                created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::DATE, $5::DATE, \
                $6::NUMERIC, $7::INT2, \
                $8::INT2, $9::NUMERIC, \
                $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET property_id = EXCLUDED.property_id, \
                tenant_id = EXCLUDED.tenant_id, \
                starts_on = EXCLUDED.starts_on, \
                ends_on = EXCLUDED.ends_on, \
                rent = EXCLUDED.rent, \
                due_day = EXCLUDED.due_day, \
                escalation_period = EXCLUDED.escalation_period, \
                escalation_percent = EXCLUDED.escalation_percent, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &tenant_id,
                &starts_on,
                &ends_on,
                &rent,
                &due_day,
                &escalation_period,
                &escalation_percent,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<read::contract::Exists, property::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::Exists;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::contract::Exists, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM contracts \
            WHERE property_id = $1::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|r| read::contract::Exists(r.is_some()))
    }
}

impl<C> Database<Select<By<read::contract::Exists, client::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::contract::Exists;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::contract::Exists, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let tenant_id: client::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM contracts \
            WHERE tenant_id = $1::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&tenant_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|r| read::contract::Exists(r.is_some()))
    }
}
