//! [`Client`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{client, user, Client},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C, IDs> Database<Select<By<HashMap<client::Id, Client>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[client::Id]>,
{
    type Ok = HashMap<client::Id, Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<client::Id, Client>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[client::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, user_id, \
                   name, email, phone, \
                   created_at \
            FROM clients \
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
                    Client {
                        id,
                        user_id: row.get("user_id"),
                        name: row.get("name"),
                        email: row.get("email"),
                        phone: row.get("phone"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Client>, client::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<client::Id, Client>, [client::Id; 1]>>,
        Ok = HashMap<client::Id, Client>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Option<Client>, user::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Client>, client::Id>>,
        Ok = Option<Client>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let user_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM clients \
            WHERE user_id = $1::UUID \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let client_id = row.get("id");
        self.execute(Select(By::new(client_id)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<'e, C> Database<Select<By<Option<Client>, &'e client::Email>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Client>, client::Id>>,
        Ok = Option<Client>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, &'e client::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM clients \
            WHERE email = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&email])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let client_id = row.get("id");
        self.execute(Select(By::new(client_id)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Client>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Client>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(client): Insert<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(client)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Client>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(client): Update<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        let Client {
            id,
            user_id,
            name,
            email,
            phone,
            created_at,
        } = client;

        const SQL: &str = "\
            INSERT INTO clients (\
                id, user_id, \
                name, email, phone, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET user_id = EXCLUDED.user_id, \
                name = EXCLUDED.name, \
                email = EXCLUDED.email, \
                phone = EXCLUDED.phone, \
                created_at = EXCLUDED.created_at";
        self.exec(SQL, &[&id, &user_id, &name, &email, &phone, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Client, client::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Client, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: client::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM clients \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
