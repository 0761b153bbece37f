//! [`Property`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{property, Property},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<property::Id, Property>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<property::Id, Property>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[property::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, title, description, \
                   operation, status, price, \
                   address, city, \
                   rooms, bathrooms, area, \
                   main_photo, \
                   created_at \
            FROM properties \
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
                    Property {
                        id,
                        title: row.get("title"),
                        description: row.get("description"),
                        operation: row.get("operation"),
                        status: row.get("status"),
                        price: row.get("price"),
                        address: row.get("address"),
                        city: row.get("city"),
                        rooms: u16::try_from(row.get::<_, i32>("rooms"))
                            .expect("`rooms` overflow"),
                        bathrooms: u16::try_from(
                            row.get::<_, i32>("bathrooms"),
                        )
                        .expect("`bathrooms` overflow"),
                        area: u16::try_from(row.get::<_, i32>("area"))
                            .expect("`area` overflow"),
                        main_photo: row.get("main_photo"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<property::Id, Property>, [property::Id; 1]>>,
        Ok = HashMap<property::Id, Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Property>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(property))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Property>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let Property {
            id,
            title,
            description,
            operation,
            status,
            price,
            address,
            city,
            rooms,
            bathrooms,
            area,
            main_photo,
            created_at,
        } = property;

        let rooms = i32::from(rooms);
        let bathrooms = i32::from(bathrooms);
        let area = i32::from(area);

        const SQL: &str = "\
            INSERT INTO properties (\
                id, title, description, \
                operation, status, price, \
                address, city, \
                rooms, bathrooms, area, \
                main_photo, \
                created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::INT2, $5::INT2, $6::NUMERIC, \
                $7::VARCHAR, $8::VARCHAR, \
                $9::INT4, $10::INT4, $11::INT4, \
                $12::VARCHAR, \
                $13::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                operation = EXCLUDED.operation, \
                status = EXCLUDED.status, \
                price = EXCLUDED.price, \
                address = EXCLUDED.address, \
                city = EXCLUDED.city, \
                rooms = EXCLUDED.rooms, \
                bathrooms = EXCLUDED.bathrooms, \
                area = EXCLUDED.area, \
                main_photo = EXCLUDED.main_photo, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &title,
                &description,
                &operation,
                &status,
                &price,
                &address,
                &city,
                &rooms,
                &bathrooms,
                &area,
                &main_photo,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Property, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM properties \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Property, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO properties_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Insert<Vec<property::Photo>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(photos): Insert<Vec<property::Photo>>,
    ) -> Result<Self::Ok, Self::Err> {
        if photos.is_empty() {
            return Ok(());
        }

        let mut ids = Vec::with_capacity(photos.len());
        let mut property_ids = Vec::with_capacity(photos.len());
        let mut urls = Vec::with_capacity(photos.len());
        let mut captions = Vec::with_capacity(photos.len());
        for photo in photos {
            let property::Photo {
                id,
                property_id,
                url,
                caption,
            } = photo;
            ids.push(id);
            property_ids.push(property_id);
            urls.push(url);
            captions.push(caption);
        }

        const SQL: &str = "\
            INSERT INTO property_photos (\
                id, property_id, \
                url, caption\
            ) \
            SELECT * \
            FROM unnest(\
                $1::UUID[], $2::UUID[], \
                $3::VARCHAR[], $4::VARCHAR[]\
            )";
        self.exec(SQL, &[&ids, &property_ids, &urls, &captions])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<property::Photo>, property::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<property::Photo>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<property::Photo>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, property_id, \
                   url, caption \
            FROM property_photos \
            WHERE property_id = $1::UUID \
            ORDER BY id";
        Ok(self
            .query(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| property::Photo {
                id: row.get("id"),
                property_id: row.get("property_id"),
                url: row.get("url"),
                caption: row.get("caption"),
            })
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Property>, read::property::Newest>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<property::Id, Property>, Vec<property::Id>>>,
        Ok = HashMap<property::Id, Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Property>, read::property::Newest>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::property::Newest { operation, limit } = by.into_inner();

        let limit = i32::from(limit);

        const SQL: &str = "\
            SELECT id \
            FROM properties \
            WHERE operation = $1::INT2 \
              AND status = $2::INT2 \
            ORDER BY created_at DESC, id \
            LIMIT $3::INT4";
        let ids = self
            .query(SQL, &[&operation, &property::Status::Available, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<property::Id>>();

        let mut properties = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids
            .into_iter()
            .filter_map(|id| properties.remove(&id))
            .collect())
    }
}

impl<C>
    Database<
        Select<By<read::property::list::Page, read::property::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::property::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::property::list::Page, read::property::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::property::list::Selector {
            arguments,
            filter:
                read::property::list::Filter {
                    operation,
                    status,
                    term,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let operation_idx = operation.as_ref().map(|op| {
            ps.push(op);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let term_idx = term.as_ref().map(|t| {
            ps.push(t);
            ps.len()
        });

        let term_pattern = term.as_ref().map(|t| FuzzPattern::new(t.as_ref()));
        let term_pattern_idx = term_pattern.as_ref().map(|t| {
            ps.push(t);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM properties \
             WHERE true \
                   {cursor} \
                   {operation_filtering} \
                   {status_filtering} \
                   {term_filtering} \
             ORDER BY {term_ordering} \
                      id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            operation_filtering =
                operation_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND operation = ${idx}::INT2"))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            term_filtering =
                term_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND (LOWER(title) SIMILAR TO LOWER(${idx}::VARCHAR) \
                          OR LOWER(COALESCE(description, '')) \
                             SIMILAR TO LOWER(${idx}::VARCHAR) \
                          OR LOWER(address) \
                             SIMILAR TO LOWER(${idx}::VARCHAR) \
                          OR LOWER(city) SIMILAR TO LOWER(${idx}::VARCHAR))"
                    ))
                }),
            term_ordering = term_idx.into_iter().format_with("", |idx, f| {
                let order = arguments.kind().order().sql();
                f(&format_args!(
                    "LEVENSHTEIN(title, ${idx}::VARCHAR, 1, 1, 0) {order},"
                ))
            })
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::property::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<By<read::property::list::TotalCount, read::property::list::Filter>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::property::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::property::list::TotalCount, read::property::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::property::list::Filter {
            operation,
            status,
            term,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let operation_idx = operation.as_ref().map(|op| {
            ps.push(op);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let term_pattern = term.as_ref().map(|t| FuzzPattern::new(t.as_ref()));
        let term_pattern_idx = term_pattern.as_ref().map(|t| {
            ps.push(t);
            ps.len()
        });

        let sql = format!(
            "SELECT COUNT(*)::INT4 \
             FROM properties \
             WHERE true \
                   {operation_filtering} \
                   {status_filtering} \
                   {term_filtering}",
            operation_filtering =
                operation_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND operation = ${idx}::INT2"))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            term_filtering =
                term_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND (LOWER(title) SIMILAR TO LOWER(${idx}::VARCHAR) \
                          OR LOWER(COALESCE(description, '')) \
                             SIMILAR TO LOWER(${idx}::VARCHAR) \
                          OR LOWER(address) \
                             SIMILAR TO LOWER(${idx}::VARCHAR) \
                          OR LOWER(city) SIMILAR TO LOWER(${idx}::VARCHAR))"
                    ))
                }),
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
