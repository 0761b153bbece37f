//! [`Command`] for updating a [`Property`] listing.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::{Address, City, Description, Title};
use crate::{
    domain::{property, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Property`] listing.
///
/// Overwrites every listing attribute of the [`Property`] with the provided
/// ones.
#[derive(Clone, Debug)]
pub struct UpdateProperty {
    /// ID of the [`Property`] to update.
    pub id: property::Id,

    /// New [`Title`] of the [`Property`] listing.
    pub title: property::Title,

    /// New [`Description`] of the [`Property`] listing.
    pub description: Option<property::Description>,

    /// New [`property::Operation`] the [`Property`] is offered for.
    pub operation: property::Operation,

    /// New [`property::Status`] of the [`Property`].
    pub status: property::Status,

    /// New price of the [`Property`].
    pub price: Money,

    /// New [`Address`] of the [`Property`].
    pub address: property::Address,

    /// New [`City`] the [`Property`] is located in.
    pub city: property::City,

    /// New number of rooms in the [`Property`].
    pub rooms: property::RoomCount,

    /// New number of bathrooms in the [`Property`].
    pub bathrooms: property::BathroomCount,

    /// New area of the [`Property`] in square meters.
    pub area: property::Area,

    /// New main [`photo::Url`] of the [`Property`] listing.
    ///
    /// [`photo::Url`]: property::photo::Url
    pub main_photo: Option<property::photo::Url>,
}

impl<Db, M> Command<UpdateProperty> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Property, property::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Property>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProperty {
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
        } = cmd;

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

        let mut property = tx
            .execute(Select(By::<Option<Property>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(id))
            .map_err(tracerr::wrap!())?;

        property.title = title;
        property.description = description;
        property.operation = operation;
        property.status = status;
        property.price = price;
        property.address = address;
        property.city = city;
        property.rooms = rooms;
        property.bathrooms = bathrooms;
        property.area = area;
        property.main_photo = main_photo;

        tx.execute(Update(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(property)
    }
}

/// Error of [`UpdateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Property`] doesn't exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),
}
