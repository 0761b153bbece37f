//! [`Command`] for creating a new [`Property`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime, Money,
};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::{Address, City, Description, Title};
use crate::{
    domain::{property, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Property`].
///
/// A new [`Property`] always starts in the [`property::Status::Available`]
/// state.
#[derive(Clone, Debug)]
pub struct CreateProperty {
    /// [`Title`] of a new [`Property`] listing.
    pub title: property::Title,

    /// [`Description`] of a new [`Property`] listing.
    pub description: Option<property::Description>,

    /// [`property::Operation`] a new [`Property`] is offered for.
    pub operation: property::Operation,

    /// Price of a new [`Property`].
    pub price: Money,

    /// [`Address`] of a new [`Property`].
    pub address: property::Address,

    /// [`City`] a new [`Property`] is located in.
    pub city: property::City,

    /// Number of rooms in a new [`Property`].
    pub rooms: property::RoomCount,

    /// Number of bathrooms in a new [`Property`].
    pub bathrooms: property::BathroomCount,

    /// Area of a new [`Property`] in square meters.
    pub area: property::Area,

    /// Main [`photo::Url`] of a new [`Property`] listing.
    ///
    /// [`photo::Url`]: property::photo::Url
    pub main_photo: Option<property::photo::Url>,

    /// [`Photo`]s of a new [`Property`] listing.
    pub photos: Vec<Photo>,
}

/// Single photo of a new [`Property`] listing.
#[derive(Clone, Debug)]
pub struct Photo {
    /// [`photo::Url`] the photo is served at.
    ///
    /// [`photo::Url`]: property::photo::Url
    pub url: property::photo::Url,

    /// [`photo::Caption`] of the photo.
    ///
    /// [`photo::Caption`]: property::photo::Caption
    pub caption: Option<property::photo::Caption>,
}

impl<Db, M> Command<CreateProperty> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Property>, Err = Traced<database::Error>>
        + Database<
            Insert<Vec<property::Photo>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateProperty {
            title,
            description,
            operation,
            price,
            address,
            city,
            rooms,
            bathrooms,
            area,
            main_photo,
            photos,
        } = cmd;

        let property = Property {
            id: property::Id::new(),
            title,
            description,
            operation,
            status: property::Status::Available,
            price,
            address,
            city,
            rooms,
            bathrooms,
            area,
            main_photo,
            created_at: DateTime::now().coerce(),
        };
        let photos = photos
            .into_iter()
            .map(|p| property::Photo {
                id: property::photo::Id::new(),
                property_id: property.id,
                url: p.url,
                caption: p.caption,
            })
            .collect::<Vec<_>>();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        tx.execute(Insert(property.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        if !photos.is_empty() {
            tx.execute(Insert(photos))
                .await
                .map_err(tracerr::wrap!())?;
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(property)
    }
}

/// Error of [`CreateProperty`] [`Command`] execution.
pub type ExecutionError = database::Error;
