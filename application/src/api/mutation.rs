//! GraphQL [`Mutation`]s definitions.

use common::{Date, Money, Percent};
use juniper::graphql_object;
use service::{command, domain::contract, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `User` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOGIN_OCCUPIED` - provided `UserLogin` is occupied by another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUser",
            login = %login,
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user(
        name: api::user::Name,
        login: api::user::Login,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let user = ctx
            .service()
            .execute(command::CreateUser {
                name: name.into(),
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByUserId(user.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Creates a new `UserSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUserSession",
            login = %login,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        login: api::user::Login,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Creates a new `Property` listing with the provided details.
    #[tracing::instrument(
        skip_all,
        fields(
            address = %address,
            area = %area,
            bathrooms = %bathrooms,
            city = %city,
            description = ?description,
            gql.name = "createProperty",
            main_photo = ?main_photo,
            operation = ?operation,
            otel.name = Self::SPAN_NAME,
            photos = ?photos,
            price = %price,
            rooms = %rooms,
            title = %title,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_property(
        title: api::property::Title,
        description: Option<api::property::Description>,
        operation: api::property::Operation,
        price: Money,
        address: api::property::Address,
        city: api::property::City,
        rooms: i32,
        bathrooms: i32,
        area: i32,
        main_photo: Option<api::property::photo::Url>,
        photos: Option<Vec<api::property::photo::Input>>,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let rooms = rooms.try_into().map_err(AsError::into_error)?;
        let bathrooms = bathrooms.try_into().map_err(AsError::into_error)?;
        let area = area.try_into().map_err(AsError::into_error)?;

        ctx.current_session().await?;

        ctx.service()
            .execute(command::CreateProperty {
                title: title.into(),
                description: description.map(Into::into),
                operation: operation.into(),
                price,
                address: address.into(),
                city: city.into(),
                rooms,
                bathrooms,
                area,
                main_photo: main_photo.map(Into::into),
                photos: photos
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Property` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does not
    ///                           exist.
    #[tracing::instrument(
        skip_all,
        fields(
            address = %address,
            area = %area,
            bathrooms = %bathrooms,
            city = %city,
            description = ?description,
            gql.name = "updateProperty",
            id = %id,
            main_photo = ?main_photo,
            operation = ?operation,
            otel.name = Self::SPAN_NAME,
            price = %price,
            rooms = %rooms,
            status = ?status,
            title = %title,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn update_property(
        id: api::property::Id,
        title: api::property::Title,
        description: Option<api::property::Description>,
        operation: api::property::Operation,
        status: api::property::Status,
        price: Money,
        address: api::property::Address,
        city: api::property::City,
        rooms: i32,
        bathrooms: i32,
        area: i32,
        main_photo: Option<api::property::photo::Url>,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let rooms = rooms.try_into().map_err(AsError::into_error)?;
        let bathrooms = bathrooms.try_into().map_err(AsError::into_error)?;
        let area = area.try_into().map_err(AsError::into_error)?;

        ctx.current_session().await?;

        ctx.service()
            .execute(command::UpdateProperty {
                id: id.into(),
                title: title.into(),
                description: description.map(Into::into),
                operation: operation.into(),
                status: status.into(),
                price,
                address: address.into(),
                city: city.into(),
                rooms,
                bathrooms,
                area,
                main_photo: main_photo.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Property` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does not
    ///                           exist;
    /// - `PROPERTY_HAS_CONTRACTS` - the `Property` with the provided ID is
    ///                              referenced by existing `Contract`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteProperty",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_property(
        id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::property::Id, Error> {
        ctx.current_session().await?;

        ctx.service()
            .execute(command::DeleteProperty { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| id)
    }

    /// Creates a new `Client` profile with the provided details.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - provided `ClientEmail` is occupied by another
    ///                      `Client`;
    /// - `USER_NOT_EXISTS` - the `User` with the provided ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email,
            gql.name = "createClient",
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
            user_id = ?user_id,
        ),
    )]
    pub async fn create_client(
        name: api::client::Name,
        email: Option<api::client::Email>,
        phone: Option<api::client::Phone>,
        user_id: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        ctx.current_session().await?;

        ctx.service()
            .execute(command::CreateClient {
                name: name.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
                user_id: user_id.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Client` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the provided ID does not
    ///                         exist;
    /// - `CLIENT_HAS_CONTRACTS` - the `Client` with the provided ID is
    ///                            referenced by existing `Contract`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteClient",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_client(
        id: api::client::Id,
        ctx: &Context,
    ) -> Result<api::client::Id, Error> {
        ctx.current_session().await?;

        ctx.service()
            .execute(command::DeleteClient { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| id)
    }

    /// Creates a new rental `Contract` with the provided terms, along with its
    /// whole `Payment` schedule.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the provided ID does not
    ///                         exist;
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does not
    ///                           exist;
    /// - `PROPERTY_NOT_RENTABLE` - the `Property` with the provided ID is not
    ///                             available for rent;
    /// - `INVALID_DUE_DAY` - provided `dueDay` is not a valid day-of-month;
    /// - `INVALID_ESCALATION_PERIOD` - provided `escalationPeriod` is not a
    ///                                 valid number of months.
    #[tracing::instrument(
        skip_all,
        fields(
            due_day = %due_day,
            ends_on = %ends_on,
            escalation_percent = %escalation_percent,
            escalation_period = %escalation_period,
            gql.name = "createContract",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
            rent = %rent,
            starts_on = %starts_on,
            tenant_id = %tenant_id,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_contract(
        property_id: api::property::Id,
        tenant_id: api::client::Id,
        starts_on: Date,
        ends_on: Date,
        rent: Money,
        due_day: i32,
        escalation_period: i32,
        escalation_percent: Percent,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        let due_day = u8::try_from(due_day)
            .ok()
            .and_then(contract::DueDay::new)
            .ok_or_else(|| TermsError::DueDay.into())
            .map_err(ctx.error())?;
        let escalation_period = u16::try_from(escalation_period)
            .ok()
            .and_then(contract::EscalationPeriod::new)
            .ok_or_else(|| TermsError::EscalationPeriod.into())
            .map_err(ctx.error())?;

        ctx.current_session().await?;

        ctx.service()
            .execute(command::CreateContract {
                property_id: property_id.into(),
                tenant_id: tenant_id.into(),
                starts_on,
                ends_on,
                rent,
                due_day,
                escalation_period,
                escalation_percent,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Confirms the pending `Payment` with the provided ID as paid on the
    /// provided date.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the provided ID does not
    ///                          exist;
    /// - `PAYMENT_NOT_PENDING` - the `Payment` with the provided ID is already
    ///                           confirmed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "confirmPayment",
            id = %id,
            otel.name = Self::SPAN_NAME,
            paid_on = %paid_on,
        ),
    )]
    pub async fn confirm_payment(
        id: api::payment::Id,
        paid_on: Date,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.current_session().await?;

        ctx.service()
            .execute(command::ConfirmPayment {
                id: id.into(),
                paid_on,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum TermsError {
        #[code = "INVALID_DUE_DAY"]
        #[status = BAD_REQUEST]
        #[message = "`Contract` due day must be in `1..=31` range"]
        DueDay,

        #[code = "INVALID_ESCALATION_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "`Contract` escalation period must be in `1..=1200` \
                     months range"]
        EscalationPeriod,
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "LOGIN_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`UserLogin` is occupied by another `User`"]
                LoginOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::LoginOccupied(_) => Some(Error::LoginOccupied.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
        }
    }
}

impl AsError for command::update_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PROPERTY_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Property` with the provided ID does not exist"]
                PropertyNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(Error::PropertyNotExists.into()),
        }
    }
}

impl AsError for command::delete_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PROPERTY_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Property` with the provided ID does not exist"]
                PropertyNotExists,

                #[code = "PROPERTY_HAS_CONTRACTS"]
                #[status = CONFLICT]
                #[message = "`Property` with the provided ID is referenced by \
                             existing `Contract`s"]
                ReferencedByContracts,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::PropertyNotExists(_) => Error::PropertyNotExists.into(),
            Self::ReferencedByContracts(_) => {
                Error::ReferencedByContracts.into()
            }
        })
    }
}

impl AsError for command::create_client::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`ClientEmail` is occupied by another `Client`"]
                EmailOccupied,

                #[code = "USER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`User` with the provided ID does not exist"]
                UserNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EmailOccupied(_) => Error::EmailOccupied.into(),
            Self::UserNotExists(_) => Error::UserNotExists.into(),
        })
    }
}

impl AsError for command::delete_client::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CLIENT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Client` with the provided ID does not exist"]
                ClientNotExists,

                #[code = "CLIENT_HAS_CONTRACTS"]
                #[status = CONFLICT]
                #[message = "`Client` with the provided ID is referenced by \
                             existing `Contract`s"]
                ReferencedByContracts,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ClientNotExists(_) => Error::ClientNotExists.into(),
            Self::ReferencedByContracts(_) => {
                Error::ReferencedByContracts.into()
            }
        })
    }
}

impl AsError for command::create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CLIENT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Client` with the provided ID does not exist"]
                ClientNotExists,

                #[code = "PROPERTY_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Property` with the provided ID does not exist"]
                PropertyNotExists,

                #[code = "PROPERTY_NOT_RENTABLE"]
                #[status = CONFLICT]
                #[message = "`Property` with the provided ID is not available \
                             for rent"]
                PropertyNotRentable,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ClientNotExists(_) => Error::ClientNotExists.into(),
            Self::PropertyNotExists(_) => Error::PropertyNotExists.into(),
            Self::PropertyNotRentable(_) => Error::PropertyNotRentable.into(),
        })
    }
}

impl AsError for command::confirm_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PAYMENT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Payment` with the provided ID does not exist"]
                PaymentNotExists,

                #[code = "PAYMENT_NOT_PENDING"]
                #[status = CONFLICT]
                #[message = "`Payment` with the provided ID is already \
                             confirmed"]
                PaymentNotPending,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::PaymentNotExists(_) => Error::PaymentNotExists.into(),
            Self::PaymentNotPending(_, _) => Error::PaymentNotPending.into(),
        })
    }
}
