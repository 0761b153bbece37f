//! [`Payment`]-related definitions.

use common::{Date, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// Scheduled rent [`Payment`] under a `Contract`.
#[derive(Clone, Debug, From)]
pub struct Payment(domain::Payment);

/// Scheduled rent `Payment` under a `Contract`.
#[graphql_object(context = Context)]
impl Payment {
    /// Unique identifier of this `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Contract` this `Payment` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.contract",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn contract(&self) -> api::Contract {
        #[expect(
            unsafe_code,
            reason = "foreign key guarantees `Contract` existence"
        )]
        unsafe {
            api::Contract::new_unchecked(self.0.contract_id)
        }
    }

    /// Amount of this `Payment`.
    ///
    /// Reflects the escalated rent in effect at the due date.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.amount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn amount(&self) -> Money {
        self.0.amount
    }

    /// `Date` this `Payment` is due on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.dueOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn due_on(&self) -> Date {
        self.0.due_on
    }

    /// Current status of this `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `Date` this `Payment` was confirmed on, if it was.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.paidOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn paid_on(&self) -> Option<Date> {
        self.0.paid_on
    }
}

/// Unique identifier of a `Payment`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::payment::Id)]
#[into(domain::payment::Id)]
#[graphql(name = "PaymentId", transparent)]
pub struct Id(Uuid);

/// Status of a `Payment`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PaymentStatus")]
pub enum Status {
    /// The `Payment` is scheduled and not yet due.
    Pending,

    /// The `Payment` is confirmed as received.
    Paid,

    /// The `Payment` is past due and unpaid.
    Overdue,
}

impl From<domain::payment::Status> for Status {
    fn from(status: domain::payment::Status) -> Self {
        match status {
            domain::payment::Status::Pending => Self::Pending,
            domain::payment::Status::Paid => Self::Paid,
            domain::payment::Status::Overdue => Self::Overdue,
        }
    }
}
