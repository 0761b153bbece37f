//! [`ReconcilePayments`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Dispatch, Perform, Select, Start, Update},
    Date,
};
use derive_more::{Display, Error as StdError, From};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{client, Payment},
    infra::{database, mailer, Database, Mailer},
    read, Service,
};

use super::Task;

/// Number of seconds in a single day.
const SECS_PER_DAY: u64 = 86_400;

/// Configuration for [`ReconcilePayments`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between reconciliation runs.
    pub interval: time::Duration,

    /// Lead time before a [`Payment`]'s due date to remind the tenant about
    /// it.
    ///
    /// Only whole days of it are considered.
    pub remind_before: time::Duration,
}

/// [`Task`] marking overdue [`Payment`]s and reminding tenants about the ones
/// coming due.
#[derive(Clone, Copy, Debug)]
pub struct ReconcilePayments<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<S> ReconcilePayments<S> {
    /// Creates a new [`ReconcilePayments`] [`Task`] for one-shot execution.
    #[must_use]
    pub fn new(config: Config, service: S) -> Self {
        Self { config, service }
    }
}

impl<Db, M> Task<Start<By<ReconcilePayments<Self>, Config>>>
    for Service<Db, M>
where
    ReconcilePayments<Service<Db, M>>:
        Task<Perform<Date>, Ok = Report, Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ReconcilePayments<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ReconcilePayments::new(config, self.clone());

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(Date::today())).await {
                Ok(report) => log::info!(
                    "`task::ReconcilePayments` finished: \
                     {} payment(s) marked overdue, \
                     {} reminder(s) dispatched",
                    report.overdue,
                    report.reminders,
                ),
                Err(e) => {
                    log::error!("`task::ReconcilePayments` failed: {e}");
                }
            }
        }
    }
}

impl<Db, M> Task<Perform<Date>> for ReconcilePayments<Service<Db, M>>
where
    Db: Database<
            Update<By<Payment, Date>>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<read::payment::Reminder>, Date>>,
            Ok = Vec<read::payment::Reminder>,
            Err = Traced<database::Error>,
        >,
    M: Mailer<Dispatch<mailer::Message>, Ok = (), Err = Traced<mailer::Error>>,
{
    type Ok = Report;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Perform(today): Perform<Date>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let overdue = self
            .service
            .database()
            .execute(Update(By::new(today)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let lead =
            u16::try_from(self.config.remind_before.as_secs() / SECS_PER_DAY)
                .unwrap_or(u16::MAX);
        let reminders: Vec<read::payment::Reminder> = self
            .service
            .database()
            .execute(Select(By::new(today.plus_days(lead))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut dispatched = 0;
        for reminder in reminders {
            let Some(to) = &reminder.email else {
                log::warn!(
                    "Tenant `{}` has no email address, skipping the reminder \
                     about payment `{}`",
                    reminder.tenant,
                    reminder.payment.id,
                );
                continue;
            };
            self.service
                .mailer()
                .execute(Dispatch(render(&reminder, to.clone())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            dispatched += 1;
        }

        Ok(Report {
            overdue,
            reminders: dispatched,
        })
    }
}

/// Report of a single [`ReconcilePayments`] run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Report {
    /// Number of [`Payment`]s newly marked as overdue.
    pub overdue: u64,

    /// Number of reminder [`mailer::Message`]s dispatched.
    pub reminders: usize,
}

/// Renders a reminder [`mailer::Message`] to the provided [`client::Email`]
/// address out of the [`read::payment::Reminder`] details.
fn render(
    reminder: &read::payment::Reminder,
    to: client::Email,
) -> mailer::Message {
    let read::payment::Reminder {
        payment,
        tenant,
        property,
        ..
    } = reminder;
    mailer::Message {
        to,
        subject: format!("Rent payment reminder: {property}"),
        text: format!(
            "Hello {tenant},\n\
             \n\
             your rent payment of {amount} for \"{property}\" is due on \
             {due}.\n\
             \n\
             Please make sure it's paid in time.",
            amount = payment.amount,
            due = payment.due_on.to_iso8601(),
        ),
        html: format!(
            "<p>Hello {tenant},</p>\
             <p>your rent payment of <strong>{amount}</strong> for \
             \"{property}\" is due on <strong>{due}</strong>.</p>\
             <p>Please make sure it's paid in time.</p>",
            amount = payment.amount,
            due = payment.due_on.to_iso8601(),
        ),
    }
}

/// Error of [`ReconcilePayments`] execution.
#[derive(Debug, Display, From, StdError)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Failed to dispatch a reminder [`mailer::Message`].
    #[display("Failed to dispatch a reminder: {_0}")]
    Mail(mailer::Error),
}

#[cfg(all(test, feature = "http-mailer"))]
mod spec {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use common::{
        operations::{By, Dispatch, Perform, Select, Update},
        Date, Money,
    };
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use tracerr::Traced;

    use crate::{
        domain::{client, contract, payment, property, Payment},
        infra::{database, mailer, mailer::http, Database, Mailer},
        read::payment::Reminder,
        Service,
    };

    use super::{Config, ReconcilePayments};

    #[derive(Clone, Debug)]
    struct Db {
        /// Rows the overdue sweep reports as affected.
        swept_rows: u64,

        /// [`Reminder`]s returned by the selection.
        reminders: Vec<Reminder>,

        /// Dates the overdue sweep was invoked with.
        swept_before: Rc<RefCell<Vec<Date>>>,

        /// Dates the [`Reminder`]s selection was invoked with.
        selected_on: Rc<RefCell<Vec<Date>>>,
    }

    impl Database<Update<By<Payment, Date>>> for Db {
        type Ok = u64;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(by): Update<By<Payment, Date>>,
        ) -> Result<Self::Ok, Self::Err> {
            self.swept_before.borrow_mut().push(by.into_inner());
            Ok(self.swept_rows)
        }
    }

    impl Database<Select<By<Vec<Reminder>, Date>>> for Db {
        type Ok = Vec<Reminder>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Vec<Reminder>, Date>>,
        ) -> Result<Self::Ok, Self::Err> {
            self.selected_on.borrow_mut().push(by.into_inner());
            Ok(self.reminders.clone())
        }
    }

    #[derive(Clone, Debug)]
    struct Mail {
        /// Messages dispatched so far.
        sent: Rc<RefCell<Vec<mailer::Message>>>,

        /// Zero-based index of the dispatch to fail on.
        fail_on: Option<usize>,
    }

    impl Mailer<Dispatch<mailer::Message>> for Mail {
        type Ok = ();
        type Err = Traced<mailer::Error>;

        async fn execute(
            &self,
            Dispatch(message): Dispatch<mailer::Message>,
        ) -> Result<Self::Ok, Self::Err> {
            if self.fail_on == Some(self.sent.borrow().len()) {
                return Err(tracerr::new!(mailer::Error::Http(
                    http::Error::BadStatus(
                        reqwest::StatusCode::BAD_GATEWAY,
                        String::from("upstream down"),
                    ),
                )));
            }
            self.sent.borrow_mut().push(message);
            Ok(())
        }
    }

    fn config() -> Config {
        Config {
            interval: Duration::from_secs(86_400),
            remind_before: Duration::from_secs(5 * 86_400),
        }
    }

    fn service(db: Db, mail: Mail) -> Service<Db, Mail> {
        Service {
            config: crate::Config {
                jwt_encoding_key: EncodingKey::from_secret(b"test"),
                jwt_decoding_key: DecodingKey::from_secret(b"test"),
                reconcile_payments: config(),
            },
            database: db,
            mailer: mail,
        }
    }

    fn date(year: i32, month: u8, day: u8) -> Date {
        Date::from_ymd(year, month, day).unwrap()
    }

    fn money(s: &str) -> Money {
        Money::new(s.parse().unwrap()).unwrap()
    }

    fn reminder(email: Option<&str>) -> Reminder {
        Reminder {
            payment: Payment {
                id: payment::Id::new(),
                contract_id: contract::Id::new(),
                amount: money("750.00"),
                due_on: date(2024, 3, 15),
                status: payment::Status::Pending,
                paid_on: None,
            },
            tenant: client::Name::new("Ana Torres").unwrap(),
            email: email.map(|e| client::Email::new(e).unwrap()),
            property: property::Title::new("Loft Centro").unwrap(),
        }
    }

    #[tokio::test]
    async fn sweeps_overdue_and_selects_reminders_by_lead_time() {
        let swept_before = Rc::new(RefCell::new(vec![]));
        let selected_on = Rc::new(RefCell::new(vec![]));
        let sent = Rc::new(RefCell::new(vec![]));
        let task = ReconcilePayments::new(
            config(),
            service(
                Db {
                    swept_rows: 3,
                    reminders: vec![],
                    swept_before: Rc::clone(&swept_before),
                    selected_on: Rc::clone(&selected_on),
                },
                Mail {
                    sent: Rc::clone(&sent),
                    fail_on: None,
                },
            ),
        );

        let report = task.execute(Perform(date(2024, 3, 10))).await.unwrap();

        assert_eq!(report.overdue, 3);
        assert_eq!(report.reminders, 0);
        assert_eq!(*swept_before.borrow(), [date(2024, 3, 10)]);
        assert_eq!(*selected_on.borrow(), [date(2024, 3, 15)]);
        assert!(sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn dispatches_a_reminder_with_the_payment_details() {
        let sent = Rc::new(RefCell::new(vec![]));
        let task = ReconcilePayments::new(
            config(),
            service(
                Db {
                    swept_rows: 0,
                    reminders: vec![reminder(Some("ana@example.com"))],
                    swept_before: Rc::default(),
                    selected_on: Rc::default(),
                },
                Mail {
                    sent: Rc::clone(&sent),
                    fail_on: None,
                },
            ),
        );

        let report = task.execute(Perform(date(2024, 3, 10))).await.unwrap();

        assert_eq!(report.reminders, 1);
        let messages = sent.borrow();
        assert_eq!(messages.len(), 1);
        let m = &messages[0];
        assert_eq!(AsRef::<str>::as_ref(&m.to), "ana@example.com");
        assert_eq!(m.subject, "Rent payment reminder: Loft Centro");
        assert!(m.text.contains("750.00"));
        assert!(m.text.contains("2024-03-15"));
        assert!(m.html.contains("<strong>750.00</strong>"));
    }

    #[tokio::test]
    async fn skips_tenants_without_an_email_address() {
        let sent = Rc::new(RefCell::new(vec![]));
        let task = ReconcilePayments::new(
            config(),
            service(
                Db {
                    swept_rows: 0,
                    reminders: vec![
                        reminder(None),
                        reminder(Some("ana@example.com")),
                    ],
                    swept_before: Rc::default(),
                    selected_on: Rc::default(),
                },
                Mail {
                    sent: Rc::clone(&sent),
                    fail_on: None,
                },
            ),
        );

        let report = task.execute(Perform(date(2024, 3, 10))).await.unwrap();

        assert_eq!(report.reminders, 1);
        assert_eq!(sent.borrow().len(), 1);
    }

    #[tokio::test]
    async fn aborts_the_run_on_the_first_failed_dispatch() {
        let sent = Rc::new(RefCell::new(vec![]));
        let task = ReconcilePayments::new(
            config(),
            service(
                Db {
                    swept_rows: 0,
                    reminders: vec![
                        reminder(Some("a@example.com")),
                        reminder(Some("b@example.com")),
                        reminder(Some("c@example.com")),
                    ],
                    swept_before: Rc::default(),
                    selected_on: Rc::default(),
                },
                Mail {
                    sent: Rc::clone(&sent),
                    fail_on: Some(1),
                },
            ),
        );

        let result = task.execute(Perform(date(2024, 3, 10))).await;

        assert!(result.is_err());
        assert_eq!(sent.borrow().len(), 1);
    }
}
