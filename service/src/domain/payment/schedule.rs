//! Scheduling of monthly rent [`Payment`]s.

use crate::domain::Contract;

use super::{Id, Payment, Status};

/// Computes the full series of monthly rent [`Payment`]s for the provided
/// [`Contract`].
///
/// The first [`Payment`] is due on the [`Contract`]'s due day within its
/// start month, clamped to the last day of that month whenever the month is
/// too short. If the due day is already past at the start date, billing
/// starts the following cycle instead. One [`Payment`] is emitted per month
/// up to and including the end date, re-targeting the due day every month,
/// and the rent is escalated by the [`Contract`]'s percentage on every
/// escalation boundary.
///
/// An empty schedule (the end date precedes the first due date) is a valid
/// outcome, left for the caller to report.
#[must_use]
pub fn for_contract(contract: &Contract) -> Vec<Payment> {
    let day = contract.due_day.day();

    let mut due_on = contract.starts_on.with_day_clamped(day);
    if contract.starts_on.day() > day {
        due_on = due_on.next_month(day);
    }

    let period = u32::from(contract.escalation_period.months());
    let mut amount = contract.rent;
    let mut month = 0_u32;

    let mut payments = Vec::new();
    while due_on <= contract.ends_on {
        month += 1;
        if month > 1 && (month - 1) % period == 0 {
            amount = amount.increased_by(contract.escalation_percent);
        }

        payments.push(Payment {
            id: Id::new(),
            contract_id: contract.id,
            amount,
            due_on,
            status: Status::Pending,
            paid_on: None,
        });

        due_on = due_on.next_month(day);
    }
    payments
}

#[cfg(test)]
mod spec {
    use common::{Date, Money, Percent};

    use crate::domain::{
        client, contract, payment::Status, property, Contract,
    };

    use super::for_contract;

    fn date(year: i32, month: u8, day: u8) -> Date {
        Date::from_ymd(year, month, day).unwrap()
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn contract(
        starts_on: Date,
        ends_on: Date,
        rent: &str,
        due_day: u8,
        period: u16,
        percent: &str,
    ) -> Contract {
        Contract {
            id: contract::Id::new(),
            property_id: property::Id::new(),
            tenant_id: client::Id::new(),
            starts_on,
            ends_on,
            rent: money(rent),
            due_day: contract::DueDay::new(due_day).unwrap(),
            escalation_period: contract::EscalationPeriod::new(period)
                .unwrap(),
            escalation_percent: Percent::new(percent.parse().unwrap())
                .unwrap(),
            created_at: common::DateTime::now().coerce(),
        }
    }

    #[test]
    fn emits_one_payment_per_month_through_the_end_date() {
        let c = contract(
            date(2024, 1, 15),
            date(2024, 12, 15),
            "1000",
            15,
            12,
            "10",
        );

        let payments = for_contract(&c);

        assert_eq!(payments.len(), 12);
        for (i, p) in payments.iter().enumerate() {
            assert_eq!(p.due_on, date(2024, 1 + u8::try_from(i).unwrap(), 15));
            assert_eq!(p.amount, money("1000"));
            assert_eq!(p.status, Status::Pending);
            assert_eq!(p.paid_on, None);
            assert_eq!(p.contract_id, c.id);
        }
    }

    #[test]
    fn starts_billing_next_cycle_when_due_day_already_passed() {
        let c = contract(
            date(2024, 1, 15),
            date(2024, 12, 15),
            "1000",
            1,
            12,
            "10",
        );

        let payments = for_contract(&c);

        assert_eq!(payments.len(), 11);
        assert_eq!(payments[0].due_on, date(2024, 2, 1));
        assert_eq!(payments[10].due_on, date(2024, 12, 1));
        assert!(payments.iter().all(|p| p.amount == money("1000")));
    }

    #[test]
    fn clamps_first_due_date_to_short_month_end() {
        let leap = contract(
            date(2024, 2, 10),
            date(2024, 4, 30),
            "500",
            31,
            12,
            "5",
        );
        assert_eq!(for_contract(&leap)[0].due_on, date(2024, 2, 29));

        let regular = contract(
            date(2023, 2, 10),
            date(2023, 4, 30),
            "500",
            31,
            12,
            "5",
        );
        assert_eq!(for_contract(&regular)[0].due_on, date(2023, 2, 28));
    }

    #[test]
    fn retargets_due_day_after_short_months() {
        let c = contract(
            date(2024, 1, 10),
            date(2024, 4, 30),
            "500",
            31,
            12,
            "5",
        );

        let due: Vec<_> =
            for_contract(&c).into_iter().map(|p| p.due_on).collect();

        assert_eq!(
            due,
            [
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30),
            ],
        );
    }

    #[test]
    fn escalates_rent_on_every_boundary() {
        let c = contract(
            date(2024, 1, 1),
            date(2025, 6, 30),
            "1000",
            1,
            6,
            "10",
        );

        let payments = for_contract(&c);

        assert_eq!(payments.len(), 18);
        assert!(payments[..6].iter().all(|p| p.amount == money("1000")));
        assert!(payments[6..12].iter().all(|p| p.amount == money("1100")));
        assert!(payments[12..].iter().all(|p| p.amount == money("1210")));
    }

    #[test]
    fn escalates_every_month_when_period_is_one_month() {
        let c = contract(
            date(2024, 1, 1),
            date(2024, 4, 30),
            "1000",
            1,
            1,
            "10",
        );

        let amounts: Vec<_> =
            for_contract(&c).into_iter().map(|p| p.amount).collect();

        assert_eq!(
            amounts,
            [
                money("1000"),
                money("1100"),
                money("1210"),
                money("1331"),
            ],
        );
    }

    #[test]
    fn compounds_escalation_on_the_rounded_base() {
        let c = contract(
            date(2024, 1, 1),
            date(2024, 3, 31),
            "987.65",
            1,
            1,
            "3.33",
        );

        let amounts: Vec<_> =
            for_contract(&c).into_iter().map(|p| p.amount).collect();

        assert_eq!(
            amounts,
            [money("987.65"), money("1020.54"), money("1054.52")],
        );
    }

    #[test]
    fn yields_nothing_when_end_date_precedes_first_due_date() {
        let c = contract(
            date(2024, 1, 20),
            date(2024, 1, 25),
            "1000",
            1,
            12,
            "10",
        );
        assert!(for_contract(&c).is_empty());

        let inverted = contract(
            date(2024, 5, 1),
            date(2024, 4, 1),
            "1000",
            1,
            12,
            "10",
        );
        assert!(for_contract(&inverted).is_empty());
    }

    #[test]
    fn includes_payment_due_exactly_on_the_end_date() {
        let c = contract(
            date(2024, 1, 20),
            date(2024, 2, 1),
            "1000",
            1,
            12,
            "10",
        );

        let payments = for_contract(&c);

        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].due_on, date(2024, 2, 1));
    }
}
