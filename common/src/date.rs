//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp::Ordering, fmt, marker::PhantomData};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::format_description::well_known::{
    iso8601, iso8601::EncodedConfig, Iso8601,
};

/// Encoded [`Iso8601`] configuration of the [`FORMAT`].
const FORMAT_CONFIG: EncodedConfig = iso8601::Config::DEFAULT
    .set_formatted_components(iso8601::FormattedComponents::Date)
    .encode();

/// [ISO 8601] format of a calendar [`Date`], without any time components.
///
/// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
const FORMAT: Iso8601<FORMAT_CONFIG> = Iso8601;

/// Untyped calendar date.
pub type Date = DateOf;

/// Calendar date, without a time or an offset.
#[derive(Debug)]
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Creates a new [`Date`] representing the current date in UTC.
    #[must_use]
    pub fn today() -> Self {
        time::OffsetDateTime::now_utc().date().into()
    }

    /// Creates a new [`Date`] from the provided year, month and day.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day)
            .ok()
            .map(Into::into)
    }

    /// Returns the day-of-month of this [`Date`].
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.inner.day()
    }

    /// Replaces the day-of-month of this [`Date`] with the provided one,
    /// clamping it to the last day of the month whenever the month is too
    /// short.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn with_day_clamped(self, day: u8) -> Self {
        let (year, month) = (self.inner.year(), self.inner.month());
        let day = day.clamp(1, days_in_month(year, month));
        time::Date::from_calendar_date(year, month, day)
            .expect("infallible")
            .into()
    }

    /// Advances this [`Date`] to the following month, targeting the provided
    /// day-of-month and clamping it to the last day of the month whenever the
    /// month is too short.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn next_month(self, day: u8) -> Self {
        let month = self.inner.month().next();
        let year = if month == time::Month::January {
            self.inner.year() + 1
        } else {
            self.inner.year()
        };
        let day = day.clamp(1, days_in_month(year, month));
        time::Date::from_calendar_date(year, month, day)
            .expect("infallible")
            .into()
    }

    /// Advances this [`Date`] by the provided number of days, saturating on
    /// the calendar boundary.
    #[must_use]
    pub fn plus_days(self, days: u16) -> Self {
        self.inner
            .saturating_add(time::Duration::days(days.into()))
            .into()
    }

    /// Creates a new [`Date`] from the provided [ISO 8601] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [ISO 8601] date.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    pub fn from_iso8601(input: &str) -> Result<Self, ParseError> {
        time::Date::parse(input, &FORMAT)
            .map(Into::into)
            .map_err(ParseError)
    }

    /// Returns the [`Date`] as an [ISO 8601] string.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.inner
            .format(&FORMAT)
            .unwrap_or_else(|e| panic!("cannot format `Date` as ISO 8601: {e}"))
    }

    /// Coerces one kind of [`Date`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateOf<NewOf> {
        DateOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Returns the number of days in the provided month.
fn days_in_month(year: i32, month: time::Month) -> u8 {
    (28..=31)
        .rev()
        .find(|&d| time::Date::from_calendar_date(year, month, d).is_ok())
        .unwrap_or(28)
}

/// Error of parsing [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub struct ParseError(time::error::Parse);

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> fmt::Display for DateOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> From<time::Date> for DateOf<Of> {
    fn from(date: time::Date) -> Self {
        Self {
            inner: date,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> From<DateOf<Of>> for time::Date {
    fn from(date: DateOf<Of>) -> Self {
        date.inner
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateOf<Of> {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Into::into)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateOf<Of> {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.inner.to_sql(ty, w)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in an [ISO 8601] `YYYY-MM-DD` format.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = crate::Date;

    impl Date {
        fn to_output<S: ScalarValue>(date: &Date) -> Value<S> {
            Value::scalar(date.to_iso8601())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_iso8601(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    fn date(year: i32, month: u8, day: u8) -> Date {
        Date::from_ymd(year, month, day).unwrap()
    }

    #[test]
    fn clamps_day_to_month_end() {
        assert_eq!(date(2024, 2, 10).with_day_clamped(31), date(2024, 2, 29));
        assert_eq!(date(2023, 2, 10).with_day_clamped(31), date(2023, 2, 28));
        assert_eq!(date(2024, 4, 1).with_day_clamped(31), date(2024, 4, 30));
        assert_eq!(date(2024, 1, 20).with_day_clamped(15), date(2024, 1, 15));
        assert_eq!(date(2024, 1, 20).with_day_clamped(0), date(2024, 1, 1));
    }

    #[test]
    fn next_month_retargets_the_day() {
        // A short month doesn't stick: the target day is restored as soon as
        // the following month is long enough.
        let jan = date(2024, 1, 31);
        let feb = jan.next_month(31);
        let mar = feb.next_month(31);
        assert_eq!(feb, date(2024, 2, 29));
        assert_eq!(mar, date(2024, 3, 31));
    }

    #[test]
    fn next_month_crosses_year_boundary() {
        assert_eq!(date(2024, 12, 5).next_month(5), date(2025, 1, 5));
    }

    #[test]
    fn plus_days_crosses_month_end() {
        assert_eq!(date(2024, 2, 27).plus_days(5), date(2024, 3, 3));
        assert_eq!(date(2024, 12, 31).plus_days(1), date(2025, 1, 1));
        assert_eq!(date(2024, 6, 1).plus_days(0), date(2024, 6, 1));
    }

    #[test]
    fn parses_and_formats_iso8601() {
        let d = Date::from_iso8601("2024-01-15").unwrap();
        assert_eq!(d, date(2024, 1, 15));
        assert_eq!(d.to_iso8601(), "2024-01-15");

        assert!(Date::from_iso8601("2024-13-01").is_err());
        assert!(Date::from_iso8601("yesterday").is_err());
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(date(2024, 1, 31) < date(2024, 2, 1));
        assert!(date(2024, 2, 29) > date(2024, 2, 28));
    }
}
