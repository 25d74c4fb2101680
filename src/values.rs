//! Runtime values and the calendar arithmetic they support.
//!
//! All six value kinds of the language live here together with the whole
//! binary/unary operator algebra. Operations never panic on bad operand
//! combinations; they return a [`ValueError`] which the evaluator wraps
//! with the position of the offending operator.

use std::fmt;

use thiserror::Error;

use crate::token::TokenType;

pub const MIN_YEAR: i64 = 1;
pub const MAX_YEAR: i64 = 9999;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;

/// Failures of the value algebra, independent of any source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("day {day} is out of range for month {month} of year {year}")]
    InvalidDate { day: i64, month: i64, year: i64 },
    #[error("month {month} is out of range for year {year}")]
    InvalidMonth { month: i64, year: i64 },
    #[error("year {0} is out of range, supported years are {MIN_YEAR} to {MAX_YEAR}")]
    YearOutOfRange(i64),
    #[error("time {hour:02}:{minute:02}:{second:02} is out of range")]
    InvalidTime { hour: i64, minute: i64, second: i64 },
    #[error("cannot apply '{op}' to {lhs} and {rhs}")]
    BinaryTypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("cannot apply unary '{op}' to {operand}")]
    UnaryTypeMismatch {
        op: &'static str,
        operand: &'static str,
    },
    #[error("cannot order {lhs} against {rhs}")]
    NotOrdered {
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("cannot read {unit} of {value}")]
    NoSuchField {
        unit: &'static str,
        value: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
}

/// One of the seven calendar units the language knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    pub fn from_token(kind: TokenType) -> Option<TimeUnit> {
        match kind {
            TokenType::Years => Some(TimeUnit::Years),
            TokenType::Months => Some(TimeUnit::Months),
            TokenType::Weeks => Some(TimeUnit::Weeks),
            TokenType::Days => Some(TimeUnit::Days),
            TokenType::Hours => Some(TimeUnit::Hours),
            TokenType::Minutes => Some(TimeUnit::Minutes),
            TokenType::Seconds => Some(TimeUnit::Seconds),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Years => "years",
            TimeUnit::Months => "months",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Days => "days",
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Seconds => "seconds",
        }
    }

    /// A timedelta of exactly one of this unit, the step of a `from` loop.
    pub fn step(self) -> Timedelta {
        let mut step = Timedelta::default();
        match self {
            TimeUnit::Years => step.years = 1,
            TimeUnit::Months => step.months = 1,
            TimeUnit::Weeks => step.weeks = 1,
            TimeUnit::Days => step.days = 1,
            TimeUnit::Hours => step.hours = 1,
            TimeUnit::Minutes => step.minutes = 1,
            TimeUnit::Seconds => step.seconds = 1,
        }
        step
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated Gregorian calendar date. Field order matters: the derived
/// ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    year: i64,
    month: i64,
    day: i64,
}

impl Date {
    pub fn new(day: i64, month: i64, year: i64) -> Result<Date, ValueError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ValueError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(ValueError::InvalidMonth { month, year });
        }
        if !(1..=days_in_month(year, month)).contains(&day) {
            return Err(ValueError::InvalidDate { day, month, year });
        }
        Ok(Date { year, month, day })
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn month(&self) -> i64 {
        self.month
    }

    pub fn day(&self) -> i64 {
        self.day
    }

    /// Days since 1970-01-01, negative before it.
    fn to_days(self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    fn from_days(days: i64) -> Result<Date, ValueError> {
        let (year, month, day) = civil_from_days(days);
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ValueError::YearOutOfRange(year));
        }
        Ok(Date { year, month, day })
    }

    /// Shifts by whole months first (day clamped to the target month's
    /// length), then by whole years (29 February falling on a non-leap
    /// year clamps to 28 February).
    pub fn add_years_months(self, years: i64, months: i64) -> Result<Date, ValueError> {
        let month_index = (self.month - 1).checked_add(months).ok_or(ValueError::Overflow)?;
        let year = self
            .year
            .checked_add(month_index.div_euclid(12))
            .ok_or(ValueError::Overflow)?;
        let month = month_index.rem_euclid(12) + 1;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ValueError::YearOutOfRange(year));
        }
        let day = self.day.min(days_in_month(year, month));
        let year = year.checked_add(years).ok_or(ValueError::Overflow)?;
        Date::new(day, month, year).or_else(|err| match err {
            ValueError::InvalidDate { .. } => Date::new(28, 2, year),
            other => Err(other),
        })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.day, self.month, self.year)
    }
}

/// A validated wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time {
    hour: i64,
    minute: i64,
    second: i64,
}

impl Time {
    pub fn new(hour: i64, minute: i64, second: i64) -> Result<Time, ValueError> {
        if !(0..=23).contains(&hour) || !(0..=59).contains(&minute) || !(0..=59).contains(&second) {
            return Err(ValueError::InvalidTime { hour, minute, second });
        }
        Ok(Time { hour, minute, second })
    }

    pub fn hour(&self) -> i64 {
        self.hour
    }

    pub fn minute(&self) -> i64 {
        self.minute
    }

    pub fn second(&self) -> i64 {
        self.second
    }

    fn to_seconds(self) -> i64 {
        self.hour * SECONDS_PER_HOUR + self.minute * SECONDS_PER_MINUTE + self.second
    }

    fn from_seconds(seconds_of_day: i64) -> Time {
        Time {
            hour: seconds_of_day / SECONDS_PER_HOUR,
            minute: seconds_of_day % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
            second: seconds_of_day % SECONDS_PER_MINUTE,
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// A date paired with a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateTime {
    date: Date,
    time: Time,
}

impl DateTime {
    pub fn new(
        day: i64,
        month: i64,
        year: i64,
        hour: i64,
        minute: i64,
        second: i64,
    ) -> Result<DateTime, ValueError> {
        Ok(DateTime {
            date: Date::new(day, month, year)?,
            time: Time::new(hour, minute, second)?,
        })
    }

    pub fn from_parts(date: Date, time: Time) -> DateTime {
        DateTime { date, time }
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn time(&self) -> Time {
        self.time
    }

    /// Seconds since 1970-01-01 00:00:00, negative before it.
    fn to_seconds(self) -> i64 {
        self.date.to_days() * SECONDS_PER_DAY + self.time.to_seconds()
    }

    fn from_seconds(total: i64) -> Result<DateTime, ValueError> {
        let date = Date::from_days(total.div_euclid(SECONDS_PER_DAY))?;
        let time = Time::from_seconds(total.rem_euclid(SECONDS_PER_DAY));
        Ok(DateTime { date, time })
    }

    pub fn add_timedelta(self, delta: &Timedelta) -> Result<DateTime, ValueError> {
        let date = self.date.add_years_months(delta.years, delta.months)?;
        let base = DateTime { date, time: self.time }.to_seconds();
        let total = base
            .checked_add(delta.sub_month_seconds().ok_or(ValueError::Overflow)?)
            .ok_or(ValueError::Overflow)?;
        DateTime::from_seconds(total)
    }

    /// Decomposes the span between two datetimes into a timedelta: whole
    /// years and months first (counted on the calendar, correcting when
    /// the day of month has not been reached yet), then the remaining
    /// span as weeks, days, hours, minutes and seconds.
    pub fn sub_datetime(self, other: DateTime) -> Result<Timedelta, ValueError> {
        let (years, months) = years_months_between(self.date, other.date);
        let shifted = DateTime {
            date: other.date.add_years_months(years, months)?,
            time: other.time,
        };
        let total = self.to_seconds() - shifted.to_seconds();
        let total_days = total.div_euclid(SECONDS_PER_DAY);
        let seconds_of_day = total.rem_euclid(SECONDS_PER_DAY);
        let weeks = total_days.div_euclid(7);
        Ok(Timedelta {
            years,
            months,
            weeks,
            days: total_days - weeks * 7,
            hours: seconds_of_day / SECONDS_PER_HOUR,
            minutes: seconds_of_day % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
            seconds: seconds_of_day % SECONDS_PER_MINUTE,
        })
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.date, self.time)
    }
}

/// A calendar span with seven independent signed fields. Never normalised:
/// `'1M'` and `'30D'` stay distinct quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timedelta {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Timedelta {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        years: i64,
        months: i64,
        weeks: i64,
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    ) -> Timedelta {
        Timedelta {
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    fn total_months(&self) -> Option<i64> {
        self.years.checked_mul(12)?.checked_add(self.months)
    }

    fn sub_month_seconds(&self) -> Option<i64> {
        self.weeks
            .checked_mul(SECONDS_PER_WEEK)?
            .checked_add(self.days.checked_mul(SECONDS_PER_DAY)?)?
            .checked_add(self.hours.checked_mul(SECONDS_PER_HOUR)?)?
            .checked_add(self.minutes.checked_mul(SECONDS_PER_MINUTE)?)?
            .checked_add(self.seconds)
    }

    /// True when both spans denote the same duration: equal whole-month
    /// parts and equal sub-month parts. Months never unify with days.
    pub fn same_duration(&self, other: &Timedelta) -> bool {
        self.total_months() == other.total_months()
            && self.sub_month_seconds() == other.sub_month_seconds()
    }

    /// Coarse ordering key: a month weighs as 31 days, sub-month fields
    /// count in whole days. Makes `'1M'` compare above `'31D'` and below
    /// `'32D'`.
    fn ordering_key(&self) -> Option<i64> {
        let months = self.total_months()?.checked_mul(31)?;
        months.checked_add(self.sub_month_seconds()?.div_euclid(SECONDS_PER_DAY))
    }

    pub fn precedes(&self, other: &Timedelta) -> Result<bool, ValueError> {
        let lhs = self.ordering_key().ok_or(ValueError::Overflow)?;
        let rhs = other.ordering_key().ok_or(ValueError::Overflow)?;
        Ok(lhs < rhs)
    }

    pub fn is_zero(&self) -> bool {
        *self == Timedelta::default()
    }

    fn combine(
        &self,
        other: &Timedelta,
        merge: impl Fn(i64, i64) -> Option<i64>,
    ) -> Result<Timedelta, ValueError> {
        Ok(Timedelta {
            years: merge(self.years, other.years).ok_or(ValueError::Overflow)?,
            months: merge(self.months, other.months).ok_or(ValueError::Overflow)?,
            weeks: merge(self.weeks, other.weeks).ok_or(ValueError::Overflow)?,
            days: merge(self.days, other.days).ok_or(ValueError::Overflow)?,
            hours: merge(self.hours, other.hours).ok_or(ValueError::Overflow)?,
            minutes: merge(self.minutes, other.minutes).ok_or(ValueError::Overflow)?,
            seconds: merge(self.seconds, other.seconds).ok_or(ValueError::Overflow)?,
        })
    }

    pub fn add(&self, other: &Timedelta) -> Result<Timedelta, ValueError> {
        self.combine(other, i64::checked_add)
    }

    pub fn sub(&self, other: &Timedelta) -> Result<Timedelta, ValueError> {
        self.combine(other, i64::checked_sub)
    }

    pub fn scale(&self, factor: i64) -> Result<Timedelta, ValueError> {
        self.combine(&Timedelta::default(), |field, _| field.checked_mul(factor))
    }

    /// Field-wise floor division, matching the rounding of the language's
    /// integer-on-timedelta division.
    pub fn divide(&self, divisor: i64) -> Result<Timedelta, ValueError> {
        if divisor == 0 {
            return Err(ValueError::DivisionByZero);
        }
        self.combine(&Timedelta::default(), |field, _| {
            floor_div(field, divisor)
        })
    }

    pub fn negate(&self) -> Result<Timedelta, ValueError> {
        self.combine(&Timedelta::default(), |field, _| field.checked_neg())
    }

    pub fn field(&self, unit: TimeUnit) -> i64 {
        match unit {
            TimeUnit::Years => self.years,
            TimeUnit::Months => self.months,
            TimeUnit::Weeks => self.weeks,
            TimeUnit::Days => self.days,
            TimeUnit::Hours => self.hours,
            TimeUnit::Minutes => self.minutes,
            TimeUnit::Seconds => self.seconds,
        }
    }
}

impl fmt::Display for Timedelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}Y {}M {}W {}D {}h {}m {}s'",
            self.years, self.months, self.weeks, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

pub fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

// Gregorian <-> day-count conversion on the proleptic calendar, anchored
// at 1970-01-01 (Howard Hinnant's civil-days construction).
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = if year >= 0 { year } else { year - 399 } / 400;
    let year_of_era = year - era * 400;
    let month_shifted = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * month_shifted + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146097 + day_of_era - 719468
}

fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let shifted = days + 719468;
    let era = if shifted >= 0 { shifted } else { shifted - 146096 } / 146097;
    let day_of_era = shifted - era * 146097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146096) / 365;
    let year = year_of_era + era * 400;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let month_shifted = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * month_shifted + 2) / 5 + 1;
    let month = if month_shifted < 10 {
        month_shifted + 3
    } else {
        month_shifted - 9
    };
    (if month <= 2 { year + 1 } else { year }, month, day)
}

/// Whole years and months between two dates, correcting downward when the
/// day of month on `left` has not yet reached the day of month on `right`.
fn years_months_between(left: Date, right: Date) -> (i64, i64) {
    let probe = Date {
        year: left.year,
        month: right.month,
        day: right.day.min(days_in_month(left.year, right.month)),
    };
    let years = (left.year - right.year) - i64::from(left < probe);
    let probe = Date {
        year: left.year,
        month: left.month,
        day: right.day.min(days_in_month(left.year, left.month)),
    };
    let months = ((left.month - right.month) - i64::from(left < probe)).rem_euclid(12);
    (years, months)
}

/// A runtime value of the language.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Str(String),
    Date(Date),
    Time(Time),
    DateTime(DateTime),
    Timedelta(Timedelta),
}

/// Datelike values promote to a common [`DateTime`] before comparison or
/// span arithmetic: a date gets midnight, a bare time gets day one of the
/// calendar.
fn promote(value: &Value) -> Option<DateTime> {
    match value {
        Value::Date(d) => Some(DateTime {
            date: *d,
            time: Time { hour: 0, minute: 0, second: 0 },
        }),
        Value::Time(t) => Some(DateTime {
            date: Date { year: 1, month: 1, day: 1 },
            time: *t,
        }),
        Value::DateTime(dt) => Some(*dt),
        _ => None,
    }
}

/// A `Date` and a bare `Time` never promote against *each other*: their
/// comparison is undefined and their difference is rejected.
fn promotable_pair(lhs: &Value, rhs: &Value) -> bool {
    matches!(
        (lhs, rhs),
        (Value::DateTime(_), _) | (_, Value::DateTime(_))
    ) || std::mem::discriminant(lhs) == std::mem::discriminant(rhs)
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
            Value::Timedelta(_) => "timedelta",
        }
    }

    /// Zero, the empty string and the minimal temporal of each kind are
    /// false; everything else is true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            Value::Date(d) => *d != Date { year: 1, month: 1, day: 1 },
            Value::Time(t) => *t != Time { hour: 0, minute: 0, second: 0 },
            Value::DateTime(dt) => {
                dt.date != Date { year: 1, month: 1, day: 1 }
                    || dt.time != Time { hour: 0, minute: 0, second: 0 }
            }
            Value::Timedelta(td) => !td.is_zero(),
        }
    }

    pub fn add(&self, rhs: &Value) -> Result<Value, ValueError> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                a.checked_add(*b).map(Value::Int).ok_or(ValueError::Overflow)
            }
            (Value::Str(_), _) | (_, Value::Str(_)) => {
                Ok(Value::Str(format!("{}{}", self, rhs)))
            }
            (Value::Date(d), Value::Time(t)) | (Value::Time(t), Value::Date(d)) => {
                Ok(Value::DateTime(DateTime { date: *d, time: *t }))
            }
            (Value::Timedelta(a), Value::Timedelta(b)) => a.add(b).map(Value::Timedelta),
            (Value::Date(_) | Value::Time(_) | Value::DateTime(_), Value::Timedelta(td)) => {
                let base = promote(self).expect("datelike operand");
                base.add_timedelta(td).map(Value::DateTime)
            }
            (Value::Timedelta(td), Value::Date(_) | Value::Time(_) | Value::DateTime(_)) => {
                let base = promote(rhs).expect("datelike operand");
                base.add_timedelta(td).map(Value::DateTime)
            }
            _ => Err(self.binary_mismatch("+", rhs)),
        }
    }

    pub fn sub(&self, rhs: &Value) -> Result<Value, ValueError> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                a.checked_sub(*b).map(Value::Int).ok_or(ValueError::Overflow)
            }
            (Value::Timedelta(a), Value::Timedelta(b)) => a.sub(b).map(Value::Timedelta),
            (Value::Date(_) | Value::Time(_) | Value::DateTime(_), Value::Timedelta(td)) => {
                let base = promote(self).expect("datelike operand");
                base.add_timedelta(&td.negate()?).map(Value::DateTime)
            }
            (
                Value::Date(_) | Value::Time(_) | Value::DateTime(_),
                Value::Date(_) | Value::Time(_) | Value::DateTime(_),
            ) => {
                if !promotable_pair(self, rhs) {
                    return Err(self.binary_mismatch("-", rhs));
                }
                let left = promote(self).expect("datelike operand");
                let right = promote(rhs).expect("datelike operand");
                left.sub_datetime(right).map(Value::Timedelta)
            }
            _ => Err(self.binary_mismatch("-", rhs)),
        }
    }

    pub fn mul(&self, rhs: &Value) -> Result<Value, ValueError> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                a.checked_mul(*b).map(Value::Int).ok_or(ValueError::Overflow)
            }
            (Value::Timedelta(td), Value::Int(n)) => td.scale(*n).map(Value::Timedelta),
            _ => Err(self.binary_mismatch("*", rhs)),
        }
    }

    /// Integer division truncates toward zero; dividing a timedelta by an
    /// integer floors each field. No other division exists.
    pub fn div(&self, rhs: &Value) -> Result<Value, ValueError> {
        match (self, rhs) {
            (Value::Int(_), Value::Int(0)) => Err(ValueError::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => {
                a.checked_div(*b).map(Value::Int).ok_or(ValueError::Overflow)
            }
            (Value::Timedelta(td), Value::Int(n)) => td.divide(*n).map(Value::Timedelta),
            _ => Err(self.binary_mismatch("/", rhs)),
        }
    }

    pub fn negate(&self) -> Result<Value, ValueError> {
        match self {
            Value::Int(n) => n.checked_neg().map(Value::Int).ok_or(ValueError::Overflow),
            Value::Timedelta(td) => td.negate().map(Value::Timedelta),
            _ => Err(ValueError::UnaryTypeMismatch {
                op: "-",
                operand: self.kind(),
            }),
        }
    }

    /// Equality is total: values of categories that cannot be promoted to
    /// a common one simply compare unequal.
    pub fn equals(&self, rhs: &Value) -> bool {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Timedelta(a), Value::Timedelta(b)) => a.same_duration(b),
            (
                Value::Date(_) | Value::Time(_) | Value::DateTime(_),
                Value::Date(_) | Value::Time(_) | Value::DateTime(_),
            ) => {
                promotable_pair(self, rhs)
                    && promote(self).expect("datelike operand")
                        == promote(rhs).expect("datelike operand")
            }
            _ => false,
        }
    }

    /// Strict ordering. Unlike equality this is partial: categories with
    /// no common promotion cannot be ordered.
    pub fn precedes(&self, rhs: &Value) -> Result<bool, ValueError> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(a < b),
            (Value::Str(a), Value::Str(b)) => Ok(a < b),
            (Value::Timedelta(a), Value::Timedelta(b)) => a.precedes(b),
            (
                Value::Date(_) | Value::Time(_) | Value::DateTime(_),
                Value::Date(_) | Value::Time(_) | Value::DateTime(_),
            ) => {
                if !promotable_pair(self, rhs) {
                    return Err(ValueError::NotOrdered {
                        lhs: self.kind(),
                        rhs: rhs.kind(),
                    });
                }
                Ok(promote(self).expect("datelike operand")
                    < promote(rhs).expect("datelike operand"))
            }
            _ => Err(ValueError::NotOrdered {
                lhs: self.kind(),
                rhs: rhs.kind(),
            }),
        }
    }

    /// Reads the named field of a temporal value: calendar units of dates,
    /// clock units of times, both of datetimes, any of timedeltas.
    pub fn time_info(&self, unit: TimeUnit) -> Result<i64, ValueError> {
        let field = match (self, unit) {
            (Value::Date(d), TimeUnit::Years) => Some(d.year()),
            (Value::Date(d), TimeUnit::Months) => Some(d.month()),
            (Value::Date(d), TimeUnit::Days) => Some(d.day()),
            (Value::DateTime(dt), TimeUnit::Years) => Some(dt.date().year()),
            (Value::DateTime(dt), TimeUnit::Months) => Some(dt.date().month()),
            (Value::DateTime(dt), TimeUnit::Days) => Some(dt.date().day()),
            (Value::DateTime(dt), TimeUnit::Hours) => Some(dt.time().hour()),
            (Value::DateTime(dt), TimeUnit::Minutes) => Some(dt.time().minute()),
            (Value::DateTime(dt), TimeUnit::Seconds) => Some(dt.time().second()),
            (Value::Time(t), TimeUnit::Hours) => Some(t.hour()),
            (Value::Time(t), TimeUnit::Minutes) => Some(t.minute()),
            (Value::Time(t), TimeUnit::Seconds) => Some(t.second()),
            (Value::Timedelta(td), unit) => Some(td.field(unit)),
            _ => None,
        };
        field.ok_or(ValueError::NoSuchField {
            unit: unit.name(),
            value: self.kind(),
        })
    }

    fn binary_mismatch(&self, op: &'static str, rhs: &Value) -> ValueError {
        ValueError::BinaryTypeMismatch {
            op,
            lhs: self.kind(),
            rhs: rhs.kind(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t),
            Value::DateTime(dt) => write!(f, "{}", dt),
            Value::Timedelta(td) => write!(f, "{}", td),
        }
    }
}
