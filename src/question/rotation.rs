//! Day-of-year question rotation.
//!
//! The question for a day is `pool[(day_of_year - 1) % pool.len()]`, where the
//! day-of-year is computed in an explicit time zone. Every pool element is
//! visited once per `pool.len()` days, and the cycle restarts with day 1 of
//! each year.

use crate::question::selection::{resolve_selection, SelectionDecision, StoredSelection};
use crate::question::types::{normalize_pool, FeedbackQuestion};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Computes the 1-based ordinal day of the year for an instant.
pub trait DayCalendar {
    fn day_of_year(&self, instant: DateTime<Utc>) -> u32;
}

impl<F> DayCalendar for F
where
    F: Fn(DateTime<Utc>) -> u32,
{
    fn day_of_year(&self, instant: DateTime<Utc>) -> u32 {
        self(instant)
    }
}

/// Gregorian calendar evaluated in a fixed IANA time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedCalendar {
    tz: Tz,
}

impl ZonedCalendar {
    /// Create a calendar for the given zone.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Calendar evaluated in UTC.
    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// Create a calendar from an IANA zone name such as `Europe/Berlin`.
    pub fn from_name(name: &str) -> Result<Self, CalendarError> {
        let tz: Tz = name
            .trim()
            .parse()
            .map_err(|_| CalendarError::UnknownTimeZone(name.to_string()))?;
        Ok(Self::new(tz))
    }

    /// The zone this calendar evaluates in.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The local calendar date of an instant.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Local noon on `date`, as a UTC instant.
    ///
    /// Noon is used rather than midnight so DST transitions never make the
    /// local time ambiguous or nonexistent.
    pub fn noon_on(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0)?);
        self.tz
            .from_local_datetime(&noon)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}

impl Default for ZonedCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayCalendar for ZonedCalendar {
    fn day_of_year(&self, instant: DateTime<Utc>) -> u32 {
        instant.with_timezone(&self.tz).ordinal()
    }
}

/// Errors building a calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    UnknownTimeZone(String),
}

impl std::fmt::Display for CalendarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarError::UnknownTimeZone(name) => write!(f, "Unknown time zone: {name}"),
        }
    }
}

impl std::error::Error for CalendarError {}

/// Pick the question for a 1-based day-of-year.
///
/// An empty pool is replaced by the built-in pool. Day 0 is treated as day 1.
pub fn question_for_day_of_year(pool: &[FeedbackQuestion], day_of_year: u32) -> FeedbackQuestion {
    let source = normalize_pool(pool);
    let index = (day_of_year.max(1) - 1) as usize % source.len();
    source[index].clone()
}

/// Pick the question for the day containing `instant` in `calendar`.
pub fn question_for_day<C>(
    pool: &[FeedbackQuestion],
    instant: DateTime<Utc>,
    calendar: &C,
) -> FeedbackQuestion
where
    C: DayCalendar + ?Sized,
{
    question_for_day_of_year(pool, calendar.day_of_year(instant))
}

/// A question pool bound to a calendar.
#[derive(Debug, Clone)]
pub struct QuestionRotator<C = ZonedCalendar> {
    pool: Vec<FeedbackQuestion>,
    calendar: C,
}

impl<C: DayCalendar> QuestionRotator<C> {
    /// Create a rotator. An empty pool is replaced by the built-in pool.
    pub fn new(pool: Vec<FeedbackQuestion>, calendar: C) -> Self {
        Self {
            pool: normalize_pool(&pool),
            calendar,
        }
    }

    /// The active (never empty) pool.
    pub fn pool(&self) -> &[FeedbackQuestion] {
        &self.pool
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Day-of-year of `instant` in this rotator's calendar.
    pub fn day_of_year(&self, instant: DateTime<Utc>) -> u32 {
        self.calendar.day_of_year(instant)
    }

    /// The question for the day containing `instant`, ignoring stored state.
    pub fn question_for(&self, instant: DateTime<Utc>) -> FeedbackQuestion {
        question_for_day(&self.pool, instant, &self.calendar)
    }

    /// The question for the day containing `instant`, preferring a stored
    /// selection made earlier the same day.
    pub fn resolve(
        &self,
        stored: Option<&StoredSelection>,
        instant: DateTime<Utc>,
    ) -> SelectionDecision {
        resolve_selection(stored, self.day_of_year(instant), &self.pool)
    }
}
