//! Billing windows derived from a calendar date.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Date format accepted from clients (`MM/DD/YYYY`).
pub const BILLING_DATE_FORMAT: &str = "%m/%d/%Y";

/// Reasons a billing period could not be derived.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingPeriodError {
    /// The input did not match `MM/DD/YYYY`.
    #[error("currentDate must use the MM/DD/YYYY format, got {input:?}")]
    Unparseable { input: String },
    /// The month lies at the edge of the representable calendar.
    #[error("currentDate is out of range")]
    OutOfRange,
}

/// Inclusive window covering one calendar month.
///
/// # Examples
/// ```
/// use shems::domain::BillingPeriod;
///
/// let period = BillingPeriod::containing("02/17/2024").unwrap();
/// assert_eq!(period.start().to_string(), "2024-02-01 00:00:00");
/// assert_eq!(period.end().to_string(), "2024-02-29 23:59:59");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl BillingPeriod {
    /// Month containing `date`; the day component is ignored.
    pub fn containing(date: &str) -> Result<Self, BillingPeriodError> {
        let parsed = NaiveDate::parse_from_str(date.trim(), BILLING_DATE_FORMAT).map_err(|_| {
            BillingPeriodError::Unparseable {
                input: date.to_owned(),
            }
        })?;
        Self::for_month(parsed.year(), parsed.month())
    }

    /// Window from the first second of the month to one second before the
    /// next month starts.
    pub fn for_month(year: i32, month: u32) -> Result<Self, BillingPeriodError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(BillingPeriodError::OutOfRange)?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(BillingPeriodError::OutOfRange)?;
        let start = first.and_hms_opt(0, 0, 0).ok_or(BillingPeriodError::OutOfRange)?;
        let end = next_first
            .and_hms_opt(0, 0, 0)
            .ok_or(BillingPeriodError::OutOfRange)?
            - Duration::seconds(1);
        Ok(Self { start, end })
    }

    /// First instant of the window.
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Last instant of the window (inclusive).
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Whether `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}
