//! Time source for source selection and cache expiry

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use std::sync::RwLock;

/// Provides "now" and "today" so callers never read the system clock directly
pub trait Clock: Send + Sync {
    /// Current instant, used for cache expiry
    fn now(&self) -> DateTime<Utc>;

    /// Today's local calendar date, used to compute forecast horizons
    fn today(&self) -> NaiveDate;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
    today: RwLock<NaiveDate>,
}

impl ManualClock {
    /// Start at midnight UTC on `today`
    pub fn new(today: NaiveDate) -> Self {
        let now = today.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
        Self {
            now: RwLock::new(now),
            today: RwLock::new(today),
        }
    }

    /// Move "now" forward without changing "today"
    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.write() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.read().map(|now| *now).unwrap_or_else(|e| *e.into_inner())
    }

    fn today(&self) -> NaiveDate {
        self.today
            .read()
            .map(|today| *today)
            .unwrap_or_else(|e| *e.into_inner())
    }
}
