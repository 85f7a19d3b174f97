//! Expiry window arithmetic shared by the scanner and the upload alert.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

/// Days ahead of now that count as "expiring soon".
pub const EXPIRY_WINDOW_DAYS: i64 = 7;

/// Look-ahead window used to decide whether a medicine is expiring soon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryWindow {
    lookahead: TimeDelta,
}

impl Default for ExpiryWindow {
    fn default() -> Self {
        Self::days(EXPIRY_WINDOW_DAYS)
    }
}

impl ExpiryWindow {
    pub fn days(days: i64) -> Self {
        Self {
            lookahead: TimeDelta::days(days),
        }
    }

    /// Whole days until expiry when `now <= expires_at <= now + window`.
    ///
    /// Already-expired medicines are not due.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeDelta, Utc};
    /// use medcycle::domain::ExpiryWindow;
    ///
    /// let now = Utc::now();
    /// let window = ExpiryWindow::default();
    /// assert_eq!(window.days_remaining(now + TimeDelta::days(7), now), Some(7));
    /// assert_eq!(window.days_remaining(now + TimeDelta::days(8), now), None);
    /// ```
    pub fn days_remaining(&self, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<i64> {
        if expires_at < now || expires_at > now + self.lookahead {
            return None;
        }
        Some((expires_at - now).num_days())
    }

    /// Whether an upload should alert its owner straight away.
    ///
    /// Unlike [`Self::days_remaining`], already-expired medicines alert too.
    pub fn alerts_on_upload(&self, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        expires_at <= now + self.lookahead
    }
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case::exactly_seven_days(TimeDelta::days(7), Some(7))]
    #[case::just_inside(TimeDelta::days(6) + TimeDelta::hours(23), Some(6))]
    #[case::right_now(TimeDelta::zero(), Some(0))]
    #[case::eight_days(TimeDelta::days(8), None)]
    #[case::one_second_past_window(TimeDelta::days(7) + TimeDelta::seconds(1), None)]
    #[case::already_expired(TimeDelta::days(-1), None)]
    fn days_remaining_honours_inclusive_window(
        now: DateTime<Utc>,
        #[case] offset: TimeDelta,
        #[case] expected: Option<i64>,
    ) {
        let window = ExpiryWindow::default();
        assert_eq!(window.days_remaining(now + offset, now), expected);
    }

    #[rstest]
    #[case::expired(TimeDelta::days(-3), true)]
    #[case::inside(TimeDelta::days(7), true)]
    #[case::outside(TimeDelta::days(8), false)]
    fn upload_alert_includes_expired_medicines(
        now: DateTime<Utc>,
        #[case] offset: TimeDelta,
        #[case] expected: bool,
    ) {
        assert_eq!(
            ExpiryWindow::default().alerts_on_upload(now + offset, now),
            expected
        );
    }

    #[rstest]
    fn start_of_day_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 8).expect("valid date");
        let expected = Utc
            .with_ymd_and_hms(2026, 3, 8, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(start_of_day_utc(date), expected);
    }
}
