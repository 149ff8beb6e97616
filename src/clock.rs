// Business-time helpers
//
// Every "today / this week / this month" decision in the system is made in the
// fixed business timezone (Asia/Manila), never in the host timezone. Stored
// timestamps are UTC; they are converted to a business-local calendar date
// before any comparison.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Fixed business timezone. The server may run anywhere; date bucketing does not.
pub const BUSINESS_TZ: Tz = chrono_tz::Asia::Manila;

/// Business-local calendar date of a UTC instant.
///
/// An order stored at `2025-06-09T16:30:00Z` is `2025-06-10T00:30:00+08:00`
/// locally and therefore buckets under 2025-06-10.
pub fn business_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&BUSINESS_TZ).date_naive()
}

/// Business-local "today" for a given clock reading.
pub fn business_today(now: DateTime<Utc>) -> NaiveDate {
    business_date(now)
}

/// UTC instant at which a business-local calendar day begins.
pub fn day_start_utc(date: NaiveDate) -> DateTime<Utc> {
    // Manila has no DST; midnight always exists exactly once.
    BUSINESS_TZ
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).expect("valid midnight"))
        .single()
        .expect("unambiguous local midnight")
        .with_timezone(&Utc)
}

/// Half-open UTC span `[start, end)` covering one business-local day.
pub fn day_range_utc(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day_start_utc(date);
    (start, start + Duration::days(1))
}

/// Monday..=Sunday week containing `date`. Used by the admin catalog filter.
pub fn admin_week(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = date.weekday().num_days_from_monday() as i64;
    let start = date - Duration::days(back);
    (start, start + Duration::days(6))
}

/// Sunday..=Saturday week containing `date`. Used by the weekly reservation menu.
///
/// Deliberately a separate convention from [`admin_week`]; the two call sites
/// have always disagreed and their visible output depends on it.
pub fn reservation_week(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = date.weekday().num_days_from_sunday() as i64;
    let start = date - Duration::days(back);
    (start, start + Duration::days(6))
}

/// First day of the month containing `date`, and first day of the next month.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("valid month start");
    let next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .expect("valid next month");
    (start, next)
}

/// Half-open UTC span of the month containing `date`.
pub fn month_range_utc(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let (start, next) = month_bounds(date);
    (day_start_utc(start), day_start_utc(next))
}
