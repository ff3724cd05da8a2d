//! Issue dates.

use chrono::{Datelike, Duration, NaiveDate};
use newsletter_rs_core::Interval;

/// Formats the date shown in the newsletter header.
///
/// Weekly issues show the Monday of `today`'s week, monthly issues the month
/// and year, daily issues `today` itself.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use newsletter_rs_core::Interval;
/// use newsletter_rs_digest::newsletter_date;
///
/// let thursday = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
/// assert_eq!(newsletter_date(Interval::Weekly, thursday), "March 04, 2024");
/// assert_eq!(newsletter_date(Interval::Monthly, thursday), "March 2024");
/// assert_eq!(newsletter_date(Interval::Daily, thursday), "March 07, 2024");
/// ```
pub fn newsletter_date(interval: Interval, today: NaiveDate) -> String {
    match interval {
        Interval::Weekly => week_start(today).format("%B %d, %Y").to_string(),
        Interval::Monthly => today.format("%B %Y").to_string(),
        Interval::Daily => today.format("%B %d, %Y").to_string(),
    }
}

/// Returns the Monday on or before `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}
