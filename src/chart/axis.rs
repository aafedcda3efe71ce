//! Category-axis labeling for the weekly and monthly chart variants.
//!
//! These are rendering policies, not data-shaping rules: week numbers label
//! as the calendar date of the week's Monday, month numbers as short names,
//! and tick density drops on narrow viewports.

use chrono::{Datelike, NaiveDate, Weekday};

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Monday of the given ISO week (week 1 is the week containing January 4th).
pub fn iso_week_start(year: i32, week: u32) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

/// "MM/DD" tick label for a weekly axis.
pub fn week_label(year: i32, week: u32) -> Option<String> {
    iso_week_start(year, week).map(|date| format!("{:02}/{:02}", date.month(), date.day()))
}

/// Short month name for a 1-based month number.
pub fn month_abbrev(month: u32) -> Option<&'static str> {
    MONTH_ABBREV.get(month.checked_sub(1)? as usize).copied()
}

/// Whether a weekly tick is drawn. Narrow viewports show weeks 4, 12, 20,
/// ..., 52; wide viewports every fourth week.
pub fn week_tick_visible(week: u32, small_screen: bool) -> bool {
    if small_screen {
        week <= 52 && week >= 4 && (week - 4) % 8 == 0
    } else {
        week <= 52 && week % 4 == 0
    }
}

/// Whether a monthly tick is drawn. Narrow viewports show even months only.
pub fn month_tick_visible(month: u32, small_screen: bool) -> bool {
    if small_screen {
        (1..=12).contains(&month) && month % 2 == 0
    } else {
        (1..=12).contains(&month)
    }
}
