//! Date helper functions

use chrono::{Datelike, Local, NaiveDate};

/// Format a date as "January 5, 2024", optionally followed by a relative
/// qualifier computed against today, e.g. "January 5, 2024 (2 days ago)".
pub fn format_date(date: NaiveDate, include_relative: bool) -> String {
    format_date_at(date, include_relative, Local::now().date_naive())
}

/// Same as [`format_date`] with an explicit reference date
pub fn format_date_at(date: NaiveDate, include_relative: bool, today: NaiveDate) -> String {
    let full = full_date(date);
    if include_relative {
        format!("{} ({})", full, relative_date(date, today))
    } else {
        full
    }
}

/// Format date in full format (like "January 5, 2024")
pub fn full_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Format in ISO 8601 (`2024-01-05`)
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Relative description of `date` as seen from `today`
pub fn relative_date(date: NaiveDate, today: NaiveDate) -> String {
    let days = today.signed_duration_since(date).num_days();

    if days < 0 {
        return "in the future".to_string();
    }
    if days == 0 {
        return "Today".to_string();
    }
    if days == 1 {
        return "Yesterday".to_string();
    }

    let months = months_between(date, today);
    if months == 0 {
        return format!("{} days ago", days);
    }
    if months < 12 {
        return plural(months, "month");
    }
    plural(months / 12, "year")
}

/// Whole calendar months elapsed from `from` to `to` (`from <= to`)
fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut months =
        (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64);
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0)
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}
