use chrono::{Datelike, Duration, Local, NaiveDate, Utc, Weekday};
use serde::Serialize;

const KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    #[default]
    Local,
    Utc,
}

impl DayBoundary {
    pub fn today(self) -> NaiveDate {
        match self {
            DayBoundary::Local => Local::now().date_naive(),
            DayBoundary::Utc => Utc::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekdayLocale {
    #[default]
    En,
    Hr,
}

impl WeekdayLocale {
    pub fn short_label(self, weekday: Weekday) -> &'static str {
        const EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        const HR: [&str; 7] = ["Pon", "Uto", "Sri", "Čet", "Pet", "Sub", "Ned"];
        let idx = weekday.num_days_from_monday() as usize;
        match self {
            WeekdayLocale::En => EN[idx],
            WeekdayLocale::Hr => HR[idx],
        }
    }
}

pub fn date_to_key(date: NaiveDate) -> String {
    date.format(KEY_FORMAT).to_string()
}

pub fn parse_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, KEY_FORMAT).ok()
}

/// Like [`parse_key`], but a malformed key is a caller bug and asserts in debug builds.
pub(crate) fn key_date(key: &str) -> Option<NaiveDate> {
    let date = parse_key(key);
    debug_assert!(date.is_some(), "malformed date key: {key:?}");
    date
}

pub fn is_same_day(key: &str, today: NaiveDate) -> bool {
    key_date(key) == Some(today)
}

pub fn is_future_key(key: &str, today: NaiveDate) -> bool {
    key_date(key).is_some_and(|date| date > today)
}

/// Key `n` days before `key` (after it when `n` is negative), or `None` past chrono's range.
pub fn offset_days(key: &str, n: i64) -> Option<String> {
    let date = key_date(key)?;
    let shifted = date.checked_sub_signed(Duration::try_days(n)?)?;
    Some(date_to_key(shifted))
}

pub fn days_in_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|date| date.month() == month)
        .collect()
}

pub fn first_weekday_offset(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| date.weekday().num_days_from_monday())
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// `None` unless the month's first day is a representable date.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::of)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(self) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year.checked_sub(1)?, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    pub fn next(self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year.checked_add(1)?, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn keys_are_zero_padded() {
        assert_eq!(date_to_key(day(2024, 3, 7)), "2024-03-07");
        assert_eq!(parse_key("2024-03-07"), Some(day(2024, 3, 7)));
        assert_eq!(parse_key("07.03.2024"), None);
    }

    #[test]
    fn same_day_and_future_ignore_time_of_day() {
        let today = day(2024, 1, 2);
        assert!(is_same_day("2024-01-02", today));
        assert!(!is_same_day("2024-01-01", today));
        assert!(is_future_key("2024-01-03", today));
        assert!(!is_future_key("2024-01-02", today));
        assert!(!is_future_key("2023-12-31", today));
    }

    #[test]
    fn offset_crosses_month_and_year() {
        assert_eq!(offset_days("2024-01-01", 1).as_deref(), Some("2023-12-31"));
        assert_eq!(offset_days("2024-02-28", -1).as_deref(), Some("2024-02-29"));
        assert_eq!(offset_days("2024-03-01", 0).as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn offset_beyond_calendar_range_is_none() {
        assert_eq!(offset_days("2024-01-10", 1_000_000_000), None);
        assert_eq!(offset_days("2024-01-10", i64::MAX), None);
        assert_eq!(offset_days("2024-01-10", i64::MIN), None);
    }

    #[test]
    fn month_grid_helpers() {
        assert_eq!(days_in_month(2024, 2).len(), 29);
        assert_eq!(days_in_month(2023, 2).len(), 28);
        assert!(days_in_month(2023, 13).is_empty());
        // 2024-01-01 was a Monday, 2023-10-01 a Sunday.
        assert_eq!(first_weekday_offset(2024, 1), 0);
        assert_eq!(first_weekday_offset(2023, 10), 6);

        let jan = YearMonth { year: 2024, month: 1 };
        assert_eq!(jan.previous(), Some(YearMonth { year: 2023, month: 12 }));
        assert_eq!(jan.previous().and_then(YearMonth::next), Some(jan));
    }

    #[test]
    fn year_month_stays_inside_chrono_range() {
        assert_eq!(YearMonth::new(2024, 13), None);
        assert_eq!(YearMonth::new(i32::MAX, 1), None);
        assert_eq!(YearMonth::new(2024, 2), Some(YearMonth { year: 2024, month: 2 }));

        let last = YearMonth::of(NaiveDate::MAX);
        assert_eq!(last.next(), None);
        assert!(last.previous().is_some());
        let first = YearMonth::of(NaiveDate::MIN);
        assert_eq!(first.previous(), None);
        assert!(first.next().is_some());

        let bogus = YearMonth { year: i32::MAX, month: 12 };
        assert_eq!(bogus.next(), None);
        let bogus = YearMonth { year: i32::MIN, month: 1 };
        assert_eq!(bogus.previous(), None);
    }

    #[test]
    fn weekday_labels_follow_locale() {
        assert_eq!(WeekdayLocale::En.short_label(Weekday::Sun), "Sun");
        assert_eq!(WeekdayLocale::Hr.short_label(Weekday::Thu), "Čet");
    }
}
