use chrono::{Datelike, Duration, NaiveDate, Weekday};
use shared::{DayKind, DomainError, DomainResult};

/// One calendar day of the planning horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Day {
    pub date: NaiveDate,
    pub kind: DayKind,
}

impl Day {
    pub fn new(date: NaiveDate) -> Day {
        Day {
            date,
            kind: classify(date),
        }
    }

    pub fn is_workday(&self) -> bool {
        self.kind == DayKind::Workday
    }

    pub fn is_weekend(&self) -> bool {
        self.kind == DayKind::Weekend
    }

    pub fn is_weekend_or_holiday(&self) -> bool {
        !self.is_workday()
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

/// Builds the ordered day list for the horizon, inclusive of both endpoints.
pub fn day_span(start_date: NaiveDate, end_date: NaiveDate) -> DomainResult<Vec<Day>> {
    if end_date < start_date {
        return Err(DomainError::InvalidInput(format!(
            "end date {end_date} lies before start date {start_date}"
        )));
    }

    let mut days = Vec::new();
    let mut date = start_date;
    while date <= end_date {
        days.push(Day::new(date));
        date = date + Duration::days(1);
    }
    Ok(days)
}

/// Pairs (d, d+1) where both days are weekend days, in horizon order.
pub fn weekend_pairs(days: &[Day]) -> Vec<(usize, usize)> {
    days.windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].is_weekend() && pair[1].is_weekend())
        .map(|(index, _)| (index, index + 1))
        .collect()
}

fn classify(date: NaiveDate) -> DayKind {
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        DayKind::Weekend
    } else if is_public_holiday(date) {
        DayKind::Holiday
    } else {
        DayKind::Workday
    }
}

// Fixed-date Slovenian public holidays as (month, day).
const FIXED_HOLIDAYS: [(u32, u32); 12] = [
    (1, 1),   // New Year's Day
    (1, 2),   // New Year's Day
    (2, 8),   // Prešeren Day
    (4, 27),  // Day of Uprising Against Occupation
    (5, 1),   // Labour Day
    (5, 2),   // Labour Day
    (6, 25),  // Statehood Day
    (8, 15),  // Assumption Day
    (10, 31), // Reformation Day
    (11, 1),  // Remembrance Day
    (12, 25), // Christmas
    (12, 26), // Independence and Unity Day
];

fn is_public_holiday(date: NaiveDate) -> bool {
    if FIXED_HOLIDAYS.contains(&(date.month(), date.day())) {
        return true;
    }
    // The only movable holiday not already falling on a Sunday.
    date == easter_sunday(date.year()) + Duration::days(1)
}

/// Gregorian Easter Sunday (anonymous Gauss/Meeus algorithm).
fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .expect("computus always yields a valid March or April date")
}
