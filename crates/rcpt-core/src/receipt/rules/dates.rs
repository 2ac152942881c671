//! Purchase date detection for receipts.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Captures;

use super::patterns::{
    DATE_DAY_MONTH_YEAR, DATE_MONTH_DAY_YEAR, DATE_NUMERIC, DATE_YMD, TIME_OF_DAY,
};

/// First line, in order, that contains a recognizable date.
pub fn detect_date<S: AsRef<str>>(lines: &[S]) -> Option<NaiveDateTime> {
    lines.iter().find_map(|line| parse_date_in_line(line.as_ref()))
}

/// Parse the earliest valid date in a single line.
///
/// A time of day on the same line is attached, preferring one that follows
/// the date; without one the result is midnight.
pub fn parse_date_in_line(line: &str) -> Option<NaiveDateTime> {
    let mut candidates: Vec<(usize, usize, NaiveDate)> = Vec::new();

    // YYYY-MM-DD
    for caps in DATE_YMD.captures_iter(line) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            push_candidate(&mut candidates, &caps, date);
        }
    }

    // MM/DD/YYYY, DD.MM.YYYY and two-digit years
    for caps in DATE_NUMERIC.captures_iter(line) {
        let first: u32 = caps[1].parse().unwrap_or(0);
        let second: u32 = caps[3].parse().unwrap_or(0);
        let year = parse_year(&caps[4]);
        if let Some(date) = resolve_numeric(first, second, year, &caps[2]) {
            push_candidate(&mut candidates, &caps, date);
        }
    }

    // "Sep 27, 2025"
    for caps in DATE_MONTH_DAY_YEAR.captures_iter(line) {
        let month = month_to_number(&caps[1]);
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year: i32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            push_candidate(&mut candidates, &caps, date);
        }
    }

    // "27 September 2025"
    for caps in DATE_DAY_MONTH_YEAR.captures_iter(line) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let month = month_to_number(&caps[2]);
        let year: i32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            push_candidate(&mut candidates, &caps, date);
        }
    }

    let (start, end, date) = candidates.into_iter().min_by_key(|(start, _, _)| *start)?;

    let time = parse_time(&line[end..])
        .or_else(|| parse_time(&line[..start]))
        .unwrap_or(NaiveTime::MIN);

    Some(date.and_time(time))
}

fn push_candidate(candidates: &mut Vec<(usize, usize, NaiveDate)>, caps: &Captures, date: NaiveDate) {
    if let Some(m) = caps.get(0) {
        candidates.push((m.start(), m.end(), date));
    }
}

/// Slash and dash dates read month-first; dotted dates read day-first.
/// Either falls back to the other order when the first is not a real date.
fn resolve_numeric(first: u32, second: u32, year: i32, separator: &str) -> Option<NaiveDate> {
    let month_first = NaiveDate::from_ymd_opt(year, first, second);
    let day_first = NaiveDate::from_ymd_opt(year, second, first);

    if separator == "." {
        day_first.or(month_first)
    } else {
        month_first.or(day_first)
    }
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    TIME_OF_DAY.captures_iter(text).find_map(|caps| {
        let mut hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        let second: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;

        if let Some(meridiem) = caps.get(4) {
            if hour == 0 || hour > 12 {
                return None;
            }
            let pm = meridiem.as_str().eq_ignore_ascii_case("p");
            hour = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };
        }

        NaiveTime::from_hms_opt(hour, minute, second)
    })
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

fn month_to_number(month: &str) -> u32 {
    let prefix: String = month.to_lowercase().chars().take(3).collect();
    match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_us_date_with_time() {
        assert_eq!(
            parse_date_in_line("09/27/2025 08:41 AM"),
            Some(at(2025, 9, 27, 8, 41))
        );
        assert_eq!(
            parse_date_in_line("9/27/25 8:41 pm"),
            Some(at(2025, 9, 27, 20, 41))
        );
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse_date_in_line("Date: 2025-09-27"), Some(at(2025, 9, 27, 0, 0)));
        assert_eq!(
            parse_date_in_line("2025-09-27T10:15"),
            Some(at(2025, 9, 27, 10, 15))
        );
    }

    #[test]
    fn test_dotted_date_is_day_first() {
        assert_eq!(parse_date_in_line("27.09.2025 14:03"), Some(at(2025, 9, 27, 14, 3)));
        assert_eq!(parse_date_in_line("03.04.2025"), Some(at(2025, 4, 3, 0, 0)));
    }

    #[test]
    fn test_slash_date_falls_back_to_day_first() {
        assert_eq!(parse_date_in_line("03/04/2025"), Some(at(2025, 3, 4, 0, 0)));
        assert_eq!(parse_date_in_line("13/04/2025"), Some(at(2025, 4, 13, 0, 0)));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(parse_date_in_line("Sep 27, 2025"), Some(at(2025, 9, 27, 0, 0)));
        assert_eq!(
            parse_date_in_line("Printed 27th September 2025 at 9:05"),
            Some(at(2025, 9, 27, 9, 5))
        );
        assert_eq!(parse_date_in_line("December 1 1999"), Some(at(1999, 12, 1, 0, 0)));
    }

    #[test]
    fn test_time_before_date() {
        assert_eq!(
            parse_date_in_line("12:30 PM 10/02/2025"),
            Some(at(2025, 10, 2, 12, 30))
        );
    }

    #[test]
    fn test_invalid_dates_ignored() {
        assert_eq!(parse_date_in_line("02/30/2025"), None);
        assert_eq!(parse_date_in_line("Order #20250927"), None);
        assert_eq!(parse_date_in_line("Total $15.35"), None);
        assert_eq!(parse_date_in_line("Thank you"), None);
    }

    #[test]
    fn test_detect_date_first_line_wins() {
        let lines = ["Blue Bottle Coffee", "09/27/2025 08:41 AM", "Return by 10/27/2025"];
        assert_eq!(detect_date(&lines), Some(at(2025, 9, 27, 8, 41)));

        let none: [&str; 2] = ["Coffee", "Total 4.00"];
        assert_eq!(detect_date(&none), None);
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_year("24"), 2024);
        assert_eq!(parse_year("99"), 1999);
        assert_eq!(parse_year("2025"), 2025);
    }
}
