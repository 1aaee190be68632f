//! Date and time extraction.

use chrono::{NaiveDate, NaiveTime};

use super::patterns::{DATE_ISO, DATE_NUMERIC, DATE_TEXTUAL, TIME_12H, TIME_24H};
use super::{ExtractionMatch, FieldStrategy};
use crate::text::NormalizedText;

/// Date extractor with an explicit "today" so future-date rejection is
/// deterministic under test.
pub struct DateExtractor {
    today: NaiveDate,
}

impl DateExtractor {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl FieldStrategy for DateExtractor {
    type Output = NaiveDate;

    /// Extract the purchase date.
    ///
    /// Tries numeric month/day orderings, then ISO, then textual month
    /// formats; the first candidate that parses to a valid calendar date not
    /// in the future wins. When both numeric orderings are plausible the one
    /// producing a valid, past date is preferred (month-first checked first).
    fn extract(&self, text: &NormalizedText) -> Option<ExtractionMatch<NaiveDate>> {
        for caps in DATE_NUMERIC.captures_iter(&text.lower) {
            let a: u32 = caps[1].parse().unwrap_or(0);
            let b: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);

            // Month-first, then day-first.
            let candidates = [
                NaiveDate::from_ymd_opt(year, a, b),
                NaiveDate::from_ymd_opt(year, b, a),
            ];
            for date in candidates.into_iter().flatten() {
                if date <= self.today {
                    let m = caps.get(0).unwrap();
                    return Some(
                        ExtractionMatch::new(date, 0.85, m.as_str())
                            .with_position(m.start(), m.end()),
                    );
                }
            }
        }

        for caps in DATE_ISO.captures_iter(&text.lower) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                if date <= self.today {
                    let m = caps.get(0).unwrap();
                    return Some(
                        ExtractionMatch::new(date, 0.95, m.as_str())
                            .with_position(m.start(), m.end()),
                    );
                }
            }
        }

        for caps in DATE_TEXTUAL.captures_iter(&text.lower) {
            let month = month_abbrev_to_number(&caps[1]);
            let day: u32 = caps[2].parse().unwrap_or(0);
            let year: i32 = caps[3].parse().unwrap_or(0);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                if date <= self.today {
                    let m = caps.get(0).unwrap();
                    return Some(
                        ExtractionMatch::new(date, 0.9, m.as_str())
                            .with_position(m.start(), m.end()),
                    );
                }
            }
        }

        None
    }
}

/// Extract a purchase date using the current UTC date as "today".
pub fn extract_date(text: &NormalizedText) -> Option<ExtractionMatch<NaiveDate>> {
    DateExtractor::new(chrono::Utc::now().date_naive()).extract(text)
}

/// Extract a time of day. 12-hour clock wins over 24-hour since an am/pm
/// marker is unambiguous.
pub fn extract_time(text: &NormalizedText) -> Option<ExtractionMatch<NaiveTime>> {
    if let Some(caps) = TIME_12H.captures(&text.lower) {
        let hour: u32 = caps[1].parse().unwrap_or(0);
        let minute: u32 = caps[2].parse().unwrap_or(0);
        let second: u32 = caps.get(3).map_or(0, |s| s.as_str().parse().unwrap_or(0));
        let pm = caps[4].eq_ignore_ascii_case("pm");

        if (1..=12).contains(&hour) {
            let hour24 = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, false) => h,
                (h, true) => h + 12,
            };
            if let Some(time) = NaiveTime::from_hms_opt(hour24, minute, second) {
                let m = caps.get(0).unwrap();
                return Some(
                    ExtractionMatch::new(time, 0.9, m.as_str()).with_position(m.start(), m.end()),
                );
            }
        }
    }

    if let Some(caps) = TIME_24H.captures(&text.lower) {
        let hour: u32 = caps[1].parse().unwrap_or(0);
        let minute: u32 = caps[2].parse().unwrap_or(0);
        let second: u32 = caps.get(3).map_or(0, |s| s.as_str().parse().unwrap_or(0));

        if let Some(time) = NaiveTime::from_hms_opt(hour, minute, second) {
            let m = caps.get(0).unwrap();
            return Some(
                ExtractionMatch::new(time, 0.8, m.as_str()).with_position(m.start(), m.end()),
            );
        }
    }

    None
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: 2000s for 00-50, 1900s for 51-99.
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

fn month_abbrev_to_number(abbrev: &str) -> u32 {
    match &abbrev.to_lowercase()[..3] {
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

    fn extractor() -> DateExtractor {
        DateExtractor::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_extract_date_month_first() {
        let text = NormalizedText::new("Date: 12/15/2023");
        let result = extractor().extract(&text).unwrap();
        assert_eq!(result.value, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
    }

    #[test]
    fn test_extract_date_day_first_when_month_invalid() {
        // 15 cannot be a month, so the day-first reading applies.
        let text = NormalizedText::new("15/12/2023");
        let result = extractor().extract(&text).unwrap();
        assert_eq!(result.value, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
    }

    #[test]
    fn test_extract_date_iso() {
        let text = NormalizedText::new("2023-12-15 14:30");
        let result = extractor().extract(&text).unwrap();
        assert_eq!(result.value, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
    }

    #[test]
    fn test_extract_date_textual() {
        let text = NormalizedText::new("December 15, 2023");
        let result = extractor().extract(&text).unwrap();
        assert_eq!(result.value, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());

        let text = NormalizedText::new("Dec 15 2023");
        let result = extractor().extract(&text).unwrap();
        assert_eq!(result.value, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
    }

    #[test]
    fn test_future_date_rejected() {
        let text = NormalizedText::new("Date: 12/15/2033");
        assert!(extractor().extract(&text).is_none());
    }

    #[test]
    fn test_future_month_first_falls_back_to_day_first() {
        // Relative to 2024-06-01, 07/03/2024 month-first is in the future;
        // the day-first reading (March 7) is valid and past.
        let extractor = DateExtractor::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let text = NormalizedText::new("07/03/2024");
        let result = extractor.extract(&text).unwrap();
        assert_eq!(result.value, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
    }

    #[test]
    fn test_two_digit_year() {
        let text = NormalizedText::new("12/15/23");
        let result = extractor().extract(&text).unwrap();
        assert_eq!(result.value, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
    }

    #[test]
    fn test_extract_time_12h() {
        let text = NormalizedText::new("Time: 3:45 PM");
        let result = extract_time(&text).unwrap();
        assert_eq!(result.value, NaiveTime::from_hms_opt(15, 45, 0).unwrap());
    }

    #[test]
    fn test_extract_time_12h_midnight_and_noon() {
        let text = NormalizedText::new("12:01 AM");
        assert_eq!(
            extract_time(&text).unwrap().value,
            NaiveTime::from_hms_opt(0, 1, 0).unwrap()
        );
        let text = NormalizedText::new("12:01 PM");
        assert_eq!(
            extract_time(&text).unwrap().value,
            NaiveTime::from_hms_opt(12, 1, 0).unwrap()
        );
    }

    #[test]
    fn test_extract_time_24h() {
        let text = NormalizedText::new("15:45:30");
        let result = extract_time(&text).unwrap();
        assert_eq!(result.value, NaiveTime::from_hms_opt(15, 45, 30).unwrap());
    }

    #[test]
    fn test_no_time() {
        let text = NormalizedText::new("WALMART\nTotal 8.62");
        assert!(extract_time(&text).is_none());
    }
}
