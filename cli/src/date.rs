use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Calendar date of the last repository update, in UTC
///
/// The month is the zero-based index (January is 0) and neither month nor day are padded
/// when displayed, e.g. 5 March 2021 renders as `Last updated: 2021-2-5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastUpdated {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl LastUpdated {
    /// Parse an ISO-8601 timestamp as returned in `updated_at`
    ///
    /// Offsets are converted to UTC first. A bare date (`2021-03-05`) is taken as UTC midnight.
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(value) {
            Ok(datetime) => Ok(datetime.with_timezone(&Utc).into()),

            Err(error) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|date| Self {
                    year: date.year(),
                    month: date.month0(),
                    day: date.day(),
                })
                .map_err(|_| error),
        }
    }
}

impl From<DateTime<Utc>> for LastUpdated {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self {
            year: datetime.year(),
            month: datetime.month0(),
            day: datetime.day(),
        }
    }
}

impl std::fmt::Display for LastUpdated {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Last updated: {}-{}-{}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_is_zero_based_and_unpadded() {
        let date = LastUpdated::parse("2021-03-05T00:00:00Z").unwrap();
        assert_eq!(date.to_string(), "Last updated: 2021-2-5");
    }

    #[test]
    fn january_renders_as_month_zero() {
        let date = LastUpdated::parse("2024-01-31T23:59:59Z").unwrap();
        assert_eq!(
            date,
            LastUpdated {
                year: 2024,
                month: 0,
                day: 31
            }
        );
    }

    #[test]
    fn offset_is_converted_to_utc() {
        // 01:30 at +02:00 is still the previous day in UTC
        let date = LastUpdated::parse("2022-07-01T01:30:00+02:00").unwrap();
        assert_eq!(date.to_string(), "Last updated: 2022-5-30");
    }

    #[test]
    fn fractional_seconds_are_accepted() {
        let date = LastUpdated::parse("2020-12-25T10:00:00.123Z").unwrap();
        assert_eq!(date.to_string(), "Last updated: 2020-11-25");
    }

    #[test]
    fn bare_date_is_utc_midnight() {
        let date = LastUpdated::parse("2019-10-09").unwrap();
        assert_eq!(date.to_string(), "Last updated: 2019-9-9");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(LastUpdated::parse("yesterday").is_err());
        assert!(LastUpdated::parse("").is_err());
    }
}
