use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A post's publication date.
///
/// Displays (and serializes) as `Jan 2, 2024`; orders chronologically.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostDate(NaiveDate);

impl PostDate {
    pub const DISPLAY_FORMAT: &'static str = "%b %-d, %Y";
    pub const ISO_FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(date: NaiveDate) -> Self {
        PostDate(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `YYYY-MM-DD`.
    pub fn iso(&self) -> String {
        self.0.format(Self::ISO_FORMAT).to_string()
    }

    /// RFC 1123 form at midnight UTC, as used by RSS `pubDate`.
    pub fn rfc1123(&self) -> String {
        self.0.and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string()
    }
}

/// The input string is not a calendar date in any accepted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDate(pub String);

impl fmt::Display for InvalidDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid date", self.0)
    }
}

impl std::error::Error for InvalidDate { }

impl FromStr for PostDate {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const DATE_FORMATS: &[&str] = &[PostDate::ISO_FORMAT, "%b %d, %Y", "%B %d, %Y"];
        const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

        let s = s.trim();
        DATE_FORMATS.iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
            .or_else(|| DATETIME_FORMATS.iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date()))
            .map(PostDate)
            .ok_or_else(|| InvalidDate(s.to_string()))
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::DISPLAY_FORMAT))
    }
}

impl Serialize for PostDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PostDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = String::deserialize(deserializer)?;
        string.parse().map_err(serde::de::Error::custom)
    }
}
