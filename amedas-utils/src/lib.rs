//! Shared utility functions for AMeDAS crates.

/// Date and time helpers for upstream timestamps.
///
/// JMA publishes observation times either as RFC 3339 strings already in
/// Japan Standard Time or as compact UTC strings (`YYYYMMDDHHmmss`). Display
/// strings are always rendered in JST.
pub mod dates {
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Timelike};

    /// Shown in place of an observation time that cannot be parsed.
    pub const TIME_PLACEHOLDER: &str = "--/-- --:--";

    /// Offset of Japan Standard Time from UTC, in hours.
    pub const JST_OFFSET_HOURS: i64 = 9;

    /// Display format for observation times: "YYYY/MM/DD HH:MM"
    pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";

    /// Convert a compact UTC string (`YYYYMMDDHHmm...`) to a JST display string.
    ///
    /// Anything shorter than 12 characters, or with non-numeric or
    /// out-of-range components, yields [`TIME_PLACEHOLDER`].
    pub fn format_utc_to_jst(date_str: &str) -> String {
        parse_compact_utc(date_str)
            .map(|utc| to_jst_naive(utc).format(DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| TIME_PLACEHOLDER.to_string())
    }

    /// Parse the first 12 characters of a compact UTC timestamp.
    pub fn parse_compact_utc(date_str: &str) -> Option<NaiveDateTime> {
        if date_str.len() < 12 {
            return None;
        }
        let field = |range: std::ops::Range<usize>| -> Option<u32> {
            let part = date_str.get(range)?;
            if !part.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            part.parse::<u32>().ok()
        };
        let year = field(0..4)? as i32;
        let month = field(4..6)?;
        let day = field(6..8)?;
        let hour = field(8..10)?;
        let minute = field(10..12)?;
        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
    }

    /// Shift a naive UTC time into JST wall-clock time.
    pub fn to_jst_naive(utc: NaiveDateTime) -> NaiveDateTime {
        utc + Duration::hours(JST_OFFSET_HOURS)
    }

    /// Parse the body of `latest_time.txt` (RFC 3339, e.g. "2025-01-15T12:00:00+09:00").
    pub fn parse_latest_time(text: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        Ok(DateTime::parse_from_rfc3339(text.trim())?)
    }

    /// Render an upstream timestamp as a JST display string.
    pub fn format_jst(time: &DateTime<FixedOffset>) -> String {
        to_jst_naive(time.naive_utc())
            .format(DISPLAY_FORMAT)
            .to_string()
    }

    /// Name of the ten-minute map file covering `time`: "YYYYMMDDHHm000" in JST,
    /// with minutes floored to a multiple of ten.
    pub fn map_file_stamp(time: &DateTime<FixedOffset>) -> String {
        let jst = to_jst_naive(time.naive_utc());
        let floored = jst.minute() / 10 * 10;
        format!("{}{:02}00", jst.format("%Y%m%d%H"), floored)
    }

}
