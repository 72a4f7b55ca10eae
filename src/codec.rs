//! # Field Codecs
//!
//! Strategy trait for pluggable per-field encode/decode behavior.
//!
//! ## Responsibility
//! - Define the contract for turning typed field values into filename
//!   segments and back
//! - Provide the two stock strategies used by date-stamped archive
//!   conventions: [`TimestampCodec`] and [`IntegerCodec`]
//!
//! A codec is a small value parameterized by its format constants and passed
//! explicitly into a schema. It never reaches back into the filename that
//! owns the field.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{FieldValue, NamingError};

/// Strategy trait for encoding and decoding a single field's value.
///
/// `encode` and `decode` must be mutual inverses for every value that
/// `decode` actually produces.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; schemas share codecs via
/// `Arc<dyn FieldCodec>`.
pub trait FieldCodec: fmt::Debug + Send + Sync {
    /// Encode a typed value into its filename segment.
    ///
    /// Text values never reach a codec — the schema emits them verbatim.
    ///
    /// # Errors
    ///
    /// [`NamingError::UnsupportedValueType`] if the codec cannot represent
    /// the value's variant. The schema rewrites the field name into the
    /// error before surfacing it.
    fn encode(&self, value: &FieldValue) -> Result<String, NamingError>;

    /// Decode a raw filename segment (pad characters already stripped) into
    /// a typed value.
    ///
    /// # Errors
    ///
    /// Codec-specific; [`TimestampCodec`] fails with
    /// [`NamingError::TimestampParse`] on a non-conforming segment.
    fn decode(&self, raw: &str) -> Result<FieldValue, NamingError>;
}

/// Codec for timestamp fields holding a date or a full datetime.
///
/// Encoding picks the format matching the value: datetimes use the datetime
/// format, bare dates the date-only format. Decoding tries the datetime
/// format first and falls back to the date-only format, so a field declared
/// with `"%Y%m%dT%H%M%S"` round-trips both `20170725T165004` and `20170725`.
///
/// # Examples
///
/// ```rust
/// use pathscheme::{FieldCodec, FieldValue, TimestampCodec};
/// use chrono::NaiveDate;
///
/// let codec = TimestampCodec::new("%Y%m%dT%H%M%S");
/// let day = FieldValue::Date(NaiveDate::from_ymd_opt(2017, 7, 25).unwrap());
/// assert_eq!(codec.encode(&day).unwrap(), "20170725");
/// ```
#[derive(Debug, Clone)]
pub struct TimestampCodec {
    datetime_format: String,
    date_format: String,
}

impl TimestampCodec {
    /// Create a codec with the given datetime format and the default
    /// `"%Y%m%d"` date-only fallback.
    pub fn new(datetime_format: impl Into<String>) -> Self {
        Self {
            datetime_format: datetime_format.into(),
            date_format: "%Y%m%d".into(),
        }
    }

    /// Replace the date-only fallback format.
    #[must_use]
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// The datetime format string.
    #[inline]
    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }
}

impl FieldCodec for TimestampCodec {
    fn encode(&self, value: &FieldValue) -> Result<String, NamingError> {
        match value {
            FieldValue::DateTime(dt) => Ok(dt.format(&self.datetime_format).to_string()),
            FieldValue::Date(d) => Ok(d.format(&self.date_format).to_string()),
            FieldValue::Text(s) => Ok(s.clone()),
            FieldValue::Integer(_) => Err(NamingError::UnsupportedValueType {
                name: String::new(),
            }),
        }
    }

    fn decode(&self, raw: &str) -> Result<FieldValue, NamingError> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, &self.datetime_format) {
            return Ok(FieldValue::DateTime(dt));
        }
        if let Ok(d) = NaiveDate::parse_from_str(raw, &self.date_format) {
            return Ok(FieldValue::Date(d));
        }
        Err(NamingError::TimestampParse {
            raw: raw.to_string(),
            format: self.datetime_format.clone(),
        })
    }
}

/// Codec for integer fields rendered with zero padding.
///
/// Decoding is lenient: segments that do not parse as an integer come back
/// as text, so mixed-content fields (orbit numbers sharing a slot with
/// letter codes) survive a round trip.
#[derive(Debug, Clone, Copy)]
pub struct IntegerCodec {
    width: usize,
}

impl IntegerCodec {
    /// Create a codec that zero-pads encoded integers to `width` digits.
    #[inline]
    pub const fn new(width: usize) -> Self {
        Self { width }
    }
}

impl FieldCodec for IntegerCodec {
    fn encode(&self, value: &FieldValue) -> Result<String, NamingError> {
        match value {
            FieldValue::Integer(n) => Ok(format!("{n:0width$}", width = self.width)),
            FieldValue::Text(s) => Ok(s.clone()),
            _ => Err(NamingError::UnsupportedValueType {
                name: String::new(),
            }),
        }
    }

    fn decode(&self, raw: &str) -> Result<FieldValue, NamingError> {
        match raw.parse::<i64>() {
            Ok(n) => Ok(FieldValue::Integer(n)),
            Err(_) => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

/// Number of characters a chrono format string renders to.
///
/// Used to slice fixed-position timestamps out of filenames: `"%Y%m%d_%H%M%S"`
/// is 15 characters wide (`20161224_000000`).
pub fn format_width(format: &str) -> usize {
    let mut width = 0;
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            width += 1;
            continue;
        }
        match chars.next() {
            Some('Y') => width += 4,
            Some('j') => width += 3,
            Some('%') => width += 1,
            // %y %m %d %H %M %S and friends
            Some(_) => width += 2,
            None => {}
        }
    }
    width
}

/// Parse a timestamp string with a chrono format, accepting date-only
/// formats by promoting to midnight.
pub(crate) fn parse_timestamp(raw: &str, format: &str) -> Result<NaiveDateTime, NamingError> {
    NaiveDateTime::parse_from_str(raw, format)
        .or_else(|_| NaiveDate::parse_from_str(raw, format).map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|_| NamingError::TimestampParse {
            raw: raw.to_string(),
            format: format.to_string(),
        })
}
