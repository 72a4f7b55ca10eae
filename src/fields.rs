//! Typed field values and per-field schema entries.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::codec::FieldCodec;

/// A typed value held by one filename field.
///
/// `Text` encodes verbatim; every other variant requires the owning field to
/// declare a codec.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    /// Plain text, written to the filename as-is.
    Text(String),
    /// Calendar date without a time of day.
    Date(NaiveDate),
    /// Full date and time.
    DateTime(NaiveDateTime),
    /// Integer, typically zero-padded by an [`IntegerCodec`](crate::IntegerCodec).
    Integer(i64),
}

impl FieldValue {
    /// Returns the text content if this is a `Text` value.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a datetime view of this value.
    ///
    /// Dates promote to midnight; text and integers return `None`.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            FieldValue::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            _ => None,
        }
    }

    /// Returns the integer content if this is an `Integer` value.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns `true` for text values that are empty after trimming the
    /// given pad character.
    pub(crate) fn is_blank(&self, pad: char) -> bool {
        match self {
            FieldValue::Text(s) => s.trim_matches(pad).is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(dt: NaiveDateTime) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

/// Definition of one named filename field.
///
/// Built with a chained constructor; a bare `FieldDefinition::new("band")` is
/// unbounded, delimited and codec-less.
///
/// # Examples
///
/// ```rust
/// use pathscheme::{FieldDefinition, TimestampCodec};
///
/// let tile = FieldDefinition::new("tile_name").max_length(10);
/// let stamp = FieldDefinition::new("datetime_1")
///     .codec(TimestampCodec::new("%Y%m%dT%H%M%S"));
/// let creator = FieldDefinition::new("creator").optional();
/// ```
#[derive(Clone)]
pub struct FieldDefinition {
    name: String,
    max_length: Option<usize>,
    use_delimiter: bool,
    optional: bool,
    codec: Option<Arc<dyn FieldCodec>>,
}

impl FieldDefinition {
    /// Create an unbounded, delimited field with no codec.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_length: None,
            use_delimiter: true,
            optional: false,
            codec: None,
        }
    }

    /// Bound the encoded value to `max` characters; absent values render as
    /// a pad run of exactly this width.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Suppress the delimiter in front of this field.
    #[must_use]
    pub fn no_delimiter(mut self) -> Self {
        self.use_delimiter = false;
        self
    }

    /// Mark the field as omittable when absent. Only valid on trailing
    /// fields; the schema constructor rejects anything else.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Attach an encode/decode strategy.
    #[must_use]
    pub fn codec(mut self, codec: impl FieldCodec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// The field's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared maximum encoded length, if bounded.
    #[inline]
    pub fn length(&self) -> Option<usize> {
        self.max_length
    }

    /// Whether a delimiter precedes this field.
    #[inline]
    pub fn uses_delimiter(&self) -> bool {
        self.use_delimiter
    }

    /// Whether this field may be omitted entirely when absent.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The attached codec, if any.
    #[inline]
    pub fn field_codec(&self) -> Option<&Arc<dyn FieldCodec>> {
        self.codec.as_ref()
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("max_length", &self.max_length)
            .field("use_delimiter", &self.use_delimiter)
            .field("optional", &self.optional)
            .field("codec", &self.codec.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimestampCodec;

    #[test]
    fn field_value_as_text() {
        assert_eq!(FieldValue::from("SSM").as_text(), Some("SSM"));
        assert_eq!(FieldValue::Integer(4).as_text(), None);
    }

    #[test]
    fn field_value_date_promotes_to_midnight() {
        let d = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        let dt = FieldValue::Date(d).as_datetime().unwrap();
        assert_eq!(dt, d.and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn field_value_blank_detection() {
        assert!(FieldValue::Text(String::new()).is_blank('-'));
        assert!(FieldValue::Text("---".into()).is_blank('-'));
        assert!(!FieldValue::Text("SSM".into()).is_blank('-'));
        assert!(!FieldValue::Integer(0).is_blank('-'));
    }

    #[test]
    fn field_definition_defaults() {
        let f = FieldDefinition::new("band");
        assert_eq!(f.name(), "band");
        assert_eq!(f.length(), None);
        assert!(f.uses_delimiter());
        assert!(!f.is_optional());
        assert!(f.field_codec().is_none());
    }

    #[test]
    fn field_definition_builder_chain() {
        let f = FieldDefinition::new("datetime_1")
            .max_length(15)
            .no_delimiter()
            .codec(TimestampCodec::new("%Y%m%dT%H%M%S"));
        assert_eq!(f.length(), Some(15));
        assert!(!f.uses_delimiter());
        assert!(f.field_codec().is_some());
    }

    #[test]
    fn field_definition_debug_hides_codec_internals() {
        let f = FieldDefinition::new("t").codec(TimestampCodec::new("%Y%m%d"));
        let repr = format!("{f:?}");
        assert!(repr.contains("codec: true"));
    }
}
