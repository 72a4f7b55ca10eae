//! # Smart Filenames
//!
//! A filename that knows its own schema.
//!
//! ## Responsibility
//! - Hold validated field values together with the schema that constrains
//!   them
//! - Render the canonical filename string on demand
//! - Parse existing filenames back into typed values
//!
//! `SmartFilename` validates on every write: `new` and `set` reject unknown
//! fields, over-long values and typed values without a codec, so a value
//! that made it in always renders.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDateTime;

use crate::{FieldValue, FilenameSchema, NamingError};

/// A filename bound to a schema, with typed per-field access.
///
/// # Examples
///
/// ```rust
/// use pathscheme::{FieldDefinition, FieldValue, FilenameSchema, SmartFilename};
/// use std::collections::HashMap;
///
/// let schema = FilenameSchema::new(vec![
///     FieldDefinition::new("pflag").max_length(1),
///     FieldDefinition::new("start_time").max_length(14),
/// ])
/// .unwrap()
/// .with_extension(".tif");
///
/// let mut values = HashMap::new();
/// values.insert("pflag".to_string(), FieldValue::from("M"));
/// values.insert("start_time".to_string(), FieldValue::from("20180101120000"));
///
/// let name = SmartFilename::new(schema, values).unwrap();
/// assert_eq!(name.render().unwrap(), "M_20180101120000.tif");
/// ```
#[derive(Debug, Clone)]
pub struct SmartFilename {
    schema: FilenameSchema,
    values: HashMap<String, FieldValue>,
}

impl SmartFilename {
    /// Bind values to a schema, validating each one eagerly.
    ///
    /// # Errors
    ///
    /// - [`NamingError::FieldUndefined`] for a value key not in the schema
    /// - [`NamingError::FieldTooLong`] for an encoded value over its width
    /// - [`NamingError::UnsupportedValueType`] for a typed value on a
    ///   codec-less field
    pub fn new(
        schema: FilenameSchema,
        values: HashMap<String, FieldValue>,
    ) -> Result<Self, NamingError> {
        for (name, value) in &values {
            let field = schema
                .field(name)
                .ok_or_else(|| NamingError::FieldUndefined { name: name.clone() })?;
            let encoded = schema.encode(field, value)?;
            schema.validate(field, &encoded)?;
        }
        Ok(Self { schema, values })
    }

    /// Parse an existing filename string against a schema.
    ///
    /// # Errors
    ///
    /// [`NamingError::MalformedFilename`] or a codec decode failure; see
    /// [`FilenameSchema::parse`].
    pub fn from_filename(schema: FilenameSchema, filename: &str) -> Result<Self, NamingError> {
        let values = schema.parse(filename)?;
        Self::new(schema, values)
    }

    /// The schema this filename is bound to.
    #[inline]
    pub fn schema(&self) -> &FilenameSchema {
        &self.schema
    }

    /// Get a field's value, decoded through the field's codec.
    ///
    /// Stored text on a codec-bearing field is decoded on the way out, so a
    /// filename parsed from disk and one built from typed values agree.
    /// Returns `None` for absent fields and for segments the codec rejects.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        let value = self.values.get(name)?;
        if value.is_blank(self.schema.pad()) {
            return None;
        }
        if let FieldValue::Text(raw) = value
            && let Some(field) = self.schema.field(name)
            && field.field_codec().is_some()
        {
            let trimmed = raw.trim_matches(self.schema.pad());
            return self.schema.decode(field, trimmed).ok();
        }
        Some(value.clone())
    }

    /// Set a field's value, validating it first.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new) for the single field.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), NamingError> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| NamingError::FieldUndefined {
                name: name.to_string(),
            })?;
        let encoded = self.schema.encode(field, &value)?;
        self.schema.validate(field, &encoded)?;
        let stored = match value {
            FieldValue::Text(s) => {
                FieldValue::Text(s.trim_matches(self.schema.pad()).to_string())
            }
            other => other,
        };
        self.values.insert(name.to_string(), stored);
        Ok(())
    }

    /// Remove a field's value, returning the previous one if any.
    pub fn unset(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Render the canonical filename string.
    ///
    /// # Errors
    ///
    /// Validation happens on write, so rendering a filename whose values all
    /// came through [`new`](Self::new) or [`set`](Self::set) does not fail.
    pub fn render(&self) -> Result<String, NamingError> {
        self.schema.build(&self.values)
    }

    /// A field's timestamp view: datetimes as-is, dates at midnight.
    ///
    /// Text fields with a timestamp codec decode first; anything else is
    /// `None`.
    pub fn datetime(&self, name: &str) -> Option<NaiveDateTime> {
        self.get(name)?.as_datetime()
    }

    /// Midpoint between two timestamp fields.
    ///
    /// With the end field absent, the start stands alone. Returns `None`
    /// when the start field is absent or not a timestamp.
    pub fn midpoint(&self, start: &str, end: &str) -> Option<NaiveDateTime> {
        let start = self.datetime(start)?;
        match self.datetime(end) {
            Some(end) => Some(start + (end - start) / 2),
            None => Some(start),
        }
    }
}

impl fmt::Display for SmartFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}
