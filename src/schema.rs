//! Filename schema: ordered field definitions plus the build/parse engine.

use std::collections::HashMap;

use crate::{FieldDefinition, FieldValue, NamingError};

/// Default pad character.
pub const DEFAULT_PAD: char = '-';

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = '_';

/// An ordered filename schema.
///
/// Field order is both the serialization order of [`build`](Self::build) and
/// the parse order of [`parse`](Self::parse). Bounded fields occupy fixed
/// column positions: present values are left-justified and padded to the
/// declared width, absent values render as a full-width pad run. Unbounded
/// fields are delimiter-separated and render as an empty segment when absent.
/// Trailing fields marked optional are omitted entirely, delimiter included,
/// when absent ("compact mode").
///
/// Field widths count bytes; the conventions this crate models are ASCII.
///
/// # Examples
///
/// ```rust
/// use pathscheme::{FieldDefinition, FieldValue, FilenameSchema};
/// use std::collections::HashMap;
///
/// let schema = FilenameSchema::new(vec![
///     FieldDefinition::new("pflag").max_length(1),
///     FieldDefinition::new("start_time").max_length(14),
/// ])
/// .unwrap();
///
/// let mut values = HashMap::new();
/// values.insert("pflag".to_string(), FieldValue::from("M"));
/// values.insert("start_time".to_string(), FieldValue::from("20180101120000"));
/// assert_eq!(schema.build(&values).unwrap(), "M_20180101120000");
/// ```
#[derive(Debug, Clone)]
pub struct FilenameSchema {
    fields: Vec<FieldDefinition>,
    pad: char,
    delimiter: char,
    extension: Option<String>,
}

impl FilenameSchema {
    /// Create a schema over the given fields with the default pad (`-`) and
    /// delimiter (`_`) and no extension.
    ///
    /// # Errors
    ///
    /// - [`NamingError::DuplicateField`] if two fields share a name
    /// - [`NamingError::NonTrailingOptional`] if an optional field is
    ///   followed by a required one
    pub fn new(fields: Vec<FieldDefinition>) -> Result<Self, NamingError> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name() == field.name()) {
                return Err(NamingError::DuplicateField {
                    name: field.name().to_string(),
                });
            }
            if field.is_optional() && fields[i..].iter().any(|f| !f.is_optional()) {
                return Err(NamingError::NonTrailingOptional {
                    name: field.name().to_string(),
                });
            }
        }
        Ok(Self {
            fields,
            pad: DEFAULT_PAD,
            delimiter: DEFAULT_DELIMITER,
            extension: None,
        })
    }

    /// Replace the pad character.
    #[must_use]
    pub fn with_pad(mut self, pad: char) -> Self {
        self.pad = pad;
        self
    }

    /// Replace the delimiter character.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Append an extension suffix (including its dot, e.g. `".tif"`) to
    /// every built filename; `parse` requires and strips it.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// The schema's fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// The pad character.
    #[inline]
    pub fn pad(&self) -> char {
        self.pad
    }

    /// The delimiter character.
    #[inline]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// The extension suffix, if declared.
    #[inline]
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Encode a value for the given field.
    ///
    /// Text passes through verbatim; any other variant requires the field's
    /// codec.
    ///
    /// # Errors
    ///
    /// [`NamingError::UnsupportedValueType`] for a non-text value on a
    /// codec-less field.
    pub fn encode(
        &self,
        field: &FieldDefinition,
        value: &FieldValue,
    ) -> Result<String, NamingError> {
        if let FieldValue::Text(s) = value {
            return Ok(s.clone());
        }
        match field.field_codec() {
            Some(codec) => codec.encode(value).map_err(|e| match e {
                NamingError::UnsupportedValueType { .. } => NamingError::UnsupportedValueType {
                    name: field.name().to_string(),
                },
                other => other,
            }),
            None => Err(NamingError::UnsupportedValueType {
                name: field.name().to_string(),
            }),
        }
    }

    /// Decode a raw segment for the given field, applying its codec if one
    /// is declared and returning text otherwise.
    ///
    /// # Errors
    ///
    /// Codec-specific decode failures, e.g. [`NamingError::TimestampParse`].
    pub fn decode(&self, field: &FieldDefinition, raw: &str) -> Result<FieldValue, NamingError> {
        match field.field_codec() {
            Some(codec) => codec.decode(raw),
            None => Ok(FieldValue::Text(raw.to_string())),
        }
    }

    /// Check an encoded value against the field's declared width.
    ///
    /// # Errors
    ///
    /// [`NamingError::FieldTooLong`] if the field is bounded and exceeded.
    pub fn validate(&self, field: &FieldDefinition, encoded: &str) -> Result<(), NamingError> {
        if let Some(max) = field.length()
            && encoded.len() > max
        {
            return Err(NamingError::FieldTooLong {
                name: field.name().to_string(),
                length: encoded.len(),
                max,
            });
        }
        Ok(())
    }

    /// Assemble a filename from the given values.
    ///
    /// Fields absent from `values` (or blank text) render as a pad run when
    /// bounded, as an empty segment when unbounded, and are omitted entirely
    /// when trailing and optional.
    ///
    /// # Errors
    ///
    /// - [`NamingError::FieldUndefined`] for a value key not in the schema
    /// - [`NamingError::FieldTooLong`] / [`NamingError::UnsupportedValueType`]
    ///   from per-field encoding
    pub fn build(&self, values: &HashMap<String, FieldValue>) -> Result<String, NamingError> {
        for name in values.keys() {
            if self.field(name).is_none() {
                return Err(NamingError::FieldUndefined { name: name.clone() });
            }
        }

        let present = |field: &FieldDefinition| {
            values
                .get(field.name())
                .is_some_and(|v| !v.is_blank(self.pad))
        };

        // Compact mode: drop wholly-absent optional fields off the tail.
        let mut emit = self.fields.len();
        while emit > 0 && self.fields[emit - 1].is_optional() && !present(&self.fields[emit - 1]) {
            emit -= 1;
        }

        let mut out = String::new();
        for (i, field) in self.fields[..emit].iter().enumerate() {
            if i > 0 && field.uses_delimiter() {
                out.push(self.delimiter);
            }
            match values.get(field.name()).filter(|v| !v.is_blank(self.pad)) {
                Some(value) => {
                    let encoded = self.encode(field, value)?;
                    self.validate(field, &encoded)?;
                    out.push_str(&encoded);
                    if let Some(width) = field.length() {
                        for _ in encoded.len()..width {
                            out.push(self.pad);
                        }
                    }
                }
                None => {
                    if let Some(width) = field.length() {
                        for _ in 0..width {
                            out.push(self.pad);
                        }
                    }
                }
            }
        }

        if let Some(ext) = &self.extension {
            out.push_str(ext);
        }
        Ok(out)
    }

    /// Disassemble a filename into decoded field values.
    ///
    /// Bounded fields are sliced by position (their values may contain the
    /// delimiter); unbounded fields consume up to the next delimiter. Pad-only
    /// segments decode to absent and are left out of the returned map, as are
    /// omitted trailing optional fields.
    ///
    /// # Errors
    ///
    /// - [`NamingError::MalformedFilename`] if the string does not tokenize
    ///   into the schema's fields, has leftover characters, or is missing the
    ///   declared extension
    /// - codec decode failures for individual segments
    pub fn parse(&self, filename: &str) -> Result<HashMap<String, FieldValue>, NamingError> {
        let malformed = |details: String| NamingError::MalformedFilename {
            filename: filename.to_string(),
            details,
        };

        let mut rest = filename;
        if let Some(ext) = &self.extension {
            rest = rest
                .strip_suffix(ext.as_str())
                .ok_or_else(|| malformed(format!("missing extension {ext:?}")))?;
        }

        let mut values = HashMap::new();
        let mut pos = 0usize;
        for (i, field) in self.fields.iter().enumerate() {
            if pos >= rest.len() {
                if self.fields[i..].iter().all(FieldDefinition::is_optional) {
                    break;
                }
                return Err(malformed(format!(
                    "input exhausted before field '{}'",
                    field.name()
                )));
            }
            if i > 0 && field.uses_delimiter() {
                if !rest[pos..].starts_with(self.delimiter) {
                    return Err(malformed(format!(
                        "expected delimiter {:?} before field '{}'",
                        self.delimiter,
                        field.name()
                    )));
                }
                pos += self.delimiter.len_utf8();
            }
            let raw = match field.length() {
                Some(width) => {
                    let segment = rest.get(pos..pos + width).ok_or_else(|| {
                        malformed(format!(
                            "field '{}' needs {width} characters",
                            field.name()
                        ))
                    })?;
                    pos += width;
                    segment
                }
                None => {
                    let end = rest[pos..]
                        .find(self.delimiter)
                        .map_or(rest.len(), |offset| pos + offset);
                    let segment = &rest[pos..end];
                    pos = end;
                    segment
                }
            };
            let trimmed = raw.trim_matches(self.pad);
            if trimmed.is_empty() {
                continue;
            }
            values.insert(field.name().to_string(), self.decode(field, trimmed)?);
        }

        if pos < rest.len() {
            return Err(malformed(format!(
                "unexpected trailing characters {:?}",
                &rest[pos..]
            )));
        }
        Ok(values)
    }
}
