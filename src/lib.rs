//! # pathscheme
//!
//! Structured filename codec and smart directory trees for rigid dataset
//! naming conventions.
//!
//! Scientific archives name their files by convention: fixed-width fields,
//! pad characters for absent values, delimiters between segments, and a
//! directory hierarchy whose levels carry meaning. `pathscheme` models such
//! a convention once and derives everything else from it: building names,
//! parsing names back into typed values, resolving hierarchy levels into
//! directories, and walking whole archive trees.
//!
//! ## Quick Start
//!
//! ```rust
//! use pathscheme::{FieldDefinition, FieldValue, FilenameSchema, SmartFilename};
//! use std::collections::HashMap;
//!
//! // A two-field convention: one-letter product flag, 14-digit timestamp.
//! let schema = FilenameSchema::new(vec![
//!     FieldDefinition::new("pflag").max_length(1),
//!     FieldDefinition::new("start_time").max_length(14),
//! ])?
//! .with_extension(".tif");
//!
//! let mut values = HashMap::new();
//! values.insert("pflag".to_string(), FieldValue::from("M"));
//! values.insert("start_time".to_string(), FieldValue::from("20180101120000"));
//!
//! let name = SmartFilename::new(schema.clone(), values)?;
//! assert_eq!(name.render()?, "M_20180101120000.tif");
//!
//! // And back again.
//! let parsed = SmartFilename::from_filename(schema, "M_20180101120000.tif")?;
//! assert_eq!(parsed.get("pflag"), Some(FieldValue::Text("M".into())));
//! # Ok::<(), pathscheme::NamingError>(())
//! ```
//!
//! ## Core Types
//!
//! | Type | Role |
//! |------|------|
//! | [`FilenameSchema`] | Ordered field definitions; builds and parses names |
//! | [`FieldDefinition`] | One field: width, delimiter, codec, optionality |
//! | [`FieldValue`] | Typed value: text, date, datetime or integer |
//! | [`FieldCodec`] | Strategy trait for per-field encode/decode |
//! | [`SmartFilename`] | A filename bound to its schema, validated on write |
//! | [`PathLevelSpec`] | Named hierarchy levels mapped to directory names |
//! | [`SmartPath`] | A resolved directory with level-aware file search |
//! | [`SmartTree`] | A rooted collection of paths with discovery and subsetting |
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`FieldValue`]

mod codec;
mod error;
mod fields;
mod filename;
mod path_spec;
mod schema;
mod smart_path;
mod smart_tree;

pub use codec::{FieldCodec, IntegerCodec, TimestampCodec, format_width};
pub use error::NamingError;
pub use fields::{FieldDefinition, FieldValue};
pub use filename::SmartFilename;
pub use path_spec::{PathLevelSpec, ROOT_LEVEL};
pub use schema::{DEFAULT_DELIMITER, DEFAULT_PAD, FilenameSchema};
pub use smart_path::SmartPath;
pub use smart_tree::SmartTree;
