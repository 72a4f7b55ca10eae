//! # Smart Paths
//!
//! A directory path built from a level specification, with search helpers.
//!
//! ## Responsibility
//! - Resolve a [`PathLevelSpec`] into a concrete directory
//! - Create the directory tree on disk on request
//! - Search files under any level by anchored regex, optionally filtered by
//!   an embedded timestamp window
//!
//! Searches list files only, never subdirectories, and return names in
//! lexical order.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use regex::Regex;

use crate::codec::{format_width, parse_timestamp};
use crate::{NamingError, PathLevelSpec};

/// A resolved directory path with level-aware navigation and file search.
///
/// # Examples
///
/// ```rust,no_run
/// use pathscheme::{PathLevelSpec, SmartPath};
///
/// let spec = PathLevelSpec::new(["root", "sensor", "group"])
///     .unwrap()
///     .with_level("root", "/data")
///     .unwrap()
///     .with_level("sensor", "Sentinel-1_CSAR")
///     .unwrap()
///     .with_level("group", "C1003")
///     .unwrap();
///
/// let path = SmartPath::new(spec);
/// let files = path.search("group", r"SSM.*\.tif$").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SmartPath {
    spec: PathLevelSpec,
    directory: PathBuf,
}

impl SmartPath {
    /// Build a path from a level specification.
    pub fn new(spec: PathLevelSpec) -> Self {
        let directory = spec.resolve(None);
        Self { spec, directory }
    }

    /// The level specification behind this path.
    #[inline]
    pub fn spec(&self) -> &PathLevelSpec {
        &self.spec
    }

    /// The fully resolved directory.
    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The directory truncated at the given level.
    ///
    /// # Errors
    ///
    /// [`NamingError::UnknownLevel`] if the level is not in the hierarchy.
    pub fn level_directory(&self, level: &str) -> Result<PathBuf, NamingError> {
        if !self.spec.hierarchy().iter().any(|l| l == level) {
            return Err(NamingError::UnknownLevel {
                level: level.to_string(),
            });
        }
        Ok(self.spec.resolve(Some(level)))
    }

    /// Join file names onto the directory resolved at a level, preserving
    /// input order.
    ///
    /// # Errors
    ///
    /// [`NamingError::UnknownLevel`] if the level is not in the hierarchy.
    pub fn expand<I, S>(&self, level: &str, names: I) -> Result<Vec<PathBuf>, NamingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dir = self.level_directory(level)?;
        Ok(names.into_iter().map(|n| dir.join(n.as_ref())).collect())
    }

    /// Create the directory on disk, including missing parents. Idempotent.
    ///
    /// # Errors
    ///
    /// [`NamingError::Io`] on filesystem failure.
    pub fn materialize(&self) -> Result<(), NamingError> {
        fs::create_dir_all(&self.directory).map_err(|source| NamingError::Io {
            operation: "create_dir_all",
            path: self.directory.clone(),
            source,
        })
    }

    /// Re-anchor this path at a new root directory.
    pub fn rebase(&mut self, new_root: impl Into<String>) {
        self.spec = self.spec.rebased(new_root);
        self.directory = self.spec.resolve(None);
    }

    /// File names under a level's directory whose names match `pattern` at
    /// the start, in lexical order.
    ///
    /// # Errors
    ///
    /// - [`NamingError::UnknownLevel`] for a level outside the hierarchy
    /// - [`NamingError::InvalidPattern`] for a malformed regex
    /// - [`NamingError::Io`] on directory read failure
    pub fn search(&self, level: &str, pattern: &str) -> Result<Vec<String>, NamingError> {
        let mut names: Vec<String> = self
            .search_entries(level, pattern)?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Like [`search`](Self::search), but returns full paths.
    ///
    /// # Errors
    ///
    /// Same as [`search`](Self::search).
    pub fn search_paths(&self, level: &str, pattern: &str) -> Result<Vec<PathBuf>, NamingError> {
        let mut paths: Vec<PathBuf> = self
            .search_entries(level, pattern)?
            .into_iter()
            .map(|(_, path)| path)
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Search a level for files carrying a timestamp at a fixed position in
    /// their name, keeping those inside the given inclusive window and
    /// returning `(timestamp, name)` pairs in ascending timestamp order.
    ///
    /// `date_position` is the byte offset of the timestamp in the file name;
    /// `date_format` is a chrono format string whose rendered width decides
    /// how many characters are sliced.
    ///
    /// # Errors
    ///
    /// As [`search`](Self::search), plus [`NamingError::TimestampParse`]
    /// when a matched name's slice does not conform to `date_format`.
    pub fn search_with_timestamps(
        &self,
        level: &str,
        pattern: &str,
        date_position: usize,
        date_format: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<(NaiveDateTime, String)>, NamingError> {
        Ok(self
            .stamped_entries(level, pattern, date_position, date_format, start, end)?
            .into_iter()
            .map(|(stamp, name, _)| (stamp, name))
            .collect())
    }

    /// Like [`search_with_timestamps`](Self::search_with_timestamps), but
    /// returns full paths.
    ///
    /// # Errors
    ///
    /// Same as [`search_with_timestamps`](Self::search_with_timestamps).
    pub fn search_paths_with_timestamps(
        &self,
        level: &str,
        pattern: &str,
        date_position: usize,
        date_format: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<(NaiveDateTime, PathBuf)>, NamingError> {
        Ok(self
            .stamped_entries(level, pattern, date_position, date_format, start, end)?
            .into_iter()
            .map(|(stamp, _, path)| (stamp, path))
            .collect())
    }

    fn stamped_entries(
        &self,
        level: &str,
        pattern: &str,
        date_position: usize,
        date_format: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<(NaiveDateTime, String, PathBuf)>, NamingError> {
        let width = format_width(date_format);
        let mut stamped = Vec::new();
        for (name, path) in self.search_entries(level, pattern)? {
            let slice = name.get(date_position..date_position + width).ok_or_else(|| {
                NamingError::TimestampParse {
                    raw: name.clone(),
                    format: date_format.to_string(),
                }
            })?;
            let stamp = parse_timestamp(slice, date_format)?;
            if start.is_some_and(|s| stamp < s) || end.is_some_and(|e| stamp > e) {
                continue;
            }
            stamped.push((stamp, name, path));
        }
        stamped.sort();
        Ok(stamped)
    }

    fn search_entries(
        &self,
        level: &str,
        pattern: &str,
    ) -> Result<Vec<(String, PathBuf)>, NamingError> {
        let regex = Regex::new(pattern).map_err(|source| NamingError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let dir = self.level_directory(level)?;
        let entries = fs::read_dir(&dir).map_err(|source| NamingError::Io {
            operation: "read_dir",
            path: dir.clone(),
            source,
        })?;

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| NamingError::Io {
                operation: "read_dir",
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // Anchored match: the pattern must hit at the start of the name.
            if regex.find(name).is_some_and(|m| m.start() == 0) {
                matches.push((name.to_string(), path));
            }
        }
        Ok(matches)
    }
}
