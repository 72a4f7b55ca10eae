//! # Path Level Specifications
//!
//! Named hierarchy levels mapped to directory names.
//!
//! ## Responsibility
//! - Declare a directory hierarchy as an ordered list of level names
//! - Bind level names to concrete directory names, allowing gaps
//! - Resolve the bound levels into a relative or rooted path, truncating at
//!   the first absent level
//!
//! The reserved level name [`ROOT_LEVEL`] marks the hierarchy's anchor;
//! [`rebased`](PathLevelSpec::rebased) swaps it for a new root directory.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::NamingError;

/// Reserved level name for the hierarchy anchor.
pub const ROOT_LEVEL: &str = "root";

/// An ordered directory hierarchy with per-level directory names.
///
/// Levels bind independently of order, but resolution walks the hierarchy
/// top-down and stops at the first level without a value, so a bound level
/// below a gap never reaches the resolved path.
///
/// # Examples
///
/// ```rust
/// use pathscheme::PathLevelSpec;
/// use std::path::PathBuf;
///
/// let spec = PathLevelSpec::new(["root", "sensor", "mode", "group"])
///     .unwrap()
///     .with_level("root", "/data")
///     .unwrap()
///     .with_level("sensor", "Sentinel-1_CSAR")
///     .unwrap()
///     .with_level("group", "C1003")
///     .unwrap();
///
/// // "mode" is absent, so "group" is cut off.
/// assert_eq!(spec.resolve(None), PathBuf::from("/data/Sentinel-1_CSAR"));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathLevelSpec {
    hierarchy: Vec<String>,
    levels: HashMap<String, String>,
}

impl PathLevelSpec {
    /// Create a spec over the given hierarchy with no levels bound.
    ///
    /// # Errors
    ///
    /// [`NamingError::DuplicateLevel`] if two levels share a name.
    pub fn new<I, S>(hierarchy: I) -> Result<Self, NamingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let hierarchy: Vec<String> = hierarchy.into_iter().map(Into::into).collect();
        for (i, name) in hierarchy.iter().enumerate() {
            if hierarchy[..i].contains(name) {
                return Err(NamingError::DuplicateLevel { name: name.clone() });
            }
        }
        Ok(Self {
            hierarchy,
            levels: HashMap::new(),
        })
    }

    /// Bind a level to a directory name.
    ///
    /// # Errors
    ///
    /// [`NamingError::UnknownLevel`] if the level is not in the hierarchy.
    pub fn with_level(
        mut self,
        level: impl AsRef<str>,
        directory: impl Into<String>,
    ) -> Result<Self, NamingError> {
        let level = level.as_ref();
        if !self.hierarchy.iter().any(|l| l == level) {
            return Err(NamingError::UnknownLevel {
                level: level.to_string(),
            });
        }
        self.levels.insert(level.to_string(), directory.into());
        Ok(self)
    }

    /// The hierarchy's level names in order.
    #[inline]
    pub fn hierarchy(&self) -> &[String] {
        &self.hierarchy
    }

    /// The directory name bound to a level, if any.
    pub fn level(&self, level: &str) -> Option<&str> {
        self.levels.get(level).map(String::as_str)
    }

    /// Resolve the bound levels into a path.
    ///
    /// Walks the hierarchy in order, appending each bound directory name and
    /// stopping at the first absent level. With `stop_at` set, resolution
    /// also stops after that level.
    pub fn resolve(&self, stop_at: Option<&str>) -> PathBuf {
        let mut path = PathBuf::new();
        for level in &self.hierarchy {
            match self.levels.get(level) {
                Some(dir) => path.push(dir),
                None => break,
            }
            if stop_at == Some(level.as_str()) {
                break;
            }
        }
        path
    }

    /// A copy of this spec re-anchored at a new root.
    ///
    /// The [`ROOT_LEVEL`] level moves to the head of the hierarchy (added if
    /// missing) and binds to `new_root`; all other levels carry over.
    #[must_use]
    pub fn rebased(&self, new_root: impl Into<String>) -> Self {
        let mut hierarchy = vec![ROOT_LEVEL.to_string()];
        hierarchy.extend(
            self.hierarchy
                .iter()
                .filter(|l| l.as_str() != ROOT_LEVEL)
                .cloned(),
        );
        let mut levels = self.levels.clone();
        levels.insert(ROOT_LEVEL.to_string(), new_root.into());
        Self { hierarchy, levels }
    }
}
