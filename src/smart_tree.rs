//! # Smart Trees
//!
//! A collection of [`SmartPath`]s sharing one root and one hierarchy.
//!
//! ## Responsibility
//! - Hold tree members keyed by their resolved directory
//! - Discover members by walking the filesystem level by level
//! - Register files matching a pattern alongside the directory structure
//! - Subset the tree by per-level patterns, with `-` prefix negation
//!
//! Discovery is breadth-first and ordered: each level's subdirectories are
//! visited in lexical order, so member insertion order is deterministic for
//! a given directory tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::path_spec::ROOT_LEVEL;
use crate::{NamingError, PathLevelSpec, SmartPath};

/// One subset pattern: an unanchored regex, negated by a leading `-`.
///
/// `"IWGRDH"` keeps values containing a match; `"-IWGRDH"` keeps values
/// without one.
#[derive(Debug)]
struct LevelPattern {
    regex: Regex,
    negated: bool,
}

impl LevelPattern {
    fn parse(pattern: &str) -> Result<Self, NamingError> {
        let (negated, body) = match pattern.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let regex = Regex::new(body).map_err(|source| NamingError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex, negated })
    }

    fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text) != self.negated
    }
}

/// A rooted tree of [`SmartPath`] members over a common hierarchy.
///
/// # Examples
///
/// ```rust,no_run
/// use pathscheme::SmartTree;
///
/// let mut tree = SmartTree::new("/data", ["sensor", "mode", "group"]).unwrap();
/// tree.discover(None, Some(r"\.tif$")).unwrap();
/// println!("{} dirs, {} files", tree.count_dirs(), tree.count_files());
/// ```
#[derive(Debug, Clone)]
pub struct SmartTree {
    root: PathBuf,
    hierarchy: Vec<String>,
    members: BTreeMap<PathBuf, SmartPath>,
    file_register: Vec<PathBuf>,
}

impl SmartTree {
    /// Create an empty tree rooted at an existing directory.
    ///
    /// `hierarchy` names the levels below the root; the reserved
    /// [`ROOT_LEVEL`](crate::ROOT_LEVEL) is prepended automatically.
    ///
    /// # Errors
    ///
    /// - [`NamingError::RootNotFound`] if `root` is not a directory
    /// - [`NamingError::DuplicateLevel`] if two levels share a name
    pub fn new<I, S>(root: impl Into<PathBuf>, hierarchy: I) -> Result<Self, NamingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let root = root.into();
        if !root.is_dir() {
            return Err(NamingError::RootNotFound { path: root });
        }
        Self::unchecked(root, hierarchy)
    }

    // Subset constructors reuse this to skip the existence check: a subtree
    // of an existing tree is rooted in directories already seen on disk.
    fn unchecked<I, S>(root: PathBuf, hierarchy: I) -> Result<Self, NamingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut full = vec![ROOT_LEVEL.to_string()];
        full.extend(hierarchy.into_iter().map(Into::into));
        for (i, name) in full.iter().enumerate() {
            if full[..i].contains(name) {
                return Err(NamingError::DuplicateLevel { name: name.clone() });
            }
        }
        Ok(Self {
            root,
            hierarchy: full,
            members: BTreeMap::new(),
            file_register: Vec::new(),
        })
    }

    /// The tree's root directory.
    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The full hierarchy, [`ROOT_LEVEL`](crate::ROOT_LEVEL) included.
    #[inline]
    pub fn hierarchy(&self) -> &[String] {
        &self.hierarchy
    }

    /// The tree's members in directory order.
    pub fn members(&self) -> impl Iterator<Item = &SmartPath> {
        self.members.values()
    }

    /// Registered file paths, in discovery order.
    #[inline]
    pub fn files(&self) -> &[PathBuf] {
        &self.file_register
    }

    /// Number of member directories.
    #[inline]
    pub fn count_dirs(&self) -> usize {
        self.members.len()
    }

    /// Number of registered files.
    #[inline]
    pub fn count_files(&self) -> usize {
        self.file_register.len()
    }

    /// All member directories in lexical order.
    pub fn all_dirs(&self) -> Vec<&Path> {
        self.members.keys().map(PathBuf::as_path).collect()
    }

    /// The member at the given resolved directory, if any.
    pub fn member(&self, dir: &Path) -> Option<&SmartPath> {
        self.members.get(dir)
    }

    /// Add a path to the tree, rebasing it onto the tree's root.
    ///
    /// # Errors
    ///
    /// [`NamingError::HierarchyMismatch`] if the path's hierarchy (root level
    /// aside) differs from the tree's. The tree is left unchanged.
    pub fn add(&mut self, path: SmartPath) -> Result<(), NamingError> {
        let tree_levels: Vec<&str> = self.sub_hierarchy().collect();
        let path_levels: Vec<&str> = path
            .spec()
            .hierarchy()
            .iter()
            .map(String::as_str)
            .filter(|l| *l != ROOT_LEVEL)
            .collect();
        if path_levels != tree_levels {
            return Err(NamingError::HierarchyMismatch {
                expected: tree_levels.join(", "),
                found: path_levels.join(", "),
            });
        }
        let mut path = path;
        path.rebase(self.root.to_string_lossy().into_owned());
        self.members.insert(path.directory().to_path_buf(), path);
        Ok(())
    }

    /// Remove the member at the given directory, dropping its registered
    /// files with it.
    pub fn remove(&mut self, dir: &Path) -> Option<SmartPath> {
        let removed = self.members.remove(dir)?;
        self.file_register.retain(|f| !f.starts_with(dir));
        Some(removed)
    }

    /// Walk the filesystem below the root and register one member per
    /// deepest reachable branch.
    ///
    /// Descends one hierarchy level at a time, visiting subdirectories in
    /// lexical order. A branch ends where no subdirectories remain or at
    /// `stop_level` when given. With `file_pattern` set, files in each
    /// member's directory whose names match the unanchored regex are added
    /// to the file register.
    ///
    /// # Errors
    ///
    /// - [`NamingError::UnknownLevel`] for a `stop_level` outside the
    ///   hierarchy
    /// - [`NamingError::InvalidPattern`] for a malformed `file_pattern`
    /// - [`NamingError::Io`] on directory read failure
    pub fn discover(
        &mut self,
        stop_level: Option<&str>,
        file_pattern: Option<&str>,
    ) -> Result<(), NamingError> {
        if let Some(level) = stop_level
            && !self.hierarchy.iter().any(|l| l == level)
        {
            return Err(NamingError::UnknownLevel {
                level: level.to_string(),
            });
        }
        let file_regex = file_pattern
            .map(|p| {
                Regex::new(p).map_err(|source| NamingError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .transpose()?;

        let base = PathLevelSpec::new(self.hierarchy.clone())?
            .with_level(ROOT_LEVEL, self.root.to_string_lossy().into_owned())?;

        let mut frontier = vec![base];
        let levels: Vec<String> = self.sub_hierarchy().map(str::to_string).collect();
        for level in &levels {
            log::debug!("discovering level '{level}' across {} branches", frontier.len());
            let mut next = Vec::new();
            for spec in frontier {
                let dir = spec.resolve(None);
                let subdirs = sorted_subdirs(&dir)?;
                if subdirs.is_empty() {
                    self.finalize_member(spec, file_regex.as_ref())?;
                    continue;
                }
                for name in subdirs {
                    next.push(spec.clone().with_level(level, name)?);
                }
            }
            frontier = next;
            if stop_level == Some(level.as_str()) {
                break;
            }
        }
        for spec in frontier {
            self.finalize_member(spec, file_regex.as_ref())?;
        }
        log::debug!(
            "discovery finished: {} dirs, {} files",
            self.members.len(),
            self.file_register.len()
        );
        Ok(())
    }

    fn finalize_member(
        &mut self,
        spec: PathLevelSpec,
        file_regex: Option<&Regex>,
    ) -> Result<(), NamingError> {
        let member = SmartPath::new(spec);
        let dir = member.directory().to_path_buf();
        if let Some(regex) = file_regex {
            for name in sorted_files(&dir)? {
                if regex.is_match(&name) {
                    self.file_register.push(dir.join(name));
                }
            }
        }
        self.members.insert(dir, member);
        Ok(())
    }

    /// Distinct directory names bound at a level across all members,
    /// optionally filtered by an unanchored regex.
    ///
    /// # Errors
    ///
    /// - [`NamingError::UnknownLevel`] for a level outside the hierarchy
    /// - [`NamingError::InvalidPattern`] for a malformed pattern
    pub fn collect_level_values(
        &self,
        level: &str,
        pattern: Option<&str>,
    ) -> Result<BTreeSet<String>, NamingError> {
        self.check_level(level)?;
        let regex = pattern
            .map(|p| {
                Regex::new(p).map_err(|source| NamingError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .transpose()?;
        Ok(self
            .members
            .values()
            .filter_map(|m| m.spec().level(level))
            .filter(|v| regex.as_ref().is_none_or(|r| r.is_match(v)))
            .map(str::to_string)
            .collect())
    }

    /// A subtree keeping the members whose directory name at `level`
    /// satisfies every pattern.
    ///
    /// Patterns are unanchored regexes; a leading `-` negates. Registered
    /// files under surviving members carry over.
    ///
    /// # Errors
    ///
    /// - [`NamingError::UnknownLevel`] for a level outside the hierarchy
    /// - [`NamingError::InvalidPattern`] for a malformed pattern
    pub fn filter_matching(
        &self,
        level: &str,
        patterns: &[&str],
    ) -> Result<SmartTree, NamingError> {
        self.check_level(level)?;
        let patterns = patterns
            .iter()
            .map(|p| LevelPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut subtree = SmartTree::unchecked(
            self.root.clone(),
            self.sub_hierarchy().map(str::to_string),
        )?;
        for (dir, member) in &self.members {
            let keep = member
                .spec()
                .level(level)
                .is_some_and(|value| patterns.iter().all(|p| p.matches(value)));
            if keep {
                subtree.members.insert(dir.clone(), member.clone());
            }
        }
        subtree.file_register = self
            .file_register
            .iter()
            .filter(|f| subtree.members.keys().any(|dir| f.starts_with(dir)))
            .cloned()
            .collect();
        Ok(subtree)
    }

    /// A subtree re-rooted at the single directory matching `pattern` at
    /// `level`.
    ///
    /// The new tree's root is that directory; its hierarchy is the levels
    /// below `level`, and the matching members carry over rebased.
    ///
    /// # Errors
    ///
    /// - [`NamingError::NoMatch`] when nothing matches
    /// - [`NamingError::AmbiguousSubset`] when several distinct directories
    ///   match
    /// - [`NamingError::UnknownLevel`] / [`NamingError::InvalidPattern`] as
    ///   in [`filter_matching`](Self::filter_matching)
    pub fn filter_unique_rebased(
        &self,
        level: &str,
        pattern: &str,
    ) -> Result<SmartTree, NamingError> {
        self.check_level(level)?;
        let matcher = LevelPattern::parse(pattern)?;

        let mut roots = BTreeSet::new();
        for member in self.members.values() {
            if member
                .spec()
                .level(level)
                .is_some_and(|v| matcher.matches(v))
            {
                roots.insert(member.level_directory(level)?);
            }
        }
        let new_root = match roots.len() {
            0 => {
                return Err(NamingError::NoMatch {
                    pattern: pattern.to_string(),
                });
            }
            1 => roots.into_iter().next().unwrap_or_default(),
            count => {
                return Err(NamingError::AmbiguousSubset {
                    pattern: pattern.to_string(),
                    count,
                });
            }
        };

        let below: Vec<String> = self
            .sub_hierarchy()
            .skip_while(|l| *l != level)
            .skip(1)
            .map(str::to_string)
            .collect();
        let mut subtree = SmartTree::unchecked(new_root.clone(), below.clone())?;
        for member in self.members.values() {
            if !member.directory().starts_with(&new_root) {
                continue;
            }
            let mut spec = PathLevelSpec::new(subtree.hierarchy.clone())?
                .with_level(ROOT_LEVEL, new_root.to_string_lossy().into_owned())?;
            for l in &below {
                if let Some(value) = member.spec().level(l) {
                    spec = spec.with_level(l, value)?;
                }
            }
            let rebased = SmartPath::new(spec);
            subtree.members.insert(rebased.directory().to_path_buf(), rebased);
        }
        subtree.file_register = self
            .file_register
            .iter()
            .filter(|f| f.starts_with(&new_root))
            .cloned()
            .collect();
        Ok(subtree)
    }

    /// The single member whose directory satisfies every pattern.
    ///
    /// Patterns are unanchored regexes over the directory string relative to
    /// the tree root, with `-` prefix negation, so an absolute root path
    /// never leaks into the match.
    ///
    /// # Errors
    ///
    /// - [`NamingError::NoMatch`] when nothing matches
    /// - [`NamingError::AmbiguousSubset`] when several members match
    /// - [`NamingError::InvalidPattern`] for a malformed pattern
    pub fn find_unique(&self, patterns: &[&str]) -> Result<&SmartPath, NamingError> {
        let parsed = patterns
            .iter()
            .map(|p| LevelPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        let joined = patterns.join(", ");

        let is_hit = |member: &SmartPath| {
            let dir = member
                .directory()
                .strip_prefix(&self.root)
                .unwrap_or(member.directory())
                .to_string_lossy();
            parsed.iter().all(|p| p.matches(&dir))
        };

        let mut found = None;
        for member in self.members.values() {
            if is_hit(member) {
                if found.is_some() {
                    return Err(NamingError::AmbiguousSubset {
                        pattern: joined,
                        count: self.members.values().filter(|m| is_hit(m)).count(),
                    });
                }
                found = Some(member);
            }
        }
        found.ok_or(NamingError::NoMatch { pattern: joined })
    }

    fn sub_hierarchy(&self) -> impl Iterator<Item = &str> {
        self.hierarchy
            .iter()
            .map(String::as_str)
            .filter(|l| *l != ROOT_LEVEL)
    }

    fn check_level(&self, level: &str) -> Result<(), NamingError> {
        if self.hierarchy.iter().any(|l| l == level) {
            Ok(())
        } else {
            Err(NamingError::UnknownLevel {
                level: level.to_string(),
            })
        }
    }
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<String>, NamingError> {
    read_names(dir, true)
}

fn sorted_files(dir: &Path) -> Result<Vec<String>, NamingError> {
    read_names(dir, false)
}

fn read_names(dir: &Path, directories: bool) -> Result<Vec<String>, NamingError> {
    let entries = fs::read_dir(dir).map_err(|source| NamingError::Io {
        operation: "read_dir",
        path: dir.to_path_buf(),
        source,
    })?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| NamingError::Io {
            operation: "read_dir",
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.path().is_dir() != directories {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => log::warn!("skipping non-UTF8 entry {name:?} in {}", dir.display()),
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_pattern_positive_and_negated() {
        let pos = LevelPattern::parse("IWGRDH").unwrap();
        assert!(pos.matches("IWGRDH"));
        assert!(pos.matches("xx_IWGRDH_yy"));
        assert!(!pos.matches("EW"));

        let neg = LevelPattern::parse("-noise").unwrap();
        assert!(neg.matches("ssm"));
        assert!(!neg.matches("ssm-noise"));
    }

    #[test]
    fn level_pattern_rejects_bad_regex() {
        let err = LevelPattern::parse("[").unwrap_err();
        assert!(matches!(err, NamingError::InvalidPattern { .. }));
    }

    #[test]
    fn new_rejects_missing_root() {
        let err = SmartTree::new("/definitely/not/there", ["sensor"]).unwrap_err();
        assert!(matches!(err, NamingError::RootNotFound { .. }));
    }

    #[test]
    fn new_rejects_duplicate_levels() {
        let root = tempfile::tempdir().unwrap();
        let err = SmartTree::new(root.path(), ["sensor", "sensor"]).unwrap_err();
        assert!(matches!(err, NamingError::DuplicateLevel { .. }));
    }

    #[test]
    fn add_rejects_hierarchy_mismatch() {
        let root = tempfile::tempdir().unwrap();
        let mut tree = SmartTree::new(root.path(), ["sensor", "mode"]).unwrap();

        let spec = PathLevelSpec::new(["root", "sensor", "tile"])
            .unwrap()
            .with_level("root", "/elsewhere")
            .unwrap()
            .with_level("sensor", "Sentinel-1_CSAR")
            .unwrap();
        let err = tree.add(SmartPath::new(spec)).unwrap_err();
        assert!(matches!(err, NamingError::HierarchyMismatch { .. }));
        assert_eq!(tree.count_dirs(), 0);
    }

    #[test]
    fn add_rebases_onto_tree_root() {
        let root = tempfile::tempdir().unwrap();
        let mut tree = SmartTree::new(root.path(), ["sensor", "mode"]).unwrap();

        let spec = PathLevelSpec::new(["root", "sensor", "mode"])
            .unwrap()
            .with_level("root", "/elsewhere")
            .unwrap()
            .with_level("sensor", "Sentinel-1_CSAR")
            .unwrap()
            .with_level("mode", "IWGRDH")
            .unwrap();
        tree.add(SmartPath::new(spec)).unwrap();

        assert_eq!(tree.count_dirs(), 1);
        let dir = tree.all_dirs()[0];
        assert!(dir.starts_with(root.path()));
        assert!(dir.ends_with("Sentinel-1_CSAR/IWGRDH"));
    }

    #[test]
    fn remove_drops_member_and_files() {
        let root = tempfile::tempdir().unwrap();
        let mut tree = SmartTree::new(root.path(), ["sensor"]).unwrap();

        let spec = PathLevelSpec::new(["root", "sensor"])
            .unwrap()
            .with_level("root", root.path().to_string_lossy())
            .unwrap()
            .with_level("sensor", "Sentinel-1_CSAR")
            .unwrap();
        tree.add(SmartPath::new(spec)).unwrap();
        let dir = tree.all_dirs()[0].to_path_buf();
        tree.file_register.push(dir.join("a.tif"));

        assert!(tree.remove(&dir).is_some());
        assert_eq!(tree.count_dirs(), 0);
        assert_eq!(tree.count_files(), 0);
    }
}
