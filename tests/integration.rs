//! Filesystem-backed integration tests for path resolution, search, tree
//! discovery and subsetting.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use pathscheme::{NamingError, PathLevelSpec, SmartPath, SmartTree};
use tempfile::TempDir;

fn touch(dir: &Path, name: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), b"").unwrap();
}

/// A small SAR-style archive:
///
/// ```text
/// root/
///   Sentinel-1_CSAR/IWGRDH/ssm/E048N012T6/       3 product files
///   Sentinel-1_CSAR/IWGRDH/ssm/E048N015T6/       1 product file
///   Sentinel-1_CSAR/IWGRDH/ssm-noise/E048N012T6/ 1 product file
///   Sentinel-1_CSAR/EW/ssm/E048N012T6/           (empty)
/// ```
fn build_archive() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let base = root.path().join("Sentinel-1_CSAR");

    let tile = base.join("IWGRDH").join("ssm").join("E048N012T6");
    touch(&tile, "M_20161218_051642_SSM.tif");
    touch(&tile, "M_20161220_051642_SSM.tif");
    touch(&tile, "M_20170102_051642_SSM.tif");
    touch(&tile, "readme.txt");

    let tile = base.join("IWGRDH").join("ssm").join("E048N015T6");
    touch(&tile, "M_20161218_051642_SSM.tif");

    let tile = base.join("IWGRDH").join("ssm-noise").join("E048N012T6");
    touch(&tile, "M_20161218_051642_NOISE.tif");

    fs::create_dir_all(base.join("EW").join("ssm").join("E048N012T6")).unwrap();
    root
}

fn tile_path(root: &Path, mode: &str, var: &str, tile: &str) -> SmartPath {
    let spec = PathLevelSpec::new(["root", "sensor", "mode", "var", "tile"])
        .unwrap()
        .with_level("root", root.to_string_lossy())
        .unwrap()
        .with_level("sensor", "Sentinel-1_CSAR")
        .unwrap()
        .with_level("mode", mode)
        .unwrap()
        .with_level("var", var)
        .unwrap()
        .with_level("tile", tile)
        .unwrap();
    SmartPath::new(spec)
}

#[test]
fn materialize_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    let path = tile_path(root.path(), "IWGRDH", "ssm", "E036N039T3");
    assert!(!path.directory().exists());
    path.materialize().unwrap();
    assert!(path.directory().is_dir());
    path.materialize().unwrap();
    assert!(path.directory().is_dir());
}

#[test]
fn absent_level_truncates_materialized_path() {
    let root = tempfile::tempdir().unwrap();
    let spec = PathLevelSpec::new(["root", "sensor", "mode", "var"])
        .unwrap()
        .with_level("root", root.path().to_string_lossy())
        .unwrap()
        .with_level("sensor", "Sentinel-1_CSAR")
        .unwrap()
        .with_level("var", "ssm")
        .unwrap();
    let path = SmartPath::new(spec);
    assert_eq!(path.directory(), root.path().join("Sentinel-1_CSAR"));
}

#[test]
fn search_lists_matching_files_sorted() {
    let root = build_archive();
    let path = tile_path(root.path(), "IWGRDH", "ssm", "E048N012T6");

    let all = path.search("tile", "M_").unwrap();
    assert_eq!(
        all,
        vec![
            "M_20161218_051642_SSM.tif",
            "M_20161220_051642_SSM.tif",
            "M_20170102_051642_SSM.tif",
        ]
    );

    // Anchored at the start: "SSM" appears mid-name only.
    assert!(path.search("tile", "SSM").unwrap().is_empty());

    // Directories never match, files in parent levels are separate.
    assert_eq!(path.search("var", "M_").unwrap(), Vec::<String>::new());
}

#[test]
fn search_paths_are_rooted() {
    let root = build_archive();
    let path = tile_path(root.path(), "IWGRDH", "ssm", "E048N012T6");
    let paths = path.search_paths("tile", "M_").unwrap();
    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|p| p.starts_with(root.path())));
}

#[test]
fn search_with_timestamps_filters_and_orders() {
    let root = build_archive();
    let path = tile_path(root.path(), "IWGRDH", "ssm", "E048N012T6");

    let stamp = |y, mo, d| {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(5, 16, 42)
            .unwrap()
    };
    let start = NaiveDate::from_ymd_opt(2016, 12, 19)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let end = NaiveDate::from_ymd_opt(2017, 1, 31)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let hits = path
        .search_with_timestamps("tile", "M_", 2, "%Y%m%d_%H%M%S", Some(start), Some(end))
        .unwrap();
    assert_eq!(
        hits,
        vec![
            (stamp(2016, 12, 20), "M_20161220_051642_SSM.tif".to_string()),
            (stamp(2017, 1, 2), "M_20170102_051642_SSM.tif".to_string()),
        ]
    );

    let open_ended = path
        .search_with_timestamps("tile", "M_", 2, "%Y%m%d_%H%M%S", Some(start), None)
        .unwrap();
    assert_eq!(open_ended.len(), 2);

    let rooted = path
        .search_paths_with_timestamps("tile", "M_", 2, "%Y%m%d_%H%M%S", None, None)
        .unwrap();
    assert_eq!(rooted.len(), 3);
    assert_eq!(rooted[0].0, stamp(2016, 12, 18));
    assert!(rooted.iter().all(|(_, p)| p.starts_with(root.path())));
}

#[test]
fn search_with_timestamps_rejects_short_names() {
    let root = tempfile::tempdir().unwrap();
    let path = tile_path(root.path(), "IWGRDH", "ssm", "E048N012T6");
    path.materialize().unwrap();
    touch(path.directory(), "M_2016.tif");

    let err = path
        .search_with_timestamps("tile", "M_", 2, "%Y%m%d_%H%M%S", None, None)
        .unwrap_err();
    assert!(matches!(err, NamingError::TimestampParse { .. }));
}

#[test]
fn discover_registers_dirs_and_files() {
    let root = build_archive();
    let mut tree = SmartTree::new(root.path(), ["sensor", "mode", "var", "tile"]).unwrap();
    tree.discover(None, Some(r"\.tif$")).unwrap();

    assert_eq!(tree.count_dirs(), 4);
    assert_eq!(tree.count_files(), 5);

    let dirs = tree.all_dirs();
    assert!(dirs.iter().all(|d| d.starts_with(root.path())));
    assert!(dirs.iter().any(|d| d.ends_with("ssm-noise/E048N012T6")));
}

#[test]
fn discover_stops_at_level() {
    let root = build_archive();
    let mut tree = SmartTree::new(root.path(), ["sensor", "mode", "var", "tile"]).unwrap();
    tree.discover(Some("var"), None).unwrap();

    assert_eq!(tree.count_dirs(), 3);
    assert!(tree.all_dirs().iter().all(|d| {
        d.ends_with("ssm") || d.ends_with("ssm-noise") || d.ends_with("EW/ssm")
    }));
}

#[test]
fn collect_level_values_with_pattern() {
    let root = build_archive();
    let mut tree = SmartTree::new(root.path(), ["sensor", "mode", "var", "tile"]).unwrap();
    tree.discover(None, None).unwrap();

    let vars = tree.collect_level_values("var", None).unwrap();
    assert_eq!(
        vars.into_iter().collect::<Vec<_>>(),
        vec!["ssm", "ssm-noise"]
    );

    let tiles = tree.collect_level_values("tile", Some("N012")).unwrap();
    assert_eq!(tiles.into_iter().collect::<Vec<_>>(), vec!["E048N012T6"]);
}

#[test]
fn filter_matching_with_negation() {
    let root = build_archive();
    let mut tree = SmartTree::new(root.path(), ["sensor", "mode", "var", "tile"]).unwrap();
    tree.discover(None, Some(r"\.tif$")).unwrap();

    let ssm_only = tree.filter_matching("var", &["ssm", "-noise"]).unwrap();
    assert_eq!(ssm_only.count_dirs(), 3);
    assert_eq!(ssm_only.count_files(), 4);
    assert!(
        ssm_only
            .all_dirs()
            .iter()
            .all(|d| !d.to_string_lossy().contains("noise"))
    );
}

#[test]
fn filter_unique_rebased_re_roots_subtree() {
    let root = build_archive();
    let mut tree = SmartTree::new(root.path(), ["sensor", "mode", "var", "tile"]).unwrap();
    tree.discover(None, Some(r"\.tif$")).unwrap();

    // "E048N012T6" names three distinct tile directories.
    let err = tree.filter_unique_rebased("tile", "E048N012T6").unwrap_err();
    assert!(matches!(err, NamingError::AmbiguousSubset { count: 3, .. }));

    // "-noise" leaves plain "ssm", but under two distinct modes.
    let err = tree.filter_unique_rebased("var", "-noise").unwrap_err();
    assert!(matches!(err, NamingError::AmbiguousSubset { count: 2, .. }));

    let sub = tree.filter_unique_rebased("tile", "E048N015T6").unwrap();
    assert!(sub.root().ends_with("ssm/E048N015T6"));
    assert_eq!(sub.count_files(), 1);

    let err = tree.filter_unique_rebased("tile", "E999").unwrap_err();
    assert!(matches!(err, NamingError::NoMatch { .. }));
}

#[test]
fn find_unique_with_multiple_criteria() {
    let root = build_archive();
    let mut tree = SmartTree::new(root.path(), ["sensor", "mode", "var", "tile"]).unwrap();
    tree.discover(None, None).unwrap();

    let err = tree.find_unique(&["E048N012T6"]).unwrap_err();
    assert!(matches!(err, NamingError::AmbiguousSubset { .. }));

    let member = tree
        .find_unique(&["IWGRDH", "E048N012T6", "-noise"])
        .unwrap();
    assert!(member.directory().ends_with("IWGRDH/ssm/E048N012T6"));

    let err = tree.find_unique(&["EW", "noise"]).unwrap_err();
    assert!(matches!(err, NamingError::NoMatch { .. }));
}
