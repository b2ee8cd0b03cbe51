use log::{debug, info, warn};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use walkdir::WalkDir;

use crate::error::ScanError;

/// App ids (as strings) with a manifest in the library folder
pub type InstalledSet = HashSet<String>;

fn manifest_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^appmanifest_(\d+)\.acf$").expect("valid manifest pattern")
    })
}

/// Extract the app id from an `appmanifest_<id>.acf` file name.
///
/// The whole name must match. Steam's own `appmanifest_<id>.acf` files always
/// do; names with a prefix or suffix (`old_appmanifest_570.acf`,
/// `appmanifest_440.acf.tmp`) are left out, where a plain substring search
/// would count them as installed.
pub fn manifest_app_id(file_name: &str) -> Option<&str> {
    manifest_pattern()
        .captures(file_name)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Collect installed app ids from the top level of `dir`.
pub fn try_scan_installed(dir: &Path) -> Result<InstalledSet, ScanError> {
    let mut installed = InstalledSet::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };

        if let Some(app_id) = manifest_app_id(file_name) {
            debug!("Found manifest for app {}", app_id);
            installed.insert(app_id.to_string());
        }
    }

    Ok(installed)
}

/// Like [`try_scan_installed`], but an unreadable folder counts as nothing
/// installed. The failure is logged.
pub fn scan_installed(dir: &Path) -> InstalledSet {
    match try_scan_installed(dir) {
        Ok(installed) => {
            info!("Found {} installed games in {}", installed.len(), dir.display());
            installed
        }
        Err(e) => {
            warn!("Treating every game as not installed: {}", e);
            InstalledSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use test_case::test_case;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "\"AppState\"\n{\n}\n").unwrap();
    }

    #[test]
    fn finds_manifests_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "appmanifest_440.acf");
        touch(dir.path(), "appmanifest_570.acf");
        touch(dir.path(), "readme.txt");

        let installed = try_scan_installed(dir.path()).unwrap();

        let expected: InstalledSet = ["440", "570"].iter().map(|s| s.to_string()).collect();
        assert_eq!(installed, expected);
    }

    #[test]
    fn does_not_descend_into_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("common");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "appmanifest_10.acf");
        touch(dir.path(), "appmanifest_20.acf");

        let installed = scan_installed(dir.path());

        assert_eq!(installed.len(), 1);
        assert!(installed.contains("20"));
    }

    #[test]
    fn unreadable_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(try_scan_installed(&missing).is_err());
        assert!(scan_installed(&missing).is_empty());
    }

    #[test]
    fn empty_folder_has_nothing_installed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_installed(dir.path()).is_empty());
    }

    #[test_case("appmanifest_440.acf" => Some("440"))]
    #[test_case("appmanifest_1234567.acf" => Some("1234567"))]
    #[test_case("appmanifest_abc.acf" => None)]
    #[test_case("appmanifest_.acf" => None)]
    #[test_case("appmanifest_440.acf.tmp" => None)]
    #[test_case("old_appmanifest_570.acf" => None)]
    #[test_case("libraryfolders.vdf" => None)]
    fn parses_manifest_names(name: &str) -> Option<&str> {
        manifest_app_id(name)
    }
}
