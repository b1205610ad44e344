//! Source file discovery and test-file placement.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::{debug, warn};

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target"];

/// One source file handed to the prompt generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReadResult {
    /// Path of the file.
    pub path: PathBuf,
    /// Full file content.
    pub content: String,
    /// Unified diff of the staged change, when read from the index.
    pub diff: Option<String>,
}

impl FileReadResult {
    /// Creates a result for a file read from disk.
    pub fn from_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            diff: None,
        }
    }

    /// Returns the file extension, if any.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|ext| ext.to_str())
    }
}

/// Matches paths by file extension.
#[derive(Debug)]
pub struct ExtensionFilter {
    set: GlobSet,
}

impl ExtensionFilter {
    /// Builds a filter accepting any of `extensions` (without leading dots).
    pub fn new(extensions: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for ext in extensions {
            let pattern = format!("**/*.{ext}");
            builder.add(
                Glob::new(&pattern)
                    .with_context(|| format!("Invalid file extension pattern: {pattern}"))?,
            );
        }
        let set = builder
            .build()
            .context("Failed to build file extension filter")?;
        Ok(Self { set })
    }

    /// Returns whether `path` has one of the accepted extensions.
    pub fn matches(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }
}

/// Where generated test files are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestFileLayout {
    /// Directory created next to the source file.
    pub dir_name: String,
    /// Marker inserted between the file stem and its extension.
    pub name_marker: String,
}

impl Default for TestFileLayout {
    fn default() -> Self {
        Self {
            dir_name: "__test__".to_string(),
            name_marker: ".test".to_string(),
        }
    }
}

impl TestFileLayout {
    /// Returns the test file path for `source`.
    ///
    /// `src/utils/math.ts` becomes `src/utils/__test__/math.test.ts`.
    pub fn test_path_for(&self, source: &Path) -> PathBuf {
        let parent = source.parent().unwrap_or_else(|| Path::new(""));
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = match source.extension() {
            Some(ext) => format!("{stem}{}.{}", self.name_marker, ext.to_string_lossy()),
            None => format!("{stem}{}", self.name_marker),
        };
        parent.join(&self.dir_name).join(file_name)
    }

    /// Returns whether `path` already looks like a generated or hand-written test.
    pub fn is_test_file(&self, path: &Path) -> bool {
        let in_test_dir = path.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            name == self.dir_name || name == "__tests__"
        });
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        in_test_dir
            || file_name.contains(&format!("{}.", self.name_marker))
            || file_name.contains(".spec.")
    }

    /// Writes `contents` to the test file for `source`, creating directories.
    pub fn write_test_file(&self, source: &Path, contents: &str) -> Result<PathBuf> {
        let target = self.test_path_for(source);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create test directory: {}", dir.display()))?;
        }
        fs::write(&target, contents)
            .with_context(|| format!("Failed to write test file: {}", target.display()))?;
        Ok(target)
    }
}

/// Reads the given files and directories.
///
/// Explicit files are always read; directories are walked recursively and
/// only files accepted by `filter` are kept. Results are sorted by path.
pub fn read_paths(paths: &[PathBuf], filter: &ExtensionFilter) -> Result<Vec<FileReadResult>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, filter, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        if let Some(content) = read_text(&path)? {
            results.push(FileReadResult::from_content(path, content));
        }
    }
    debug!(count = results.len(), "Read source files");
    Ok(results)
}

/// Collects matching files under `dir`.
///
/// Hidden entries and anything excluded by `.gitignore` (also outside a git
/// repository) are skipped, as are [`SKIPPED_DIRS`]. Symlinks are followed.
fn collect_dir(dir: &Path, filter: &ExtensionFilter, out: &mut Vec<PathBuf>) -> Result<()> {
    let walker = WalkBuilder::new(dir)
        .hidden(true)
        .follow_links(true)
        .require_git(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(|entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Error walking {}: {e}", dir.display());
                continue;
            }
        };
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_file() && filter.matches(entry.path()) {
            out.push(entry.into_path());
        }
    }
    Ok(())
}

/// Reads a file as UTF-8, returning `None` (with a warning) for binary content.
fn read_text(path: &Path) -> Result<Option<String>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(_) => {
            warn!(path = %path.display(), "Skipping non UTF-8 file");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn filter(exts: &[&str]) -> ExtensionFilter {
        let exts: Vec<String> = exts.iter().map(|e| e.to_string()).collect();
        ExtensionFilter::new(&exts).unwrap()
    }

    #[test]
    fn extension_filter_matches_nested_paths() {
        let f = filter(&["ts", "rs"]);
        assert!(f.matches(Path::new("main.rs")));
        assert!(f.matches(Path::new("src/deep/mod.ts")));
        assert!(!f.matches(Path::new("README.md")));
        assert!(!f.matches(Path::new("src/file.tsx")));
    }

    #[test]
    fn test_path_goes_into_test_dir() {
        let layout = TestFileLayout::default();
        assert_eq!(
            layout.test_path_for(Path::new("src/utils/math.ts")),
            PathBuf::from("src/utils/__test__/math.test.ts")
        );
        assert_eq!(
            layout.test_path_for(Path::new("Makefile")),
            PathBuf::from("__test__/Makefile.test")
        );
    }

    #[test]
    fn recognises_existing_tests() {
        let layout = TestFileLayout::default();
        assert!(layout.is_test_file(Path::new("src/__test__/math.test.ts")));
        assert!(layout.is_test_file(Path::new("src/math.test.ts")));
        assert!(layout.is_test_file(Path::new("src/math.spec.ts")));
        assert!(layout.is_test_file(Path::new("src/__tests__/math.ts")));
        assert!(!layout.is_test_file(Path::new("src/math.ts")));
        assert!(!layout.is_test_file(Path::new("src/latest.ts")));
    }

    #[test]
    fn write_test_file_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("math.ts");
        fs::write(&source, "export const add = (a, b) => a + b;").unwrap();

        let written = TestFileLayout::default()
            .write_test_file(&source, "test('add', () => {});")
            .unwrap();

        assert_eq!(written, temp_dir.path().join("__test__").join("math.test.ts"));
        assert_eq!(
            fs::read_to_string(written).unwrap(),
            "test('add', () => {});"
        );
    }

    #[test]
    fn read_paths_walks_directories_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/dep")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join("src/b.ts"), "b").unwrap();
        fs::write(root.join("src/nested/a.ts"), "a").unwrap();
        fs::write(root.join("src/notes.md"), "skip").unwrap();
        fs::write(root.join("node_modules/dep/index.ts"), "skip").unwrap();
        fs::write(root.join(".hidden/c.ts"), "skip").unwrap();

        let results = read_paths(&[root.to_path_buf()], &filter(&["ts"])).unwrap();
        let names: Vec<_> = results
            .iter()
            .map(|r| r.path.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("src/b.ts"), PathBuf::from("src/nested/a.ts")]
        );
        assert!(results.iter().all(|r| r.diff.is_none()));
    }

    #[test]
    fn read_paths_respects_gitignore_and_follows_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join(".gitignore"), "dist/\n").unwrap();
        fs::write(root.join("dist/bundle.js"), "skip").unwrap();
        fs::write(root.join("src/real.ts"), "real").unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(root.join("src/real.ts"), root.join("src/link.ts")).unwrap();

        let results = read_paths(&[root.to_path_buf()], &filter(&["ts", "js"])).unwrap();
        let names: Vec<_> = results
            .iter()
            .map(|r| r.path.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        #[cfg(unix)]
        assert_eq!(
            names,
            vec![PathBuf::from("src/link.ts"), PathBuf::from("src/real.ts")]
        );
        #[cfg(not(unix))]
        assert_eq!(names, vec![PathBuf::from("src/real.ts")]);
        assert!(results.iter().all(|r| r.content == "real"));
    }

    #[test]
    fn read_paths_keeps_explicit_files_and_skips_binary() {
        let temp_dir = TempDir::new().unwrap();
        let text = temp_dir.path().join("notes.md");
        let binary = temp_dir.path().join("blob.ts");
        fs::write(&text, "# notes").unwrap();
        fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();

        let results = read_paths(&[text.clone(), binary], &filter(&["ts"])).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, text);
        assert_eq!(results[0].content, "# notes");
    }

    #[test]
    fn missing_path_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_paths(&[temp_dir.path().join("nope.ts")], &filter(&["ts"]));
        assert!(result.is_err());
    }
}
