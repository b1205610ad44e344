//! Reads the files staged for the next commit.

use anyhow::{Context, Result};
use git2::{Delta, DiffOptions, ErrorCode, Patch, Repository};
use tracing::{debug, warn};

use crate::files::{ExtensionFilter, FileReadResult};

/// Returns every staged, added or modified text file accepted by `filter`.
///
/// Content comes from the index (what will be committed), and `diff` holds
/// the per-file patch against `HEAD`. In a repository without commits the
/// whole index counts as added.
pub fn read_staged_files(repo: &Repository, filter: &ExtensionFilter) -> Result<Vec<FileReadResult>> {
    let head_tree = match repo.head() {
        Ok(head) => Some(head.peel_to_tree().context("Failed to resolve HEAD tree")?),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
        Err(e) => return Err(e).context("Failed to read HEAD"),
    };
    let index = repo.index().context("Failed to read git index")?;
    let workdir = repo
        .workdir()
        .context("Cannot read staged files in a bare repository")?;

    let mut opts = DiffOptions::new();
    opts.context_lines(3);
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut opts))
        .context("Failed to diff HEAD against the index")?;

    let mut results = Vec::new();
    for (idx, delta) in diff.deltas().enumerate() {
        if !matches!(
            delta.status(),
            Delta::Added | Delta::Modified | Delta::Renamed | Delta::Copied
        ) {
            continue;
        }
        let Some(path) = delta.new_file().path() else {
            continue;
        };
        if !filter.matches(path) {
            continue;
        }

        let blob = repo
            .find_blob(delta.new_file().id())
            .with_context(|| format!("Failed to read staged blob for {}", path.display()))?;
        if blob.is_binary() {
            debug!(path = %path.display(), "Skipping binary staged file");
            continue;
        }
        let Ok(content) = std::str::from_utf8(blob.content()) else {
            warn!(path = %path.display(), "Skipping non UTF-8 staged file");
            continue;
        };

        let patch_text = match Patch::from_diff(&diff, idx)
            .with_context(|| format!("Failed to build patch for {}", path.display()))?
        {
            Some(mut patch) => {
                let buf = patch
                    .to_buf()
                    .with_context(|| format!("Failed to format patch for {}", path.display()))?;
                buf.as_str().map(str::to_string)
            }
            None => None,
        };

        results.push(FileReadResult {
            path: workdir.join(path),
            content: content.to_string(),
            diff: patch_text,
        });
    }

    debug!(count = results.len(), "Read staged files");
    Ok(results)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::fs;
    use std::path::Path;

    use git2::Signature;
    use tempfile::TempDir;

    use super::*;

    fn init_repo() -> (TempDir, Repository) {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        (temp_dir, repo)
    }

    fn stage(repo: &Repository, root: &Path, name: &str, content: &str) {
        fs::write(root.join(name), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
    }

    fn commit_index(repo: &Repository, message: &str) {
        let mut index = repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let signature = Signature::now("Test User", "test@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap();
    }

    fn ts_filter() -> ExtensionFilter {
        ExtensionFilter::new(&["ts".to_string()]).unwrap()
    }

    #[test]
    fn reads_staged_files_in_unborn_repo() {
        let (temp_dir, repo) = init_repo();
        stage(&repo, temp_dir.path(), "a.ts", "export const a = 1;\n");
        stage(&repo, temp_dir.path(), "notes.md", "# ignored\n");

        let files = read_staged_files(&repo, &ts_filter()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("a.ts"));
        assert_eq!(files[0].content, "export const a = 1;\n");
        let diff = files[0].diff.as_deref().unwrap();
        assert!(diff.contains("+export const a = 1;"));
    }

    #[test]
    fn reads_only_staged_modifications() {
        let (temp_dir, repo) = init_repo();
        stage(&repo, temp_dir.path(), "a.ts", "const a = 1;\n");
        stage(&repo, temp_dir.path(), "b.ts", "const b = 1;\n");
        commit_index(&repo, "initial");

        stage(&repo, temp_dir.path(), "a.ts", "const a = 2;\n");
        // Unstaged edit must not be picked up.
        fs::write(temp_dir.path().join("b.ts"), "const b = 2;\n").unwrap();

        let files = read_staged_files(&repo, &ts_filter()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("a.ts"));
        assert_eq!(files[0].content, "const a = 2;\n");
        let diff = files[0].diff.as_deref().unwrap();
        assert!(diff.contains("-const a = 1;"));
        assert!(diff.contains("+const a = 2;"));
    }

    #[test]
    fn corrupt_head_is_error() {
        let (temp_dir, repo) = init_repo();
        stage(&repo, temp_dir.path(), "a.ts", "const a = 1;\n");
        commit_index(&repo, "initial");
        fs::write(repo.path().join("HEAD"), "garbage\n").unwrap();

        let err = read_staged_files(&repo, &ts_filter()).unwrap_err();
        assert!(err.to_string().contains("Failed to read HEAD"));
    }

    #[test]
    fn skips_deleted_files() {
        let (temp_dir, repo) = init_repo();
        stage(&repo, temp_dir.path(), "gone.ts", "const gone = 1;\n");
        commit_index(&repo, "initial");

        let mut index = repo.index().unwrap();
        index.remove_path(Path::new("gone.ts")).unwrap();
        index.write().unwrap();

        let files = read_staged_files(&repo, &ts_filter()).unwrap();
        assert!(files.is_empty());
    }
}
