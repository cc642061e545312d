//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::{Commit, Delta, DiffFindOptions, Repository};
use tracing::debug;

use crate::data::workflow::PullRequestFile;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository containing the specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Get workdir path
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Get access to the underlying git2::Repository
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Resolve a revision to a commit, falling back to `origin/<spec>`
    pub fn resolve_commit(&self, spec: &str) -> Result<Commit<'_>> {
        let object = match self.repo.revparse_single(spec) {
            Ok(object) => object,
            Err(_) => self
                .repo
                .revparse_single(&format!("origin/{spec}"))
                .with_context(|| format!("Failed to resolve revision: {spec}"))?,
        };

        object
            .peel_to_commit()
            .with_context(|| format!("Revision is not a commit: {spec}"))
    }

    /// List the files `head` changes relative to its merge base with `base`
    ///
    /// This is the file list a pull request from `head` into `base` would show.
    pub fn changed_files(&self, base: &str, head: &str) -> Result<Vec<PullRequestFile>> {
        let base_commit = self.resolve_commit(base)?;
        let head_commit = self.resolve_commit(head)?;

        let merge_base = self
            .repo
            .merge_base(base_commit.id(), head_commit.id())
            .with_context(|| format!("No merge base between {base} and {head}"))?;
        debug!(%merge_base, base, head, "Computing changed files");

        let base_tree = self
            .repo
            .find_commit(merge_base)
            .context("Failed to find merge base commit")?
            .tree()
            .context("Failed to get merge base tree")?;
        let head_tree = head_commit.tree().context("Failed to get head tree")?;

        let mut diff = self
            .repo
            .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), None)
            .context("Failed to diff trees")?;
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))
            .context("Failed to detect renames")?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            let path = match delta.status() {
                Delta::Deleted => delta.old_file().path(),
                _ => delta.new_file().path(),
            };
            let Some(path) = path.and_then(Path::to_str) else {
                continue;
            };

            let mut file = PullRequestFile::new(path);
            file.status = Some(format_delta(delta.status()).to_string());
            if delta.status() == Delta::Renamed {
                file.previous_filename = delta
                    .old_file()
                    .path()
                    .and_then(Path::to_str)
                    .map(str::to_string);
            }
            files.push(file);
        }

        Ok(files)
    }
}

/// Format a delta status the way GitHub names pull request file statuses
fn format_delta(status: Delta) -> &'static str {
    match status {
        Delta::Added => "added",
        Delta::Deleted => "removed",
        Delta::Modified => "modified",
        Delta::Renamed => "renamed",
        Delta::Copied => "copied",
        _ => "changed",
    }
}
