//! Source acquisition: check out a versioned tree with git.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{Repository, ResetType};
use url::Url;

use crate::util::fs::ensure_dir;

/// What to check out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GitReference {
    /// The remote's HEAD.
    #[default]
    DefaultBranch,
    Branch(String),
    Tag(String),
    Rev(String),
}

impl GitReference {
    /// Pick a reference from mutually exclusive CLI options.
    pub fn from_options(
        branch: Option<String>,
        tag: Option<String>,
        rev: Option<String>,
    ) -> Self {
        match (branch, tag, rev) {
            (_, _, Some(rev)) => GitReference::Rev(rev),
            (_, Some(tag), _) => GitReference::Tag(tag),
            (Some(branch), _, _) => GitReference::Branch(branch),
            _ => GitReference::DefaultBranch,
        }
    }
}

/// A git checkout of the package sources.
pub struct SourceCheckout {
    remote: Url,
    reference: GitReference,
    dest: PathBuf,
}

impl SourceCheckout {
    pub fn new(remote: Url, reference: GitReference, dest: impl Into<PathBuf>) -> Self {
        SourceCheckout {
            remote,
            reference,
            dest: dest.into(),
        }
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Clone or update, then hard-reset to the reference. Returns the
    /// checked-out commit id.
    pub fn fetch(&self) -> Result<String> {
        let repo = if self.dest.join(".git").exists() {
            self.update()?
        } else {
            self.clone_fresh()?
        };

        self.checkout(&repo)
    }

    fn clone_fresh(&self) -> Result<Repository> {
        tracing::info!("Cloning {}", self.remote);

        if let Some(parent) = self.dest.parent() {
            ensure_dir(parent)?;
        }

        Repository::clone(self.remote.as_str(), &self.dest)
            .with_context(|| format!("failed to clone {}", self.remote))
    }

    fn update(&self) -> Result<Repository> {
        tracing::info!("Updating {}", self.remote);

        let repo = Repository::open(&self.dest)
            .with_context(|| format!("failed to open git repository {}", self.dest.display()))?;

        {
            let mut remote = repo.find_remote("origin")?;
            remote
                .fetch(
                    &["+refs/heads/*:refs/remotes/origin/*", "+refs/tags/*:refs/tags/*"],
                    None,
                    None,
                )
                .with_context(|| format!("failed to fetch {}", self.remote))?;
        }

        Ok(repo)
    }

    fn checkout(&self, repo: &Repository) -> Result<String> {
        let commit = match &self.reference {
            GitReference::DefaultBranch => default_branch_commit(repo)?,
            GitReference::Branch(branch) => repo
                .find_reference(&format!("refs/remotes/origin/{}", branch))
                .with_context(|| format!("branch `{}` not found", branch))?
                .peel_to_commit()?,
            GitReference::Tag(tag) => repo
                .find_reference(&format!("refs/tags/{}", tag))
                .with_context(|| format!("tag `{}` not found", tag))?
                .peel_to_commit()?,
            GitReference::Rev(rev) => repo
                .revparse_single(rev)
                .with_context(|| format!("revision `{}` not found", rev))?
                .peel_to_commit()?,
        };

        repo.reset(commit.as_object(), ResetType::Hard, None)?;

        let id = commit.id().to_string();
        tracing::info!("Checked out {} at {}", self.remote, &id[..12.min(id.len())]);
        Ok(id)
    }
}

/// Tip of the remote's default branch as of the last fetch.
///
/// Prefers `origin/HEAD`; otherwise follows the remote-tracking branch named
/// like the local HEAD, and finally the local HEAD itself.
fn default_branch_commit(repo: &Repository) -> Result<git2::Commit<'_>> {
    if let Ok(reference) = repo.find_reference("refs/remotes/origin/HEAD") {
        return Ok(reference.resolve()?.peel_to_commit()?);
    }

    let head = repo.head()?;
    if head.is_branch() {
        if let Some(name) = head.shorthand() {
            if let Ok(tracking) = repo.find_reference(&format!("refs/remotes/origin/{}", name)) {
                return Ok(tracking.peel_to_commit()?);
            }
        }
    }

    Ok(head.peel_to_commit()?)
}
