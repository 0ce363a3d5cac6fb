//! Root resolution by directory ascent.
//!
//! All three operations share one shape: walk the ancestor chain of a
//! starting directory, probe each directory for marker files, stop
//! early on a terminal condition. A `.git/config` regular file is the
//! hard boundary in every walk — resolution never looks above the
//! repository root.
//!
//! The workspace walk additionally tracks a best candidate by priority
//! tier (the signature's index in the registry). Once a tier has been
//! matched, only strictly better tiers are evaluated in the directories
//! above, so a farther ancestor can displace a closer match only by
//! being more specific, never by merely repeating it. That encodes the
//! policy "closest directory satisfying the best available tier wins":
//! specificity beats proximity only when specificity actually differs.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::registry::{known_workspaces, WorkspaceSignature, PACKAGE_FILES};
use crate::util::fs::{file_exists, find_first_existing};
use crate::util::paths;

/// What [`RootResolver::nearest_package_file`] does when the walk ends
/// with nothing found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnMissing {
    /// Report the miss as `Ok(None)`.
    #[default]
    ReturnNone,
    /// Raise [`Error::NoPackageFile`].
    Error,
}

/// Resolver configured with a signature registry and a package-manifest
/// filename set.
///
/// The configuration is immutable for the resolver's lifetime; each
/// resolution is a pure function of the filesystem at the moment it
/// runs, so one resolver can serve any number of independent calls.
#[derive(Debug, Clone)]
pub struct RootResolver {
    signatures: Vec<WorkspaceSignature>,
    package_files: Vec<String>,
}

impl Default for RootResolver {
    fn default() -> Self {
        RootResolver::new(
            known_workspaces(),
            PACKAGE_FILES.iter().map(|f| f.to_string()),
        )
    }
}

impl RootResolver {
    /// Create a resolver with an injected registry and package-file
    /// set. Registry order is priority order: lower index wins.
    pub fn new<S: Into<String>>(
        signatures: Vec<WorkspaceSignature>,
        package_files: impl IntoIterator<Item = S>,
    ) -> Self {
        RootResolver {
            signatures,
            package_files: package_files.into_iter().map(Into::into).collect(),
        }
    }

    /// Find the outermost directory that still belongs to the same
    /// logical workspace, preferring structured monorepo markers over a
    /// bare package manifest.
    ///
    /// Ascends from `start`. A `.git/config` marker halts the walk
    /// unconditionally and becomes the result itself when nothing
    /// better was found below it. Otherwise each directory is probed
    /// against the registry, best tier first; a match replaces the
    /// current candidate only when its tier is strictly better.
    /// `Ok(None)` when the walk exhausts with no match and no
    /// repository boundary.
    pub fn workspace_root(&self, start: &Path) -> Result<Option<PathBuf>> {
        let mut candidate: Option<PathBuf> = None;
        // Sentinel past the end of the table: any real tier improves it.
        let mut best_tier = self.signatures.len();

        for dir in self.ascend(start)? {
            trace!(dir = %dir.display(), "probing for workspace markers");

            if has_vcs_marker(&dir)? {
                if candidate.is_none() {
                    debug!(dir = %dir.display(), "repository root taken as workspace root");
                    candidate = Some(dir);
                }
                break;
            }

            for (tier, signature) in self.signatures.iter().enumerate() {
                if tier >= best_tier {
                    break;
                }
                if signature_matches(signature, &dir)? {
                    debug!(
                        dir = %dir.display(),
                        workspace = %signature.name,
                        tier,
                        "workspace candidate"
                    );
                    candidate = Some(dir.clone());
                    best_tier = tier;
                    break;
                }
            }
        }

        Ok(candidate)
    }

    /// Find the nearest enclosing project root: the first ancestor
    /// holding either a `.git/config` marker or a package manifest.
    /// First match along the ascent wins; there is no look-ahead.
    pub fn project_root(&self, start: &Path) -> Result<Option<PathBuf>> {
        for dir in self.ascend(start)? {
            trace!(dir = %dir.display(), "probing for project root");

            if has_vcs_marker(&dir)? {
                debug!(dir = %dir.display(), "project root at repository boundary");
                return Ok(Some(dir));
            }
            if find_first_existing(&self.package_files, &dir)?.is_some() {
                debug!(dir = %dir.display(), "project root at package manifest");
                return Ok(Some(dir));
            }
        }
        Ok(None)
    }

    /// Find the nearest package-manifest file at or above `start`.
    ///
    /// The repository boundary is checked after the manifest at each
    /// directory, so a manifest sitting next to `.git` is still found,
    /// but the search never continues above it. On a miss the result is
    /// `Ok(None)` or [`Error::NoPackageFile`], per `on_missing`.
    pub fn nearest_package_file(
        &self,
        start: &Path,
        on_missing: OnMissing,
    ) -> Result<Option<PathBuf>> {
        for dir in self.ascend(start)? {
            trace!(dir = %dir.display(), "probing for package file");

            if let Some(found) = find_first_existing(&self.package_files, &dir)? {
                debug!(path = %found.display(), "package file found");
                return Ok(Some(found));
            }
            if has_vcs_marker(&dir)? {
                debug!(dir = %dir.display(), "hit repository boundary without package file");
                break;
            }
        }

        match on_missing {
            OnMissing::ReturnNone => Ok(None),
            OnMissing::Error => Err(Error::NoPackageFile {
                start: start.to_path_buf(),
            }),
        }
    }

    fn ascend(&self, start: &Path) -> Result<paths::Ancestors> {
        paths::ascend(start).map_err(|err| Error::filesystem(start, err))
    }
}

/// Resolve the workspace root with the default registry.
pub fn find_workspace_root(start: &Path) -> Result<Option<PathBuf>> {
    RootResolver::default().workspace_root(start)
}

/// Resolve the project root with the default package-file set.
pub fn find_project_root(start: &Path) -> Result<Option<PathBuf>> {
    RootResolver::default().project_root(start)
}

/// Locate the nearest package file with the default package-file set.
pub fn find_package_file(start: &Path, on_missing: OnMissing) -> Result<Option<PathBuf>> {
    RootResolver::default().nearest_package_file(start, on_missing)
}

/// The repository boundary: `<dir>/.git/config` existing as a regular
/// file. Contents are never inspected.
fn has_vcs_marker(dir: &Path) -> Result<bool> {
    file_exists(&dir.join(".git").join("config"))
}

fn signature_matches(signature: &WorkspaceSignature, dir: &Path) -> Result<bool> {
    let Some(found) = find_first_existing(&signature.files, dir)? else {
        return Ok(false);
    };
    match &signature.test {
        Some(test) => test.matches(&found),
        None => Ok(true),
    }
}
