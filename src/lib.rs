//! Wharf - workspace and project root discovery for package trees.
//!
//! Tooling that operates relative to a project's boundary rarely knows
//! in advance how the tree is organized: a single package, a monorepo,
//! or one of several monorepo tooling conventions. Wharf answers that
//! question by walking upward from any starting directory:
//!
//! - [`find_workspace_root`] - the outermost directory still belonging
//!   to the same logical workspace, preferring specific tool markers
//!   (turbo, nx, pnpm, lerna, npm workspaces) over a bare manifest,
//!   bounded by the enclosing git repository.
//! - [`find_project_root`] - the nearest ancestor holding a package
//!   manifest or a git repository.
//! - [`find_package_file`] - the nearest `package.json` itself, never
//!   looking above the repository boundary.
//!
//! Discovered manifests round-trip through [`store`], which reads JSON
//! defensively (BOM-tolerant) and writes it atomically, so a crash
//! never leaves a half-written file behind.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let root = wharf::find_workspace_root(Path::new("packages/app"))?;
//! if let Some(root) = root {
//!     let manifest: serde_json::Value = wharf::store::load(&root.join("package.json"))?;
//!     wharf::store::save(&root.join("package.json"), &manifest)?;
//! }
//! # Ok::<(), wharf::Error>(())
//! ```

pub mod error;
pub mod registry;
pub mod resolve;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use registry::{known_workspaces, ContentTest, WorkspaceSignature, PACKAGE_FILES};
pub use resolve::{
    find_package_file, find_project_root, find_workspace_root, OnMissing, RootResolver,
};
