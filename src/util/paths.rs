//! Path arithmetic for the ascent walk.
//!
//! Everything here is lexical: no filesystem access, so the starting
//! directory does not have to exist.

use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components, fold `..` into the
/// preceding component, keep prefix/root components (drive letters on
/// Windows). Trailing separators disappear as a side effect of the
/// component walk.
pub fn normalize(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    let mut out = if let Some(c @ Component::Prefix(..)) = components.peek().cloned() {
        components.next();
        PathBuf::from(c.as_os_str())
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::Prefix(..) => unreachable!(),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(c) => out.push(c),
        }
    }
    out
}

/// Start an ascent at `start`.
///
/// A relative `start` is resolved against the current working directory
/// at call time, then normalized. The returned iterator yields `start`
/// itself first, then each parent in turn, and stops one level before
/// the filesystem root; the root is never yielded. Ascending from the
/// root yields nothing.
pub fn ascend(start: &Path) -> io::Result<Ancestors> {
    let absolute = if start.is_absolute() {
        start.to_path_buf()
    } else {
        env::current_dir()?.join(start)
    };
    let normalized = normalize(&absolute);

    // A path with no parent is the filesystem root (or a bare prefix).
    let current = normalized.parent().is_some().then_some(normalized);
    Ok(Ancestors { current })
}

/// Lazy, forward-only walk from a directory up toward the filesystem
/// root. Each step strictly shortens the path by one component.
#[derive(Debug)]
pub struct Ancestors {
    current: Option<PathBuf>,
}

impl Iterator for Ancestors {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let dir = self.current.take()?;
        if let Some(parent) = dir.parent() {
            // Stop once the parent is the root (or stops shrinking).
            if parent != dir && parent.parent().is_some() {
                self.current = Some(parent.to_path_buf());
            }
        }
        Some(dir)
    }
}
