//! Crash-safe JSON load/save.
//!
//! `save` never writes the target in place: the serialized payload goes
//! to a uniquely named temporary sibling first and a rename swaps it
//! into place, so a reader sees either the old document or the new one,
//! never a torn write. `load` tolerates a leading UTF-8 byte-order mark,
//! which npm-ecosystem manifests occasionally carry.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::trace;

use crate::error::{Error, Result};

const BOM: &str = "\u{feff}";

/// Load and parse a JSON file.
///
/// A missing or unreadable file is a filesystem error (callers probing
/// for optional files should check existence first); malformed content
/// is a parse error. Both carry the path.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|err| Error::filesystem(path, err))?;
    let text = raw.strip_prefix(BOM).unwrap_or(&raw);
    serde_json::from_str(text).map_err(|err| Error::parse(path, err))
}

/// Save `value` as pretty-printed JSON with the conventional 2-space
/// indent. See [`save_indented`].
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    save_indented(path, value, 2)
}

/// Serialize `value` with an `indent`-space indent (`0` means compact,
/// single-line output) and write it atomically to `path`, creating
/// parent directories as needed.
///
/// The output always ends with exactly one trailing newline, for clean
/// diffs. On any failure the previous content of `path` is untouched;
/// the temporary sibling is cleaned up best-effort.
pub fn save_indented<T: Serialize>(path: &Path, value: &T, indent: usize) -> Result<()> {
    let mut buf = if indent == 0 {
        serde_json::to_vec(value).map_err(|err| Error::parse(path, err))?
    } else {
        let spaces = " ".repeat(indent);
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(spaces.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        value
            .serialize(&mut ser)
            .map_err(|err| Error::parse(path, err))?;
        out
    };
    buf.push(b'\n');

    let parent = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(parent).map_err(|err| Error::filesystem(parent, err))?;

    write_atomic(path, parent, &buf)?;
    trace!(path = %path.display(), bytes = buf.len(), "saved json file");
    Ok(())
}

/// Write `bytes` to a unique temporary file in `parent`, then rename it
/// over `path`. Same directory means same filesystem, which keeps the
/// rename atomic.
fn write_atomic(path: &Path, parent: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".wharf-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|err| Error::filesystem(parent, err))?;

    tmp.write_all(bytes)
        .map_err(|err| Error::filesystem(tmp.path(), err))?;

    // Dropping the PersistError removes the temp file.
    tmp.persist(path)
        .map_err(|err| Error::filesystem(path, err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pkg {
        name: String,
        version: String,
    }

    #[test]
    fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("package.json");
        let pkg = Pkg {
            name: "test".into(),
            version: "0.0.0".into(),
        };

        save(&path, &pkg).unwrap();
        let loaded: Pkg = load(&path).unwrap();
        assert_eq!(loaded, pkg);
    }

    #[test]
    fn test_save_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.json");
        save(&path, &json!({ "name": "test", "version": "0.0.0" })).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "{\n  \"name\": \"test\",\n  \"version\": \"0.0.0\"\n}\n"
        );
        assert!(!text.starts_with('\u{feff}'));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn test_save_indent_width() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.json");

        save_indented(&path, &json!({ "a": 1 }), 4).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n    \"a\": 1\n}\n");

        save_indented(&path, &json!({ "a": 1 }), 0).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":1}\n");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("deep/nested/file.json");
        save(&path, &json!({})).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_strips_bom() {
        let tmp = TempDir::new().unwrap();
        let plain = tmp.path().join("plain.json");
        let bommed = tmp.path().join("bommed.json");
        let body = "{\n  \"name\": \"test\"\n}\n";

        fs::write(&plain, body).unwrap();
        fs::write(&bommed, format!("\u{feff}{body}")).unwrap();

        let a: Value = load(&plain).unwrap();
        let b: Value = load(&bommed).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_load_missing_is_filesystem_error() {
        let tmp = TempDir::new().unwrap();
        let result: Result<Value> = load(&tmp.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Filesystem { .. })));
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ broken").unwrap();

        let result: Result<Value> = load(&path);
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_save_leaves_target_untouched() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("locked");
        fs::create_dir(&dir).unwrap();
        let path = dir.join("file.json");
        fs::write(&path, "{\"old\": true}\n").unwrap();

        // Read-only directory: the temp-file creation fails before the
        // target is ever opened.
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits don't bind for root; nothing to inject there.
        if fs::write(dir.join("probe"), "x").is_ok() {
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = save(&path, &json!({ "new": true }));
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(Error::Filesystem { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"old\": true}\n");
        // Only the original file remains, no orphaned temp sibling.
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_rename_leaves_target_untouched() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("file.json");

        // A non-empty directory at the target makes the rename fail on
        // every platform, regardless of privileges.
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();

        let result = save(&target, &json!({ "new": true }));
        assert!(matches!(result, Err(Error::Filesystem { .. })));

        // Target untouched, temp sibling cleaned up.
        assert!(target.join("keep.txt").exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
