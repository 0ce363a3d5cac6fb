//! Workspace indicator signatures.
//!
//! A signature names a workspace tool and the marker files that betray
//! it. The resolver treats the position of a signature in the registry
//! as its priority tier: lower index = more specific tool = preferred.
//! Signatures are process-wide configuration, built once at startup and
//! never mutated during resolution.

use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::store;

/// Filenames accepted as a package manifest, in preference order.
pub const PACKAGE_FILES: &[&str] = &["package.json"];

/// Content condition attached to a signature.
///
/// A closed set rather than an open callback: the only condition any
/// known tool needs is "does this JSON document declare a truthy value
/// under a key". New kinds become new variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTest {
    /// The file parses as JSON and holds a truthy value under the key.
    HasTruthyKey(String),
}

impl ContentTest {
    /// Shorthand for the JSON truthy-key condition.
    pub fn has_truthy_key(key: impl Into<String>) -> Self {
        ContentTest::HasTruthyKey(key.into())
    }

    /// Evaluate the condition against a file known to exist.
    ///
    /// Only `.json` files are inspected; any other extension fails the
    /// condition without error. That is a deliberate conservative
    /// default, not a gap. A malformed JSON document propagates as a
    /// parse error.
    pub fn matches(&self, path: &Path) -> Result<bool> {
        match self {
            ContentTest::HasTruthyKey(key) => {
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    return Ok(false);
                }
                let doc: Value = store::load(path)?;
                Ok(doc.get(key).is_some_and(is_truthy))
            }
        }
    }
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are
/// falsy; everything else, including empty arrays and objects, is
/// truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A named workspace signature: candidate marker filenames plus an
/// optional content condition the matched file must satisfy.
#[derive(Debug, Clone)]
pub struct WorkspaceSignature {
    /// Tool name, e.g. "pnpm".
    pub name: String,

    /// Candidate filenames; first existing file wins within the
    /// signature.
    pub files: Vec<String>,

    /// Optional condition on the matched file's content.
    pub test: Option<ContentTest>,
}

impl WorkspaceSignature {
    /// Create a signature with no content condition.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        files: impl IntoIterator<Item = S>,
    ) -> Self {
        WorkspaceSignature {
            name: name.into(),
            files: files.into_iter().map(Into::into).collect(),
            test: None,
        }
    }

    /// Attach a content condition.
    pub fn with_test(mut self, test: ContentTest) -> Self {
        self.test = Some(test);
        self
    }
}

/// Known workspace tools, most specific first.
///
/// Position is the priority tier used by the resolver. The bare
/// `package.json` entry sits last so that any structured monorepo
/// marker above it beats a plain single-package manifest.
pub fn known_workspaces() -> Vec<WorkspaceSignature> {
    vec![
        WorkspaceSignature::new("turbo", ["turbo.json"]),
        WorkspaceSignature::new("nx", ["nx.json"]),
        WorkspaceSignature::new("pnpm", ["pnpm-workspace.yaml"]),
        WorkspaceSignature::new("lerna", ["lerna.json"]),
        WorkspaceSignature::new("npm", ["package.json"])
            .with_test(ContentTest::has_truthy_key("workspaces")),
        WorkspaceSignature::new("singlePackage", ["package.json"]),
    ]
}
