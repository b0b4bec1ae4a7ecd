use std::fmt;
use std::path::Path;

use similar::TextDiff;

use crate::catalog::{EntryKind, TemplateCatalog};
use crate::error::{Result, ScaffoldError};
use crate::params::ParameterSet;
use crate::plan::plan_entries;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The catalog produces this path but the tree lacks it.
    Missing { path: String },
    /// The file exists with different bytes; `diff` is a unified diff.
    Differs { path: String, diff: String },
    /// The catalog expects a directory (or file) and finds the other kind.
    WrongKind { path: String },
    /// The entry could not be resolved or rendered.
    Unresolved { path: String, reason: String },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Missing { path } => write!(f, "missing: {path}"),
            Mismatch::Differs { path, .. } => write!(f, "differs: {path}"),
            Mismatch::WrongKind { path } => write!(f, "wrong kind: {path}"),
            Mismatch::Unresolved { path, reason } => write!(f, "unresolved: {path}: {reason}"),
        }
    }
}

pub struct VerifyResult {
    pub matched: usize,
    pub mismatches: Vec<Mismatch>,
}

impl VerifyResult {
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Render `catalog` in memory and compare it with the tree under `root`.
/// Files present on disk but absent from the catalog are ignored.
pub fn verify_tree(catalog: &TemplateCatalog, params: &ParameterSet, root: &Path) -> Result<VerifyResult> {
    if !root.is_dir() {
        return Err(ScaffoldError::Io {
            context: format!("verifying {}", root.display()),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut matched = 0;
    let mut mismatches = Vec::new();

    for planned in plan_entries(catalog, params) {
        let target = match planned.target {
            Ok(target) => target,
            Err(e) => {
                mismatches.push(Mismatch::Unresolved {
                    path: planned.pattern,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let path = target.path.as_slash_string();
        let on_disk = root.join(target.path.to_host());

        let Ok(meta) = on_disk.metadata() else {
            mismatches.push(Mismatch::Missing { path });
            continue;
        };

        match planned.kind {
            EntryKind::Dir if meta.is_dir() => matched += 1,
            EntryKind::File if meta.is_file() => {
                let actual = std::fs::read(&on_disk).map_err(|e| ScaffoldError::Io {
                    context: format!("reading {}", on_disk.display()),
                    source: e,
                })?;
                if actual == target.content {
                    matched += 1;
                } else {
                    let diff = unified_diff(&actual, &target.content, &path);
                    mismatches.push(Mismatch::Differs { path, diff });
                }
            }
            _ => mismatches.push(Mismatch::WrongKind { path }),
        }
    }

    Ok(VerifyResult { matched, mismatches })
}

/// Unified diff from the tree's content (`a/`) to the catalog's (`b/`).
pub fn unified_diff(actual: &[u8], expected: &[u8], path: &str) -> String {
    let (Ok(old), Ok(new)) = (std::str::from_utf8(actual), std::str::from_utf8(expected)) else {
        return format!("Binary files a/{path} and b/{path} differ\n");
    };

    let diff = TextDiff::from_lines(old, new);
    let mut output = format!("--- a/{path}\n+++ b/{path}\n");
    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        output.push_str(&format!("{hunk}"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Group, TemplateEntry};
    use std::fs;

    fn catalog() -> TemplateCatalog {
        TemplateCatalog::new("demo").with_group(
            Group::new("root")
                .with_entry(TemplateEntry::file("settings.txt", "name={{project}}\nversion=1\n"))
                .with_entry(TemplateEntry::file("docs/README.md", "# {{project}}\n"))
                .with_entry(TemplateEntry::dir("migrations")),
        )
    }

    fn params() -> ParameterSet {
        ParameterSet::from_pairs([("project", "demo")]).unwrap()
    }

    #[test]
    fn identical_tree_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::create_dir_all(dir.path().join("migrations")).unwrap();
        fs::write(dir.path().join("settings.txt"), "name=demo\nversion=1\n").unwrap();
        fs::write(dir.path().join("docs/README.md"), "# demo\n").unwrap();
        fs::write(dir.path().join("extra.txt"), "not in catalog").unwrap();

        let result = verify_tree(&catalog(), &params(), dir.path()).unwrap();

        assert!(result.is_match(), "{:?}", result.mismatches);
        assert_eq!(result.matched, 3);
    }

    #[test]
    fn reports_missing_changed_and_wrong_kind() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.txt"), "name=other\nversion=1\n").unwrap();
        fs::write(dir.path().join("migrations"), "a file").unwrap();

        let result = verify_tree(&catalog(), &params(), dir.path()).unwrap();

        assert_eq!(result.mismatches.len(), 3);
        match &result.mismatches[0] {
            Mismatch::Differs { path, diff } => {
                assert_eq!(path, "settings.txt");
                assert!(diff.contains("-name=other"));
                assert!(diff.contains("+name=demo"));
            }
            other => panic!("unexpected mismatch: {other:?}"),
        }
        assert_eq!(
            result.mismatches[1],
            Mismatch::Missing {
                path: "docs/README.md".into()
            }
        );
        assert_eq!(
            result.mismatches[2],
            Mismatch::WrongKind {
                path: "migrations".into()
            }
        );
    }

    #[test]
    fn binary_diff_is_summarized() {
        let diff = unified_diff(&[0xff, 0xfe], b"text", "logo.png");
        assert_eq!(diff, "Binary files a/logo.png and b/logo.png differ\n");
    }
}
