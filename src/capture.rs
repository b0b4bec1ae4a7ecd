use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::catalog::schema::{CatalogDocument, CatalogMetadata, EntryRecord};
use crate::catalog::EntryKind;
use crate::error::{Result, ScaffoldError};
use crate::params::ParameterSet;
use crate::render::escape_literal;

/// Patterns excluded from every capture. A pattern matching a directory
/// prunes the whole directory.
pub const DEFAULT_EXCLUDES: &[&str] = &["**/.git", "**/target", "**/node_modules", "**/.gradle"];

pub struct CaptureOptions {
    pub name: String,
    pub exclude: Vec<String>,
}

pub struct CaptureResult {
    pub document: CatalogDocument,
    /// Files that could not be captured, with the reason.
    pub skipped: Vec<String>,
}

/// Build a catalog whose rendering reproduces the text files under `dir`.
///
/// File contents and paths are escaped so that they render back verbatim.
/// Entries are grouped by their top-level directory; files directly under
/// `dir` go into the `root` group. Empty directories become `dir` entries.
pub fn capture_tree(dir: &Path, options: &CaptureOptions) -> Result<CaptureResult> {
    if !dir.is_dir() {
        return Err(ScaffoldError::Io {
            context: format!("capturing {}", dir.display()),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let exclude = build_glob_set(&options.exclude)?;
    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let rel = relative_slash_path(dir, e.path());
            !exclude.is_match(rel.as_str())
        });

    for entry in walker {
        let entry = entry.map_err(|e| ScaffoldError::Io {
            context: format!("walking {}", dir.display()),
            source: e.into(),
        })?;
        let rel = relative_slash_path(dir, entry.path());
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            skipped.push(format!("{rel}: symbolic link"));
        } else if file_type.is_dir() {
            let is_empty = std::fs::read_dir(entry.path())
                .map(|mut d| d.next().is_none())
                .unwrap_or(false);
            if is_empty {
                entries.push(EntryRecord {
                    kind: EntryKind::Dir,
                    content: None,
                    ..EntryRecord::inline(group_for(&rel), escape_literal(&rel), String::new())
                });
            }
        } else {
            let bytes = std::fs::read(entry.path()).map_err(|e| ScaffoldError::Io {
                context: format!("reading {}", entry.path().display()),
                source: e,
            })?;
            if content_inspector::inspect(&bytes).is_binary() {
                skipped.push(format!("{rel}: binary content"));
                continue;
            }
            match String::from_utf8(bytes) {
                Ok(text) => entries.push(EntryRecord {
                    executable: is_executable(&entry),
                    ..EntryRecord::inline(group_for(&rel), escape_literal(&rel), escape_literal(&text))
                }),
                Err(_) => skipped.push(format!("{rel}: not valid UTF-8")),
            }
        }
    }

    tracing::debug!(entries = entries.len(), skipped = skipped.len(), "captured tree");

    Ok(CaptureResult {
        document: CatalogDocument {
            catalog: CatalogMetadata {
                name: options.name.clone(),
                description: Some(format!("Captured from {}", dir.display())),
                hook: None,
            },
            parameters: Default::default(),
            groups: Vec::new(),
            entries,
        },
        skipped,
    })
}

#[cfg(unix)]
fn is_executable(entry: &walkdir::DirEntry) -> bool {
    use std::os::unix::fs::PermissionsExt;

    entry
        .metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_entry: &walkdir::DirEntry) -> bool {
    false
}

/// Serialize a captured document as catalog TOML.
pub fn to_toml(document: &CatalogDocument) -> Result<String> {
    toml::to_string_pretty(document).map_err(|e| ScaffoldError::Io {
        context: "serializing captured catalog".into(),
        source: std::io::Error::other(e),
    })
}

fn relative_slash_path(base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn group_for(rel: &str) -> String {
    match rel.split_once('/') {
        Some((top, _)) => top.to_string(),
        None => "root".to_string(),
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ScaffoldError::CatalogInvalid {
            reason: format!("bad exclude pattern '{pattern}': {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScaffoldError::CatalogInvalid {
        reason: format!("bad exclude patterns: {e}"),
    })
}

impl CaptureResult {
    /// Whether the captured catalog needs no parameters to render.
    pub fn is_self_contained(&self) -> bool {
        let params = ParameterSet::new();
        self.document.entries.iter().all(|e| {
            crate::path::resolve_path(&e.path_pattern, &params).is_ok()
                && e.content
                    .as_deref()
                    .map_or(true, |c| crate::render::render_content(c, &params, "").is_ok())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options() -> CaptureOptions {
        CaptureOptions {
            name: "captured".into(),
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn captures_text_files_grouped_by_top_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("helm/templates")).unwrap();
        fs::create_dir_all(dir.path().join("migrations")).unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        fs::write(dir.path().join("README.md"), "# demo\n").unwrap();
        fs::write(
            dir.path().join("helm/templates/deployment.yaml"),
            "name: {{ .Release.Name }}\n",
        )
        .unwrap();
        fs::write(dir.path().join("target/debug/app"), "ignored").unwrap();
        fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G', 0, 0, 1]).unwrap();

        let result = capture_tree(dir.path(), &options()).unwrap();
        let entries = &result.document.entries;

        let paths: Vec<_> = entries.iter().map(|e| e.path_pattern.as_str()).collect();
        assert_eq!(
            paths,
            vec!["README.md", "helm/templates/deployment.yaml", "migrations"]
        );
        assert_eq!(entries[1].group, "helm");
        assert_eq!(
            entries[1].content.as_deref(),
            Some("name: {{{{ .Release.Name }}}}\n")
        );
        assert_eq!(entries[2].kind, EntryKind::Dir);
        assert_eq!(result.skipped, vec!["logo.png: binary content".to_string()]);
        assert!(result.is_self_contained());
    }

    #[test]
    fn captured_toml_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "multi\nline\n").unwrap();

        let result = capture_tree(dir.path(), &options()).unwrap();
        let toml_text = to_toml(&result.document).unwrap();
        let catalog = crate::catalog::parse_catalog(
            &toml_text,
            crate::catalog::CatalogFormat::Toml,
            dir.path(),
        )
        .unwrap();

        assert_eq!(catalog.name, "captured");
        assert_eq!(catalog.groups[0].entries[0].content, "multi\nline\n");
    }

    #[cfg(unix)]
    #[test]
    fn executable_files_keep_their_flag() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("lint.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(dir.path().join("notes.txt"), "plain\n").unwrap();

        let result = capture_tree(dir.path(), &options()).unwrap();
        let flags: Vec<_> = result
            .document
            .entries
            .iter()
            .map(|e| (e.path_pattern.as_str(), e.executable))
            .collect();

        assert_eq!(flags, vec![("lint.sh", true), ("notes.txt", false)]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(capture_tree(Path::new("/nonexistent/tree"), &options()).is_err());
    }
}
