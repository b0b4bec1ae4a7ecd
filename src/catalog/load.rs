use std::collections::BTreeMap;
use std::path::Path;

use super::schema::{CatalogDocument, EntryRecord, GroupRecord};
use super::{EntryKind, Group, TemplateCatalog, TemplateEntry};
use crate::error::{Result, ScaffoldError};
use crate::params::is_valid_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    /// `.json` files are JSON, everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => CatalogFormat::Json,
            _ => CatalogFormat::Toml,
        }
    }
}

/// Load a catalog document from disk and assemble it into a [`TemplateCatalog`].
pub fn load_catalog(path: &Path) -> Result<TemplateCatalog> {
    if !path.is_file() {
        return Err(ScaffoldError::CatalogNotFound {
            path: path.to_path_buf(),
        });
    }

    let source = std::fs::read_to_string(path).map_err(|e| ScaffoldError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let format = CatalogFormat::from_path(path);

    let document = match format {
        CatalogFormat::Toml => {
            toml::from_str(&source).map_err(|e| ScaffoldError::CatalogParse {
                path: path.to_path_buf(),
                source: e,
            })?
        }
        CatalogFormat::Json => {
            serde_json::from_str(&source).map_err(|e| ScaffoldError::CatalogParseJson {
                path: path.to_path_buf(),
                source: e,
            })?
        }
    };

    let catalog = assemble(document, base_dir)?;
    tracing::debug!(
        path = %path.display(),
        groups = catalog.groups.len(),
        entries = catalog.expanded_len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Parse catalog source text. `content_file` references resolve against `base_dir`.
pub fn parse_catalog(source: &str, format: CatalogFormat, base_dir: &Path) -> Result<TemplateCatalog> {
    let origin = base_dir.join("<inline>");
    let document = match format {
        CatalogFormat::Toml => toml::from_str(source).map_err(|e| ScaffoldError::CatalogParse {
            path: origin,
            source: e,
        })?,
        CatalogFormat::Json => {
            serde_json::from_str(source).map_err(|e| ScaffoldError::CatalogParseJson {
                path: origin,
                source: e,
            })?
        }
    };
    assemble(document, base_dir)
}

fn invalid(reason: String) -> ScaffoldError {
    ScaffoldError::CatalogInvalid { reason }
}

/// Group entries by name in order of first appearance and attach group settings.
pub fn assemble(document: CatalogDocument, base_dir: &Path) -> Result<TemplateCatalog> {
    for name in document.parameters.keys() {
        if !is_valid_name(name) {
            return Err(ScaffoldError::InvalidParameterName { name: name.clone() });
        }
    }

    let mut settings: BTreeMap<String, GroupRecord> = BTreeMap::new();
    for record in document.groups {
        if let Some(repeat) = &record.repeat {
            if !is_valid_name(&repeat.param) {
                return Err(ScaffoldError::InvalidParameterName {
                    name: repeat.param.clone(),
                });
            }
        }
        if settings.contains_key(&record.name) {
            return Err(invalid(format!("group '{}' is declared twice", record.name)));
        }
        settings.insert(record.name.clone(), record);
    }

    let mut groups: Vec<Group> = Vec::new();
    for record in document.entries {
        if record.group.trim().is_empty() {
            return Err(invalid(format!(
                "entry '{}' has an empty group name",
                record.path_pattern
            )));
        }
        let group_name = record.group.clone();
        let entry = build_entry(record, base_dir)?;

        match groups.iter_mut().find(|g| g.name == group_name) {
            Some(group) => group.entries.push(entry),
            None => {
                let mut group = Group::new(group_name.clone());
                if let Some(record) = settings.remove(&group_name) {
                    group.overrides = record.overrides;
                    group.repeat = record.repeat;
                }
                group.entries.push(entry);
                groups.push(group);
            }
        }
    }

    if let Some(unused) = settings.keys().next() {
        return Err(invalid(format!("group '{unused}' is declared but has no entries")));
    }

    Ok(TemplateCatalog {
        name: document.catalog.name,
        description: document.catalog.description,
        parameters: document.parameters,
        hook: document.catalog.hook,
        groups,
    })
}

fn build_entry(record: EntryRecord, base_dir: &Path) -> Result<TemplateEntry> {
    if record.executable && record.kind == EntryKind::Dir {
        return Err(invalid(format!(
            "directory entry '{}' cannot be executable",
            record.path_pattern
        )));
    }

    let content = match (record.kind, record.content, record.content_file) {
        (EntryKind::Dir, None, None) => String::new(),
        (EntryKind::Dir, _, _) => {
            return Err(invalid(format!(
                "directory entry '{}' must not have content",
                record.path_pattern
            )));
        }
        (EntryKind::File, Some(content), None) => content,
        (EntryKind::File, None, Some(file)) => {
            let path = base_dir.join(&file);
            std::fs::read_to_string(&path).map_err(|e| ScaffoldError::Io {
                context: format!(
                    "reading content_file {} for entry '{}'",
                    path.display(),
                    record.path_pattern
                ),
                source: e,
            })?
        }
        (EntryKind::File, Some(_), Some(_)) => {
            return Err(invalid(format!(
                "entry '{}' has both content and content_file",
                record.path_pattern
            )));
        }
        (EntryKind::File, None, None) => {
            return Err(invalid(format!(
                "entry '{}' has neither content nor content_file",
                record.path_pattern
            )));
        }
    };

    Ok(TemplateEntry {
        path_pattern: record.path_pattern,
        content,
        overrides: record.overrides,
        kind: record.kind,
        executable: record.executable,
    })
}
