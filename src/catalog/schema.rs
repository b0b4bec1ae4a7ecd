use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EntryKind, Repeat};
use crate::hooks::ExternalCommand;
use crate::params::ParameterSet;

/// The on-disk catalog document, one record per entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogDocument {
    pub catalog: CatalogMetadata,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ParameterSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupRecord>,

    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogMetadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Command run in the new root after a successful scaffold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<ExternalCommand>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParameterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Question asked by `--interactive` when the value was not supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Settings for a group named by entries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupRecord {
    pub name: String,

    #[serde(default, skip_serializing_if = "ParameterSet::is_empty")]
    pub overrides: ParameterSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryRecord {
    pub group: String,

    pub path_pattern: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Path to the content body, relative to the catalog document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_file: Option<String>,

    #[serde(default, skip_serializing_if = "ParameterSet::is_empty")]
    pub overrides: ParameterSet,

    #[serde(default, skip_serializing_if = "EntryKind::is_file")]
    pub kind: EntryKind,

    /// Mark the written file executable (unix only).
    #[serde(default, skip_serializing_if = "is_false")]
    pub executable: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl EntryRecord {
    pub fn inline(group: impl Into<String>, path_pattern: impl Into<String>, content: String) -> Self {
        Self {
            group: group.into(),
            path_pattern: path_pattern.into(),
            content: Some(content),
            content_file: None,
            overrides: ParameterSet::new(),
            kind: EntryKind::File,
            executable: false,
        }
    }
}
