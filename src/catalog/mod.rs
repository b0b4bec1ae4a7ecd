pub mod load;
pub mod schema;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hooks::ExternalCommand;
use crate::params::ParameterSet;

pub use load::{load_catalog, parse_catalog, CatalogFormat};
pub use schema::{CatalogDocument, ParameterSpec};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    File,
    /// An empty directory; the entry carries no content.
    Dir,
}

impl EntryKind {
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }
}

/// One file (or empty directory) to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub path_pattern: String,
    pub content: String,
    pub overrides: ParameterSet,
    pub kind: EntryKind,
    pub executable: bool,
}

impl TemplateEntry {
    pub fn file(path_pattern: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path_pattern: path_pattern.into(),
            content: content.into(),
            overrides: ParameterSet::new(),
            kind: EntryKind::File,
            executable: false,
        }
    }

    pub fn dir(path_pattern: impl Into<String>) -> Self {
        Self {
            path_pattern: path_pattern.into(),
            content: String::new(),
            overrides: ParameterSet::new(),
            kind: EntryKind::Dir,
            executable: false,
        }
    }

    pub fn with_overrides(mut self, overrides: ParameterSet) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

/// Instantiate a group once per value, binding the value to `param`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub param: String,
    pub values: Vec<String>,
}

/// A named, ordered run of entries sharing parameter overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub entries: Vec<TemplateEntry>,
    pub overrides: ParameterSet,
    pub repeat: Option<Repeat>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            overrides: ParameterSet::new(),
            repeat: None,
        }
    }

    pub fn with_entry(mut self, entry: TemplateEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_overrides(mut self, overrides: ParameterSet) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn repeated<I, S>(mut self, param: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repeat = Some(Repeat {
            param: param.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Parameter overrides for each instantiation of this group. A group
    /// without `repeat` has exactly one; a repeat with no values has none.
    pub fn instances(&self) -> Vec<ParameterSet> {
        match &self.repeat {
            None => vec![self.overrides.clone()],
            Some(repeat) => repeat
                .values
                .iter()
                .map(|value| self.overrides.with(&repeat.param, value))
                .collect(),
        }
    }
}

/// An ordered collection of groups plus the parameters they expect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalog {
    pub name: String,
    pub description: Option<String>,
    pub parameters: BTreeMap<String, ParameterSpec>,
    pub hook: Option<ExternalCommand>,
    pub groups: Vec<Group>,
}

impl TemplateCatalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Defaults declared by the catalog's `[parameters]` table.
    pub fn defaults(&self) -> ParameterSet {
        let pairs = self
            .parameters
            .iter()
            .filter_map(|(name, spec)| spec.default.as_ref().map(|d| (name.clone(), d.clone())));
        // Names were validated when the catalog was loaded.
        ParameterSet::from_pairs(pairs).unwrap_or_default()
    }

    /// Number of entries after repeat expansion.
    pub fn expanded_len(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.entries.len() * g.instances().len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_binds_each_value() {
        let group = Group::new("services")
            .with_overrides(ParameterSet::from_pairs([("kind", "svc")]).unwrap())
            .repeated("name", ["svc-a", "svc-b"]);

        let instances = group.instances();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].get("name"), Some("svc-a"));
        assert_eq!(instances[1].get("name"), Some("svc-b"));
        assert_eq!(instances[1].get("kind"), Some("svc"));
    }

    #[test]
    fn empty_repeat_has_no_instances() {
        let group = Group::new("none").repeated("name", Vec::<String>::new());
        assert!(group.instances().is_empty());
    }

    #[test]
    fn expanded_len_counts_repeats() {
        let catalog = TemplateCatalog::new("demo")
            .with_group(Group::new("root").with_entry(TemplateEntry::file("a", "")))
            .with_group(
                Group::new("svc")
                    .with_entry(TemplateEntry::file("s/{{n}}/a", ""))
                    .with_entry(TemplateEntry::dir("s/{{n}}/tests"))
                    .repeated("n", ["x", "y", "z"]),
            );
        assert_eq!(catalog.expanded_len(), 7);
    }
}
