use crate::catalog::{EntryKind, TemplateCatalog};
use crate::error::EntryError;
use crate::params::ParameterSet;
use crate::path::{resolve_path, RelativePath};
use crate::render::render_content;

/// Where an entry will land and what it will contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTarget {
    pub path: RelativePath,
    /// Rendered bytes; always empty for directories.
    pub content: Vec<u8>,
}

/// One catalog entry after repeat expansion, resolved and rendered in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    pub group: String,
    pub pattern: String,
    pub kind: EntryKind,
    pub executable: bool,
    pub target: Result<PlannedTarget, EntryError>,
}

impl PlannedEntry {
    /// The resolved path when there is one, otherwise the raw pattern.
    pub fn display_path(&self) -> String {
        match &self.target {
            Ok(target) => target.path.as_slash_string(),
            Err(_) => self.pattern.clone(),
        }
    }
}

/// Resolve and render every entry of `catalog` against `base`, in catalog
/// order. Each entry sees `base ⊕ group overrides ⊕ entry overrides`.
/// Nothing is written; failures are kept per entry.
pub fn plan_entries(catalog: &TemplateCatalog, base: &ParameterSet) -> Vec<PlannedEntry> {
    let mut planned = Vec::with_capacity(catalog.expanded_len());

    for group in &catalog.groups {
        for instance in group.instances() {
            let group_params = base.merge(&instance);
            for entry in &group.entries {
                let params = group_params.merge(&entry.overrides);
                let target = resolve_path(&entry.path_pattern, &params).and_then(|path| {
                    let content = match entry.kind {
                        EntryKind::File => {
                            render_content(&entry.content, &params, &path.as_slash_string())?
                        }
                        EntryKind::Dir => Vec::new(),
                    };
                    Ok(PlannedTarget { path, content })
                });

                planned.push(PlannedEntry {
                    group: group.name.clone(),
                    pattern: entry.path_pattern.clone(),
                    kind: entry.kind,
                    executable: entry.executable,
                    target,
                });
            }
        }
    }

    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Group, TemplateEntry};

    #[test]
    fn overrides_layer_entry_over_group_over_base() {
        let catalog = TemplateCatalog::new("demo").with_group(
            Group::new("g")
                .with_overrides(ParameterSet::from_pairs([("a", "group"), ("b", "group")]).unwrap())
                .with_entry(
                    TemplateEntry::file("f.txt", "{{a}} {{b}} {{c}}")
                        .with_overrides(ParameterSet::from_pairs([("b", "entry")]).unwrap()),
                ),
        );
        let base = ParameterSet::from_pairs([("a", "base"), ("c", "base")]).unwrap();

        let planned = plan_entries(&catalog, &base);

        let target = planned[0].target.as_ref().unwrap();
        assert_eq!(target.content, b"group entry base");
    }

    #[test]
    fn repeat_instances_do_not_share_values() {
        let catalog = TemplateCatalog::new("demo").with_group(
            Group::new("services")
                .with_entry(TemplateEntry::file("services/{{name}}/main.txt", "service={{name}}"))
                .repeated("name", ["svc-a", "svc-b"]),
        );

        let planned = plan_entries(&catalog, &ParameterSet::new());

        let rendered: Vec<(String, String)> = planned
            .iter()
            .map(|p| {
                let t = p.target.as_ref().unwrap();
                (
                    t.path.as_slash_string(),
                    String::from_utf8(t.content.clone()).unwrap(),
                )
            })
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("services/svc-a/main.txt".to_string(), "service=svc-a".to_string()),
                ("services/svc-b/main.txt".to_string(), "service=svc-b".to_string()),
            ]
        );
    }

    #[test]
    fn content_errors_name_the_resolved_path() {
        let catalog = TemplateCatalog::new("demo").with_group(
            Group::new("g").with_entry(TemplateEntry::file("{{dir}}/x.txt", "{{missing}}")),
        );
        let base = ParameterSet::from_pairs([("dir", "docs")]).unwrap();

        let planned = plan_entries(&catalog, &base);

        assert_eq!(
            planned[0].target,
            Err(EntryError::MissingParameter {
                name: "missing".into(),
                entry: "docs/x.txt".into(),
            })
        );
        assert_eq!(planned[0].display_path(), "{{dir}}/x.txt");
    }
}
