use std::collections::{BTreeSet, HashMap};

use crate::catalog::{EntryKind, TemplateCatalog};
use crate::error::EntryError;
use crate::params::ParameterSet;
use crate::plan::plan_entries;
use crate::render::Template;

/// Result of validating a catalog without writing anything.
pub struct CheckResult {
    pub catalog_name: String,
    pub group_count: usize,
    pub entry_count: usize,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CheckResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate template syntax, parameter coverage, path containment and
/// duplicate paths for `catalog` rendered against `supplied`.
///
/// Declared parameters with no default and no supplied value are filled with
/// their own name so the remaining checks can still run; each one is warned about.
pub fn check_catalog(catalog: &TemplateCatalog, supplied: &ParameterSet) -> CheckResult {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    let mut params = catalog.defaults().merge(supplied);
    for name in catalog.parameters.keys() {
        if !params.contains(name) {
            warnings.push(format!(
                "parameter '{name}' has no default and must be supplied with -p {name}=..."
            ));
            params = params.with(name, name);
        }
    }
    // `root` is always bound at run time.
    if !params.contains(crate::ROOT_PARAMETER) {
        params = params.with(crate::ROOT_PARAMETER, crate::ROOT_PARAMETER);
    }

    let referenced = referenced_names(catalog);
    for name in catalog.parameters.keys() {
        if !referenced.contains(name.as_str()) {
            warnings.push(format!("parameter '{name}' is declared but never used"));
        }
    }

    for group in &catalog.groups {
        if group.instances().is_empty() {
            warnings.push(format!(
                "group '{}' repeats over an empty list and produces no entries",
                group.name
            ));
        }
    }

    let planned = plan_entries(catalog, &params);
    let mut first_owner: HashMap<String, String> = HashMap::new();

    for entry in &planned {
        match &entry.target {
            Ok(target) => {
                let path = target.path.as_slash_string();
                if let Some(owner) = first_owner.get(&path) {
                    let duplicate = EntryError::DuplicateEntry { path: path.clone() };
                    errors.push(format!(
                        "{duplicate} (groups '{owner}' and '{}')",
                        entry.group
                    ));
                } else {
                    first_owner.insert(path, entry.group.clone());
                }
            }
            Err(e) => errors.push(format!("[{}] {e}", entry.group)),
        }
    }

    CheckResult {
        catalog_name: catalog.name.clone(),
        group_count: catalog.groups.len(),
        entry_count: planned.len(),
        warnings,
        errors,
    }
}

/// Every placeholder name used by any pattern or content.
fn referenced_names(catalog: &TemplateCatalog) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for group in &catalog.groups {
        for entry in &group.entries {
            let mut sources = vec![entry.path_pattern.as_str()];
            if entry.kind == EntryKind::File {
                sources.push(entry.content.as_str());
            }
            for source in sources {
                if let Ok(template) = Template::parse(source) {
                    names.extend(template.placeholders().into_iter().map(String::from));
                }
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Group, ParameterSpec, TemplateEntry};

    #[test]
    fn clean_catalog_has_no_errors() {
        let catalog = TemplateCatalog::new("demo").with_group(
            Group::new("root").with_entry(TemplateEntry::file("settings.txt", "name={{project}}")),
        );
        let result = check_catalog(&catalog, &ParameterSet::from_pairs([("project", "x")]).unwrap());
        assert!(result.is_valid(), "{:?}", result.errors);
        assert_eq!(result.entry_count, 1);
    }

    #[test]
    fn reports_each_problem() {
        let catalog = TemplateCatalog::new("demo")
            .with_group(
                Group::new("root")
                    .with_entry(TemplateEntry::file("a.txt", "1"))
                    .with_entry(TemplateEntry::file("../b.txt", "2"))
                    .with_entry(TemplateEntry::file("c.txt", "{{undeclared}}"))
                    .with_entry(TemplateEntry::file("d.txt", "{{broken")),
            )
            .with_group(Group::new("other").with_entry(TemplateEntry::file("./a.txt", "3")));

        let result = check_catalog(&catalog, &ParameterSet::new());

        assert_eq!(result.errors.len(), 4, "{:?}", result.errors);
        assert!(result.errors.iter().any(|e| e.contains("escapes the target root")));
        assert!(result.errors.iter().any(|e| e.contains("'undeclared'")));
        assert!(result.errors.iter().any(|e| e.contains("malformed")));
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("more than one entry") && e.contains("'other'")));
    }

    #[test]
    fn declared_parameters_without_values_are_warnings() {
        let mut catalog = TemplateCatalog::new("demo").with_group(
            Group::new("root").with_entry(TemplateEntry::file("{{package|path}}/Main.kt", "")),
        );
        catalog
            .parameters
            .insert("package".into(), ParameterSpec::default());
        catalog
            .parameters
            .insert("unused".into(), ParameterSpec::default());

        let result = check_catalog(&catalog, &ParameterSet::new());

        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(result.warnings.iter().any(|w| w.contains("'package' has no default")));
        assert!(result.warnings.iter().any(|w| w.contains("'unused' is declared but never used")));
    }

    #[test]
    fn root_parameter_is_always_bound() {
        let catalog = TemplateCatalog::new("demo")
            .with_group(Group::new("root").with_entry(TemplateEntry::file("README.md", "# {{root}}")));
        let result = check_catalog(&catalog, &ParameterSet::new());
        assert!(result.is_valid(), "{:?}", result.errors);
    }
}
