use crate::catalog::{ParameterSpec, TemplateCatalog};
use crate::config::UserConfig;
use crate::error::{Result, ScaffoldError};
use crate::params::ParameterSet;

/// Catalog parameters that declare a `prompt` and have no value from the
/// user config or the command line, in catalog order.
pub fn pending_prompts<'c>(
    catalog: &'c TemplateCatalog,
    user: Option<&UserConfig>,
    explicit: &ParameterSet,
) -> Vec<(&'c str, &'c ParameterSpec)> {
    catalog
        .parameters
        .iter()
        .filter(|(name, spec)| {
            spec.prompt.is_some()
                && !explicit.contains(name)
                && !user.is_some_and(|u| u.parameters.contains(name))
        })
        .map(|(name, spec)| (name.as_str(), spec))
        .collect()
}

/// Ask for every pending parameter. Catalog defaults are offered as the
/// default answer. Returns only the answers.
pub fn prompt_parameters(
    catalog: &TemplateCatalog,
    user: Option<&UserConfig>,
    explicit: &ParameterSet,
) -> Result<ParameterSet> {
    let mut answers = Vec::new();

    for (name, spec) in pending_prompts(catalog, user, explicit) {
        let Some(question) = &spec.prompt else {
            continue;
        };

        let mut prompt = inquire::Text::new(question);
        if let Some(default) = &spec.default {
            prompt = prompt.with_default(default);
        }
        if let Some(help) = &spec.description {
            prompt = prompt.with_help_message(help);
        }

        let value = prompt.prompt().map_err(|e| match e {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => ScaffoldError::PromptCancelled,
            other => ScaffoldError::Io {
                context: format!("prompting for '{name}'"),
                source: std::io::Error::other(other),
            },
        })?;
        answers.push((name, value));
    }

    ParameterSet::from_pairs(answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TemplateCatalog {
        let mut catalog = TemplateCatalog::new("demo");
        for (name, prompt) in [
            ("author", Some("Author")),
            ("package", Some("Base package")),
            ("project", Some("Project name")),
            ("version", None),
        ] {
            catalog.parameters.insert(
                name.into(),
                ParameterSpec {
                    prompt: prompt.map(String::from),
                    ..Default::default()
                },
            );
        }
        catalog
    }

    #[test]
    fn only_unset_parameters_with_a_prompt_are_asked() {
        let catalog = catalog();
        let user = UserConfig {
            parameters: ParameterSet::from_pairs([("author", "Jane Doe")]).unwrap(),
        };
        let explicit = ParameterSet::from_pairs([("project", "demo")]).unwrap();

        let names: Vec<_> = pending_prompts(&catalog, Some(&user), &explicit)
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        assert_eq!(names, ["package"]);
    }

    #[test]
    fn without_user_config_every_prompt_is_pending() {
        let catalog = catalog();
        let names: Vec<_> = pending_prompts(&catalog, None, &ParameterSet::new())
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        assert_eq!(names, ["author", "package", "project"]);
    }
}
