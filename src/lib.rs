pub mod capture;
pub mod catalog;
pub mod check;
pub mod config;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod manifest;
pub mod materialize;
pub mod params;
pub mod path;
pub mod plan;
pub mod prompt;
pub mod render;
pub mod verify;

use std::path::Path;

use crate::catalog::TemplateCatalog;
use crate::config::UserConfig;
use crate::engine::{ScaffoldEngine, ScaffoldOptions, ScaffoldReport};
use crate::error::Result;
use crate::params::ParameterSet;

/// Name under which the target root's final path component is exposed to templates.
pub const ROOT_PARAMETER: &str = "root";

/// Build the parameters for one run.
///
/// Precedence, lowest first: catalog defaults, user config, interactive
/// answers, explicit values. `root` is filled from the target directory's
/// name unless one of those layers set it.
pub fn resolve_parameters(
    catalog: &TemplateCatalog,
    user: Option<&UserConfig>,
    answers: &ParameterSet,
    explicit: &ParameterSet,
    root: &Path,
) -> ParameterSet {
    let mut params = catalog.defaults();
    if let Some(user) = user {
        params = params.merge(&user.parameters);
    }
    params = params.merge(answers).merge(explicit);

    if !params.contains(ROOT_PARAMETER) {
        if let Some(name) = root.file_name().and_then(|n| n.to_str()) {
            params = params.with(ROOT_PARAMETER, name);
        }
    }
    params
}

/// Scaffold `catalog` into `root` in one call.
pub fn scaffold(
    catalog: &TemplateCatalog,
    params: &ParameterSet,
    root: &Path,
    options: ScaffoldOptions,
) -> Result<ScaffoldReport> {
    ScaffoldEngine::new(catalog, params, root)
        .with_options(options)
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ParameterSpec;

    #[test]
    fn parameter_precedence() {
        let mut catalog = TemplateCatalog::new("demo");
        for (name, default) in [("a", "catalog"), ("b", "catalog"), ("c", "catalog")] {
            catalog.parameters.insert(
                name.into(),
                ParameterSpec {
                    default: Some(default.into()),
                    ..Default::default()
                },
            );
        }
        let user = UserConfig {
            parameters: ParameterSet::from_pairs([("b", "user"), ("c", "user")]).unwrap(),
        };
        let explicit = ParameterSet::from_pairs([("c", "cli")]).unwrap();

        let params = resolve_parameters(
            &catalog,
            Some(&user),
            &ParameterSet::new(),
            &explicit,
            Path::new("work/selfie-kmp"),
        );

        assert_eq!(params.get("a"), Some("catalog"));
        assert_eq!(params.get("b"), Some("user"));
        assert_eq!(params.get("c"), Some("cli"));
        assert_eq!(params.get(ROOT_PARAMETER), Some("selfie-kmp"));
    }

    #[test]
    fn explicit_root_parameter_wins() {
        let catalog = TemplateCatalog::new("demo");
        let explicit = ParameterSet::from_pairs([(ROOT_PARAMETER, "custom")]).unwrap();
        let params = resolve_parameters(
            &catalog,
            None,
            &ParameterSet::new(),
            &explicit,
            Path::new("out"),
        );
        assert_eq!(params.get(ROOT_PARAMETER), Some("custom"));
    }
}
