pub mod template;

pub use template::{escape_literal, Template};

use crate::error::EntryError;
use crate::params::ParameterSet;

/// Render a content template to the exact bytes that will be written.
///
/// `entry` names the catalog entry (its path pattern) in diagnostics.
pub fn render_content(
    content: &str,
    params: &ParameterSet,
    entry: &str,
) -> Result<Vec<u8>, EntryError> {
    let template = Template::parse(content).map_err(|reason| EntryError::MalformedTemplate {
        entry: entry.to_string(),
        reason,
    })?;
    Ok(template.render(params, entry)?.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_is_repeatable() {
        let params = ParameterSet::from_pairs([("project", "demo")]).unwrap();
        let content = "name={{project}}\n{{{{ literal }}}}\n";

        let first = render_content(content, &params, "a").unwrap();
        let second = render_content(content, &params, "a").unwrap();

        assert_eq!(first, second);
        assert_eq!(first, b"name=demo\n{{ literal }}\n");
    }

    #[test]
    fn keeps_trailing_whitespace_as_written() {
        let params = ParameterSet::new();
        assert_eq!(render_content("x\r\n\n", &params, "a").unwrap(), b"x\r\n\n");
        assert_eq!(render_content("x", &params, "a").unwrap(), b"x");
    }

    #[test]
    fn malformed_template_names_entry() {
        let err = render_content("{{oops", &ParameterSet::new(), "build.gradle.kts").unwrap_err();
        match err {
            EntryError::MalformedTemplate { entry, .. } => assert_eq!(entry, "build.gradle.kts"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
