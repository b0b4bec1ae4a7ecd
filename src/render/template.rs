use crate::error::EntryError;
use crate::params::{is_valid_name, ParameterSet};
use crate::path::dotted_to_segments;

/// A value transform applied to a placeholder, written `{{ name | transform }}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// `com.selfie` becomes `com/selfie`.
    Path,
}

impl Transform {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "path" => Some(Transform::Path),
            _ => None,
        }
    }

    fn apply(self, value: &str) -> String {
        match self {
            Transform::Path => dotted_to_segments(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder {
        name: String,
        transform: Option<Transform>,
    },
}

/// A parsed template: literal text interleaved with placeholders.
///
/// Syntax:
/// - `{{ name }}` substitutes a parameter
/// - `{{ name | path }}` substitutes it with dots turned into `/`
/// - `{{{{` and `}}}}` produce literal `{{` and `}}`
///
/// Everything else, including single braces, is literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source. The error string describes the first syntax problem.
    pub fn parse(source: &str) -> std::result::Result<Self, String> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < source.len() {
            let rest = &source[i..];

            if rest.starts_with("{{{{") {
                literal.push_str("{{");
                i += 4;
            } else if rest.starts_with("}}}}") {
                literal.push_str("}}");
                i += 4;
            } else if rest.starts_with("{{") {
                let body_start = i + 2;
                let close = source[body_start..]
                    .find("}}")
                    .ok_or_else(|| format!("unterminated '{{{{' at byte {i}"))?;
                let body = &source[body_start..body_start + close];

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(parse_placeholder(body)?);
                i = body_start + close + 2;
            } else {
                match rest.find(&['{', '}'][..]) {
                    None => {
                        literal.push_str(rest);
                        i = source.len();
                    }
                    // A lone brace; braces are ASCII so one byte is one char.
                    Some(0) => {
                        literal.push_str(&rest[..1]);
                        i += 1;
                    }
                    Some(n) => {
                        literal.push_str(&rest[..n]);
                        i += n;
                    }
                }
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template { segments })
    }

    /// Names referenced by this template, in order of first use.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder { name, .. } = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute `params` into the template. `entry` identifies the catalog
    /// entry in any [`EntryError::MissingParameter`].
    pub fn render(&self, params: &ParameterSet, entry: &str) -> Result<String, EntryError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { name, transform } => {
                    let value = params.require(name, entry)?;
                    match transform {
                        Some(t) => out.push_str(&t.apply(value)),
                        None => out.push_str(value),
                    }
                }
            }
        }
        Ok(out)
    }
}

fn parse_placeholder(body: &str) -> std::result::Result<Segment, String> {
    let (name, transform) = match body.split_once('|') {
        Some((name, transform)) => {
            let transform = transform.trim();
            let parsed = Transform::parse(transform)
                .ok_or_else(|| format!("unknown transform '{transform}'"))?;
            (name.trim(), Some(parsed))
        }
        None => (body.trim(), None),
    };

    if name.is_empty() {
        return Err("empty placeholder".to_string());
    }
    if !is_valid_name(name) {
        return Err(format!("invalid placeholder name '{name}'"));
    }

    Ok(Segment::Placeholder {
        name: name.to_string(),
        transform,
    })
}

/// Escape literal text so that rendering it yields the text unchanged.
pub fn escape_literal(text: &str) -> String {
    text.replace("{{", "{{{{").replace("}}", "}}}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params() -> ParameterSet {
        ParameterSet::from_pairs([("project", "demo"), ("package", "com.selfie")]).unwrap()
    }

    fn render(src: &str) -> Result<String, EntryError> {
        Template::parse(src).unwrap().render(&params(), "test.txt")
    }

    #[rstest]
    #[case("name={{project}}", "name=demo")]
    #[case("name={{ project }}", "name=demo")]
    #[case("{{package|path}}/Main.kt", "com/selfie/Main.kt")]
    #[case("{{ package | path }}", "com/selfie")]
    #[case("{{{{project}}}}", "{{project}}")]
    #[case("plugins { id(\"x\") }", "plugins { id(\"x\") }")]
    #[case("{{project}}}", "demo}")]
    #[case("{ {{project}} }", "{ demo }")]
    #[case("", "")]
    #[case("ünïcode {{project}} ✓", "ünïcode demo ✓")]
    fn renders(#[case] src: &str, #[case] expected: &str) {
        assert_eq!(render(src).unwrap(), expected);
    }

    #[test]
    fn missing_parameter_is_never_empty() {
        let err = render("a={{absent}}").unwrap_err();
        assert_eq!(
            err,
            EntryError::MissingParameter {
                name: "absent".into(),
                entry: "test.txt".into(),
            }
        );
    }

    #[rstest]
    #[case("{{project")]
    #[case("{{}}")]
    #[case("{{ .Release.Name }}")]
    #[case("{{project|upper}}")]
    fn rejects_malformed(#[case] src: &str) {
        assert!(Template::parse(src).is_err());
    }

    #[test]
    fn lists_placeholders_once() {
        let t = Template::parse("{{a}} {{b|path}} {{a}}").unwrap();
        assert_eq!(t.placeholders(), vec!["a", "b"]);
    }

    #[rstest]
    #[case("plain")]
    #[case("{{ .Release.Name }}")]
    #[case("${{iosTarget.name}}")]
    #[case("{{{")]
    #[case("}}}")]
    #[case("{}}")]
    #[case("{{{{{")]
    fn escaped_text_renders_back_unchanged(#[case] text: &str) {
        let escaped = escape_literal(text);
        let rendered = Template::parse(&escaped)
            .unwrap()
            .render(&ParameterSet::new(), "x")
            .unwrap();
        assert_eq!(rendered, text);
    }
}
