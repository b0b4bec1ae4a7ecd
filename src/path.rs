use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::EntryError;
use crate::params::ParameterSet;
use crate::render::template::Template;

/// A normalized path relative to the target root, held with `/` separators.
///
/// Segments are never empty, `.` or `..`; conversion to the host separator
/// happens only in [`RelativePath::to_host`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct RelativePath {
    segments: Vec<String>,
}

impl RelativePath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn as_slash_string(&self) -> String {
        self.segments.join("/")
    }

    pub fn to_host(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_slash_string())
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.as_slash_string()
    }
}

/// Turn a dotted package name into nested directories: `com.selfie` becomes
/// `com/selfie`. This is the only place that conversion is defined; templates
/// reach it through the `{{ name | path }}` transform.
pub fn dotted_to_segments(dotted: &str) -> String {
    dotted.replace('.', "/")
}

/// Substitute `params` into `pattern` and normalize the result.
///
/// Fails with [`EntryError::PathTraversal`] for absolute patterns, `..`
/// segments, backslashes, drive prefixes, or a pattern that normalizes to
/// the root itself.
pub fn resolve_path(pattern: &str, params: &ParameterSet) -> Result<RelativePath, EntryError> {
    let template = Template::parse(pattern).map_err(|reason| EntryError::MalformedTemplate {
        entry: pattern.to_string(),
        reason,
    })?;
    let substituted = template.render(params, pattern)?;
    normalize(&substituted).ok_or_else(|| EntryError::PathTraversal {
        entry: pattern.to_string(),
    })
}

/// Normalize an already substituted path, or `None` if it is not strictly
/// inside the root.
pub fn normalize(path: &str) -> Option<RelativePath> {
    if path.starts_with('/') || path.contains('\\') {
        return None;
    }

    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains(':') && segments.is_empty() && is_drive_prefix(s) => return None,
            s => segments.push(s.to_string()),
        }
    }

    if segments.is_empty() {
        return None;
    }
    Some(RelativePath { segments })
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
