use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::catalog::EntryKind;
use crate::error::EntryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    SkippedExists,
    Failed(#[serde(serialize_with = "serialize_reason")] EntryError),
}

fn serialize_reason<S: Serializer>(error: &EntryError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&error.to_string())
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// The result of one expanded catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRecord {
    pub group: String,
    /// The resolved relative path, or the raw pattern when resolution failed.
    pub path: String,
    pub kind: EntryKind,
    pub outcome: Outcome,
    /// SHA-256 of the bytes written, for created files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManifestCounts {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Ordered per-entry outcomes of a scaffold run, plus non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreationManifest {
    pub records: Vec<ManifestRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CreationManifest {
    pub fn push(&mut self, record: ManifestRecord) {
        self.records.push(record);
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn counts(&self) -> ManifestCounts {
        let mut counts = ManifestCounts::default();
        for record in &self.records {
            match record.outcome {
                Outcome::Created => counts.created += 1,
                Outcome::SkippedExists => counts.skipped += 1,
                Outcome::Failed(_) => counts.failed += 1,
            }
        }
        counts
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ManifestRecord, &EntryError)> {
        self.records.iter().filter_map(|r| match &r.outcome {
            Outcome::Failed(e) => Some((r, e)),
            _ => None,
        })
    }

    pub fn status(&self) -> RunStatus {
        if self.records.iter().any(|r| r.outcome.is_failure()) {
            RunStatus::Failed
        } else {
            RunStatus::Completed
        }
    }

    /// Records whose path equals `path`, in creation order.
    pub fn records_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ManifestRecord> {
        self.records.iter().filter(move |r| r.path == path)
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn digest(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    hash.iter().map(|b| format!("{b:02x}")).collect()
}
