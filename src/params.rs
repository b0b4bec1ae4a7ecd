use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{EntryError, Result, ScaffoldError};

/// An immutable set of named string parameters.
///
/// Sets are combined with [`ParameterSet::merge`], which never mutates either
/// side: the base used by one catalog entry cannot leak into the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct ParameterSet {
    values: BTreeMap<String, String>,
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("parameter name pattern is valid")
    })
}

/// Whether `name` may be used as a parameter (and therefore placeholder) name.
pub fn is_valid_name(name: &str) -> bool {
    name_pattern().is_match(name)
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from name/value pairs, rejecting invalid names.
    /// Later pairs win over earlier ones with the same name.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = BTreeMap::new();
        for (name, value) in pairs {
            let name = name.into();
            if !is_valid_name(&name) {
                return Err(ScaffoldError::InvalidParameterName { name });
            }
            values.insert(name, value.into());
        }
        Ok(Self { values })
    }

    /// Parse `KEY=VALUE` strings as given on the command line.
    pub fn from_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Self> {
        let mut pairs = Vec::with_capacity(assignments.len());
        for raw in assignments {
            let raw = raw.as_ref();
            let (name, value) =
                raw.split_once('=')
                    .ok_or_else(|| ScaffoldError::InvalidParameterName {
                        name: raw.to_string(),
                    })?;
            pairs.push((name.trim().to_string(), value.to_string()));
        }
        Self::from_pairs(pairs)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Look up `name`, reporting a [`EntryError::MissingParameter`] against
    /// `entry` when it is absent.
    pub fn require(&self, name: &str, entry: &str) -> std::result::Result<&str, EntryError> {
        self.get(name).ok_or_else(|| EntryError::MissingParameter {
            name: name.to_string(),
            entry: entry.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Return a new set with `overrides` layered on top of `self`.
    pub fn merge(&self, overrides: &ParameterSet) -> ParameterSet {
        if overrides.is_empty() {
            return self.clone();
        }
        let mut values = self.values.clone();
        for (name, value) in &overrides.values {
            values.insert(name.clone(), value.clone());
        }
        ParameterSet { values }
    }

    /// Return a new set with a single extra value. `name` must already be a
    /// valid parameter name (catalog loading checks repeat parameter names).
    pub fn with(&self, name: &str, value: &str) -> ParameterSet {
        let mut values = self.values.clone();
        values.insert(name.to_string(), value.to_string());
        ParameterSet { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl TryFrom<BTreeMap<String, String>> for ParameterSet {
    type Error = ScaffoldError;

    fn try_from(values: BTreeMap<String, String>) -> Result<Self> {
        Self::from_pairs(values)
    }
}

impl From<ParameterSet> for BTreeMap<String, String> {
    fn from(set: ParameterSet) -> Self {
        set.values
    }
}
