#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Scopes a route declares as mandatory.
///
/// Declaration order is kept for reporting; duplicates are dropped on
/// construction. An empty requirement is satisfied by every caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct ScopeRequirement {
    scopes: Vec<String>,
}

impl ScopeRequirement {
    pub fn of<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let scopes = scopes
            .into_iter()
            .map(Into::into)
            .filter(|scope: &String| seen.insert(scope.clone()))
            .collect();
        Self { scopes }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }

    pub fn is_satisfied_by(&self, granted: &BTreeSet<String>) -> bool {
        self.scopes.iter().all(|scope| granted.contains(scope))
    }

    /// Required scopes absent from `granted`, in declaration order.
    pub fn missing_from<'a>(&'a self, granted: &'a BTreeSet<String>) -> Vec<&'a str> {
        self.scopes
            .iter()
            .filter(|scope| !granted.contains(*scope))
            .map(String::as_str)
            .collect()
    }
}

impl<'de> Deserialize<'de> for ScopeRequirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let scopes = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::of(scopes))
    }
}
