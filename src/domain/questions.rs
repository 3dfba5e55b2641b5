//! Authorization criteria tree as extracted by the backend.
//!
//! The tree is a read-only snapshot attached to one record. A new fetch
//! replaces the whole tree; nothing here mutates it.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Reads an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthQuestion {
    Criterion(Criterion),
    Operation(Operation),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Criterion {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// `None` until the backend has evaluated the criterion.
    #[serde(default)]
    pub value: Option<CriterionValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Operation {
    pub id: String,
    /// Usually `AND` / `OR`, but not restricted by the backend.
    #[serde(default, deserialize_with = "null_as_default")]
    pub operator: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<AuthQuestion>,
}

/// Criterion outcome. Older records carry a bare boolean, newer ones the
/// structured answer; both shapes stay accepted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Legacy(bool),
    Structured(StructuredAnswer),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StructuredAnswer {
    /// Only an explicit `true` counts as met.
    #[serde(default)]
    pub is_met: Option<bool>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
}

impl CriterionValue {
    /// Justification text, if the value carries a non-empty one.
    pub fn justification(&self) -> Option<&str> {
        match self {
            CriterionValue::Structured(s) => {
                s.justification.as_deref().filter(|j| !j.is_empty())
            }
            CriterionValue::Legacy(_) => None,
        }
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            CriterionValue::Structured(s) => s.answer.as_deref(),
            CriterionValue::Legacy(_) => None,
        }
    }
}

/// Tri-state outcome of a single criterion.
///
/// Every consumer (stats, tree view) goes through [`CriterionStatus::resolve`]
/// so they can never disagree on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    Met,
    NotMet,
    Pending,
}

impl CriterionStatus {
    pub fn resolve(value: Option<&CriterionValue>) -> Self {
        match value {
            None => CriterionStatus::Pending,
            Some(CriterionValue::Legacy(true)) => CriterionStatus::Met,
            Some(CriterionValue::Legacy(false)) => CriterionStatus::NotMet,
            Some(CriterionValue::Structured(s)) if s.is_met == Some(true) => CriterionStatus::Met,
            Some(CriterionValue::Structured(_)) => CriterionStatus::NotMet,
        }
    }

    pub fn is_met(self) -> bool {
        self == CriterionStatus::Met
    }

    pub fn is_completed(self) -> bool {
        self != CriterionStatus::Pending
    }
}

impl Criterion {
    pub fn status(&self) -> CriterionStatus {
        CriterionStatus::resolve(self.value.as_ref())
    }
}

impl AuthQuestion {
    pub fn id(&self) -> &str {
        match self {
            AuthQuestion::Criterion(c) => &c.id,
            AuthQuestion::Operation(o) => &o.id,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            AuthQuestion::Criterion(c) => &c.description,
            AuthQuestion::Operation(o) => &o.description,
        }
    }

    /// Ids that appear more than once in the tree, in first-repeat order.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.id()) && !dupes.contains(&node.id()) {
                dupes.push(node.id());
            }
            if let AuthQuestion::Operation(op) = node {
                stack.extend(op.children.iter().rev());
            }
        }
        dupes
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CriteriaStats {
    pub total: usize,
    pub completed: usize,
    pub met: usize,
}

impl CriteriaStats {
    /// Sums leaf outcomes over the whole tree. Operation nodes contribute
    /// nothing themselves. Uses an explicit stack, the payload is untrusted.
    pub fn collect(root: &AuthQuestion) -> Self {
        let mut stats = CriteriaStats::default();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node {
                AuthQuestion::Criterion(c) => {
                    let status = c.status();
                    stats.total += 1;
                    stats.completed += usize::from(status.is_completed());
                    stats.met += usize::from(status.is_met());
                }
                AuthQuestion::Operation(op) => stack.extend(op.children.iter()),
            }
        }
        stats
    }

    /// Reviewed share in whole percent, 0 for an empty tree.
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}
