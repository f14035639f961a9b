// City Classifier - Rules as Data
// Ordered keyword rules decide which per-diem group applies to a destination.

use crate::refdata::Municipality;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-diem group. The label is the substring used to filter the category
/// table, so it follows the (Portuguese) reference data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiemGroup {
    Capitals,
    Communities,
    Ater,
    Interior,
}

impl DiemGroup {
    /// Substring matched against category labels
    pub fn label(&self) -> &'static str {
        match self {
            DiemGroup::Capitals => "Capitais",
            DiemGroup::Communities => "Comunidades",
            DiemGroup::Ater => "ATER",
            DiemGroup::Interior => "Interior",
        }
    }
}

/// One classification rule: the group applies when any keyword appears in
/// the lower-cased city name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRule {
    pub keywords: Vec<String>,
    pub group: DiemGroup,
}

impl GroupRule {
    pub fn matches(&self, name_lower: &str) -> bool {
        self.keywords.iter().any(|k| name_lower.contains(k.as_str()))
    }
}

/// Ordered rule list, evaluated top-to-bottom, first match wins.
/// Cities matching no rule fall back to `Interior`.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<GroupRule>,
}

impl Classifier {
    pub fn from_rules(rules: Vec<GroupRule>) -> Self {
        Classifier { rules }
    }

    /// Load a custom rule list from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rules file: {:?}", path.as_ref()))?;

        let rules: Vec<GroupRule> =
            serde_json::from_str(&content).context("Failed to parse rules JSON")?;

        Ok(Classifier::from_rules(rules))
    }

    /// Classify a city name. Pure function of the lower-cased name and the
    /// rule list; repeated calls always agree.
    ///
    /// The keyword match is a plain substring check, so names that merely
    /// contain a capital name (e.g. "Rio Branco do Sul") classify as that
    /// capital's group. Known limitation of the heuristic, kept as-is.
    pub fn classify(&self, city_name: &str) -> DiemGroup {
        let name_lower = city_name.to_lowercase();

        for rule in &self.rules {
            if rule.matches(&name_lower) {
                return rule.group;
            }
        }

        DiemGroup::Interior
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for Classifier {
    /// Built-in rule set. Keyword list and order reproduce the reference
    /// behavior exactly; the capital list is intentionally short.
    fn default() -> Self {
        Classifier::from_rules(vec![
            GroupRule {
                keywords: vec![
                    "brasilia".to_string(),
                    "rio branco".to_string(),
                    "manaus".to_string(),
                    "são paulo".to_string(),
                    "rio de janeiro".to_string(),
                ],
                group: DiemGroup::Capitals,
            },
            GroupRule {
                keywords: vec!["comunidade".to_string(), "tradicional".to_string()],
                group: DiemGroup::Communities,
            },
            GroupRule {
                keywords: vec!["ater".to_string(), "alter".to_string()],
                group: DiemGroup::Ater,
            },
        ])
    }
}

/// Filter municipalities whose name contains the query as a case-insensitive
/// substring. An empty or no-match query yields an empty list, which callers
/// treat as "no valid input yet", not as an error.
pub fn filter_candidates<'a>(query: &str, municipalities: &'a [Municipality]) -> Vec<&'a Municipality> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    municipalities
        .iter()
        .filter(|m| m.name.to_lowercase().contains(&query))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
