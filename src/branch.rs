use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context};

use crate::models::{BranchRule, Row};

const DEFAULT_RULES: [(&str, &str); 7] = [
    ("EEE", "2024A3PS"),
    ("MECH", "2024A4PS"),
    ("BPHARM", "2024A5PS"),
    ("CS", "2024A7PS"),
    ("ENI", "2024A8PS"),
    ("ECE", "2024AAPS"),
    ("MNC", "2024ADPS"),
];

pub fn default_rules() -> Vec<BranchRule> {
    DEFAULT_RULES
        .iter()
        .map(|(label, pattern)| BranchRule {
            label: label.to_string(),
            pattern: pattern.to_string(),
        })
        .collect()
}

/// Reads branch rules from a JSON array of `{ "label", "pattern" }` objects.
pub fn load_rules(path: &Path) -> anyhow::Result<Vec<BranchRule>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read branch rules from {}", path.display()))?;
    let rules: Vec<BranchRule> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid branch rules in {}", path.display()))?;

    if let Some(rule) = rules.iter().find(|rule| rule.pattern.is_empty()) {
        bail!("branch {} has an empty pattern", rule.label);
    }
    Ok(rules)
}

/// Groups rows by every rule whose pattern appears in the student ID.
///
/// A row lands in each matching branch; branches without rows are left out.
pub fn partition(rows: &[Row], rules: &[BranchRule]) -> BTreeMap<String, Vec<Row>> {
    let mut branches: BTreeMap<String, Vec<Row>> = BTreeMap::new();

    for row in rows {
        let Some(student_id) = row.student_id() else {
            continue;
        };
        for rule in rules {
            if student_id.contains(rule.pattern.as_str()) {
                branches
                    .entry(rule.label.clone())
                    .or_default()
                    .push(row.clone());
            }
        }
    }

    branches
}
