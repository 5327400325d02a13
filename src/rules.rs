use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Naming convention that links a comparison column to its paired value
/// columns: `<field><comparison_suffix>` pairs with `<new_prefix><field>`
/// and `<old_prefix><field>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConvention {
    pub comparison_suffix: String,
    pub new_prefix: String,
    pub old_prefix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            comparison_suffix: "_comparison".to_string(),
            new_prefix: "new_".to_string(),
            old_prefix: "old_".to_string(),
        }
    }
}

impl NamingConvention {
    /// The `<field>` part of a label that follows the convention, if any.
    /// A label that is nothing but the suffix has no field.
    pub fn field_of<'a>(&self, label: &'a str) -> Option<&'a str> {
        match label.strip_suffix(&self.comparison_suffix) {
            Some("") | None => None,
            Some(field) => Some(field),
        }
    }

    pub fn new_label(&self, field: &str) -> String {
        format!("{}{}", self.new_prefix, field)
    }

    pub fn old_label(&self, field: &str) -> String {
        format!("{}{}", self.old_prefix, field)
    }
}

/// Classification rules for one run: which columns count as comparison
/// columns, which keywords mark a failing verdict, and how failing verdict
/// text is bucketed into reason categories.
///
/// All keyword matching is case-insensitive containment. Every field has a
/// built-in default, so a rule file only needs the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Case-sensitive substring a column label must contain to be treated
    /// as a comparison column.
    pub comparison_marker: String,
    /// A text verdict containing any of these fails.
    pub fail_keywords: Vec<String>,
    /// Reason bucket probed first when explaining failing verdict text.
    pub failure_markers: Vec<String>,
    /// Probed second.
    pub not_pass_markers: Vec<String>,
    /// Probed third; anything left over is "other reason".
    pub mismatch_markers: Vec<String>,
    pub naming: NamingConvention,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            comparison_marker: "comparison".to_string(),
            fail_keywords: vec![
                "fail".to_string(),
                "not pass".to_string(),
                "no pass".to_string(),
                "unqualified".to_string(),
                "mismatch".to_string(),
                "inconsistent".to_string(),
                "reject".to_string(),
            ],
            failure_markers: vec!["fail".to_string(), "reject".to_string()],
            not_pass_markers: vec![
                "not pass".to_string(),
                "no pass".to_string(),
                "unqualified".to_string(),
            ],
            mismatch_markers: vec!["mismatch".to_string(), "inconsistent".to_string()],
            naming: NamingConvention::default(),
        }
    }
}

impl RuleSet {
    /// File name probed in the scan directory when `--rules` is not given.
    pub const DEFAULT_FILE: &'static str = "xlverdict.yaml";

    /// Load rules from a YAML file. Fields left out keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading rule file {}", path.display()))?;
        let rules: RuleSet = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing rule file {}", path.display()))?;
        info!(file = %path.display(), "loaded rule file");
        Ok(rules)
    }

    /// Rules for a run: an explicit path wins, else `xlverdict.yaml` in
    /// the scan directory when present, else the built-in defaults.
    pub fn discover(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        let candidate = dir.join(Self::DEFAULT_FILE);
        if candidate.is_file() {
            return Self::from_path(&candidate);
        }
        debug!("no rule file found, using built-in defaults");
        Ok(Self::default())
    }
}

/// True when `text` contains any of `keywords`, ignoring case.
/// Empty keywords never match; they would otherwise match everything.
pub fn matches_any(text: &str, keywords: &[String]) -> bool {
    let lowered = text.to_lowercase();
    keywords
        .iter()
        .any(|kw| !kw.is_empty() && lowered.contains(&kw.to_lowercase()))
}
