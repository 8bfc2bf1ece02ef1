// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structural checks over every dialogue asset.

use dialogue_editor_graph::{DialogueAsset, LanguageTag};
use serde::Serialize;
use std::path::PathBuf;

/// Problems found in one asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetReport {
    /// Asset file
    pub path: PathBuf,
    /// Container name
    pub name: String,
    /// One message per problem
    pub issues: Vec<String>,
}

/// Validate every asset against the configured languages
pub fn validate(assets: &[DialogueAsset], languages: &[LanguageTag]) -> Vec<AssetReport> {
    assets
        .iter()
        .map(|asset| AssetReport {
            path: asset.path.clone(),
            name: asset.container.name.clone(),
            issues: asset
                .container
                .validate(languages)
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
        .collect()
}

/// Total number of problems
pub fn issue_count(reports: &[AssetReport]) -> usize {
    reports.iter().map(|report| report.issues.len()).sum()
}

/// Human-readable summary
pub fn format_text(reports: &[AssetReport]) -> String {
    let mut out = String::new();
    for report in reports {
        if report.issues.is_empty() {
            out.push_str(&format!("ok    {}\n", report.name));
            continue;
        }
        out.push_str(&format!(
            "FAIL  {} ({})\n",
            report.name,
            report.path.display()
        ));
        for issue in &report.issues {
            out.push_str(&format!("      - {issue}\n"));
        }
    }
    out.push_str(&format!(
        "{} dialogues, {} issues\n",
        reports.len(),
        issue_count(reports)
    ));
    out
}

/// JSON summary
pub fn format_json(reports: &[AssetReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "dialogues": reports,
        "issue_count": issue_count(reports),
    }))
}
