// SPDX-License-Identifier: MIT OR Apache-2.0
//! CSV export of every localized dialogue string.

use super::GUID_HEADER;
use dialogue_editor_graph::{DialogueContainer, LanguageTable, LanguageTag};

/// Quote a cell, doubling embedded quotes
pub fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn push_row(out: &mut String, id: &str, table: &LanguageTable<String>) {
    out.push_str(id);
    for tag in LanguageTag::ALL {
        out.push(',');
        let text = table.get(tag).map(String::as_str).unwrap_or_default();
        out.push_str(&quote(text));
    }
    out.push('\n');
}

/// Render the text of every dialogue node and choice as CSV.
///
/// One row per dialogue node keyed by node id, followed by one row per
/// choice keyed by port id.
pub fn export<'a>(containers: impl IntoIterator<Item = &'a DialogueContainer>) -> String {
    let mut out = String::from(GUID_HEADER);
    for tag in LanguageTag::ALL {
        out.push(',');
        out.push_str(tag.name());
    }
    out.push('\n');

    let mut rows = 0;
    for container in containers {
        for node in &container.dialogue_nodes {
            push_row(&mut out, &node.node_id.to_string(), &node.text);
            rows += 1;
            for port in &node.ports {
                push_row(&mut out, &port.port_id.to_string(), &port.labels);
                rows += 1;
            }
        }
    }

    tracing::debug!("Exported {rows} CSV rows");
    out
}
