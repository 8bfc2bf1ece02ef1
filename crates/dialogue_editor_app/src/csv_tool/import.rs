// SPDX-License-Identifier: MIT OR Apache-2.0
//! CSV import of translated dialogue strings.

use dialogue_editor_graph::{DialogueAsset, LanguageTable, LanguageTag};
use std::collections::HashMap;
use uuid::Uuid;

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows written into a node or choice
    pub applied: usize,
    /// Rows whose id matched nothing
    pub unmatched: usize,
    /// Header cells that are not enabled language names
    pub ignored_columns: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Node { asset: usize, node: usize },
    Port { asset: usize, node: usize, port: usize },
}

/// Index every id a row may refer to.
///
/// Node ids win over port ids, which win over legacy port guids.
fn index_targets(assets: &[DialogueAsset]) -> HashMap<Uuid, Target> {
    let mut targets = HashMap::new();

    for (a, asset) in assets.iter().enumerate() {
        for (n, node) in asset.container.dialogue_nodes.iter().enumerate() {
            for (p, port) in node.ports.iter().enumerate() {
                let target = Target::Port { asset: a, node: n, port: p };
                if !port.port_guid.is_nil() {
                    targets.insert(port.port_guid.0, target);
                }
            }
        }
    }
    for (a, asset) in assets.iter().enumerate() {
        for (n, node) in asset.container.dialogue_nodes.iter().enumerate() {
            for (p, port) in node.ports.iter().enumerate() {
                if !port.port_id.is_nil() {
                    targets.insert(port.port_id.0, Target::Port { asset: a, node: n, port: p });
                }
            }
        }
    }
    for (a, asset) in assets.iter().enumerate() {
        for (n, node) in asset.container.dialogue_nodes.iter().enumerate() {
            targets.insert(node.node_id.0, Target::Node { asset: a, node: n });
        }
    }
    targets
}

fn apply_row(table: &mut LanguageTable<String>, row: &[String], columns: &[(usize, LanguageTag)]) -> bool {
    let mut changed = false;
    for (column, tag) in columns {
        let Some(value) = row.get(*column) else {
            continue;
        };
        if table.get(*tag).ok() != Some(value) {
            table.set(*tag, value.clone());
            changed = true;
        }
    }
    changed
}

/// Write the language columns of parsed CSV rows into the assets.
///
/// Row 0 is the header. Column 0 of every other row names a dialogue node,
/// a choice port or a legacy port guid. Only columns of `languages` are
/// written, so tables keep one entry per enabled language. Touched assets
/// are marked dirty.
pub fn import(rows: &[Vec<String>], assets: &mut [DialogueAsset], languages: &[LanguageTag]) -> ImportReport {
    let mut report = ImportReport::default();
    let Some((header, data)) = rows.split_first() else {
        tracing::warn!("CSV has no header row");
        return report;
    };

    let mut columns = Vec::new();
    for (column, name) in header.iter().enumerate().skip(1) {
        match name.trim().parse::<LanguageTag>() {
            Ok(tag) if languages.contains(&tag) => columns.push((column, tag)),
            _ => {
                tracing::debug!("Ignoring CSV column '{name}'");
                report.ignored_columns.push(name.clone());
            }
        }
    }

    let targets = index_targets(assets);
    for row in data {
        let Some(id) = row.first().and_then(|cell| Uuid::parse_str(cell.trim()).ok()) else {
            tracing::warn!("CSV row has no usable id: {:?}", row.first());
            report.unmatched += 1;
            continue;
        };
        let Some(target) = targets.get(&id).copied() else {
            tracing::warn!("CSV row {id} matches no node or choice");
            report.unmatched += 1;
            continue;
        };

        let (asset, changed) = match target {
            Target::Node { asset, node } => {
                let record = &mut assets[asset].container.dialogue_nodes[node];
                (asset, apply_row(&mut record.text, row, &columns))
            }
            Target::Port { asset, node, port } => {
                let record = &mut assets[asset].container.dialogue_nodes[node].ports[port];
                (asset, apply_row(&mut record.labels, row, &columns))
            }
        };
        if changed {
            assets[asset].dirty = true;
        }
        report.applied += 1;
    }

    tracing::info!(
        "Imported {} CSV rows ({} unmatched)",
        report.applied,
        report.unmatched
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_tool::{export, parser};
    use dialogue_editor_graph::{DialogueNodeRecord, NodeId, PortId, PortRecord, PortraitSide};
    use pretty_assertions::assert_eq;

    fn asset() -> DialogueAsset {
        let mut asset = DialogueAsset::new("unused.dialogue.ron", "shop");
        let mut text = LanguageTable::complete(&LanguageTag::ALL);
        text.set(LanguageTag::English, "Welcome!".to_string());
        asset.container.dialogue_nodes.push(DialogueNodeRecord {
            node_id: NodeId::new(),
            position: [0.0, 0.0],
            speaker_name: "Shopkeeper".to_string(),
            portrait: None,
            portrait_side: PortraitSide::Left,
            text,
            audio: LanguageTable::complete(&LanguageTag::ALL),
            ports: vec![PortRecord {
                port_id: PortId::new(),
                port_guid: PortId::new(),
                text_field_id: PortId::new(),
                output_guid: None,
                labels: LanguageTable::filled(&LanguageTag::ALL, "Continue".to_string()),
            }],
        });
        asset.dirty = false;
        asset
    }

    #[test]
    fn test_export_then_import_is_stable() {
        let mut assets = vec![asset()];
        let before = assets[0].container.clone();
        let rows = parser::parse(&export::export(assets.iter().map(|a| &a.container)));

        let report = import(&rows, &mut assets, &LanguageTag::ALL);
        assert_eq!(report.applied, 2);
        assert_eq!(report.unmatched, 0);
        assert_eq!(assets[0].container, before);
        assert!(!assets[0].dirty);
    }

    #[test]
    fn test_import_by_node_port_and_legacy_guid() {
        let mut assets = vec![asset()];
        let node = &assets[0].container.dialogue_nodes[0];
        let (node_id, port_guid) = (node.node_id, node.ports[0].port_guid);
        let csv = format!(
            "Guid ID,German,Notes\n{node_id},\"Willkommen!\",x\n{port_guid},\"Weiter\"\n{},\"Nobody\"\n",
            NodeId::new()
        );

        let report = import(&parser::parse(&csv), &mut assets, &LanguageTag::ALL);
        assert_eq!(report.applied, 2);
        assert_eq!(report.unmatched, 1);
        assert_eq!(report.ignored_columns, vec!["Notes".to_string()]);
        assert!(assets[0].dirty);

        let node = &assets[0].container.dialogue_nodes[0];
        assert_eq!(node.text.get(LanguageTag::German).unwrap(), "Willkommen!");
        assert_eq!(node.text.get(LanguageTag::English).unwrap(), "Welcome!");
        assert_eq!(node.ports[0].labels.get(LanguageTag::German).unwrap(), "Weiter");
    }

    #[test]
    fn test_port_id_wins_over_legacy_guid() {
        let mut assets = vec![asset(), asset()];
        // Second asset's legacy guid collides with the first asset's port id.
        let port_id = assets[0].container.dialogue_nodes[0].ports[0].port_id;
        assets[1].container.dialogue_nodes[0].ports[0].port_guid = port_id;

        let csv = format!("Guid ID,Danish\n{port_id},\"Fortsæt\"\n");
        import(&parser::parse(&csv), &mut assets, &LanguageTag::ALL);

        assert_eq!(
            assets[0].container.dialogue_nodes[0].ports[0].labels.get(LanguageTag::Danish).unwrap(),
            "Fortsæt"
        );
        assert_eq!(
            assets[1].container.dialogue_nodes[0].ports[0].labels.get(LanguageTag::Danish).unwrap(),
            "Continue"
        );
        assert!(!assets[1].dirty);
    }

    #[test]
    fn test_empty_csv_does_nothing() {
        let mut assets = vec![asset()];
        let report = import(&parser::parse(""), &mut assets, &LanguageTag::ALL);
        assert_eq!(report, ImportReport::default());
    }

    #[test]
    fn test_disabled_languages_stay_out() {
        let languages = [LanguageTag::English, LanguageTag::German];
        let mut assets = vec![asset()];
        assert!(assets[0].ensure_languages(&languages));
        assets[0].dirty = false;
        let before = assets[0].container.clone();

        let rows = parser::parse(&export::export(assets.iter().map(|a| &a.container)));
        let report = import(&rows, &mut assets, &languages);

        assert_eq!(report.applied, 2);
        assert_eq!(report.ignored_columns, vec!["Danish".to_string(), "Japanese".to_string()]);
        assert!(!assets[0].dirty);
        assert_eq!(assets[0].container, before);
        let tags: Vec<LanguageTag> = assets[0].container.dialogue_nodes[0]
            .text
            .iter()
            .map(|entry| entry.language)
            .collect();
        assert_eq!(tags, languages.to_vec());
    }
}
