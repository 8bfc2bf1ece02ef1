// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bring every dialogue asset in line with the configured language list.

use dialogue_editor_graph::{DialogueAsset, LanguageTag};

/// Reconcile every language table of every asset with `languages`.
///
/// Existing values are kept, missing languages get empty values and
/// languages no longer configured are dropped. Returns how many assets
/// changed; those are marked dirty.
pub fn update_languages(assets: &mut [DialogueAsset], languages: &[LanguageTag]) -> usize {
    let mut changed = 0;
    for asset in assets.iter_mut() {
        if asset.ensure_languages(languages) {
            tracing::info!("Updated languages of '{}'", asset.container.name);
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_editor_graph::{DialogueNodeRecord, LanguageTable, NodeId, PortRecord, PortId, PortraitSide};
    use pretty_assertions::assert_eq;

    fn asset_with_english_only() -> DialogueAsset {
        let mut asset = DialogueAsset::new("unused.dialogue.ron", "migrate");
        let mut text = LanguageTable::new();
        text.set(LanguageTag::Japanese, "こんにちは".to_string());
        text.set(LanguageTag::English, "Hello".to_string());
        asset.container.dialogue_nodes.push(DialogueNodeRecord {
            node_id: NodeId::new(),
            position: [0.0, 0.0],
            speaker_name: String::new(),
            portrait: None,
            portrait_side: PortraitSide::Left,
            text,
            audio: LanguageTable::new(),
            ports: vec![PortRecord {
                port_id: PortId::new(),
                port_guid: PortId::new(),
                text_field_id: PortId::new(),
                output_guid: None,
                labels: LanguageTable::new(),
            }],
        });
        asset.dirty = false;
        asset
    }

    #[test]
    fn test_update_is_idempotent() {
        let languages = [LanguageTag::English, LanguageTag::German];
        let mut assets = vec![asset_with_english_only()];

        assert_eq!(update_languages(&mut assets, &languages), 1);
        assert!(assets[0].dirty);
        let once = assets[0].container.clone();

        assets[0].dirty = false;
        assert_eq!(update_languages(&mut assets, &languages), 0);
        assert!(!assets[0].dirty);
        assert_eq!(assets[0].container, once);

        let node = &assets[0].container.dialogue_nodes[0];
        let tags: Vec<LanguageTag> = node.text.iter().map(|entry| entry.language).collect();
        assert_eq!(tags, languages.to_vec());
        assert_eq!(node.text.get(LanguageTag::English).unwrap(), "Hello");
        assert_eq!(node.text.get(LanguageTag::German).unwrap(), "");
        assert!(node.audio.is_complete(&languages));
        assert!(node.ports[0].labels.is_complete(&languages));
    }
}
