// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bulk localization through CSV sheets.
//!
//! Export writes one row per dialogue node and choice with a column per
//! language. Import reads a sheet back and overwrites the matching strings.

pub mod export;
pub mod import;
pub mod parser;

use dialogue_editor_graph::{DialogueAsset, LanguageTag};
pub use import::ImportReport;
use std::path::{Path, PathBuf};

/// First header cell of every sheet
pub const GUID_HEADER: &str = "Guid ID";

/// Errors reading or writing a sheet
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    /// The sheet could not be read or written
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// Sheet path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Export every asset to `path`, returning the number of data rows
pub fn export_to_file(assets: &[DialogueAsset], path: &Path) -> Result<usize, CsvError> {
    let csv = export::export(assets.iter().map(|asset| &asset.container));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CsvError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, &csv).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rows: usize = assets
        .iter()
        .flat_map(|asset| &asset.container.dialogue_nodes)
        .map(|node| 1 + node.ports.len())
        .sum();
    tracing::info!("Exported {rows} rows to {}", path.display());
    Ok(rows)
}

/// Import the sheet at `path` into the assets, writing only `languages`
pub fn import_from_file(
    path: &Path,
    assets: &mut [DialogueAsset],
    languages: &[LanguageTag],
) -> Result<ImportReport, CsvError> {
    let content = std::fs::read_to_string(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    Ok(import::import(&parser::parse(content), assets, languages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_editor_graph::{DialogueNodeRecord, LanguageTable, NodeId, PortraitSide};

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csv").join("DialogueCSV_Save.csv");

        let mut asset = DialogueAsset::new(dir.path().join("a.dialogue.ron"), "a");
        let node_id = NodeId::new();
        asset.container.dialogue_nodes.push(DialogueNodeRecord {
            node_id,
            position: [0.0, 0.0],
            speaker_name: String::new(),
            portrait: None,
            portrait_side: PortraitSide::Left,
            text: LanguageTable::filled(&LanguageTag::ALL, "multi\nline, \"quoted\"".to_string()),
            audio: LanguageTable::complete(&LanguageTag::ALL),
            ports: Vec::new(),
        });
        asset.dirty = false;
        let mut assets = vec![asset];

        assert_eq!(export_to_file(&assets, &path).unwrap(), 1);
        let edited = std::fs::read_to_string(&path).unwrap().replace("multi", "MULTI");
        std::fs::write(&path, format!("\u{feff}{edited}")).unwrap();

        let report = import_from_file(&path, &mut assets, &LanguageTag::ALL).unwrap();
        assert_eq!(report.applied, 1);
        assert!(assets[0].dirty);
        assert_eq!(
            assets[0].container.dialogue_nodes[0].text.get(LanguageTag::Danish).unwrap(),
            "MULTI\nline, \"quoted\""
        );
    }
}
