// SPDX-License-Identifier: MIT OR Apache-2.0
//! Discovery of dialogue assets on disk.

use dialogue_editor_graph::{AssetError, DialogueAsset};
use std::path::Path;

/// Load every `*.dialogue.ron` below `root`, sorted by path.
///
/// Files that fail to load are logged and skipped.
pub fn discover_containers(root: &Path) -> Vec<DialogueAsset> {
    if !root.is_dir() {
        tracing::warn!("Dialogue directory {} does not exist", root.display());
        return Vec::new();
    }

    let mut paths: Vec<_> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e: Result<walkdir::DirEntry, walkdir::Error>| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && DialogueAsset::is_dialogue_file(e.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();
    paths.sort();

    let assets: Vec<DialogueAsset> = paths
        .iter()
        .filter_map(|path| match DialogueAsset::load(path) {
            Ok(asset) => Some(asset),
            Err(e) => {
                tracing::warn!("Skipping dialogue: {e}");
                None
            }
        })
        .collect();

    tracing::info!("Found {} dialogues in {}", assets.len(), root.display());
    assets
}

/// Write every modified asset, returning how many were written
pub fn save_dirty(assets: &mut [DialogueAsset]) -> Result<usize, AssetError> {
    let mut saved = 0;
    for asset in assets.iter_mut() {
        if asset.save_if_dirty()? {
            saved += 1;
        }
    }
    Ok(saved)
}

/// Find an asset by container name or file name
pub fn find_by_name<'a>(assets: &'a mut [DialogueAsset], name: &str) -> Option<&'a mut DialogueAsset> {
    assets.iter_mut().find(|asset| {
        asset.container.name == name || DialogueAsset::name_from_path(&asset.path) == name
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovers_nested_and_skips_broken() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("town").join("inn");
        std::fs::create_dir_all(&nested).unwrap();

        DialogueAsset::new(dir.path().join("guard.dialogue.ron"), "guard").save().unwrap();
        DialogueAsset::new(nested.join("barkeep.dialogue.ron"), "barkeep").save().unwrap();
        std::fs::write(nested.join("broken.dialogue.ron"), "not ron (").unwrap();
        std::fs::write(nested.join("notes.txt"), "ignore me").unwrap();

        let mut assets = discover_containers(dir.path());
        let names: Vec<&str> = assets.iter().map(|a| a.container.name.as_str()).collect();
        assert_eq!(names, vec!["guard", "barkeep"]);
        assert!(find_by_name(&mut assets, "barkeep").is_some());
        assert!(find_by_name(&mut assets, "broken").is_none());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_containers(&dir.path().join("absent")).is_empty());
    }

    #[test]
    fn test_save_dirty_only_writes_modified() {
        let dir = tempfile::tempdir().unwrap();
        let mut clean = DialogueAsset::new(dir.path().join("a.dialogue.ron"), "a");
        clean.save().unwrap();
        let dirty = DialogueAsset::new(dir.path().join("b.dialogue.ron"), "b");

        let mut assets = vec![clean, dirty];
        assert_eq!(save_dirty(&mut assets).unwrap(), 1);
        assert_eq!(save_dirty(&mut assets).unwrap(), 0);
    }
}
