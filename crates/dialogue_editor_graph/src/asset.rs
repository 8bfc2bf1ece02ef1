// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue assets stored on disk as RON.

use crate::graph::DialogueGraph;
use crate::language::LanguageTag;
use crate::record::DialogueContainer;
use crate::sync;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current dialogue asset format version
pub const DIALOGUE_FORMAT_VERSION: u32 = 1;

/// File suffix for dialogue assets
pub const DIALOGUE_FILE_SUFFIX: &str = ".dialogue.ron";

/// Errors reading or writing a dialogue asset
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Reading or writing the file failed
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid dialogue RON
    #[error("Failed to parse {}: {message}", path.display())]
    Parse {
        /// Offending file
        path: PathBuf,
        /// Parser message
        message: String,
    },
    /// The container could not be encoded
    #[error("Failed to serialize dialogue '{name}': {message}")]
    Serialize {
        /// Container name
        name: String,
        /// Serializer message
        message: String,
    },
    /// The file was written by a newer build
    #[error("{} has format version {found}, newer than supported version {supported}", path.display())]
    UnsupportedVersion {
        /// Offending file
        path: PathBuf,
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredDialogue {
    #[serde(default)]
    format_version: u32,
    #[serde(default)]
    container: DialogueContainer,
}

/// A dialogue container bound to the file it was read from
#[derive(Debug, Clone)]
pub struct DialogueAsset {
    /// Backing file
    pub path: PathBuf,
    /// Persisted dialogue data
    pub container: DialogueContainer,
    /// Modified since the last save
    pub dirty: bool,
}

impl DialogueAsset {
    /// Create an unsaved asset at `path`
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            container: DialogueContainer::new(name),
            dirty: true,
        }
    }

    /// Whether a path names a dialogue asset
    pub fn is_dialogue_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(DIALOGUE_FILE_SUFFIX) && name.len() > DIALOGUE_FILE_SUFFIX.len())
    }

    /// Asset name derived from the file name
    pub fn name_from_path(path: &Path) -> String {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.strip_suffix(DIALOGUE_FILE_SUFFIX).unwrap_or(name).to_string())
            .unwrap_or_default()
    }

    /// Read an asset from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stored: StoredDialogue = ron::from_str(&content).map_err(|e| AssetError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if stored.format_version > DIALOGUE_FORMAT_VERSION {
            return Err(AssetError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: stored.format_version,
                supported: DIALOGUE_FORMAT_VERSION,
            });
        }

        let mut container = stored.container;
        if container.name.is_empty() {
            container.name = Self::name_from_path(path);
        }
        tracing::debug!("Read dialogue '{}' from {}", container.name, path.display());

        Ok(Self {
            path: path.to_path_buf(),
            container,
            dirty: false,
        })
    }

    /// Write the asset to its path and clear the dirty flag
    pub fn save(&mut self) -> Result<(), AssetError> {
        let config = ron::ser::PrettyConfig::default().enumerate_arrays(false);

        let stored = StoredDialogue {
            format_version: DIALOGUE_FORMAT_VERSION,
            container: self.container.clone(),
        };
        let content = ron::ser::to_string_pretty(&stored, config).map_err(|e| AssetError::Serialize {
            name: self.container.name.clone(),
            message: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| AssetError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, content).map_err(|source| AssetError::Io {
            path: self.path.clone(),
            source,
        })?;

        self.dirty = false;
        tracing::info!("Saved dialogue '{}' to {}", self.container.name, self.path.display());
        Ok(())
    }

    /// Save only if modified
    pub fn save_if_dirty(&mut self) -> Result<bool, AssetError> {
        if !self.dirty {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Synchronize the live graph into the container and persist it
    pub fn save_graph(&mut self, graph: &DialogueGraph) -> Result<(), AssetError> {
        sync::save(graph, &mut self.container);
        self.dirty = true;
        self.save()
    }

    /// Build a live graph from the container
    pub fn to_graph(&self, languages: &[LanguageTag]) -> (DialogueGraph, sync::LoadReport) {
        let mut graph = DialogueGraph::new(self.container.name.clone(), languages);
        let report = sync::load(&self.container, &mut graph);
        (graph, report)
    }

    /// Reconcile every language table to `tags`, marking the asset dirty on change
    pub fn ensure_languages(&mut self, tags: &[LanguageTag]) -> bool {
        let before = self.container.clone();
        self.container.ensure_languages(tags);
        let changed = before != self.container;
        if changed {
            self.dirty = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DialogueNodeRecord, LinkRecord, StartNodeRecord};
    use crate::node::NodeId;
    use pretty_assertions::assert_eq;

    fn sample_graph() -> DialogueGraph {
        let mut graph = DialogueGraph::new("intro", &LanguageTag::ALL);
        let start = graph.create_start_node([0.0, 0.0]);
        let line = graph.create_dialogue_node([200.0, 0.0]);
        let end = graph.create_end_node([400.0, 0.0]);
        let choice = graph.add_choice_port(line, None).unwrap();
        let start_out = graph.node(start).unwrap().output(0).unwrap().id;
        let line_in = graph.node(line).unwrap().input(0).unwrap().id;
        let end_in = graph.node(end).unwrap().input(0).unwrap().id;
        graph.connect(start, start_out, line, line_in).unwrap();
        graph.connect(line, choice, end, end_in).unwrap();
        graph
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialogues").join("intro.dialogue.ron");

        let mut asset = DialogueAsset::new(&path, "intro");
        asset.save_graph(&sample_graph()).unwrap();
        assert!(!asset.dirty);
        assert!(path.exists());

        let loaded = DialogueAsset::load(&path).unwrap();
        assert_eq!(loaded.container, asset.container);
        assert!(!loaded.dirty);
    }

    #[test]
    fn test_rejects_newer_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.dialogue.ron");
        std::fs::write(&path, "(format_version: 99, container: (name: \"future\"))").unwrap();

        let err = DialogueAsset::load(&path).unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn test_missing_fields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.dialogue.ron");
        std::fs::write(&path, "(container: (start_nodes: []))").unwrap();

        let asset = DialogueAsset::load(&path).unwrap();
        assert_eq!(asset.container.name, "old");
        assert_eq!(asset.container.node_count(), 0);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.dialogue.ron");
        std::fs::write(&path, "(container: [").unwrap();

        let err = DialogueAsset::load(&path).unwrap_err();
        assert!(matches!(err, AssetError::Parse { .. }));
        assert!(err.to_string().contains("broken.dialogue.ron"));
    }

    #[test]
    fn test_dialogue_file_names() {
        assert!(DialogueAsset::is_dialogue_file(Path::new("a/intro.dialogue.ron")));
        assert!(!DialogueAsset::is_dialogue_file(Path::new("a/intro.ron")));
        assert!(!DialogueAsset::is_dialogue_file(Path::new(".dialogue.ron")));
        assert_eq!(DialogueAsset::name_from_path(Path::new("x/guard.dialogue.ron")), "guard");
    }

    #[test]
    fn test_ensure_languages_marks_dirty_once() {
        let mut asset = DialogueAsset::new("unused.dialogue.ron", "intro");
        asset.container.start_nodes.push(StartNodeRecord {
            node_id: NodeId::new(),
            position: [0.0, 0.0],
        });
        let line = NodeId::new();
        asset.container.dialogue_nodes.push(DialogueNodeRecord {
            node_id: line,
            position: [0.0, 0.0],
            speaker_name: String::new(),
            portrait: None,
            portrait_side: Default::default(),
            text: Default::default(),
            audio: Default::default(),
            ports: Vec::new(),
        });
        asset.container.links.push(LinkRecord {
            source: asset.container.start_nodes[0].node_id,
            target: line,
        });
        asset.dirty = false;

        assert!(asset.ensure_languages(&LanguageTag::ALL));
        assert!(asset.dirty);
        asset.dirty = false;
        assert!(!asset.ensure_languages(&LanguageTag::ALL));
        assert!(!asset.dirty);
    }

    #[test]
    fn test_to_graph_rebuilds_nodes() {
        let mut asset = DialogueAsset::new("unused.dialogue.ron", "intro");
        sync::save(&sample_graph(), &mut asset.container);
        let (graph, report) = asset.to_graph(&LanguageTag::ALL);
        assert!(report.is_complete());
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.connection_count(), 2);
    }
}
