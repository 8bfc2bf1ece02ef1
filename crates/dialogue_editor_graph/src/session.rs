// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session over one dialogue asset.

use crate::asset::{AssetError, DialogueAsset};
use crate::graph::DialogueGraph;
use crate::language::LanguageTag;
use crate::sync::{self, LoadReport};
use std::path::Path;

/// An open dialogue asset together with its live graph
#[derive(Debug)]
pub struct DialogueEditor {
    asset: DialogueAsset,
    graph: DialogueGraph,
    languages: Vec<LanguageTag>,
    editing_language: LanguageTag,
}

impl DialogueEditor {
    /// Open an asset and build its graph
    pub fn open(path: impl AsRef<Path>, languages: &[LanguageTag]) -> Result<(Self, LoadReport), AssetError> {
        let asset = DialogueAsset::load(path)?;
        Ok(Self::from_asset(asset, languages))
    }

    /// Start a session over an asset already in memory
    pub fn from_asset(asset: DialogueAsset, languages: &[LanguageTag]) -> (Self, LoadReport) {
        let (graph, report) = asset.to_graph(languages);
        let editing_language = languages.first().copied().unwrap_or_default();
        tracing::info!(
            "Opened dialogue '{}' ({} nodes)",
            asset.container.name,
            graph.node_count()
        );
        let editor = Self {
            asset,
            graph,
            languages: languages.to_vec(),
            editing_language,
        };
        (editor, report)
    }

    /// The asset being edited
    pub fn asset(&self) -> &DialogueAsset {
        &self.asset
    }

    /// The live graph
    pub fn graph(&self) -> &DialogueGraph {
        &self.graph
    }

    /// The live graph, for editing
    pub fn graph_mut(&mut self) -> &mut DialogueGraph {
        &mut self.graph
    }

    /// Language the editing surface shows
    pub fn editing_language(&self) -> LanguageTag {
        self.editing_language
    }

    /// Switch the language the editing surface shows.
    ///
    /// Tags outside the session's language set are ignored.
    pub fn set_language(&mut self, language: LanguageTag) -> bool {
        if !self.languages.contains(&language) {
            tracing::warn!("Language {language} is not enabled for this session");
            return false;
        }
        self.editing_language = language;
        true
    }

    /// Synchronize the graph into the asset and write it
    pub fn save(&mut self) -> Result<(), AssetError> {
        self.asset.save_graph(&self.graph)
    }

    /// Discard graph edits and rebuild from the file on disk
    pub fn reload(&mut self) -> Result<LoadReport, AssetError> {
        self.asset = DialogueAsset::load(&self.asset.path)?;
        self.graph = DialogueGraph::new(self.asset.container.name.clone(), &self.languages);
        Ok(sync::load(&self.asset.container, &mut self.graph))
    }
}
