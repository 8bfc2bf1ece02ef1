// SPDX-License-Identifier: MIT OR Apache-2.0
//! Presentation seam between the interpreter and whatever shows the dialogue.

use crate::language::FontRef;
use dialogue_editor_graph::{AudioRef, ImageRef, PortraitSide};

/// Receives everything the interpreter wants shown or played
pub trait DialogueView {
    /// Open or close the dialogue UI
    fn show_ui(&mut self, visible: bool);

    /// Show the speaker and body text
    fn set_text(&mut self, speaker: &str, text: &str, font: Option<&FontRef>);

    /// Show a portrait on one side, or hide both when `None`
    fn set_portrait(&mut self, portrait: Option<&ImageRef>, side: PortraitSide);

    /// Replace the visible choices. Index `i` is what `choose(i)` selects.
    fn set_choices(&mut self, labels: &[String], font: Option<&FontRef>);

    /// Start a voice clip
    fn play_audio(&mut self, clip: &AudioRef);

    /// Stop any playing voice clip
    fn stop_audio(&mut self);
}
