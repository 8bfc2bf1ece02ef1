// SPDX-License-Identifier: MIT OR Apache-2.0
//! Proximity trigger that lets the player start a talk.

use crate::talk::{DialogueContext, DialogueTalk, TalkError};
use crate::view::DialogueView;

/// Tag identifying the player collider
pub const PLAYER_TAG: &str = "Player";

/// Default key that starts the talk
pub const DEFAULT_TALK_KEY: &str = "E";

/// Shows a talk indicator while the player is inside and starts the talk on
/// the talk key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkZone {
    talk_key: String,
    indicator_visible: bool,
}

impl Default for TalkZone {
    fn default() -> Self {
        Self::new(DEFAULT_TALK_KEY)
    }
}

impl TalkZone {
    /// Create a zone that reacts to `talk_key`
    pub fn new(talk_key: impl Into<String>) -> Self {
        Self {
            talk_key: talk_key.into(),
            indicator_visible: false,
        }
    }

    /// Key label shown on the indicator
    pub fn talk_key(&self) -> &str {
        &self.talk_key
    }

    /// Whether the indicator is shown
    pub fn indicator_visible(&self) -> bool {
        self.indicator_visible
    }

    /// Something entered the zone
    pub fn on_enter(&mut self, tag: &str) {
        if tag == PLAYER_TAG {
            self.indicator_visible = true;
        }
    }

    /// Something left the zone
    pub fn on_exit(&mut self, tag: &str) {
        if tag == PLAYER_TAG {
            self.indicator_visible = false;
        }
    }

    /// Handle a key press. Returns `Ok(true)` if the talk was started.
    pub fn on_key<V: DialogueView>(
        &self,
        key: &str,
        talk: &mut DialogueTalk<V>,
        ctx: &mut DialogueContext,
    ) -> Result<bool, TalkError> {
        if !self.indicator_visible || !key.eq_ignore_ascii_case(&self.talk_key) {
            return Ok(false);
        }
        talk.start_dialogue(ctx)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{FontRef, LanguageContext};
    use dialogue_editor_graph::{
        AudioRef, DialogueContainer, EndKind, EndNodeRecord, ImageRef, LinkRecord, NodeId,
        PortraitSide, StartNodeRecord,
    };

    #[derive(Debug, Default)]
    struct NullView {
        shown: usize,
    }

    impl DialogueView for NullView {
        fn show_ui(&mut self, visible: bool) {
            if visible {
                self.shown += 1;
            }
        }
        fn set_text(&mut self, _speaker: &str, _text: &str, _font: Option<&FontRef>) {}
        fn set_portrait(&mut self, _portrait: Option<&ImageRef>, _side: PortraitSide) {}
        fn set_choices(&mut self, _labels: &[String], _font: Option<&FontRef>) {}
        fn play_audio(&mut self, _clip: &AudioRef) {}
        fn stop_audio(&mut self) {}
    }

    fn talk() -> DialogueTalk<NullView> {
        let mut container = DialogueContainer::new("zone");
        let start = StartNodeRecord {
            node_id: NodeId::new(),
            position: [0.0, 0.0],
        };
        let end = EndNodeRecord {
            node_id: NodeId::new(),
            position: [0.0, 0.0],
            end_kind: EndKind::End,
        };
        container.links.push(LinkRecord {
            source: start.node_id,
            target: end.node_id,
        });
        container.start_nodes.push(start);
        container.end_nodes.push(end);
        DialogueTalk::with_container(container, NullView::default())
    }

    #[test]
    fn test_key_only_works_inside_zone() {
        let mut zone = TalkZone::default();
        let mut talk = talk();
        let mut ctx = DialogueContext::new(LanguageContext::default());

        assert!(!zone.on_key("e", &mut talk, &mut ctx).unwrap());
        zone.on_enter("Enemy");
        assert!(!zone.indicator_visible());

        zone.on_enter(PLAYER_TAG);
        assert!(zone.indicator_visible());
        assert!(!zone.on_key("Q", &mut talk, &mut ctx).unwrap());
        assert!(zone.on_key("e", &mut talk, &mut ctx).unwrap());
        assert_eq!(talk.view().shown, 1);

        zone.on_exit(PLAYER_TAG);
        assert!(!zone.on_key("E", &mut talk, &mut ctx).unwrap());
        assert_eq!(talk.view().shown, 1);
    }
}
