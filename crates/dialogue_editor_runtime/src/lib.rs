// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue playback for the dialogue editor.
//!
//! [`DialogueTalk`] walks a [`DialogueContainer`](dialogue_editor_graph::DialogueContainer)
//! and drives a [`DialogueView`]. The active language and the event handlers
//! live in a [`DialogueContext`] the host passes into every call.

pub mod view;
pub mod language;
pub mod events;
pub mod talk;
pub mod zone;

pub use view::DialogueView;
pub use language::{FontRef, LanguageContext, LanguageFont};
pub use events::{EventBus, EventHandler, HandlerId};
pub use talk::{DialogueContext, DialogueTalk, TalkError, TalkState, NO_TEXT_PLACEHOLDER, UNKNOWN_CHOICE_LABEL};
pub use zone::{TalkZone, DEFAULT_TALK_KEY, PLAYER_TAG};
