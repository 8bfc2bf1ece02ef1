// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue graph model for the dialogue editor.
//!
//! This crate holds everything the editor and runtime share:
//! - Language tables for localized text, audio and choice labels
//! - The persisted [`DialogueContainer`] read by the runtime
//! - The live [`DialogueGraph`] edited by the user
//! - The synchronizer converting between the two
//!
//! ## Architecture
//!
//! The live graph is an arena of nodes and connections keyed by id. Saving
//! flattens it into per-kind records plus links; loading rebuilds the arena
//! and restores choice ports by their persisted identity. Assets wrap a
//! container with the file it lives in.

pub mod language;
pub mod port;
pub mod node;
pub mod connection;
pub mod record;
pub mod graph;
pub mod sync;
pub mod asset;
pub mod session;

pub use language::{LanguageEntry, LanguageError, LanguageTable, LanguageTag};
pub use port::{Port, PortCapacity, PortDirection, PortId};
pub use node::{DialogueContent, Node, NodeId, NodeKind};
pub use connection::{Connection, ConnectionId};
pub use record::{
    AudioRef, DialogueContainer, DialogueNodeRecord, EndKind, EndNodeRecord, EventNodeRecord,
    EventRef, ImageRef, LinkRecord, NodeRecordRef, PortRecord, PortraitSide, StartNodeRecord,
    ValidationIssue,
};
pub use graph::{ConnectionError, DialogueGraph, DEFAULT_CHOICE_LABEL};
pub use sync::LoadReport;
pub use asset::{AssetError, DialogueAsset, DIALOGUE_FILE_SUFFIX, DIALOGUE_FORMAT_VERSION};
pub use session::DialogueEditor;
