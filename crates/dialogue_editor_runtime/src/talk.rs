// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue interpreter.
//!
//! Playback is a small state machine over the container's records. Start,
//! event and non-terminal end nodes are stepped through immediately; a
//! dialogue node stops the walk and waits for [`DialogueTalk::choose`].
//! Every step is resolved before anything is shown, so a failed step leaves
//! the talk exactly as it was.

use crate::events::EventBus;
use crate::language::LanguageContext;
use crate::view::DialogueView;
use dialogue_editor_graph::{
    DialogueContainer, DialogueNodeRecord, EndKind, EventRef, NodeId, NodeRecordRef, PortId,
};

/// Text shown when a dialogue node has no entry for the active language
pub const NO_TEXT_PLACEHOLDER: &str = "No text found";

/// Label shown when a choice has no entry for the active language
pub const UNKNOWN_CHOICE_LABEL: &str = "Unknown";

/// State shared by every talk in a scene
#[derive(Debug, Default)]
pub struct DialogueContext {
    /// Active language and fonts
    pub language: LanguageContext,
    /// Handlers for event nodes
    pub events: EventBus,
}

impl DialogueContext {
    /// Create a context with the given language state and no handlers
    pub fn new(language: LanguageContext) -> Self {
        Self {
            language,
            events: EventBus::new(),
        }
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TalkState {
    /// No dialogue has been started
    #[default]
    NotStarted,
    /// A dialogue node is shown and a choice is expected
    AwaitingChoice,
    /// An end node closed the dialogue
    Terminated,
}

/// Errors raised while playing a dialogue
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TalkError {
    /// No container is assigned
    #[error("No dialogue container assigned")]
    NoContainer,
    /// The container has no start node
    #[error("Dialogue has no start node")]
    NoStartNode,
    /// The container has more than one start node
    #[error("Dialogue has {0} start nodes; exactly one is required")]
    AmbiguousStartNode(usize),
    /// A pass-through node has no outgoing link
    #[error("Node {0} has no outgoing link")]
    MissingLink(NodeId),
    /// A link points at a node that does not exist
    #[error("Node {0} does not exist")]
    MissingNode(NodeId),
    /// A repeat was reached before any dialogue node was shown
    #[error("Nothing to repeat: no dialogue node shown yet")]
    NoCurrentNode,
    /// A go-back was reached with no earlier dialogue node
    #[error("Cannot go back: no previous dialogue node")]
    NoPreviousNode,
    /// A choice was made while no dialogue node was waiting for one
    #[error("No choice is pending")]
    NotAwaitingChoice,
    /// The choice index is not on screen
    #[error("Choice {index} out of range ({count} choices)")]
    ChoiceOutOfRange {
        /// Requested index
        index: usize,
        /// Number of choices shown
        count: usize,
    },
    /// The chosen port leads nowhere
    #[error("Choice {port} has no target node")]
    DeadChoice {
        /// Port of the chosen choice
        port: PortId,
        /// Target it was bound to, if any
        target: Option<NodeId>,
    },
    /// Pass-through nodes form a cycle with no dialogue node in it
    #[error("Playback looped through pass-through nodes starting at {0}")]
    TransparentLoop(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChoiceBinding {
    port: PortId,
    target: Option<NodeId>,
}

/// Where a walk over pass-through nodes stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landing {
    Dialogue(NodeId),
    Closed,
}

#[derive(Debug)]
struct Walk {
    events: Vec<EventRef>,
    landing: Landing,
}

/// Plays one dialogue container through a view
#[derive(Debug)]
pub struct DialogueTalk<V: DialogueView> {
    container: Option<DialogueContainer>,
    view: V,
    current: Option<NodeId>,
    previous: Option<NodeId>,
    choices: Vec<ChoiceBinding>,
    state: TalkState,
    ui_open: bool,
}

impl<V: DialogueView> DialogueTalk<V> {
    /// Create a talk with no container assigned
    pub fn new(view: V) -> Self {
        Self {
            container: None,
            view,
            current: None,
            previous: None,
            choices: Vec::new(),
            state: TalkState::NotStarted,
            ui_open: false,
        }
    }

    /// Create a talk over a container
    pub fn with_container(container: DialogueContainer, view: V) -> Self {
        let mut talk = Self::new(view);
        talk.container = Some(container);
        talk
    }

    /// Replace the container. Playback state is reset and an open UI is
    /// closed.
    pub fn set_container(&mut self, container: Option<DialogueContainer>) {
        self.container = container;
        self.reset();
        if self.ui_open {
            self.view.stop_audio();
            self.view.show_ui(false);
            self.ui_open = false;
        }
    }

    /// The assigned container
    pub fn container(&self) -> Option<&DialogueContainer> {
        self.container.as_ref()
    }

    /// The view
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The view, mutably
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Current playback state
    pub fn state(&self) -> TalkState {
        self.state
    }

    /// Dialogue node currently shown
    pub fn current_node(&self) -> Option<NodeId> {
        self.current
    }

    /// Dialogue node shown before the current one
    pub fn previous_node(&self) -> Option<NodeId> {
        self.previous
    }

    /// Number of choices on screen
    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    /// Whether the dialogue UI is open
    pub fn is_dialogue_open(&self) -> bool {
        self.ui_open
    }

    fn reset(&mut self) {
        self.current = None;
        self.previous = None;
        self.choices.clear();
        self.state = TalkState::NotStarted;
    }

    /// Begin playback from the start node and open the UI
    pub fn start_dialogue(&mut self, ctx: &mut DialogueContext) -> Result<(), TalkError> {
        let steps = self
            .plan_start()
            .inspect_err(|e| tracing::error!("Cannot start dialogue: {e}"))?;

        if let Some(container) = &self.container {
            tracing::info!("Starting dialogue '{}'", container.name);
        }
        self.reset();
        self.view.show_ui(true);
        self.ui_open = true;
        self.apply(steps, ctx);
        Ok(())
    }

    /// Activate a choice of the dialogue node on screen
    pub fn choose(&mut self, index: usize, ctx: &mut DialogueContext) -> Result<(), TalkError> {
        if self.state != TalkState::AwaitingChoice {
            return Err(TalkError::NotAwaitingChoice);
        }
        let container = self.container.as_ref().ok_or(TalkError::NoContainer)?;
        let binding = *self.choices.get(index).ok_or(TalkError::ChoiceOutOfRange {
            index,
            count: self.choices.len(),
        })?;

        self.view.stop_audio();

        let dead = TalkError::DeadChoice {
            port: binding.port,
            target: binding.target,
        };
        let target = match binding.target {
            Some(target) if container.node(target).is_some() => target,
            _ => {
                tracing::error!("{dead}");
                return Err(dead);
            }
        };

        let steps = walk(container, target, self.current, self.previous)
            .inspect_err(|e| tracing::error!("Cannot follow choice {index}: {e}"))?;
        self.apply(steps, ctx);
        Ok(())
    }

    fn plan_start(&self) -> Result<Walk, TalkError> {
        let container = self.container.as_ref().ok_or(TalkError::NoContainer)?;
        let start = single_start(container)?;
        walk(container, start, None, None)
    }

    fn apply(&mut self, steps: Walk, ctx: &mut DialogueContext) {
        for event in &steps.events {
            ctx.events.emit(event);
        }

        match steps.landing {
            Landing::Dialogue(node_id) => {
                if self.current != Some(node_id) {
                    self.previous = self.current;
                    self.current = Some(node_id);
                }
                let Some(record) = self
                    .container
                    .as_ref()
                    .and_then(|container| container.dialogue_node(node_id))
                else {
                    return;
                };
                self.choices = show_dialogue(&mut self.view, record, &ctx.language);
                self.state = TalkState::AwaitingChoice;
            }
            Landing::Closed => {
                self.view.show_ui(false);
                self.ui_open = false;
                self.choices.clear();
                self.state = TalkState::Terminated;
                tracing::info!("Dialogue ended");
            }
        }
    }
}

fn single_start(container: &DialogueContainer) -> Result<NodeId, TalkError> {
    match container.start_nodes.as_slice() {
        [] => Err(TalkError::NoStartNode),
        [start] => Ok(start.node_id),
        many => Err(TalkError::AmbiguousStartNode(many.len())),
    }
}

fn follow_link(container: &DialogueContainer, node_id: NodeId) -> Result<NodeId, TalkError> {
    container
        .link_from(node_id)
        .map(|link| link.target)
        .ok_or(TalkError::MissingLink(node_id))
}

/// Step through pass-through nodes from `from` until a dialogue node or a
/// closing end node is reached.
fn walk(
    container: &DialogueContainer,
    from: NodeId,
    current: Option<NodeId>,
    previous: Option<NodeId>,
) -> Result<Walk, TalkError> {
    let mut events = Vec::new();
    let mut node_id = from;

    // Any walk longer than the node count revisits a node without stopping.
    for _ in 0..=container.node_count() {
        let record = container.node(node_id).ok_or(TalkError::MissingNode(node_id))?;
        tracing::debug!("Visiting {} node {node_id}", record.kind_name());

        node_id = match record {
            NodeRecordRef::Start(start) => follow_link(container, start.node_id)?,
            NodeRecordRef::Dialogue(dialogue) => {
                return Ok(Walk {
                    events,
                    landing: Landing::Dialogue(dialogue.node_id),
                });
            }
            NodeRecordRef::Event(event) => {
                match &event.event {
                    Some(bound) => events.push(bound.clone()),
                    None => tracing::debug!("Event node {} has no event bound", event.node_id),
                }
                follow_link(container, event.node_id)?
            }
            NodeRecordRef::End(end) => match end.end_kind {
                EndKind::End => {
                    return Ok(Walk {
                        events,
                        landing: Landing::Closed,
                    });
                }
                EndKind::Repeat => current.ok_or(TalkError::NoCurrentNode)?,
                EndKind::GoBack => previous.ok_or(TalkError::NoPreviousNode)?,
                EndKind::ReturnToStart => follow_link(container, single_start(container)?)?,
            },
        };
    }

    Err(TalkError::TransparentLoop(from))
}

fn show_dialogue<V: DialogueView>(
    view: &mut V,
    record: &DialogueNodeRecord,
    language: &LanguageContext,
) -> Vec<ChoiceBinding> {
    let tag = language.language();
    let font = language.active_font();

    let text = record.text.get(tag).map_or(NO_TEXT_PLACEHOLDER, String::as_str);
    view.set_text(&record.speaker_name, text, font);
    view.set_portrait(record.portrait.as_ref(), record.portrait_side);

    let labels: Vec<String> = record
        .ports
        .iter()
        .map(|port| {
            port.labels
                .get(tag)
                .map_or_else(|_| UNKNOWN_CHOICE_LABEL.to_string(), Clone::clone)
        })
        .collect();
    view.set_choices(&labels, font);

    if let Some(clip) = record.audio.get(tag).ok().and_then(Option::as_ref) {
        view.play_audio(clip);
    }

    record
        .ports
        .iter()
        .map(|port| ChoiceBinding {
            port: port.port_id,
            target: port.output_guid,
        })
        .collect()
}
