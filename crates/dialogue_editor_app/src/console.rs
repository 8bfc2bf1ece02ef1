// SPDX-License-Identifier: MIT OR Apache-2.0
//! Text-mode dialogue playback.

use dialogue_editor_graph::{AudioRef, DialogueContainer, EventRef, ImageRef, PortraitSide};
use dialogue_editor_runtime::{
    DialogueContext, DialogueTalk, DialogueView, FontRef, TalkError, TalkState,
};
use std::io::{BufRead, Write};

/// Renders dialogue as lines of text
#[derive(Debug, Default)]
pub struct ConsoleView {
    pending: Vec<String>,
    visible: bool,
}

impl ConsoleView {
    /// Lines rendered since the last call
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }
}

impl DialogueView for ConsoleView {
    fn show_ui(&mut self, visible: bool) {
        if self.visible != visible {
            self.pending.push(if visible { "--- dialogue ---" } else { "--- end ---" }.to_string());
        }
        self.visible = visible;
    }

    fn set_text(&mut self, speaker: &str, text: &str, _font: Option<&FontRef>) {
        if speaker.is_empty() {
            self.pending.push(text.to_string());
        } else {
            self.pending.push(format!("{speaker}: {text}"));
        }
    }

    fn set_portrait(&mut self, portrait: Option<&ImageRef>, side: PortraitSide) {
        if let Some(portrait) = portrait {
            tracing::debug!("Portrait {portrait} on the {side:?}");
        }
    }

    fn set_choices(&mut self, labels: &[String], _font: Option<&FontRef>) {
        for (i, label) in labels.iter().enumerate() {
            self.pending.push(format!("  [{}] {label}", i + 1));
        }
    }

    fn play_audio(&mut self, clip: &AudioRef) {
        tracing::debug!("Playing {clip}");
    }

    fn stop_audio(&mut self) {
        tracing::debug!("Audio stopped");
    }
}

/// Play a container, reading choice numbers from `input` until the dialogue
/// ends or `q` is entered
pub fn play<R: BufRead, W: Write>(
    container: DialogueContainer,
    ctx: &mut DialogueContext,
    mut input: R,
    mut output: W,
) -> Result<TalkState, PlayError> {
    for event in container.event_nodes.iter().filter_map(|node| node.event.as_ref()) {
        if ctx.events.handler_count(event) == 0 {
            ctx.events.subscribe(event, Box::new(|e: &EventRef| tracing::info!("Event '{e}' fired")));
        }
    }

    let mut talk = DialogueTalk::with_container(container, ConsoleView::default());
    talk.start_dialogue(ctx)?;
    flush(&mut talk, &mut output)?;

    let mut line = String::new();
    while talk.state() == TalkState::AwaitingChoice {
        write!(output, "> ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            break;
        }
        let choice = match answer.parse::<usize>() {
            Ok(n) if (1..=talk.choice_count()).contains(&n) => n - 1,
            _ => {
                writeln!(output, "Enter 1-{} or q", talk.choice_count())?;
                continue;
            }
        };

        if let Err(e) = talk.choose(choice, ctx) {
            tracing::warn!("{e}");
            writeln!(output, "That choice leads nowhere.")?;
        }
        flush(&mut talk, &mut output)?;
    }

    Ok(talk.state())
}

fn flush<W: Write>(talk: &mut DialogueTalk<ConsoleView>, output: &mut W) -> std::io::Result<()> {
    for line in talk.view_mut().take_output() {
        writeln!(output, "{line}")?;
    }
    Ok(())
}

/// Errors ending console playback
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    /// The dialogue could not be played
    #[error(transparent)]
    Talk(#[from] TalkError),
    /// Console input or output failed
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_editor_graph::{
        DialogueNodeRecord, EndKind, EndNodeRecord, LanguageTable, LanguageTag, LinkRecord, NodeId,
        PortId, PortRecord, StartNodeRecord,
    };
    use dialogue_editor_runtime::LanguageContext;

    fn container() -> DialogueContainer {
        let mut container = DialogueContainer::new("console");
        let start = StartNodeRecord {
            node_id: NodeId::new(),
            position: [0.0, 0.0],
        };
        let end = EndNodeRecord {
            node_id: NodeId::new(),
            position: [0.0, 0.0],
            end_kind: EndKind::End,
        };
        let mut text = LanguageTable::complete(&LanguageTag::ALL);
        text.set(LanguageTag::English, "Ready?".to_string());
        let line = DialogueNodeRecord {
            node_id: NodeId::new(),
            position: [0.0, 0.0],
            speaker_name: "Guide".to_string(),
            portrait: None,
            portrait_side: PortraitSide::Left,
            text,
            audio: LanguageTable::complete(&LanguageTag::ALL),
            ports: vec![PortRecord {
                port_id: PortId::new(),
                port_guid: PortId::new(),
                text_field_id: PortId::new(),
                output_guid: Some(end.node_id),
                labels: LanguageTable::filled(&LanguageTag::ALL, "Go".to_string()),
            }],
        };
        container.links.push(LinkRecord {
            source: start.node_id,
            target: line.node_id,
        });
        container.links.push(LinkRecord {
            source: line.node_id,
            target: end.node_id,
        });
        container.start_nodes.push(start);
        container.dialogue_nodes.push(line);
        container.end_nodes.push(end);
        container
    }

    #[test]
    fn test_plays_to_the_end() {
        let mut ctx = DialogueContext::new(LanguageContext::new(LanguageTag::English));
        let mut out = Vec::new();
        let state = play(container(), &mut ctx, "7\n1\n".as_bytes(), &mut out).unwrap();

        assert_eq!(state, TalkState::Terminated);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Guide: Ready?"));
        assert!(text.contains("  [1] Go"));
        assert!(text.contains("Enter 1-1 or q"));
        assert!(text.contains("--- end ---"));
    }

    #[test]
    fn test_quit_leaves_dialogue_open() {
        let mut ctx = DialogueContext::new(LanguageContext::new(LanguageTag::English));
        let state = play(container(), &mut ctx, "q\n".as_bytes(), Vec::new()).unwrap();
        assert_eq!(state, TalkState::AwaitingChoice);
    }
}
