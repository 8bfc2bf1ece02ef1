// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion between the live [`DialogueGraph`] and a [`DialogueContainer`].
//!
//! Saving always succeeds: connection data is re-derived from the live edges,
//! so a choice without an edge is written as a dead end. Loading skips
//! whatever it cannot resolve and reports it instead of giving up.

use crate::graph::DialogueGraph;
use crate::node::{Node, NodeId, NodeKind};
use crate::port::PortId;
use crate::record::{
    DialogueContainer, DialogueNodeRecord, EndNodeRecord, EventNodeRecord, LinkRecord,
    StartNodeRecord,
};
use std::collections::HashSet;

/// What [`load`] could not rebuild
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Nodes created
    pub nodes: usize,
    /// Edges created
    pub connections: usize,
    /// Links whose target node does not exist
    pub missing_targets: usize,
    /// Links for which no free output port could be found
    pub missing_ports: usize,
    /// Choices skipped because their port id was already present
    pub duplicate_ports: usize,
}

impl LoadReport {
    /// Whether every record was rebuilt
    pub fn is_complete(&self) -> bool {
        self.missing_targets == 0 && self.missing_ports == 0 && self.duplicate_ports == 0
    }
}

/// Write the live graph into `container`, replacing its contents
pub fn save(graph: &DialogueGraph, container: &mut DialogueContainer) {
    container.clear();
    save_links(graph, container);
    save_nodes(graph, container);

    for issue in container.validate(graph.languages()) {
        tracing::warn!("Saved dialogue '{}': {issue}", container.name);
    }
    tracing::debug!(
        "Saved {} nodes and {} links into '{}'",
        container.node_count(),
        container.links.len(),
        container.name
    );
}

fn save_links(graph: &DialogueGraph, container: &mut DialogueContainer) {
    for connection in graph.connections() {
        if graph.node(connection.to_node).is_none() {
            continue;
        }
        container.links.push(LinkRecord {
            source: connection.from_node,
            target: connection.to_node,
        });
    }
}

fn save_nodes(graph: &DialogueGraph, container: &mut DialogueContainer) {
    for node in graph.nodes() {
        let node_id = node.id;
        let position = node.position;
        match &node.kind {
            NodeKind::Start => container.start_nodes.push(StartNodeRecord { node_id, position }),
            NodeKind::Dialogue(content) => {
                let mut ports = content.choices.clone();
                graph.resolve_choice_targets(node_id, &mut ports);
                container.dialogue_nodes.push(DialogueNodeRecord {
                    node_id,
                    position,
                    speaker_name: content.speaker_name.clone(),
                    portrait: content.portrait.clone(),
                    portrait_side: content.portrait_side,
                    text: content.text.clone(),
                    audio: content.audio.clone(),
                    ports,
                });
            }
            NodeKind::Event { event } => container.event_nodes.push(EventNodeRecord {
                node_id,
                position,
                event: event.clone(),
            }),
            NodeKind::End { end_kind } => container.end_nodes.push(EndNodeRecord {
                node_id,
                position,
                end_kind: *end_kind,
            }),
        }
    }
}

/// Replace the live graph with the contents of `container`
pub fn load(container: &DialogueContainer, graph: &mut DialogueGraph) -> LoadReport {
    let mut report = LoadReport::default();
    graph.clear();
    generate_nodes(container, graph, &mut report);
    connect_nodes(container, graph, &mut report);

    let dialogue_ids: Vec<NodeId> = container.dialogue_nodes.iter().map(|n| n.node_id).collect();
    for node_id in dialogue_ids {
        graph.refresh_port_connections(node_id);
    }

    if report.is_complete() {
        tracing::info!(
            "Loaded '{}': {} nodes, {} connections",
            container.name,
            report.nodes,
            report.connections
        );
    } else {
        tracing::warn!("Loaded '{}' with gaps: {report:?}", container.name);
    }
    report
}

fn generate_nodes(container: &DialogueContainer, graph: &mut DialogueGraph, report: &mut LoadReport) {
    for record in &container.start_nodes {
        graph.add_node(Node::start().with_id(record.node_id).with_position(record.position));
        report.nodes += 1;
    }

    for record in &container.end_nodes {
        let mut node = Node::end().with_id(record.node_id).with_position(record.position);
        node.kind = NodeKind::End { end_kind: record.end_kind };
        graph.add_node(node);
        report.nodes += 1;
    }

    for record in &container.event_nodes {
        let mut node = Node::event().with_id(record.node_id).with_position(record.position);
        node.kind = NodeKind::Event { event: record.event.clone() };
        graph.add_node(node);
        report.nodes += 1;
    }

    for record in &container.dialogue_nodes {
        let mut node = Node::dialogue(graph.languages())
            .with_id(record.node_id)
            .with_position(record.position);
        if let Some(content) = node.dialogue_content_mut() {
            content.speaker_name = record.speaker_name.clone();
            content.portrait = record.portrait.clone();
            content.portrait_side = record.portrait_side;
            for entry in record.text.iter() {
                if content.text.contains(entry.language) {
                    content.text.set(entry.language, entry.value.clone());
                }
            }
            for entry in record.audio.iter() {
                if content.audio.contains(entry.language) {
                    content.audio.set(entry.language, entry.value.clone());
                }
            }
        }
        let node_id = graph.add_node(node);
        report.nodes += 1;

        for port in &record.ports {
            if graph.add_choice_port(node_id, Some(port)).is_none() {
                report.duplicate_ports += 1;
            }
        }
    }
}

fn connect_nodes(container: &DialogueContainer, graph: &mut DialogueGraph, report: &mut LoadReport) {
    let node_ids: Vec<NodeId> = graph.node_ids().collect();
    for node_id in node_ids {
        let links: Vec<&LinkRecord> = container.links_from(node_id).collect();
        let mut claimed: HashSet<PortId> = HashSet::new();

        for (ordinal, link) in links.iter().enumerate() {
            let Some(input) = graph.node(link.target).and_then(|n| n.input(0)).map(|p| p.id) else {
                tracing::warn!("Link {} -> {} has no target node; skipping", link.source, link.target);
                report.missing_targets += 1;
                continue;
            };

            let Some(output) = graph
                .node(node_id)
                .and_then(|node| output_for_link(graph, node, ordinal, link.target, &claimed))
            else {
                tracing::warn!("Link {} -> {} has no output port; skipping", link.source, link.target);
                report.missing_ports += 1;
                continue;
            };

            match graph.connect(node_id, output, link.target, input) {
                Ok(_) => {
                    claimed.insert(output);
                    report.connections += 1;
                }
                Err(e) => {
                    tracing::warn!("Link {} -> {} not restored: {e}", link.source, link.target);
                    report.missing_ports += 1;
                }
            }
        }
    }
}

/// Pick the output port a link leaves from.
///
/// Dialogue nodes prefer the free choice whose `output_guid` names the link
/// target, then the choice at the link's ordinal, then the output at that
/// position. Other nodes use the output at the link's ordinal.
fn output_for_link(
    graph: &DialogueGraph,
    node: &Node,
    ordinal: usize,
    target: NodeId,
    claimed: &HashSet<PortId>,
) -> Option<PortId> {
    let is_free = |port_id: PortId| {
        !claimed.contains(&port_id) && graph.connections_from(port_id).next().is_none()
    };

    match &node.kind {
        NodeKind::Dialogue(content) => content
            .choices
            .iter()
            .filter(|choice| choice.output_guid == Some(target))
            .map(|choice| choice.port_id)
            .find(|port_id| node.output_by_id(*port_id).is_some() && is_free(*port_id))
            .or_else(|| {
                content
                    .choices
                    .get(ordinal)
                    .and_then(|choice| node.output_by_id(choice.port_id))
                    .map(|port| port.id)
                    .filter(|port_id| is_free(*port_id))
            })
            .or_else(|| node.output(ordinal).map(|port| port.id)),
        NodeKind::Start | NodeKind::Event { .. } | NodeKind::End { .. } => {
            node.output(ordinal).map(|port| port.id)
        }
    }
}
