use super::Graph;
use crate::data::NodeId;
use crate::registry::NodeKind;
use ahash::AHashSet;
use std::fmt;

/// What is wrong with a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// A data input points at a node that no longer exists.
    DanglingDataRef { slot: usize, target: NodeId },
    /// A flow output points at a node that no longer exists.
    DanglingFlowRef { slot: usize, target: NodeId },
    UnknownType { type_name: String },
    /// The reference arrays do not match the type definition.
    SlotCountMismatch {
        expected_inputs: usize,
        found_inputs: usize,
        expected_flows: usize,
        found_flows: usize,
    },
    /// A getter, setter or change event whose variable is gone.
    MissingVariable,
    /// A second change event for the same variable.
    DuplicateChangeEvent { variable: NodeId },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::DanglingDataRef { slot, target } => {
                write!(f, "input {} references missing node '{}'", slot, target)
            }
            IssueKind::DanglingFlowRef { slot, target } => {
                write!(f, "flow output {} references missing node '{}'", slot, target)
            }
            IssueKind::UnknownType { type_name } => write!(f, "unknown node type '{}'", type_name),
            IssueKind::SlotCountMismatch {
                expected_inputs,
                found_inputs,
                expected_flows,
                found_flows,
            } => write!(
                f,
                "expected {} inputs and {} flow outputs, found {} and {}",
                expected_inputs, expected_flows, found_inputs, found_flows
            ),
            IssueKind::MissingVariable => write!(f, "references a variable that does not exist"),
            IssueKind::DuplicateChangeEvent { variable } => {
                write!(f, "duplicate change event for variable '{}'", variable)
            }
        }
    }
}

/// A command that fixes one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixCommand {
    ClearDataRef { node: NodeId, slot: usize },
    ClearFlowRef { node: NodeId, slot: usize },
    ResizeSlots { node: NodeId },
    RemoveNode { node: NodeId },
}

/// One problem found by [`Graph::validate`], with the node to select to show
/// it and an optional fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphIssue {
    pub kind: IssueKind,
    pub select: Option<NodeId>,
    pub fix: Option<FixCommand>,
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.select {
            Some(node) => write!(f, "Node '{}': {}", node, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl Graph {
    /// Scans the graph for structural problems without changing it.
    pub fn validate(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();
        let mut seen_change_events: AHashSet<NodeId> = AHashSet::new();

        for node in self.nodes() {
            let issue = |kind: IssueKind, fix: FixCommand| GraphIssue {
                kind,
                select: Some(node.uid.clone()),
                fix: Some(fix),
            };

            let Some(definition) = self.definition_of(node) else {
                issues.push(issue(
                    IssueKind::UnknownType {
                        type_name: node.full_name.clone(),
                    },
                    FixCommand::RemoveNode {
                        node: node.uid.clone(),
                    },
                ));
                continue;
            };

            if node.node_uids.len() != definition.inputs.len()
                || node.flow_uids.len() != definition.flow_outputs.len()
            {
                issues.push(issue(
                    IssueKind::SlotCountMismatch {
                        expected_inputs: definition.inputs.len(),
                        found_inputs: node.node_uids.len(),
                        expected_flows: definition.flow_outputs.len(),
                        found_flows: node.flow_uids.len(),
                    },
                    FixCommand::ResizeSlots {
                        node: node.uid.clone(),
                    },
                ));
            }

            for (slot, reference) in node.node_uids.iter().enumerate() {
                let Some(reference) = reference else { continue };
                if !self.contains(&reference.node) {
                    issues.push(issue(
                        IssueKind::DanglingDataRef {
                            slot,
                            target: reference.node.clone(),
                        },
                        FixCommand::ClearDataRef {
                            node: node.uid.clone(),
                            slot,
                        },
                    ));
                }
            }
            for (slot, target) in node.flow_uids.iter().enumerate() {
                let Some(target) = target else { continue };
                if !self.contains(target) {
                    issues.push(issue(
                        IssueKind::DanglingFlowRef {
                            slot,
                            target: target.clone(),
                        },
                        FixCommand::ClearFlowRef {
                            node: node.uid.clone(),
                            slot,
                        },
                    ));
                }
            }

            if definition.kind.references_variable() {
                let variable = node
                    .variable_ref()
                    .filter(|v| self.node(v).is_some_and(|n| n.is_variable()));
                match variable {
                    None => issues.push(issue(
                        IssueKind::MissingVariable,
                        FixCommand::RemoveNode {
                            node: node.uid.clone(),
                        },
                    )),
                    Some(variable) => {
                        if definition.kind == NodeKind::ChangeEvent
                            && !seen_change_events.insert(variable.clone())
                        {
                            issues.push(issue(
                                IssueKind::DuplicateChangeEvent { variable },
                                FixCommand::RemoveNode {
                                    node: node.uid.clone(),
                                },
                            ));
                        }
                    }
                }
            }
        }
        issues
    }

    /// Applies one fix. Returns `false` when the fix no longer applies, which
    /// makes repeated application harmless.
    pub fn apply_fix(&mut self, fix: &FixCommand) -> bool {
        match fix {
            FixCommand::ClearDataRef { node, slot } => self
                .node_mut(node)
                .and_then(|n| n.node_uids.get_mut(*slot))
                .and_then(Option::take)
                .is_some(),
            FixCommand::ClearFlowRef { node, slot } => self
                .node_mut(node)
                .and_then(|n| n.flow_uids.get_mut(*slot))
                .and_then(Option::take)
                .is_some(),
            FixCommand::ResizeSlots { node } => {
                let Some(counts) = self
                    .node(node)
                    .and_then(|n| self.definition_of(n))
                    .map(|d| (d.inputs.len(), d.flow_outputs.len(), super::value_slot_count(d)))
                else {
                    return false;
                };
                match self.node_mut(node) {
                    Some(n) => {
                        n.resize_slots(counts.0, counts.1);
                        if n.node_values.len() < counts.2 {
                            n.node_values.resize(counts.2, Default::default());
                        }
                        true
                    }
                    None => false,
                }
            }
            FixCommand::RemoveNode { node } => !self.remove_node(node).is_empty(),
        }
    }

    /// The reload pass: applies every available fix until the graph is
    /// clean. Returns the issues that were fixed.
    pub fn repair(&mut self) -> Vec<GraphIssue> {
        let mut fixed = Vec::new();
        loop {
            let issues: Vec<GraphIssue> = self
                .validate()
                .into_iter()
                .filter(|issue| issue.fix.is_some())
                .collect();
            if issues.is_empty() {
                break;
            }
            let mut progressed = false;
            for issue in issues {
                let applied = issue.fix.as_ref().is_some_and(|fix| self.apply_fix(fix));
                if applied {
                    log::warn!("Repaired: {}", issue);
                    fixed.push(issue);
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }
        fixed
    }
}
