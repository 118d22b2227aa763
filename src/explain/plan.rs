//! Read-only view over a winning-plan tree
//!
//! Plan trees come from the database engine as nested JSON. Each node has a
//! `stage` tag and zero or more child links, either single-valued
//! (`inputStage`, `innerStage`, `outerStage`) or sequence-valued
//! (`inputStages`, `shards`).

use serde_json::{Map, Value};

/// Named link from a plan node to its children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildLink {
    InputStage,
    InnerStage,
    OuterStage,
    InputStages,
    Shards,
}

impl ChildLink {
    /// All links, in traversal order
    pub const ALL: [ChildLink; 5] = [
        ChildLink::InputStage,
        ChildLink::InputStages,
        ChildLink::Shards,
        ChildLink::InnerStage,
        ChildLink::OuterStage,
    ];

    /// Returns the key under which the link is stored
    pub fn key(&self) -> &'static str {
        match self {
            ChildLink::InputStage => "inputStage",
            ChildLink::InnerStage => "innerStage",
            ChildLink::OuterStage => "outerStage",
            ChildLink::InputStages => "inputStages",
            ChildLink::Shards => "shards",
        }
    }

    /// Returns true if the link holds a sequence of children
    pub fn is_sequence(&self) -> bool {
        matches!(self, ChildLink::InputStages | ChildLink::Shards)
    }
}

/// Outcome of a bounded search through a plan tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSearch {
    /// A node with the requested stage tag was found
    pub found: bool,
    /// Nodes visited before the search ended
    pub visited: usize,
    /// The node bound was hit before the tree was exhausted
    pub truncated: bool,
}

/// A borrowed plan node. Missing or mistyped fields read as absent.
#[derive(Debug, Clone, Copy)]
pub struct PlanNode<'a> {
    raw: &'a Value,
}

impl<'a> PlanNode<'a> {
    /// Wraps a raw plan node
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    /// Returns the underlying JSON
    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    /// Returns the stage tag, if present and a string
    pub fn stage(&self) -> Option<&'a str> {
        self.raw.get("stage").and_then(Value::as_str)
    }

    /// Returns the child under a single-valued link
    pub fn child(&self, link: ChildLink) -> Option<PlanNode<'a>> {
        if link.is_sequence() {
            return None;
        }
        self.raw
            .get(link.key())
            .filter(|child| child.is_object())
            .map(PlanNode::new)
    }

    /// Returns the `inputStage` child
    pub fn input_stage(&self) -> Option<PlanNode<'a>> {
        self.child(ChildLink::InputStage)
    }

    /// Returns the key pattern if it is a non-empty mapping
    pub fn key_pattern(&self) -> Option<&'a Map<String, Value>> {
        self.raw
            .get("keyPattern")
            .and_then(Value::as_object)
            .filter(|pattern| !pattern.is_empty())
    }

    /// Returns all object children across every link, in link order
    pub fn children(&self) -> Vec<PlanNode<'a>> {
        let mut children = Vec::new();

        for link in ChildLink::ALL {
            match (self.raw.get(link.key()), link.is_sequence()) {
                (Some(child @ Value::Object(_)), false) => children.push(PlanNode::new(child)),
                (Some(Value::Array(items)), true) => {
                    children.extend(items.iter().filter(|i| i.is_object()).map(PlanNode::new));
                }
                _ => {}
            }
        }

        children
    }

    /// Depth-first search for a node whose stage equals `stage`, visiting at
    /// most `max_nodes` nodes. Uses an explicit work list, never recursion.
    pub fn find_stage(&self, stage: &str, max_nodes: usize) -> StageSearch {
        let mut work = vec![*self];
        let mut visited = 0;

        while let Some(node) = work.pop() {
            if visited >= max_nodes {
                return StageSearch {
                    found: false,
                    visited,
                    truncated: true,
                };
            }
            visited += 1;

            if node.stage() == Some(stage) {
                return StageSearch {
                    found: true,
                    visited,
                    truncated: false,
                };
            }

            // Reverse so the first child is popped first
            work.extend(node.children().into_iter().rev());
        }

        StageSearch {
            found: false,
            visited,
            truncated: false,
        }
    }
}
