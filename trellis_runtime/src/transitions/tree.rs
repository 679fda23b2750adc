//! Transition tree traversal.

use super::key::TransitionKey;
use crate::object::shape::{ShapeHandle, ShapeRegistry};
use rustc_hash::FxHashSet;
use std::fmt::Write;

/// A shape reached during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// The shape.
    pub shape: ShapeHandle,
    /// Edge that led here; `None` for the root.
    pub key: Option<TransitionKey>,
    /// Distance from the root.
    pub depth: usize,
}

impl ShapeRegistry {
    /// Visit every shape reachable from `root` through live transitions.
    ///
    /// Depth-first, pre-order. Children are visited in edge order: property
    /// edges by key, then special edges, then cached prototype transitions.
    /// A shape reachable along two paths is visited once.
    pub fn traverse_transition_tree(&mut self, root: ShapeHandle, mut visit: impl FnMut(&TreeNode)) {
        let mut seen = FxHashSet::default();
        let mut stack = vec![TreeNode {
            shape: root,
            key: None,
            depth: 0,
        }];

        while let Some(node) = stack.pop() {
            if !self.is_live(node.shape) || !seen.insert(node.shape) {
                continue;
            }
            visit(&node);

            let accessor = self.accessor(node.shape);
            let mut children: Vec<_> = accessor.live_transitions().into_iter().collect();
            children.extend(
                accessor
                    .live_prototype_transitions()
                    .into_iter()
                    .map(|(prototype, target)| (TransitionKey::Prototype(prototype), target)),
            );

            // Reversed so the first edge is popped first.
            stack.extend(children.into_iter().rev().map(|(key, shape)| TreeNode {
                shape,
                key: Some(key),
                depth: node.depth + 1,
            }));
        }
    }

    /// Render the transition tree under `root`, one shape per line.
    ///
    /// ```text
    /// Shape#0
    ///   x data -> Shape#1
    ///     y data -> Shape#3
    ///   <frozen> -> Shape#2
    /// ```
    pub fn describe_transition_tree(&mut self, root: ShapeHandle) -> String {
        let mut nodes = Vec::new();
        self.traverse_transition_tree(root, |node| nodes.push(node.clone()));

        let mut out = String::new();
        for node in nodes {
            let id = self.shape(node.shape).id().raw();
            let indent = node.depth * 2;
            // Writing to a String cannot fail.
            let _ = match &node.key {
                None => writeln!(out, "{:indent$}Shape#{id}", ""),
                Some(key) => writeln!(out, "{:indent$}{key} -> Shape#{id}", ""),
            };
        }
        out
    }
}
