//! CFG traversal orders

use crate::features::flow_graph::ports::{ControlFlowGraph, NodeId};

/// Reverse postorder of the nodes reachable from the entry
///
/// Every forward edge `a → b` has `a` before `b`; only back edges point
/// backwards. Iterative DFS, successors visited in ascending id order.
pub fn reverse_postorder<G: ControlFlowGraph + ?Sized>(cfg: &G) -> Vec<NodeId> {
    let n = cfg.node_count();
    if n == 0 {
        return Vec::new();
    }

    let entry = cfg.entry();
    let mut visited = vec![false; n];
    let mut postorder = Vec::with_capacity(n);
    let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> = vec![(entry, cfg.successors(entry), 0)];
    visited[entry.index()] = true;

    loop {
        let Some(frame) = stack.last_mut() else {
            break;
        };
        let next = if frame.2 < frame.1.len() {
            frame.2 += 1;
            Some(frame.1[frame.2 - 1])
        } else {
            None
        };

        match next {
            Some(succ) => {
                if !visited[succ.index()] {
                    visited[succ.index()] = true;
                    stack.push((succ, cfg.successors(succ), 0));
                }
            }
            None => {
                if let Some((node, _, _)) = stack.pop() {
                    postorder.push(node);
                }
            }
        }
    }

    postorder.reverse();
    postorder
}
