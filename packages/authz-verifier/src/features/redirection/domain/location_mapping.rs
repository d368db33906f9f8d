/*
 * Source Location Remapper
 *
 * Redirection splices concrete type names over interface type names. Each
 * splice is one LocationMapping; the remapper translates positions between
 * the original and rewritten text of one file.
 *
 *   original:  ....[IStore]..........X
 *   rewritten: ....[SqlSecretStore]..........X'
 *
 * X' = X + Σ delta of every mapping that ends before X. A position inside a
 * substituted span is translated proportionally.
 *
 * Original spans never overlap; `add_mapping` rejects an overlapping one.
 */

use crate::shared::models::TextSpan;
use serde::{Deserialize, Serialize};

/// One text substitution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMapping {
    pub original_start: usize,
    pub original_length: usize,
    pub new_length: usize,
}

impl LocationMapping {
    pub fn new(original_start: usize, original_length: usize, new_length: usize) -> Self {
        Self {
            original_start,
            original_length,
            new_length,
        }
    }

    pub fn original_end(&self) -> usize {
        self.original_start.saturating_add(self.original_length)
    }

    /// Growth of the text caused by this substitution
    pub fn delta(&self) -> isize {
        self.new_length as isize - self.original_length as isize
    }

    fn original_span(&self) -> TextSpan {
        TextSpan::new(self.original_start, self.original_length)
    }
}

/// Per-file mapping table, ordered by original start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocationRemapper {
    mappings: Vec<LocationMapping>,
}

impl SourceLocationRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a substitution; `false` when it overlaps an existing one
    pub fn add_mapping(&mut self, original_start: usize, original_length: usize, new_length: usize) -> bool {
        let mapping = LocationMapping::new(original_start, original_length, new_length);
        let span = mapping.original_span();
        if self
            .mappings
            .iter()
            .any(|m| m.original_span().overlaps(&span))
        {
            return false;
        }
        let at = self
            .mappings
            .partition_point(|m| m.original_start <= original_start);
        self.mappings.insert(at, mapping);
        true
    }

    pub fn mappings(&self) -> &[LocationMapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Rewritten position → original position
    pub fn map_to_original(&self, position: usize) -> usize {
        let mut delta: isize = 0;
        for m in &self.mappings {
            let rewritten_start = m.original_start.saturating_add_signed(delta);
            let rewritten_end = rewritten_start + m.new_length;
            if position < rewritten_start {
                break;
            }
            if position < rewritten_end {
                if m.new_length == 0 {
                    return m.original_start;
                }
                return m.original_start + (position - rewritten_start) * m.original_length / m.new_length;
            }
            delta += m.delta();
        }
        position.saturating_add_signed(-delta)
    }

    /// Original position → rewritten position
    pub fn map_to_rewritten(&self, position: usize) -> usize {
        let mut delta: isize = 0;
        for m in &self.mappings {
            if position < m.original_start {
                break;
            }
            if position < m.original_end() {
                let rewritten_start = m.original_start.saturating_add_signed(delta);
                return rewritten_start + (position - m.original_start) * m.new_length / m.original_length;
            }
            delta += m.delta();
        }
        position.saturating_add_signed(delta)
    }

    pub fn map_span_to_original(&self, span: TextSpan) -> TextSpan {
        let start = self.map_to_original(span.start);
        let end = self.map_to_original(span.end());
        TextSpan::new(start, end.saturating_sub(start))
    }

    pub fn map_span_to_rewritten(&self, span: TextSpan) -> TextSpan {
        let start = self.map_to_rewritten(span.start);
        let end = self.map_to_rewritten(span.end());
        TextSpan::new(start, end.saturating_sub(start))
    }
}
