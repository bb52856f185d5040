use crate::visitor::TupleExprVisitorMut;
use crate::Slice;
use std::convert::Infallible;

/// Overwrites the limit and/or offset of every [Slice] in a tree.
///
/// The mutator remembers whether it has found a slice to update. Callers that need a slice in
/// any case wrap the root themselves if nothing was found.
#[derive(Debug, Default)]
pub struct SliceMutator {
    limit: Option<usize>,
    offset: Option<usize>,
    limit_was_set: bool,
    offset_was_set: bool,
}

impl SliceMutator {
    pub fn change_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn change_offset(offset: usize) -> Self {
        Self {
            offset: Some(offset),
            ..Self::default()
        }
    }

    pub fn change_limit_and_offset(limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
            ..Self::default()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Whether a slice has been updated with the new limit.
    pub fn limit_was_set(&self) -> bool {
        self.limit_was_set
    }

    /// Whether a slice has been updated with the new offset.
    pub fn offset_was_set(&self) -> bool {
        self.offset_was_set
    }

    /// Clears the flags so that the mutator can be applied to another tree.
    pub fn reset(&mut self) {
        self.limit_was_set = false;
        self.offset_was_set = false;
    }
}

impl TupleExprVisitorMut for SliceMutator {
    type Error = Infallible;

    fn visit_slice(&mut self, slice: &mut Slice) -> Result<(), Self::Error> {
        if let Some(limit) = self.limit {
            slice.limit = Some(limit);
            self.limit_was_set = true;
        }
        if let Some(offset) = self.offset {
            slice.offset = Some(offset);
            self.offset_was_set = true;
        }
        self.visit_tuple_expr(&mut slice.arg)
    }
}
