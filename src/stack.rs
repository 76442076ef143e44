//! Save/restore frames kept in lockstep with the wrapped context's own stack.

use crate::matrix::Matrix;

/// Snapshot pushed by `save()`. `user` is `None` for strategies that keep no
/// user transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformFrame {
    pub user: Option<Matrix>,
}

#[derive(Clone, Debug, Default)]
pub struct StateStack {
    frames: Vec<TransformFrame>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: TransformFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<TransformFrame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_order() {
        let mut stack = StateStack::new();
        stack.push(TransformFrame { user: Some(Matrix::IDENTITY) });
        stack.push(TransformFrame { user: Some(Matrix::translation(1.0, 2.0)) });
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop().unwrap().user, Some(Matrix::translation(1.0, 2.0)));
        assert_eq!(stack.pop().unwrap().user, Some(Matrix::IDENTITY));
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }
}
