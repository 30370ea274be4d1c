//! Dialog stack.
//!
//! Nested dialogs are frames on an explicit stack rather than suspended
//! calls, so a conversation can be persisted between turns and resumed in
//! another process. The top frame is the active one.

use serde::{Deserialize, Serialize};

use super::errors::DialogError;
use super::frame::DialogFrame;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogStack {
    frames: Vec<DialogFrame>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: DialogFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<DialogFrame> {
        self.frames.pop()
    }

    pub fn active(&self) -> Option<&DialogFrame> {
        self.frames.last()
    }

    pub fn active_mut(&mut self) -> Option<&mut DialogFrame> {
        self.frames.last_mut()
    }

    /// Active frame, or `EmptyStack`.
    pub fn require_active_mut(&mut self) -> Result<&mut DialogFrame, DialogError> {
        self.frames.last_mut().ok_or(DialogError::EmptyStack)
    }

    /// Bottom frame, the one that started the conversation.
    pub fn root(&self) -> Option<&DialogFrame> {
        self.frames.first()
    }

    /// Removes every frame, innermost first.
    pub fn unwind(&mut self) -> Vec<DialogFrame> {
        let mut unwound = Vec::with_capacity(self.frames.len());
        while let Some(frame) = self.frames.pop() {
            unwound.push(frame);
        }
        unwound
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[DialogFrame] {
        &self.frames
    }
}
