use crate::message_parser::types::{ActionData, ArtifactData};

/// Coarse position of the cursor relative to the tag structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePhase {
    /// Scanning prose, looking for an artifact opening tag
    #[default]
    Outside,
    /// Between an artifact's open and close tags, outside any action
    InsideArtifact,
    /// Between an action's open and close tags
    InsideAction,
}

/// Resumable parse state for one message
///
/// Created lazily on the first fragment for a message id and kept until
/// [`reset`](crate::message_parser::StreamingMessageParser::reset). The
/// buffer accumulates every fragment seen so far; `position` only ever moves
/// forward and always sits on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct MessageState {
    /// Cumulative text received for this message
    pub buffer: String,
    /// Byte offset of the first unconsumed character in `buffer`
    pub position: usize,
    /// Where the cursor currently sits in the tag structure
    pub phase: ParsePhase,
    /// Attributes of the artifact currently open
    pub current_artifact: Option<ArtifactData>,
    /// Action currently being accumulated
    pub current_action: Option<ActionData>,
    /// Next action id to hand out for this message
    pub action_index: usize,
}

impl MessageState {
    /// Create a fresh state positioned at the start of an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Text not yet consumed by the scan loop
    pub fn unconsumed(&self) -> &str {
        &self.buffer[self.position.min(self.buffer.len())..]
    }
}
