/// Message parser module for artifact/action markup in model output
///
/// This module provides the streaming parser plus the data model and helper
/// functions it is built from.
pub mod attributes;
pub mod content;
pub mod parser;
pub mod state;
pub mod types;


// Re-export commonly used types
pub use attributes::extract_attribute;
pub use content::{finalize_content, partial_content, strip_code_fence, unescape_tags};
pub use parser::{
    default_artifact_element, ActionCallback, ArtifactCallback, ElementFactory, ParserCallbacks,
    ParserOptions, StreamingMessageParser, ACTION_TAG_CLOSE, ACTION_TAG_OPEN, ARTIFACT_TAG_CLOSE,
    ARTIFACT_TAG_OPEN,
};
pub use state::{MessageState, ParsePhase};
pub use types::{ActionData, ActionEvent, ActionKind, ArtifactData, ArtifactEvent};
