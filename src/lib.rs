//! Streaming recognizer for artifact/action markup embedded in model chat
//! output.
//!
//! A model response arrives as arbitrarily sized text chunks. Interleaved
//! with ordinary prose, the model emits a two-level tag format: an outer
//! `<chatArtifact>` container grouping ordered `<chatAction>` elements, each
//! carrying a payload (file contents, a shell command, a role handoff note).
//! [`message_parser::StreamingMessageParser`] consumes those chunks as they
//! arrive, fires lifecycle callbacks the moment each structural element
//! opens, streams or closes, and passes the surrounding prose through
//! untouched.

pub mod message_parser;

pub use message_parser::{
    ActionData, ActionEvent, ActionKind, ArtifactData, ArtifactEvent, MessageState, ParsePhase,
    ParserCallbacks, ParserOptions, StreamingMessageParser,
};
