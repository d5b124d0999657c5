use std::fmt;

use serde::{Deserialize, Serialize};

/// Attributes of an artifact opening tag
///
/// `id` and `title` are expected on every artifact; when the model omits one
/// the parser warns and carries on with `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactData {
    /// Stable identifier from the `id` attribute
    pub id: Option<String>,
    /// Human-readable title
    pub title: Option<String>,
    /// Artifact kind from the `type` attribute
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Kind of work an action performs
///
/// Closed set of known kinds plus a catch-all, so an unrecognized kind never
/// blocks parsing. Each kind maps to whether it carries a file path, whether
/// partial payload is streamed before close, and how its payload is
/// post-processed; see [`ActionKind::requires_file_path`],
/// [`ActionKind::streams_content`] and [`crate::message_parser::content`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    /// Write the payload to a file given by the `filePath` attribute
    File,
    /// Run a shell command
    Shell,
    /// Start a long-lived process, e.g. a dev server
    Start,
    /// Hand the conversation over to another role
    ChangeRole,
    /// Unrecognized kind, literal tag value preserved
    Other(String),
}

impl ActionKind {
    /// Map the `type` attribute value to a kind
    pub fn from_tag(raw: &str) -> Self {
        match raw {
            "file" => Self::File,
            "shell" => Self::Shell,
            "start" => Self::Start,
            "changerole" => Self::ChangeRole,
            other => Self::Other(other.to_string()),
        }
    }

    /// Literal tag spelling of this kind
    pub fn as_str(&self) -> &str {
        match self {
            Self::File => "file",
            Self::Shell => "shell",
            Self::Start => "start",
            Self::ChangeRole => "changerole",
            Self::Other(raw) => raw,
        }
    }

    /// Only file actions carry a target path
    pub fn requires_file_path(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Only file actions stream partial payload before their closing tag
    pub fn streams_content(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Whether the kind is part of the known vocabulary
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for ActionKind {
    fn from(raw: String) -> Self {
        Self::from_tag(&raw)
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed action: its kind, kind-specific attributes and the payload
/// text accumulated between its opening and closing tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Target path for file actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Payload text
    pub content: String,
}

/// Payload for artifact open/close callbacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactEvent {
    pub message_id: String,
    #[serde(flatten)]
    pub artifact: ArtifactData,
}

/// Payload for action open/stream/close callbacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    pub message_id: String,
    /// Id of the enclosing artifact, when it carried one
    pub artifact_id: Option<String>,
    /// Per-message monotonically increasing id, assigned at action-open and
    /// reused unchanged by every later event for the same action
    pub action_id: usize,
    pub action: ActionData,
}
