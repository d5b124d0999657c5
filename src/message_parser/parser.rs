use std::collections::HashMap;

use tracing::{debug, warn};

use crate::message_parser::{
    attributes::extract_attribute,
    content::{finalize_content, partial_content},
    state::{MessageState, ParsePhase},
    types::{ActionData, ActionEvent, ActionKind, ArtifactData, ArtifactEvent},
};

pub const ARTIFACT_TAG_OPEN: &str = "<chatArtifact";
pub const ARTIFACT_TAG_CLOSE: &str = "</chatArtifact>";
pub const ACTION_TAG_OPEN: &str = "<chatAction";
pub const ACTION_TAG_CLOSE: &str = "</chatAction>";

/// Callback fired at artifact open/close
pub type ArtifactCallback = Box<dyn FnMut(&ArtifactEvent) + Send>;
/// Callback fired at action open/stream/close
pub type ActionCallback = Box<dyn FnMut(&ActionEvent) + Send>;
/// Factory producing the inline placeholder emitted in place of an artifact
/// opening tag
pub type ElementFactory = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Host hooks fired as structure is recognized, all optional
#[derive(Default)]
pub struct ParserCallbacks {
    pub on_artifact_open: Option<ArtifactCallback>,
    pub on_artifact_close: Option<ArtifactCallback>,
    pub on_action_open: Option<ActionCallback>,
    pub on_action_stream: Option<ActionCallback>,
    pub on_action_close: Option<ActionCallback>,
}

impl ParserCallbacks {
    fn artifact_open(&mut self, event: &ArtifactEvent) {
        if let Some(cb) = self.on_artifact_open.as_mut() {
            cb(event);
        }
    }

    fn artifact_close(&mut self, event: &ArtifactEvent) {
        if let Some(cb) = self.on_artifact_close.as_mut() {
            cb(event);
        }
    }

    fn action_open(&mut self, event: &ActionEvent) {
        if let Some(cb) = self.on_action_open.as_mut() {
            cb(event);
        }
    }

    fn action_stream(&mut self, event: &ActionEvent) {
        if let Some(cb) = self.on_action_stream.as_mut() {
            cb(event);
        }
    }

    fn action_close(&mut self, event: &ActionEvent) {
        if let Some(cb) = self.on_action_close.as_mut() {
            cb(event);
        }
    }
}

/// Parser configuration: callbacks plus the placeholder element factory
pub struct ParserOptions {
    pub callbacks: ParserCallbacks,
    pub artifact_element: ElementFactory,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            callbacks: ParserCallbacks::default(),
            artifact_element: Box::new(default_artifact_element),
        }
    }
}

/// Default placeholder element: a self-closing marker carrying the message
/// id, replaced by the host UI when it renders the artifact
pub fn default_artifact_element(message_id: &str) -> String {
    format!(r#"<div class="__chatArtifact__" data-message-id="{message_id}"></div>"#)
}

/// Streaming parser for artifact markup embedded in model output
///
/// Handles the two-level chat artifact format:
/// `<chatArtifact id="..." title="...">` containing
/// `<chatAction type="..." ...>payload</chatAction>` elements, surrounded by
/// free-form prose.
///
/// Features:
/// - Single forward pass over arbitrarily chunked input
/// - Per-message resumable state keyed by message id
/// - Buffering for tags split across chunks, down to one byte per chunk
/// - Lifecycle callbacks for artifact/action open, stream and close
/// - Prose outside any tag passed through unchanged
///
/// Fragments for one message id must arrive in order and without overlap;
/// different message ids may be interleaved freely. The parser performs no
/// I/O and never blocks: when the available text ends mid-tag it returns
/// immediately and resumes from the same position on the next call.
pub struct StreamingMessageParser {
    /// Resumable state per message id
    states: HashMap<String, MessageState>,
    options: ParserOptions,
}

impl StreamingMessageParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            states: HashMap::new(),
            options,
        }
    }

    /// Check whether text contains an artifact opening tag
    pub fn has_artifact_markers(&self, text: &str) -> bool {
        text.contains(ARTIFACT_TAG_OPEN)
    }

    /// Consume the next fragment for `message_id`
    ///
    /// Returns the literal passthrough text recognized by this call: prose
    /// outside any tag, with the placeholder element substituted for a
    /// recognized artifact opening tag. Tag markup itself is consumed and
    /// surfaced only through callbacks. Malformed input never fails the
    /// parse; every error condition degrades in place with a log line.
    pub fn parse(&mut self, message_id: &str, chunk: &str) -> String {
        let state = self
            .states
            .entry(message_id.to_string())
            .or_insert_with(MessageState::new);
        state.buffer.push_str(chunk);

        let input = state.buffer.clone();
        let bytes = input.as_bytes();

        let mut output = String::new();
        let mut i = state.position;

        while i < input.len() {
            match state.phase {
                ParsePhase::InsideAction => {
                    let artifact_id = state.current_artifact.as_ref().and_then(|a| a.id.clone());

                    match input[i..].find(ACTION_TAG_CLOSE) {
                        Some(rel) => {
                            let close_index = i + rel;
                            let mut action = state
                                .current_action
                                .take()
                                .expect("current action set while inside an action");
                            action.content.push_str(&input[i..close_index]);
                            action.content = finalize_content(
                                &action.kind,
                                action.file_path.as_deref(),
                                &action.content,
                            );

                            // The id was handed out at action-open; close
                            // references the same id.
                            self.options.callbacks.action_close(&ActionEvent {
                                message_id: message_id.to_string(),
                                artifact_id,
                                action_id: state.action_index - 1,
                                action,
                            });

                            state.phase = ParsePhase::InsideArtifact;
                            i = close_index + ACTION_TAG_CLOSE.len();
                        }
                        None => {
                            let action = state
                                .current_action
                                .as_ref()
                                .expect("current action set while inside an action");

                            if action.kind.streams_content() {
                                let partial = ActionData {
                                    kind: action.kind.clone(),
                                    file_path: action.file_path.clone(),
                                    content: partial_content(
                                        action.file_path.as_deref(),
                                        &input[i..],
                                    ),
                                };
                                self.options.callbacks.action_stream(&ActionEvent {
                                    message_id: message_id.to_string(),
                                    artifact_id,
                                    action_id: state.action_index - 1,
                                    action: partial,
                                });
                            }

                            // Leave the cursor at the payload start so the
                            // unclosed content is rescanned with the next
                            // fragment.
                            break;
                        }
                    }
                }
                ParsePhase::InsideArtifact => {
                    let action_open = input[i..].find(ACTION_TAG_OPEN).map(|rel| i + rel);
                    let artifact_close = input[i..].find(ARTIFACT_TAG_CLOSE).map(|rel| i + rel);

                    match (action_open, artifact_close) {
                        (Some(open_index), close_index)
                            if close_index.map_or(true, |close| open_index < close) =>
                        {
                            let Some(tag_end) = input[open_index..].find('>').map(|rel| open_index + rel)
                            else {
                                // Opening tag still streaming in.
                                break;
                            };

                            let action = parse_action_tag(&input[open_index..=tag_end]);
                            let action_id = state.action_index;
                            state.action_index += 1;

                            self.options.callbacks.action_open(&ActionEvent {
                                message_id: message_id.to_string(),
                                artifact_id: state
                                    .current_artifact
                                    .as_ref()
                                    .and_then(|a| a.id.clone()),
                                action_id,
                                action: action.clone(),
                            });

                            state.current_action = Some(action);
                            state.phase = ParsePhase::InsideAction;
                            i = tag_end + 1;
                        }
                        (_, Some(close_index)) => {
                            let artifact = state.current_artifact.take().unwrap_or_default();
                            state.phase = ParsePhase::Outside;

                            self.options.callbacks.artifact_close(&ArtifactEvent {
                                message_id: message_id.to_string(),
                                artifact,
                            });

                            i = close_index + ARTIFACT_TAG_CLOSE.len();
                        }
                        _ => {
                            // Neither delimiter complete in the available
                            // text.
                            break;
                        }
                    }
                }
                ParsePhase::Outside => {
                    if bytes[i] == b'<' && bytes.get(i + 1) != Some(&b'/') {
                        let rest = &input[i..];

                        if let Some(after_tag) = rest.strip_prefix(ARTIFACT_TAG_OPEN) {
                            // The character right after the delimiter decides
                            // whether this is an opening tag or just a longer
                            // identifier.
                            match after_tag.as_bytes().first() {
                                Some(&b) if b != b'>' && b != b' ' => {
                                    output.push_str(ARTIFACT_TAG_OPEN);
                                    i += ARTIFACT_TAG_OPEN.len();
                                }
                                _ => {
                                    let Some(tag_end) = rest.find('>').map(|rel| i + rel) else {
                                        // Attributes still streaming in.
                                        break;
                                    };

                                    let artifact_tag = &input[i..=tag_end];
                                    let id = extract_attribute(artifact_tag, "id");
                                    let title = extract_attribute(artifact_tag, "title");
                                    let kind = extract_attribute(artifact_tag, "type");

                                    if id.is_none() {
                                        warn!("artifact id missing");
                                    }
                                    if title.is_none() {
                                        warn!("artifact title missing");
                                    }

                                    let artifact = ArtifactData { id, title, kind };
                                    state.current_artifact = Some(artifact.clone());
                                    state.phase = ParsePhase::InsideArtifact;

                                    self.options.callbacks.artifact_open(&ArtifactEvent {
                                        message_id: message_id.to_string(),
                                        artifact,
                                    });

                                    output.push_str(&(self.options.artifact_element)(message_id));
                                    i = tag_end + 1;
                                }
                            }
                        } else if ARTIFACT_TAG_OPEN.starts_with(rest) {
                            // Strict prefix of the delimiter at the end of
                            // the available text: wait without consuming it.
                            break;
                        } else {
                            // Diverges from the delimiter: literal text
                            // through the first mismatching character.
                            let flush_len = rest
                                .char_indices()
                                .zip(ARTIFACT_TAG_OPEN.chars())
                                .find(|&((_, have), want)| have != want)
                                .map(|((pos, have), _)| pos + have.len_utf8())
                                .unwrap_or(rest.len());
                            output.push_str(&rest[..flush_len]);
                            i += flush_len;
                        }
                    } else {
                        // Plain text: copy through the next candidate
                        // delimiter start.
                        match input[i..].find('<') {
                            Some(0) => {
                                output.push('<');
                                i += 1;
                            }
                            Some(rel) => {
                                output.push_str(&input[i..i + rel]);
                                i += rel;
                            }
                            None => {
                                output.push_str(&input[i..]);
                                i = input.len();
                            }
                        }
                    }
                }
            }
        }

        state.position = i;

        output
    }

    /// Discard all per-message state
    pub fn reset(&mut self) {
        self.states.clear();
    }
}

impl Default for StreamingMessageParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

/// Parse an action opening tag into its kind and attributes
fn parse_action_tag(tag: &str) -> ActionData {
    let kind = match extract_attribute(tag, "type") {
        Some(raw) => ActionKind::from_tag(&raw),
        None => {
            warn!("action type missing");
            ActionKind::Other(String::new())
        }
    };

    let mut file_path = None;
    if kind.requires_file_path() {
        file_path = extract_attribute(tag, "filePath");
        if file_path.is_none() {
            debug!("file action without filePath attribute");
        }
    } else if !kind.is_known() {
        warn!("unknown action type '{kind}'");
    }

    ActionData {
        kind,
        file_path,
        content: String::new(),
    }
}
