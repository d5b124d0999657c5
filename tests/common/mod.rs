#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use artifact_parser::message_parser::{
    ActionEvent, ArtifactEvent, ParserCallbacks, ParserOptions, StreamingMessageParser,
};

/// One recorded callback invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ArtifactOpen(ArtifactEvent),
    ArtifactClose(ArtifactEvent),
    ActionOpen(ActionEvent),
    ActionStream(ActionEvent),
    ActionClose(ActionEvent),
}

impl Event {
    pub fn message_id(&self) -> &str {
        match self {
            Event::ArtifactOpen(e) | Event::ArtifactClose(e) => &e.message_id,
            Event::ActionOpen(e) | Event::ActionStream(e) | Event::ActionClose(e) => &e.message_id,
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Event::ActionStream(_))
    }
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// Build a parser whose callbacks all append to a shared event log
pub fn recording_parser() -> (StreamingMessageParser, EventLog) {
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));

    let callbacks = ParserCallbacks {
        on_artifact_open: Some(Box::new({
            let log = events.clone();
            move |e: &ArtifactEvent| log.lock().unwrap().push(Event::ArtifactOpen(e.clone()))
        })),
        on_artifact_close: Some(Box::new({
            let log = events.clone();
            move |e: &ArtifactEvent| log.lock().unwrap().push(Event::ArtifactClose(e.clone()))
        })),
        on_action_open: Some(Box::new({
            let log = events.clone();
            move |e: &ActionEvent| log.lock().unwrap().push(Event::ActionOpen(e.clone()))
        })),
        on_action_stream: Some(Box::new({
            let log = events.clone();
            move |e: &ActionEvent| log.lock().unwrap().push(Event::ActionStream(e.clone()))
        })),
        on_action_close: Some(Box::new({
            let log = events.clone();
            move |e: &ActionEvent| log.lock().unwrap().push(Event::ActionClose(e.clone()))
        })),
    };

    let parser = StreamingMessageParser::new(ParserOptions {
        callbacks,
        ..Default::default()
    });

    (parser, events)
}

/// Feed a document one character at a time, concatenating the passthrough
pub fn feed_chars(parser: &mut StreamingMessageParser, message_id: &str, doc: &str) -> String {
    let mut output = String::new();
    let mut buf = [0u8; 4];
    for ch in doc.chars() {
        output.push_str(&parser.parse(message_id, ch.encode_utf8(&mut buf)));
    }
    output
}

/// Drop action-stream events; their count depends on how the input was
/// chunked, while everything else must be chunking-invariant
pub fn without_streams(events: &[Event]) -> Vec<Event> {
    events.iter().filter(|e| !e.is_stream()).cloned().collect()
}

pub fn placeholder(message_id: &str) -> String {
    format!(r#"<div class="__chatArtifact__" data-message-id="{message_id}"></div>"#)
}
