//! Host-platform boundary: outbound save payloads and inbound notifications.
//!
//! The host owns storage. The session talks to it through [`HostBridge`], and
//! every call goes through [`notify`], which is best effort: a failed post is
//! logged and dropped, and the in-memory store stays authoritative until the
//! next save succeeds. There is no retry.
//!
//! - [`memory`]: in-process host that records messages (tests, simulation)
//! - [`file`]: JSON files on disk (the HTTP server's host stand-in)
//! - [`message`]: inbound message shapes and their parsing

pub mod file;
pub mod memory;
pub mod message;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::FEEDBACK_ANNOTATION_TYPE;
use crate::error::SyncError;
use crate::store::StudentData;

pub use file::FileHost;
pub use memory::MemoryHost;
pub use message::{ChartForward, ConnectedEvent, InboundMessage, TrialCompletion};

/// Host identifiers received in the parameters message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostParameters {
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub component_id: Option<String>,
}

/// Payload of an annotation attached to persisted feedback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationData {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
}

/// Comment-type annotation carrying feedback text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub annotation_type: String,
    pub data: AnnotationData,
}

impl Annotation {
    pub fn feedback(text: impl Into<String>, case: Option<String>) -> Self {
        Self {
            annotation_type: FEEDBACK_ANNOTATION_TYPE.to_string(),
            data: AnnotationData {
                value: text.into(),
                case,
            },
        }
    }
}

/// Component state as posted to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    pub student_data: StudentData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl ComponentState {
    pub fn new(params: &HostParameters, student_data: StudentData) -> Self {
        Self {
            node_id: params.node_id.clone(),
            component_id: params.component_id.clone(),
            student_data,
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Everything the component sends to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "messageType", rename_all = "camelCase")]
pub enum OutboundMessage {
    GetParameters,
    GetLatestAnnotations,
    /// Plain save after a store mutation.
    StudentDataChanged(ComponentState),
    /// Save carrying a feedback annotation.
    StudentWork(ComponentState),
}

impl OutboundMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundMessage::GetParameters => "getParameters",
            OutboundMessage::GetLatestAnnotations => "getLatestAnnotations",
            OutboundMessage::StudentDataChanged(_) => "studentDataChanged",
            OutboundMessage::StudentWork(_) => "studentWork",
        }
    }

    pub fn component_state(&self) -> Option<&ComponentState> {
        match self {
            OutboundMessage::StudentDataChanged(state) | OutboundMessage::StudentWork(state) => {
                Some(state)
            }
            _ => None,
        }
    }
}

/// Transport to the host platform.
pub trait HostBridge: Send {
    fn post(&mut self, message: &OutboundMessage) -> Result<(), SyncError>;
}

/// Best-effort post: failures are logged and swallowed.
pub fn notify(host: &mut dyn HostBridge, message: &OutboundMessage) {
    match host.post(message) {
        Ok(()) => debug!(kind = message.kind(), "posted to host"),
        Err(err) => warn!(kind = message.kind(), error = %err, "not posted"),
    }
}
