//! In-process host that keeps every posted message.

use std::sync::{Arc, Mutex};

use super::{HostBridge, OutboundMessage};
use crate::error::SyncError;
use crate::store::StudentData;

/// Cloneable handle: the session owns one clone, the caller inspects another.
#[derive(Clone, Default)]
pub struct MemoryHost {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything posted so far, oldest first.
    pub fn messages(&self) -> Vec<OutboundMessage> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of store saves (plain and feedback).
    pub fn save_count(&self) -> usize {
        self.messages()
            .iter()
            .filter(|m| m.component_state().is_some())
            .count()
    }

    /// Student data of the most recent save.
    pub fn last_student_data(&self) -> Option<StudentData> {
        self.messages()
            .iter()
            .rev()
            .find_map(|m| m.component_state().map(|s| s.student_data.clone()))
    }

    /// Feedback texts in the order they were persisted.
    pub fn feedback_texts(&self) -> Vec<String> {
        self.messages()
            .iter()
            .filter_map(|m| match m {
                OutboundMessage::StudentWork(state) => {
                    state.annotations.first().map(|a| a.data.value.clone())
                }
                _ => None,
            })
            .collect()
    }
}

impl HostBridge for MemoryHost {
    fn post(&mut self, message: &OutboundMessage) -> Result<(), SyncError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| SyncError::Unavailable("message log poisoned".to_string()))?;
        sent.push(message.clone());
        Ok(())
    }
}
