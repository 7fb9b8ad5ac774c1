//! JSON-on-disk host used by the HTTP server.
//!
//! Layout under the data directory:
//! - `state.json`: latest posted component state (overwritten on every save)
//! - `feedback.jsonl`: one annotation per line, appended on every feedback save

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{Annotation, ComponentState, HostBridge, OutboundMessage};
use crate::error::SyncError;
use crate::store::StudentData;

pub const STATE_FILE_NAME: &str = "state.json";
pub const FEEDBACK_FILE_NAME: &str = "feedback.jsonl";

pub struct FileHost {
    dir: PathBuf,
}

impl FileHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE_NAME)
    }

    pub fn feedback_path(&self) -> PathBuf {
        self.dir.join(FEEDBACK_FILE_NAME)
    }

    fn write_state(&self, state: &ComponentState) -> Result<(), SyncError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(state)?;
        // Write-then-rename so a crash never leaves a half-written state file.
        let tmp = self.dir.join(format!("{}.tmp", STATE_FILE_NAME));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.state_path())?;
        Ok(())
    }

    fn append_feedback(&self, annotations: &[Annotation]) -> Result<(), SyncError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.feedback_path())?;
        for annotation in annotations {
            let line = serde_json::to_string(annotation)?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    /// Student data from the last saved state, if any.
    pub fn load_student_data(&self) -> Option<StudentData> {
        load_student_data(&self.state_path())
    }

    /// Most recent persisted feedback annotation.
    pub fn latest_comment(&self) -> Option<Annotation> {
        let content = fs::read_to_string(self.feedback_path()).ok()?;
        content
            .lines()
            .rev()
            .find_map(|line| serde_json::from_str(line).ok())
    }
}

impl HostBridge for FileHost {
    fn post(&mut self, message: &OutboundMessage) -> Result<(), SyncError> {
        match message {
            OutboundMessage::StudentDataChanged(state) => self.write_state(state),
            OutboundMessage::StudentWork(state) => {
                self.write_state(state)?;
                self.append_feedback(&state.annotations)
            }
            // Parameters and annotations are answered from disk at startup.
            OutboundMessage::GetParameters | OutboundMessage::GetLatestAnnotations => Ok(()),
        }
    }
}

/// Load the student data block of a saved component state.
pub fn load_student_data(path: &Path) -> Option<StudentData> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => {
            info!(path = %path.display(), "no saved state");
            return None;
        }
    };
    match serde_json::from_str::<ComponentState>(&content) {
        Ok(state) => Some(state.student_data),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "unreadable saved state");
            None
        }
    }
}
