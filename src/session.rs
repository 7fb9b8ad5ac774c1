//! One learner's grid session.
//!
//! The session owns the [`Store`], the configured [`Mode`] and [`Catalog`], and
//! the host bridge. Every entry point runs to completion: mutate the store,
//! then save to the host (best effort). Callers needing concurrent access wrap
//! the session in a mutex; nothing inside is shared.
//!
//! [`Catalog`]: crate::config::Catalog

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{aggregate, Aggregate};
use crate::config::GridConfig;
use crate::constants::SINGLE_ATTEMPT_CONFIRMATION;
use crate::error::{GridError, InteractionError};
use crate::feedback::{classify, Classification};
use crate::mode::{ClickOutcome, Mode};
use crate::store::{StudentData, Store};
use crate::sync::{
    notify, Annotation, ChartForward, ComponentState, ConnectedEvent, HostBridge,
    HostParameters, InboundMessage, OutboundMessage,
};
use crate::types::{now_millis, Cell, CellKey};

/// Result of a feedback request.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedbackOutcome {
    /// Single-attempt feedback needs the learner to confirm first.
    ConfirmationRequired(&'static str),
    Given(Classification),
}

/// What an inbound host message did.
#[derive(Clone, Debug, PartialEq)]
pub enum MessageEffect {
    ParametersSet,
    Loaded { restored: bool },
    AnnotationsChecked { feedback_enabled: bool },
    TrialCompleted { key: CellKey, inserted: bool },
    ChartForwarded(ChartForward),
    Ignored,
}

/// Render state of one grid slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    #[serde(flatten)]
    pub key: CellKey,
    pub visible: bool,
    pub completed: bool,
    pub flagged: bool,
    pub selected: bool,
    pub disabled: bool,
    /// 1-based completion order, shown on completed cells.
    pub order: Option<usize>,
}

pub struct Session {
    config: GridConfig,
    store: Store,
    host: Box<dyn HostBridge>,
    params: HostParameters,
    feedback_enabled: bool,
    log: Vec<String>,
}

impl Session {
    /// Start a session and ask the host for parameters and prior annotations.
    pub fn new(config: GridConfig, host: Box<dyn HostBridge>) -> Self {
        let mut session = Self {
            config,
            store: Store::new(),
            host,
            params: HostParameters::default(),
            feedback_enabled: true,
            log: Vec::new(),
        };
        notify(session.host.as_mut(), &OutboundMessage::GetParameters);
        notify(session.host.as_mut(), &OutboundMessage::GetLatestAnnotations);
        debug!(mode = %session.config.mode, "session started");
        session
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn params(&self) -> &HostParameters {
        &self.params
    }

    /// Whether a feedback request would currently be accepted.
    pub fn feedback_enabled(&self) -> bool {
        self.config.mode == Mode::Flag && self.feedback_enabled
    }

    /// Display log, one entry per appended fragment.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn log_html(&self) -> String {
        self.log.concat()
    }

    /// Heading suffix for the auto-score panel, Flag mode only.
    pub fn auto_score_label(&self) -> Option<String> {
        match self.config.mode {
            Mode::Flag => self.config.auto_score_mode.map(|m| m.heading_label()),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> StudentData {
        self.store.snapshot()
    }

    /// Load state without saving it back.
    pub fn restore(&mut self, data: StudentData) {
        self.store.restore(data);
    }

    pub fn aggregate(&self) -> Aggregate {
        aggregate(self.store.flagged(), &self.config.catalog)
    }

    // ── interactions ──

    /// Handle a click on `key`. Returns `None` for cells hidden by the catalog.
    pub fn cell_clicked(
        &mut self,
        key: CellKey,
    ) -> Result<Option<ClickOutcome>, InteractionError> {
        self.cell_clicked_at(key, now_millis())
    }

    /// [`Session::cell_clicked`] with an explicit timestamp for new entries.
    pub fn cell_clicked_at(
        &mut self,
        key: CellKey,
        date_added: i64,
    ) -> Result<Option<ClickOutcome>, InteractionError> {
        if !self.config.catalog.is_cell_available(&key) {
            debug!(cell = %key, "click on hidden cell ignored");
            return Ok(None);
        }
        let outcome = self
            .config
            .mode
            .on_cell_clicked(&mut self.store, key, date_added)?;
        debug!(cell = %key, ?outcome, "cell clicked");
        self.save();
        Ok(Some(outcome))
    }

    /// Classify the flagged plan, log it, and persist it as feedback.
    ///
    /// With single-attempt feedback `confirmed` must be true, and a plan
    /// classification disables further requests. The none-selected prompt does
    /// not use up the attempt.
    pub fn request_feedback(
        &mut self,
        confirmed: bool,
    ) -> Result<FeedbackOutcome, InteractionError> {
        self.config.mode.require_flag("feedback")?;
        if !self.feedback_enabled {
            return Err(InteractionError::FeedbackDisabled);
        }
        let single_attempt = self.config.is_single_feedback_attempt();
        if single_attempt && !confirmed {
            return Ok(FeedbackOutcome::ConfirmationRequired(SINGLE_ATTEMPT_CONFIRMATION));
        }

        let classification = classify(&self.aggregate());
        let text = classification.text();
        match classification.case() {
            Some(case) => {
                info!(case = %case, flagged = self.store.flagged().len(), "plan classified");
                self.log.push(format!("{}<br/>", case.log_marker()));
                self.log.push(text.clone());
            }
            None => {
                info!("feedback requested with no experiments selected");
                self.log.push(format!("{}<br/><br/>", text));
            }
        }

        let case_tag = classification.case().map(|c| c.as_str().to_string());
        self.save_feedback(text, case_tag);

        if single_attempt && classification.case().is_some() {
            info!("single feedback attempt used");
            self.feedback_enabled = false;
        }
        Ok(FeedbackOutcome::Given(classification))
    }

    /// Clear the flagged plan and the display log.
    pub fn reset_plan(&mut self) -> Result<(), InteractionError> {
        self.config.mode.require_flag("reset")?;
        self.store.clear_flagged();
        self.log.clear();
        info!("plan reset");
        self.save();
        Ok(())
    }

    // ── host messages ──

    pub fn handle_message(&mut self, message: InboundMessage) -> Result<MessageEffect, GridError> {
        match message {
            InboundMessage::Parameters(params) => {
                debug!(node_id = ?params.node_id, component_id = ?params.component_id, "parameters");
                self.params = params;
                Ok(MessageEffect::ParametersSet)
            }
            InboundMessage::ComponentState(load) => {
                let restored = match load.component_state {
                    Some(saved) => {
                        self.store.restore(saved.student_data);
                        true
                    }
                    None => false,
                };
                info!(restored, "component state loaded");
                Ok(MessageEffect::Loaded { restored })
            }
            InboundMessage::LatestAnnotations(annotations) => {
                if self.config.is_single_feedback_attempt()
                    && annotations.latest_comment_annotation.is_some()
                {
                    info!("feedback already given in an earlier visit");
                    self.feedback_enabled = false;
                }
                Ok(MessageEffect::AnnotationsChecked {
                    feedback_enabled: self.feedback_enabled(),
                })
            }
            InboundMessage::HandleConnectedComponentStudentDataChanged(change) => {
                match change.interpret()? {
                    ConnectedEvent::Graph(forward) => {
                        debug!(shown = forward.shown_trials.len(), "graph update forwarded");
                        Ok(MessageEffect::ChartForwarded(forward))
                    }
                    ConnectedEvent::TrialCompleted(trial) => {
                        let key = trial.key()?;
                        let inserted = self.store.add_completed(Cell::now(key));
                        info!(cell = %key, inserted, "trial completed");
                        self.save();
                        Ok(MessageEffect::TrialCompleted { key, inserted })
                    }
                    ConnectedEvent::Ignored => Ok(MessageEffect::Ignored),
                }
            }
        }
    }

    // ── rendering ──

    /// Render state of every slot in canonical order.
    pub fn grid_view(&self) -> Vec<CellView> {
        CellKey::all()
            .map(|key| CellView {
                key,
                visible: self.config.catalog.is_cell_available(&key),
                completed: self.store.is_completed(&key),
                flagged: self.store.is_flagged(&key),
                selected: self.store.is_selected(&key),
                disabled: self.config.mode.is_cell_disabled(&self.store, &key),
                order: self.store.sequence_number(&key),
            })
            .collect()
    }

    // ── saves ──

    fn component_state(&self) -> ComponentState {
        ComponentState::new(&self.params, self.store.snapshot())
    }

    fn save(&mut self) {
        let message = OutboundMessage::StudentDataChanged(self.component_state());
        notify(self.host.as_mut(), &message);
    }

    fn save_feedback(&mut self, text: String, case: Option<String>) {
        let state = self
            .component_state()
            .with_annotation(Annotation::feedback(text, case));
        notify(self.host.as_mut(), &OutboundMessage::StudentWork(state));
    }
}
