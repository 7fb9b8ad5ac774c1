//! Inbound host messages.
//!
//! Connected-component notifications carry free-form student data whose shape
//! depends on the sender, so it stays a [`serde_json::Value`] until
//! [`ConnectedChange::interpret`] picks it apart.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::HostParameters;
use crate::error::ParseError;
use crate::store::StudentData;
use crate::trial_id::{parse_trial_id, TrialId};
use crate::types::CellKey;

/// Everything the host sends to the component.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "messageType", rename_all = "camelCase")]
pub enum InboundMessage {
    Parameters(HostParameters),
    ComponentState(LoadState),
    LatestAnnotations(LatestAnnotations),
    HandleConnectedComponentStudentDataChanged(ConnectedChange),
}

impl InboundMessage {
    pub fn from_json_str(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(|e| ParseError::MalformedMessage(e.to_string()))
    }
}

/// Previously saved state; absent on a learner's first visit.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadState {
    #[serde(default)]
    pub component_state: Option<SavedState>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    #[serde(default)]
    pub student_data: StudentData,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestAnnotations {
    #[serde(default)]
    pub latest_score_annotation: Option<Value>,
    #[serde(default)]
    pub latest_comment_annotation: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedChange {
    pub component_state: ConnectedComponentState,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedComponentState {
    pub component_type: String,
    #[serde(default)]
    pub student_data: Value,
}

/// Free-text cell triple reported by the embedded simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialCompletion {
    pub material_text: String,
    pub bev_temp_text: String,
    pub air_temp_text: String,
}

impl TrialCompletion {
    pub fn key(&self) -> Result<CellKey, ParseError> {
        CellKey::parse(&self.material_text, &self.bev_temp_text, &self.air_temp_text)
    }
}

/// Graph state handed to the chart collaborator, with the shown trials parsed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartForward {
    pub shown_trials: Vec<TrialId>,
    pub student_data: Value,
}

/// What a connected-component notification asks of the session.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectedEvent {
    Graph(ChartForward),
    TrialCompleted(TrialCompletion),
    /// Embedded update without a finished trial, or an unknown sender.
    Ignored,
}

impl ConnectedChange {
    pub fn interpret(&self) -> Result<ConnectedEvent, ParseError> {
        let state = &self.component_state;
        match state.component_type.as_str() {
            "Graph" => Ok(ConnectedEvent::Graph(chart_forward(&state.student_data))),
            "Embedded" => {
                let completed = state
                    .student_data
                    .get("isTrialCompleted")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                if !completed {
                    return Ok(ConnectedEvent::Ignored);
                }
                let trial = serde_json::from_value(state.student_data.clone())
                    .map_err(|e| ParseError::MalformedMessage(e.to_string()))?;
                Ok(ConnectedEvent::TrialCompleted(trial))
            }
            _ => Ok(ConnectedEvent::Ignored),
        }
    }
}

fn chart_forward(student_data: &Value) -> ChartForward {
    let trials = student_data
        .get("trials")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut shown_trials = Vec::new();
    for trial in trials {
        if !trial.get("show").and_then(Value::as_bool).unwrap_or(false) {
            continue;
        }
        let id = trial.get("id").and_then(Value::as_str).unwrap_or_default();
        match parse_trial_id(id) {
            Ok(parsed) => shown_trials.push(parsed),
            Err(err) => warn!(error = %err, "skipping chart trial"),
        }
    }

    ChartForward {
        shown_trials,
        student_data: student_data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Material, Temperature};
    use serde_json::json;

    fn connected(component_type: &str, student_data: Value) -> ConnectedChange {
        ConnectedChange {
            component_state: ConnectedComponentState {
                component_type: component_type.to_string(),
                student_data,
            },
        }
    }

    #[test]
    fn test_parse_inbound_variants() {
        let msg = InboundMessage::from_json_str(
            r#"{"messageType":"parameters","nodeId":"n1","componentId":"c1"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            InboundMessage::Parameters(HostParameters {
                node_id: Some("n1".into()),
                component_id: Some("c1".into()),
            })
        );

        let msg = InboundMessage::from_json_str(
            r#"{"messageType":"componentState","componentState":null}"#,
        )
        .unwrap();
        assert_eq!(msg, InboundMessage::ComponentState(LoadState::default()));

        let msg = InboundMessage::from_json_str(
            r#"{"messageType":"latestAnnotations","latestCommentAnnotation":{"data":{}}}"#,
        )
        .unwrap();
        match msg {
            InboundMessage::LatestAnnotations(a) => {
                assert!(a.latest_comment_annotation.is_some());
                assert!(a.latest_score_annotation.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            InboundMessage::from_json_str(r#"{"messageType":"bogus"}"#),
            Err(ParseError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_embedded_completion() {
        let change = connected(
            "Embedded",
            json!({
                "isTrialCompleted": true,
                "materialText": "Clay",
                "bevTempText": "Hot",
                "airTempText": "Cold",
            }),
        );
        let event = change.interpret().unwrap();
        let ConnectedEvent::TrialCompleted(trial) = event else {
            panic!("expected completion");
        };
        assert_eq!(
            trial.key().unwrap(),
            CellKey::new(Material::Clay, Temperature::Hot, Temperature::Cold)
        );

        let running = connected("Embedded", json!({ "isTrialCompleted": false }));
        assert_eq!(running.interpret().unwrap(), ConnectedEvent::Ignored);

        let missing = connected("Embedded", json!({ "isTrialCompleted": true }));
        assert!(matches!(
            missing.interpret(),
            Err(ParseError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_graph_forward_keeps_shown_trials() {
        let change = connected(
            "Graph",
            json!({
                "trials": [
                    { "id": "Wood-HotLiquid", "show": true },
                    { "id": "Glass-ColdLiquid", "show": false },
                    { "id": "garbage", "show": true },
                    { "id": "Plastic-WarmLiquid", "show": true },
                ]
            }),
        );
        let ConnectedEvent::Graph(forward) = change.interpret().unwrap() else {
            panic!("expected graph forward");
        };
        assert_eq!(
            forward.shown_trials,
            vec![
                TrialId { material: Material::Wood, bev_temp: Temperature::Hot },
                TrialId { material: Material::Plastic, bev_temp: Temperature::Warm },
            ]
        );
    }
}
