//! Best-match recommendations from the language-model advisor.
//!
//! The advisor reads the conversation a coordinator had with the knowledge
//! graph assistant and names a single patient. Its output is free text that
//! should contain one JSON object; the engine's own ranking is never replaced
//! by it, the recommendation only annotates a patient with a justification.

use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use lifematch_core::models::{same_organ, Patient};
use lifematch_core::registry;

use crate::error::{IntakeError, IntakeResult};

/// Advisor response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorOutput {
    pub best_match: BestMatchRecommendation,
}

/// The advisor's pick for immediate transplant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BestMatchRecommendation {
    pub patient_id: String,
    pub blood_type: String,
    pub organ_needed: String,
    pub medical_urgency: String,
    /// Days on the waiting list
    #[serde(deserialize_with = "lenient_count")]
    pub wait_time: Option<u32>,
    pub location: String,
    pub hospital: String,
    #[serde(deserialize_with = "lenient_count")]
    pub age: Option<u32>,
    pub justification: String,
}

/// Accept `120`, `"120"`, `"120 days"` or null.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        }
        _ => None,
    })
}

/// Parse advisor output into a recommendation.
pub fn parse_best_match_output(text: &str) -> IntakeResult<BestMatchRecommendation> {
    // Models often wrap the object in prose or code fences
    let json_start = text.find('{').ok_or_else(|| {
        IntakeError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = text.rfind('}').ok_or_else(|| {
        IntakeError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(IntakeError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let json_slice = &text[json_start..=json_end];
    let output: AdvisorOutput = serde_json::from_str(json_slice)?;

    if output.best_match.patient_id.trim().is_empty() {
        return Err(IntakeError::InvalidFormat(
            "Recommendation has no patient_id".into(),
        ));
    }

    Ok(output.best_match)
}

/// Concatenate the assistant's answers from an exported conversation.
///
/// Only `chatbot` turns are kept, one line per non-empty
/// `modes.graph_vector_fulltext.message`.
pub fn collect_conversation_content(conversation_json: &str) -> IntakeResult<String> {
    let conversation: Value = serde_json::from_str(conversation_json)?;
    let messages = conversation
        .get("conversation")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut content = String::new();
    for message in messages {
        if message.get("user").and_then(Value::as_str) != Some("chatbot") {
            continue;
        }
        let text = message
            .pointer("/modes/graph_vector_fulltext/message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if !text.is_empty() {
            content.push_str(text);
            content.push('\n');
        }
    }

    debug!(
        "Collected {} bytes of assistant content from {} messages",
        content.len(),
        messages.len()
    );
    Ok(content)
}

/// Attach the advisor's justification to the recommended patient.
///
/// Returns the updated patient; the roster itself is left untouched. A
/// recommendation disagreeing with the roster on blood type or organ is
/// logged but still applied.
pub fn attach_justification(
    patients: &[Patient],
    recommendation: &BestMatchRecommendation,
) -> IntakeResult<Patient> {
    let patient = registry::find_patient(patients, recommendation.patient_id.trim())?;

    if !recommendation.blood_type.is_empty()
        && !recommendation
            .blood_type
            .trim()
            .eq_ignore_ascii_case(patient.blood_type.trim())
    {
        warn!(
            "Advisor blood type {} for {} disagrees with roster {}",
            recommendation.blood_type, patient.id, patient.blood_type
        );
    }
    if !recommendation.organ_needed.is_empty()
        && !same_organ(&recommendation.organ_needed, &patient.organ_needed)
    {
        warn!(
            "Advisor organ {} for {} disagrees with roster {}",
            recommendation.organ_needed, patient.id, patient.organ_needed
        );
    }

    let justification = recommendation.justification.trim();
    Ok(Patient {
        justification: (!justification.is_empty()).then(|| justification.to_string()),
        ..patient.clone()
    })
}
