//! Prompts for the best-match advisor.
//!
//! The advisor gets the coordinator's conversation and, when available, the
//! engine's own ranked candidates, and must answer with a single JSON object.

use lifematch_core::models::MatchResult;

/// System prompt for the transplant advisor.
pub const SYSTEM_PROMPT: &str = r#"You are a transplant coordination assistant. Identify the single patient best suited for immediate organ transplantation.

Weigh the evidence in this order:
1. Critical medical urgency
2. Longest time on the waiting list
3. Strongest donor compatibility

Only recommend patients named in the material you are given. Answer with JSON only."#;

/// Shape the advisor must answer in.
pub const RESPONSE_FORMAT: &str = r#"{
  "best_match": {
    "patient_id": "ID",
    "blood_type": "type",
    "organ_needed": "organ",
    "medical_urgency": "level",
    "wait_time": "days",
    "location": "city",
    "hospital": "name",
    "age": "years",
    "justification": "why this patient is the best match"
  }
}"#;

/// User prompt asking for a best match from conversation content.
pub fn make_best_match_prompt(conversation_content: &str) -> String {
    format!(
        r#"Analyze this transplant coordination conversation and identify the single best matching patient for immediate organ transplant.

Conversation content:
{}

Respond in exactly this JSON format:
{}"#,
        conversation_content.trim_end(),
        RESPONSE_FORMAT
    )
}

/// Render ranked engine results as context lines for the advisor.
pub fn summarize_candidates(results: &[MatchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let viability = result
                .viability
                .map(|v| format!("{} days left ({} urgency)", v.days_remaining, v.urgency_level))
                .unwrap_or_else(|| "viability unknown".to_string());
            format!(
                "{}. Patient {} ({}, {}, {}) with donor {} ({}, {}): score {} [{}], {}",
                i + 1,
                result.patient.id,
                result.patient.blood_type,
                result.patient.organ_needed,
                result.patient.transplant_status,
                result.donor.donor_id,
                result.donor.blood_type,
                result.donor.organ_condition,
                result.compatibility_score,
                result.tier(),
                viability
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build a complete chat prompt with system context and optional engine ranking.
pub fn build_full_prompt(conversation_content: &str, ranked: &[MatchResult]) -> String {
    let mut prompt = String::new();

    prompt.push_str("<|system|>\n");
    prompt.push_str(SYSTEM_PROMPT);
    prompt.push_str("\n<|end|>\n");

    prompt.push_str("<|user|>\n");
    prompt.push_str(&make_best_match_prompt(conversation_content));
    if !ranked.is_empty() {
        prompt.push_str("\n\nEngine-ranked candidates:\n");
        prompt.push_str(&summarize_candidates(ranked));
    }
    prompt.push_str("\n<|end|>\n");
    prompt.push_str("<|assistant|>\n");

    prompt
}
