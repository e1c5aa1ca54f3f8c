//! Canned stage responses for pipeline and router tests.
//!
//! Each template carries a phrase unique to its stage, so one mock client
//! scripted by prompt markers can answer a full eight-stage run.

use super::openai::MockLlmClient;

pub const OUTLINE_A: &str = r#"{
  "bill_id": "A",
  "sections": [
    {"section_id": "S1", "title": "Filing Fees", "line_start": 1, "line_end": 4,
     "text": "A filing fee of $25 is established."},
    {"section_id": "S2", "title": "Reporting", "line_start": 5, "line_end": 9,
     "text": "Agencies shall report annually."}
  ]
}"#;

pub const OUTLINE_B: &str = r#"{
  "bill_id": "B",
  "sections": [
    {"section_id": "S1", "title": "Filing Fees", "line_start": 1, "line_end": 4,
     "text": "A filing fee of $50 is established."},
    {"section_id": "S3", "title": "Grant Program", "line_start": 5, "line_end": 12,
     "text": "A competitive grant program is created."}
  ]
}"#;

pub const ALIGNMENT: &str = r#"{
  "pairs": [
    {"a_section_id": "S1", "b_section_id": "S1", "similarity": 0.92,
     "rationale": "Both set the filing fee."},
    {"a_section_id": "S2", "b_section_id": null, "similarity": 0.0,
     "rationale": "Reporting requirement removed."},
    {"a_section_id": null, "b_section_id": "S3", "similarity": 0.0,
     "rationale": "New grant program."}
  ]
}"#;

pub const CHANGES: &str = r#"{
  "changes": [
    {"id": "chg_001", "change_type": "modification",
     "a_section_id": "S1", "b_section_id": "S1",
     "a_text": "A filing fee of $25 is established.",
     "b_text": "A filing fee of $50 is established.",
     "diff_preview": "- fee: $25\n+ fee: $50",
     "impact": {"legal": "Fee authority doubled.",
                "social": "Higher cost to filers.",
                "economic": "Revenue roughly doubles."},
     "evidence": [{"bill_id": "A", "section_id": "S1", "line_range": "L1-L4"}],
     "confidence": "high"},
    {"change_type": "addition", "b_section_id": "S3",
     "b_text": "A competitive grant program is created.",
     "diff_preview": "+ grant program",
     "impact": {"legal": "New program authority.", "social": "", "economic": ""},
     "evidence": [{"bill_id": "B", "section_id": "S3", "line_range": "L5-L12"}],
     "confidence": "medium"}
  ]
}"#;

pub const STAKEHOLDERS: &str = r#"{
  "stakeholders": [
    {"name": "Small business filers", "category": "industry", "effect": "harm",
     "mechanism": "Pay the doubled filing fee.", "magnitude": "medium",
     "time_horizon": "short", "linked_changes": ["chg_001"], "confidence": "high"}
  ]
}"#;

pub const BIAS: &str = r#"{
  "bias_analysis": [
    {"type": "socioeconomic",
     "description": "Flat fee weighs more heavily on low-revenue filers.",
     "impacted_groups": ["small businesses"],
     "evidence": [{"bill_id": "A", "section_id": "S1", "line_range": "L1-L4"}],
     "confidence": "medium"}
  ]
}"#;

pub const FORECAST: &str = r#"{
  "assumptions": ["Filing volume stays flat."],
  "risks": ["Fee challenge in state court."],
  "forecasts": {
    "short_1y": [
      {"domain": "economic", "impact": "Fee revenue roughly doubles.",
       "direction": "increase", "magnitude": "medium",
       "who": ["Small business filers"], "linked_changes": ["chg_001"],
       "metrics_to_track": ["fee collections"], "confidence": "medium"}
    ],
    "medium_3y": [],
    "long_5y": []
  }
}"#;

pub const CRITIQUE: &str = r#"{"issues": [], "ok": true}"#;

/// A mock client scripted to answer every stage of a comparison run.
pub fn scripted_mock() -> MockLlmClient {
    MockLlmClient::new("{}")
        .with_response("--- BILL A START ---", OUTLINE_A)
        .with_response("--- BILL B START ---", OUTLINE_B)
        .with_response("align semantically similar sections", ALIGNMENT)
        .with_response("git-style diff by aligned pairs", CHANGES)
        .with_response("Identify stakeholders and link them", STAKEHOLDERS)
        .with_response("potential biases or disproportionate impacts", BIAS)
        .with_response("Forecast outcomes if Bill B", FORECAST)
        .with_response("overclaims, missing evidence", CRITIQUE)
}
