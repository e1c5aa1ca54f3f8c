//! Typed data model for the comparison report.
//!
//! Every stage response is deserialized into one of these structs instead of
//! being passed around as loose JSON, so malformed model output is caught at
//! the stage boundary. Wire field names are part of the public contract
//! (`normalizedA`, `bias_analysis`, `short_1y`, …) and must stay stable.

use serde::{Deserialize, Serialize};

// ── Shared enums ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Magnitude {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHorizon {
    Short,
    Medium,
    Long,
}

// ── Outline stage ───────────────────────────────────────────

/// Hierarchical section outline of one bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    pub bill_id: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// One outline section with a 1-based, inclusive line range into the
/// newline-split raw text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub section_id: String,
    #[serde(default)]
    pub title: String,
    pub line_start: u32,
    pub line_end: u32,
    #[serde(default)]
    pub text: String,
}

// ── Alignment stage ─────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlignmentSet {
    #[serde(default)]
    pub pairs: Vec<AlignmentPair>,
}

/// A claimed correspondence between a section in bill A and one in bill B.
/// `None` on one side marks an unmatched addition or removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentPair {
    #[serde(default)]
    pub a_section_id: Option<String>,
    #[serde(default)]
    pub b_section_id: Option<String>,
    pub similarity: f64,
    #[serde(default)]
    pub rationale: String,
}

// ── Change synthesis stage ──────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Addition,
    Removal,
    Modification,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// A typed, evidenced difference between an aligned (or orphaned) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    /// Synthesized as `chg_NNN` when the model omits it.
    #[serde(default)]
    pub id: String,
    pub change_type: ChangeType,
    #[serde(default)]
    pub a_section_id: Option<String>,
    #[serde(default)]
    pub b_section_id: Option<String>,
    #[serde(default)]
    pub a_text: Option<String>,
    #[serde(default)]
    pub b_text: Option<String>,
    /// Git-like snippet, truncated to 240 characters.
    #[serde(default)]
    pub diff_preview: String,
    #[serde(default)]
    pub impact: Impact,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    pub confidence: Confidence,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Impact {
    #[serde(default)]
    pub legal: String,
    #[serde(default)]
    pub social: String,
    #[serde(default)]
    pub economic: String,
}

/// A citation back into one of the input bills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub bill_id: String,
    pub section_id: String,
    /// Formatted `Lstart-Lend`.
    #[serde(default)]
    pub line_range: String,
}

// ── Stakeholder stage ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeholderCategory {
    Industry,
    Demographic,
    Institution,
    Ngo,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Benefit,
    Harm,
    Mixed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StakeholderSet {
    #[serde(default)]
    pub stakeholders: Vec<Stakeholder>,
}

/// A named group asserted to be affected by one or more changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stakeholder {
    pub name: String,
    pub category: StakeholderCategory,
    pub effect: Effect,
    #[serde(default)]
    pub mechanism: String,
    pub magnitude: Magnitude,
    pub time_horizon: TimeHorizon,
    #[serde(default)]
    pub linked_changes: Vec<String>,
    pub confidence: Confidence,
}

// ── Bias stage ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasType {
    Demographic,
    Socioeconomic,
    Geographic,
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiasReport {
    #[serde(default)]
    pub bias_analysis: Vec<BiasFinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasFinding {
    #[serde(rename = "type")]
    pub bias_type: BiasType,
    pub description: String,
    #[serde(default)]
    pub impacted_groups: Vec<String>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    pub confidence: Confidence,
}

// ── Forecast stage ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastDomain {
    Economic,
    Social,
    Political,
    Legal,
    Operational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
    Mixed,
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub forecasts: ForecastHorizons,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastHorizons {
    #[serde(default)]
    pub short_1y: Vec<ForecastDomainEntry>,
    #[serde(default)]
    pub medium_3y: Vec<ForecastDomainEntry>,
    #[serde(default)]
    pub long_5y: Vec<ForecastDomainEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDomainEntry {
    pub domain: ForecastDomain,
    pub impact: String,
    pub direction: Direction,
    pub magnitude: Magnitude,
    #[serde(default)]
    pub who: Vec<String>,
    #[serde(default)]
    pub linked_changes: Vec<String>,
    #[serde(default)]
    pub metrics_to_track: Vec<String>,
    pub confidence: Confidence,
}

// ── Critique stage ──────────────────────────────────────────

/// Final self-review pass flagging unsupported claims in the prior output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Critique {
    #[serde(default)]
    pub issues: Vec<CritiqueIssue>,
    #[serde(default)]
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritiqueIssue {
    pub path: String,
    pub problem: String,
}

// ── Assembled report ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub bill_a_name: String,
    pub bill_b_name: String,
    /// RFC 3339 timestamp of pipeline completion.
    pub processed_at: String,
}

/// The full comparison report returned by `POST /api/compare`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareReport {
    #[serde(rename = "normalizedA")]
    pub normalized_a: Outline,
    #[serde(rename = "normalizedB")]
    pub normalized_b: Outline,
    pub pairs: AlignmentSet,
    pub changes: ChangeSet,
    pub stakeholders: StakeholderSet,
    pub forecast: Forecast,
    pub critique: Critique,
    pub bias_analysis: BiasReport,
    pub metadata: ReportMetadata,
}
