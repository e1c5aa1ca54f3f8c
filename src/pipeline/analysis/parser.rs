//! Strict parsing of stage responses into the typed data model.
//!
//! The model is asked for bare JSON, but replies wrapped in a ```json fence
//! are accepted too. The top-level shape of each stage is validated strictly
//! (wrong shape is a `SchemaValidation` error, retried with a fresh
//! completion); array items are parsed leniently — an item that fails to
//! deserialize is skipped with a warning rather than sinking the stage.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::types::{
    AlignmentPair, AlignmentSet, BiasFinding, BiasReport, Change, ChangeSet, Critique,
    CritiqueIssue, Forecast, ForecastDomainEntry, ForecastHorizons, Outline, Section,
    Stakeholder, StakeholderSet,
};
use super::AnalysisError;

/// Locate the JSON payload in a model response: the inside of a ```json
/// fence when present, otherwise the whole trimmed response.
fn json_payload(response: &str) -> Result<&str, AnalysisError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    if let Some(fence_start) = trimmed.find("```json") {
        let content_start = fence_start + 7;
        let content = &trimmed[content_start..];
        if let Some(fence_end) = content.find("```") {
            return Ok(content[..fence_end].trim());
        }
        return Err(AnalysisError::JsonParsing("Unclosed JSON fence".into()));
    }

    Ok(trimmed)
}

/// Parse a response into a loose JSON value (syntax check only).
pub fn parse_value(response: &str) -> Result<Value, AnalysisError> {
    let payload = json_payload(response)?;
    serde_json::from_str(payload).map_err(|e| AnalysisError::JsonParsing(e.to_string()))
}

/// Deserialize a value strictly, mapping failures to `SchemaValidation`.
fn from_value_strict<T: DeserializeOwned>(stage: &str, value: Value) -> Result<T, AnalysisError> {
    serde_json::from_value(value)
        .map_err(|e| AnalysisError::SchemaValidation(format!("{stage}: {e}")))
}

/// Parse an array leniently — skip items that fail to deserialize.
fn parse_array_lenient<T: DeserializeOwned>(stage: &str, items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<T>(v) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(stage, error = %e, "Dropping malformed array item");
                None
            }
        })
        .collect()
}

// ── Per-stage parsers ───────────────────────────────────────

pub fn parse_outline(response: &str) -> Result<Outline, AnalysisError> {
    #[derive(Deserialize)]
    struct RawOutline {
        bill_id: String,
        #[serde(default)]
        sections: Vec<Value>,
    }

    let raw: RawOutline = from_value_strict("outline", parse_value(response)?)?;
    Ok(Outline {
        bill_id: raw.bill_id,
        sections: parse_array_lenient::<Section>("outline", raw.sections),
    })
}

pub fn parse_alignment(response: &str) -> Result<AlignmentSet, AnalysisError> {
    #[derive(Deserialize)]
    struct RawAlignment {
        pairs: Vec<Value>,
    }

    let raw: RawAlignment = from_value_strict("align", parse_value(response)?)?;
    Ok(AlignmentSet {
        pairs: parse_array_lenient::<AlignmentPair>("align", raw.pairs),
    })
}

pub fn parse_changes(response: &str) -> Result<ChangeSet, AnalysisError> {
    #[derive(Deserialize)]
    struct RawChanges {
        changes: Vec<Value>,
    }

    let raw: RawChanges = from_value_strict("diff", parse_value(response)?)?;
    Ok(ChangeSet {
        changes: parse_array_lenient::<Change>("diff", raw.changes),
    })
}

pub fn parse_stakeholders(response: &str) -> Result<StakeholderSet, AnalysisError> {
    #[derive(Deserialize)]
    struct RawStakeholders {
        stakeholders: Vec<Value>,
    }

    let raw: RawStakeholders = from_value_strict("stakeholders", parse_value(response)?)?;
    Ok(StakeholderSet {
        stakeholders: parse_array_lenient::<Stakeholder>("stakeholders", raw.stakeholders),
    })
}

pub fn parse_bias(response: &str) -> Result<BiasReport, AnalysisError> {
    #[derive(Deserialize)]
    struct RawBias {
        bias_analysis: Vec<Value>,
    }

    let raw: RawBias = from_value_strict("bias", parse_value(response)?)?;
    Ok(BiasReport {
        bias_analysis: parse_array_lenient::<BiasFinding>("bias", raw.bias_analysis),
    })
}

pub fn parse_forecast(response: &str) -> Result<Forecast, AnalysisError> {
    #[derive(Deserialize)]
    struct RawHorizons {
        #[serde(default)]
        short_1y: Vec<Value>,
        #[serde(default)]
        medium_3y: Vec<Value>,
        #[serde(default)]
        long_5y: Vec<Value>,
    }

    #[derive(Deserialize)]
    struct RawForecast {
        #[serde(default)]
        assumptions: Vec<String>,
        #[serde(default)]
        risks: Vec<String>,
        forecasts: RawHorizons,
    }

    let raw: RawForecast = from_value_strict("forecast", parse_value(response)?)?;
    Ok(Forecast {
        assumptions: raw.assumptions,
        risks: raw.risks,
        forecasts: ForecastHorizons {
            short_1y: parse_array_lenient::<ForecastDomainEntry>("forecast", raw.forecasts.short_1y),
            medium_3y: parse_array_lenient::<ForecastDomainEntry>("forecast", raw.forecasts.medium_3y),
            long_5y: parse_array_lenient::<ForecastDomainEntry>("forecast", raw.forecasts.long_5y),
        },
    })
}

pub fn parse_critique(response: &str) -> Result<Critique, AnalysisError> {
    #[derive(Deserialize)]
    struct RawCritique {
        #[serde(default)]
        issues: Vec<Value>,
        #[serde(default)]
        ok: bool,
    }

    let raw: RawCritique = from_value_strict("critique", parse_value(response)?)?;
    Ok(Critique {
        issues: parse_array_lenient::<CritiqueIssue>("critique", raw.issues),
        ok: raw.ok,
    })
}
