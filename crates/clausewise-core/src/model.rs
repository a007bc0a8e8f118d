//! Canonical analysis result shared by every backend and the presentation layer.
//!
//! Field names follow the JSON contract of the analysis services
//! (`risk_level`, `risk_assessment`, `processing_time`, ...). Decoding is
//! forgiving: backends are independently versioned, so absent or malformed
//! fields fall back to defaults rather than failing the whole body.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lenient;

/// Clause type used when a result carries no extracted clauses.
pub const DOCUMENT_STATUS_CLAUSE: &str = "Document Status";

/// Risk tier of a clause, an individual risk, or the whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    /// Parse backend level text, case-insensitively.
    ///
    /// `critical` collapses into `high`; anything unrecognised reads as `medium`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" | "critical" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Self::parse(&s),
            _ => Self::default(),
        })
    }
}

/// Severity of a compliance finding. `None` marks a compliant section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    /// Parse backend severity text, case-insensitively.
    ///
    /// Empty text is `none`, `critical` collapses into `high`, and anything
    /// unrecognised reads as `medium`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Self::None,
            "low" => Self::Low,
            "high" | "critical" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Self::parse(&s),
            _ => Self::default(),
        })
    }
}

/// An extracted contractual passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: f64,
    #[serde(default)]
    pub risk_level: RiskLevel,
}

impl Clause {
    /// Status record standing in for extracted clauses when there are none.
    pub fn document_status(
        text: impl Into<String>,
        risk_level: RiskLevel,
        confidence: f64,
    ) -> Self {
        Self {
            kind: DOCUMENT_STATUS_CLAUSE.to_string(),
            text: text.into(),
            confidence: clamp_unit(confidence),
            risk_level,
        }
    }
}

/// A named value extracted from the document (amount, date, jurisdiction, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Free-form category such as `AMOUNT`, `DATE`, `JURISDICTION`.
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub value: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualRisk {
    #[serde(default, deserialize_with = "lenient::string")]
    pub clause: String,
    #[serde(default)]
    pub severity: RiskLevel,
    #[serde(default, deserialize_with = "lenient::string")]
    pub issue: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(default)]
    pub overall_risk: RiskLevel,
    /// Weighted severity score. Not a probability and not bounded above.
    #[serde(default, deserialize_with = "lenient::number")]
    pub risk_score: f64,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub individual_risks: Vec<IndividualRisk>,
}

/// Assessment of one legal section or category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub compliant: bool,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, deserialize_with = "lenient::string")]
    pub warning: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub recommendation: String,
}

/// The unified analysis result consumed by presentation.
///
/// Built fresh for each analysis request and treated as immutable once
/// handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResult {
    /// A body that omits the flag is taken as successful; only an explicit
    /// `false` marks it unusable.
    #[serde(default = "default_success", deserialize_with = "lenient::boolean_or_true")]
    pub success: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub clauses: Vec<Clause>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub entities: Vec<Entity>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub risk_assessment: RiskAssessment,
    /// Keyed by section or category label.
    #[serde(default, deserialize_with = "lenient::map")]
    pub compliance: BTreeMap<String, ComplianceEntry>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    /// Seconds spent by the producing backend.
    #[serde(default, deserialize_with = "lenient::number")]
    pub processing_time: f64,
}

fn default_success() -> bool {
    true
}

impl CanonicalResult {
    /// Decode a body that is expected to be canonical already.
    ///
    /// Only a body that is not a JSON object is an error; missing or
    /// malformed fields take their defaults.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_slice(body)?)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom("analysis body is not a JSON object"));
        }
        serde_json::from_value(value)
    }

    /// Enforce result invariants on a body that came from outside.
    ///
    /// Fills `filename` from the upload when the body has none, clamps
    /// confidences into `[0, 1]` and scores to `>= 0`, and adds a
    /// [`DOCUMENT_STATUS_CLAUSE`] record when `clauses` is empty.
    pub fn normalize(mut self, filename: &str) -> Self {
        if self.filename.as_deref().is_none_or(str::is_empty) {
            self.filename = Some(filename.to_string());
        }
        for clause in &mut self.clauses {
            clause.confidence = clamp_unit(clause.confidence);
        }
        for entity in &mut self.entities {
            entity.confidence = clamp_unit(entity.confidence);
        }
        self.risk_assessment.risk_score = non_negative(self.risk_assessment.risk_score);
        self.processing_time = non_negative(self.processing_time);

        if self.clauses.is_empty() {
            self.clauses.push(Clause::document_status(
                self.summary.clone(),
                self.risk_assessment.overall_risk,
                1.0,
            ));
        }
        self
    }

    /// Number of individual risks rated high.
    pub fn high_risk_count(&self) -> usize {
        self.risk_assessment
            .individual_risks
            .iter()
            .filter(|r| r.severity == RiskLevel::High)
            .count()
    }

    pub fn compliant_count(&self) -> usize {
        self.compliance.values().filter(|c| c.compliant).count()
    }

    /// Entities grouped by category, groups in first-seen order.
    pub fn entities_by_type(&self) -> Vec<(&str, Vec<&Entity>)> {
        let mut groups: Vec<(&str, Vec<&Entity>)> = Vec::new();
        for entity in &self.entities {
            match groups.iter_mut().find(|(kind, _)| *kind == entity.kind) {
                Some((_, members)) => members.push(entity),
                None => groups.push((entity.kind.as_str(), vec![entity])),
            }
        }
        groups
    }
}

pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing_is_case_insensitive() {
        assert_eq!(RiskLevel::parse("HIGH"), RiskLevel::High);
        assert_eq!(RiskLevel::parse(" Low "), RiskLevel::Low);
        assert_eq!(RiskLevel::parse("medium"), RiskLevel::Medium);
        assert_eq!(Severity::parse("NONE"), Severity::None);
        assert_eq!(Severity::parse("Low"), Severity::Low);
    }

    #[test]
    fn critical_collapses_into_high() {
        assert_eq!(RiskLevel::parse("CRITICAL"), RiskLevel::High);
        assert_eq!(Severity::parse("critical"), Severity::High);
    }

    #[test]
    fn unknown_level_reads_as_medium() {
        assert_eq!(RiskLevel::parse("severe-ish"), RiskLevel::Medium);
        assert_eq!(Severity::parse("unclear"), Severity::Medium);
        assert_eq!(Severity::parse(""), Severity::None);
    }

    #[test]
    fn levels_serialize_lowercase() {
        let json = serde_json::to_string(&RiskLevel::High).unwrap();
        assert_eq!(json, "\"high\"");
        let json = serde_json::to_string(&Severity::None).unwrap();
        assert_eq!(json, "\"none\"");
    }

    #[test]
    fn full_body_decodes() {
        let json = r#"{
            "success": true,
            "filename": "nda.pdf",
            "clauses": [
                {"type": "Confidentiality", "text": "Keep it secret.", "confidence": 0.9, "risk_level": "medium"}
            ],
            "entities": [{"type": "DATE", "value": "March 1, 2025", "confidence": 0.8}],
            "risk_assessment": {
                "overall_risk": "low",
                "risk_score": 1.5,
                "individual_risks": [
                    {"clause": "Confidentiality", "severity": "low", "issue": "Long term", "recommendation": "Shorten"}
                ]
            },
            "compliance": {
                "Section 27": {"title": "Restraint of Trade", "compliant": true, "severity": "none", "warning": "", "recommendation": "OK"}
            },
            "summary": "Fine.",
            "processing_time": 0.42
        }"#;
        let result: CanonicalResult = serde_json::from_str(json).unwrap();
        assert!(result.success);
        assert_eq!(result.filename.as_deref(), Some("nda.pdf"));
        assert_eq!(result.clauses[0].kind, "Confidentiality");
        assert_eq!(result.clauses[0].risk_level, RiskLevel::Medium);
        assert_eq!(result.entities[0].kind, "DATE");
        assert_eq!(result.risk_assessment.overall_risk, RiskLevel::Low);
        assert_eq!(result.risk_assessment.risk_score, 1.5);
        assert!(result.compliance["Section 27"].compliant);
        assert_eq!(result.processing_time, 0.42);
    }

    #[test]
    fn sparse_body_decodes_to_defaults() {
        let result: CanonicalResult = serde_json::from_str(r#"{"summary": "partial"}"#).unwrap();
        assert!(result.success);
        assert!(result.filename.is_none());
        assert!(result.clauses.is_empty());
        assert!(result.entities.is_empty());
        assert!(result.compliance.is_empty());
        assert_eq!(result.risk_assessment, RiskAssessment::default());
        assert_eq!(result.processing_time, 0.0);
    }

    #[test]
    fn malformed_nested_fields_decode_to_defaults() {
        let json = r#"{
            "risk_assessment": "n/a",
            "clauses": [{"type": "Term", "risk_level": 3}, 17],
            "compliance": {"Section 10": {"compliant": "yes"}, "broken": 4}
        }"#;
        let result: CanonicalResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.risk_assessment, RiskAssessment::default());
        assert_eq!(result.clauses.len(), 1);
        assert_eq!(result.clauses[0].risk_level, RiskLevel::Medium);
        assert_eq!(result.compliance.len(), 1);
        assert!(!result.compliance["Section 10"].compliant);
        assert_eq!(result.compliance["Section 10"].severity, Severity::None);
    }

    #[test]
    fn from_slice_requires_an_object() {
        assert!(CanonicalResult::from_slice(b"{}").is_ok());
        assert!(CanonicalResult::from_slice(b"[]").is_err());
        assert!(CanonicalResult::from_slice(b"null").is_err());
        assert!(CanonicalResult::from_slice(b"not json").is_err());
    }

    #[test]
    fn explicit_false_success_is_kept() {
        let result: CanonicalResult = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!result.success);
    }

    #[test]
    fn normalize_fills_filename_and_status_clause() {
        let result: CanonicalResult = serde_json::from_str(
            r#"{"summary": "No issues.", "risk_assessment": {"overall_risk": "low"}}"#,
        )
        .unwrap();
        let result = result.normalize("lease.docx");
        assert_eq!(result.filename.as_deref(), Some("lease.docx"));
        assert_eq!(result.clauses.len(), 1);
        assert_eq!(result.clauses[0].kind, DOCUMENT_STATUS_CLAUSE);
        assert_eq!(result.clauses[0].text, "No issues.");
        assert_eq!(result.clauses[0].risk_level, RiskLevel::Low);
    }

    #[test]
    fn normalize_keeps_backend_filename() {
        let result: CanonicalResult =
            serde_json::from_str(r#"{"filename": "server_side.txt"}"#).unwrap();
        let result = result.normalize("local.txt");
        assert_eq!(result.filename.as_deref(), Some("server_side.txt"));
    }

    #[test]
    fn normalize_clamps_numbers() {
        let json = r#"{
            "clauses": [{"type": "A", "text": "a", "confidence": 1.7, "risk_level": "low"}],
            "entities": [{"type": "AMOUNT", "value": "$5", "confidence": -0.2}],
            "risk_assessment": {"overall_risk": "low", "risk_score": -4},
            "processing_time": -1
        }"#;
        let result: CanonicalResult = serde_json::from_str(json).unwrap();
        let result = result.normalize("a.txt");
        assert_eq!(result.clauses[0].confidence, 1.0);
        assert_eq!(result.entities[0].confidence, 0.0);
        assert_eq!(result.risk_assessment.risk_score, 0.0);
        assert_eq!(result.processing_time, 0.0);
    }

    #[test]
    fn entities_group_in_first_seen_order() {
        let json = r#"{"entities": [
            {"type": "AMOUNT", "value": "INR 1", "confidence": 0.9},
            {"type": "DATE", "value": "Jan 1", "confidence": 0.9},
            {"type": "AMOUNT", "value": "INR 2", "confidence": 0.9}
        ]}"#;
        let result: CanonicalResult = serde_json::from_str(json).unwrap();
        let groups = result.entities_by_type();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "AMOUNT");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "DATE");
    }
}
