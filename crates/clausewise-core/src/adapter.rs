//! Translation of the primary service's native validation report into the
//! canonical result.
//!
//! The primary service answers `POST /analyze` either with a canonical body
//! or with a native report nesting a `validation` object:
//!
//! ```json
//! {
//!   "summary": "...",
//!   "processing_time": 0.0,
//!   "validation": {
//!     "flaws": [{"flaw_type": "MISSING_DATE", "severity": "CRITICAL", "description": "...",
//!                "suggestion": "...", "clause_text": ""}],
//!     "confidence": 0.75,
//!     "critical_flaws": 1, "high_flaws": 0, "medium_flaws": 0,
//!     "is_compliant": false
//!   }
//! }
//! ```
//!
//! [`BackendResponse`] tells the two apart; [`adapt`] maps the native shape.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::Error as _;
use serde_json::Value;

use crate::lenient;
use crate::model::{
    CanonicalResult, Clause, ComplianceEntry, IndividualRisk, RiskAssessment, RiskLevel, Severity,
    clamp_unit,
};

/// Compliance key added when the service reports the document compliant.
pub const OVERALL_COMPLIANCE: &str = "Overall Compliance";

/// A detected problem as the primary service reports it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NativeFlaw {
    /// Upper snake case category, e.g. `MISSING_GOVERNING_LAW`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub flaw_type: String,
    /// `CRITICAL`, `HIGH`, `MEDIUM` or `LOW`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub severity: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub suggestion: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub clause_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NativeValidation {
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_compliant: bool,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_valid: bool,
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_flaws: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub critical_flaws: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub high_flaws: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub medium_flaws: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub low_flaws: u64,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub flaws: Vec<NativeFlaw>,
}

/// Top-level native report from the primary service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NativeResponse {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub document_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub validation: NativeValidation,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub processing_time: Option<f64>,
}

/// A 2xx analysis body, discriminated by the presence of a `validation` object.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendResponse {
    Native(NativeResponse),
    Canonical(CanonicalResult),
}

impl BackendResponse {
    /// Decode a response body. Fails only when the body is not a JSON object.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_slice(body)?)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(ref fields) = value else {
            return Err(serde_json::Error::custom("analysis body is not a JSON object"));
        };
        if matches!(fields.get("validation"), Some(Value::Object(_))) {
            serde_json::from_value(value).map(Self::Native)
        } else {
            CanonicalResult::from_value(value).map(Self::Canonical)
        }
    }

    /// Canonical result for the uploaded `filename`.
    pub fn into_canonical(self, filename: &str) -> CanonicalResult {
        match self {
            Self::Native(native) => adapt(&native, filename),
            Self::Canonical(result) => result.normalize(filename),
        }
    }
}

/// `MISSING_GOVERNING_LAW` → `MISSING GOVERNING LAW`.
pub fn normalize_category(label: &str) -> String {
    label.replace('_', " ")
}

/// Overall risk from flaw counts: any critical flaw is high, any high flaw is
/// medium, otherwise low.
pub fn overall_risk(critical: u64, high: u64) -> RiskLevel {
    if critical > 0 {
        RiskLevel::High
    } else if high > 0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Linear weighted severity score: `3·critical + 2·high + medium`.
pub fn risk_score(critical: u64, high: u64, medium: u64) -> u64 {
    critical
        .saturating_mul(3)
        .saturating_add(high.saturating_mul(2))
        .saturating_add(medium)
}

/// Map a native report onto the canonical result. Total: absent collections
/// become empty, and `clauses` is never empty.
pub fn adapt(native: &NativeResponse, filename: &str) -> CanonicalResult {
    let v = &native.validation;
    let confidence = clamp_unit(v.confidence);
    let overall = overall_risk(v.critical_flaws, v.high_flaws);

    let mut clauses: Vec<Clause> = v
        .flaws
        .iter()
        .map(|f| Clause {
            kind: normalize_category(&f.flaw_type),
            text: f
                .clause_text
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| f.description.clone()),
            confidence,
            risk_level: RiskLevel::parse(&f.severity),
        })
        .collect();
    if clauses.is_empty() {
        clauses.push(Clause::document_status(
            native.summary.clone(),
            overall,
            confidence,
        ));
    }

    let individual_risks = v
        .flaws
        .iter()
        .map(|f| IndividualRisk {
            clause: normalize_category(&f.flaw_type),
            severity: RiskLevel::parse(&f.severity),
            issue: f.description.clone(),
            recommendation: f.suggestion.clone(),
        })
        .collect();

    let mut compliance = BTreeMap::new();
    for f in &v.flaws {
        compliance.insert(
            normalize_category(&f.flaw_type),
            ComplianceEntry {
                title: f.description.clone(),
                compliant: false,
                severity: Severity::parse(&f.severity),
                warning: f.description.clone(),
                recommendation: f.suggestion.clone(),
            },
        );
    }
    if v.is_compliant {
        compliance.insert(
            OVERALL_COMPLIANCE.to_string(),
            ComplianceEntry {
                title: "Document is Compliant".to_string(),
                compliant: true,
                severity: Severity::None,
                warning: String::new(),
                recommendation: "Document meets basic requirements".to_string(),
            },
        );
    }

    let processing_time = native
        .processing_time
        .filter(|t| t.is_finite() && *t > 0.0)
        .unwrap_or(0.0);

    CanonicalResult {
        success: true,
        filename: Some(filename.to_string()),
        clauses,
        entities: Vec::new(),
        risk_assessment: RiskAssessment {
            overall_risk: overall,
            risk_score: risk_score(v.critical_flaws, v.high_flaws, v.medium_flaws) as f64,
            individual_risks,
        },
        compliance,
        summary: native.summary.clone(),
        processing_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DOCUMENT_STATUS_CLAUSE;

    fn flaw(flaw_type: &str, severity: &str, clause_text: Option<&str>) -> NativeFlaw {
        NativeFlaw {
            flaw_type: flaw_type.into(),
            severity: severity.into(),
            location: Some("Document-wide".into()),
            description: format!("{flaw_type} detected"),
            suggestion: format!("Fix {flaw_type}"),
            clause_text: clause_text.map(str::to_string),
        }
    }

    fn report(critical: u64, high: u64, medium: u64, flaws: Vec<NativeFlaw>) -> NativeResponse {
        NativeResponse {
            filename: Some("upload.txt".into()),
            document_type: Some("GENERAL".into()),
            validation: NativeValidation {
                is_compliant: critical == 0 && high == 0,
                is_valid: flaws.is_empty(),
                confidence: 0.75,
                total_flaws: flaws.len() as u64,
                critical_flaws: critical,
                high_flaws: high,
                medium_flaws: medium,
                low_flaws: 0,
                flaws,
            },
            summary: "Summary text".into(),
            processing_time: Some(0.8),
        }
    }

    #[test]
    fn overall_risk_boundaries() {
        assert_eq!(overall_risk(0, 0), RiskLevel::Low);
        assert_eq!(overall_risk(0, 1), RiskLevel::Medium);
        assert_eq!(overall_risk(1, 0), RiskLevel::High);
        assert_eq!(overall_risk(1, 5), RiskLevel::High);
    }

    #[test]
    fn overall_risk_ignores_medium_count() {
        let adapted = adapt(&report(0, 0, 1, vec![]), "a.txt");
        assert_eq!(adapted.risk_assessment.overall_risk, RiskLevel::Low);
        assert_eq!(adapted.risk_assessment.risk_score, 1.0);
    }

    #[test]
    fn risk_score_is_weighted_sum() {
        assert_eq!(risk_score(0, 0, 0), 0);
        assert_eq!(risk_score(1, 2, 3), 10);
        assert_eq!(risk_score(4, 0, 0), 12);
        assert_eq!(risk_score(0, 7, 1), 15);
        assert_eq!(risk_score(u64::MAX, 1, 1), u64::MAX);
    }

    #[test]
    fn flaws_become_clauses_risks_and_compliance() {
        let native = report(
            1,
            1,
            0,
            vec![
                flaw("MISSING_GOVERNING_LAW", "CRITICAL", None),
                flaw("MISSING_SIGNATURES", "HIGH", Some("Signed: ______")),
            ],
        );
        let r = adapt(&native, "agreement.txt");

        assert!(r.success);
        assert_eq!(r.filename.as_deref(), Some("agreement.txt"));
        assert_eq!(r.clauses.len(), 2);
        assert_eq!(r.clauses[0].kind, "MISSING GOVERNING LAW");
        assert_eq!(r.clauses[0].text, "MISSING_GOVERNING_LAW detected");
        assert_eq!(r.clauses[0].confidence, 0.75);
        assert_eq!(r.clauses[0].risk_level, RiskLevel::High);
        assert_eq!(r.clauses[1].text, "Signed: ______");
        assert_eq!(r.clauses[1].risk_level, RiskLevel::High);
        assert!(r.entities.is_empty());

        let risks = &r.risk_assessment.individual_risks;
        assert_eq!(risks.len(), 2);
        assert_eq!(risks[1].clause, "MISSING SIGNATURES");
        assert_eq!(risks[1].issue, "MISSING_SIGNATURES detected");
        assert_eq!(risks[1].recommendation, "Fix MISSING_SIGNATURES");
        assert_eq!(r.risk_assessment.overall_risk, RiskLevel::High);
        assert_eq!(r.risk_assessment.risk_score, 5.0);

        let entry = &r.compliance["MISSING SIGNATURES"];
        assert!(!entry.compliant);
        assert_eq!(entry.severity, Severity::High);
        assert_eq!(entry.title, entry.warning);
        assert!(!r.compliance.contains_key(OVERALL_COMPLIANCE));
        assert_eq!(r.processing_time, 0.8);
    }

    #[test]
    fn empty_clause_text_falls_back_to_description() {
        let r = adapt(
            &report(0, 0, 1, vec![flaw("INSUFFICIENT_DETAIL", "MEDIUM", Some(""))]),
            "a.txt",
        );
        assert_eq!(r.clauses[0].text, "INSUFFICIENT_DETAIL detected");
        assert_eq!(r.clauses[0].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn no_flaws_yields_single_status_clause() {
        let r = adapt(&report(0, 0, 0, vec![]), "clean.pdf");
        assert_eq!(r.clauses.len(), 1);
        assert_eq!(r.clauses[0].kind, DOCUMENT_STATUS_CLAUSE);
        assert_eq!(r.clauses[0].text, "Summary text");
        assert_eq!(r.clauses[0].risk_level, RiskLevel::Low);
        assert_eq!(r.clauses[0].confidence, 0.75);
        assert!(r.risk_assessment.individual_risks.is_empty());
    }

    #[test]
    fn compliant_report_gets_overall_entry() {
        let r = adapt(&report(0, 0, 0, vec![]), "clean.pdf");
        let overall = &r.compliance[OVERALL_COMPLIANCE];
        assert!(overall.compliant);
        assert_eq!(overall.severity, Severity::None);
        assert!(overall.warning.is_empty());
        assert_eq!(r.compliant_count(), 1);
    }

    #[test]
    fn duplicate_categories_keep_last_flaw() {
        let mut second = flaw("AMBIGUOUS_TERMS", "LOW", None);
        second.description = "second".into();
        let r = adapt(
            &report(0, 0, 0, vec![flaw("AMBIGUOUS_TERMS", "MEDIUM", None), second]),
            "a.txt",
        );
        assert_eq!(r.clauses.len(), 2);
        assert_eq!(r.compliance.len(), 2);
        assert_eq!(r.compliance["AMBIGUOUS TERMS"].title, "second");
    }

    #[test]
    fn absent_processing_time_is_zero() {
        let mut native = report(0, 0, 0, vec![]);
        native.processing_time = None;
        assert_eq!(adapt(&native, "a.txt").processing_time, 0.0);
    }

    #[test]
    fn validation_key_selects_native_shape() {
        let body = br#"{"success": true, "summary": "s", "validation": {"flaws": [], "critical_flaws": 1}}"#;
        let resp = BackendResponse::from_slice(body).unwrap();
        let BackendResponse::Native(native) = &resp else {
            panic!("expected native shape, got {resp:?}");
        };
        assert_eq!(native.validation.critical_flaws, 1);

        let r = resp.into_canonical("x.txt");
        assert_eq!(r.risk_assessment.overall_risk, RiskLevel::High);
        assert_eq!(r.clauses[0].kind, DOCUMENT_STATUS_CLAUSE);
    }

    #[test]
    fn body_without_validation_is_canonical() {
        let body = br#"{"success": true, "clauses": [{"type": "Term", "text": "t", "confidence": 0.5, "risk_level": "low"}]}"#;
        let resp = BackendResponse::from_slice(body).unwrap();
        assert!(matches!(resp, BackendResponse::Canonical(_)));
        let r = resp.into_canonical("y.txt");
        assert_eq!(r.filename.as_deref(), Some("y.txt"));
        assert_eq!(r.clauses[0].kind, "Term");
    }

    #[test]
    fn null_validation_is_canonical() {
        let resp = BackendResponse::from_slice(br#"{"validation": null}"#).unwrap();
        assert!(matches!(resp, BackendResponse::Canonical(_)));
    }

    #[test]
    fn empty_validation_object_adapts_to_defaults() {
        let resp = BackendResponse::from_slice(br#"{"validation": {}}"#).unwrap();
        let r = resp.into_canonical("z.txt");
        assert_eq!(r.clauses.len(), 1);
        assert_eq!(r.risk_assessment.overall_risk, RiskLevel::Low);
        assert_eq!(r.risk_assessment.risk_score, 0.0);
        assert!(r.compliance.is_empty());
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(BackendResponse::from_slice(b"[]").is_err());
        assert!(BackendResponse::from_slice(b"\"ok\"").is_err());
        assert!(BackendResponse::from_slice(b"<html>").is_err());
    }
}
