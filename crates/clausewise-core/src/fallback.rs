//! Fixed founder-agreement analysis served when no backend answers.
//!
//! The content is illustrative and independent of the uploaded document;
//! only the filename is taken from the upload.

use std::collections::BTreeMap;

use crate::model::{
    CanonicalResult, Clause, ComplianceEntry, Entity, IndividualRisk, RiskAssessment, RiskLevel,
    Severity,
};

pub const FALLBACK_OVERALL_RISK: RiskLevel = RiskLevel::High;
pub const FALLBACK_RISK_SCORE: f64 = 7.5;
pub const FALLBACK_PROCESSING_TIME: f64 = 2.34;

const CLAUSES: &[(&str, &str, f64, RiskLevel)] = &[
    (
        "Equity Distribution",
        "The authorized share capital shall be INR 10,00,000 divided into 10,00,000 equity shares of INR 1 each. Initial equity distribution: Founder A: 60% (600,000 shares), Founder B: 40% (400,000 shares).",
        0.92,
        RiskLevel::Medium,
    ),
    (
        "Vesting Schedule",
        "All equity shall vest over a period of 4 years from the date of incorporation. 25% of the shares shall vest after completion of 1 year (Cliff Period) and the remaining 75% shall vest monthly over the subsequent 36 months.",
        0.95,
        RiskLevel::High,
    ),
    (
        "IP Assignment",
        "All Founders hereby assign to the Company all rights, title and interest in any and all intellectual property created in connection with the Company's business pursuant to Section 16 and 17 of the Indian Copyright Act, 1957.",
        0.88,
        RiskLevel::High,
    ),
    (
        "Non-Compete",
        "During the term of this Agreement, Founders shall not engage in any competing business. Founders agree not to solicit Company employees or customers for 12 months post-exit.",
        0.85,
        RiskLevel::High,
    ),
    (
        "Termination",
        "Either party may terminate this Agreement by providing 60 days written notice to the other party. The Company may terminate immediately by paying 60 days salary in lieu of notice.",
        0.90,
        RiskLevel::Medium,
    ),
    (
        "Governing Law",
        "This Agreement shall be governed by and construed in accordance with the laws of India. The courts of Bangalore, Karnataka shall have exclusive jurisdiction over any disputes.",
        0.94,
        RiskLevel::Low,
    ),
    (
        "Confidentiality",
        "All Founders shall maintain strict confidentiality of proprietary information for a period of 3 years following termination. This includes trade secrets, customer data, business strategies, and technical know-how.",
        0.91,
        RiskLevel::Medium,
    ),
    (
        "Stamp Duty",
        "This Agreement shall be duly stamped as per the Indian Stamp Act and the stamp laws applicable in Karnataka. Stamp duty charges shall be borne equally by all Founders.",
        0.87,
        RiskLevel::Low,
    ),
];

const ENTITIES: &[(&str, &str, f64)] = &[
    ("AMOUNT", "INR 10,00,000", 0.95),
    ("AMOUNT", "INR 1", 0.93),
    ("EQUITY", "60%", 0.96),
    ("EQUITY", "40%", 0.96),
    ("EQUITY", "25%", 0.94),
    ("EQUITY", "75%", 0.94),
    ("TIME_PERIOD", "4 years", 0.92),
    ("TIME_PERIOD", "1 year", 0.91),
    ("TIME_PERIOD", "36 months", 0.90),
    ("TIME_PERIOD", "12 months", 0.89),
    ("TIME_PERIOD", "60 days", 0.88),
    ("TIME_PERIOD", "3 years", 0.87),
    ("JURISDICTION", "Bangalore, Karnataka", 0.93),
    ("DATE", "January 15, 2024", 0.89),
];

const RISKS: &[(&str, &str, &str)] = &[
    (
        "Non-Compete",
        "Non-compete clauses violate Section 27 of Indian Contract Act, 1872 and are generally unenforceable in India. Post-termination non-compete restrictions are void.",
        "REMOVE the non-compete clause entirely or limit it to non-solicitation only during employment. Indian law does not permit restraint of trade after termination.",
    ),
    (
        "Vesting Schedule",
        "The vesting schedule may not be properly aligned with Companies Act requirements for buyback of unvested shares at par value. Section 68 compliance needs verification.",
        "Ensure vesting clause explicitly references Section 68 of Companies Act, 2013 and includes proper buyback provisions for unvested shares.",
    ),
    (
        "IP Assignment",
        "IP assignment clause should explicitly cover all forms of intellectual property and include warranties that the IP does not infringe third-party rights.",
        "Strengthen IP clause to explicitly state: \"All IP belongs exclusively to Company\" and add warranty that assigned IP is free from third-party claims.",
    ),
];

// (section, title, compliant, severity, warning, recommendation)
const COMPLIANCE: &[(&str, &str, bool, Severity, &str, &str)] = &[
    (
        "Section 27",
        "Restraint of Trade (Non-Compete)",
        false,
        Severity::High,
        "Section 27 of Indian Contract Act, 1872 states that any agreement in restraint of trade is void. Non-compete clauses are generally unenforceable in India.",
        "Remove non-compete clause or limit to non-solicitation during employment term only. Post-termination non-compete is void under Indian law.",
    ),
    (
        "Section 10",
        "Free Consent",
        true,
        Severity::None,
        "",
        "Agreement appears to have free consent without coercion, undue influence, fraud, or misrepresentation.",
    ),
    (
        "Section 23",
        "Lawful Consideration",
        true,
        Severity::None,
        "",
        "Consideration appears lawful and not against public policy.",
    ),
    (
        "Companies Act 2013",
        "Share Capital and Vesting",
        true,
        Severity::None,
        "",
        "Share capital structure complies with Companies Act, 2013. Ensure proper ROC filings.",
    ),
    (
        "Indian Stamp Act",
        "Stamp Duty Requirements",
        true,
        Severity::None,
        "",
        "Agreement acknowledges stamp duty requirements. Ensure proper stamping as per Karnataka Stamp Act.",
    ),
];

const SUMMARY: &str = "This Founder Agreement contains 8 key clauses including equity distribution (60/40 split), 4-year vesting with 1-year cliff, and comprehensive IP assignment. CRITICAL ISSUE: The non-compete clause violates Section 27 of Indian Contract Act and is unenforceable - immediate removal recommended. The agreement shows 3 high-risk items requiring legal review. Overall risk assessment: HIGH. The vesting schedule and IP assignment need strengthening to ensure Companies Act compliance. Jurisdiction properly set to Bangalore, Karnataka with appropriate stamp duty provisions.";

/// Build the fixed analysis, attributed to `filename`.
pub fn founder_agreement(filename: &str) -> CanonicalResult {
    let clauses = CLAUSES
        .iter()
        .map(|&(kind, text, confidence, risk_level)| Clause {
            kind: kind.to_string(),
            text: text.to_string(),
            confidence,
            risk_level,
        })
        .collect();

    let entities = ENTITIES
        .iter()
        .map(|&(kind, value, confidence)| Entity {
            kind: kind.to_string(),
            value: value.to_string(),
            confidence,
        })
        .collect();

    let individual_risks = RISKS
        .iter()
        .map(|&(clause, issue, recommendation)| IndividualRisk {
            clause: clause.to_string(),
            severity: RiskLevel::High,
            issue: issue.to_string(),
            recommendation: recommendation.to_string(),
        })
        .collect();

    let compliance: BTreeMap<String, ComplianceEntry> = COMPLIANCE
        .iter()
        .map(
            |&(section, title, compliant, severity, warning, recommendation)| {
                (
                    section.to_string(),
                    ComplianceEntry {
                        title: title.to_string(),
                        compliant,
                        severity,
                        warning: warning.to_string(),
                        recommendation: recommendation.to_string(),
                    },
                )
            },
        )
        .collect();

    CanonicalResult {
        success: true,
        filename: Some(filename.to_string()),
        clauses,
        entities,
        risk_assessment: RiskAssessment {
            overall_risk: FALLBACK_OVERALL_RISK,
            risk_score: FALLBACK_RISK_SCORE,
            individual_risks,
        },
        compliance,
        summary: SUMMARY.to_string(),
        processing_time: FALLBACK_PROCESSING_TIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_shape() {
        let r = founder_agreement("agreement.txt");
        assert!(r.success);
        assert_eq!(r.filename.as_deref(), Some("agreement.txt"));
        assert_eq!(r.clauses.len(), 8);
        assert_eq!(r.entities.len(), 14);
        assert_eq!(r.risk_assessment.individual_risks.len(), 3);
        assert_eq!(r.compliance.len(), 5);
        assert_eq!(r.risk_assessment.overall_risk, RiskLevel::High);
        assert_eq!(r.risk_assessment.risk_score, 7.5);
        assert_eq!(r.processing_time, 2.34);
    }

    #[test]
    fn content_ignores_filename() {
        let a = founder_agreement("a.txt");
        let b = founder_agreement("b.pdf");
        assert_eq!(a.clauses, b.clauses);
        assert_eq!(a.summary, b.summary);
        assert_ne!(a.filename, b.filename);
    }

    #[test]
    fn derived_views() {
        let r = founder_agreement("x.docx");
        assert_eq!(r.high_risk_count(), 3);
        assert_eq!(r.compliant_count(), 4);
        let groups = r.entities_by_type();
        let kinds: Vec<&str> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec!["AMOUNT", "EQUITY", "TIME_PERIOD", "JURISDICTION", "DATE"]
        );
    }

    #[test]
    fn confidences_are_in_unit_range() {
        let r = founder_agreement("x.txt");
        assert!(r.clauses.iter().all(|c| (0.0..=1.0).contains(&c.confidence)));
        assert!(r.entities.iter().all(|e| (0.0..=1.0).contains(&e.confidence)));
    }
}
