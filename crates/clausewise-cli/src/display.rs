//! Vertical card display for analysis results.
//!
//! Renders a `CanonicalResult` as a grouped, human-readable card: headline
//! figures first, then clauses, entities, risks and compliance checks.

use std::fmt;

use clausewise_core::{CanonicalResult, Severity};

const MAX_LIST_ITEMS: usize = 10;
const MAX_TEXT_CHARS: usize = 60;

/// A result laid out as a card. Use with `{}`.
pub struct Card<'a>(pub &'a CanonicalResult);

impl fmt::Display for Card<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(f, "=== {} ===", r.filename.as_deref().unwrap_or("(unnamed)"))?;
        if !r.summary.is_empty() {
            writeln!(f, "{}", r.summary)?;
        }
        writeln!(f)?;

        write_overview(f, r)?;
        write_clauses(f, r)?;
        write_entities(f, r)?;
        write_risks(f, r)?;
        write_compliance(f, r)
    }
}

// ── Sections ──

fn write_overview(f: &mut fmt::Formatter<'_>, r: &CanonicalResult) -> fmt::Result {
    let risk = &r.risk_assessment;
    writeln!(f, "Overview")?;
    writeln!(f, "  {:<26} {}", "overall_risk", risk.overall_risk)?;
    writeln!(f, "  {:<26} {:.1}", "risk_score", risk.risk_score)?;
    writeln!(f, "  {:<26} {}", "clauses", r.clauses.len())?;
    writeln!(f, "  {:<26} {}", "entities", r.entities.len())?;
    writeln!(f, "  {:<26} {}", "high_risks", r.high_risk_count())?;
    writeln!(
        f,
        "  {:<26} {}/{}",
        "compliant_checks",
        r.compliant_count(),
        r.compliance.len()
    )?;
    writeln!(f, "  {:<26} {:.2}s", "processing_time", r.processing_time)?;
    writeln!(f)
}

fn write_clauses(f: &mut fmt::Formatter<'_>, r: &CanonicalResult) -> fmt::Result {
    if r.clauses.is_empty() {
        return Ok(());
    }
    writeln!(f, "Clauses ({})", r.clauses.len())?;
    for clause in r.clauses.iter().take(MAX_LIST_ITEMS) {
        writeln!(
            f,
            "  {:<26} {:<6}  {:>3.0}%",
            clause.kind,
            clause.risk_level,
            clause.confidence * 100.0
        )?;
        if !clause.text.is_empty() {
            writeln!(f, "    {}", shorten(&clause.text))?;
        }
    }
    write_more(f, r.clauses.len())?;
    writeln!(f)
}

fn write_entities(f: &mut fmt::Formatter<'_>, r: &CanonicalResult) -> fmt::Result {
    if r.entities.is_empty() {
        return Ok(());
    }
    writeln!(f, "Entities")?;
    for (kind, members) in r.entities_by_type() {
        let shown: Vec<&str> = members
            .iter()
            .take(MAX_LIST_ITEMS)
            .map(|e| e.value.as_str())
            .collect();
        write!(f, "  {:<26} {}", kind, shown.join(", "))?;
        if members.len() > MAX_LIST_ITEMS {
            write!(f, " (+{})", members.len() - MAX_LIST_ITEMS)?;
        }
        writeln!(f)?;
    }
    writeln!(f)
}

fn write_risks(f: &mut fmt::Formatter<'_>, r: &CanonicalResult) -> fmt::Result {
    let risks = &r.risk_assessment.individual_risks;
    if risks.is_empty() {
        return Ok(());
    }
    writeln!(f, "Risks ({})", risks.len())?;
    for risk in risks.iter().take(MAX_LIST_ITEMS) {
        writeln!(f, "  {:<26} {}", risk.clause, risk.severity)?;
        if !risk.issue.is_empty() {
            writeln!(f, "    issue: {}", shorten(&risk.issue))?;
        }
        if !risk.recommendation.is_empty() {
            writeln!(f, "    fix:   {}", shorten(&risk.recommendation))?;
        }
    }
    write_more(f, risks.len())?;
    writeln!(f)
}

fn write_compliance(f: &mut fmt::Formatter<'_>, r: &CanonicalResult) -> fmt::Result {
    if r.compliance.is_empty() {
        return Ok(());
    }
    writeln!(f, "Compliance")?;
    for (key, entry) in r.compliance.iter().take(MAX_LIST_ITEMS) {
        let title = if entry.title.is_empty() {
            key.as_str()
        } else {
            entry.title.as_str()
        };
        let verdict = if entry.compliant { "yes" } else { "no" };
        write!(f, "  {:<26} {}", title, verdict)?;
        if entry.severity != Severity::None {
            write!(f, "  ({})", entry.severity)?;
        }
        writeln!(f)?;
        if !entry.compliant && !entry.warning.is_empty() {
            writeln!(f, "    {}", shorten(&entry.warning))?;
        }
    }
    write_more(f, r.compliance.len())?;
    writeln!(f)
}

// ── Helpers ──

fn write_more(f: &mut fmt::Formatter<'_>, len: usize) -> fmt::Result {
    if len > MAX_LIST_ITEMS {
        writeln!(f, "  ... and {} more", len - MAX_LIST_ITEMS)?;
    }
    Ok(())
}

/// Truncate on a char boundary.
fn shorten(text: &str) -> String {
    if text.chars().count() > MAX_TEXT_CHARS {
        let head: String = text.chars().take(MAX_TEXT_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
