//! AUDIT (Alcohol Use Disorders Identification Test) scoring.

use anyhow::{Result, bail};
use serde::Serialize;
use steady_core::{AuditEntry, Timestamp};

pub const AUDIT_QUESTIONS: usize = 10;

/// WHO risk zones by total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskZone {
    Low,
    Hazardous,
    Harmful,
    PossibleDependence,
}

impl RiskZone {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=7 => RiskZone::Low,
            8..=15 => RiskZone::Hazardous,
            16..=19 => RiskZone::Harmful,
            _ => RiskZone::PossibleDependence,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskZone::Low => "Low risk",
            RiskZone::Hazardous => "Hazardous use",
            RiskZone::Harmful => "Harmful use",
            RiskZone::PossibleDependence => "Possible dependence",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            RiskZone::Low => "Your drinking is in the lower-risk range. Keep an eye on patterns over time.",
            RiskZone::Hazardous => "Consider cutting back; simple advice and self-monitoring help at this level.",
            RiskZone::Harmful => "Your drinking may already be causing harm. Talking to a professional is recommended.",
            RiskZone::PossibleDependence => "Please reach out to a doctor or specialist for a full assessment.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditResult {
    pub score: u32,
    pub zone: RiskZone,
}

impl AuditResult {
    pub fn to_entry(&self, date: Timestamp) -> AuditEntry {
        AuditEntry { score: self.score, date }
    }
}

/// Score ten answers. Questions 1-8 take 0-4; questions 9 and 10 take 0, 2 or 4.
pub fn score_audit(answers: &[u8]) -> Result<AuditResult> {
    if answers.len() != AUDIT_QUESTIONS {
        bail!("AUDIT needs {AUDIT_QUESTIONS} answers, got {}", answers.len());
    }

    for (i, &a) in answers.iter().enumerate() {
        let ok = if i < 8 { a <= 4 } else { matches!(a, 0 | 2 | 4) };
        if !ok {
            bail!("AUDIT question {} has invalid answer {a}", i + 1);
        }
    }

    let score = answers.iter().map(|&a| u32::from(a)).sum();
    Ok(AuditResult {
        score,
        zone: RiskZone::from_score(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_boundaries() {
        assert_eq!(RiskZone::from_score(7), RiskZone::Low);
        assert_eq!(RiskZone::from_score(8), RiskZone::Hazardous);
        assert_eq!(RiskZone::from_score(15), RiskZone::Hazardous);
        assert_eq!(RiskZone::from_score(16), RiskZone::Harmful);
        assert_eq!(RiskZone::from_score(20), RiskZone::PossibleDependence);
        assert_eq!(RiskZone::from_score(40), RiskZone::PossibleDependence);
    }

    #[test]
    fn test_score_sums_answers() {
        let r = score_audit(&[1, 1, 0, 2, 0, 0, 1, 0, 2, 4]).unwrap();
        assert_eq!(r.score, 11);
        assert_eq!(r.zone, RiskZone::Hazardous);
    }

    #[test]
    fn test_last_two_questions_only_take_even_answers() {
        let err = score_audit(&[0, 0, 0, 0, 0, 0, 0, 0, 1, 0]).unwrap_err();
        assert!(err.to_string().contains("question 9"));
        assert!(score_audit(&[5, 0, 0, 0, 0, 0, 0, 0, 0, 0]).is_err());
        assert!(score_audit(&[0; 9]).is_err());
    }
}
