//! ASRS v1.1 screener (adult ADHD), Part A.
//!
//! Answers are frequencies 0 (Never) to 4 (Very Often). Items 1-3 count as
//! shaded from "Sometimes" (2) up, items 4-6 from "Often" (3) up. Four or more
//! shaded items is a positive screen. The full 18-item checklist is accepted;
//! only Part A is scored.

use anyhow::{Result, bail};
use serde::Serialize;
use steady_core::{AdhdEntry, Timestamp};

pub const PART_A_ITEMS: usize = 6;
pub const FULL_CHECKLIST_ITEMS: usize = 18;
pub const POSITIVE_THRESHOLD: u32 = 4;

const SHADED_FROM: [u8; PART_A_ITEMS] = [2, 2, 2, 3, 3, 3];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsrsResult {
    /// Shaded Part A items, 0-6.
    pub score: u32,
    pub positive: bool,
    pub answers: Vec<u8>,
}

impl AsrsResult {
    pub fn to_entry(&self, date: Timestamp) -> AdhdEntry {
        AdhdEntry {
            score: self.score,
            date,
            answers: self.answers.clone(),
        }
    }

    pub fn summary(&self) -> &'static str {
        if self.positive {
            "Symptoms are highly consistent with adult ADHD. Consider a clinical evaluation."
        } else {
            "Symptoms are not strongly consistent with adult ADHD on this screener."
        }
    }
}

pub fn score_asrs(answers: &[u8]) -> Result<AsrsResult> {
    if answers.len() != PART_A_ITEMS && answers.len() != FULL_CHECKLIST_ITEMS {
        bail!(
            "ASRS needs {PART_A_ITEMS} or {FULL_CHECKLIST_ITEMS} answers, got {}",
            answers.len()
        );
    }
    if let Some((i, a)) = answers.iter().enumerate().find(|(_, a)| **a > 4) {
        bail!("ASRS item {} has invalid answer {a}", i + 1);
    }

    let score = answers
        .iter()
        .zip(SHADED_FROM)
        .filter(|(a, from)| **a >= *from)
        .count() as u32;

    Ok(AsrsResult {
        score,
        positive: score >= POSITIVE_THRESHOLD,
        answers: answers.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shading_thresholds_differ_by_item() {
        // 2 shades items 1-3 but not 4-6
        let r = score_asrs(&[2, 2, 2, 2, 2, 2]).unwrap();
        assert_eq!(r.score, 3);
        assert!(!r.positive);

        let r = score_asrs(&[2, 0, 2, 3, 4, 1]).unwrap();
        assert_eq!(r.score, 4);
        assert!(r.positive);
    }

    #[test]
    fn test_full_checklist_scores_part_a_only() {
        let mut answers = vec![0u8; FULL_CHECKLIST_ITEMS];
        answers[6..].fill(4);
        let r = score_asrs(&answers).unwrap();
        assert_eq!(r.score, 0);
        assert_eq!(r.answers.len(), 18);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(score_asrs(&[0, 1, 2]).is_err());
        assert!(score_asrs(&[0, 1, 2, 3, 4, 5]).is_err());
    }
}
