//! The fixed set of tools and their display metadata.

use serde::{Deserialize, Serialize};

use crate::store::Bucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Journal,
    Cravings,
    Breathing,
    Grounding,
    Gratitude,
    ThoughtDiary,
    Meditation,
    Values,
    Audit,
    Adhd,
    OppositeAction,
    ProblemSolving,
    Goals,
    SafetyPlan,
    RelapsePlan,
}

impl Tool {
    /// Every tool, in menu order.
    pub const ALL: [Tool; 15] = [
        Tool::Journal,
        Tool::Cravings,
        Tool::Breathing,
        Tool::Grounding,
        Tool::Gratitude,
        Tool::ThoughtDiary,
        Tool::Meditation,
        Tool::Values,
        Tool::Audit,
        Tool::Adhd,
        Tool::OppositeAction,
        Tool::ProblemSolving,
        Tool::Goals,
        Tool::SafetyPlan,
        Tool::RelapsePlan,
    ];

    pub fn bucket(&self) -> Bucket {
        match self {
            Tool::Journal => Bucket::Journal,
            Tool::Cravings => Bucket::Cravings,
            Tool::Breathing => Bucket::Breathing,
            Tool::Grounding => Bucket::Grounding,
            Tool::Gratitude => Bucket::Gratitude,
            Tool::ThoughtDiary => Bucket::ThoughtDiary,
            Tool::Meditation => Bucket::Meditation,
            Tool::Values => Bucket::Values,
            Tool::Audit => Bucket::Audit,
            Tool::Adhd => Bucket::Adhd,
            Tool::OppositeAction => Bucket::OppositeAction,
            Tool::ProblemSolving => Bucket::ProblemSolving,
            Tool::Goals => Bucket::Goals,
            Tool::SafetyPlan => Bucket::SafetyPlan,
            Tool::RelapsePlan => Bucket::RelapsePreventionPlan,
        }
    }

    /// Plans hold one document rather than dated entries.
    pub fn is_plan(&self) -> bool {
        matches!(self, Tool::SafetyPlan | Tool::RelapsePlan)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tool::Journal => "Journal",
            Tool::Cravings => "Craving Log",
            Tool::Breathing => "Breathing Exercise",
            Tool::Grounding => "Grounding",
            Tool::Gratitude => "Gratitude List",
            Tool::ThoughtDiary => "Thought Diary",
            Tool::Meditation => "Meditation",
            Tool::Values => "Values Sort",
            Tool::Audit => "AUDIT Screener",
            Tool::Adhd => "ADHD Screener",
            Tool::OppositeAction => "Opposite Action",
            Tool::ProblemSolving => "Problem Solving",
            Tool::Goals => "Goals",
            Tool::SafetyPlan => "Safety Plan",
            Tool::RelapsePlan => "Relapse Prevention Plan",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tool::Journal => "📓",
            Tool::Cravings => "🌊",
            Tool::Breathing => "🌬️",
            Tool::Grounding => "🌳",
            Tool::Gratitude => "🙏",
            Tool::ThoughtDiary => "💭",
            Tool::Meditation => "🧘",
            Tool::Values => "🧭",
            Tool::Audit => "📋",
            Tool::Adhd => "🧠",
            Tool::OppositeAction => "🔄",
            Tool::ProblemSolving => "🧩",
            Tool::Goals => "🎯",
            Tool::SafetyPlan => "🛟",
            Tool::RelapsePlan => "🛡️",
        }
    }

    /// Navigation target of the tool's page.
    pub fn route(&self) -> &'static str {
        match self {
            Tool::Journal => "/journal",
            Tool::Cravings => "/cravings",
            Tool::Breathing => "/breathing",
            Tool::Grounding => "/grounding",
            Tool::Gratitude => "/gratitude",
            Tool::ThoughtDiary => "/thought-diary",
            Tool::Meditation => "/meditation",
            Tool::Values => "/values",
            Tool::Audit => "/audit",
            Tool::Adhd => "/adhd",
            Tool::OppositeAction => "/opposite-action",
            Tool::ProblemSolving => "/problem-solving",
            Tool::Goals => "/goals",
            Tool::SafetyPlan => "/safety-plan",
            Tool::RelapsePlan => "/relapse-prevention",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tools_map_to_distinct_buckets() {
        let buckets: HashSet<Bucket> = Tool::ALL.iter().map(|t| t.bucket()).collect();
        assert_eq!(buckets.len(), Tool::ALL.len());
        assert_eq!(Tool::ALL.iter().filter(|t| t.is_plan()).count(), 2);
    }

    #[test]
    fn test_plan_tools_use_document_buckets() {
        for t in Tool::ALL {
            assert_eq!(t.is_plan(), t.bucket().is_document());
        }
    }
}
