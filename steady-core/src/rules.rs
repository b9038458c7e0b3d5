//! Rule registry: ordered achievement definitions and the gallery view over them.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use crate::notifier::UnlockedSet;
use crate::snapshot::AggregateState;

/// Unlock condition. Must be pure over the snapshot.
pub type Predicate = fn(&AggregateState) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Journal,
    Cravings,
    Mindfulness,
    Insight,
    Planning,
    Engagement,
    Financial,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Journal => "Journal",
            Category::Cravings => "Cravings",
            Category::Mindfulness => "Mindfulness",
            Category::Insight => "Insight",
            Category::Planning => "Planning",
            Category::Engagement => "Engagement",
            Category::Financial => "Financial",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RuleDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: Category,
    pub predicate: Predicate,
}

impl RuleDefinition {
    pub const fn new(
        id: &'static str,
        category: Category,
        icon: &'static str,
        title: &'static str,
        description: &'static str,
        predicate: Predicate,
    ) -> Self {
        Self {
            id,
            title,
            description,
            icon,
            category,
            predicate,
        }
    }
}

/// Ordered, immutable set of rules. IDs are unique.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<RuleDefinition>,
}

impl RuleRegistry {
    /// Build from a list; later duplicates of an ID are dropped.
    pub fn new(rules: Vec<RuleDefinition>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(rules.len());
        for rule in rules {
            if seen.insert(rule.id) {
                kept.push(rule);
            } else {
                warn!(rule = rule.id, "duplicate rule id ignored");
            }
        }
        Self { rules: kept }
    }

    /// The shipped achievement catalog.
    pub fn builtin() -> Self {
        Self::new(crate::catalog::builtin_rules())
    }

    pub fn get(&self, id: &str) -> Option<&RuleDefinition> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every rule with its locked state, in registry order.
    pub fn gallery(&self, unlocked: &UnlockedSet) -> Gallery {
        let entries: Vec<GalleryEntry> = self
            .rules
            .iter()
            .map(|r| GalleryEntry {
                id: r.id,
                title: r.title,
                description: r.description,
                icon: r.icon,
                category: r.category,
                unlocked: unlocked.contains(r.id),
            })
            .collect();
        let unlocked = entries.iter().filter(|e| e.unlocked).count();
        Gallery {
            total: entries.len(),
            unlocked,
            entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: Category,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gallery {
    pub entries: Vec<GalleryEntry>,
    pub unlocked: usize,
    pub total: usize,
}

impl Gallery {
    /// Whole-number percentage unlocked.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.unlocked * 100) / self.total) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &AggregateState) -> bool {
        false
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let reg = RuleRegistry::new(vec![
            RuleDefinition::new("a", Category::Journal, "*", "First", "", never),
            RuleDefinition::new("b", Category::Journal, "*", "B", "", never),
            RuleDefinition::new("a", Category::Journal, "*", "Second", "", never),
        ]);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("a").map(|r| r.title), Some("First"));
    }

    #[test]
    fn test_gallery_marks_unlocked() {
        let reg = RuleRegistry::new(vec![
            RuleDefinition::new("a", Category::Journal, "*", "A", "", never),
            RuleDefinition::new("b", Category::Cravings, "*", "B", "", never),
        ]);
        let unlocked: UnlockedSet = ["b".to_string(), "retired_rule".to_string()].into();
        let g = reg.gallery(&unlocked);
        assert_eq!(g.total, 2);
        assert_eq!(g.unlocked, 1);
        assert!(!g.entries[0].unlocked);
        assert!(g.entries[1].unlocked);
        assert_eq!(g.percent(), 50);
    }
}
