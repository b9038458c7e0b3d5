//! Achievement evaluation: which rules became true that were not unlocked before.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, warn};

use crate::notifier::UnlockedSet;
use crate::rules::{RuleDefinition, RuleRegistry};
use crate::snapshot::AggregateState;

/// Newly satisfied rule IDs, in registry order.
///
/// Rules in `previously_unlocked` are skipped without running their predicate.
/// A predicate that panics counts as unsatisfied for this pass.
pub fn evaluate(
    registry: &RuleRegistry,
    state: &AggregateState,
    previously_unlocked: &UnlockedSet,
) -> Vec<&'static str> {
    let newly: Vec<&'static str> = registry
        .iter()
        .filter(|rule| !previously_unlocked.contains(rule.id))
        .filter(|rule| check(rule, state))
        .map(|rule| rule.id)
        .collect();

    debug!(rules = registry.len(), unlocked = newly.len(), "evaluated rules");
    newly
}

fn check(rule: &RuleDefinition, state: &AggregateState) -> bool {
    match catch_unwind(AssertUnwindSafe(|| (rule.predicate)(state))) {
        Ok(satisfied) => satisfied,
        Err(_) => {
            warn!(rule = rule.id, "predicate panicked, treating as not satisfied");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CravingEntry, JournalEntry};
    use crate::rules::Category;
    use crate::time::Timestamp;

    fn always(_: &AggregateState) -> bool {
        true
    }

    fn boom(_: &AggregateState) -> bool {
        panic!("predicate bug")
    }

    fn registry() -> RuleRegistry {
        RuleRegistry::new(vec![
            RuleDefinition::new("a", Category::Journal, "*", "A", "", always),
            RuleDefinition::new("broken", Category::Journal, "*", "Broken", "", boom),
            RuleDefinition::new("b", Category::Journal, "*", "B", "", always),
        ])
    }

    #[test]
    fn test_panicking_predicate_fails_closed() {
        let newly = evaluate(&registry(), &AggregateState::default(), &UnlockedSet::new());
        assert_eq!(newly, vec!["a", "b"]);
    }

    #[test]
    fn test_already_unlocked_rules_are_skipped() {
        let prev: UnlockedSet = ["a".to_string()].into();
        let newly = evaluate(&registry(), &AggregateState::default(), &prev);
        assert_eq!(newly, vec!["b"]);
    }

    #[test]
    fn test_second_pass_with_merged_set_is_empty() {
        let reg = RuleRegistry::builtin();
        let ts = Timestamp::parse("2024-01-01T06:00:00Z").unwrap();
        let state = AggregateState {
            journal: vec![JournalEntry::new(ts, "Happy").with_cost("150")],
            cravings: vec![CravingEntry::new(ts, 5)],
            ..AggregateState::default()
        };
        let mut unlocked = UnlockedSet::new();
        let first = evaluate(&reg, &state, &unlocked);
        assert!(first.contains(&"early_bird"));
        assert!(first.contains(&"financial_100"));
        unlocked.extend(first.iter().map(|id| id.to_string()));
        assert!(evaluate(&reg, &state, &unlocked).is_empty());
    }
}
