use chrono::NaiveDate;
use steady_core::{EngineConfig, MemoryStore, Timestamp, Tracker, ValuesEntry};
use steady_tools::*;

fn drain_ids(tracker: &mut Tracker<MemoryStore>) -> Vec<String> {
    tracker.dispatch().unwrap();
    std::iter::from_fn(|| tracker.next_toast()).map(|t| t.id).collect()
}

fn at(raw: &str) -> Timestamp {
    Timestamp::parse(raw).unwrap()
}

#[test]
fn test_goal_lifecycle_unlocks_planning_achievements() {
    let mut tracker = Tracker::new(MemoryStore::new(), &EngineConfig::default());
    tracker
        .append(&ValuesEntry {
            date: at("2024-05-01T09:00:00Z"),
            top5: vec!["Health".into()],
        })
        .unwrap();

    let goal = create_goal(
        &mut tracker,
        GoalDraft::new("Walk every evening")
            .with_measure("walks", 2.0)
            .with_target_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
        at("2024-05-02T09:00:00Z"),
    )
    .unwrap();
    assert_eq!(
        drain_ids(&mut tracker),
        vec!["values_1", "goal_1", "goal_values_aligned", "tool_first_use"]
    );

    log_progress(&mut tracker, &goal.id, 1.0).unwrap();
    assert!(drain_ids(&mut tracker).is_empty());

    log_progress(&mut tracker, &goal.id, 1.0).unwrap();
    set_reflection(&mut tracker, &goal.id, "felt good").unwrap();
    assert_eq!(drain_ids(&mut tracker), vec!["goal_completed_1", "goal_reflection"]);

    let history = tracker.history();
    assert_eq!(history[0].description, "Completed goal: Walk every evening");
}

#[test]
fn test_screener_results_feed_history() {
    let mut tracker = Tracker::new(MemoryStore::new(), &EngineConfig::default());

    let audit = score_audit(&[2, 1, 1, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    tracker.append(&audit.to_entry(at("2024-02-01T10:00:00Z"))).unwrap();
    let asrs = score_asrs(&[3, 3, 3, 3, 3, 3]).unwrap();
    tracker.append(&asrs.to_entry(at("2024-02-02T10:00:00Z"))).unwrap();

    assert_eq!(drain_ids(&mut tracker), vec!["audit_1", "adhd_1", "tool_first_use"]);

    let improved = score_audit(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    tracker.append(&improved.to_entry(at("2024-03-01T10:00:00Z"))).unwrap();
    assert_eq!(drain_ids(&mut tracker), vec!["audit_improved"]);

    let lines: Vec<String> = tracker.history().into_iter().map(|h| h.description).collect();
    assert_eq!(
        lines,
        vec![
            "Completed with a score of 1",
            "Completed with a score of 6",
            "Completed with a score of 4",
        ]
    );
}

#[test]
fn test_building_and_sharing_a_full_safety_plan() {
    let mut tracker = Tracker::new(MemoryStore::new(), &EngineConfig::default());
    let sections: [(&str, &[&str]); 7] = [
        ("warningSigns", &["not sleeping"]),
        ("copingStrategies", &["cold water", "music"]),
        ("socialDistractions", &["the gym"]),
        ("helpContacts", &["Alex: 555-0100"]),
        ("professionalContacts", &["Crisis line: 988"]),
        ("safeEnvironment", &["give", "car keys", "to Sam"]),
        ("reasonsForLiving", &["my daughter"]),
    ];

    for (i, (key, values)) in sections.iter().enumerate() {
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        set_safety_section(&mut tracker, key, &values).unwrap();
        let ids = drain_ids(&mut tracker);
        match i {
            0 => assert_eq!(ids, vec!["tool_safety_plan_started", "tool_first_use"]),
            6 => assert_eq!(ids, vec!["tool_safety_plan_full"]),
            _ => assert!(ids.is_empty(), "unexpected unlocks after {key}: {ids:?}"),
        }
    }

    let text = share_plan(&mut tracker, PlanKind::Safety).unwrap();
    assert!(text.contains("  give car keys to Sam\n"));
    assert!(text.contains("  - Crisis line: 988\n"));
    assert_eq!(drain_ids(&mut tracker), vec!["share_safety_plan"]);
}
