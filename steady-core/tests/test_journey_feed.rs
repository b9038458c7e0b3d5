use chrono_tz::Tz;
use steady_core::store::prepend_record;
use steady_core::*;

fn ts(raw: &str) -> Timestamp {
    Timestamp::parse(raw).unwrap()
}

#[test]
fn test_feed_merges_newest_first() {
    let mut store = MemoryStore::new();
    prepend_record(&mut store, &JournalEntry::new(ts("2024-01-01"), "Calm")).unwrap();
    prepend_record(&mut store, &CravingEntry::new(ts("2024-01-02"), 7)).unwrap();

    let feed = unified_history_from_store(&store, Tz::UTC);
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].tool, Tool::Cravings);
    assert_eq!(feed[0].description, "Craving at intensity 7/10");
    assert_eq!(feed[0].navigate_target, "/cravings");
    assert_eq!(feed[1].description, "Logged feeling: Calm");
}

#[test]
fn test_feed_reads_raw_form_data() {
    let store = MemoryStore::new()
        .with_raw(
            Bucket::Audit,
            r#"[{"score":"14","date":"2024-03-05T09:00:00.000Z"},{"score":22,"date":"2024-02-01T09:00:00.000Z"}]"#,
        )
        .with_raw(
            Bucket::ProblemSolving,
            r#"[{"id":"p1","date":"2024-03-04T09:00:00.000Z","problemDefinition":"late rent","status":"solved"}]"#,
        )
        .with_raw(Bucket::Gratitude, r#"[{"date":"2024-03-06T09:00:00Z","items":["sun","", "tea"]}]"#)
        .with_raw(Bucket::Values, "not json at all");

    let feed = unified_history_from_store(&store, Tz::UTC);
    let lines: Vec<&str> = feed.iter().map(|i| i.description.as_str()).collect();
    assert_eq!(
        lines,
        vec![
            "Listed 2 things to be grateful for",
            "Completed with a score of 14",
            "Solved: late rent",
            "Completed with a score of 22",
        ]
    );
}

#[test]
fn test_equal_timestamps_keep_tool_order() {
    let same = ts("2024-04-01T10:00:00Z");
    let state = AggregateState {
        grounding: vec![GroundingEntry { date: same }],
        journal: vec![JournalEntry::new(same, "Proud")],
        breathing: vec![BreathingEntry { date: same, pattern: Some("box".into()) }],
        ..AggregateState::default()
    };
    let tools: Vec<Tool> = build_unified_history(&state).iter().map(|i| i.tool).collect();
    assert_eq!(tools, vec![Tool::Journal, Tool::Breathing, Tool::Grounding]);
}

#[test]
fn test_empty_store_yields_empty_feed() {
    assert!(unified_history_from_store(&MemoryStore::new(), Tz::UTC).is_empty());
}

#[test]
fn test_feed_serializes_camel_case() {
    let state = AggregateState {
        journal: vec![JournalEntry::new(ts("2024-01-01T08:00:00Z"), "Hopeful")],
        ..AggregateState::default()
    };
    let json = serde_json::to_value(build_unified_history(&state)).unwrap();
    assert_eq!(json[0]["navigateTarget"], "/journal");
    assert_eq!(json[0]["tool"], "journal");
    assert_eq!(json[0]["date"], "2024-01-01T08:00:00.000Z");
}
