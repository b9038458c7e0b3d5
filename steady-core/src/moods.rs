//! Feeling-wheel lookup: maps a logged feeling word to its core mood group.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoodGroup {
    Joyful,
    Powerful,
    Peaceful,
    Sad,
    Mad,
    Scared,
}

impl MoodGroup {
    pub const ALL: [MoodGroup; 6] = [
        MoodGroup::Joyful,
        MoodGroup::Powerful,
        MoodGroup::Peaceful,
        MoodGroup::Sad,
        MoodGroup::Mad,
        MoodGroup::Scared,
    ];
}

static WHEEL: [(MoodGroup, &[&str]); 6] = [
    (
        MoodGroup::Joyful,
        &[
            "joyful", "happy", "excited", "energetic", "cheerful", "creative", "hopeful",
            "playful", "amused", "daring", "optimistic", "delighted",
        ],
    ),
    (
        MoodGroup::Powerful,
        &[
            "powerful", "proud", "confident", "respected", "appreciated", "important",
            "successful", "valuable", "worthwhile", "faithful", "aware", "strong",
        ],
    ),
    (
        MoodGroup::Peaceful,
        &[
            "peaceful", "calm", "content", "relaxed", "serene", "secure", "thankful",
            "grateful", "trusting", "loving", "thoughtful", "nurturing",
        ],
    ),
    (
        MoodGroup::Sad,
        &[
            "sad", "tired", "bored", "lonely", "depressed", "ashamed", "guilty", "isolated",
            "apathetic", "remorseful", "hopeless", "empty",
        ],
    ),
    (
        MoodGroup::Mad,
        &[
            "mad", "angry", "hurt", "hostile", "frustrated", "irritated", "furious", "jealous",
            "critical", "resentful", "annoyed", "bitter",
        ],
    ),
    (
        MoodGroup::Scared,
        &[
            "scared", "anxious", "afraid", "confused", "rejected", "helpless", "insecure",
            "overwhelmed", "embarrassed", "inadequate", "nervous", "worried",
        ],
    ),
];

static FEELING_TO_GROUP: LazyLock<HashMap<&'static str, MoodGroup>> = LazyLock::new(|| {
    WHEEL
        .iter()
        .flat_map(|(group, words)| words.iter().map(move |w| (*w, *group)))
        .collect()
});

/// Core group of a feeling word, case-insensitively. Unknown words have none.
pub fn mood_group(feeling: &str) -> Option<MoodGroup> {
    FEELING_TO_GROUP
        .get(feeling.trim().to_lowercase().as_str())
        .copied()
}

/// Distinct groups represented by a set of feelings.
pub fn mood_coverage<'a>(feelings: impl IntoIterator<Item = &'a str>) -> BTreeSet<MoodGroup> {
    feelings.into_iter().filter_map(mood_group).collect()
}
