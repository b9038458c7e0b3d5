//! Plan documents: the safety plan and the relapse-prevention plan.
//!
//! A plan is one object per kind, wholesale-replaced on save. Completeness is
//! measured in sections; a section counts once it holds non-blank content.

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::store::Bucket;

/// A person to reach out to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub phone: String,
}

impl Contact {
    pub fn new(id: impl Into<String>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.phone.trim().is_empty()
    }
}

/// Borrowed view of one plan section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section<'a> {
    Text(&'a str),
    List(&'a [String]),
    Contacts(&'a [Contact]),
}

impl Section<'_> {
    pub fn is_filled(&self) -> bool {
        match self {
            Section::Text(s) => !s.trim().is_empty(),
            Section::List(items) => items.iter().any(|i| !i.trim().is_empty()),
            Section::Contacts(contacts) => contacts.iter().any(|c| !c.is_blank()),
        }
    }
}

/// Common behaviour of the plan documents.
pub trait PlanDocument {
    const BUCKET: Bucket;
    /// Filled sections needed to count as complete.
    const FULL_THRESHOLD: usize;

    /// `(key, heading, content)` in display order.
    fn sections(&self) -> Vec<(&'static str, &'static str, Section<'_>)>;

    fn filled_sections(&self) -> usize {
        self.sections().iter().filter(|(_, _, s)| s.is_filled()).count()
    }

    fn is_started(&self) -> bool {
        self.filled_sections() > 0
    }

    fn is_complete(&self) -> bool {
        self.filled_sections() >= Self::FULL_THRESHOLD
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyPlan {
    #[serde(deserialize_with = "lenient::list")]
    pub warning_signs: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub coping_strategies: Vec<String>,
    /// People and places that provide distraction.
    #[serde(deserialize_with = "lenient::list")]
    pub social_distractions: Vec<String>,
    #[serde(deserialize_with = "lenient::entries")]
    pub help_contacts: Vec<Contact>,
    #[serde(deserialize_with = "lenient::entries")]
    pub professional_contacts: Vec<Contact>,
    #[serde(deserialize_with = "lenient::text")]
    pub safe_environment: String,
    #[serde(deserialize_with = "lenient::text")]
    pub reasons_for_living: String,
}

impl PlanDocument for SafetyPlan {
    const BUCKET: Bucket = Bucket::SafetyPlan;
    const FULL_THRESHOLD: usize = 7;

    fn sections(&self) -> Vec<(&'static str, &'static str, Section<'_>)> {
        vec![
            ("warningSigns", "Warning signs", Section::List(&self.warning_signs)),
            ("copingStrategies", "Things I can do on my own", Section::List(&self.coping_strategies)),
            ("socialDistractions", "People and places that distract me", Section::List(&self.social_distractions)),
            ("helpContacts", "People I can ask for help", Section::Contacts(&self.help_contacts)),
            ("professionalContacts", "Professionals I can contact", Section::Contacts(&self.professional_contacts)),
            ("safeEnvironment", "Making my environment safe", Section::Text(&self.safe_environment)),
            ("reasonsForLiving", "My reasons for living", Section::Text(&self.reasons_for_living)),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelapsePreventionPlan {
    #[serde(deserialize_with = "lenient::list")]
    pub triggers: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub warning_signs: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub coping_strategies: Vec<String>,
    #[serde(deserialize_with = "lenient::entries")]
    pub support_contacts: Vec<Contact>,
    #[serde(deserialize_with = "lenient::text")]
    pub lifestyle_changes: String,
    #[serde(deserialize_with = "lenient::text")]
    pub emergency_plan: String,
}

impl PlanDocument for RelapsePreventionPlan {
    const BUCKET: Bucket = Bucket::RelapsePreventionPlan;
    const FULL_THRESHOLD: usize = 6;

    fn sections(&self) -> Vec<(&'static str, &'static str, Section<'_>)> {
        vec![
            ("triggers", "My triggers", Section::List(&self.triggers)),
            ("warningSigns", "Early warning signs", Section::List(&self.warning_signs)),
            ("copingStrategies", "Coping strategies", Section::List(&self.coping_strategies)),
            ("supportContacts", "My support network", Section::Contacts(&self.support_contacts)),
            ("lifestyleChanges", "Lifestyle changes", Section::Text(&self.lifestyle_changes)),
            ("emergencyPlan", "If I slip", Section::Text(&self.emergency_plan)),
        ]
    }
}
