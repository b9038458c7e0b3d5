//! Plan editing and plain-text sharing.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use steady_core::store::{load_document, set_document_field};
use steady_core::{Contact, PlanDocument, RecordStore, RelapsePreventionPlan, SafetyPlan, Section, Tracker};

use crate::new_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    Safety,
    RelapsePrevention,
}

impl PlanKind {
    pub fn title(&self) -> &'static str {
        match self {
            PlanKind::Safety => "My Safety Plan",
            PlanKind::RelapsePrevention => "My Relapse Prevention Plan",
        }
    }

    /// Event recorded when the plan is shared.
    pub fn share_event(&self) -> &'static str {
        match self {
            PlanKind::Safety => "share_safety_plan",
            PlanKind::RelapsePrevention => "share_relapse_plan",
        }
    }
}

pub fn load_safety_plan<S: RecordStore>(tracker: &Tracker<S>) -> SafetyPlan {
    load_document(tracker.store(), SafetyPlan::BUCKET).unwrap_or_default()
}

pub fn load_relapse_plan<S: RecordStore>(tracker: &Tracker<S>) -> RelapsePreventionPlan {
    load_document(tracker.store(), RelapsePreventionPlan::BUCKET).unwrap_or_default()
}

/// Parse `"Name: phone"` (phone optional) into a contact.
pub fn parse_contact(raw: &str) -> Contact {
    let (name, phone) = raw.split_once(':').unwrap_or((raw, ""));
    Contact::new(new_id(), name.trim(), phone.trim())
}

fn contacts(values: &[String]) -> Vec<Contact> {
    values.iter().map(|v| parse_contact(v)).collect()
}

fn list(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).collect()
}

fn text(values: &[String]) -> String {
    values.join(" ").trim().to_string()
}

/// Stored form of one section, shaped by the section's kind.
fn section_value<P: PlanDocument>(plan: &P, key: &str, values: &[String]) -> Result<Value> {
    let kind = plan.sections().into_iter().find(|(k, _, _)| *k == key).map(|(_, _, s)| s);
    Ok(match kind {
        Some(Section::List(_)) => serde_json::to_value(list(values))?,
        Some(Section::Contacts(_)) => serde_json::to_value(contacts(values))?,
        Some(Section::Text(_)) => Value::String(text(values)),
        None => {
            let keys: Vec<&str> = plan.sections().iter().map(|(k, _, _)| *k).collect();
            bail!("unknown section '{key}' (expected one of: {})", keys.join(", "));
        }
    })
}

/// Replace one section of a plan. Only that key is rewritten; the rest of the
/// stored object stays as it was.
fn set_section<P: PlanDocument + Default, S: RecordStore>(
    tracker: &mut Tracker<S>,
    key: &str,
    values: &[String],
) -> Result<()> {
    let value = section_value(&P::default(), key, values)?;
    tracker
        .mutate(|store| set_document_field(store, P::BUCKET, key, &value))
        .with_context(|| format!("failed to save {key}"))
}

pub fn set_safety_section<S: RecordStore>(tracker: &mut Tracker<S>, key: &str, values: &[String]) -> Result<SafetyPlan> {
    set_section::<SafetyPlan, _>(tracker, key, values)?;
    Ok(load_safety_plan(tracker))
}

pub fn set_relapse_section<S: RecordStore>(
    tracker: &mut Tracker<S>,
    key: &str,
    values: &[String],
) -> Result<RelapsePreventionPlan> {
    set_section::<RelapsePreventionPlan, _>(tracker, key, values)?;
    Ok(load_relapse_plan(tracker))
}

/// Plain-text rendering; empty sections are left out.
pub fn render_plan<P: PlanDocument>(title: &str, plan: &P) -> String {
    let mut out = format!("{title}\n{}\n", "=".repeat(title.chars().count()));
    for (_, heading, section) in plan.sections() {
        if !section.is_filled() {
            continue;
        }
        out.push('\n');
        out.push_str(heading);
        out.push_str(":\n");
        match section {
            Section::Text(s) => {
                out.push_str("  ");
                out.push_str(s.trim());
                out.push('\n');
            }
            Section::List(items) => {
                for item in items.iter().filter(|i| !i.trim().is_empty()) {
                    out.push_str(&format!("  - {}\n", item.trim()));
                }
            }
            Section::Contacts(people) => {
                for c in people.iter().filter(|c| !c.is_blank()) {
                    if c.phone.trim().is_empty() {
                        out.push_str(&format!("  - {}\n", c.name.trim()));
                    } else {
                        out.push_str(&format!("  - {}: {}\n", c.name.trim(), c.phone.trim()));
                    }
                }
            }
        }
    }
    out
}

/// Render a plan for sharing and record the share event.
pub fn share_plan<S: RecordStore>(tracker: &mut Tracker<S>, kind: PlanKind) -> Result<String> {
    let rendered = match kind {
        PlanKind::Safety => {
            let plan = load_safety_plan(tracker);
            if !plan.is_started() {
                bail!("the safety plan is empty; add a section before sharing");
            }
            render_plan(kind.title(), &plan)
        }
        PlanKind::RelapsePrevention => {
            let plan = load_relapse_plan(tracker);
            if !plan.is_started() {
                bail!("the relapse prevention plan is empty; add a section before sharing");
            }
            render_plan(kind.title(), &plan)
        }
    };
    tracker
        .record_event(kind.share_event())
        .context("failed to record share event")?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use steady_core::{EngineConfig, MemoryStore};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_contact() {
        let c = parse_contact("Dr. Lee: 555-0101");
        assert_eq!(c.name, "Dr. Lee");
        assert_eq!(c.phone, "555-0101");
        assert!(!c.id.is_empty());
        assert_eq!(parse_contact("Sam").phone, "");
    }

    #[test]
    fn test_render_skips_empty_sections() {
        let plan = SafetyPlan {
            warning_signs: strings(&["isolating", " "]),
            help_contacts: vec![Contact::new("1", "Alex", "555-0100")],
            reasons_for_living: "my kids".into(),
            ..SafetyPlan::default()
        };
        let text = render_plan("My Safety Plan", &plan);
        assert!(text.starts_with("My Safety Plan\n=============="));
        assert!(text.contains("Warning signs:\n  - isolating\n"));
        assert!(text.contains("  - Alex: 555-0100\n"));
        assert!(!text.contains("Things I can do on my own"));
    }

    #[test]
    fn test_set_section_rejects_unknown_key() {
        let mut t = Tracker::new(MemoryStore::new(), &EngineConfig::default());
        let err = set_safety_section(&mut t, "hobbies", &strings(&["chess"])).unwrap_err();
        assert!(err.to_string().contains("warningSigns"));
    }

    #[test]
    fn test_editing_a_section_keeps_the_rest_of_the_stored_plan() {
        let store = MemoryStore::new().with_raw(
            SafetyPlan::BUCKET,
            r#"{"warningSigns":"not sleeping","reasonsForLiving":"my kids","drawing":{"v":2}}"#,
        );
        let mut t = Tracker::new(store, &EngineConfig::default());

        let plan = set_safety_section(&mut t, "helpContacts", &strings(&["Alex: 555-0100"])).unwrap();
        assert_eq!(plan.warning_signs, vec!["not sleeping"]);
        assert_eq!(plan.reasons_for_living, "my kids");
        assert_eq!(plan.help_contacts[0].name, "Alex");
        assert_eq!(plan.filled_sections(), 3);

        let raw = t.store().read(SafetyPlan::BUCKET).unwrap().unwrap();
        let raw: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(raw["drawing"]["v"], 2);
        assert_eq!(raw["warningSigns"], "not sleeping");
    }

    #[test]
    fn test_share_requires_content_and_records_event() {
        let mut t = Tracker::new(MemoryStore::new(), &EngineConfig::default());
        assert!(share_plan(&mut t, PlanKind::Safety).is_err());

        set_safety_section(&mut t, "warningSigns", &strings(&["skipping meals"])).unwrap();
        let text = share_plan(&mut t, PlanKind::Safety).unwrap();
        assert!(text.contains("skipping meals"));
        assert!(t.snapshot().has_event("share_safety_plan"));
    }
}
