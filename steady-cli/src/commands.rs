//! Subcommand handlers that read or write through the tracker.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Args, Subcommand};
use steady_core::store::load_document;
use steady_core::time::parse_local_datetime;
use steady_core::{
    Bucket, BreathingEntry, CravingEntry, GratitudeEntry, GroundingEntry, JournalEntry, MeditationEntry,
    OppositeActionEntry, PlanDocument, ProblemSolvingEntry, ThoughtDiaryEntry, ThoughtRecord, Timestamp, Tracker,
    UserProfile, ValuesEntry,
};
use steady_tools::share::{load_relapse_plan, load_safety_plan};
use steady_tools::{GoalDraft, PlanKind};

use crate::PlanArg;
use crate::state::FileStore;

type AppTracker = Tracker<FileStore>;

#[derive(Subcommand, Debug)]
pub enum LogCommand {
    /// How you feel, and optionally what you used
    Journal {
        feeling: String,
        #[arg(long)]
        substance: Option<String>,
        #[arg(long, default_value = "")]
        amount: String,
        #[arg(long, default_value = "")]
        unit: String,
        #[arg(long)]
        place: Option<String>,
        /// Money spent (or saved), e.g. "12.50"
        #[arg(long)]
        cost: Option<String>,
    },
    /// A craving and how strong it was (0-10)
    Craving {
        intensity: u32,
        #[arg(long)]
        trigger: Option<String>,
        #[arg(long)]
        coping: Option<String>,
    },
    Breathing {
        #[arg(long)]
        pattern: Option<String>,
    },
    Grounding,
    /// Things you are grateful for
    Gratitude {
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// A thought record
    Thought {
        situation: String,
        #[arg(long, default_value = "")]
        thought: String,
        #[arg(long, default_value = "")]
        emotion: String,
        #[arg(long = "distortion")]
        distortions: Vec<String>,
        #[arg(long, default_value = "")]
        evidence_for: String,
        #[arg(long, default_value = "")]
        evidence_against: String,
        #[arg(long, default_value = "")]
        balanced: String,
    },
    Meditation {
        title: String,
        #[arg(long)]
        minutes: u32,
    },
    /// Your top values, most important first (up to 5)
    Values {
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// AUDIT answers, comma separated (10 values)
    Audit {
        #[arg(value_delimiter = ',', required = true)]
        answers: Vec<u8>,
    },
    /// ASRS answers 0-4, comma separated (6 or 18 values)
    Adhd {
        #[arg(value_delimiter = ',', required = true)]
        answers: Vec<u8>,
    },
    OppositeAction {
        emotion: String,
        #[arg(long, default_value = "")]
        urge: String,
        #[arg(long)]
        action: String,
        #[arg(long, default_value = "")]
        commitment: String,
    },
    Problem {
        definition: String,
        #[arg(long = "solution")]
        solutions: Vec<String>,
        #[arg(long, default_value = "")]
        chosen: String,
        #[arg(long, default_value = "")]
        plan: String,
        #[arg(long, default_value = "open")]
        status: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    Add {
        title: String,
        #[arg(long, default_value = "")]
        unit: String,
        #[arg(long, default_value_t = 1.0)]
        target: f64,
        /// YYYY-MM-DD
        #[arg(long)]
        by: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        achievable: String,
        #[arg(long, default_value = "")]
        relevant: String,
    },
    Progress {
        id: String,
        #[arg(default_value_t = 1.0)]
        amount: f64,
    },
    Reflect {
        id: String,
        text: String,
    },
    Delete {
        id: String,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// Replace one section; contacts are given as "Name: phone"
    Set {
        plan: PlanArg,
        section: String,
        values: Vec<String>,
    },
    Show {
        plan: PlanArg,
    },
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    /// Date of birth
    #[arg(long)]
    dob: Option<String>,
    #[arg(long)]
    contact_name: Option<String>,
    #[arg(long)]
    contact_phone: Option<String>,
    #[arg(long)]
    contact_email: Option<String>,
}

fn entry_time(at: Option<&str>, tz: Tz) -> Result<Timestamp> {
    match at {
        Some(local) => parse_local_datetime(local, tz),
        None => Ok(Timestamp::now()),
    }
}

pub fn log_entry(tracker: &mut AppTracker, entry: LogCommand, at: Option<&str>, tz: Tz) -> Result<()> {
    let date = entry_time(at, tz)?;

    match entry {
        LogCommand::Journal {
            feeling,
            substance,
            amount,
            unit,
            place,
            cost,
        } => {
            let mut e = JournalEntry::new(date, feeling);
            if let Some(substance) = substance {
                e = e.with_substance(substance, amount, unit);
            }
            if let Some(place) = place {
                e = e.with_place(place);
            }
            if let Some(cost) = cost {
                e = e.with_cost(cost);
            }
            tracker.append(&e)?;
        }
        LogCommand::Craving {
            intensity,
            trigger,
            coping,
        } => {
            if intensity > 10 {
                bail!("intensity must be between 0 and 10, got {intensity}");
            }
            let mut e = CravingEntry::new(date, intensity);
            if let Some(t) = trigger {
                e = e.with_trigger(t);
            }
            if let Some(c) = coping {
                e = e.with_coping(c);
            }
            tracker.append(&e)?;
        }
        LogCommand::Breathing { pattern } => tracker.append(&BreathingEntry { date, pattern })?,
        LogCommand::Grounding => tracker.append(&GroundingEntry { date })?,
        LogCommand::Gratitude { items } => tracker.append(&GratitudeEntry { date, items })?,
        LogCommand::Thought {
            situation,
            thought,
            emotion,
            distortions,
            evidence_for,
            evidence_against,
            balanced,
        } => tracker.append(&ThoughtDiaryEntry {
            date,
            data: ThoughtRecord {
                situation,
                automatic_thought: thought,
                emotion,
                distortions,
                evidence_for,
                evidence_against,
                balanced_thought: balanced,
            },
        })?,
        LogCommand::Meditation { title, minutes } => tracker.append(&MeditationEntry {
            date,
            title,
            duration: minutes.saturating_mul(60),
        })?,
        LogCommand::Values { values } => {
            if values.len() > 5 {
                bail!("pick at most 5 values, got {}", values.len());
            }
            tracker.append(&ValuesEntry { date, top5: values })?;
        }
        LogCommand::Audit { answers } => {
            let result = steady_tools::score_audit(&answers)?;
            tracker.append(&result.to_entry(date))?;
            println!("AUDIT score {}: {}", result.score, result.zone.label());
            println!("{}", result.zone.guidance());
        }
        LogCommand::Adhd { answers } => {
            let result = steady_tools::score_asrs(&answers)?;
            tracker.append(&result.to_entry(date))?;
            println!("ASRS Part A: {} of 6 items in the shaded range", result.score);
            println!("{}", result.summary());
        }
        LogCommand::OppositeAction {
            emotion,
            urge,
            action,
            commitment,
        } => tracker.append(&OppositeActionEntry {
            date,
            emotion,
            action_urge: urge,
            opposite_action: action,
            commitment,
        })?,
        LogCommand::Problem {
            definition,
            solutions,
            chosen,
            plan,
            status,
        } => tracker.append(&ProblemSolvingEntry {
            id: steady_tools::new_id(),
            date,
            problem_definition: definition,
            solutions,
            chosen_solution: chosen,
            action_plan: plan,
            status,
        })?,
    }

    println!("Saved.");
    Ok(())
}

pub fn goal(tracker: &mut AppTracker, command: GoalCommand, tz: Tz) -> Result<()> {
    match command {
        GoalCommand::Add {
            title,
            unit,
            target,
            by,
            achievable,
            relevant,
        } => {
            let mut draft = GoalDraft::new(title)
                .with_measure(unit, target)
                .with_reasons(achievable, relevant);
            if let Some(day) = by {
                draft = draft.with_target_date(day);
            }
            let goal = steady_tools::create_goal(tracker, draft, Timestamp::now())?;
            println!("Created goal {} ({})", goal.title, goal.id);
            if !goal.relevant_values.is_empty() {
                println!("Linked values: {}", goal.relevant_values.join(", "));
            }
        }
        GoalCommand::Progress { id, amount } => {
            let goal = steady_tools::log_progress(tracker, &id, amount)?;
            println!(
                "{}: {}/{} {} ({:.0}%)",
                goal.title,
                goal.measurable_progress,
                goal.measurable_target,
                goal.measurable_unit,
                goal.progress_ratio() * 100.0
            );
            if goal.is_completed() {
                println!("Goal completed!");
            }
        }
        GoalCommand::Reflect { id, text } => {
            steady_tools::set_reflection(tracker, &id, &text)?;
            println!("Reflection saved.");
        }
        GoalCommand::Delete { id } => {
            let goal = steady_tools::delete_goal(tracker, &id)?;
            println!("Deleted goal {}", goal.title);
        }
        GoalCommand::List => {
            let today = Timestamp::now().local_date(tz);
            let triaged = steady_tools::triage(steady_tools::list_goals(tracker), today);
            for (heading, goals) in [
                ("Active", &triaged.active),
                ("Completed", &triaged.completed),
                ("Not achieved", &triaged.not_achieved),
            ] {
                if goals.is_empty() {
                    continue;
                }
                println!("## {heading}");
                for g in goals {
                    let by = g.target_date.map(|d| format!(" by {d}")).unwrap_or_default();
                    println!(
                        "- {} [{}/{} {}]{by}  ({})",
                        g.title, g.measurable_progress, g.measurable_target, g.measurable_unit, g.id
                    );
                }
            }
        }
    }
    Ok(())
}

pub fn plan(tracker: &mut AppTracker, command: PlanCommand) -> Result<()> {
    match command {
        PlanCommand::Set { plan, section, values } => {
            let filled = match plan {
                PlanArg::Safety => {
                    let p = steady_tools::set_safety_section(tracker, &section, &values)?;
                    format!("{}/{}", p.filled_sections(), p.sections().len())
                }
                PlanArg::Relapse => {
                    let p = steady_tools::set_relapse_section(tracker, &section, &values)?;
                    format!("{}/{}", p.filled_sections(), p.sections().len())
                }
            };
            println!("Saved {section}. Sections filled: {filled}");
        }
        PlanCommand::Show { plan } => {
            let kind = PlanKind::from(plan);
            let text = match plan {
                PlanArg::Safety => steady_tools::render_plan(kind.title(), &load_safety_plan(tracker)),
                PlanArg::Relapse => steady_tools::render_plan(kind.title(), &load_relapse_plan(tracker)),
            };
            println!("{text}");
        }
    }
    Ok(())
}

pub fn profile(tracker: &mut AppTracker, args: ProfileArgs) -> Result<()> {
    let mut p: UserProfile = load_document(tracker.store(), Bucket::UserProfile).unwrap_or_default();

    let fields = [
        (args.username, &mut p.username),
        (args.gender, &mut p.gender),
        (args.dob, &mut p.dob),
        (args.contact_name, &mut p.emergency_contact_name),
        (args.contact_phone, &mut p.emergency_contact_phone),
    ];
    let mut changed = false;
    for (value, field) in fields {
        if let Some(v) = value {
            *field = v.trim().to_string();
            changed = true;
        }
    }
    if let Some(email) = args.contact_email {
        p.emergency_contact_email = Some(email.trim().to_string()).filter(|e| !e.is_empty());
        changed = true;
    }

    if changed {
        tracker.save_profile(&p).context("failed to save profile")?;
    }
    println!(
        "Profile {}",
        if p.is_complete() { "complete" } else { "incomplete" }
    );
    Ok(())
}

pub fn achievements(tracker: &AppTracker, only_unlocked: bool, json: bool) -> Result<()> {
    let mut gallery = tracker.gallery();
    if only_unlocked {
        gallery.entries.retain(|e| e.unlocked);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&gallery)?);
        return Ok(());
    }

    println!(
        "Achievements: {}/{} ({}%)\n",
        gallery.unlocked,
        gallery.total,
        gallery.percent()
    );

    let mut category = None;
    for e in &gallery.entries {
        if category != Some(e.category) {
            category = Some(e.category);
            println!("## {}", e.category.label());
        }
        let mark = if e.unlocked { e.icon } else { "🔒" };
        println!("{mark} {} - {}", e.title, e.description);
    }
    Ok(())
}

pub fn journey(tracker: &AppTracker, limit: usize, tz: Tz, json: bool) -> Result<()> {
    let history = tracker.history();
    if json {
        let page = &history[..limit.min(history.len())];
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }
    if history.is_empty() {
        println!("Nothing logged yet.");
        return Ok(());
    }
    for item in history.iter().take(limit) {
        let local = item.date.as_utc().with_timezone(&tz);
        println!(
            "{}  {} {:<24} {}",
            local.format("%Y-%m-%d %H:%M"),
            item.icon,
            item.title,
            item.description
        );
    }
    if history.len() > limit {
        println!("... and {} more", history.len() - limit);
    }
    Ok(())
}
