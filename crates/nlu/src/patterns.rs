// crates/nlu/src/patterns.rs

//! Ordered intent rules. The first rule whose predicate holds decides the
//! intent; there is no scoring. Predicates overlap on purpose, so the order
//! of [`default_rules`] is the priority.

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use tracing::debug;
use voxcal_core::{DialogueState, IntentKind};

use crate::extract::extract_explicit_day;
use crate::lexicon::Lexicon;

const GREETING: &[&str] = &["hello", "hi", "hey", "good morning", "good evening"];
const WELL_BEING: &[&str] = &["how are you", "how are you doing"];
const WEATHER: &[&str] = &[
    "weather",
    "temperature",
    "forecast",
    "whether",
    "rain",
    "raining",
    "rainy",
];
const RAIN: &[&str] = &["rain", "raining", "rainy"];
const DELETE: &[&str] = &["delete", "remove", "cancel"];
const THIS_EVENT: &[&str] = &["this appointment", "this event"];
const PREVIOUS: &[&str] = &["previous", "previously"];
// "and an appointment" is how the recognizer tends to hear "add an appointment".
const CREATE: &[&str] = &["add", "create", "and an appointment"];
const EVENT_NOUN: &[&str] = &["appointment", "meeting", "event"];
const NEXT_EVENT: &[&str] = &["next appointment"];
const UPDATE: &[&str] = &["change", "update"];
const LOCATION_NOUN: &[&str] = &["location", "place"];
const THIS: &[&str] = &["this"];

/// Everything a predicate may look at. Read-only.
pub struct RuleContext<'a> {
    pub text: &'a str,
    pub state: &'a DialogueState,
    pub today: NaiveDate,
    pub lexicon: &'a Lexicon,
}

/// Whole-word (or whole-phrase) keyword alternatives.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    regex: Regex,
}

impl KeywordSet {
    pub fn new(keywords: &[&str]) -> Self {
        let mut variants = keywords.to_vec();
        variants.sort_by(|a, b| b.len().cmp(&a.len()));
        let alternatives = variants
            .into_iter()
            .map(|phrase| {
                phrase
                    .split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect::<Vec<_>>()
            .join("|");

        let regex = RegexBuilder::new(&format!(r"\b(?:{})\b", alternatives))
            .case_insensitive(true)
            .build()
            .expect("escaped keyword alternatives always compile");

        Self { regex }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[derive(Debug, Clone)]
pub enum Predicate {
    Keywords(KeywordSet),
    All(Vec<Predicate>),
    /// The text names a day on its own (no state fallback).
    MentionsDay,
    /// The state holds an event the user was last told about.
    HasReferencedEvent,
}

impl Predicate {
    pub fn keywords(keywords: &[&str]) -> Self {
        Predicate::Keywords(KeywordSet::new(keywords))
    }

    pub fn all_keywords(groups: &[&[&str]]) -> Self {
        Predicate::All(groups.iter().map(|group| Self::keywords(group)).collect())
    }

    pub fn matches(&self, ctx: &RuleContext<'_>) -> bool {
        match self {
            Predicate::Keywords(set) => set.is_match(ctx.text),
            Predicate::All(parts) => parts.iter().all(|part| part.matches(ctx)),
            Predicate::MentionsDay => {
                extract_explicit_day(ctx.text, ctx.today, ctx.lexicon).is_some()
            }
            Predicate::HasReferencedEvent => ctx.state.last_referenced_event_id().is_some(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntentRule {
    pub name: &'static str,
    pub predicate: Predicate,
    pub intent: IntentKind,
}

impl IntentRule {
    fn new(name: &'static str, predicate: Predicate, intent: IntentKind) -> Self {
        Self {
            name,
            predicate,
            intent,
        }
    }
}

/// The rule table, highest priority first.
pub fn default_rules() -> Vec<IntentRule> {
    let update_location = || {
        vec![
            Predicate::keywords(UPDATE),
            Predicate::keywords(LOCATION_NOUN),
        ]
    };
    let with = |mut parts: Vec<Predicate>, extra: Predicate| {
        parts.push(extra);
        Predicate::All(parts)
    };

    vec![
        IntentRule::new("greeting", Predicate::keywords(GREETING), IntentKind::Greeting),
        IntentRule::new(
            "well_being",
            Predicate::keywords(WELL_BEING),
            IntentKind::HowAreYou,
        ),
        IntentRule::new(
            "weather_rain",
            Predicate::all_keywords(&[WEATHER, RAIN]),
            IntentKind::CheckRain,
        ),
        IntentRule::new("weather", Predicate::keywords(WEATHER), IntentKind::GetWeather),
        // Deletion outranks creation: "delete the appointment I added".
        IntentRule::new(
            "delete_this",
            Predicate::all_keywords(&[DELETE, THIS_EVENT]),
            IntentKind::DeleteThisEvent,
        ),
        IntentRule::new(
            "delete_previous",
            Predicate::all_keywords(&[DELETE, PREVIOUS]),
            IntentKind::DeleteLastEvent,
        ),
        IntentRule::new("delete", Predicate::keywords(DELETE), IntentKind::DeleteLastEvent),
        IntentRule::new(
            "create",
            Predicate::all_keywords(&[CREATE, EVENT_NOUN]),
            IntentKind::CreateEvent,
        ),
        IntentRule::new(
            "next_event",
            Predicate::keywords(NEXT_EVENT),
            IntentKind::GetNextEvent,
        ),
        IntentRule::new(
            "update_this",
            with(update_location(), Predicate::keywords(THIS)),
            IntentKind::UpdateThisEventLocation,
        ),
        IntentRule::new(
            "update_for_day",
            with(update_location(), Predicate::MentionsDay),
            IntentKind::UpdateEventLocationForDay,
        ),
        IntentRule::new(
            "update_referenced",
            with(update_location(), Predicate::HasReferencedEvent),
            IntentKind::UpdateThisEventLocation,
        ),
        IntentRule::new(
            "update_unresolved_day",
            Predicate::All(update_location()),
            IntentKind::UpdateEventLocationForDay,
        ),
    ]
}

pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// First matching rule, if any.
    pub fn matching_rule(&self, ctx: &RuleContext<'_>) -> Option<&IntentRule> {
        self.rules.iter().find(|rule| rule.predicate.matches(ctx))
    }

    pub fn classify(&self, ctx: &RuleContext<'_>) -> IntentKind {
        match self.matching_rule(ctx) {
            Some(rule) => {
                debug!(rule = rule.name, intent = %rule.intent, "Intent rule matched");
                rule.intent
            }
            None => {
                debug!("No intent rule matched");
                IntentKind::Unknown
            }
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
