// crates/nlu/src/extract.rs

//! Slot extractors. Each takes normalized text and a read-only view of the
//! dialogue state; none of them writes state.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;
use voxcal_core::{DialogueState, UNTITLED_APPOINTMENT};

use crate::lexicon::{Lexicon, MONTH_NAMES};

const FIXED_TITLES: [&str; 2] = ["doctor", "dentist"];

/// Words that end a free-form title: prepositions and date words.
const TITLE_STOP_WORDS: [&str; 9] = [
    "on", "for", "at", "in", "today", "tomorrow", "next", "this", "from",
];

const LOCATION_NOISE: [&str; 2] = ["appointment", "location"];

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

static IN_PLACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bin\s+(\w+)").unwrap());

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b({})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b",
        MONTH_NAMES.join("|")
    ))
    .unwrap()
});

static TITLE_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"\bappointment\s+titled\s+([\w ]+)").unwrap(),
        Regex::new(r"\bappointment\s+for\s+([\w ]+)").unwrap(),
    ]
});

static NEW_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*\bto\s+([\w ]+?)[\s\p{P}]*$").unwrap());

/// Lowercased word tokens, punctuation dropped.
pub fn words(text: &str) -> Vec<&str> {
    WORD.find_iter(text).map(|m| m.as_str()).collect()
}

fn contains_word(words: &[&str], needle: &str) -> bool {
    words.iter().any(|word| *word == needle)
}

pub fn extract_place(text: &str, state: &DialogueState, lexicon: &Lexicon) -> Option<String> {
    let explicit = IN_PLACE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|candidate| lexicon.is_known_place(candidate));

    if let Some(place) = explicit {
        return Some(place.to_string());
    }

    if let Some(place) = lexicon.places().find(|place| text.contains(place)) {
        return Some(place.to_string());
    }

    state.last_place().map(str::to_string)
}

pub fn extract_day(
    text: &str,
    state: &DialogueState,
    today: NaiveDate,
    lexicon: &Lexicon,
) -> Option<NaiveDate> {
    extract_explicit_day(text, today, lexicon).or_else(|| state.last_day())
}

/// Day named by the text itself, without falling back to dialogue state.
pub fn extract_explicit_day(text: &str, today: NaiveDate, lexicon: &Lexicon) -> Option<NaiveDate> {
    let tokens = words(text);

    if contains_word(&tokens, "today") {
        return Some(today);
    }
    if contains_word(&tokens, "tomorrow") {
        return today.succ_opt();
    }

    if let Some(weekday) = tokens.iter().find_map(|token| lexicon.weekday(token)) {
        return Some(next_weekday(today, weekday));
    }

    if let Some(date) = fuzzy_ordinal_date(&tokens, today, lexicon) {
        return Some(date);
    }

    MONTH_DAY.captures_iter(text).find_map(|caps| {
        let month = lexicon.month_by_name(caps.get(1)?.as_str())?;
        let day = caps.get(2)?.as_str().parse::<u32>().ok()?;
        upcoming_date(today, month, day)
    })
}

/// First date at or after `from` that falls on `weekday`.
pub fn next_weekday(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from + Duration::days(i64::from(ahead))
}

/// `day`.`month` in the current year, or next year once it has passed.
/// `None` for combinations that do not exist.
fn upcoming_date(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if date < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(date)
    }
}

/// An ordinal and a month anywhere in the utterance, in either order.
fn fuzzy_ordinal_date(tokens: &[&str], today: NaiveDate, lexicon: &Lexicon) -> Option<NaiveDate> {
    for (index, token) in tokens.iter().enumerate() {
        let bigram = tokens
            .get(index + 1)
            .map(|next| format!("{} {}", token, next))
            .and_then(|pair| lexicon.ordinal(&pair).map(|day| (day, 2)));

        let Some((day, width)) = bigram.or_else(|| lexicon.ordinal(token).map(|day| (day, 1)))
        else {
            continue;
        };

        let used = index..index + width;
        let date = tokens
            .iter()
            .enumerate()
            .filter(|(position, _)| !used.contains(position))
            .filter_map(|(_, candidate)| lexicon.month(candidate))
            .find_map(|month| upcoming_date(today, month, day));

        if date.is_some() {
            return date;
        }
    }
    None
}

pub fn extract_title(text: &str, lexicon: &Lexicon) -> String {
    let tokens = words(text);
    if let Some(fixed) = FIXED_TITLES.iter().find(|title| contains_word(&tokens, title)) {
        return fixed.to_string();
    }

    TITLE_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(text))
        .filter_map(|caps| caps.get(1))
        .find_map(|m| trim_title(m.as_str(), lexicon))
        .unwrap_or_else(|| UNTITLED_APPOINTMENT.to_string())
}

fn trim_title(raw: &str, lexicon: &Lexicon) -> Option<String> {
    let kept = raw
        .split_whitespace()
        .take_while(|word| {
            !TITLE_STOP_WORDS.contains(word)
                && !lexicon.is_weekday_or_month_name(word)
                && lexicon.ordinal(word).is_none()
        })
        .collect::<Vec<_>>();

    (!kept.is_empty()).then(|| kept.join(" "))
}

pub fn extract_new_location(text: &str) -> Option<String> {
    let caps = NEW_LOCATION.captures(text)?;
    let location = caps
        .get(1)?
        .as_str()
        .split_whitespace()
        .filter(|word| !LOCATION_NOISE.contains(word))
        .collect::<Vec<_>>()
        .join(" ");

    (!location.is_empty()).then_some(location)
}
