// crates/nlu/src/lexicon.rs

//! Fixed word tables, including the misrecognitions the speech recognizer
//! is known to produce. A word that is not in a table is never guessed.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Weekday;

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const FUZZY_ORDINALS: &[(&str, u32)] = &[
    ("first", 1),
    ("1st", 1),
    ("second", 2),
    ("2nd", 2),
    ("sacond", 2),
    ("sagand", 2),
    ("mileage", 2),
    ("much", 2),
    ("third", 3),
    ("3rd", 3),
    ("therd", 3),
    ("fourth", 4),
    ("4th", 4),
    ("fifth", 5),
    ("5th", 5),
    ("fit", 5),
    ("sixth", 6),
    ("6th", 6),
    ("seventh", 7),
    ("7th", 7),
    ("eighth", 8),
    ("8th", 8),
    ("ninth", 9),
    ("9th", 9),
    ("tenth", 10),
    ("10th", 10),
    ("eleventh", 11),
    ("11th", 11),
    ("twelfth", 12),
    ("12th", 12),
    ("twelth", 12),
    ("twelf", 12),
    ("thirteenth", 13),
    ("13th", 13),
    ("fourteenth", 14),
    ("14th", 14),
    ("fifteenth", 15),
    ("15th", 15),
    ("sixteenth", 16),
    ("16th", 16),
    ("seventeenth", 17),
    ("17th", 17),
    ("eighteenth", 18),
    ("18th", 18),
    ("nineteenth", 19),
    ("19th", 19),
    ("twentieth", 20),
    ("20th", 20),
    ("twenty", 20),
    ("twenty first", 21),
    ("21st", 21),
    ("twenty second", 22),
    ("22nd", 22),
    ("twenty third", 23),
    ("23rd", 23),
    ("twenty fourth", 24),
    ("24th", 24),
    ("twenty fifth", 25),
    ("25th", 25),
    ("twenty sixth", 26),
    ("26th", 26),
    ("twenty seventh", 27),
    ("27th", 27),
    ("twenty eighth", 28),
    ("28th", 28),
    ("twenty ninth", 29),
    ("29th", 29),
    ("thirtieth", 30),
    ("30th", 30),
    ("thirty first", 31),
    ("31st", 31),
];

const FUZZY_MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("much", 3),
    ("marge", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

const KNOWN_PLACES: &[&str] = &[
    "marburg",
    "frankfurt",
    "berlin",
    "hamburg",
    "munich",
    "kassel",
    "giessen",
    "gießen",
    "cologne",
    "stuttgart",
    "leipzig",
];

static BUILTIN: LazyLock<Lexicon> = LazyLock::new(Lexicon::build);

#[derive(Debug, Clone)]
pub struct Lexicon {
    ordinals: HashMap<String, u32>,
    months: HashMap<String, u32>,
    places: Vec<String>,
}

impl Lexicon {
    /// The process-wide built-in tables.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    fn build() -> Self {
        Self {
            ordinals: FUZZY_ORDINALS
                .iter()
                .map(|(word, day)| (word.to_string(), *day))
                .collect(),
            months: FUZZY_MONTHS
                .iter()
                .map(|(word, month)| (word.to_string(), *month))
                .collect(),
            places: KNOWN_PLACES.iter().map(|place| place.to_string()).collect(),
        }
    }

    /// Built-in tables plus configured places. Blank and duplicate entries are ignored.
    pub fn with_extra_places<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut lexicon = Self::builtin().clone();
        for place in extra {
            let place = place.as_ref().trim().to_lowercase();
            if !place.is_empty() && !lexicon.places.contains(&place) {
                lexicon.places.push(place);
            }
        }
        lexicon
    }

    pub fn ordinal(&self, token: &str) -> Option<u32> {
        self.ordinals.get(token).copied()
    }

    pub fn month(&self, token: &str) -> Option<u32> {
        self.months.get(token).copied()
    }

    /// Month number for a full, correctly spelled month name.
    pub fn month_by_name(&self, name: &str) -> Option<u32> {
        MONTH_NAMES
            .iter()
            .position(|month| *month == name)
            .map(|index| index as u32 + 1)
    }

    pub fn weekday(&self, token: &str) -> Option<Weekday> {
        WEEKDAYS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, weekday)| *weekday)
    }

    pub fn is_weekday_or_month_name(&self, token: &str) -> bool {
        self.weekday(token).is_some() || MONTH_NAMES.contains(&token)
    }

    pub fn is_known_place(&self, token: &str) -> bool {
        self.places.iter().any(|place| place == token)
    }

    pub fn places(&self) -> impl Iterator<Item = &str> {
        self.places.iter().map(String::as_str)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
