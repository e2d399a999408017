use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkywriterError};

/// Category returned when no pattern matches.
pub const UNKNOWN_SERIES: &str = "Unknown";

/// Built-in series patterns, most specific category first.
///
/// Crossover lines precede the games their fighters come from so that, for
/// example, "Mario (Super Smash Bros.)" is filed under Smash rather than Mario.
/// Reordering entries changes classification results.
const REFERENCE: &[(&str, &[&str])] = &[
    (
        "Super Smash Bros.",
        &[
            r"mario", r"luigi", r"peach", r"bowser", r"yoshi", r"rosalina",
            r"donkey kong", r"diddy kong", r"link", r"zelda", r"sheik", r"ganondorf",
            r"toon link", r"samus", r"zero suit samus", r"pit", r"palutena",
            r"marth", r"ike", r"robin", r"lucina", r"roy", r"corrin",
            r"kirby", r"king dedede", r"meta knight", r"fox", r"falco", r"wolf",
            r"pikachu", r"charizard", r"lucario", r"greninja", r"jigglypuff",
            r"ness", r"lucas", r"captain falcon", r"villager", r"olimar",
            r"wii fit trainer", r"little mac", r"shulk", r"duck hunt",
            r"pac-man", r"mega man", r"sonic", r"mii", r"r.o.b.", r"game & watch",
            r"dr. mario", r"dark pit", r"bowser jr", r"ryu", r"cloud", r"bayonetta",
            r"inkling", r"ridley", r"king k. rool", r"isabelle", r"ken",
            r"incineroar", r"piranha plant", r"joker", r"hero", r"banjo",
            r"terry", r"byleth", r"min min", r"steve", r"sephiroth",
            r"pyra", r"mythra", r"kazuya", r"sora",
        ],
    ),
    (
        "The Legend of Zelda",
        &[
            r"link", r"zelda", r"ganondorf", r"guardian", r"bokoblin",
            r"mipha", r"daruk", r"revali", r"urbosa", r"loftwing",
            r"ocarina", r"majora", r"wind waker", r"twilight", r"skyward",
            r"awakening", r"8-bit", r"wolf link",
        ],
    ),
    (
        "Mario",
        &[
            r"mario", r"luigi", r"peach", r"bowser", r"yoshi", r"rosalina",
            r"toad", r"daisy", r"wario", r"waluigi", r"donkey kong",
            r"diddy kong", r"boo", r"koopa", r"goomba", r"shy guy",
        ],
    ),
    (
        "Animal Crossing",
        &[
            r"\[AC\]", r"tom nook", r"isabelle", r"k.k. slider", r"resetti",
            r"digby", r"lottie", r"mabel", r"celeste", r"kicks", r"labelle",
            r"reese", r"cyrus", r"timmy", r"tommy", r"blathers",
            r"kapp'n", r"rover", r"sable", r"harriet", r"pascal", r"copper",
            r"booker", r"phineas", r"pelly", r"phyllis", r"pete", r"porter",
            r"wendell", r"gulliver", r"redd", r"katrina", r"gracie", r"tortimer",
            r"dr. shrunk", r"don", r"joan", r"leilani", r"ena", r"rio",
        ],
    ),
    ("Kirby", &[r"kirby", r"meta knight", r"king dedede", r"waddle dee"]),
    (
        "Pokemon",
        &[
            r"pikachu", r"charizard", r"lucario", r"greninja", r"jigglypuff",
            r"mewtwo", r"eevee", r"pokemon trainer",
        ],
    ),
    ("Splatoon", &[r"inkling", r"squid", r"octoling"]),
    (
        "Fire Emblem",
        &[r"marth", r"ike", r"robin", r"lucina", r"roy", r"corrin", r"byleth"],
    ),
    ("Metroid", &[r"samus", r"zero suit", r"metroid"]),
    ("Yoshi", &[r"yarn yoshi", r"yoshi", r"poochy"]),
    ("Monster Hunter", &[r"monster hunter", r"rathalos", r"rathian"]),
    ("Shovel Knight", &[r"shovel knight"]),
    ("BoxBoy!", &[r"qbby", r"boxboy"]),
    ("Mega Man", &[r"mega man"]),
    ("Sonic", &[r"sonic"]),
    ("Pac-Man", &[r"pac-man", r"pacman"]),
    ("Bayonetta", &[r"bayonetta"]),
    ("Dark Souls", &[r"dark souls", r"solaire"]),
    ("Diablo", &[r"diablo", r"lich king"]),
    ("Skylanders", &[r"skylanders"]),
];

/// One category and the patterns that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub series: String,
    /// Case-insensitive regular expressions, tried in order.
    pub patterns: Vec<String>,
}

/// Ordered category table for first-match-wins classification.
///
/// Serializes as a plain JSON array; array order is declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesTable {
    entries: Vec<SeriesEntry>,
}

impl SeriesTable {
    #[must_use]
    pub fn new(entries: Vec<SeriesEntry>) -> Self {
        Self { entries }
    }

    /// The built-in table shipped with the asset pipeline.
    #[must_use]
    pub fn reference() -> Self {
        Self::new(
            REFERENCE
                .iter()
                .map(|(series, patterns)| SeriesEntry {
                    series: (*series).to_string(),
                    patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
                })
                .collect(),
        )
    }

    /// Parses a table from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns `SkywriterError::Json` if `json` is not an array of
    /// `{"series", "patterns"}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SkywriterError::MalformedPath` if the file cannot be read, or
    /// `SkywriterError::Json` if its content is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| {
            SkywriterError::MalformedPath {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_json(&json)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SeriesEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SeriesTable {
    fn default() -> Self {
        Self::reference()
    }
}
