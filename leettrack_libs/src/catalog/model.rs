use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unknown,
}

impl Difficulty {
    /// Case-insensitive match against EASY/MEDIUM/HARD. Anything else is `Unknown`.
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "EASY" => Difficulty::Easy,
            "MEDIUM" => Difficulty::Medium,
            "HARD" => Difficulty::Hard,
            _ => Difficulty::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Difficulty::normalize(s))
    }
}

/// One practice question of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub acceptance: String,
    pub frequency: String,
    pub url: String,
    pub company: String,
    pub topics: String,
}

/// Top-level category of the dataset (a company directory).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub name: String,
    pub path: String,
}

/// A time-windowed CSV export inside a company directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemFile {
    pub name: String,
    pub path: String,
    pub download_url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Dir,
    File,
    #[serde(other)]
    Other,
}

/// Entry of the hierarchical content listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub download_url: Option<String>,
}

impl ContentEntry {
    pub fn is_company(&self) -> bool {
        self.entry_type == EntryType::Dir && !self.name.starts_with('.')
    }

    pub fn is_csv(&self) -> bool {
        self.name.ends_with(".csv")
    }
}

impl From<ContentEntry> for Company {
    fn from(entry: ContentEntry) -> Self {
        Company {
            name: entry.name,
            path: entry.path,
        }
    }
}

impl From<ContentEntry> for ProblemFile {
    fn from(entry: ContentEntry) -> Self {
        let name = entry
            .name
            .strip_suffix(".csv")
            .map(String::from)
            .unwrap_or(entry.name);

        ProblemFile {
            name,
            path: entry.path,
            download_url: entry.download_url.unwrap_or_default(),
        }
    }
}
