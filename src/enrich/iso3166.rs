use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const BUNDLED: &str = include_str!("../../data/admin1_iso3166_2.json");

/// Per-country `admin1 code -> ISO 3166-2 subdivision code` reference table.
///
/// Stored as JSON: `{"CA": {"01": "AB", ...}, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct IsoCodeTable {
    countries: BTreeMap<String, BTreeMap<String, String>>,
}

/// How a division key got its subdivision code
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Found in the reference table
    Mapped(String),
    /// Admin1 code taken verbatim
    PassThrough(String),
    Unresolved,
}

impl Resolution {
    /// Value stored in `admin1.iso3166_2`
    pub fn code(&self) -> &str {
        match self {
            Resolution::Mapped(code) | Resolution::PassThrough(code) => code,
            Resolution::Unresolved => "",
        }
    }
}

impl IsoCodeTable {
    /// Table shipped with the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED).context("Bundled ISO 3166-2 table is corrupt")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid ISO 3166-2 reference table")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ISO 3166-2 table: {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("In {:?}", path))
    }

    pub fn insert(&mut self, country: &str, admin1: &str, code: &str) {
        self.countries
            .entry(country.to_string())
            .or_default()
            .insert(admin1.to_string(), code.to_string());
    }

    pub fn lookup(&self, country: &str, admin1: &str) -> Option<&str> {
        self.countries
            .get(country)
            .and_then(|codes| codes.get(admin1))
            .map(String::as_str)
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.countries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a `<country>.<admin1>` key.
    ///
    /// Table entries win, then the pass-through country, otherwise unresolved.
    pub fn resolve(&self, key: &str, pass_through: &str) -> Resolution {
        let Some((country, admin1)) = key.split_once('.') else {
            return Resolution::Unresolved;
        };

        if let Some(code) = self.lookup(country, admin1) {
            Resolution::Mapped(code.to_string())
        } else if country == pass_through {
            Resolution::PassThrough(admin1.to_string())
        } else {
            Resolution::Unresolved
        }
    }
}
