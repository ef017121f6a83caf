use anyhow::Result;
use clap::ValueEnum;
use std::path::{Path, PathBuf};

use crate::enrich::IsoCodeTable;

pub const DEFAULT_BASE_URL: &str = "https://download.geonames.org/export/dump/";

pub const COUNTRY_FILE: &str = "countryInfo.txt";
pub const ADMIN1_FILE: &str = "admin1CodesASCII.txt";

/// Minimum population of the `citiesN` dump to import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CitySize {
    #[value(name = "500")]
    Cities500,
    #[value(name = "1000")]
    Cities1000,
    #[value(name = "5000")]
    Cities5000,
    #[default]
    #[value(name = "15000")]
    Cities15000,
}

impl CitySize {
    pub fn population(self) -> u32 {
        match self {
            CitySize::Cities500 => 500,
            CitySize::Cities1000 => 1000,
            CitySize::Cities5000 => 5000,
            CitySize::Cities15000 => 15000,
        }
    }

    /// `cities15000`
    pub fn file_stem(self) -> String {
        format!("cities{}", self.population())
    }

    pub fn archive_name(self) -> String {
        format!("{}.zip", self.file_stem())
    }

    pub fn text_name(self) -> String {
        format!("{}.txt", self.file_stem())
    }
}

/// What to do when a subdivision code cannot be resolved or a place
/// drops out of the search index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UnresolvedPolicy {
    /// Blank code / silent exclusion
    #[default]
    Ignore,
    /// Same outcome, reported to the operator
    Warn,
    /// Abort the run
    Fail,
}

/// One remote file and where it lands locally
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub url: String,
    pub file_name: String,
}

/// The three dumps a run needs
#[derive(Debug, Clone)]
pub struct Sources {
    pub country: Source,
    pub admin1: Source,
    pub cities: Source,
}

impl Sources {
    pub fn new(base_url: &str, size: CitySize) -> Self {
        let source = |file_name: String| Source {
            url: join_url(base_url, &file_name),
            file_name,
        };

        Self {
            country: source(COUNTRY_FILE.to_string()),
            admin1: source(ADMIN1_FILE.to_string()),
            cities: source(size.archive_name()),
        }
    }

    pub fn all(&self) -> [&Source; 3] {
        [&self.country, &self.admin1, &self.cities]
    }
}

fn join_url(base: &str, file_name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), file_name)
}

/// Second-level code resolution settings; absent when enrichment is off
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub table: IsoCodeTable,
    /// Country whose admin1 codes already are ISO 3166-2 codes
    pub pass_through: String,
}

impl Enrichment {
    /// Bundled table with `US` passed through
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            table: IsoCodeTable::bundled()?,
            pass_through: "US".to_string(),
        })
    }
}

/// Everything a run needs, assembled once from the command line
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding downloaded and extracted dumps
    pub work_dir: PathBuf,
    pub base_url: String,
    pub cities: CitySize,
    pub enrichment: Option<Enrichment>,
    pub unresolved: UnresolvedPolicy,
}

impl PipelineConfig {
    /// Defaults: largest-population dump, enrichment on, unresolved ignored
    pub fn new(work_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            work_dir: work_dir.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cities: CitySize::default(),
            enrichment: Some(Enrichment::bundled()?),
            unresolved: UnresolvedPolicy::default(),
        })
    }

    pub fn sources(&self) -> Sources {
        Sources::new(&self.base_url, self.cities)
    }

    pub fn local_path(&self, file_name: &str) -> PathBuf {
        self.work_dir.join(file_name)
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}
