use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{CitySize, Enrichment, PipelineConfig, UnresolvedPolicy, DEFAULT_BASE_URL};
use crate::enrich::IsoCodeTable;

#[derive(Parser, Debug)]
#[command(name = "geonames-to-sqlite")]
#[command(version, about = "Import GeoNames dumps into a searchable SQLite database")]
pub struct Cli {
    /// Full-screen progress view instead of plain output
    #[arg(long, global = true)]
    pub tui: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download (if needed) and build the database
    Sync {
        /// Output SQLite database path
        #[arg(default_value = "geonames.db")]
        output_db: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Download and extract the dumps only
    Download {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Build the database from dumps already on disk
    Import {
        /// Directory containing countryInfo.txt, admin1CodesASCII.txt and citiesN.txt
        input_dir: PathBuf,

        /// Output SQLite database path
        #[arg(default_value = "geonames.db")]
        output_db: PathBuf,

        /// Cities dump to load
        #[arg(long, value_enum, default_value_t = CitySize::Cities15000)]
        cities: CitySize,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Print the source URLs for a dataset size
    ListSources {
        #[arg(long, value_enum, default_value_t = CitySize::Cities15000)]
        cities: CitySize,

        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
}

/// Where the dumps come from and where they are kept
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Cities dump to fetch (minimum population)
    #[arg(long, value_enum, default_value_t = CitySize::Cities15000)]
    pub cities: CitySize,

    /// Custom cache directory
    #[arg(short, long)]
    pub cache_dir: Option<PathBuf>,

    /// Distribution point of the dumps
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// HTTP timeout per download, in seconds (default: none)
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl SourceArgs {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

/// How the loaded tables are post-processed
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Skip ISO 3166-2 resolution; display names use the raw admin1 code
    #[arg(long)]
    pub no_iso3166_2: bool,

    /// JSON table {"CC": {"admin1": "code"}} replacing the bundled one
    #[arg(long, conflicts_with = "no_iso3166_2")]
    pub iso_codes: Option<PathBuf>,

    /// Country whose admin1 codes are used verbatim
    #[arg(long, default_value = "US")]
    pub pass_through: String,

    /// Unresolved subdivision codes and unsearchable places
    #[arg(long, value_enum, default_value_t = UnresolvedPolicy::Ignore)]
    pub unresolved: UnresolvedPolicy,
}

impl LoadArgs {
    /// Apply to `config`, loading the reference table if one was given
    pub fn apply(&self, config: &mut PipelineConfig) -> Result<()> {
        config.unresolved = self.unresolved;
        config.enrichment = if self.no_iso3166_2 {
            None
        } else {
            let table = match &self.iso_codes {
                Some(path) => IsoCodeTable::load(path)?,
                None => IsoCodeTable::bundled()?,
            };
            Some(Enrichment {
                table,
                pass_through: self.pass_through.clone(),
            })
        };
        Ok(())
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
