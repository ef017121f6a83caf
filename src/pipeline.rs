//! Orchestrates a run: fetch → extract → schema → load → enrich → index.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::{PipelineConfig, ADMIN1_FILE, COUNTRY_FILE};
use crate::download::{extract_if_missing, FetchOutcome, GeoNamesClient};
use crate::enrich::{enrich_admin1, EnrichReport};
use crate::schema::{ADMIN1, ALL_TABLES, COUNTRY, GEONAME};
use crate::ui::{Phase, Ui};
use crate::writer::{build_fulltext, DisplayCode, IndexReport, LoadReport, SqliteWriter};

/// What a completed run produced
#[derive(Debug)]
pub struct PipelineSummary {
    pub loads: Vec<LoadReport>,
    /// `None` when enrichment is disabled
    pub enrichment: Option<EnrichReport>,
    pub index: IndexReport,
    pub elapsed: Duration,
}

impl PipelineSummary {
    pub fn records(&self) -> u64 {
        self.loads.iter().map(|l| l.inserted).sum()
    }

    pub fn malformed(&self) -> usize {
        self.loads.iter().map(|l| l.malformed.len()).sum()
    }

    pub fn load(&self, table: &str) -> Option<&LoadReport> {
        self.loads.iter().find(|l| l.table == table)
    }
}

impl std::fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records loaded ({} lines skipped), {} places searchable in {:.1}s",
            self.records(),
            self.malformed(),
            self.index.indexed,
            self.elapsed.as_secs_f64()
        )
    }
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Download whatever is missing and unpack the cities archive
    pub fn fetch(&self, client: &GeoNamesClient, ui: &mut impl Ui) -> Result<Vec<FetchOutcome>> {
        ui.set_phase(Phase::Fetching);
        let sources = self.config.sources();
        let outcomes = client.fetch_all(&sources.all(), self.config.work_dir(), ui)?;

        ui.set_phase(Phase::Extracting);
        extract_if_missing(
            &self.config.local_path(&sources.cities.file_name),
            self.config.work_dir(),
            &self.config.cities.text_name(),
            ui,
        )?;

        Ok(outcomes)
    }

    /// Rebuild `output_db` from the dumps already in the work directory
    pub fn load(&self, output_db: &Path, ui: &mut impl Ui) -> Result<PipelineSummary> {
        let start = Instant::now();
        let mut writer = SqliteWriter::open(output_db)?;

        ui.set_phase(Phase::Loading);
        ui.set_info(format!("{:?}", output_db));
        writer.reset_schema(ALL_TABLES)?;

        let cities = self.config.cities.text_name();
        let datasets = [
            (&COUNTRY, COUNTRY_FILE),
            (&ADMIN1, ADMIN1_FILE),
            (&GEONAME, cities.as_str()),
        ];

        let mut loads = Vec::with_capacity(datasets.len());
        for (schema, file_name) in datasets {
            let path = self.config.local_path(file_name);
            let report = writer
                .import_file(schema, &path, ui)
                .with_context(|| format!("Failed to load {}", file_name))?;
            loads.push(report);
        }

        let (enrichment, display) = match &self.config.enrichment {
            Some(enrichment) => {
                ui.set_phase(Phase::Enriching);
                let report = enrich_admin1(
                    writer.connection_mut(),
                    enrichment,
                    self.config.unresolved,
                    ui,
                )?;
                (Some(report), DisplayCode::Iso3166_2)
            }
            None => (None, DisplayCode::Admin1),
        };

        ui.set_phase(Phase::Indexing);
        let index = build_fulltext(
            writer.connection_mut(),
            display,
            self.config.unresolved,
            ui,
        )?;

        writer.finalize()?;

        Ok(PipelineSummary {
            loads,
            enrichment,
            index,
            elapsed: start.elapsed(),
        })
    }

    /// Fetch, extract and load
    pub fn run(
        &self,
        client: &GeoNamesClient,
        output_db: &Path,
        ui: &mut impl Ui,
    ) -> Result<PipelineSummary> {
        self.fetch(client, ui)?;
        self.load(output_db, ui)
    }
}
