pub mod iso3166;

pub use iso3166::*;

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};

use crate::config::{Enrichment, UnresolvedPolicy};
use crate::ui::Ui;

/// Counts from one pass over `admin1`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnrichReport {
    pub mapped: u64,
    pub pass_through: u64,
    pub unresolved: u64,
}

impl EnrichReport {
    pub fn total(&self) -> u64 {
        self.mapped + self.pass_through + self.unresolved
    }
}

/// Add `admin1.iso3166_2` and fill it for every division row.
///
/// Runs in a single transaction; a `Fail` policy hit rolls the whole pass back.
pub fn enrich_admin1(
    conn: &mut Connection,
    enrichment: &Enrichment,
    policy: UnresolvedPolicy,
    ui: &mut impl Ui,
) -> Result<EnrichReport> {
    conn.execute("ALTER TABLE admin1 ADD COLUMN iso3166_2 TEXT", [])
        .context("Failed to add iso3166_2 column")?;

    let keys: Vec<String> = {
        let mut stmt = conn.prepare("SELECT key FROM admin1 ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let keys = rows
            .collect::<rusqlite::Result<Vec<String>>>()
            .context("Failed to read admin1 keys")?;
        keys
    };

    let tx = conn.transaction()?;
    let mut report = EnrichReport::default();
    {
        let mut update = tx.prepare("UPDATE admin1 SET iso3166_2 = ?1 WHERE key = ?2")?;

        for key in &keys {
            let resolution = enrichment.table.resolve(key, &enrichment.pass_through);
            match &resolution {
                Resolution::Mapped(_) => report.mapped += 1,
                Resolution::PassThrough(_) => report.pass_through += 1,
                Resolution::Unresolved => {
                    report.unresolved += 1;
                    match policy {
                        UnresolvedPolicy::Ignore => {}
                        UnresolvedPolicy::Warn => {
                            ui.warn(format!("admin1 {}: no ISO 3166-2 code", key))
                        }
                        UnresolvedPolicy::Fail => {
                            bail!("No ISO 3166-2 code for admin1 key {}", key)
                        }
                    }
                }
            }

            update
                .execute(params![resolution.code(), key])
                .with_context(|| format!("Failed to update admin1 {}", key))?;
        }
    }
    tx.commit()?;

    ui.log(format!(
        "admin1: {} mapped, {} passed through, {} unresolved",
        report.mapped, report.pass_through, report.unresolved
    ));

    Ok(report)
}
