use anyhow::{bail, Context, Result};
use rusqlite::Connection;

use crate::config::UnresolvedPolicy;
use crate::ui::Ui;

pub const FULLTEXT_TABLE: &str = "geoname_fulltext";

const CREATE_FULLTEXT: &str = "CREATE VIRTUAL TABLE geoname_fulltext USING fts4(
    geonameid, longname, asciiname, admin1, country,
    population, latitude, longitude, timezone
)";

/// Which code goes between the place name and the admin1 name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayCode {
    /// `admin1.iso3166_2`, filled by the enricher
    Iso3166_2,
    /// Raw GeoNames admin1 code
    Admin1,
}

impl DisplayCode {
    fn column(self) -> &'static str {
        match self {
            DisplayCode::Iso3166_2 => "a.iso3166_2",
            DisplayCode::Admin1 => "g.admin1",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexReport {
    pub indexed: u64,
    /// Places with no matching country or admin1 row
    pub excluded: u64,
}

fn populate_sql(display: DisplayCode) -> String {
    format!(
        "INSERT INTO geoname_fulltext
         SELECT g.geonameid,
                g.asciiname || ', ' || {code} || ' ' || a.asciiname || ', ' || c.country,
                g.asciiname, a.asciiname, c.country,
                g.population, g.latitude, g.longitude, g.timezone
         FROM geoname g
         JOIN country c ON g.country = c.iso
         JOIN admin1 a ON g.country || '.' || g.admin1 = a.key",
        code = display.column()
    )
}

/// Recreate `geoname_fulltext` and fill it from the three base tables.
///
/// Inner join: a place only becomes searchable when both its country and
/// its `<country>.<admin1>` key exist.
pub fn build_fulltext(
    conn: &mut Connection,
    display: DisplayCode,
    policy: UnresolvedPolicy,
    ui: &mut impl Ui,
) -> Result<IndexReport> {
    let tx = conn.transaction()?;

    tx.execute(&format!("DROP TABLE IF EXISTS {}", FULLTEXT_TABLE), [])?;
    tx.execute(CREATE_FULLTEXT, [])
        .context("Failed to create full-text table")?;

    tx.execute(&populate_sql(display), [])
        .context("Failed to populate full-text table")?;

    let indexed = count_rows(&tx, FULLTEXT_TABLE)?;
    let excluded = count_rows(&tx, "geoname")?.saturating_sub(indexed);

    if excluded > 0 {
        match policy {
            UnresolvedPolicy::Ignore => {}
            UnresolvedPolicy::Warn => ui.warn(format!(
                "{} places have no matching country/admin1 row and are not searchable",
                excluded
            )),
            UnresolvedPolicy::Fail => bail!(
                "{} places have no matching country/admin1 row",
                excluded
            ),
        }
    }

    tx.commit()?;
    ui.log(format!("{}: {} records", FULLTEXT_TABLE, indexed));

    Ok(IndexReport { indexed, excluded })
}

fn count_rows(conn: &Connection, table: &str) -> Result<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count as u64)
}
