use anyhow::{Context, Result};
use rusqlite::{params_from_iter, Connection};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::fulltext::FULLTEXT_TABLE;
use super::schema_gen::{
    generate_create_table, generate_drop_table, generate_indexes, generate_insert,
};
use crate::parser::{decode_line, parse_line, MalformedLine, ParsedLine};
use crate::schema::TableSchema;
use crate::ui::Ui;

/// Records between progress updates
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Result of loading one dump into its table
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: &'static str,
    pub inserted: u64,
    pub malformed: Vec<MalformedLine>,
}

/// Owns the database connection for a whole run
pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Open (or create) the database; existing tables are left alone
    /// until [`SqliteWriter::reset_schema`] runs.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        // Optimize for bulk insert
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Drop the search index and every given table, then recreate the tables.
    pub fn reset_schema(&self, schemas: &[&TableSchema]) -> Result<()> {
        self.conn
            .execute(&generate_drop_table(FULLTEXT_TABLE), [])
            .context("Failed to drop full-text table")?;

        for schema in schemas {
            self.conn
                .execute(&generate_drop_table(schema.name), [])
                .with_context(|| format!("Failed to drop table: {}", schema.name))?;
            self.conn
                .execute(&generate_create_table(schema), [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                self.conn
                    .execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }

        Ok(())
    }

    /// Load a tab-separated dump into `schema`'s table.
    ///
    /// Every accepted line becomes one row with its fields bound positionally
    /// as text. Lines with the wrong field count are reported and skipped. The
    /// table is filled in one transaction, so a fatal error leaves it empty.
    pub fn import_file(
        &mut self,
        schema: &TableSchema,
        path: &Path,
        ui: &mut impl Ui,
    ) -> Result<LoadReport> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(schema.name)
            .to_string();

        let total_lines = count_lines(path)?;
        let file = File::open(path).with_context(|| format!("Failed to open: {:?}", path))?;
        let mut reader = BufReader::new(file);

        let expected = schema.expected_fields();
        let insert_sql = generate_insert(schema);

        let tx = self.conn.transaction()?;
        let mut inserted: u64 = 0;
        let mut malformed = Vec::new();
        {
            let mut stmt = tx.prepare_cached(&insert_sql)?;
            let mut raw = Vec::new();
            let mut line_no = 0;

            loop {
                raw.clear();
                let read = reader
                    .read_until(b'\n', &mut raw)
                    .with_context(|| format!("Failed to read line {} of {}", line_no + 1, file_name))?;
                if read == 0 {
                    break;
                }
                line_no += 1;

                let line = decode_line(&raw);
                match parse_line(&line, expected) {
                    ParsedLine::Comment => continue,
                    ParsedLine::Malformed { found } => {
                        let bad = MalformedLine {
                            line: line_no,
                            found,
                            expected,
                        };
                        ui.warn(format!("{}:{}", file_name, bad));
                        malformed.push(bad);
                    }
                    ParsedLine::Fields(fields) => {
                        stmt.execute(params_from_iter(fields)).with_context(|| {
                            format!("Failed to insert {}:{} into {}", file_name, line_no, schema.name)
                        })?;
                        inserted += 1;

                        if inserted % PROGRESS_INTERVAL == 0 {
                            ui.set_progress(inserted, total_lines, schema.name);
                        }
                    }
                }
            }
        }
        tx.commit()
            .with_context(|| format!("Failed to commit {}", schema.name))?;

        ui.clear_progress();
        ui.log(format!(
            "{}: {} records ({} skipped)",
            schema.name,
            inserted,
            malformed.len()
        ));

        Ok(LoadReport {
            table: schema.name,
            inserted,
            malformed,
        })
    }

    /// Finalize the database
    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

fn count_lines(path: &Path) -> Result<u64> {
    let file = File::open(path).with_context(|| format!("Failed to open: {:?}", path))?;
    Ok(BufReader::new(file).split(b'\n').count() as u64)
}
