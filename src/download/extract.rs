use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use zip::ZipArchive;

use crate::ui::Ui;

/// Extract `zip_path` into `dest_dir` unless `expected` is already there.
///
/// Returns `true` when the archive was unpacked.
pub fn extract_if_missing(
    zip_path: &Path,
    dest_dir: &Path,
    expected: &str,
    ui: &mut impl Ui,
) -> Result<bool> {
    if dest_dir.join(expected).exists() {
        ui.log(format!("Skipping extraction, {} present", expected));
        return Ok(false);
    }

    let count = extract_zip(zip_path, dest_dir, ui)?;
    ui.log(format!(
        "Extracted {} file(s) from {:?}",
        count,
        zip_path.file_name().unwrap_or_default()
    ));
    Ok(true)
}

/// Extract every file entry of a zip into the destination directory,
/// flattening any directory prefix inside the archive.
pub fn extract_zip(zip_path: &Path, dest_dir: &Path, ui: &mut impl Ui) -> Result<usize> {
    let file = File::open(zip_path)
        .with_context(|| format!("Failed to open zip file: {:?}", zip_path))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Failed to read zip archive: {:?}", zip_path))?;

    fs::create_dir_all(dest_dir).context("Failed to create destination directory")?;

    let mut extracted = 0;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .context("Failed to read file from archive")?;

        if entry.is_dir() {
            continue;
        }

        // Strip any directory prefix; also keeps `..` entries inside dest_dir
        let name = entry.name();
        let Some(file_name) = Path::new(name).file_name().map(|n| n.to_owned()) else {
            continue;
        };

        let dest_path = dest_dir.join(&file_name);
        let mut dest_file = File::create(&dest_path)
            .with_context(|| format!("Failed to create file: {:?}", dest_path))?;

        // A truncated file would be taken as already extracted next run
        if let Err(e) = io::copy(&mut entry, &mut dest_file) {
            drop(dest_file);
            fs::remove_file(&dest_path).ok();
            return Err(e).with_context(|| format!("Failed to extract: {:?}", file_name));
        }

        extracted += 1;
        ui.log(format!("  {:?}", file_name));
    }

    Ok(extracted)
}
