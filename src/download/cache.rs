use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Directory where the GeoNames dumps are downloaded and extracted
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir = match custom_dir {
            Some(dir) => dir,
            None => default_cache_dir()?,
        };

        fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {:?}", cache_dir))?;

        Ok(Self { cache_dir })
    }

    pub fn into_path(self) -> PathBuf {
        self.cache_dir
    }
}

/// Per-user cache directory, e.g. `~/.cache/geonames-to-sqlite`
pub fn default_cache_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "geonames-to-sqlite")
        .context("Could not determine cache directory")?;
    Ok(proj_dirs.cache_dir().to_path_buf())
}
