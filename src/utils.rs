use std::path::PathBuf;

const CACHE_DIR_NAME: &str = "noaa_climate_cache";

/// Default location of the HTTP response cache, under the system cache dir.
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join(CACHE_DIR_NAME))
}
