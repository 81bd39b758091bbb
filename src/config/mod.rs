// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable holding the Elasticsearch node URL; wins over every other source.
pub const URL_ENV_VAR: &str = "ELASTIC_SEARCH_URL";

const ENV_PREFIX: &str = "SEARCH_READINESS";

/// Load configuration from an optional file (YAML or JSON) layered under the environment.
///
/// A missing file is not an error; defaults cover every field.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    build_config(path.as_ref(), std::env::var(URL_ENV_VAR).ok())
}

fn build_config(path: &Path, url_override: Option<String>) -> Result<Config> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("elasticsearch.url", url_override)
        .context("Failed to apply URL override")?;

    let config: Config = builder
        .build()
        .context("Failed to read config sources")?
        .try_deserialize()
        .context("Failed to parse config")?;

    config.validate()?;
    Ok(config)
}
