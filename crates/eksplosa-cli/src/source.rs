use std::path::PathBuf;

use eksplosa_core::{ApiClient, Config, DataGateway, StaticGateway};

/// Where content comes from, chosen by the global flags.
pub struct Source {
    pub data: Option<PathBuf>,
    pub builtin: bool,
}

impl Source {
    pub fn gateway(&self, config: &Config) -> Result<Box<dyn DataGateway>, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.data {
            tracing::debug!(path = %path.display(), "using content file");
            return Ok(Box::new(StaticGateway::from_file(path)?));
        }
        if self.builtin {
            return Ok(Box::new(StaticGateway::builtin()));
        }
        tracing::debug!(base_url = %config.api.base_url, "using content API");
        Ok(Box::new(ApiClient::from_config(&config.api)?))
    }
}
