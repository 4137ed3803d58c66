use std::sync::Arc;

use super::{
    config::Config,
    database::{PostgrestSource, SpeciesSource},
    error::AppError,
};

pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn SpeciesSource>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let source = PostgrestSource::new(
            &config.supabase_url,
            &config.supabase_key,
            config.request_timeout,
        )?;

        Ok(Self::with_source(config, Arc::new(source)))
    }

    pub fn with_source(config: Config, source: Arc<dyn SpeciesSource>) -> Arc<Self> {
        Arc::new(Self { config, source })
    }
}
