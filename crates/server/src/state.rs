use opticheck_core::{Config, InspectionService};

/// Shared application state
pub struct AppState {
    config: Config,
    service: InspectionService,
}

impl AppState {
    pub fn new(config: Config, service: InspectionService) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &InspectionService {
        &self.service
    }
}
