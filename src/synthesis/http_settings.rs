use std::collections::HashSet;

use tracing::debug;

use super::{model::DEFAULT_BACKEND_HTTP_SETTINGS, naming, BackendHttpSettings, ConfigBuilder, Stage, SynthesisError};
use crate::common::{ProtocolType, RoutingIntent};

impl ConfigBuilder {
    /// First stage. Resolves every intent's backend and derives the set of
    /// distinct (protocol, backend port) settings, deduplicated by generated
    /// name. A setting is created even when the backend is degraded; the
    /// resolved backend port falls back to the declared port in that case.
    pub fn backend_http_settings(mut self, intents: &[RoutingIntent]) -> Result<Self, SynthesisError> {
        self.advance(Stage::Empty, Stage::HttpSettingsDone)?;

        let mut settings = vec![DEFAULT_BACKEND_HTTP_SETTINGS.clone()];
        let mut seen: HashSet<String> = settings.iter().map(|s| s.name.clone()).collect();

        for intent in intents {
            let resolved = self.resolver.resolve(&intent.backend, &intent.backend_port)?;
            let name = naming::http_settings_name(&intent.backend, &intent.backend_port, resolved.backend_port);
            debug!("backend_http_settings: {} -> {name} status {:?}", intent.backend.service_id(), resolved.status);
            if seen.insert(name.clone()) {
                settings.push(BackendHttpSettings {
                    name,
                    protocol: ProtocolType::Http,
                    port: Some(resolved.backend_port),
                });
            }
            self.resolved_backends.insert((intent.backend.clone(), intent.backend_port.clone()), resolved);
        }

        self.backend_http_settings = settings;
        Ok(self)
    }
}
