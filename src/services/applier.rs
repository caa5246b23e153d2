use async_trait::async_trait;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

use crate::synthesis::ApplianceConfig;

/// Apply-client boundary. Implementations reconcile one finalized
/// configuration graph against the live appliance; they can rely on
/// identical intent sets producing structurally identical graphs.
#[async_trait]
pub trait ConfigApplier {
    async fn apply(&mut self, config: &ApplianceConfig) -> crate::Result<()>;
}

pub struct LoggingApplier;

#[async_trait]
impl ConfigApplier for LoggingApplier {
    async fn apply(&mut self, config: &ApplianceConfig) -> crate::Result<()> {
        info!(
            "applying appliance configuration: {} listeners, {} routing rules, {} path maps, {} address pools, {} http settings",
            config.http_listeners.len(),
            config.request_routing_rules.len(),
            config.url_path_maps.len(),
            config.backend_address_pools.len(),
            config.backend_http_settings.len()
        );
        debug!("appliance configuration {}", serde_json::to_string(config)?);
        Ok(())
    }
}

/// Consumes finalized graphs and forwards them to the applier, skipping
/// graphs structurally identical to the last applied one. Last writer wins
/// when passes race.
#[derive(TypedBuilder)]
pub struct ApplierService {
    receiver: Receiver<ApplianceConfig>,
    applier: Box<dyn ConfigApplier + Send>,
    #[builder(default, setter(skip))]
    last_applied: Option<ApplianceConfig>,
}

impl ApplierService {
    pub async fn start(mut self) -> crate::Result<()> {
        info!("Applier service started");
        while let Some(config) = self.receiver.recv().await {
            if self.last_applied.as_ref() == Some(&config) {
                debug!("appliance configuration unchanged, skipping apply");
                continue;
            }
            match self.applier.apply(&config).await {
                Ok(()) => self.last_applied = Some(config),
                Err(e) => warn!("failed to apply appliance configuration {e}"),
            }
        }
        info!("Applier service stopped");
        Ok(())
    }
}
