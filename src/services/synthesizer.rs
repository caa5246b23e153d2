use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{info, warn};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::{
    common::ResourceKey,
    state::State,
    synthesis::{collect_routing_intents, ApplianceConfig, ConfigBuilder, Identifier, ResourceRef, SynthesisError},
};

/// Nudge from a controller that the cluster snapshot changed and a new
/// synthesis pass is due.
#[derive(Debug)]
pub struct SyncRequest {
    pub trigger: ResourceKey,
}

/// The reconciliation driver. Every sync request runs one full synthesis
/// pass over the current snapshot: collect intents, thread the builder
/// through the four stages in order, finalize, forward to the applier.
/// A failed pass is discarded without side effects.
#[derive(TypedBuilder)]
pub struct SynthesizerService {
    state: State,
    ingress_class: String,
    identifier: Identifier,
    frontend_ip_configuration: ResourceRef,
    sync_channel_receiver: Receiver<SyncRequest>,
    applier_channel_sender: Sender<ApplianceConfig>,
}

impl SynthesizerService {
    pub async fn start(mut self) -> crate::Result<()> {
        info!("Synthesizer service started");
        while let Some(request) = self.sync_channel_receiver.recv().await {
            let pass_id = Uuid::new_v4();
            info!("synthesis pass {pass_id} triggered by {}", request.trigger);
            match self.synthesize() {
                Ok(config) => {
                    let _ = self.applier_channel_sender.send(config).await;
                }
                Err(e) => {
                    warn!("synthesis pass {pass_id} discarded: {e}");
                }
            }
        }
        info!("Synthesizer service stopped");
        Ok(())
    }

    fn synthesize(&self) -> Result<ApplianceConfig, SynthesisError> {
        let intents = collect_routing_intents(&self.state, &self.ingress_class)?;
        let builder = ConfigBuilder::new(self.state.clone(), self.identifier.clone(), self.frontend_ip_configuration.clone())
            .backend_http_settings(&intents)?
            .backend_address_pools(&intents)?
            .http_listeners(&intents)?
            .request_routing_rules(&intents)?;
        Ok(builder.build())
    }
}
