use std::collections::HashSet;

use tracing::debug;

use super::{model::DEFAULT_BACKEND_ADDRESS_POOL, naming, BackendAddressPool, ConfigBuilder, Stage, SynthesisError};
use crate::common::RoutingIntent;

impl ConfigBuilder {
    /// Second stage; consumes the backend resolutions recorded by the HTTP
    /// settings stage. A pool is emitted only for backends that resolved
    /// with at least one live endpoint address; degraded backends fall back
    /// to the default pool when routing rules are attached.
    pub fn backend_address_pools(mut self, intents: &[RoutingIntent]) -> Result<Self, SynthesisError> {
        self.advance(Stage::HttpSettingsDone, Stage::AddressPoolsDone)?;

        let mut pools = vec![DEFAULT_BACKEND_ADDRESS_POOL.clone()];
        let mut seen: HashSet<String> = pools.iter().map(|p| p.name.clone()).collect();

        for intent in intents {
            let Some(resolved) = self.resolved_backend(&intent.backend, &intent.backend_port) else {
                continue;
            };
            if !resolved.has_addresses() {
                debug!("backend_address_pools: {} has no live endpoints, skipping pool", intent.backend.service_id());
                continue;
            }
            let name = naming::address_pool_name(&intent.backend, &intent.backend_port, resolved.backend_port);
            if seen.insert(name.clone()) {
                pools.push(BackendAddressPool {
                    name,
                    addresses: resolved.addresses.clone(),
                });
            }
        }

        self.backend_address_pools = pools;
        Ok(self)
    }
}
