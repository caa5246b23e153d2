use tracing::debug;

use super::SynthesisError;
use crate::{
    common::{matches_ingress_class, ResourceKey, RoutingIntent},
    state::State,
};

/// Materializes the ordered routing intent list for one synthesis pass.
/// Ingresses of a foreign class are skipped; a malformed intent aborts the
/// whole pass (the driver retries on the next cluster change).
pub fn collect_routing_intents(state: &State, ingress_class: &str) -> Result<Vec<RoutingIntent>, SynthesisError> {
    let mut intents = Vec::new();
    for ingress in state.list_ingresses()? {
        if !matches_ingress_class(&ingress, ingress_class) {
            debug!("collect_routing_intents: skipping {}, not our ingress class", ResourceKey::from(&*ingress));
            continue;
        }
        intents.extend(RoutingIntent::from_ingress(&ingress)?);
    }
    Ok(intents)
}
