use std::collections::HashSet;

use super::{model::resource_ref, naming, ConfigBuilder, FrontendPort, HttpListener, Stage, SynthesisError};
use crate::common::RoutingIntent;

impl ConfigBuilder {
    /// Third stage. Groups intents by frontend identity and emits one
    /// listener per group, in the order each frontend is first encountered,
    /// plus the deduplicated frontend port resources the listeners reference.
    pub fn http_listeners(mut self, intents: &[RoutingIntent]) -> Result<Self, SynthesisError> {
        self.advance(Stage::AddressPoolsDone, Stage::ListenersDone)?;

        let mut listeners = Vec::new();
        let mut frontend_ports = Vec::new();
        let mut seen_frontends = HashSet::new();
        let mut seen_ports = HashSet::new();

        for intent in intents {
            if !seen_frontends.insert(intent.frontend.clone()) {
                continue;
            }
            let port_name = naming::frontend_port_name(intent.frontend.port);
            if seen_ports.insert(intent.frontend.port) {
                frontend_ports.push(FrontendPort {
                    name: port_name.clone(),
                    port: intent.frontend.port,
                });
            }
            listeners.push(HttpListener {
                name: naming::http_listener_name(&intent.frontend),
                frontend_ip_configuration: self.frontend_ip_configuration.clone(),
                frontend_port: resource_ref(self.identifier.frontend_port_id(&port_name)),
                protocol: intent.protocol.clone(),
                host_name: intent.frontend.host.clone(),
            });
        }

        self.frontend_ports = frontend_ports;
        self.http_listeners = listeners;
        Ok(self)
    }
}
