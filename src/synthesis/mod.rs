mod address_pools;
mod http_settings;
mod intents;
mod listeners;
mod model;
pub mod naming;
mod resolver;
mod routing_rules;

use std::collections::HashMap;

pub use intents::collect_routing_intents;
pub use model::{
    resource_ref, ApplianceConfig, BackendAddressPool, BackendHttpSettings, FrontendPort, HttpListener, PathRule,
    RequestRoutingRule, ResourceRef, RuleType, UrlPathMap, DEFAULT_BACKEND_ADDRESS_POOL, DEFAULT_BACKEND_HTTP_SETTINGS,
};
pub use naming::Identifier;
pub use resolver::{BackendResolver, ResolutionStatus, ResolvedBackend, FALLBACK_BACKEND_PORT};
use thiserror::Error;

use crate::{
    common::{BackendIdentity, BackendPortRef, IntentError},
    state::{State, StorageError},
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("stage invoked out of order: expected pipeline at {expected:?} but it is at {actual:?}")]
    OutOfOrder { expected: Stage, actual: Stage },
    #[error("routing intent is malformed: {0}")]
    MalformedIntent(#[from] IntentError),
    #[error("declared backend port is invalid: {0}")]
    InvalidPort(String),
    #[error("cluster state is unavailable: {0}")]
    State(#[from] StorageError),
}

/// Pipeline progress discriminant. Transitions are strictly
/// `Empty → HttpSettingsDone → AddressPoolsDone → ListenersDone →
/// RoutingRulesDone` within one pass; there are no back-transitions.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Stage {
    Empty,
    HttpSettingsDone,
    AddressPoolsDone,
    ListenersDone,
    RoutingRulesDone,
}

type BackendKey = (BackendIdentity, BackendPortRef);

/// Accumulates the appliance target configuration over the four synthesis
/// stages. One builder per synthesis pass; concurrent passes each own their
/// builder and never share state.
#[derive(Debug)]
pub struct ConfigBuilder {
    resolver: BackendResolver,
    identifier: Identifier,
    frontend_ip_configuration: ResourceRef,
    stage: Stage,
    resolved_backends: HashMap<BackendKey, ResolvedBackend>,
    frontend_ports: Vec<FrontendPort>,
    backend_http_settings: Vec<BackendHttpSettings>,
    backend_address_pools: Vec<BackendAddressPool>,
    http_listeners: Vec<HttpListener>,
    url_path_maps: Vec<UrlPathMap>,
    request_routing_rules: Vec<RequestRoutingRule>,
}

impl ConfigBuilder {
    pub fn new(state: State, identifier: Identifier, frontend_ip_configuration: ResourceRef) -> Self {
        Self {
            resolver: BackendResolver::new(state),
            identifier,
            frontend_ip_configuration,
            stage: Stage::Empty,
            resolved_backends: HashMap::new(),
            frontend_ports: Vec::new(),
            backend_http_settings: Vec::new(),
            backend_address_pools: Vec::new(),
            http_listeners: Vec::new(),
            url_path_maps: Vec::new(),
            request_routing_rules: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, expected: Stage, next: Stage) -> Result<(), SynthesisError> {
        if self.stage != expected {
            return Err(SynthesisError::OutOfOrder {
                expected,
                actual: self.stage,
            });
        }
        self.stage = next;
        Ok(())
    }

    fn resolved_backend(&self, backend: &BackendIdentity, declared_port: &BackendPortRef) -> Option<&ResolvedBackend> {
        self.resolved_backends.get(&(backend.clone(), declared_port.clone()))
    }

    /// Snapshots the accumulated collections. Pure; may be called from any
    /// stage (partial graph) or repeatedly (identical results).
    pub fn build(&self) -> ApplianceConfig {
        ApplianceConfig {
            frontend_ports: self.frontend_ports.clone(),
            backend_http_settings: self.backend_http_settings.clone(),
            backend_address_pools: self.backend_address_pools.clone(),
            http_listeners: self.http_listeners.clone(),
            url_path_maps: self.url_path_maps.clone(),
            request_routing_rules: self.request_routing_rules.clone(),
        }
    }
}
