use itertools::Itertools;
use k8s_openapi::{
    api::core::v1::{Endpoints, Service},
    apimachinery::pkg::util::intstr::IntOrString,
};
use tracing::debug;

use super::SynthesisError;
use crate::{
    common::{BackendIdentity, BackendPortRef},
    state::State,
};

/// Backend port applied when a named service port cannot be mapped to a
/// number because the service itself is gone.
pub const FALLBACK_BACKEND_PORT: i32 = 80;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolutionStatus {
    Resolved,
    ServiceMissing,
    NoEndpoints,
}

/// Outcome of resolving one backend reference against the cluster snapshot.
/// Recomputed fresh on every synthesis pass, never cached across passes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedBackend {
    pub identity: BackendIdentity,
    pub declared_port: BackendPortRef,
    pub backend_port: i32,
    pub addresses: Vec<String>,
    pub status: ResolutionStatus,
}

impl ResolvedBackend {
    pub fn has_addresses(&self) -> bool {
        self.status == ResolutionStatus::Resolved && !self.addresses.is_empty()
    }
}

/// Read-only queries against the `State` snapshot. Missing services and
/// endpoints are expected degraded states, not errors; only a malformed
/// declared port is a synthesis error.
#[derive(Debug)]
pub struct BackendResolver {
    state: State,
}

impl BackendResolver {
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn resolve(&self, backend: &BackendIdentity, declared_port: &BackendPortRef) -> Result<ResolvedBackend, SynthesisError> {
        if let BackendPortRef::Number(number) = declared_port {
            if *number <= 0 {
                return Err(SynthesisError::InvalidPort(format!("{backend:?} declares port {number}")));
            }
        }

        let maybe_service = self.state.get_service(&backend.service_key())?;
        let maybe_endpoints = self.state.get_endpoints(&backend.endpoints_key())?;

        let Some(service) = maybe_service else {
            debug!("resolve: service {} is missing, falling back to declared port", backend.service_id());
            return Ok(ResolvedBackend {
                identity: backend.clone(),
                declared_port: declared_port.clone(),
                backend_port: Self::declared_fallback(declared_port),
                addresses: Vec::new(),
                status: ResolutionStatus::ServiceMissing,
            });
        };

        let backend_port = Self::backend_port(&service, maybe_endpoints.as_deref(), declared_port);
        let addresses = maybe_endpoints.as_deref().map(Self::collect_addresses).unwrap_or_default();
        let status = if addresses.is_empty() { ResolutionStatus::NoEndpoints } else { ResolutionStatus::Resolved };

        Ok(ResolvedBackend {
            identity: backend.clone(),
            declared_port: declared_port.clone(),
            backend_port,
            addresses,
            status,
        })
    }

    fn declared_fallback(declared_port: &BackendPortRef) -> i32 {
        match declared_port {
            BackendPortRef::Number(number) => *number,
            BackendPortRef::Named(name) => {
                debug!("resolve: named port {name} cannot be mapped without a service, using {FALLBACK_BACKEND_PORT}");
                FALLBACK_BACKEND_PORT
            }
        }
    }

    fn backend_port(service: &Service, endpoints: Option<&Endpoints>, declared_port: &BackendPortRef) -> i32 {
        let ports = service.spec.as_ref().and_then(|spec| spec.ports.as_ref());
        let matched = ports.and_then(|ports| {
            ports.iter().find(|service_port| match declared_port {
                BackendPortRef::Number(number) => service_port.port == *number,
                BackendPortRef::Named(name) => service_port.name.as_deref() == Some(name),
            })
        });

        match matched {
            None => Self::declared_fallback(declared_port),
            Some(service_port) => match service_port.target_port.as_ref() {
                Some(IntOrString::Int(number)) => *number,
                Some(IntOrString::String(target_name)) => {
                    Self::endpoints_port_by_name(endpoints, target_name).unwrap_or(service_port.port)
                }
                None => service_port.port,
            },
        }
    }

    fn endpoints_port_by_name(endpoints: Option<&Endpoints>, name: &str) -> Option<i32> {
        endpoints?
            .subsets
            .as_ref()?
            .iter()
            .flat_map(|subset| subset.ports.iter().flatten())
            .find(|port| port.name.as_deref() == Some(name))
            .map(|port| port.port)
    }

    fn collect_addresses(endpoints: &Endpoints) -> Vec<String> {
        endpoints
            .subsets
            .iter()
            .flatten()
            .flat_map(|subset| subset.addresses.iter().flatten())
            .map(|address| address.ip.clone())
            .unique()
            .collect()
    }
}
