mod resource_key;
#[cfg(test)]
mod test;

use std::{collections::BTreeSet, fmt::Display};

use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
pub use resource_key::{ResourceKey, DEFAULT_NAMESPACE_NAME};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const INGRESS_CLASS_ANNOTATION: &str = "kubernetes.io/ingress.class";
pub const INGRESS_CLASS_NAME: &str = "gantry/appliance";

pub const HTTP_FRONTEND_PORT: i32 = 80;
pub const HTTPS_FRONTEND_PORT: i32 = 443;
pub const CATCH_ALL_PATH: &str = "/*";

#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub enum ProtocolType {
    Http,
    Https,
}

impl Display for ProtocolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut e = format! {"{self:?}"};
        e.make_ascii_uppercase();
        write!(f, "{e}")
    }
}

/// Canonical (namespace, service name) pair identifying a backend target.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BackendIdentity {
    pub namespace: String,
    pub name: String,
}

impl BackendIdentity {
    pub fn service_id(&self) -> String {
        create_id(&self.name, &self.namespace)
    }

    pub fn service_key(&self) -> ResourceKey {
        ResourceKey::namespaced("Service", &self.name, &self.namespace)
    }

    pub fn endpoints_key(&self) -> ResourceKey {
        ResourceKey::namespaced("Endpoints", &self.name, &self.namespace)
    }
}

/// The (frontend port, host) pair under which routing intents collapse into a
/// single listener, routing rule and path map. `host` is `None` for
/// catch-all frontends.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FrontendIdentity {
    pub port: i32,
    pub host: Option<String>,
}

impl FrontendIdentity {
    pub fn host_label(&self) -> &str {
        self.host.as_deref().unwrap_or("catchall")
    }
}

impl Display for FrontendIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host_label(), self.port)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum BackendPortRef {
    Number(i32),
    Named(String),
}

impl Display for BackendPortRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendPortRef::Number(number) => write!(f, "{number}"),
            BackendPortRef::Named(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntentError {
    #[error("backend service reference is missing")]
    MissingBackendService,
    #[error("backend service port is invalid: {0}")]
    InvalidBackendPort(String),
}

/// One (host, path, backend service, backend port) tuple extracted from an
/// Ingress rule. Immutable, scoped to a single synthesis pass.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoutingIntent {
    pub frontend: FrontendIdentity,
    pub protocol: ProtocolType,
    pub path: String,
    pub backend: BackendIdentity,
    pub backend_port: BackendPortRef,
}

impl RoutingIntent {
    /// Flattens the Ingress rules into routing intents, in rule/path order.
    /// Hosts covered by the Ingress TLS section land on the HTTPS frontend
    /// port, everything else on the plain HTTP one.
    pub fn from_ingress(ingress: &Ingress) -> std::result::Result<Vec<Self>, IntentError> {
        let namespace = ingress.namespace().unwrap_or_else(|| DEFAULT_NAMESPACE_NAME.to_owned());
        let Some(spec) = ingress.spec.as_ref() else {
            return Ok(Vec::new());
        };
        if spec.default_backend.is_some() {
            debug!("from_ingress: {} declares a default backend which contributes no routing intent", ingress.name_any());
        }
        let tls_hosts: BTreeSet<&String> = spec.tls.iter().flatten().filter_map(|tls| tls.hosts.as_ref()).flatten().collect();

        let mut intents = Vec::new();
        for rule in spec.rules.iter().flatten() {
            let Some(http) = rule.http.as_ref() else {
                continue;
            };
            for path in &http.paths {
                let service = path.backend.service.as_ref().ok_or(IntentError::MissingBackendService)?;
                let backend_port = match service.port.as_ref() {
                    Some(port) => match (port.number, port.name.as_ref()) {
                        (Some(number), _) if number > 0 => BackendPortRef::Number(number),
                        (Some(number), _) => return Err(IntentError::InvalidBackendPort(number.to_string())),
                        (None, Some(name)) => BackendPortRef::Named(name.clone()),
                        (None, None) => return Err(IntentError::InvalidBackendPort("not specified".to_owned())),
                    },
                    None => return Err(IntentError::InvalidBackendPort("not specified".to_owned())),
                };

                let secure = rule.host.as_ref().is_some_and(|host| tls_hosts.contains(host));
                let (frontend_port, protocol) =
                    if secure { (HTTPS_FRONTEND_PORT, ProtocolType::Https) } else { (HTTP_FRONTEND_PORT, ProtocolType::Http) };

                intents.push(RoutingIntent {
                    frontend: FrontendIdentity {
                        port: frontend_port,
                        host: rule.host.clone(),
                    },
                    protocol,
                    path: path.path.clone().filter(|p| !p.is_empty()).unwrap_or_else(|| CATCH_ALL_PATH.to_owned()),
                    backend: BackendIdentity {
                        namespace: namespace.clone(),
                        name: service.name.clone(),
                    },
                    backend_port,
                });
            }
        }
        Ok(intents)
    }
}

pub fn matches_ingress_class(ingress: &Ingress, ingress_class: &str) -> bool {
    let by_annotation = ingress
        .metadata
        .annotations
        .as_ref()
        .and_then(|annotations| annotations.get(INGRESS_CLASS_ANNOTATION))
        .map(|value| value == ingress_class);
    let by_spec = ingress
        .spec
        .as_ref()
        .and_then(|spec| spec.ingress_class_name.as_ref())
        .map(|value| value == ingress_class);
    by_annotation.or(by_spec).unwrap_or(false)
}

pub fn create_id(name: &str, namespace: &str) -> String {
    namespace.to_owned() + "." + name
}
