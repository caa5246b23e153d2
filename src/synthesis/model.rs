use lazy_static::lazy_static;
use serde::Serialize;

use super::naming::{DEFAULT_ADDRESS_POOL_NAME, DEFAULT_HTTP_SETTINGS_NAME};
use crate::common::ProtocolType;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResourceRef {
    pub id: String,
}

pub fn resource_ref(id: impl Into<String>) -> ResourceRef {
    ResourceRef { id: id.into() }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BackendHttpSettings {
    pub name: String,
    pub protocol: ProtocolType,
    pub port: Option<i32>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BackendAddressPool {
    pub name: String,
    pub addresses: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FrontendPort {
    pub name: String,
    pub port: i32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HttpListener {
    pub name: String,
    pub frontend_ip_configuration: ResourceRef,
    pub frontend_port: ResourceRef,
    pub protocol: ProtocolType,
    pub host_name: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PathRule {
    pub name: String,
    pub paths: Vec<String>,
    pub backend_http_settings: ResourceRef,
    pub backend_address_pool: ResourceRef,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct UrlPathMap {
    pub name: String,
    pub default_backend_http_settings: ResourceRef,
    pub default_backend_address_pool: ResourceRef,
    pub path_rules: Vec<PathRule>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum RuleType {
    PathBasedRouting,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RequestRoutingRule {
    pub name: String,
    pub rule_type: RuleType,
    pub http_listener: ResourceRef,
    pub url_path_map: ResourceRef,
}

/// The finalized configuration graph handed to the apply-client. Snapshotted
/// by `ConfigBuilder::build`; never mutated afterwards.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ApplianceConfig {
    pub frontend_ports: Vec<FrontendPort>,
    pub backend_http_settings: Vec<BackendHttpSettings>,
    pub backend_address_pools: Vec<BackendAddressPool>,
    pub http_listeners: Vec<HttpListener>,
    pub url_path_maps: Vec<UrlPathMap>,
    pub request_routing_rules: Vec<RequestRoutingRule>,
}

lazy_static! {
    /// Sentinel at index 0 of the HTTP settings collection: plain HTTP, no
    /// backend port, meaning "no real backend configured".
    pub static ref DEFAULT_BACKEND_HTTP_SETTINGS: BackendHttpSettings = BackendHttpSettings {
        name: DEFAULT_HTTP_SETTINGS_NAME.to_owned(),
        protocol: ProtocolType::Http,
        port: None,
    };

    /// Sentinel at index 0 of the address pool collection: the universal
    /// empty pool that degraded backends fall back to.
    pub static ref DEFAULT_BACKEND_ADDRESS_POOL: BackendAddressPool = BackendAddressPool {
        name: DEFAULT_ADDRESS_POOL_NAME.to_owned(),
        addresses: Vec::new(),
    };
}
