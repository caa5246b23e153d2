use typed_builder::TypedBuilder;

use crate::common::{BackendIdentity, BackendPortRef, FrontendIdentity};

pub const RESOURCE_PREFIX: &str = "kg";
pub const DEFAULT_HTTP_SETTINGS_NAME: &str = "defaulthttpsetting";
pub const DEFAULT_ADDRESS_POOL_NAME: &str = "defaultaddresspool";

// Names are derived only from the semantic keys, so re-synthesizing an
// unchanged cluster yields byte-identical names and the apply-client can
// diff instead of recreating resources.

pub fn http_settings_name(backend: &BackendIdentity, declared_port: &BackendPortRef, backend_port: i32) -> String {
    format!("{RESOURCE_PREFIX}-bphs-{}-{declared_port}-{backend_port}", backend.service_id())
}

pub fn address_pool_name(backend: &BackendIdentity, declared_port: &BackendPortRef, backend_port: i32) -> String {
    format!("{RESOURCE_PREFIX}-pool-{}-{declared_port}-{backend_port}", backend.service_id())
}

pub fn frontend_port_name(port: i32) -> String {
    format!("{RESOURCE_PREFIX}-fp-{port}")
}

pub fn http_listener_name(frontend: &FrontendIdentity) -> String {
    format!("{RESOURCE_PREFIX}-fl-{}-{}", frontend.port, frontend.host_label())
}

pub fn url_path_map_name(frontend: &FrontendIdentity) -> String {
    format!("{RESOURCE_PREFIX}-upm-{}-{}", frontend.port, frontend.host_label())
}

pub fn path_rule_name(frontend: &FrontendIdentity, index: usize) -> String {
    format!("{RESOURCE_PREFIX}-pr-{}-{}-{index}", frontend.port, frontend.host_label())
}

pub fn request_routing_rule_name(frontend: &FrontendIdentity) -> String {
    format!("{RESOURCE_PREFIX}-rr-{}-{}", frontend.port, frontend.host_label())
}

/// Produces fully-qualified references into the appliance's resource tree.
#[derive(Clone, Debug, TypedBuilder)]
pub struct Identifier {
    pub appliance_name: String,
}

impl Identifier {
    fn resource_id(&self, kind: &str, name: &str) -> String {
        format!("/appliances/{}/{kind}/{name}", self.appliance_name)
    }

    pub fn frontend_port_id(&self, name: &str) -> String {
        self.resource_id("frontendPorts", name)
    }

    pub fn http_settings_id(&self, name: &str) -> String {
        self.resource_id("backendHttpSettings", name)
    }

    pub fn address_pool_id(&self, name: &str) -> String {
        self.resource_id("backendAddressPools", name)
    }

    pub fn http_listener_id(&self, name: &str) -> String {
        self.resource_id("httpListeners", name)
    }

    pub fn url_path_map_id(&self, name: &str) -> String {
        self.resource_id("urlPathMaps", name)
    }
}
