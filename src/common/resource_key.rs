use std::fmt::Display;

use k8s_openapi::api::{
    core::v1::{Endpoints, Service},
    networking::v1::Ingress,
};
use kube::ResourceExt;

use super::create_id;

pub const CORE_GROUP_NAME: &str = "";
pub const NETWORKING_GROUP_NAME: &str = "networking.k8s.io";
pub const DEFAULT_NAMESPACE_NAME: &str = "default";

#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ResourceKey {
    pub group: String,
    pub namespace: String,
    pub name: String,
    pub kind: String,
}

impl ResourceKey {
    pub fn namespaced(kind: &str, name: &str, namespace: &str) -> Self {
        let group = if kind == "Ingress" { NETWORKING_GROUP_NAME } else { CORE_GROUP_NAME };
        Self {
            group: group.to_owned(),
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            kind: kind.to_owned(),
        }
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, create_id(&self.name, &self.namespace))
    }
}

impl From<&Ingress> for ResourceKey {
    fn from(value: &Ingress) -> Self {
        Self {
            group: NETWORKING_GROUP_NAME.to_owned(),
            namespace: value.namespace().unwrap_or_else(|| DEFAULT_NAMESPACE_NAME.to_owned()),
            name: value.name_any(),
            kind: "Ingress".to_owned(),
        }
    }
}

impl From<&Service> for ResourceKey {
    fn from(value: &Service) -> Self {
        Self {
            group: CORE_GROUP_NAME.to_owned(),
            namespace: value.namespace().unwrap_or_else(|| DEFAULT_NAMESPACE_NAME.to_owned()),
            name: value.name_any(),
            kind: "Service".to_owned(),
        }
    }
}

impl From<&Endpoints> for ResourceKey {
    fn from(value: &Endpoints) -> Self {
        Self {
            group: CORE_GROUP_NAME.to_owned(),
            namespace: value.namespace().unwrap_or_else(|| DEFAULT_NAMESPACE_NAME.to_owned()),
            name: value.name_any(),
            kind: "Endpoints".to_owned(),
        }
    }
}
