use std::collections::{HashMap, HashSet};

use super::{
    model::resource_ref,
    naming::{self, DEFAULT_ADDRESS_POOL_NAME, DEFAULT_HTTP_SETTINGS_NAME},
    ConfigBuilder, PathRule, RequestRoutingRule, ResourceRef, RuleType, Stage, SynthesisError, UrlPathMap,
};
use crate::common::{FrontendIdentity, RoutingIntent};

impl ConfigBuilder {
    /// Final stage. For each frontend identity group: one path map with one
    /// path rule per distinct path, and one path-based routing rule tying
    /// the group's listener to its path map.
    pub fn request_routing_rules(mut self, intents: &[RoutingIntent]) -> Result<Self, SynthesisError> {
        self.advance(Stage::ListenersDone, Stage::RoutingRulesDone)?;

        let mut order: Vec<FrontendIdentity> = Vec::new();
        let mut groups: HashMap<FrontendIdentity, Vec<&RoutingIntent>> = HashMap::new();
        for intent in intents {
            let group = groups.entry(intent.frontend.clone()).or_default();
            if group.is_empty() {
                order.push(intent.frontend.clone());
            }
            group.push(intent);
        }

        let mut url_path_maps = Vec::new();
        let mut request_routing_rules = Vec::new();
        for frontend in order {
            let group = &groups[&frontend];

            let mut path_rules: Vec<PathRule> = Vec::new();
            let mut seen_paths = HashSet::new();
            for intent in group {
                if !seen_paths.insert(intent.path.clone()) {
                    continue;
                }
                let (backend_http_settings, backend_address_pool) = self.backend_refs(intent);
                path_rules.push(PathRule {
                    name: naming::path_rule_name(&frontend, path_rules.len()),
                    paths: vec![intent.path.clone()],
                    backend_http_settings,
                    backend_address_pool,
                });
            }

            let url_path_map_name = naming::url_path_map_name(&frontend);
            url_path_maps.push(UrlPathMap {
                name: url_path_map_name.clone(),
                default_backend_http_settings: resource_ref(self.identifier.http_settings_id(DEFAULT_HTTP_SETTINGS_NAME)),
                default_backend_address_pool: resource_ref(self.identifier.address_pool_id(DEFAULT_ADDRESS_POOL_NAME)),
                path_rules,
            });
            request_routing_rules.push(RequestRoutingRule {
                name: naming::request_routing_rule_name(&frontend),
                rule_type: RuleType::PathBasedRouting,
                http_listener: resource_ref(self.identifier.http_listener_id(&naming::http_listener_name(&frontend))),
                url_path_map: resource_ref(self.identifier.url_path_map_id(&url_path_map_name)),
            });
        }

        self.url_path_maps = url_path_maps;
        self.request_routing_rules = request_routing_rules;
        Ok(self)
    }

    /// References for a path rule: the setting created for the intent's
    /// backend, and its pool when live endpoints exist, otherwise the
    /// default pool. An intent with no recorded resolution gets both
    /// defaults.
    fn backend_refs(&self, intent: &RoutingIntent) -> (ResourceRef, ResourceRef) {
        match self.resolved_backend(&intent.backend, &intent.backend_port) {
            None => (
                resource_ref(self.identifier.http_settings_id(DEFAULT_HTTP_SETTINGS_NAME)),
                resource_ref(self.identifier.address_pool_id(DEFAULT_ADDRESS_POOL_NAME)),
            ),
            Some(resolved) => {
                let settings_name = naming::http_settings_name(&intent.backend, &intent.backend_port, resolved.backend_port);
                let pool_id = if resolved.has_addresses() {
                    self.identifier
                        .address_pool_id(&naming::address_pool_name(&intent.backend, &intent.backend_port, resolved.backend_port))
                } else {
                    self.identifier.address_pool_id(DEFAULT_ADDRESS_POOL_NAME)
                };
                (resource_ref(self.identifier.http_settings_id(&settings_name)), resource_ref(pool_id))
            }
        }
    }
}
