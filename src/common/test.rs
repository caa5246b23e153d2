use k8s_openapi::api::{core::v1::Service, networking::v1::Ingress};

use super::{
    matches_ingress_class, BackendPortRef, IntentError, ResourceKey, RoutingIntent, CATCH_ALL_PATH, INGRESS_CLASS_NAME,
};

fn ingress(manifest: &str) -> Ingress {
    serde_yaml::from_str(manifest).unwrap()
}

#[test]
pub fn extracts_intents_in_rule_and_path_order() {
    let ingress = ingress(
        r"
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: shop
  namespace: retail
spec:
  rules:
  - host: shop.com
    http:
      paths:
      - path: /cart
        pathType: Prefix
        backend:
          service:
            name: cart
            port:
              number: 80
      - pathType: ImplementationSpecific
        backend:
          service:
            name: storefront
            port:
              name: web
",
    );
    let intents = RoutingIntent::from_ingress(&ingress).unwrap();
    assert_eq!(intents.len(), 2);

    assert_eq!(intents[0].frontend.port, 80);
    assert_eq!(intents[0].frontend.host, Some("shop.com".to_owned()));
    assert_eq!(intents[0].path, "/cart");
    assert_eq!(intents[0].backend.namespace, "retail");
    assert_eq!(intents[0].backend.name, "cart");
    assert_eq!(intents[0].backend_port, BackendPortRef::Number(80));

    // A missing path becomes the catch-all path; a named port is kept as a
    // name for the resolver.
    assert_eq!(intents[1].path, CATCH_ALL_PATH);
    assert_eq!(intents[1].backend.name, "storefront");
    assert_eq!(intents[1].backend_port, BackendPortRef::Named("web".to_owned()));
}

#[test]
pub fn rejects_backend_without_port() {
    let ingress = ingress(
        r"
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: shop
  namespace: retail
spec:
  rules:
  - host: shop.com
    http:
      paths:
      - path: /cart
        pathType: Prefix
        backend:
          service:
            name: cart
",
    );
    let err = RoutingIntent::from_ingress(&ingress).unwrap_err();
    assert!(matches!(err, IntentError::InvalidBackendPort(_)));
}

#[test]
pub fn rejects_non_positive_backend_port() {
    let ingress = ingress(
        r"
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: shop
  namespace: retail
spec:
  rules:
  - host: shop.com
    http:
      paths:
      - path: /cart
        pathType: Prefix
        backend:
          service:
            name: cart
            port:
              number: 0
",
    );
    let err = RoutingIntent::from_ingress(&ingress).unwrap_err();
    assert_eq!(err, IntentError::InvalidBackendPort("0".to_owned()));
}

#[test]
pub fn rejects_backend_without_service() {
    let ingress = ingress(
        r"
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: shop
  namespace: retail
spec:
  rules:
  - host: shop.com
    http:
      paths:
      - path: /cart
        pathType: Prefix
        backend:
          resource:
            apiGroup: vendor.example.com
            kind: StorageBucket
            name: assets
",
    );
    let err = RoutingIntent::from_ingress(&ingress).unwrap_err();
    assert_eq!(err, IntentError::MissingBackendService);
}

#[test]
pub fn ingress_class_matches_by_annotation_or_spec() {
    let by_annotation = ingress(
        r"
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: shop
  namespace: retail
  annotations:
    kubernetes.io/ingress.class: gantry/appliance
spec:
  rules: []
",
    );
    assert!(matches_ingress_class(&by_annotation, INGRESS_CLASS_NAME));

    let by_spec = ingress(
        r"
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: shop
  namespace: retail
spec:
  ingressClassName: gantry/appliance
",
    );
    assert!(matches_ingress_class(&by_spec, INGRESS_CLASS_NAME));

    let foreign = ingress(
        r"
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: shop
  namespace: retail
  annotations:
    kubernetes.io/ingress.class: nginx
spec:
  rules: []
",
    );
    assert!(!matches_ingress_class(&foreign, INGRESS_CLASS_NAME));
    assert!(!matches_ingress_class(&ingress(
        r"
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: shop
  namespace: retail
",
    ), INGRESS_CLASS_NAME));
}

#[test]
pub fn resource_keys_identify_cached_resources() {
    let service: Service = serde_yaml::from_str(
        r"
apiVersion: v1
kind: Service
metadata:
  name: cart
  namespace: retail
",
    )
    .unwrap();
    let key = ResourceKey::from(&service);
    assert_eq!(key, ResourceKey::namespaced("Service", "cart", "retail"));
    assert_eq!(key.to_string(), "Service/retail.cart");
}
