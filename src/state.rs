use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use k8s_openapi::api::{
    core::v1::{Endpoints, Service},
    networking::v1::Ingress,
};

use crate::common::ResourceKey;

#[derive(thiserror::Error, Debug, PartialEq, Eq, PartialOrd)]
pub enum StorageError {
    #[error("state lock is poisoned")]
    LockingError,
}

/// Point-in-time cache of the watched cluster resources. Controllers write,
/// synthesis passes read; all maps are keyed by `ResourceKey`.
#[derive(Clone, Default, Debug)]
pub struct State {
    ingresses: Arc<Mutex<HashMap<ResourceKey, Arc<Ingress>>>>,
    services: Arc<Mutex<HashMap<ResourceKey, Arc<Service>>>>,
    endpoints: Arc<Mutex<HashMap<ResourceKey, Arc<Endpoints>>>>,
}

impl State {
    pub fn new() -> Self {
        Self {
            ingresses: Arc::new(Mutex::new(HashMap::new())),
            services: Arc::new(Mutex::new(HashMap::new())),
            endpoints: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn save_ingress(&self, id: ResourceKey, ingress: &Arc<Ingress>) -> Result<(), StorageError> {
        let mut lock = self.ingresses.lock().map_err(|_| StorageError::LockingError)?;
        lock.insert(id, Arc::clone(ingress));
        Ok(())
    }

    pub fn delete_ingress(&self, id: &ResourceKey) -> Result<Option<Arc<Ingress>>, StorageError> {
        let mut lock = self.ingresses.lock().map_err(|_| StorageError::LockingError)?;
        Ok(lock.remove(id))
    }

    /// Ingresses sorted by resource key so a synthesis pass always sees the
    /// same intent order for an unchanged cluster.
    pub fn list_ingresses(&self) -> Result<Vec<Arc<Ingress>>, StorageError> {
        let lock = self.ingresses.lock().map_err(|_| StorageError::LockingError)?;
        let mut entries: Vec<_> = lock.iter().collect();
        entries.sort_by(|(this, _), (other, _)| this.cmp(other));
        Ok(entries.into_iter().map(|(_, ingress)| Arc::clone(ingress)).collect())
    }

    pub fn save_service(&self, id: ResourceKey, service: &Arc<Service>) -> Result<(), StorageError> {
        let mut lock = self.services.lock().map_err(|_| StorageError::LockingError)?;
        lock.insert(id, Arc::clone(service));
        Ok(())
    }

    pub fn delete_service(&self, id: &ResourceKey) -> Result<Option<Arc<Service>>, StorageError> {
        let mut lock = self.services.lock().map_err(|_| StorageError::LockingError)?;
        Ok(lock.remove(id))
    }

    pub fn get_service(&self, id: &ResourceKey) -> Result<Option<Arc<Service>>, StorageError> {
        let lock = self.services.lock().map_err(|_| StorageError::LockingError)?;
        Ok(lock.get(id).cloned())
    }

    pub fn save_endpoints(&self, id: ResourceKey, endpoints: &Arc<Endpoints>) -> Result<(), StorageError> {
        let mut lock = self.endpoints.lock().map_err(|_| StorageError::LockingError)?;
        lock.insert(id, Arc::clone(endpoints));
        Ok(())
    }

    pub fn delete_endpoints(&self, id: &ResourceKey) -> Result<Option<Arc<Endpoints>>, StorageError> {
        let mut lock = self.endpoints.lock().map_err(|_| StorageError::LockingError)?;
        Ok(lock.remove(id))
    }

    pub fn get_endpoints(&self, id: &ResourceKey) -> Result<Option<Arc<Endpoints>>, StorageError> {
        let lock = self.endpoints.lock().map_err(|_| StorageError::LockingError)?;
        Ok(lock.get(id).cloned())
    }
}
