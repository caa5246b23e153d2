mod endpoints;
mod ingress;
mod service;

pub use endpoints::EndpointsController;
pub use ingress::IngressController;
pub use service::ServiceController;
use thiserror::Error;

use crate::state::StorageError;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("resource could not be fetched")]
    ResourceFetch,
    #[error("state access failed {0}")]
    State(#[from] StorageError),
}
