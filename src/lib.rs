use futures::FutureExt;
use kube::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;
use typed_builder::TypedBuilder;

mod common;
mod controllers;
mod services;
mod state;
pub mod synthesis;

pub use common::INGRESS_CLASS_NAME;
use controllers::{EndpointsController, IngressController, ServiceController};
use services::{ApplierService, LoggingApplier, SynthesizerService};
use state::State;
use synthesis::{resource_ref, Identifier};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, TypedBuilder, Deserialize)]
pub struct Configuration {
    pub appliance_name: String,
    /// Opaque reference to the pre-provisioned frontend IP configuration.
    pub frontend_ip_configuration_id: String,
    pub ingress_class: String,
}

#[derive(Error, Debug)]
enum ConfigurationError {
    #[error("appliance name must not be empty")]
    ApplianceName,
    #[error("frontend IP configuration id must not be empty")]
    FrontendIpConfiguration,
    #[error("ingress class must not be empty")]
    IngressClass,
}

impl Configuration {
    pub fn validate(&self) -> Result<()> {
        if self.appliance_name.is_empty() {
            return Err(ConfigurationError::ApplianceName.into());
        }
        if self.frontend_ip_configuration_id.is_empty() {
            return Err(ConfigurationError::FrontendIpConfiguration.into());
        }
        if self.ingress_class.is_empty() {
            return Err(ConfigurationError::IngressClass.into());
        }
        Ok(())
    }
}

pub async fn start(configuration: Configuration) -> Result<()> {
    configuration.validate()?;
    info!("Kubgantry started");
    let state = State::new();
    let client = Client::try_default().await?;

    let (sync_channel_sender, sync_channel_receiver) = mpsc::channel(1024);
    let (applier_channel_sender, applier_channel_receiver) = mpsc::channel(1024);

    let identifier = Identifier::builder().appliance_name(configuration.appliance_name.clone()).build();

    let synthesizer_service = SynthesizerService::builder()
        .state(state.clone())
        .ingress_class(configuration.ingress_class.clone())
        .identifier(identifier)
        .frontend_ip_configuration(resource_ref(configuration.frontend_ip_configuration_id.clone()))
        .sync_channel_receiver(sync_channel_receiver)
        .applier_channel_sender(applier_channel_sender)
        .build();

    let applier_service = ApplierService::builder()
        .receiver(applier_channel_receiver)
        .applier(Box::new(LoggingApplier))
        .build();

    let ingress_controller = IngressController::builder()
        .client(client.clone())
        .ingress_class(configuration.ingress_class.clone())
        .state(state.clone())
        .sync_channel_sender(sync_channel_sender.clone())
        .build();

    let service_controller = ServiceController::builder()
        .client(client.clone())
        .state(state.clone())
        .sync_channel_sender(sync_channel_sender.clone())
        .build();

    let endpoints_controller = EndpointsController::builder()
        .client(client.clone())
        .state(state.clone())
        .sync_channel_sender(sync_channel_sender)
        .build();

    let synthesizer_service = synthesizer_service.start().boxed();
    let applier_service = applier_service.start().boxed();

    let ingress_controller_task = async move {
        info!("Ingress controller...started");
        ingress_controller.get_controller().await;
        info!("Ingress controller...stopped");
        crate::Result::<()>::Ok(())
    };

    let service_controller_task = async move {
        info!("Service controller...started");
        service_controller.get_controller().await;
        info!("Service controller...stopped");
        crate::Result::<()>::Ok(())
    };

    let endpoints_controller_task = async move {
        info!("Endpoints controller...started");
        endpoints_controller.get_controller().await;
        info!("Endpoints controller...stopped");
        crate::Result::<()>::Ok(())
    };

    let services = vec![
        synthesizer_service,
        applier_service,
        ingress_controller_task.boxed(),
        service_controller_task.boxed(),
        endpoints_controller_task.boxed(),
    ];

    futures::future::join_all(services).await;
    info!("Kubgantry stopped");
    Ok(())
}
