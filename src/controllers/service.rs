use std::sync::Arc;

use futures::{future::BoxFuture, FutureExt, StreamExt};
use k8s_openapi::api::core::v1::Service;
use kube::{
    api::Api,
    runtime::{controller::Action, watcher::Config, Controller},
};
use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use super::ControllerError;
use crate::{common::ResourceKey, services::SyncRequest, state::State};

type Result<T, E = ControllerError> = std::result::Result<T, E>;

struct Context {
    client: kube::Client,
    state: State,
    sync_channel_sender: Sender<SyncRequest>,
}

#[derive(TypedBuilder)]
pub struct ServiceController {
    client: kube::Client,
    state: State,
    sync_channel_sender: Sender<SyncRequest>,
}

impl ServiceController {
    pub fn get_controller(&self) -> BoxFuture<()> {
        let context = Arc::new(Context {
            client: self.client.clone(),
            state: self.state.clone(),
            sync_channel_sender: self.sync_channel_sender.clone(),
        });
        let api = Api::<Service>::all(self.client.clone());
        Controller::new(api, Config::default())
            .run(Self::reconcile, Self::error_policy, context)
            .for_each(|_| futures::future::ready(()))
            .boxed()
    }

    #[allow(clippy::needless_pass_by_value)]
    fn error_policy(_object: Arc<Service>, _err: &ControllerError, _ctx: Arc<Context>) -> Action {
        Action::await_change()
    }

    async fn reconcile(service: Arc<Service>, ctx: Arc<Context>) -> Result<Action> {
        let key = ResourceKey::from(&*service);
        let api: Api<Service> = Api::namespaced(ctx.client.clone(), &key.namespace);
        match api.get_opt(&key.name).await {
            Ok(Some(latest)) => {
                debug!("reconcile_service: {key} updated");
                ctx.state.save_service(key.clone(), &Arc::new(latest))?;
            }
            Ok(None) => {
                debug!("reconcile_service: {key} deleted");
                ctx.state.delete_service(&key)?;
            }
            Err(e) => {
                warn!("reconcile_service: {key} fetch failed {e:?}");
                return Err(ControllerError::ResourceFetch);
            }
        }
        let _ = ctx.sync_channel_sender.send(SyncRequest { trigger: key }).await;
        Ok(Action::await_change())
    }
}
