use std::sync::Arc;

use futures::{future::BoxFuture, FutureExt, StreamExt};
use k8s_openapi::api::core::v1::Endpoints;
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
pub struct EndpointsController {
    client: kube::Client,
    state: State,
    sync_channel_sender: Sender<SyncRequest>,
}

impl EndpointsController {
    pub fn get_controller(&self) -> BoxFuture<()> {
        let context = Arc::new(Context {
            client: self.client.clone(),
            state: self.state.clone(),
            sync_channel_sender: self.sync_channel_sender.clone(),
        });
        let api = Api::<Endpoints>::all(self.client.clone());
        Controller::new(api, Config::default())
            .run(Self::reconcile, Self::error_policy, context)
            .for_each(|_| futures::future::ready(()))
            .boxed()
    }

    #[allow(clippy::needless_pass_by_value)]
    fn error_policy(_object: Arc<Endpoints>, _err: &ControllerError, _ctx: Arc<Context>) -> Action {
        Action::await_change()
    }

    async fn reconcile(endpoints: Arc<Endpoints>, ctx: Arc<Context>) -> Result<Action> {
        let key = ResourceKey::from(&*endpoints);
        let api: Api<Endpoints> = Api::namespaced(ctx.client.clone(), &key.namespace);
        match api.get_opt(&key.name).await {
            Ok(Some(latest)) => {
                debug!("reconcile_endpoints: {key} updated");
                ctx.state.save_endpoints(key.clone(), &Arc::new(latest))?;
            }
            Ok(None) => {
                debug!("reconcile_endpoints: {key} deleted");
                ctx.state.delete_endpoints(&key)?;
            }
            Err(e) => {
                warn!("reconcile_endpoints: {key} fetch failed {e:?}");
                return Err(ControllerError::ResourceFetch);
            }
        }
        let _ = ctx.sync_channel_sender.send(SyncRequest { trigger: key }).await;
        Ok(Action::await_change())
    }
}
