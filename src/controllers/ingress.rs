use std::sync::Arc;

use futures::{future::BoxFuture, FutureExt, StreamExt};
use k8s_openapi::api::networking::v1::Ingress;
use kube::{
    api::Api,
    runtime::{controller::Action, watcher::Config, Controller},
};
use tokio::sync::mpsc::Sender;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

use super::ControllerError;
use crate::{
    common::{matches_ingress_class, ResourceKey},
    services::SyncRequest,
    state::State,
};

type Result<T, E = ControllerError> = std::result::Result<T, E>;

struct Context {
    client: kube::Client,
    ingress_class: String,
    state: State,
    sync_channel_sender: Sender<SyncRequest>,
}

#[derive(TypedBuilder)]
pub struct IngressController {
    client: kube::Client,
    ingress_class: String,
    state: State,
    sync_channel_sender: Sender<SyncRequest>,
}

impl IngressController {
    pub fn get_controller(&self) -> BoxFuture<()> {
        let context = Arc::new(Context {
            client: self.client.clone(),
            ingress_class: self.ingress_class.clone(),
            state: self.state.clone(),
            sync_channel_sender: self.sync_channel_sender.clone(),
        });
        let api = Api::<Ingress>::all(self.client.clone());
        Controller::new(api, Config::default())
            .run(Self::reconcile, Self::error_policy, context)
            .for_each(|_| futures::future::ready(()))
            .boxed()
    }

    #[allow(clippy::needless_pass_by_value)]
    fn error_policy(_object: Arc<Ingress>, _err: &ControllerError, _ctx: Arc<Context>) -> Action {
        Action::await_change()
    }

    async fn reconcile(ingress: Arc<Ingress>, ctx: Arc<Context>) -> Result<Action> {
        let key = ResourceKey::from(&*ingress);
        let api: Api<Ingress> = Api::namespaced(ctx.client.clone(), &key.namespace);
        let changed = match api.get_opt(&key.name).await {
            Ok(Some(latest)) => {
                if matches_ingress_class(&latest, &ctx.ingress_class) {
                    info!("reconcile_ingress: {key} updated");
                    ctx.state.save_ingress(key.clone(), &Arc::new(latest))?;
                    true
                } else {
                    debug!("reconcile_ingress: {key} ignored, ingress class does not match");
                    // Drop it in case the class annotation was just removed.
                    ctx.state.delete_ingress(&key)?.is_some()
                }
            }
            Ok(None) => {
                info!("reconcile_ingress: {key} deleted");
                ctx.state.delete_ingress(&key)?.is_some()
            }
            Err(e) => {
                warn!("reconcile_ingress: {key} fetch failed {e:?}");
                return Err(ControllerError::ResourceFetch);
            }
        };
        if changed {
            let _ = ctx.sync_channel_sender.send(SyncRequest { trigger: key }).await;
        }
        Ok(Action::await_change())
    }
}
