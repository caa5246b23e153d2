use clap::Parser;
use kubgantry::{start, Configuration, INGRESS_CLASS_NAME};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Synthesizes L7 appliance configuration from Kubernetes ingress resources")]
struct Args {
    /// Name of the target appliance.
    #[arg(long)]
    appliance_name: String,
    /// Reference to the pre-provisioned frontend IP configuration.
    #[arg(long)]
    frontend_ip_configuration_id: String,
    /// Ingress class served by this controller.
    #[arg(long, default_value = INGRESS_CLASS_NAME)]
    ingress_class: String,
}

#[tokio::main]
async fn main() -> kubgantry::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let configuration = Configuration::builder()
        .appliance_name(args.appliance_name)
        .frontend_ip_configuration_id(args.frontend_ip_configuration_id)
        .ingress_class(args.ingress_class)
        .build();
    start(configuration).await
}
