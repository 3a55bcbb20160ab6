use lambda_runtime::{run, service_fn, tracing, Error};

mod bucket;
mod config;
mod dynamo;
mod error;
mod event_handler;
mod request;
mod response;
mod store;

use config::Config;
use dynamo::DynamoNameStore;
use event_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env();
    tracing::info!(table = %config.table_name, region = %config.region, "starting");
    let store = DynamoNameStore::from_config(&config).await;

    run(service_fn(|event| function_handler(&store, event))).await
}
