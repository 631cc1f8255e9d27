use lambda_http::{run, service_fn, tracing, Error};
mod config;
mod dynamo;
mod http_handler;
mod memory;
mod route;
mod store;
use config::{Backend, Config};
use dynamo::DynamoItemStore;
use http_handler::function_handler;
use memory::MemoryItemStore;
use store::ItemStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env();
    let store: Box<dyn ItemStore> = match config.backend {
        Backend::DynamoDb => {
            let aws = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let client = aws_sdk_dynamodb::Client::new(&aws);
            tracing::info!(table = %config.table_name, "using dynamodb item store");
            Box::new(DynamoItemStore::new(client, &config.table_name))
        }
        Backend::Memory => {
            tracing::info!("using in-memory item store");
            Box::new(MemoryItemStore::default())
        }
    };

    run(service_fn(|event| function_handler(store.as_ref(), &config, event))).await
}
