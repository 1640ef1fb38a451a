use aws_config::{meta::region::RegionProviderChain, BehaviorVersion};
use aws_sdk_dynamodb::{config::Region, Client};
use tracing::{debug, info};

const LOCAL_SIGNING_REGION: &str = "us-east-1";

/// Builds a DynamoDB client from the default AWS configuration chain.
///
/// With an endpoint override (LocalStack, DynamoDB Local) requests go to that
/// endpoint and the region falls back to `us-east-1` when none is configured.
pub async fn build_client(endpoint_url: Option<&str>) -> Client {
    debug!("Loading AWS configuration");
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(endpoint_url) = endpoint_url {
        info!("Using custom AWS endpoint: {}", endpoint_url);
        let region = RegionProviderChain::default_provider()
            .or_else(Region::new(LOCAL_SIGNING_REGION));
        loader = loader.endpoint_url(endpoint_url).region(region);
    }

    let aws_config = loader.load().await;
    debug!("AWS region: {:?}", aws_config.region());

    Client::new(&aws_config)
}
