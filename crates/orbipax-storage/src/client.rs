use aws_sdk_s3::Client;

/// Build an S3 client for `region` from the default credential chain.
pub async fn build_client(region: &str) -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}
