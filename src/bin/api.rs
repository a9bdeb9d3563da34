pub use rsmf_digest::api::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    rsmf_digest::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
