#[tokio::main]
async fn main() -> std::io::Result<()> {
    worker_server::frameworks::server::run_with_config().await
}
