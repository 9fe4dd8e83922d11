#[tokio::main]
async fn main() -> std::io::Result<()> {
    master_server::frameworks::server::run_with_config().await
}
