#[tokio::main]
async fn main() {
    // Startup failures are already logged by the server bootstrap.
    if relay_server::run_with_config().await.is_err() {
        std::process::exit(1);
    }
}
