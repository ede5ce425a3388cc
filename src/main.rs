#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = game_client::run_with_config().await {
        tracing::error!(error = %e, "client exited with error");
        std::process::exit(1);
    }
}
