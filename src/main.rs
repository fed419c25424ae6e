#[tokio::main]
async fn main() {
    if let Err(e) = event_registry::run().await {
        tracing::error!("Fatal: {}", e);
        eprintln!("event-registry failed to start: {}", e);
        std::process::exit(1);
    }
}
