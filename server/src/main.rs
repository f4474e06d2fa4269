#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = audiolens::run().await {
        eprintln!("audiolens failed to start: {}", e);
        std::process::exit(1);
    }
}
