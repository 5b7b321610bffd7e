#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = qams_rust::run().await {
        eprintln!("qams-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
