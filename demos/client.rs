use futures_util::StreamExt;
use sse_inspect::{Config, IntoInspection, Sse, DEFAULT_MAX_EVENTS};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + 'static>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let target_uri = args
        .next()
        .unwrap_or_else(|| String::from("http://127.0.0.1:8080/v1/live/sse"));
    let max_events = match args.next() {
        Some(n) => n.parse()?,
        None => DEFAULT_MAX_EVENTS,
    };

    let config = Config {
        max_events,
        ..Config::default()
    };

    println!("Connecting to {}...", target_uri);
    let response = reqwest::get(&target_uri).await?;

    let mut results = Box::pin(response.bytes_stream())
        .into_sse()
        .into_inspection(config)?;

    while let Some(result) = results.next().await {
        println!("\n{}", result?);
    }

    println!("\nStopping after {} events...", results.classifier().seen());

    Ok(())
}
