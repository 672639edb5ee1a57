use circura_core::{Config, QuoteSource, ZenQuotesClient};

pub async fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = ZenQuotesClient::with_endpoint(&config.quotes.endpoint)?;
    let quote = client.fetch().await?;
    println!("{quote}");
    Ok(())
}
