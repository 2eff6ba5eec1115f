//! Runs one generic generation against the live service:
//! 1. Validates the options.
//! 2. Authenticates, uploads the image and submits the task.
//! 3. Polls until the task finishes and prints the outcome as JSON.
//!
//! Usage:
//! `cargo run --example generate [IMAGE_URL] [PROMPT]`

use fash_ai::{FashClient, GenerateOptions, ImageSource};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file if it exists.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let image = args
        .next()
        .unwrap_or_else(|| "https://example.com/person.jpg".to_string());
    let prompt = args.next().unwrap_or_else(|| {
        "make his shirt color to white, no visual changes on the face, keep the same expression"
            .to_string()
    });

    let mut client = match env::var("FASH_AI_API_URL") {
        Ok(url) => FashClient::new_with_url(&url)?,
        Err(_) => FashClient::new()?,
    };

    let options = GenerateOptions {
        app: Some("image_combiner".to_string()),
        model: Some("nano_banana".to_string()),
        images: vec![ImageSource::Text(image)],
        prompt: Some(prompt),
        ..Default::default()
    };

    let outcome = client.generate(&options).await;
    println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);

    Ok(())
}
