#![allow(dead_code)]

use quick_rest::{RestClient, ServerResponse};
use serde::Deserialize;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().pretty().init();

    // Create a client
    let client = RestClient::builder()
        .with_base_url("https://dog.ceo/api")
        .build()?;

    // Simple get call, decoded as a JSON value
    let breeds = client.get("/breeds/list/all")?.decode()?;
    println!("{breeds:#}");

    // Get call decoded into a typed value
    let response = client.get("/breed/hound/images")?;
    if let DogCeoResult::Success { message } = images(&response)? {
        println!("{} hound images", message.len());
    }

    // Keep the raw body around
    response.to_text("hound-images.json")?;

    Ok(())
}

fn images(response: &ServerResponse) -> anyhow::Result<BreedImages> {
    Ok(response.decode_as()?)
}

type BreedImages = DogCeoResult<Vec<String>>;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum DogCeoResult<T> {
    Success { message: T },
    Error { code: u16, message: String },
}
