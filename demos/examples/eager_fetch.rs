//! Eager fetching behind a busy indicator.
//!
//! A slot starts the lookup the moment the key is set, the gate decides
//! when a spinner would be worth showing, and the artwork cache is
//! warmed as soon as the payload lands. The artificial latency makes the
//! indicator timeline visible on a fast connection.

use std::time::Duration;

use fetchbox::{ExpirationPolicy, FnFetcher, ResourceCache, ResourceKey, ResourceSlot};
use fetchbox_pokeapi::PokeClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("fetchbox=debug")
        .init();

    let client = PokeClient::builder()
        .latency(Duration::from_millis(600))
        .build();

    let image_client = client.clone();
    let image_fetcher = FnFetcher::new(move |key: ResourceKey| {
        let client = image_client.clone();
        async move { client.preload_image(key.as_str()).await }
    });
    let image_cache = ResourceCache::new(ExpirationPolicy::default());

    let data_cache = ResourceCache::new(ExpirationPolicy::default());
    let mut slot = ResourceSlot::new(data_cache, client);

    slot.set_key("charizard");
    let resource = slot.resource().expect("key is not empty").clone();

    while !resource.is_settled() {
        let marker = if slot.is_loading() { "busy" } else { "idle" };
        println!("[{marker}] waiting for charizard...");
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    match resource.get().await {
        Ok(creature) => {
            println!("#{:03} {} is in", creature.number, creature.name);
            if let Some(artwork) = creature.artwork()
                && let Some(image) = image_cache.fetch_with(artwork, &image_fetcher)
            {
                let size = image.get().await.map(|bytes| bytes.len()).unwrap_or(0);
                println!("artwork warmed: {size} bytes");
            }
        }
        Err(error) => println!("lookup failed: {error}"),
    }

    // The payload is already in, but the indicator still honors its
    // minimum on-screen window.
    while slot.is_loading() {
        println!("[busy] minimum indicator window");
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    println!("[idle] done");

    Ok(())
}
