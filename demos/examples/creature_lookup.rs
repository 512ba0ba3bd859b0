//! Memoized creature lookups against the public PokeAPI.
//!
//! Run with:
//!     cargo run -p fetchbox-demos --example creature_lookup -- pikachu ditto Pikachu
//!
//! Repeated names resolve from the cache without a second round trip,
//! whatever their casing.

use fetchbox::{ExpirationPolicy, ResourceCache, ResourceState};
use fetchbox_pokeapi::{Creature, FetchError, PokeClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("fetchbox=debug")
        .init();

    let names: Vec<String> = std::env::args().skip(1).collect();
    let names = if names.is_empty() {
        vec![
            "pikachu".to_owned(),
            "ditto".to_owned(),
            "Pikachu".to_owned(),
        ]
    } else {
        names
    };

    let client = PokeClient::new();
    let cache: ResourceCache<Creature, FetchError> =
        ResourceCache::new(ExpirationPolicy::default());

    for name in &names {
        println!("=== {name} ===");
        let Some(resource) = cache.fetch_with(name, &client) else {
            println!("(empty name, nothing to look up)");
            continue;
        };

        match resource.peek() {
            ResourceState::Pending => println!("cache miss, fetching..."),
            ResourceState::Ready(_) => println!("cache hit"),
            ResourceState::Failed(_) => println!("cached failure"),
        }

        match resource.get().await {
            Ok(creature) => {
                println!("#{:03} {}", creature.number, creature.name);
                for stat in &creature.stats {
                    println!("  {:>15}: {}", stat.name, stat.base);
                }
                if let Some(artwork) = creature.artwork() {
                    let bytes = client.preload_image(artwork).await?;
                    println!("  artwork: {} bytes", bytes.len());
                }
            }
            Err(error) => println!("lookup failed: {error}"),
        }
    }

    Ok(())
}
