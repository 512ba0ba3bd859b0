//! Payload types for creature lookups.
//!
//! [`Creature`] is the flattened shape handed to callers. The raw API
//! response nests stats and artwork several levels deep, so the wire
//! types in this module stay private and convert via [`From`].

use serde::{Deserialize, Serialize};

/// A creature returned by the lookup API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Creature {
    /// Canonical lowercase name.
    pub name: String,
    /// National dex number.
    pub number: u32,
    /// Official artwork URL, when the API publishes one.
    pub image: Option<String>,
    /// Base stats in API order.
    pub stats: Vec<Stat>,
}

impl Creature {
    /// URL of the official artwork, if any.
    pub fn artwork(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Looks up a base stat by its API name, e.g. `hp` or `speed`.
    pub fn stat(&self, name: &str) -> Option<u32> {
        self.stats
            .iter()
            .find(|stat| stat.name == name)
            .map(|stat| stat.base)
    }
}

/// A single named base stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    /// Stat name as reported by the API.
    pub name: String,
    /// Base value.
    pub base: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatureResponse {
    id: u32,
    name: String,
    #[serde(default)]
    stats: Vec<StatEntry>,
    #[serde(default)]
    sprites: Sprites,
}

#[derive(Debug, Deserialize)]
struct StatEntry {
    base_stat: u32,
    stat: NamedRef,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    #[serde(default)]
    other: OtherSprites,
}

#[derive(Debug, Default, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Artwork,
}

#[derive(Debug, Default, Deserialize)]
struct Artwork {
    front_default: Option<String>,
}

impl From<CreatureResponse> for Creature {
    fn from(response: CreatureResponse) -> Self {
        Self {
            name: response.name,
            number: response.id,
            image: response.sprites.other.official_artwork.front_default,
            stats: response
                .stats
                .into_iter()
                .map(|entry| Stat {
                    name: entry.stat.name,
                    base: entry.base_stat,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nested_response() {
        let raw = serde_json::json!({
            "id": 25,
            "name": "pikachu",
            "stats": [
                { "base_stat": 35, "stat": { "name": "hp", "url": "unused" } },
                { "base_stat": 90, "stat": { "name": "speed", "url": "unused" } }
            ],
            "sprites": {
                "front_default": "ignored",
                "other": {
                    "official-artwork": {
                        "front_default": "https://img.example/pikachu.png"
                    }
                }
            },
            "weight": 60
        });

        let response: CreatureResponse = serde_json::from_value(raw).unwrap();
        let creature = Creature::from(response);
        assert_eq!(creature.name, "pikachu");
        assert_eq!(creature.number, 25);
        assert_eq!(creature.artwork(), Some("https://img.example/pikachu.png"));
        assert_eq!(creature.stat("hp"), Some(35));
        assert_eq!(creature.stat("speed"), Some(90));
        assert_eq!(creature.stat("attack"), None);
    }

    #[test]
    fn test_decode_without_sprites_or_stats() {
        let raw = serde_json::json!({ "id": 132, "name": "ditto" });
        let response: CreatureResponse = serde_json::from_value(raw).unwrap();
        let creature = Creature::from(response);
        assert_eq!(creature.number, 132);
        assert_eq!(creature.artwork(), None);
        assert!(creature.stats.is_empty());
    }
}
