#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod error;
mod payload;

pub use client::{DEFAULT_BASE_URL, PokeClient, PokeClientBuilder};
pub use error::FetchError;
pub use payload::{Creature, Stat};
