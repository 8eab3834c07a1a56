//! Weather acquisition services: source selection, caching, batch lookups

pub mod cache_store;
pub mod source_selector;
pub mod weather;
pub mod weather_cache;

pub use cache_store::{CacheClient, KeyValueStore, MemoryStore};
pub use source_selector::choose_source;
pub use weather::WeatherService;
pub use weather_cache::{SourceFetchers, WeatherCache};
