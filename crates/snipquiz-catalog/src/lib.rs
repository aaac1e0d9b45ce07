pub mod config;
pub mod json_catalog;

pub use config::CatalogConfig;
pub use json_catalog::{JsonCatalog, SongRecord, load_catalog};
