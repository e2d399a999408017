//! # Skywriter Profiles
//!
//! Curated profile table mapping amiibo character/game codes to display
//! metadata, stored as a JSON file and importable from AmiiboAPI dumps.

pub mod amiiboapi;
pub mod database;
pub mod error;

pub use amiiboapi::import_amiibo_api;
pub use database::{ProfileDatabase, default_path, profile_key};
pub use error::{ProfileError, Result};
