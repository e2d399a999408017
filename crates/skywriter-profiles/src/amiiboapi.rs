//! Import of AmiiboAPI (`/api/amiibo/`) responses.
//!
//! AmiiboAPI identifies a figure by `head` and `tail`, which are the same
//! 8-digit character and game codes the decoder reads from bytes 84..92.

use serde::Deserialize;
use skywriter_core::Profile;
use tracing::warn;

use crate::database::{ProfileDatabase, profile_key};
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    amiibo: OneOrMany,
}

/// Listing queries return an array, lookups by id a single object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<ApiAmiibo>),
    One(Box<ApiAmiibo>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAmiibo {
    head: String,
    tail: String,
    name: Option<String>,
    game_series: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    release: ApiRelease,
}

#[derive(Debug, Default, Deserialize)]
struct ApiRelease {
    na: Option<String>,
}

impl From<ApiAmiibo> for Profile {
    fn from(api: ApiAmiibo) -> Self {
        Profile {
            character_name: api.name,
            game_series: api.game_series,
            biography: api.description,
            release_date: api.release.na,
            amiibo_type: api.kind,
        }
    }
}

/// Converts an AmiiboAPI response body into a database keyed by
/// `"<head>:<tail>"`.
///
/// Entries with malformed codes are skipped with a warning.
///
/// # Errors
///
/// Returns `ProfileError::Json` if `json` is not an AmiiboAPI response.
pub fn import_amiibo_api(json: &str) -> Result<ProfileDatabase> {
    let response: ApiResponse = serde_json::from_str(json)?;
    let items = match response.amiibo {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![*item],
    };

    let mut db = ProfileDatabase::new();
    for item in items {
        let key = profile_key(&item.head, Some(&item.tail));
        if let Err(e) = db.insert(&key, item.into()) {
            warn!(error = %e, "skipping amiiboapi entry");
        }
    }
    Ok(db)
}
