//! Notice fixtures for the in-memory store.
//!
//! A fixture is a JSON array of notice documents:
//!
//! ```json
//! [{ "id": "n-1", "title": "Road Closure", "publicationDate": 1717200000 }]
//! ```

use anyhow::{Context, Result};
use std::path::Path;

use notice_types::Notice;

/// Load notices from a fixture file.
pub async fn load(path: &Path) -> Result<Vec<Notice>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read fixture {}", path.display()))?;
    parse(&contents).with_context(|| format!("Invalid fixture {}", path.display()))
}

fn parse(contents: &str) -> Result<Vec<Notice>> {
    Ok(serde_json::from_str(contents)?)
}
