//! Catalog loading with fallback to the built-in dataset.

use std::collections::HashSet;
use std::path::Path;

use crate::errors::AppError;
use crate::models::{Trail, TrailDocument};

use super::{Catalog, CatalogOrigin};

const BUILTIN_TRAILS: &str = include_str!("../../data/builtin_trails.json");

/// Load the catalog from `path`, falling back to the built-in trails.
///
/// Never fails: a missing file, undecodable document or a document with no
/// usable records is logged and replaced by the built-in list.
pub async fn load_catalog(path: &Path) -> Catalog {
    match read_trail_source(path).await {
        Ok(trails) => {
            tracing::info!("Loaded {} trails from {}", trails.len(), path.display());
            Catalog::new(trails, CatalogOrigin::Source(path.to_path_buf()))
        }
        Err(e) => {
            tracing::warn!("Trail source {} unavailable ({}), using built-in trails", path.display(), e);
            Catalog::new(builtin_trails(), CatalogOrigin::Builtin)
        }
    }
}

async fn read_trail_source(path: &Path) -> Result<Vec<Trail>, AppError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("read failed: {}", e)))?;

    let trails = parse_trail_document(&raw)?;
    if trails.is_empty() {
        return Err(AppError::SourceUnavailable(
            "document contains no usable trails".to_string(),
        ));
    }
    Ok(trails)
}

/// Decode a `{ "trails": [...] }` document.
///
/// Records that fail to decode, break an invariant or repeat an earlier id
/// are skipped with a warning.
pub fn parse_trail_document(raw: &str) -> Result<Vec<Trail>, AppError> {
    let document: TrailDocument = serde_json::from_str(raw)?;

    let mut seen = HashSet::new();
    let mut trails = Vec::with_capacity(document.trails.len());

    for (index, record) in document.trails.into_iter().enumerate() {
        let trail: Trail = match serde_json::from_value(record) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Skipping trail record #{}: {}", index, e);
                continue;
            }
        };

        if let Err(reason) = trail.check() {
            tracing::warn!("Skipping trail record #{}: {}", index, reason);
            continue;
        }

        if !seen.insert(trail.id) {
            tracing::warn!("Skipping trail record #{}: duplicate id {}", index, trail.id);
            continue;
        }

        trails.push(trail);
    }

    Ok(trails)
}

/// The dataset compiled into the binary.
pub fn builtin_trails() -> Vec<Trail> {
    parse_trail_document(BUILTIN_TRAILS).unwrap_or_else(|e| {
        tracing::error!("Built-in trail data is corrupt: {}", e);
        Vec::new()
    })
}
