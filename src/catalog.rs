use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::expression::Expression;

/// Immutable mapping from expression to its bucket of gif locations.
///
/// Loaded once at startup from a JSON document shaped like
/// `{"happy": ["a.gif", "b.gif"], ...}` and shared read-only for the rest
/// of the session. Buckets keep the order they have in the document;
/// sampling works on a scratch copy and never touches the catalog itself.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct GifCatalog {
    buckets: HashMap<Expression, Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl GifCatalog {
    /// Load the catalog document from `path`.
    ///
    /// Labels without a non-empty bucket are only warned about here; they
    /// surface as per-tick errors if the classifier ever produces them.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: GifCatalog =
            serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        for expression in Expression::ALL {
            if catalog.bucket(expression).is_none_or(|b| b.is_empty()) {
                warn!(%expression, "catalog has no gifs for this expression");
            }
        }
        info!(?path, buckets = catalog.buckets.len(), "gif catalog loaded");
        Ok(catalog)
    }

    /// Build a catalog directly from buckets. Useful for tests and embedded
    /// defaults.
    pub fn from_buckets(buckets: HashMap<Expression, Vec<String>>) -> Self {
        Self { buckets }
    }

    /// The bucket for `expression`, if the catalog has one.
    pub fn bucket(&self, expression: Expression) -> Option<&[String]> {
        self.buckets.get(&expression).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
