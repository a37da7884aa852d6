pub mod fixtures;
pub mod json_loader;

use anyhow::Result;

use crate::model::entities::Dataset;

/// Where list pages get their rows from. Column layouts come from
/// [`Entity::columns`](crate::model::entities::Entity::columns).
///
/// Providers are called from a blocking task, so they may do plain file I/O.
pub trait DataProvider: Send + Sync {
    /// Short human-readable origin, shown while loading.
    fn describe(&self) -> String;

    fn fetch_rows(&self) -> Result<Dataset>;
}
