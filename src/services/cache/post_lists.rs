//! Per-user cache of the full post listing.
//!
//! Entries are keyed by user id and expire purely by TTL. Writes do not
//! invalidate them, so a user may see their own listing up to one TTL stale.
use std::{fmt, sync::Arc, time::Duration};

use sqlx::SqliteConnection;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::repos::post_repo::PostRow;
use crate::services::auth::AuthCtx;
use crate::services::cache::client::CacheClient;
use crate::services::posts;

#[derive(Clone)]
pub struct PostListCache {
    client: Arc<dyn CacheClient>,
    ttl: Duration,
}

impl fmt::Debug for PostListCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostListCache")
            .field("backend", &self.client.backend_name())
            .field("ttl", &self.ttl)
            .finish()
    }
}

pub fn cache_key(user_id: i64) -> String {
    format!("{user_id}_posts")
}

impl PostListCache {
    pub fn new(client: Arc<dyn CacheClient>, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    /// `posts::list`, served from cache while the user's entry is fresh.
    ///
    /// Cache failures never fail the request: they are logged and the store is queried.
    pub async fn list(
        &self,
        identity: &AuthCtx,
        conn: &mut SqliteConnection,
    ) -> Result<Vec<PostRow>, AppError> {
        let key = cache_key(identity.user_id);

        match self.client.get_string(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<PostRow>>(&raw) {
                Ok(rows) => {
                    debug!(user_id = identity.user_id, "post listing served from cache");
                    return Ok(rows);
                }
                Err(e) => warn!(key = %key, error = %e, "discarding undecodable cache entry"),
            },
            Ok(None) => {}
            Err(e) => warn!(
                backend = self.client.backend_name(),
                error = %e,
                "cache read failed"
            ),
        }

        let rows = posts::list(identity, conn).await?;

        match serde_json::to_string(&rows) {
            Ok(raw) => {
                if let Err(e) = self.client.set_with_ttl(&key, &raw, self.ttl).await {
                    warn!(
                        backend = self.client.backend_name(),
                        error = %e,
                        "cache write failed"
                    );
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize post listing"),
        }

        Ok(rows)
    }
}
