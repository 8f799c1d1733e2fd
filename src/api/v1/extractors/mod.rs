/**
 * Responsibility
 *  - handler が受け取る extractor を束ねる
 */
pub mod auth_ctx;
pub mod db_conn;
pub mod payload_limit;
pub mod post_id;
pub mod validated;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use db_conn::DbConn;
pub use payload_limit::PayloadWithinLimit;
pub use post_id::PostId;
pub use validated::{ValidatedForm, ValidatedJson};
