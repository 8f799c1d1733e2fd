pub mod client;
pub mod memory;
pub mod post_lists;
pub mod valkey;

pub use client::CacheClient;
pub use memory::MemoryCache;
pub use post_lists::PostListCache;
pub use valkey::ValkeyClient;
