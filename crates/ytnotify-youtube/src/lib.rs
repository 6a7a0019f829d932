//! # ytnotify-youtube
//!
//! Read-only YouTube Data API v3 client: newest upload search and channel
//! lookup, authenticated by a pool of API keys.

pub mod client;
pub mod keys;

pub use client::YouTubeClient;
pub use keys::KeyPool;
