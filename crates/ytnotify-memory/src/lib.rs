//! # ytnotify-memory
//!
//! Persistent document store for ytnotify (SQLite-backed).

pub mod store;

pub use store::Store;
