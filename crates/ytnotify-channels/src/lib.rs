//! # ytnotify-channels
//!
//! Messaging platform integrations for ytnotify.

pub mod discord;
