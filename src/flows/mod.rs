//! Flows module - command handlers on top of the client and resolver
//!
//! Provides:
//! - search: remote search, suggestions and offline ranking
//! - transfer: downloads with endpoint fallback, file/folder uploads
//! - account: sign-in and the session file
//! - live: debounced search driven from stdin
//! - note: quick notes
//! - doctor: configuration and reachability checks

pub mod account;
pub mod doctor;
pub mod live;
pub mod note;
pub mod search;
pub mod transfer;
