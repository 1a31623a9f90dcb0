//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Unified result model (Entry, ResultItem, ResultSet)
//! - Error types
//! - Query tokenization and ranking
//! - Remote path helpers
//! - The first-success fallback combinator
//! - Rendering functions for different output formats

pub mod error;
pub mod fallback;
pub mod model;
pub mod paths;
pub mod render;
pub mod tokenizer;
