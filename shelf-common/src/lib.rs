//! # Shelf Common Library
//!
//! Shared code for the shelf-aware workspace:
//! - Book and ReaderShelf data model
//! - Chart-data shapes consumed by renderers
//! - Bootstrap configuration loading
//! - Common error type

pub mod chart;
pub mod config;
pub mod error;
pub mod models;

pub use chart::{ChartData, DualChartData};
pub use error::{Error, Result};
pub use models::{Book, EnrichmentStatus, ReaderShelf, DEFAULT_GENRE};
