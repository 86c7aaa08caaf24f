//! # Arena Revenue
//!
//! Revenue analytics for a basketball franchise. Ticketing, CRM and
//! sponsorship exports are loaded from CSV into immutable records and folded
//! into chart-ready aggregates on every request.
//!
//! ## Architecture
//!
//! - **ingest**: CSV tokenizer, locale-aware scalar parsers, header detection
//!   and the per-dataset row mappers
//! - **models**: Core data structures (games, sales points, filters, stats)
//! - **calculate**: Pure aggregators (zones, channels, comps, P&L, RFM, sponsors)
//! - **storage**: Data directory access and the in-memory dataset
//! - **assistant**: Question answering (Gemini or offline heuristic)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod assistant;
pub mod calculate;
pub mod config;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;
