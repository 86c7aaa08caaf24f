//! Core data models.

mod customer;
mod filter;
mod game;
mod ids;
mod sponsor;
mod stats;
mod zone;

pub use customer::*;
pub use filter::*;
pub use game::*;
pub use ids::*;
pub use sponsor::*;
pub use stats::*;
pub use zone::*;
