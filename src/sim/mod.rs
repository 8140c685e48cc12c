//! Rope simulation module
//!
//! Pure physics with no rendering or platform dependencies:
//! - Variable timestep supplied by the host loop
//! - Explicit Euler integration of the free endpoint
//! - One-sided length constraint toward the anchor

pub mod params;
pub mod rope;

pub use params::PhysicsParams;
pub use rope::{Axis, Rope, RopeEvent};
