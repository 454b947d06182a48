//! Grid storage and initialization for the Loam garden simulation.
//!
//! This crate owns the 2D cell layout and answers spatial queries. It
//! provides the three episode-initialization strategies:
//!
//! - [`Grid::random`]: seeded random placement of obstacles, water,
//!   and agents
//! - [`Grid::from_layout`]: explicit declarative placement from a
//!   [`GridLayout`]
//! - [`Grid::from_text`]: strict parsing of the textual grid format
//!
//! Agents are returned to the caller rather than stored: the simulation
//! session owns them, and cells carry only an occupancy index.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod grid;
pub mod layout;
pub mod random;
pub mod text;

pub use grid::{Grid, DEFAULT_POLLUTION};
pub use layout::{AgentDecl, CellDecl, FlowerDecl, GridLayout};
pub use random::RandomLayout;
