//! # Diversity Filter Service
//!
//! Owns the admission bookkeeping and wires the domain classification to the
//! injected policy, CPL and ASN ports. Implements `PeerDiversityApi`.

// Semantic submodules
mod admission;
mod api;
mod builder;
mod filter;
mod state;

// Re-export public API
pub use builder::DiversityFilterBuilder;
pub use filter::DiversityFilter;
