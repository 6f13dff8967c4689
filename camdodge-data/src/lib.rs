//! External collaborators for the camdodge route planner.
//!
//! Responsibilities:
//! - Talk to OpenRouteService for directions and geocoding ([`ors`]).
//! - Load and normalise the camera reference dataset ([`cameras`]).
//! - Poll live camera image feeds ([`feed`]).
//!
//! Boundaries:
//! - Do not encode routing rules (they live in `camdodge-core`).
//! - Keep blocking I/O off async executors; HTTP goes through `reqwest`.
//!
//! Invariants:
//! - No global mutable state; credentials arrive through [`ors::OrsConfig`].

#![forbid(unsafe_code)]

pub mod cameras;
pub mod feed;
pub mod ors;

#[doc(hidden)]
pub mod test_support;
