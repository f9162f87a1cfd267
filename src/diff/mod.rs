//! Graph edit distance engine for schema graphs.
//!
//! The pipeline has four stages, each in its own module:
//!
//! - `possible_mappings`: partition both vertex sets by kind and naming
//!   context, fixing the unambiguous pairs and pruning the candidate pairs
//!   the search has to consider.
//! - `cost`: the exact editorial cost of a mapping, and an admissible
//!   per-pair lower bound for the search.
//! - `hungarian`: the assignment solver producing optimal and next-best
//!   assignments over lower-bound cost matrices.
//! - `search`: best-first branch and bound over partial mappings.
//!
//! [`DiffEngine`] ties the stages together and is the only entry point.

mod cost;
mod engine;
mod hungarian;
mod mapping;
mod possible_mappings;
mod result;
mod search;

pub use engine::DiffEngine;
pub use result::{DiffResult, EditOperation};
