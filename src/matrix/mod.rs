//! Matrix data, the sequential kernel and the pieces every strategy shares.
//!
//! The sequential product is the correctness baseline; all parallel
//! strategies run the same row kernel over disjoint row ranges.

pub mod dense;
pub mod naive_ijk;
pub mod partition;
pub mod seed;
pub mod slots;
pub mod store;
pub mod verify;
