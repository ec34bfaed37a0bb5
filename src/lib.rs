#![deny(missing_docs)]

//! Crate with an ordered set kept balanced by AVL rotations, [`collections::AvlSet`].
//!
//! The set supports membership test, insertion, removal and sorted iteration in
//! logarithmic time, ordered either by the element's [`Ord`] or by a caller supplied
//! comparator fixed when the set is created.

//!# Features
//!
//! This crate supports the following cargo features:
//! - `serde` : enables serialisation of [`collections::AvlSet`] via serde crate.
//! - `unsafe-optim` : Enable unsafe optimisations in release mode.

/// Containers.
pub mod collections;
