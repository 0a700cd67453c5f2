//! Domain logic for the license-card template designer and print layout
//! engine.
//!
//! This crate has zero internal deps so it can be used by the API layer,
//! repositories, and any future CLI or worker tooling. Everything in here
//! is synchronous and pure (or near-pure); persistence and PDF rendering
//! live behind the boundaries in `carddesk-db` and [`preview::CardRenderer`].

pub mod design;
pub mod error;
pub mod geometry;
pub mod merge;
pub mod preview;
pub mod sheet;
pub mod types;
pub mod versioning;
