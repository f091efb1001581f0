//! Payload shapes for the warren presentation boundary.
//!
//! This crate contains the serde-serializable types exchanged between the
//! lifecycle core and its embedder: commands in, notifications out, plus the
//! identifier and geometry primitives both sides share.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * Tagged: Every boundary enum carries a `type` discriminant so payloads
//!   can be matched exhaustively on either side
//! * Stable: Changes only when the embedder contract changes
//!
//! The behavior built on top of these shapes lives in `warren`.

pub mod command;
pub mod geometry;
pub mod ids;
pub mod notification;

pub use command::*;
pub use geometry::*;
pub use ids::*;
pub use notification::*;
