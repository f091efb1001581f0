//! Error types for the lifecycle core.
//!
//! Only genuine capability failures are errors. Operations referencing an
//! unknown id, or arriving while a required precondition (active group,
//! active tab, host window) is missing, are silent no-ops logged for
//! diagnostics: the presentation layer may legitimately race a stale id
//! against a just-processed closure.

use thiserror::Error;

use crate::surface::SurfaceState;

pub type Result<T> = std::result::Result<T, WarrenError>;

#[derive(Debug, Error)]
pub enum WarrenError {
    /// The host capability could not create a view surface.
    #[error("surface creation failed: {0}")]
    SurfaceCreate(String),

    /// A navigation or layout call on a live surface failed.
    #[error("surface operation failed: {0}")]
    Surface(String),

    /// An operation was attempted in a lifecycle state that forbids it.
    #[error("cannot {op} a surface in state {state:?}")]
    SurfaceLifecycle {
        op: &'static str,
        state: SurfaceState,
    },
}
