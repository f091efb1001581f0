//! Lifecycle core for a multi-session browser shell.
//!
//! Warren manages multiple isolated browsing contexts ("tab groups"), each
//! containing navigable view instances ("tabs"), composited one-at-a-time
//! into a single host window. The [`manager::GroupManager`] routes every
//! inbound request to the right per-group [`controller::NavigationController`]
//! and keeps two nesting levels of exactly-one-active selection intact:
//!
//! * with at least one group, exactly one group is active;
//! * within every non-empty group, exactly one tab is active;
//! * at most one surface is attached to the host viewport, and it belongs to
//!   the active tab of the active group;
//! * closing the last tab or the last group synchronously creates a default
//!   replacement; the tree never reaches a zero-tab or zero-group state.
//!
//! Rendering and networking stay outside: the embedder injects a
//! [`surface::SurfaceHost`] capability that creates navigable surfaces, plus
//! an event sink and a history recorder for the outbound boundaries. The
//! whole core is synchronous and single-threaded; surface events are fed
//! back in on the same control thread via
//! [`manager::GroupManager::handle_surface_event`].

pub mod controller;
pub mod error;
pub mod group;
pub mod headless;
pub mod layout;
pub mod manager;
pub mod sink;
pub mod surface;
pub mod tab;

pub use error::{Result, WarrenError};
pub use group::{PartitionKey, TabGroup};
pub use manager::{DEFAULT_HOMEPAGE, GroupManager, ManagerConfig};
pub use surface::{SurfaceEvent, SurfaceHost, SurfaceState, ViewSurface};
