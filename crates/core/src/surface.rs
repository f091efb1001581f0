//! View-surface capability boundary and lifecycle state machine.
//!
//! A surface is the renderable, navigable unit backing a tab. The embedder
//! provides surfaces through [`SurfaceHost`]; the core wraps each one in a
//! [`Surface`] that tracks its compositing lifecycle explicitly, so that
//! hide-on-deactivate can never degenerate into use-after-destroy.

use tracing::trace;
use warren_protocol::{Bounds, SurfaceId};

use crate::error::{Result, WarrenError};
use crate::group::PartitionKey;

/// Compositing lifecycle of a view surface.
///
/// Legal transitions: `Created -> Attached`, `Attached <-> Detached`, and
/// any live state `-> Destroyed`. Every transition out of `Destroyed` is
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Created,
    Attached,
    Detached,
    Destroyed,
}

/// Inbound events reported by a view surface to the control thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    DidNavigate { url: String },
    DidStartLoading,
    DidStopLoading,
    TitleUpdated { title: String },
    NewWindowRequested { url: String },
}

/// A renderable, navigable view with its own session-scoped history stack.
///
/// Implementations carry out long-running work (loads, fetches) on their own
/// time and report progress through [`SurfaceEvent`]s, which the embedder
/// dispatches back into the core on the control thread.
pub trait ViewSurface {
    /// Handle assigned by the host at creation, used to route events.
    fn id(&self) -> SurfaceId;

    fn load_url(&mut self, url: &str) -> Result<()>;
    fn go_back(&mut self);
    fn go_forward(&mut self);
    fn reload(&mut self);
    fn set_bounds(&mut self, bounds: Bounds);
    fn attach(&mut self);
    fn detach(&mut self);
    fn destroy(&mut self);

    fn url(&self) -> String;
    fn title(&self) -> String;
    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;
    fn is_loading(&self) -> bool;
}

/// Factory half of the capability: creates surfaces and exposes the host
/// window the runtime composites into.
pub trait SurfaceHost {
    /// Creates a surface scoped to `partition` and begins loading `url`.
    fn create_surface(&mut self, url: &str, partition: &PartitionKey) -> Result<Box<dyn ViewSurface>>;

    /// Content bounds of the host window, or `None` when no window is
    /// available (startup races, window already closed).
    fn window_bounds(&self) -> Option<Bounds>;
}

/// Lifecycle wrapper around one host surface.
///
/// All attach/detach/destroy traffic from the controllers flows through
/// here; the wrapper refuses every operation on a destroyed surface and
/// makes redundant attach/detach calls idempotent.
pub struct Surface {
    inner: Box<dyn ViewSurface>,
    state: SurfaceState,
}

impl Surface {
    pub fn new(inner: Box<dyn ViewSurface>) -> Self {
        Self {
            inner,
            state: SurfaceState::Created,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.inner.id()
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.state == SurfaceState::Attached
    }

    pub fn url(&self) -> String {
        self.inner.url()
    }

    pub fn title(&self) -> String {
        self.inner.title()
    }

    pub fn can_go_back(&self) -> bool {
        self.inner.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.inner.can_go_forward()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    /// Composites the surface into the host viewport.
    pub fn attach(&mut self) -> Result<()> {
        match self.state {
            SurfaceState::Attached => Ok(()),
            SurfaceState::Destroyed => Err(self.lifecycle_error("attach")),
            SurfaceState::Created | SurfaceState::Detached => {
                self.inner.attach();
                self.transition(SurfaceState::Attached);
                Ok(())
            }
        }
    }

    /// Removes the surface from the host viewport, keeping it alive.
    pub fn detach(&mut self) -> Result<()> {
        match self.state {
            SurfaceState::Created | SurfaceState::Detached => Ok(()),
            SurfaceState::Destroyed => Err(self.lifecycle_error("detach")),
            SurfaceState::Attached => {
                self.inner.detach();
                self.transition(SurfaceState::Detached);
                Ok(())
            }
        }
    }

    /// Releases the surface. Terminal: every later operation is rejected.
    pub fn destroy(&mut self) -> Result<()> {
        if self.state == SurfaceState::Destroyed {
            return Err(self.lifecycle_error("destroy"));
        }
        self.inner.destroy();
        self.transition(SurfaceState::Destroyed);
        Ok(())
    }

    pub fn set_bounds(&mut self, bounds: Bounds) -> Result<()> {
        if self.state == SurfaceState::Destroyed {
            return Err(self.lifecycle_error("lay out"));
        }
        self.inner.set_bounds(bounds);
        Ok(())
    }

    pub fn load_url(&mut self, url: &str) -> Result<()> {
        if self.state == SurfaceState::Destroyed {
            return Err(self.lifecycle_error("navigate"));
        }
        self.inner.load_url(url)
    }

    pub fn go_back(&mut self) -> Result<()> {
        if self.state == SurfaceState::Destroyed {
            return Err(self.lifecycle_error("navigate"));
        }
        self.inner.go_back();
        Ok(())
    }

    pub fn go_forward(&mut self) -> Result<()> {
        if self.state == SurfaceState::Destroyed {
            return Err(self.lifecycle_error("navigate"));
        }
        self.inner.go_forward();
        Ok(())
    }

    pub fn reload(&mut self) -> Result<()> {
        if self.state == SurfaceState::Destroyed {
            return Err(self.lifecycle_error("reload"));
        }
        self.inner.reload();
        Ok(())
    }

    fn transition(&mut self, next: SurfaceState) {
        trace!(
            target = "warren.surface",
            surface = %self.id(),
            from = ?self.state,
            to = ?next,
            "surface transition"
        );
        self.state = next;
    }

    fn lifecycle_error(&self, op: &'static str) -> WarrenError {
        WarrenError::SurfaceLifecycle {
            op,
            state: self.state,
        }
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id())
            .field("state", &self.state)
            .finish()
    }
}
