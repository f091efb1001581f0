//! Per-group navigation controller.
//!
//! Owns the ordered tab list of one group, tracks its single active tab,
//! and composites surfaces into the shared host viewport. Surfaces of
//! deactivated tabs are detached, never destroyed; destruction happens only
//! on tab closure or group teardown.
//!
//! The controller is deliberately passive about its collaborators: the
//! manager threads a [`Deps`] bundle into every call that needs the surface
//! host or the notification sink, which keeps the whole tree single-owner
//! and lock-free.

use tracing::{debug, warn};
use warren_protocol::{Bounds, Notification, SurfaceId, TabId, TabInfo};

use crate::error::Result;
use crate::group::PartitionKey;
use crate::layout;
use crate::manager::Deps;
use crate::sink::EventSink;
use crate::surface::Surface;
use crate::tab::Tab;

#[derive(Debug)]
pub struct NavigationController {
    partition: PartitionKey,
    tabs: Vec<Tab>,
    active_tab: Option<TabId>,
    viewport: Bounds,
    /// Whether the owning group currently holds the host viewport. Attach
    /// requests are suppressed while hidden; the active-tab pointer still
    /// moves so reactivation restores the right surface.
    visible: bool,
}

impl NavigationController {
    pub(crate) fn new(partition: PartitionKey, window: Bounds) -> Self {
        Self {
            partition,
            tabs: Vec::new(),
            active_tab: None,
            viewport: layout::content_viewport(window),
            visible: false,
        }
    }

    /// Creates a tab, announces it, and activates it. Returns the new id.
    pub(crate) fn create_tab(&mut self, url: Option<&str>, deps: &mut Deps<'_>) -> Result<TabId> {
        let id = self.spawn_tab(url, deps)?;
        let url = self
            .tab(id)
            .map(|tab| tab.url().to_owned())
            .unwrap_or_default();
        deps.sink.notify(Notification::TabCreated { id, url });
        self.set_active_tab(id, deps.sink);
        Ok(id)
    }

    /// Creates a tab without announcing or activating it.
    ///
    /// The split exists so `createGroup` can order its notifications as
    /// group-then-tab while still doing the one fallible step (surface
    /// creation) before anything is announced.
    pub(crate) fn spawn_tab(&mut self, url: Option<&str>, deps: &mut Deps<'_>) -> Result<TabId> {
        let url = url.unwrap_or(deps.homepage);
        let raw = deps.host.create_surface(url, &self.partition)?;
        let mut surface = Surface::new(raw);
        // Lay out now so the eventual attach needs no second pass.
        let _ = surface.set_bounds(self.viewport);
        let id = deps.ids.next_tab();
        debug!(
            target = "warren.controller",
            tab = %id,
            url,
            partition = %self.partition,
            "tab created"
        );
        self.tabs.push(Tab::new(id, url, surface));
        Ok(id)
    }

    /// Switches the attached surface to `tab`.
    ///
    /// No-op when the id is unknown or already active. The outgoing surface
    /// is detached (hidden, kept alive); the incoming one is laid out at the
    /// current viewport and attached, then announced with its live
    /// url/title/navigation state.
    pub(crate) fn set_active_tab(&mut self, tab: TabId, sink: &mut dyn EventSink) {
        if self.active_tab == Some(tab) {
            return;
        }
        if self.tab(tab).is_none() {
            debug!(target = "warren.controller", tab = %tab, "activation of unknown tab ignored");
            return;
        }

        if let Some(previous) = self.active_tab {
            if let Some(previous) = self.tab_mut(previous) {
                if let Err(err) = previous.surface.detach() {
                    warn!(target = "warren.controller", tab = %previous.id(), error = %err, "detach failed");
                }
            }
        }

        self.active_tab = Some(tab);
        let viewport = self.viewport;
        let visible = self.visible;
        let Some(tab) = self.tab_mut(tab) else {
            return;
        };
        if visible {
            let _ = tab.surface.set_bounds(viewport);
            if let Err(err) = tab.surface.attach() {
                warn!(target = "warren.controller", tab = %tab.id(), error = %err, "attach failed");
            }
        }
        sink.notify(Notification::TabActivated {
            id: tab.id(),
            url: tab.surface.url(),
            title: tab.surface.title(),
            can_go_back: tab.surface.can_go_back(),
            can_go_forward: tab.surface.can_go_forward(),
        });
    }

    /// Destroys `tab` and removes it from the list.
    ///
    /// Closing the active tab activates the tab that slid into its slot
    /// (clamped to the new last index); closing the only tab creates a
    /// replacement default tab first, so the controller never stays empty.
    pub(crate) fn close_tab(&mut self, tab: TabId, deps: &mut Deps<'_>) {
        let Some(index) = self.tabs.iter().position(|t| t.id() == tab) else {
            debug!(target = "warren.controller", tab = %tab, "close of unknown tab ignored");
            return;
        };

        let mut closed = self.tabs.remove(index);
        let was_active = self.active_tab == Some(tab);
        if was_active {
            self.active_tab = None;
        }
        if let Err(err) = closed.surface.destroy() {
            warn!(target = "warren.controller", tab = %tab, error = %err, "destroy failed");
        }

        if was_active {
            if self.tabs.is_empty() {
                if let Err(err) = self.create_tab(None, deps) {
                    warn!(
                        target = "warren.controller",
                        group = %deps.group,
                        error = %err,
                        "replacement tab creation failed"
                    );
                    deps.sink.notify(Notification::SurfaceFailed {
                        group: deps.group,
                        tab: None,
                        reason: err.to_string(),
                    });
                }
            } else {
                let next = self.tabs[index.min(self.tabs.len() - 1)].id();
                self.set_active_tab(next, deps.sink);
            }
        }

        deps.sink.notify(Notification::TabClosed { id: tab });
    }

    /// Recomputes the viewport and lays out every tab surface, active or
    /// not, so pending attaches never need a second layout pass.
    pub(crate) fn handle_resize(&mut self, window: Bounds) {
        self.viewport = layout::content_viewport(window);
        for tab in &mut self.tabs {
            if let Err(err) = tab.surface.set_bounds(self.viewport) {
                warn!(target = "warren.controller", tab = %tab.id(), error = %err, "layout skipped");
            }
        }
    }

    /// Loads `url` in the active tab. Capability failures are announced as
    /// a tab-scoped failure, never propagated to sibling tabs.
    pub(crate) fn navigate_to(&mut self, url: &str, deps: &mut Deps<'_>) {
        let Some(active) = self.active_tab else {
            debug!(target = "warren.controller", "navigation without active tab ignored");
            return;
        };
        let Some(tab) = self.tab_mut(active) else {
            return;
        };
        tab.set_url(url);
        if let Err(err) = tab.surface.load_url(url) {
            warn!(target = "warren.controller", tab = %active, url, error = %err, "load failed");
            deps.sink.notify(Notification::SurfaceFailed {
                group: deps.group,
                tab: Some(active),
                reason: err.to_string(),
            });
        }
    }

    pub(crate) fn go_back(&mut self) {
        let Some(tab) = self.active_tab_mut() else {
            return;
        };
        if tab.surface.can_go_back() {
            let _ = tab.surface.go_back();
        }
    }

    pub(crate) fn go_forward(&mut self) {
        let Some(tab) = self.active_tab_mut() else {
            return;
        };
        if tab.surface.can_go_forward() {
            let _ = tab.surface.go_forward();
        }
    }

    pub(crate) fn refresh(&mut self) {
        let Some(tab) = self.active_tab_mut() else {
            return;
        };
        let _ = tab.surface.reload();
    }

    /// Detaches every surface without destroying any. Used when the owning
    /// group loses the viewport.
    pub(crate) fn hide_all_tabs(&mut self) {
        self.visible = false;
        for tab in &mut self.tabs {
            if let Err(err) = tab.surface.detach() {
                warn!(target = "warren.controller", tab = %tab.id(), error = %err, "detach failed");
            }
        }
    }

    /// Re-lays-out the controller at the current window bounds and
    /// re-attaches the remembered active tab. Used when the owning group
    /// regains the viewport; layout happens here, lazily, because hidden
    /// groups are skipped during resize.
    pub(crate) fn restore_active_tab(&mut self, window: Bounds, sink: &mut dyn EventSink) {
        self.visible = true;
        self.handle_resize(window);
        let Some(active) = self.active_tab else {
            return;
        };
        let Some(tab) = self.tab_mut(active) else {
            return;
        };
        if let Err(err) = tab.surface.attach() {
            warn!(target = "warren.controller", tab = %active, error = %err, "reattach failed");
            return;
        }
        sink.notify(Notification::TabActivated {
            id: tab.id(),
            url: tab.surface.url(),
            title: tab.surface.title(),
            can_go_back: tab.surface.can_go_back(),
            can_go_forward: tab.surface.can_go_forward(),
        });
    }

    /// Marks the controller as owning the viewport before its first tab is
    /// activated. Used by `createGroup`, where the fresh group takes over
    /// immediately.
    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Destroys every tab and empties the list.
    ///
    /// Only for group teardown: this is the one transition allowed to leave
    /// a controller with zero tabs, and it drains a snapshot so the
    /// self-healing path of `close_tab` cannot fight it.
    pub(crate) fn close_all_tabs(&mut self, sink: &mut dyn EventSink) {
        for mut tab in self.tabs.drain(..) {
            let id = tab.id();
            if let Err(err) = tab.surface.destroy() {
                warn!(target = "warren.controller", tab = %id, error = %err, "destroy failed");
            }
            sink.notify(Notification::TabClosed { id });
        }
        self.active_tab = None;
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab
    }

    /// Surface of the active tab, attached iff this controller is visible.
    pub fn active_surface(&self) -> Option<SurfaceId> {
        let active = self.active_tab?;
        self.tab(active).map(|tab| tab.surface.id())
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn list_tabs(&self) -> Vec<TabInfo> {
        self.tabs
            .iter()
            .map(|tab| tab.info(self.active_tab))
            .collect()
    }

    pub(crate) fn tab_mut_by_surface(&mut self, surface: SurfaceId) -> Option<&mut Tab> {
        self.tabs
            .iter_mut()
            .find(|tab| tab.surface.id() == surface)
    }

    pub(crate) fn owns_surface(&self, surface: SurfaceId) -> bool {
        self.tabs.iter().any(|tab| tab.surface.id() == surface)
    }

    fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id() == id)
    }

    fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.id() == id)
    }

    fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let active = self.active_tab?;
        self.tab_mut(active)
    }
}

#[cfg(test)]
mod tests {
    use warren_protocol::GroupId;

    use super::*;
    use crate::headless::HeadlessHost;
    use crate::manager::IdAllocator;
    use crate::sink::RecordingSink;

    struct Fixture {
        host: HeadlessHost,
        sink: RecordingSink,
        ids: IdAllocator,
        controller: NavigationController,
    }

    impl Fixture {
        fn new() -> Self {
            let group = GroupId::from_raw(1);
            let window = Bounds::new(0, 0, 1200, 800);
            let mut controller = NavigationController::new(PartitionKey::for_group(group), window);
            controller.set_visible(true);
            Self {
                host: HeadlessHost::new(window),
                sink: RecordingSink::new(),
                ids: IdAllocator::default(),
                controller,
            }
        }

        fn create_tab(&mut self, url: &str) -> TabId {
            let Self {
                host,
                sink,
                ids,
                controller,
            } = self;
            let mut deps = Deps {
                host,
                sink,
                ids,
                homepage: "https://home.test/",
                group: GroupId::from_raw(1),
            };
            controller.create_tab(Some(url), &mut deps).unwrap()
        }

        fn close_tab(&mut self, tab: TabId) {
            let Self {
                host,
                sink,
                ids,
                controller,
            } = self;
            let mut deps = Deps {
                host,
                sink,
                ids,
                homepage: "https://home.test/",
                group: GroupId::from_raw(1),
            };
            controller.close_tab(tab, &mut deps);
        }
    }

    #[test]
    fn closing_the_active_middle_tab_activates_the_slot_successor() {
        let mut fixture = Fixture::new();
        let _a = fixture.create_tab("https://a.test/");
        let b = fixture.create_tab("https://b.test/");
        let c = fixture.create_tab("https://c.test/");

        fixture.controller.set_active_tab(b, &mut fixture.sink);
        fixture.close_tab(b);

        assert_eq!(fixture.controller.active_tab_id(), Some(c));
    }

    #[test]
    fn closing_the_active_last_tab_clamps_to_the_new_last() {
        let mut fixture = Fixture::new();
        let _a = fixture.create_tab("https://a.test/");
        let b = fixture.create_tab("https://b.test/");
        let c = fixture.create_tab("https://c.test/");

        assert_eq!(fixture.controller.active_tab_id(), Some(c));
        fixture.close_tab(c);

        assert_eq!(fixture.controller.active_tab_id(), Some(b));
    }

    #[test]
    fn closing_an_inactive_tab_keeps_the_active_selection() {
        let mut fixture = Fixture::new();
        let a = fixture.create_tab("https://a.test/");
        let b = fixture.create_tab("https://b.test/");

        fixture.close_tab(a);

        assert_eq!(fixture.controller.active_tab_id(), Some(b));
        assert_eq!(fixture.controller.tab_count(), 1);
    }

    #[test]
    fn teardown_leaves_zero_tabs_without_self_healing() {
        let mut fixture = Fixture::new();
        fixture.create_tab("https://a.test/");
        fixture.create_tab("https://b.test/");

        fixture.controller.close_all_tabs(&mut fixture.sink);

        assert_eq!(fixture.controller.tab_count(), 0);
        assert_eq!(fixture.controller.active_tab_id(), None);
        let closures = fixture
            .sink
            .take()
            .into_iter()
            .filter(|event| matches!(event, Notification::TabClosed { .. }))
            .count();
        assert_eq!(closures, 2);
    }

    #[test]
    fn hidden_controllers_move_the_pointer_without_attaching() {
        let mut fixture = Fixture::new();
        let a = fixture.create_tab("https://a.test/");
        let b = fixture.create_tab("https://b.test/");

        fixture.controller.hide_all_tabs();
        assert!(fixture.host.attached().is_empty());

        fixture.controller.set_active_tab(a, &mut fixture.sink);
        assert_eq!(fixture.controller.active_tab_id(), Some(a));
        assert!(fixture.host.attached().is_empty(), "hidden groups never attach");

        fixture
            .controller
            .restore_active_tab(Bounds::new(0, 0, 1200, 800), &mut fixture.sink);
        assert_eq!(fixture.host.attached().len(), 1);
        let _ = b;
    }
}
