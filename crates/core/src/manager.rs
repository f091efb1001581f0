//! Top-level group manager.
//!
//! Routes every inbound request either to group-level handling or to the
//! right per-group [`NavigationController`], emits lifecycle notifications,
//! and dispatches inbound surface events. Constructed once by the process
//! entry point with its collaborators injected; there are no ambient
//! singletons anywhere in the core.

use tracing::{debug, trace, warn};
use warren_protocol::{Bounds, GroupId, GroupInfo, HistoryEntry, Notification, SurfaceId, TabId, TabInfo};

use crate::controller::NavigationController;
use crate::group::{PartitionKey, TabGroup};
use crate::sink::{now_ts, EventSink, HistoryRecorder};
use crate::surface::{SurfaceEvent, SurfaceHost};
use crate::tab::Tab;

/// Address loaded into tabs created without an explicit url.
pub const DEFAULT_HOMEPAGE: &str = "https://www.google.com";

/// Construction-time settings for a [`GroupManager`].
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Default address for tabs created without an explicit url.
    pub homepage: String,
    /// Window bounds assumed until the host reports real ones.
    pub window: Bounds,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            homepage: DEFAULT_HOMEPAGE.to_string(),
            window: Bounds::new(0, 0, 1200, 800),
        }
    }
}

/// Issues opaque, never-reused identifiers for groups and tabs.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    groups: u64,
    tabs: u64,
}

impl IdAllocator {
    fn next_group(&mut self) -> GroupId {
        self.groups += 1;
        GroupId::from_raw(self.groups)
    }

    pub(crate) fn next_tab(&mut self) -> TabId {
        self.tabs += 1;
        TabId::from_raw(self.tabs)
    }
}

/// Borrowed collaborator bundle threaded from the manager into controller
/// calls, scoped to the group being operated on.
pub(crate) struct Deps<'a> {
    pub host: &'a mut dyn SurfaceHost,
    pub sink: &'a mut dyn EventSink,
    pub ids: &'a mut IdAllocator,
    pub homepage: &'a str,
    pub group: GroupId,
}

/// Owns the ordered group list and the single active-group selection.
pub struct GroupManager {
    host: Box<dyn SurfaceHost>,
    sink: Box<dyn EventSink>,
    history: Box<dyn HistoryRecorder>,
    config: ManagerConfig,
    groups: Vec<TabGroup>,
    active_group: Option<GroupId>,
    /// Last known host window bounds; hidden groups are laid out against
    /// this lazily when they regain the viewport.
    window: Bounds,
    ids: IdAllocator,
}

impl GroupManager {
    pub fn new(
        host: Box<dyn SurfaceHost>,
        sink: Box<dyn EventSink>,
        history: Box<dyn HistoryRecorder>,
        config: ManagerConfig,
    ) -> Self {
        let window = host.window_bounds().unwrap_or(config.window);
        Self {
            host,
            sink,
            history,
            config,
            groups: Vec::new(),
            active_group: None,
            window,
            ids: IdAllocator::default(),
        }
    }

    /// Creates a group with a fresh partition and one default tab, makes it
    /// the active group, and returns its id.
    ///
    /// Notification order is `groupCreated`, `tabCreated`, `tabActivated`.
    /// Skipped entirely (returning `None`) when the host window is
    /// unavailable.
    pub fn create_group(&mut self, name: Option<&str>) -> Option<GroupId> {
        let Some(window) = self.host.window_bounds() else {
            warn!(target = "warren.manager", "host window unavailable; group creation skipped");
            return None;
        };
        self.window = window;

        let id = self.ids.next_group();
        let name = name
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Group {}", self.groups.len() + 1));
        let partition = PartitionKey::for_group(id);
        let mut controller = NavigationController::new(partition.clone(), window);

        // Surface creation is the only fallible step; it happens before the
        // group is announced so a capability failure retracts cleanly.
        let initial = {
            let Self {
                host,
                sink,
                ids,
                config,
                ..
            } = self;
            let mut deps = Deps {
                host: host.as_mut(),
                sink: sink.as_mut(),
                ids,
                homepage: &config.homepage,
                group: id,
            };
            controller.spawn_tab(None, &mut deps)
        };
        let initial = match initial {
            Ok(tab) => tab,
            Err(err) => {
                warn!(
                    target = "warren.manager",
                    group = %id,
                    error = %err,
                    "initial tab creation failed; group dropped"
                );
                self.sink.notify(Notification::SurfaceFailed {
                    group: id,
                    tab: None,
                    reason: err.to_string(),
                });
                return None;
            }
        };

        self.sink.notify(Notification::GroupCreated {
            id,
            name: name.clone(),
        });

        // The fresh group takes the viewport immediately.
        if let Some(current) = self.active_group_entry_mut() {
            current.controller.hide_all_tabs();
        }
        self.sink.notify(Notification::TabCreated {
            id: initial,
            url: self.config.homepage.clone(),
        });
        controller.set_visible(true);
        controller.set_active_tab(initial, self.sink.as_mut());

        let mut group = TabGroup::new(id, name, partition, controller);
        group.remember_active_tab(Some(initial));
        self.groups.push(group);
        self.active_group = Some(id);
        debug!(target = "warren.manager", group = %id, "group created");
        Some(id)
    }

    /// Hands the viewport to `id`. No-op when unknown or already active.
    pub fn set_active_group(&mut self, id: GroupId) {
        if self.active_group == Some(id) {
            return;
        }
        if !self.groups.iter().any(|group| group.id() == id) {
            debug!(target = "warren.manager", group = %id, "activation of unknown group ignored");
            return;
        }

        if let Some(current) = self.active_group_entry_mut() {
            current.controller.hide_all_tabs();
        }
        self.active_group = Some(id);

        let window = self.window;
        let Self { groups, sink, .. } = self;
        let Some(group) = groups.iter_mut().find(|group| group.id() == id) else {
            return;
        };
        group.controller.restore_active_tab(window, sink.as_mut());
        group.remember_active_tab(group.controller.active_tab_id());
        sink.notify(Notification::GroupActivated {
            id,
            name: group.name().to_owned(),
            active_tab_id: group.controller.active_tab_id(),
        });
        debug!(target = "warren.manager", group = %id, "group activated");
    }

    /// Force-closes every tab of `id` and removes the group.
    ///
    /// Closing the active group hands the viewport to the group that slid
    /// into its slot (clamped to the new last index); closing the only
    /// group creates a replacement default group instead.
    pub fn close_group(&mut self, id: GroupId) {
        let Some(index) = self.groups.iter().position(|group| group.id() == id) else {
            debug!(target = "warren.manager", group = %id, "close of unknown group ignored");
            return;
        };

        let was_active = self.active_group == Some(id);
        let mut group = self.groups.remove(index);
        group.controller.close_all_tabs(self.sink.as_mut());

        if was_active {
            self.active_group = None;
            if self.groups.is_empty() {
                self.create_group(None);
            } else {
                let next = self.groups[index.min(self.groups.len() - 1)].id();
                self.set_active_group(next);
            }
        }

        self.sink.notify(Notification::GroupClosed { id });
        debug!(target = "warren.manager", group = %id, "group closed");
    }

    /// Renames `id`. The new name shows up in `listGroups` and in later
    /// `groupActivated` payloads.
    pub fn rename_group(&mut self, id: GroupId, name: &str) {
        let Some(group) = self.groups.iter_mut().find(|group| group.id() == id) else {
            debug!(target = "warren.manager", group = %id, "rename of unknown group ignored");
            return;
        };
        group.set_name(name);
    }

    /// Creates a tab in the active group and returns its id.
    ///
    /// Without an active group a default group is created first; that group
    /// already brings its own default tab, so an explicit `url` is routed to
    /// the fresh tab with a follow-up navigation instead of opening a
    /// second one.
    pub fn create_tab(&mut self, url: Option<&str>) -> Option<TabId> {
        if self.active_group.is_none() {
            self.create_group(None)?;
            if let Some(url) = url {
                self.navigate_to(url);
            }
            return self
                .active_group_entry()
                .and_then(|group| group.controller.active_tab_id());
        }

        let Self {
            groups,
            host,
            sink,
            ids,
            config,
            active_group,
            ..
        } = self;
        let group_id = (*active_group)?;
        let Some(group) = groups.iter_mut().find(|group| group.id() == group_id) else {
            return None;
        };
        let mut deps = Deps {
            host: host.as_mut(),
            sink: sink.as_mut(),
            ids,
            homepage: &config.homepage,
            group: group_id,
        };
        match group.controller.create_tab(url, &mut deps) {
            Ok(tab) => {
                group.remember_active_tab(Some(tab));
                Some(tab)
            }
            Err(err) => {
                warn!(
                    target = "warren.manager",
                    group = %group_id,
                    error = %err,
                    "tab creation failed"
                );
                sink.notify(Notification::SurfaceFailed {
                    group: group_id,
                    tab: None,
                    reason: err.to_string(),
                });
                None
            }
        }
    }

    /// Closes `tab` in `group_id` (any group, not only the active one) and
    /// refreshes that group's restore memory.
    pub fn close_tab(&mut self, group_id: GroupId, tab: TabId) {
        let Self {
            groups,
            host,
            sink,
            ids,
            config,
            ..
        } = self;
        let Some(group) = groups.iter_mut().find(|group| group.id() == group_id) else {
            debug!(target = "warren.manager", group = %group_id, "tab close for unknown group ignored");
            return;
        };
        let mut deps = Deps {
            host: host.as_mut(),
            sink: sink.as_mut(),
            ids,
            homepage: &config.homepage,
            group: group_id,
        };
        group.controller.close_tab(tab, &mut deps);
        group.remember_active_tab(group.controller.active_tab_id());
    }

    /// Loads `url` in the active tab of the active group.
    pub fn navigate_to(&mut self, url: &str) {
        let Self {
            groups,
            host,
            sink,
            ids,
            config,
            active_group,
            ..
        } = self;
        let Some(group_id) = *active_group else {
            debug!(target = "warren.manager", "navigation without active group ignored");
            return;
        };
        let Some(group) = groups.iter_mut().find(|group| group.id() == group_id) else {
            return;
        };
        let mut deps = Deps {
            host: host.as_mut(),
            sink: sink.as_mut(),
            ids,
            homepage: &config.homepage,
            group: group_id,
        };
        group.controller.navigate_to(url, &mut deps);
    }

    pub fn go_back(&mut self) {
        if let Some(group) = self.active_group_entry_mut() {
            group.controller.go_back();
        }
    }

    pub fn go_forward(&mut self) {
        if let Some(group) = self.active_group_entry_mut() {
            group.controller.go_forward();
        }
    }

    pub fn refresh(&mut self) {
        if let Some(group) = self.active_group_entry_mut() {
            group.controller.refresh();
        }
    }

    /// Applies new window bounds to the active controller only. Hidden
    /// controllers keep stale layout and are re-laid-out lazily when they
    /// regain the viewport, which keeps resize cost independent of the
    /// number of groups.
    pub fn handle_resize(&mut self, window: Bounds) {
        self.window = window;
        if let Some(group) = self.active_group_entry_mut() {
            group.controller.handle_resize(window);
        }
    }

    /// Dispatches an inbound surface event on the control thread.
    ///
    /// `didNavigate` refreshes the owning tab's remembered url and, when the
    /// tab currently owns the viewport, records a history entry. Viewport-
    /// owning tabs also get a `tabUpdated` refresh for title/navigation
    /// state changes. Events for unknown surfaces are ignored: the surface
    /// may have been destroyed while the event was in flight.
    pub fn handle_surface_event(&mut self, surface: SurfaceId, event: SurfaceEvent) {
        let active_group = self.active_group;
        let Self {
            groups,
            sink,
            history,
            ..
        } = self;
        let Some(group) = groups
            .iter_mut()
            .find(|group| group.controller.owns_surface(surface))
        else {
            debug!(target = "warren.manager", surface = %surface, "event for unknown surface ignored");
            return;
        };

        let owns_viewport = active_group == Some(group.id())
            && group.controller.active_surface() == Some(surface);
        let Some(tab) = group.controller.tab_mut_by_surface(surface) else {
            return;
        };

        match event {
            SurfaceEvent::DidNavigate { url } => {
                tab.set_url(url.as_str());
                if owns_viewport {
                    history.record(HistoryEntry {
                        url,
                        title: tab.surface.title(),
                        timestamp: now_ts(),
                    });
                    sink.notify(tab_update(tab));
                }
            }
            SurfaceEvent::DidStartLoading => {
                trace!(target = "warren.manager", surface = %surface, "load started");
            }
            SurfaceEvent::DidStopLoading | SurfaceEvent::TitleUpdated { .. } => {
                if owns_viewport {
                    sink.notify(tab_update(tab));
                }
            }
            SurfaceEvent::NewWindowRequested { url } => {
                sink.notify(Notification::OpenExternalRequested { url });
            }
        }
    }

    /// Groups in creation order, with the active flag set on exactly one
    /// entry whenever any groups exist.
    pub fn list_groups(&self) -> Vec<GroupInfo> {
        self.groups
            .iter()
            .map(|group| GroupInfo {
                id: group.id(),
                name: group.name().to_owned(),
                is_active: self.active_group == Some(group.id()),
            })
            .collect()
    }

    /// Tabs of `group` in creation order; empty for unknown groups.
    pub fn list_tabs(&self, group: GroupId) -> Vec<TabInfo> {
        self.groups
            .iter()
            .find(|entry| entry.id() == group)
            .map(|entry| entry.controller.list_tabs())
            .unwrap_or_default()
    }

    pub fn active_group_id(&self) -> Option<GroupId> {
        self.active_group
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn group(&self, id: GroupId) -> Option<&TabGroup> {
        self.groups.iter().find(|group| group.id() == id)
    }

    /// Surface entitled to the host viewport right now, if any.
    pub fn active_surface(&self) -> Option<SurfaceId> {
        let group = self.active_group_entry()?;
        group.controller.active_surface()
    }

    fn active_group_entry(&self) -> Option<&TabGroup> {
        let id = self.active_group?;
        self.groups.iter().find(|group| group.id() == id)
    }

    fn active_group_entry_mut(&mut self) -> Option<&mut TabGroup> {
        let id = self.active_group?;
        self.groups.iter_mut().find(|group| group.id() == id)
    }
}

fn tab_update(tab: &Tab) -> Notification {
    Notification::TabUpdated {
        id: tab.id(),
        url: tab.surface.url(),
        title: tab.surface.title(),
        can_go_back: tab.surface.can_go_back(),
        can_go_forward: tab.surface.can_go_forward(),
    }
}
