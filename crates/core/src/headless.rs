//! In-memory view-surface host for tests and the headless shell.
//!
//! Simulates just enough of a browser engine to exercise the lifecycle
//! core: per-surface navigation history, host-derived titles, partition and
//! attach/detach bookkeeping, and a queue of surface events the embedder
//! drains onto the control thread. The host is cloneable; clones share one
//! state, so a clone handed to the manager stays inspectable from outside.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;
use warren_protocol::{Bounds, SurfaceId};

use crate::error::{Result, WarrenError};
use crate::group::PartitionKey;
use crate::surface::{SurfaceEvent, SurfaceHost, ViewSurface};

#[derive(Debug, Default)]
struct HostState {
    next_surface: u64,
    window: Option<Bounds>,
    attached: BTreeSet<SurfaceId>,
    destroyed: BTreeSet<SurfaceId>,
    partitions: HashMap<SurfaceId, PartitionKey>,
    bounds: HashMap<SurfaceId, Bounds>,
    events: VecDeque<(SurfaceId, SurfaceEvent)>,
}

/// Engine-free [`SurfaceHost`] with inspectable shared state.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    state: Arc<Mutex<HostState>>,
}

impl HeadlessHost {
    pub fn new(window: Bounds) -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                window: Some(window),
                ..HostState::default()
            })),
        }
    }

    /// Replaces the host window, or removes it entirely with `None`.
    pub fn set_window(&self, window: Option<Bounds>) {
        self.state.lock().window = window;
    }

    /// Surfaces currently composited into the host viewport.
    pub fn attached(&self) -> Vec<SurfaceId> {
        self.state.lock().attached.iter().copied().collect()
    }

    /// Partition the surface was created under; survives destruction so
    /// isolation can be asserted after teardown.
    pub fn partition_of(&self, surface: SurfaceId) -> Option<PartitionKey> {
        self.state.lock().partitions.get(&surface).cloned()
    }

    /// Live surfaces created under `partition`, in creation order.
    pub fn surfaces_in(&self, partition: &PartitionKey) -> Vec<SurfaceId> {
        let state = self.state.lock();
        let mut surfaces: Vec<SurfaceId> = state
            .partitions
            .iter()
            .filter(|(id, key)| *key == partition && !state.destroyed.contains(id))
            .map(|(id, _)| *id)
            .collect();
        surfaces.sort();
        surfaces
    }

    /// Last bounds applied to a live surface.
    pub fn bounds_of(&self, surface: SurfaceId) -> Option<Bounds> {
        self.state.lock().bounds.get(&surface).copied()
    }

    pub fn is_destroyed(&self, surface: SurfaceId) -> bool {
        self.state.lock().destroyed.contains(&surface)
    }

    /// Drains queued surface events for same-thread dispatch.
    pub fn drain_events(&self) -> Vec<(SurfaceId, SurfaceEvent)> {
        self.state.lock().events.drain(..).collect()
    }

    /// Queues a popup request from `surface`, as an engine would on
    /// `window.open`.
    pub fn request_popup(&self, surface: SurfaceId, url: &str) {
        self.state
            .lock()
            .events
            .push_back((surface, SurfaceEvent::NewWindowRequested { url: url.to_string() }));
    }
}

impl SurfaceHost for HeadlessHost {
    fn create_surface(&mut self, url: &str, partition: &PartitionKey) -> Result<Box<dyn ViewSurface>> {
        let id = {
            let mut state = self.state.lock();
            if state.window.is_none() {
                return Err(WarrenError::SurfaceCreate(
                    "host window unavailable".to_string(),
                ));
            }
            state.next_surface += 1;
            let id = SurfaceId::from_raw(state.next_surface);
            state.partitions.insert(id, partition.clone());
            id
        };

        let mut surface = HeadlessSurface {
            id,
            state: Arc::clone(&self.state),
            entries: Vec::new(),
            index: 0,
            title: String::new(),
        };
        surface.navigate(url);
        Ok(Box::new(surface))
    }

    fn window_bounds(&self) -> Option<Bounds> {
        self.state.lock().window
    }
}

struct HeadlessSurface {
    id: SurfaceId,
    state: Arc<Mutex<HostState>>,
    /// Session history: visited addresses with `index` as the cursor.
    entries: Vec<String>,
    index: usize,
    title: String,
}

impl HeadlessSurface {
    fn navigate(&mut self, url: &str) {
        let url = normalize(url);
        if !self.entries.is_empty() {
            // A fresh navigation drops the forward stack.
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(url);
        self.index = self.entries.len() - 1;
        self.emit_navigation();
    }

    fn current(&self) -> &str {
        self.entries.get(self.index).map(String::as_str).unwrap_or("")
    }

    fn emit_navigation(&mut self) {
        let url = self.current().to_string();
        self.title = title_for(&url);
        let title = self.title.clone();
        let mut state = self.state.lock();
        state.events.push_back((self.id, SurfaceEvent::DidStartLoading));
        state
            .events
            .push_back((self.id, SurfaceEvent::DidNavigate { url }));
        state
            .events
            .push_back((self.id, SurfaceEvent::TitleUpdated { title }));
        state.events.push_back((self.id, SurfaceEvent::DidStopLoading));
    }
}

impl ViewSurface for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        self.navigate(url);
        Ok(())
    }

    fn go_back(&mut self) {
        if self.index > 0 {
            self.index -= 1;
            self.emit_navigation();
        }
    }

    fn go_forward(&mut self) {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            self.emit_navigation();
        }
    }

    fn reload(&mut self) {
        if !self.entries.is_empty() {
            self.emit_navigation();
        }
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        self.state.lock().bounds.insert(self.id, bounds);
    }

    fn attach(&mut self) {
        self.state.lock().attached.insert(self.id);
    }

    fn detach(&mut self) {
        self.state.lock().attached.remove(&self.id);
    }

    fn destroy(&mut self) {
        let mut state = self.state.lock();
        state.attached.remove(&self.id);
        state.bounds.remove(&self.id);
        state.destroyed.insert(self.id);
    }

    fn url(&self) -> String {
        self.current().to_string()
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn can_go_back(&self) -> bool {
        self.index > 0
    }

    fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    fn is_loading(&self) -> bool {
        false
    }
}

/// Best-effort address normalization: bare hostnames get an https scheme.
fn normalize(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => match Url::parse(&format!("https://{url}")) {
            Ok(parsed) => parsed.to_string(),
            Err(_) => url.to_string(),
        },
    }
}

fn title_for(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_string())
}
