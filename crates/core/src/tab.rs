//! Tabs: identity wrappers over owned view surfaces.

use warren_protocol::{TabId, TabInfo};

use crate::surface::Surface;

/// One navigable view instance within a tab group.
///
/// A tab is deliberately thin: navigation state (`canGoBack`, loading, the
/// live url) belongs to the surface and is read from it, never duplicated
/// here. `url` only remembers the last requested or reported address so the
/// tab stays describable while its surface is mid-load.
#[derive(Debug)]
pub struct Tab {
    id: TabId,
    url: String,
    pub(crate) surface: Surface,
}

impl Tab {
    pub(crate) fn new(id: TabId, url: impl Into<String>, surface: Surface) -> Self {
        Self {
            id,
            url: url.into(),
            surface,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    /// Last requested or reported address.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub(crate) fn info(&self, active: Option<TabId>) -> TabInfo {
        TabInfo {
            id: self.id,
            url: self.surface.url(),
            title: self.surface.title(),
            is_active: active == Some(self.id),
        }
    }
}
