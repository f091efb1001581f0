//! Outbound notifications and query row shapes.

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, TabId};

/// One lifecycle notification emitted toward the presentation layer.
///
/// Every mutation of the group/tab tree is announced through exactly one of
/// these variants, so the presentation layer never has to infer state
/// transitions from polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Notification {
    GroupCreated {
        id: GroupId,
        name: String,
    },
    GroupActivated {
        id: GroupId,
        name: String,
        active_tab_id: Option<TabId>,
    },
    GroupClosed {
        id: GroupId,
    },
    TabCreated {
        id: TabId,
        url: String,
    },
    TabActivated {
        id: TabId,
        url: String,
        title: String,
        can_go_back: bool,
        can_go_forward: bool,
    },
    /// Navigation-state refresh for the tab currently owning the viewport.
    TabUpdated {
        id: TabId,
        url: String,
        title: String,
        can_go_back: bool,
        can_go_forward: bool,
    },
    TabClosed {
        id: TabId,
    },
    /// A view-surface capability call failed. Scoped to one group and, when
    /// known, one tab; sibling tabs and groups are unaffected.
    SurfaceFailed {
        group: GroupId,
        tab: Option<TabId>,
        reason: String,
    },
    /// A surface asked for a new window; popups never open in-place.
    OpenExternalRequested {
        url: String,
    },
}

/// Row shape for `listGroups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub id: GroupId,
    pub name: String,
    pub is_active: bool,
}

/// Row shape for `listTabs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: TabId,
    pub url: String,
    pub title: String,
    pub is_active: bool,
}

/// Record handed to the persistence collaborator after a completed
/// navigation of the active tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub timestamp: u64,
}
