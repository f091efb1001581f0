//! Inbound commands from the presentation layer.

use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;
use crate::ids::{GroupId, TabId};

/// One request from the presentation layer to the runtime.
///
/// Structural commands (`createGroup`, `closeTab`, ...) mutate the group/tab
/// tree; navigation commands act on the active tab of the active group;
/// `listGroups`/`listTabs` are pure reads answered with a reply instead of a
/// notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    CreateGroup {
        #[serde(default)]
        name: Option<String>,
    },
    SetActiveGroup {
        id: GroupId,
    },
    CloseGroup {
        id: GroupId,
    },
    RenameGroup {
        id: GroupId,
        name: String,
    },
    CreateTab {
        #[serde(default)]
        url: Option<String>,
    },
    CloseTab {
        group: GroupId,
        tab: TabId,
    },
    NavigateTo {
        url: String,
    },
    GoBack,
    GoForward,
    Refresh,
    Resize {
        bounds: Bounds,
    },
    ListGroups,
    ListTabs {
        group: GroupId,
    },
}
