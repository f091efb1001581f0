//! Tab groups and their session partitions.

use std::fmt;

use warren_protocol::{GroupId, TabId};

use crate::controller::NavigationController;

/// Storage/cookie isolation key scoping every surface of one group.
///
/// Distinct keys guarantee that two groups never observe each other's
/// cookies or local storage. The key is fixed at group creation and shared
/// by every tab the group ever creates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionKey(String);

impl PartitionKey {
    /// Persistent partition key for `group`.
    pub fn for_group(group: GroupId) -> Self {
        Self(format!("persist:group-{group}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An isolated browsing session: identity, a storage partition, the
/// controller owning its tabs, and a memory of which tab to restore when
/// the group regains the viewport.
#[derive(Debug)]
pub struct TabGroup {
    id: GroupId,
    name: String,
    partition: PartitionKey,
    pub(crate) controller: NavigationController,
    last_active_tab: Option<TabId>,
}

impl TabGroup {
    pub(crate) fn new(
        id: GroupId,
        name: String,
        partition: PartitionKey,
        controller: NavigationController,
    ) -> Self {
        Self {
            id,
            name,
            partition,
            controller,
            last_active_tab: None,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn partition(&self) -> &PartitionKey {
        &self.partition
    }

    /// Best-effort memory of the tab to restore on reactivation.
    pub fn last_active_tab(&self) -> Option<TabId> {
        self.last_active_tab
    }

    pub(crate) fn remember_active_tab(&mut self, tab: Option<TabId>) {
        self.last_active_tab = tab;
    }
}
