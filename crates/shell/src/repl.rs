//! Command dispatch for the shell's stdin/stdout loop.

use warren::headless::HeadlessHost;
use warren::GroupManager;
use warren_protocol::Command;

use crate::wire::Reply;

/// Parses one input line, applies it, and pumps pending surface events.
/// Returns a reply for queries and rejected input; mutations answer through
/// notifications alone.
pub fn dispatch(manager: &mut GroupManager, host: &HeadlessHost, line: &str) -> Option<Reply> {
    let command: Command = match serde_json::from_str(line.trim()) {
        Ok(command) => command,
        Err(err) => {
            return Some(Reply::Error {
                message: format!("invalid command: {err}"),
            });
        }
    };
    let reply = apply(manager, command);
    pump(manager, host);
    reply
}

/// Dispatches surface events queued by the host onto the control thread.
pub fn pump(manager: &mut GroupManager, host: &HeadlessHost) {
    for (surface, event) in host.drain_events() {
        manager.handle_surface_event(surface, event);
    }
}

fn apply(manager: &mut GroupManager, command: Command) -> Option<Reply> {
    match command {
        Command::CreateGroup { name } => {
            manager.create_group(name.as_deref());
            None
        }
        Command::SetActiveGroup { id } => {
            manager.set_active_group(id);
            None
        }
        Command::CloseGroup { id } => {
            manager.close_group(id);
            None
        }
        Command::RenameGroup { id, name } => {
            manager.rename_group(id, &name);
            None
        }
        Command::CreateTab { url } => {
            manager.create_tab(url.as_deref());
            None
        }
        Command::CloseTab { group, tab } => {
            manager.close_tab(group, tab);
            None
        }
        Command::NavigateTo { url } => {
            manager.navigate_to(&url);
            None
        }
        Command::GoBack => {
            manager.go_back();
            None
        }
        Command::GoForward => {
            manager.go_forward();
            None
        }
        Command::Refresh => {
            manager.refresh();
            None
        }
        Command::Resize { bounds } => {
            manager.handle_resize(bounds);
            None
        }
        Command::ListGroups => Some(Reply::Groups {
            groups: manager.list_groups(),
        }),
        Command::ListTabs { group } => Some(Reply::Tabs {
            group,
            tabs: manager.list_tabs(group),
        }),
    }
}
