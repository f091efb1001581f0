//! Stdout side of the shell's line protocol.
//!
//! Notifications stream out as they are emitted; queries and malformed
//! input are answered with a tagged [`Reply`] line.

use serde::Serialize;
use tracing::warn;
use warren::sink::EventSink;
use warren_protocol::{GroupId, GroupInfo, Notification, TabInfo};

/// Answer to a query command or a rejected input line.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Reply {
    Groups { groups: Vec<GroupInfo> },
    Tabs { group: GroupId, tabs: Vec<TabInfo> },
    Error { message: String },
}

/// Prints every notification as one JSON line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn notify(&mut self, notification: Notification) {
        match serde_json::to_string(&notification) {
            Ok(line) => println!("{line}"),
            Err(err) => {
                warn!(target = "warren.shell", error = %err, "notification not serializable");
            }
        }
    }
}

pub fn print_reply(reply: &Reply) {
    match serde_json::to_string(reply) {
        Ok(line) => println!("{line}"),
        Err(err) => {
            warn!(target = "warren.shell", error = %err, "reply not serializable");
        }
    }
}
