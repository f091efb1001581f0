//! Headless shell entry point: commands in on stdin, notifications and
//! replies out on stdout, one JSON object per line.

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use warren::headless::HeadlessHost;
use warren::sink::{HistoryRecorder, NullHistory};
use warren::{GroupManager, ManagerConfig};
use warren_protocol::Bounds;

mod cli;
mod history;
mod logging;
mod repl;
mod wire;

use history::JsonlHistory;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init(args.verbose);

    let window = Bounds::new(0, 0, args.width, args.height);
    let host = HeadlessHost::new(window);
    let history: Box<dyn HistoryRecorder> = if args.no_history {
        Box::new(NullHistory)
    } else {
        let path = args
            .history_file
            .clone()
            .unwrap_or_else(JsonlHistory::default_path);
        Box::new(JsonlHistory::open(path))
    };

    let mut manager = GroupManager::new(
        Box::new(host.clone()),
        Box::new(wire::StdoutSink),
        history,
        ManagerConfig {
            homepage: args.homepage.clone(),
            window,
        },
    );

    // A browser window opens with one group and one tab ready; the first
    // command never races an empty tree.
    manager.create_group(None);
    repl::pump(&mut manager, &host);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                if let Some(reply) = repl::dispatch(&mut manager, &host, &line) {
                    wire::print_reply(&reply);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!(target = "warren.shell", "interrupted; shutting down");
                break;
            }
        }
    }

    Ok(())
}
