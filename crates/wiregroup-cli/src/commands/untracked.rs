//! Untracked packets command
//!
//! Usage: wiregroup untracked --data-dir <DIR> --slots <FILE> [--json]

use clap::Args;
use wiregroup_engine::untracked_packets;

use super::InputArgs;

#[derive(Debug, Args)]
pub struct UntrackedArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute untracked command
pub fn execute(args: UntrackedArgs) -> anyhow::Result<()> {
    let (loaded, config) = args.input.load()?;
    let untracked = untracked_packets(&loaded.corpus, &config.registry)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&untracked)?);
        return Ok(());
    }

    if untracked.is_empty() {
        println!("Every packet in the corpus is tracked");
        return Ok(());
    }
    for packet in &untracked {
        let name = loaded
            .names
            .get(&packet.first_version)
            .map(String::as_str)
            .unwrap_or("?");
        println!(
            "{} (first seen in {} / {} as {})",
            packet.label(),
            packet.first_version,
            name,
            packet.wire_id
        );
    }
    println!("{} untracked packet(s)", untracked.len());

    Ok(())
}
