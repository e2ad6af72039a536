//! Check command
//!
//! Usage: wiregroup check --data-dir <DIR> --slots <FILE> --manifest <FILE>
//!
//! Exits non-zero when the manifest on disk differs from the one the
//! current corpus and configuration produce.

use std::path::PathBuf;

use clap::Args;
use wiregroup_core::errors::{ExError, ExErrorKind};
use wiregroup_engine::{check_manifest, ManifestStatus};
use wiregroup_store::read_manifest;

use super::InputArgs;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Manifest to compare against
    #[arg(long, default_value = "packets.toml")]
    pub manifest: PathBuf,
}

/// Execute check command
pub fn execute(args: CheckArgs) -> anyhow::Result<()> {
    let (loaded, config) = args.input.load()?;
    let on_disk = read_manifest(&args.manifest)?;

    match check_manifest(&loaded.corpus, &config, on_disk.as_deref())? {
        ManifestStatus::UpToDate { digest } => {
            println!("Manifest up to date: {} ({})", args.manifest.display(), digest);
            Ok(())
        }
        ManifestStatus::Stale { expected, found } => {
            let message = match found {
                Some(found) => format!(
                    "{} is stale: digest {} but inputs produce {}",
                    args.manifest.display(),
                    found,
                    expected
                ),
                None => format!("{} does not exist", args.manifest.display()),
            };
            Err(ExError::new(ExErrorKind::ManifestStale)
                .with_op("check")
                .with_message(message)
                .into())
        }
    }
}
