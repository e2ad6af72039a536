//! Subcommands and the inputs they share

pub mod check;
pub mod run;
pub mod untracked;

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use wiregroup_store::{load_corpus, parse_slot_config_file, CorpusFilter, LoadedCorpus, SlotConfig};

/// Where the corpus and the slot configuration come from
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Corpus directory (minecraft-data `data/pc`)
    #[arg(long)]
    pub data_dir: PathBuf,

    /// Slot configuration (.toml, .yaml or .yml)
    #[arg(long)]
    pub slots: PathBuf,

    /// Also load snapshots and pre-releases
    #[arg(long)]
    pub include_snapshots: bool,

    /// Ignore common/protocolVersions.json
    #[arg(long)]
    pub ignore_common_list: bool,
}

impl InputArgs {
    fn filter(&self) -> CorpusFilter {
        CorpusFilter {
            release_only: !self.include_snapshots,
            use_common_list: !self.ignore_common_list,
        }
    }

    /// Parse the slot configuration, then load the corpus
    pub fn load(&self) -> anyhow::Result<(LoadedCorpus, SlotConfig)> {
        let config = parse_slot_config_file(&self.slots)
            .with_context(|| format!("loading slot configuration {}", self.slots.display()))?;
        let loaded = load_corpus(&self.data_dir, &self.filter())
            .with_context(|| format!("loading corpus from {}", self.data_dir.display()))?;
        if loaded.corpus.is_empty() {
            anyhow::bail!("no protocol versions found under {}", self.data_dir.display());
        }
        Ok((loaded, config))
    }
}
