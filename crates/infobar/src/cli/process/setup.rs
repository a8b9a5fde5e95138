//! Runner setup: input check, config overrides, asset loading.

use infobar_core::{AssetCache, BatchRunner, Config};
use std::sync::Arc;

use super::ProcessArgs;

/// Everything the batch needs, assembled before any file is touched.
pub(crate) struct ProcessContext {
    pub runner: BatchRunner,
    pub config: Config,
}

/// Validate input, apply CLI overrides to the config and load shared assets.
pub fn setup_runner(args: &ProcessArgs, mut config: Config) -> anyhow::Result<ProcessContext> {
    if !args.input.is_dir() {
        anyhow::bail!(
            "Input directory does not exist: {:?}\n\n  Hint: Pass a folder of photos, e.g. `infobar process ./photos`.",
            args.input
        );
    }

    apply_overrides(&mut config, args);
    config.check()?;

    let assets = AssetCache::load(&config);
    if assets.font_count() == 0 {
        tracing::warn!(
            "No fonts loaded; only the bar and logos will be drawn. Configure [assets.fonts] with `infobar config path`."
        );
    }
    tracing::info!(
        "Loaded {} font(s) and {} logo(s)",
        assets.font_count(),
        assets.logo_count()
    );

    let runner = BatchRunner::new(&config, Arc::new(assets));
    Ok(ProcessContext { runner, config })
}

fn apply_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(workers) = args.workers {
        config.processing.max_workers = workers;
    }
    if let Some(dir) = &args.logo_dir {
        config.assets.logo_dir = dir.to_string_lossy().into_owned();
    }
}
