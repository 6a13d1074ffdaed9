use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::anyhow;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::composite::background::render_background;
use crate::composite::compositor::{CompositeResult, composite_images};
use crate::foundation::error::{LogofitError, LogofitResult};
use crate::pipeline::engine::{LogoAnalysis, analyze, compute_layout};
use crate::pipeline::prepare::prepare_logo;
use crate::pipeline::presets::Preset;

/// Worker-pool settings for [`render_batch`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOpts {
    /// Worker count; `None` lets rayon pick.
    pub threads: Option<usize>,
    /// Checked before each preset starts; once set, remaining presets report `Cancelled`.
    #[serde(skip)]
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Outcome of one preset in a batch.
#[derive(Debug)]
pub struct PresetOutcome {
    /// Preset name.
    pub name: String,
    /// Encoded composite or the error that stopped this preset.
    pub result: LogofitResult<CompositeResult>,
}

/// Render one preset end to end: layout, prepare, background, composite.
#[tracing::instrument(skip(source, analysis, preset), fields(preset = %preset.name))]
pub fn render_preset(
    source: &[u8],
    analysis: &LogoAnalysis,
    preset: &Preset,
) -> LogofitResult<CompositeResult> {
    let layout = compute_layout(analysis, preset.width, preset.height, &preset.layout_options())?;
    let logo = prepare_logo(source, analysis, &layout)?;
    let background = render_background(&preset.background, preset.width, preset.height)?;
    composite_images(&background, &logo, &layout, preset.format, preset.quality)
}

/// Analyze `source` once and render every preset on a bounded worker pool.
///
/// Analysis failures fail the whole batch. Per-preset failures are reported in the
/// matching [`PresetOutcome`]; outcomes keep the order of `presets`.
#[tracing::instrument(skip(source, presets, opts), fields(len = source.len(), presets = presets.len()))]
pub fn render_batch(
    source: &[u8],
    mime: &str,
    presets: &[Preset],
    opts: &BatchOpts,
) -> LogofitResult<Vec<PresetOutcome>> {
    let analysis = analyze(source, mime)?;
    let pool = build_thread_pool(opts.threads)?;
    let cancelled = || {
        opts.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    };

    let outcomes: Vec<PresetOutcome> = pool.install(|| {
        presets
            .par_iter()
            .map(|preset| {
                let result = if cancelled() {
                    Err(LogofitError::Cancelled)
                } else {
                    render_preset(source, &analysis, preset)
                };
                if let Err(e) = &result {
                    tracing::warn!(preset = %preset.name, error = %e, "preset failed");
                }
                PresetOutcome {
                    name: preset.name.clone(),
                    result,
                }
            })
            .collect()
    });

    let ok = outcomes.iter().filter(|o| o.result.is_ok()).count();
    tracing::debug!(ok, total = outcomes.len(), "batch finished");
    Ok(outcomes)
}

fn build_thread_pool(threads: Option<usize>) -> LogofitResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(anyhow!("batch 'threads' must be >= 1 when set").into());
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
