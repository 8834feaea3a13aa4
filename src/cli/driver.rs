use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;
use tyinfer_solver::{CallId, InferenceMode, InferenceOptions, OverloadResolution, Type};

use super::args::{CliArgs, OutputFormat};
use super::reporter::Reporter;
use crate::scenario::Scenario;

/// Ranking of one call, ready for reporting.
#[derive(Clone, Debug)]
pub struct CallReport {
    pub call: CallId,
    pub name: String,
    pub resolution: OverloadResolution,
    /// Type of the call expression, when there is a unique best candidate.
    pub result: Option<Type>,
}

impl CallReport {
    pub fn has_applicable(&self) -> bool {
        !self.resolution.best().is_empty()
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario: {}", path.display()))?;
    Scenario::from_json(&text)
        .with_context(|| format!("failed to load scenario: {}", path.display()))
}

/// Scenario options with command-line flags applied on top.
pub fn effective_options(args: &CliArgs, file: &InferenceOptions) -> InferenceOptions {
    let mut options = file.clone();
    if args.best_effort {
        options.mode = InferenceMode::BestEffort;
    }
    if args.no_outer_context {
        options.outer_call_context = false;
    }
    options
}

/// Rank the calls named in `filter`, or every call when it is empty, in
/// declaration order.
pub fn rank_calls(
    scenario: &Scenario,
    options: &InferenceOptions,
    filter: &[String],
) -> Result<Vec<CallReport>> {
    let ids: Vec<CallId> = if filter.is_empty() {
        scenario.calls.ids().to_vec()
    } else {
        let mut ids = Vec::with_capacity(filter.len());
        for name in filter {
            let Some(id) = scenario.call_id(name) else {
                bail!("unknown call `{name}`");
            };
            ids.push(id);
        }
        ids
    };

    let mut reports = Vec::with_capacity(ids.len());
    for id in ids {
        let name = scenario.call_name(id).unwrap_or_default().to_string();
        let resolution = scenario
            .rank(id, options)
            .with_context(|| format!("failed to rank call `{name}`"))?;
        let result = scenario.call_type(id, options);
        info!(
            call = %name,
            candidates = resolution.candidates.len(),
            ambiguous = resolution.is_ambiguous(),
            "ranked"
        );
        reports.push(CallReport {
            call: id,
            name,
            resolution,
            result,
        });
    }
    Ok(reports)
}

/// Load, rank and render. Returns the report text.
pub fn run(args: &CliArgs, color: bool) -> Result<String> {
    let scenario = load_scenario(&args.scenario)?;
    let options = effective_options(args, &scenario.options);
    let reports = rank_calls(&scenario, &options, &args.calls)?;

    let reporter = Reporter::new(&scenario, color);
    match args.format {
        OutputFormat::Text => Ok(reporter.render_text(&reports)),
        OutputFormat::Json => reporter.render_json(&reports),
    }
}
