//! The carve commands: copy each selection into its own new document.
//!
//! Orchestration only. Every effect goes through [`Host`]; the command itself
//! never touches the filesystem or raises user-visible errors. An invocation
//! that cannot proceed reports a [`SkipReason`] instead of failing.

use anyhow::Result;
use tracing::{debug, warn};

use crate::app::filename::{preview, suggested_name};
use crate::app::insert::{self, InsertTextArgs};
use crate::domain::model::{DocumentId, Region};
use crate::host::Host;
use crate::infra::config::Config;

/// How carved documents reach the host's save flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Open the save-as dialog for each new document.
    Prompt,
    /// Save each new document immediately.
    Direct,
}

/// Why an invocation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoActiveDocument,
    NoSelections,
    TooManySelections { count: usize, limit: usize },
}

/// One selection the command intends to carve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSelection {
    /// 1-based position among the non-empty selections.
    pub index: usize,
    pub region: Region,
    pub preview: String,
    pub suggested_name: String,
}

/// Read-only prefix of an invocation: the source document and what would be
/// carved from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarvePlan {
    pub document: DocumentId,
    pub selections: Vec<PlannedSelection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    Planned(CarvePlan),
    Skipped(SkipReason),
}

/// A document created by a carve invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDocument {
    pub document: DocumentId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CarveReport {
    pub created: Vec<CreatedDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarveOutcome {
    Completed(CarveReport),
    Skipped(SkipReason),
}

/// Whether the command should be offered: the active document must carry at
/// least one non-empty selection.
pub fn is_enabled(host: &dyn Host) -> bool {
    host.active_document()
        .is_some_and(|doc| host.selections(doc).iter().any(|region| !region.is_empty()))
}

/// Compute what a carve invocation would do, without side effects.
pub fn plan(host: &dyn Host, config: &Config) -> PlanOutcome {
    let Some(doc) = host.active_document() else {
        return PlanOutcome::Skipped(SkipReason::NoActiveDocument);
    };

    let regions: Vec<Region> = host
        .selections(doc)
        .into_iter()
        .filter(|region| !region.is_empty())
        .collect();
    if regions.is_empty() {
        return PlanOutcome::Skipped(SkipReason::NoSelections);
    }

    let limit = config.defaults.max_selections;
    if regions.len() > limit {
        return PlanOutcome::Skipped(SkipReason::TooManySelections {
            count: regions.len(),
            limit,
        });
    }

    let source_base = host
        .source_path(doc)
        .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let selections = regions
        .into_iter()
        .enumerate()
        .map(|(i, region)| {
            let index = i + 1;
            let text = host.text_in(doc, region);
            PlannedSelection {
                index,
                region,
                preview: preview(&text, config.defaults.preview_length),
                suggested_name: suggested_name(
                    &text,
                    &source_base,
                    index,
                    &config.defaults.extension,
                ),
            }
        })
        .collect();

    PlanOutcome::Planned(CarvePlan {
        document: doc,
        selections,
    })
}

/// Carve every non-empty selection into a new document and open the host's
/// save-as prompt for each.
pub fn run(host: &mut dyn Host, config: &Config) -> Result<CarveOutcome> {
    run_with_mode(host, config, SaveMode::Prompt)
}

/// Variant of [`run`] that saves each new document immediately instead of
/// prompting.
pub fn run_direct(host: &mut dyn Host, config: &Config) -> Result<CarveOutcome> {
    run_with_mode(host, config, SaveMode::Direct)
}

fn run_with_mode(host: &mut dyn Host, config: &Config, mode: SaveMode) -> Result<CarveOutcome> {
    let plan = match plan(host, config) {
        PlanOutcome::Planned(plan) => plan,
        PlanOutcome::Skipped(reason) => {
            if let SkipReason::TooManySelections { count, limit } = reason {
                warn!(count, limit, "selection cap exceeded, aborting");
                host.status_message(&format!("Too many selections ({count}); aborting."));
            }
            return Ok(CarveOutcome::Skipped(reason));
        }
    };

    let source = plan.document;
    let mut report = CarveReport::default();
    for planned in &plan.selections {
        let text = host.text_in(source, planned.region);

        let new_doc = host.create_document()?;
        host.status_message(&format!("selection-{}: {}", planned.index, planned.preview));
        host.set_display_name(new_doc, &planned.suggested_name)?;
        insert::insert_text(host, new_doc, &InsertTextArgs { point: 0, text })?;
        host.set_selection(new_doc, Region::caret(0))?;
        match mode {
            SaveMode::Prompt => host.prompt_save_as(new_doc)?,
            SaveMode::Direct => host.save(new_doc)?,
        }

        debug!(index = planned.index, name = %planned.suggested_name, "carved selection");
        report.created.push(CreatedDocument {
            document: new_doc,
            name: planned.suggested_name.clone(),
        });
    }

    Ok(CarveOutcome::Completed(report))
}
