//! Command line front end.
//!
//! Drives the carve command against the headless host: the given file is the
//! active document, the `--select` ranges are its selections, and accepting
//! the save prompt means writing the suggested name into the output
//! directory.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::app::carve::{self, CarveOutcome, CarvePlan, PlanOutcome, SkipReason};
use crate::domain::model::Region;
use crate::infra::config::Config;
use crate::infra::headless::HeadlessHost;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Copy each selection of a file into its own new file",
    long_about = None
)]
pub struct Cli {
    /// File to carve selections from.
    file: PathBuf,

    /// Half-open character range to treat as a selection (repeatable).
    #[arg(short, long = "select", value_name = "BEGIN..END", required = true)]
    select: Vec<Region>,

    /// Directory carved files are written into.
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Print what would be carved without writing anything.
    #[arg(long)]
    dry_run: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    execute(cli, &config)
}

fn execute(cli: Cli, config: &Config) -> Result<()> {
    let out_dir = cli
        .out
        .or_else(|| config.output.directory())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut host = if cli.dry_run {
        HeadlessHost::new()
    } else {
        HeadlessHost::with_out_dir(out_dir)
    };
    host.set_uniquify(config.output.uniquify());

    let doc = host.open_source(&cli.file)?;
    host.set_selections(doc, cli.select);

    if cli.dry_run {
        return match carve::plan(&host, config) {
            PlanOutcome::Planned(plan) => {
                print!("{}", render_plan(&plan));
                Ok(())
            }
            PlanOutcome::Skipped(reason) => bail!(describe_skip(reason)),
        };
    }

    match carve::run(&mut host, config)? {
        CarveOutcome::Completed(report) => {
            for (created, path) in report.created.iter().zip(host.written_paths()) {
                println!("{} -> {}", created.name, path.display());
            }
            Ok(())
        }
        CarveOutcome::Skipped(reason) => bail!(describe_skip(reason)),
    }
}

/// One `selection-<i>: <preview> -> <name>` line per planned selection.
pub fn render_plan(plan: &CarvePlan) -> String {
    let mut rendered = String::new();
    for planned in &plan.selections {
        rendered.push_str(&format!(
            "selection-{}: {} -> {}\n",
            planned.index, planned.preview, planned.suggested_name
        ));
    }
    rendered
}

fn describe_skip(reason: SkipReason) -> String {
    match reason {
        SkipReason::NoActiveDocument => "no document to carve from".into(),
        SkipReason::NoSelections => "no non-empty selection in the given ranges".into(),
        SkipReason::TooManySelections { count, limit } => {
            format!("too many selections ({count}, limit {limit})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_selections() {
        let cli =
            Cli::try_parse_from(["selcarve", "notes.txt", "-s", "0..5", "--select", "7..9"])
                .unwrap();
        assert_eq!(cli.file, PathBuf::from("notes.txt"));
        assert_eq!(cli.select, vec![Region::new(0, 5), Region::new(7, 9)]);
        assert!(!cli.dry_run);
    }

    #[test]
    fn requires_at_least_one_selection() {
        assert!(Cli::try_parse_from(["selcarve", "notes.txt"]).is_err());
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(Cli::try_parse_from(["selcarve", "notes.txt", "-s", "five..six"]).is_err());
    }
}
