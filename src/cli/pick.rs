use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use selector_synth::html::{HtmlDocument, HtmlTree};
use selector_synth::{Candidate, RankedSelector};
use serde::Serialize;
use tokio::fs;
use tracing::info;

use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct PickArgs {
    /// HTML document to load
    #[arg(long, value_name = "FILE")]
    pub html: PathBuf,

    /// CSS selector that picks the target element
    #[arg(short, long)]
    pub target: String,

    /// Which match of `--target` to use (0-based)
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// Return at most this many selectors
    #[arg(long)]
    pub max: Option<usize>,

    /// Include uniqueness and strategy flags
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Debug, Serialize)]
pub struct PickReport {
    pub target: String,
    pub index: usize,
    pub selectors: Selectors,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Selectors {
    Ranked(Vec<RankedSelector>),
    Detailed(Vec<Candidate>),
}

impl Selectors {
    pub fn len(&self) -> usize {
        match self {
            Selectors::Ranked(list) => list.len(),
            Selectors::Detailed(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub async fn cmd_pick(args: PickArgs, ctx: &CliContext) -> Result<()> {
    let markup = fs::read_to_string(&args.html)
        .await
        .with_context(|| format!("reading {}", args.html.display()))?;
    let report = pick(&markup, &args, ctx)?;
    info!(
        "Picked {} selectors for {} (match {})",
        report.selectors.len(),
        report.target,
        report.index
    );
    ctx.output().print(&report, render_human)
}

/// Parse `markup`, resolve the target and run the engine over it.
pub fn pick(markup: &str, args: &PickArgs, ctx: &CliContext) -> Result<PickReport> {
    let mut config = ctx.config().clone();
    if let Some(max) = args.max {
        config.synth.max_candidates = max;
    }
    let engine = config.build_engine()?;

    let document = HtmlDocument::parse_document(markup);
    let tree = HtmlTree::new(&document);
    let Some(target) = tree
        .select_nth(&args.target, args.index)
        .with_context(|| format!("invalid target selector {}", args.target))?
    else {
        bail!(
            "no element matches {} at index {}",
            args.target,
            args.index
        );
    };

    let candidates = engine.generate(&tree, target);
    let selectors = if args.detailed {
        Selectors::Detailed(candidates)
    } else {
        Selectors::Ranked(candidates.iter().map(Candidate::to_ranked).collect())
    };
    Ok(PickReport {
        target: args.target.clone(),
        index: args.index,
        selectors,
    })
}

fn render_human(report: &PickReport) -> String {
    let mut out = String::new();
    if report.selectors.is_empty() {
        let _ = write!(
            out,
            "No stable unique selector found for {} (match {})",
            report.target, report.index
        );
        return out;
    }
    let _ = writeln!(out, "Selectors for {} (match {}):", report.target, report.index);
    match &report.selectors {
        Selectors::Ranked(list) => {
            for (rank, selector) in list.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:>3}. [{:>3}] {}",
                    rank + 1,
                    selector.score,
                    selector.expression
                );
            }
        }
        Selectors::Detailed(list) => {
            for (rank, candidate) in list.iter().enumerate() {
                let mut flags = Vec::new();
                if candidate.tags.is_test_attribute {
                    flags.push("test-attr");
                }
                if candidate.tags.is_class_chain {
                    flags.push("class-chain");
                }
                if candidate.tags.is_smart_chain {
                    flags.push("smart-chain");
                }
                let _ = writeln!(
                    out,
                    "{:>3}. [{:>3}] {}  unique={} {}",
                    rank + 1,
                    candidate.score,
                    candidate.expression,
                    candidate.is_unique,
                    flags.join(",")
                );
            }
        }
    }
    out
}
