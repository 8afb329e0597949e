use std::fmt::Write as _;

use anyhow::Result;
use selector_synth::{PatternRules, PatternTableSpec};

use crate::cli::context::CliContext;

pub async fn cmd_patterns(ctx: &CliContext) -> Result<()> {
    let engine = ctx.engine()?;
    let spec = engine.classifier().table().spec().clone();
    ctx.output().print(&spec, render_human)
}

fn render_human(spec: &PatternTableSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pattern table v{}", spec.version);
    rules_section(&mut out, "id", &spec.id);
    rules_section(&mut out, "class", &spec.class);
    rules_section(&mut out, "data-attr", &spec.data_attr);
    list_section(&mut out, "data value blocklist", &spec.data_value_blocklist);
    list_section(&mut out, "test attributes", &spec.test_attributes);
    list_section(&mut out, "generic words", &spec.generic_words);
    out
}

fn rules_section(out: &mut String, kind: &str, rules: &PatternRules) {
    list_section(out, &format!("{kind} stable"), &rules.stable_allow);
    list_section(out, &format!("{kind} blocklist"), &rules.blocklist);
}

fn list_section(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "\n{} ({}):", title, items.len());
    for item in items {
        let _ = writeln!(out, "  {}", item);
    }
}
