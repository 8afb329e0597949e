use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use selector_synth::{looks_generated, Classification, IdentKind};
use serde::Serialize;

use crate::cli::context::CliContext;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Id,
    Class,
    DataAttr,
}

impl From<KindArg> for IdentKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Id => IdentKind::Id,
            KindArg::Class => IdentKind::Class,
            KindArg::DataAttr => IdentKind::DataAttr,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct ClassifyArgs {
    /// Identifier kind
    #[arg(long, value_enum)]
    pub kind: KindArg,

    /// Id value, class token, or data-attribute name
    #[arg(long)]
    pub name: String,

    /// Data-attribute value
    #[arg(long, default_value = "")]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyReport {
    pub kind: IdentKind,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    pub usable: bool,
    pub looks_generated: bool,
    #[serde(flatten)]
    pub classification: Classification,
}

pub async fn cmd_classify(args: ClassifyArgs, ctx: &CliContext) -> Result<()> {
    let report = classify(&args, ctx)?;
    ctx.output().print(&report, render_human)
}

pub fn classify(args: &ClassifyArgs, ctx: &CliContext) -> Result<ClassifyReport> {
    let engine = ctx.engine()?;
    let kind = IdentKind::from(args.kind);
    let classification = match kind {
        IdentKind::Id | IdentKind::Class => engine.classifier().classify(kind, "", &args.name),
        IdentKind::DataAttr => {
            if !args.name.to_ascii_lowercase().starts_with("data-") {
                bail!("{} is not a data-* attribute name", args.name);
            }
            engine.classifier().classify(kind, &args.name, &args.value)
        }
    };
    let token = match kind {
        IdentKind::DataAttr => args.value.as_str(),
        _ => args.name.as_str(),
    };
    Ok(ClassifyReport {
        kind,
        name: args.name.clone(),
        value: args.value.clone(),
        usable: classification.is_usable(),
        looks_generated: !token.is_empty() && looks_generated(token),
        classification,
    })
}

fn render_human(report: &ClassifyReport) -> String {
    let subject = if report.value.is_empty() {
        report.name.clone()
    } else {
        format!("{}=\"{}\"", report.name, report.value)
    };
    let verdict = if report.classification.blocked {
        "blocked"
    } else if report.classification.generic {
        "generic"
    } else if report.classification.stable {
        "stable"
    } else {
        "neutral"
    };
    let mut line = format!("{} {}: {}", report.kind.name(), subject, verdict);
    if report.classification.test_hook {
        line.push_str(" (test hook)");
    }
    if report.looks_generated {
        line.push_str(" (looks generated)");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::OutputFormat;
    use crate::config::PickerConfig;
    use std::path::PathBuf;

    fn ctx() -> CliContext {
        CliContext::new(
            PickerConfig::default(),
            PathBuf::from("config.yaml"),
            false,
            OutputFormat::Human,
        )
    }

    fn args(kind: KindArg, name: &str, value: &str) -> ClassifyArgs {
        ClassifyArgs {
            kind,
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn hashed_class_is_blocked() {
        let report = classify(&args(KindArg::Class, "css-1abc2d", ""), &ctx()).unwrap();
        assert!(report.classification.blocked);
        assert!(!report.usable);
        assert_eq!(render_human(&report), "class css-1abc2d: blocked (looks generated)");
    }

    #[test]
    fn test_hook_is_reported() {
        let report =
            classify(&args(KindArg::DataAttr, "data-testid", "submit-btn"), &ctx()).unwrap();
        assert!(report.classification.test_hook);
        assert!(report.usable);
        assert_eq!(
            render_human(&report),
            r#"data-attr data-testid="submit-btn": stable (test hook)"#
        );
    }

    #[test]
    fn non_data_attribute_is_rejected() {
        assert!(classify(&args(KindArg::DataAttr, "aria-label", "x"), &ctx()).is_err());
    }
}
