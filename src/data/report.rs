//! Rendering of workflow reports.

use std::fmt;
use std::io::Write;

use anyhow::{Context, Result};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::data::workflow::AnalyzedWorkflow;
use crate::data::WorkflowReport;

/// Output format for workflow reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            other => Err(format!(
                "Unknown output format '{other}'. Expected text, json, or yaml"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Writes the report in the requested format.
pub fn write_report<W: WriteColor>(
    out: &mut W,
    report: &WorkflowReport,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)
                .context("Failed to serialize report to JSON")?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Yaml => {
            let yaml = crate::data::to_yaml(report)?;
            writeln!(out, "{yaml}")?;
        }
        OutputFormat::Text => write_text(out, report)?,
    }

    Ok(())
}

fn write_text<W: WriteColor>(out: &mut W, report: &WorkflowReport) -> Result<()> {
    writeln!(
        out,
        "Default branch: {} ({})",
        report.repository.default_branch, report.repository.default_branch_source
    )?;

    if let Some(changed) = &report.changed_files {
        writeln!(out, "Changed files: {}", changed.len())?;
    }

    if report.workflows.is_empty() {
        writeln!(out, "No workflows run when this change is merged")?;
        return Ok(());
    }

    writeln!(
        out,
        "{} workflow(s) may run when this change is merged:",
        report.workflows.iter().filter(|w| w.is_triggered_on_default_branch()).count()
    )?;

    for workflow in &report.workflows {
        write_workflow(out, workflow)?;
    }

    Ok(())
}

fn write_workflow<W: WriteColor>(out: &mut W, workflow: &AnalyzedWorkflow) -> Result<()> {
    let (marker, color) = if workflow.is_triggered_on_default_branch() {
        ("runs", Color::Green)
    } else if workflow.diagnostic.is_some() {
        ("error", Color::Red)
    } else {
        ("skip", Color::Yellow)
    };

    write!(out, "  ")?;
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{marker:<5}")?;
    out.reset()?;
    writeln!(out, " {} ({})", workflow.workflow.name, workflow.workflow.path)?;

    if let Some(analysis) = &workflow.trigger_analysis {
        if !analysis.trigger_events.is_empty() {
            writeln!(out, "        events:   {}", analysis.trigger_events.join(", "))?;
        }
        if !analysis.trigger_branches.is_empty() {
            writeln!(out, "        branches: {}", analysis.trigger_branches.join(", "))?;
        }
        if !analysis.trigger_paths.is_empty() {
            writeln!(out, "        paths:    {}", analysis.trigger_paths.join(", "))?;
        }
    }

    if let Some(diagnostic) = &workflow.diagnostic {
        writeln!(out, "        {diagnostic}")?;
    }

    Ok(())
}
