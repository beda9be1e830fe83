//! Command execution logic.

use anyhow::Result;
use serde_json::json;
use std::io::{self, Write};
use topograph_core::analysis::impact::sort_by_impact;
use topograph_core::{
    ImpactAnalyzer, Project, build_group_tree, detect_cycles, distinct_cycles, impact_analyze,
    validate,
};

use super::Outcome;
use super::args::{CyclesArgs, ImpactArgs, ShowArgs};
use crate::output::{self, OutputConfig, OutputMode};

/// What every command needs: the loaded project and how to print.
pub struct Context<'a> {
    pub project: &'a Project,
    pub mode: OutputMode,
    pub config: &'a OutputConfig,
    pub skip_validation: bool,
}

fn messages<E: ToString>(errors: &[E]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

/// Execute the validate command
pub fn execute_validate(ctx: &Context<'_>) -> Result<Outcome> {
    let errors = validate(ctx.project);

    match ctx.mode {
        OutputMode::Json => output::print_json(&json!({
            "valid": errors.is_empty(),
            "errors": messages(&errors),
        }))?,
        OutputMode::Text => {
            output::print_validation(&mut io::stdout().lock(), &errors, ctx.config)?;
        }
    }

    Ok(Outcome::from_problems(!errors.is_empty()))
}

/// Execute the list command
pub fn execute_list(ctx: &Context<'_>) -> Result<Outcome> {
    match ctx.mode {
        OutputMode::Json => {
            let applications: Vec<_> = ctx
                .project
                .applications
                .iter()
                .map(|a| json!({ "id": a.id, "name": a.name, "title": a.title }))
                .collect();
            output::print_json(&applications)?;
        }
        OutputMode::Text => {
            output::print_application_list(&mut io::stdout().lock(), ctx.project, ctx.config)?;
        }
    }
    Ok(Outcome::Success)
}

/// Execute the analyze command
pub fn execute_analyze(ctx: &Context<'_>) -> Result<Outcome> {
    let validation_errors = validate(ctx.project);
    let cycle_errors = detect_cycles(ctx.project);
    let rows = impact_analyze(ctx.project);

    match ctx.mode {
        OutputMode::Json => output::print_json(&json!({
            "project": ctx.project.name,
            "validationErrors": messages(&validation_errors),
            "cycleErrors": messages(&cycle_errors),
            "impact": rows,
        }))?,
        OutputMode::Text => {
            use crate::output::color::bold;

            let mut w = io::stdout().lock();
            writeln!(w, "{}", bold("Validation", ctx.config))?;
            output::print_validation(&mut w, &validation_errors, ctx.config)?;
            writeln!(w)?;
            writeln!(w, "{}", bold("Cycles", ctx.config))?;
            output::print_cycles(&mut w, &cycle_errors, ctx.config)?;
            writeln!(w)?;
            writeln!(w, "{}", bold("Impact", ctx.config))?;
            output::print_impact_table(&mut w, &rows, ctx.config)?;
        }
    }

    let failed_validation = !validation_errors.is_empty() && !ctx.skip_validation;
    Ok(Outcome::from_problems(
        failed_validation || !cycle_errors.is_empty(),
    ))
}

/// Execute the cycles command
pub fn execute_cycles(ctx: &Context<'_>, args: &CyclesArgs) -> Result<Outcome> {
    if args.distinct {
        let cycles = distinct_cycles(ctx.project);
        match ctx.mode {
            OutputMode::Json => output::print_json(&json!({ "cycles": cycles }))?,
            OutputMode::Text => {
                output::print_distinct_cycles(&mut io::stdout().lock(), &cycles, ctx.config)?;
            }
        }
        return Ok(Outcome::from_problems(!cycles.is_empty()));
    }

    let errors = detect_cycles(ctx.project);
    match ctx.mode {
        OutputMode::Json => output::print_json(&json!({
            "errors": messages(&errors),
            "paths": errors.iter().map(|e| e.path()).collect::<Vec<_>>(),
        }))?,
        OutputMode::Text => {
            output::print_cycles(&mut io::stdout().lock(), &errors, ctx.config)?;
        }
    }
    Ok(Outcome::from_problems(!errors.is_empty()))
}

/// Execute the impact command
pub fn execute_impact(ctx: &Context<'_>, args: &ImpactArgs) -> Result<Outcome> {
    if let Some(name) = &args.application {
        let application = ctx.project.find_application(name)?;
        let analyzer = ImpactAnalyzer::new(ctx.project);
        let direct = analyzer.direct_referrers(application);
        let indirect = analyzer.indirect_referrers(application);

        match ctx.mode {
            OutputMode::Json => {
                let names = |list: &[&topograph_core::Application]| -> Vec<String> {
                    list.iter().map(|a| a.name.clone()).collect()
                };
                output::print_json(&json!({
                    "application": application.name,
                    "direct": names(&direct),
                    "indirect": names(&indirect),
                }))?;
            }
            OutputMode::Text => output::print_referrers(
                &mut io::stdout().lock(),
                application,
                &direct,
                &indirect,
                ctx.config,
            )?,
        }
        return Ok(Outcome::Success);
    }

    let mut rows = impact_analyze(ctx.project);
    if args.sort {
        sort_by_impact(&mut rows);
    }
    match ctx.mode {
        OutputMode::Json => output::print_json(&rows)?,
        OutputMode::Text => {
            output::print_impact_table(&mut io::stdout().lock(), &rows, ctx.config)?;
        }
    }
    Ok(Outcome::Success)
}

/// Execute the groups command
pub fn execute_groups(ctx: &Context<'_>) -> Result<Outcome> {
    let root = build_group_tree(ctx.project);
    match ctx.mode {
        OutputMode::Json => output::print_json(&root)?,
        OutputMode::Text => output::print_group_tree(
            &mut io::stdout().lock(),
            &ctx.project.name,
            &root,
            ctx.config,
        )?,
    }
    Ok(Outcome::Success)
}

/// Execute the show command
pub fn execute_show(ctx: &Context<'_>, args: &ShowArgs) -> Result<Outcome> {
    let project = ctx.project;
    let application = project.find_application(&args.application)?;
    let referrers = project.find_applications_that_reference(application);

    match ctx.mode {
        OutputMode::Json => {
            let dependencies: Vec<_> = application
                .dependencies_grouped(project)
                .iter()
                .map(|group| {
                    json!({
                        "application": group.application.name,
                        "references": group
                            .dependencies
                            .iter()
                            .map(|d| json!({
                                "reference": d.reference,
                                "relationship": d.effective_relationship(project),
                            }))
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            output::print_json(&json!({
                "application": application,
                "dependencies": dependencies,
                "missingDependencies": application.missing_dependencies(project),
                "referencedBy": referrers.iter().map(|a| &a.name).collect::<Vec<_>>(),
            }))?;
        }
        OutputMode::Text => output::print_application_details(
            &mut io::stdout().lock(),
            project,
            application,
            &referrers,
            ctx.config,
        )?,
    }
    Ok(Outcome::Success)
}
