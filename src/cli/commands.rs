//! Command dispatch

use std::io::{self, BufRead};
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::ChartSource;
use crate::cli::args::{ChartCommands, Cli, Commands, ConfigCommands, StaffCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{render_forest, ForestExt, Move, StaffRecord};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli, settings: Settings) -> CliResult<()> {
    let school = cli
        .school
        .clone()
        .unwrap_or_else(|| settings.school.clone());

    match &cli.command {
        Some(Commands::Staff { command }) => {
            let container = ServiceContainer::new(settings);
            staff(command, &container, &school)
        }
        Some(Commands::Chart { command }) => {
            let container = ServiceContainer::new(settings);
            chart(command, &container, &school)
        }
        Some(Commands::Config { command }) => config(command, &settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run `schoolnet --help`".to_string(),
        )),
    }
}

fn staff(command: &StaffCommands, c: &ServiceContainer, school: &str) -> CliResult<()> {
    match command {
        StaffCommands::List { json } => staff_list(c, school, *json),
        StaffCommands::Import { file } => staff_import(c, school, file),
        StaffCommands::Add {
            name,
            department,
            position,
            contact,
            id,
        } => {
            let record = StaffRecord::new(
                id.clone().unwrap_or_default(),
                name,
                department,
                *position,
                contact,
            );
            let added = c.roster.add(school, record)?;
            output::action("Added", &format!("{} ({})", added, added.id));
            Ok(())
        }
        StaffCommands::Clear { yes } => {
            if !yes && !confirm(&format!("Remove all staff of school '{school}'? [y/N]"))? {
                output::info("Aborted");
                return Ok(());
            }
            c.roster.clear(school)?;
            output::success(&format!("Roster of '{school}' cleared"));
            Ok(())
        }
    }
}

#[instrument(skip(c))]
fn staff_list(c: &ServiceContainer, school: &str, json: bool) -> CliResult<()> {
    let records = c.roster.list(school)?;
    if json {
        let text = serde_json::to_string_pretty(&records)
            .map_err(|e| InfraError::json("staff list", e))?;
        output::info(&text);
        return Ok(());
    }
    if records.is_empty() {
        output::warning(&format!("no staff registered for school '{school}'"));
        return Ok(());
    }
    output::header(&format!("{} staff in '{}'", records.len(), school));
    for r in &records {
        output::detail(&format!("{}  {}", r, r.id));
    }
    Ok(())
}

#[instrument(skip(c))]
fn staff_import(c: &ServiceContainer, school: &str, file: &Path) -> CliResult<()> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| InfraError::io(format!("read {}", file.display()), e))?;
    let records: Vec<StaffRecord> = serde_json::from_str(&content)
        .map_err(|e| InfraError::json(file.display().to_string(), e))?;
    debug!(count = records.len(), "parsed roster file");

    let stored = c.roster.replace(school, records)?;
    output::success(&format!(
        "Imported {} staff into '{}'",
        stored.len(),
        school
    ));
    Ok(())
}

fn chart(command: &ChartCommands, c: &ServiceContainer, school: &str) -> CliResult<()> {
    match command {
        ChartCommands::Show { json } => chart_show(c, school, *json),
        ChartCommands::Move {
            node_id,
            from,
            from_index,
            to,
            to_index,
        } => {
            let mv = Move {
                node_id: node_id.clone(),
                from: from.clone(),
                from_index: *from_index,
                to: to.clone(),
                to_index: *to_index,
            };
            let forest = c.chart.move_node(school, &mv)?;
            output::action(
                "Moved",
                &format!("{} {}[{}] -> {}[{}]", node_id, from, from_index, to, to_index),
            );
            debug!(nodes = forest.node_count(), "layout saved");
            Ok(())
        }
        ChartCommands::Reset => {
            if c.chart.reset(school)? {
                output::success("Layout discarded, chart follows the roster again");
            } else {
                output::info("No saved layout");
            }
            Ok(())
        }
        ChartCommands::Orphans => {
            let orphans = c.chart.orphans(school)?;
            if orphans.is_empty() {
                output::success("Every staff member has a department head");
                return Ok(());
            }
            output::header(&format!(
                "{} staff not shown (no department head for their department):",
                orphans.len()
            ));
            for r in &orphans {
                output::detail(r);
            }
            Ok(())
        }
    }
}

#[instrument(skip(c))]
fn chart_show(c: &ServiceContainer, school: &str, json: bool) -> CliResult<()> {
    let view = c.chart.load(school)?;

    if json {
        let text = serde_json::to_string_pretty(&view.forest)
            .map_err(|e| InfraError::json("chart", e))?;
        output::info(&text);
        return Ok(());
    }

    if let ChartSource::Layout { stale, report } = &view.source {
        if *stale && report.is_unchanged() {
            output::warning("roster changed since the layout was saved");
        }
        for id in &report.removed {
            output::diff_remove(&format!("{id} (no longer on the roster)"));
        }
        for id in &report.added {
            output::diff_add(&format!("{id} (new on the roster)"));
        }
    }

    output::info(&render_forest(&view.forest, &c.settings.chart_title(school)));
    Ok(())
}

fn config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::action("global", &p.display()),
                None => output::warning("no config directory available"),
            }
            output::action("data", &settings.data_dir.display());
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path()
                .ok_or_else(|| CliError::Usage("no config directory available".to_string()))?;
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "{} exists, use --force to overwrite",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created {}", path.display()));
            Ok(())
        }
    }
}

fn confirm(question: &str) -> CliResult<bool> {
    output::prompt(question);
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| InfraError::io("read confirmation", e))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
