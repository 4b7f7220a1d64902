use anyhow::{Context, anyhow};
use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::cli::Invocation;
use crate::config::Config;
use crate::datastore::StateStore;
use crate::filter::Filter;
use crate::render::Renderer;
use crate::store::TaskStore;
use crate::theme::{ThemeController, ThemeMode};
use crate::view;

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add", "toggle", "delete", "clear", "list", "stats", "theme", "export", "_show", "help",
        "version",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(tasks, state, cfg, theme, renderer, inv))]
pub fn dispatch(
    tasks: &mut TaskStore,
    state: &StateStore,
    cfg: &Config,
    theme: &mut ThemeController,
    renderer: &mut Renderer,
    inv: Invocation,
) -> anyhow::Result<()> {
    let command = inv.command.as_str();

    debug!(command, args = ?inv.command_args, "dispatching command");

    match command {
        "add" => cmd_add(tasks, state, &inv.command_args),
        "toggle" => cmd_toggle(tasks, state, &inv.command_args),
        "delete" => cmd_delete(tasks, state, &inv.command_args),
        "clear" => cmd_clear(tasks, state),
        "list" => cmd_list(tasks, theme, renderer, &inv.command_args),
        "stats" => cmd_stats(tasks, renderer),
        "theme" => cmd_theme(tasks, state, theme, renderer, &inv.command_args),
        "export" => cmd_export(tasks),
        "_show" => cmd_show(cfg),
        "help" => cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

#[instrument(skip(tasks, state, args))]
fn cmd_add(tasks: &mut TaskStore, state: &StateStore, args: &[String]) -> anyhow::Result<()> {
    info!("command add");

    let text = args.join(" ");
    match tasks.add(state, &text, Utc::now()) {
        Some(id) => println!("Created task {id}."),
        // Empty input is ignored without complaint.
        None => debug!("nothing added"),
    }

    Ok(())
}

#[instrument(skip(tasks, state, args))]
fn cmd_toggle(tasks: &mut TaskStore, state: &StateStore, args: &[String]) -> anyhow::Result<()> {
    info!("command toggle");

    let id = parse_id(args, "toggle")?;
    if tasks.toggle(state, id) {
        let completed = tasks
            .tasks()
            .iter()
            .find(|task| task.id == id)
            .is_some_and(|task| task.completed);
        if completed {
            println!("Completed task {id}.");
        } else {
            println!("Reopened task {id}.");
        }
    } else {
        debug!(id, "no such task");
    }

    Ok(())
}

#[instrument(skip(tasks, state, args))]
fn cmd_delete(tasks: &mut TaskStore, state: &StateStore, args: &[String]) -> anyhow::Result<()> {
    info!("command delete");

    let id = parse_id(args, "delete")?;
    if tasks.delete(state, id) {
        println!("Deleted task {id}.");
    } else {
        debug!(id, "no such task");
    }

    Ok(())
}

#[instrument(skip(tasks, state))]
fn cmd_clear(tasks: &mut TaskStore, state: &StateStore) -> anyhow::Result<()> {
    info!("command clear");

    let removed = tasks.clear_completed(state);
    println!("Cleared {removed} completed task(s).");
    Ok(())
}

#[instrument(skip(tasks, theme, renderer, args))]
fn cmd_list(
    tasks: &TaskStore,
    theme: &ThemeController,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command list");

    let filter = match args.first() {
        Some(raw) => raw.parse::<Filter>()?,
        None => Filter::default(),
    };

    render_page(tasks, filter, theme, renderer)
}

#[instrument(skip(tasks, renderer))]
fn cmd_stats(tasks: &TaskStore, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command stats");

    renderer.print_line(&view::stats_line(tasks.stats()))
}

#[instrument(skip(tasks, state, theme, renderer, args))]
fn cmd_theme(
    tasks: &TaskStore,
    state: &StateStore,
    theme: &mut ThemeController,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command theme");

    let Some(action) = args.first() else {
        println!("{} mode", theme.mode().name());
        return Ok(());
    };

    match action.as_str() {
        "toggle" => {
            theme.toggle(state);
        }
        "dark" => theme.set(state, ThemeMode::Dark),
        "light" => theme.set(state, ThemeMode::Light),
        other => return Err(anyhow!("unknown theme action: {other}")),
    }

    println!("{} mode", theme.mode().name());

    // Colors changed everywhere, so redraw the whole page.
    render_page(tasks, Filter::default(), theme, renderer)
}

#[instrument(skip(tasks))]
fn cmd_export(tasks: &TaskStore) -> anyhow::Result<()> {
    info!("command export");

    let out = serde_json::to_string(tasks.tasks()).context("failed to serialize tasks")?;
    println!("{out}");
    Ok(())
}

fn cmd_show(cfg: &Config) -> anyhow::Result<()> {
    for (k, v) in cfg.iter() {
        println!("{k}={v}");
    }
    Ok(())
}

fn cmd_help() -> anyhow::Result<()> {
    println!(
        "Implemented commands: add, toggle, delete, clear, list, stats, theme, export, help, version"
    );
    Ok(())
}

fn render_page(
    tasks: &TaskStore,
    filter: Filter,
    theme: &ThemeController,
    renderer: &mut Renderer,
) -> anyhow::Result<()> {
    let visible = filter.apply(tasks.tasks());
    let page = view::build_page(&visible, filter, tasks.stats(), theme.mode());
    renderer.print_page(&page, &theme.palette())
}

fn parse_id(args: &[String], command: &str) -> anyhow::Result<u64> {
    let raw = args
        .first()
        .ok_or_else(|| anyhow!("{command} requires a task id"))?;
    raw.parse::<u64>()
        .with_context(|| format!("invalid task id: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::{expand_command_abbrev, known_command_names};

    #[test]
    fn abbreviations_expand_only_when_unambiguous() {
        let known = known_command_names();

        assert_eq!(expand_command_abbrev("li", &known), Some("list"));
        assert_eq!(expand_command_abbrev("cl", &known), Some("clear"));
        assert_eq!(expand_command_abbrev("ex", &known), Some("export"));
        assert_eq!(expand_command_abbrev("theme", &known), Some("theme"));

        // "t" could be toggle or theme.
        assert_eq!(expand_command_abbrev("t", &known), None);
        assert_eq!(expand_command_abbrev("bogus", &known), None);
    }
}
