// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod config;
pub mod device;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod model;
pub mod robot;
pub mod storage;
pub mod types;

pub use errors::{KitchenError, Result};
pub use robot::Robot;

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use anyhow::{Context, anyhow};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, OperationKind};
use crate::cli::{CliArgs, Command};
use crate::config::{ConfigFile, load_config};
use crate::device::SubscriptionId;
use crate::model::RecipeId;
use crate::model::progress::remaining;
use crate::storage::{InMemoryRecipeStore, RecipeStore};
use crate::types::Mode;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the recipe store and the robot
/// - console observers
/// - Ctrl-C handling (emergency stop)
pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let store = InMemoryRecipeStore::with_factory_recipes(cfg.recipes.clone());

    if args.dry_run {
        print_dry_run(&cfg, &store)?;
        return Ok(());
    }

    match args.command {
        None => print_dry_run(&cfg, &store)?,
        Some(Command::Operations) => print_operations(&cfg.catalog),
        Some(Command::Recipes) => print_recipes(&store)?,
        Some(Command::RunTask {
            operation,
            duration,
        }) => {
            let kind: OperationKind = operation.parse().map_err(|e: String| anyhow!(e))?;
            run_task(&cfg, kind, duration).await?;
        }
        Some(Command::RunRecipe { id }) => run_recipe(&cfg, &store, id).await?,
    }

    Ok(())
}

async fn run_task(
    cfg: &ConfigFile,
    kind: OperationKind,
    duration: Option<u32>,
) -> anyhow::Result<()> {
    let task = cfg.catalog.preset_task(kind, duration)?;
    let robot = Robot::new(&cfg.device);
    let console = attach_console(&robot);

    robot.power_on();
    if robot.mode() != Mode::Manual {
        robot.change_mode(Mode::Manual)?;
    }

    println!("{} for {} s", task.name(), task.duration_seconds());
    let stop = spawn_ctrl_c(robot.clone());
    let completed = robot.execute_task(task).await;
    stop.abort();

    detach_console(&robot, console);
    report(completed?);
    robot.power_off()?;
    Ok(())
}

async fn run_recipe(
    cfg: &ConfigFile,
    store: &InMemoryRecipeStore,
    id: RecipeId,
) -> anyhow::Result<()> {
    let recipe = store
        .get(id)?
        .ok_or_else(|| anyhow!("unknown recipe id {id} (see `kitchenbot recipes`)"))?;
    let robot = Robot::new(&cfg.device);
    let console = attach_console(&robot);

    robot.power_on();
    if robot.mode() != Mode::GuidedCooking {
        robot.change_mode(Mode::GuidedCooking)?;
    }

    println!(
        "{} ({} steps, {})",
        recipe.name,
        recipe.step_count(),
        recipe.total_time_label()
    );
    let stop = spawn_ctrl_c(robot.clone());
    let completed = robot
        .execute_recipe(&recipe, &cfg.catalog)
        .await
        .with_context(|| format!("recipe '{}' failed", recipe.name));
    stop.abort();

    detach_console(&robot, console);
    report(completed?);
    robot.power_off()?;
    Ok(())
}

fn report(completed: bool) {
    if completed {
        println!("done");
    } else {
        println!("stopped");
    }
}

/// Print progress (with the time left on the active task), readouts and
/// recipe steps as they change.
fn attach_console(robot: &Robot) -> Vec<SubscriptionId> {
    let last = AtomicU8::new(u8::MAX);
    let machine = robot.machine().clone();
    let progress = robot.subscribe_progress(move |p| {
        if last.swap(*p, Ordering::Relaxed) != *p {
            let duration = machine.state().active_task().map(|t| t.duration());
            println!("{}", progress_line(*p, duration));
        }
    });
    let parameters = robot.subscribe_parameters(|r| {
        println!("       speed {} | {} °C", r.speed, r.temperature);
    });
    let steps = robot.subscribe_steps(|s| {
        println!("step {} of {}", s.index + 1, s.total);
    });
    let state = robot.subscribe_state(|state| {
        debug!(%state, "device state changed");
    });
    vec![progress, parameters, steps, state]
}

/// The progress observer holds a handle to the device; dropping the
/// subscriptions releases it.
fn detach_console(robot: &Robot, subscriptions: Vec<SubscriptionId>) {
    for id in subscriptions {
        robot.unsubscribe(id);
    }
}

/// `"  40%  0:06 left"`; just the percentage once the task is gone.
fn progress_line(percent: u8, duration: Option<Duration>) -> String {
    match duration {
        Some(duration) if percent < 100 => {
            let left = remaining(percent, duration).as_secs();
            format!("  {percent:>3}%  {}:{:02} left", left / 60, left % 60)
        }
        _ => format!("  {percent:>3}%"),
    }
}

/// Ctrl-C → emergency stop.
fn spawn_ctrl_c(robot: Robot) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        info!("Ctrl+C received");
        robot.emergency_stop();
    })
}

fn print_operations(catalog: &Catalog) {
    println!("operations:");
    for (kind, preset) in catalog.iter() {
        print!("  {:<6} {:<6} {:>4} s", kind.id(), preset.label, preset.default_duration);
        if let Some(speed) = preset.speed {
            print!("  speed {speed}");
        }
        if let Some(temperature) = preset.temperature {
            print!("  {temperature} °C");
        }
        println!("  {}", preset.description);
    }
}

fn print_recipes(store: &dyn RecipeStore) -> anyhow::Result<()> {
    let recipes = store.list()?;
    let (factory, user): (Vec<_>, Vec<_>) = recipes.iter().partition(|r| r.is_factory_default);

    for (title, group) in [("factory recipes", factory), ("my recipes", user)] {
        println!("{title} ({}):", group.len());
        for recipe in group {
            println!(
                "  [{}] {} ({} servings, {}, {})",
                recipe.id,
                recipe.name,
                recipe.servings,
                recipe.difficulty,
                recipe.total_time_label()
            );
        }
    }
    Ok(())
}

/// Simple dry-run output: device settings, catalog and recipes with their
/// steps.
fn print_dry_run(cfg: &ConfigFile, store: &dyn RecipeStore) -> anyhow::Result<()> {
    println!("kitchenbot dry-run");
    println!("  device.tick = {:?}", cfg.device.tick);
    println!("  device.ambient_temperature = {}", cfg.device.ambient_temperature);
    println!("  device.initial_mode = {}", cfg.device.initial_mode);
    println!();

    print_operations(&cfg.catalog);
    println!();

    print_recipes(store)?;
    for recipe in store.list()? {
        println!();
        println!("{}:", recipe.name);
        for ingredient in recipe.ingredients.iter() {
            println!("  - {ingredient}");
        }
        for (i, step) in recipe.steps.iter().enumerate() {
            print!("  {}. {} {} s", i + 1, step.operation, step.duration_seconds);
            if let Some(ref description) = step.description {
                print!(" ({description})");
            }
            println!();
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_line_shows_time_left() {
        let ten_minutes = Some(Duration::from_secs(600));
        assert_eq!(progress_line(0, ten_minutes), "    0%  10:00 left");
        assert_eq!(progress_line(25, ten_minutes), "   25%  7:30 left");
        assert_eq!(progress_line(99, Some(Duration::from_secs(90))), "   99%  0:00 left");
    }

    #[test]
    fn progress_line_without_a_task_is_just_the_percentage() {
        assert_eq!(progress_line(100, Some(Duration::from_secs(60))), "  100%");
        assert_eq!(progress_line(100, None), "  100%");
        assert_eq!(progress_line(40, None), "   40%");
    }
}
