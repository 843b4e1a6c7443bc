use std::path::Path;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use easy_fpu_rs::cli::{Cli, Command, FoodCommand, SchemeCommand, SettingsCommand};
use easy_fpu_rs::error::{FpuError, Result};
use easy_fpu_rs::interface::{
    display_food_list, display_meal, display_regime, display_scheme, display_settings,
    prompt_food_choice, prompt_food_item, prompt_yes_no,
};
use easy_fpu_rs::models::AbsorptionBlock;
use easy_fpu_rs::regime::{MealExport, write_regime_csv};
use easy_fpu_rs::settings::{JsonSettingsStore, UserSettings};
use easy_fpu_rs::state::{
    FoodRepository, FoodStore, default_scheme, load_foods, load_scheme, save_foods, save_scheme,
};

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("easy_fpu_rs=info,easy_fpu=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Meal { separate_sugars } => {
            cmd_meal(&cli.foods, &cli.scheme, &cli.settings, separate_sugars)
        }
        Command::Food(food) => cmd_food(&cli.foods, food),
        Command::Scheme(scheme) => cmd_scheme(&cli.scheme, &cli.settings, scheme),
        Command::Settings(settings) => cmd_settings(&cli.settings, settings),
        Command::Export {
            separate_sugars,
            interval,
            csv,
        } => cmd_export(
            &cli.foods,
            &cli.scheme,
            &cli.settings,
            separate_sugars,
            interval,
            csv.as_deref(),
        ),
    }
}

/// Load the food store, starting empty when the file does not exist yet.
fn open_foods(file_path: &str) -> Result<FoodStore> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Ok(FoodStore::default());
    }
    Ok(FoodStore::new(load_foods(path)?))
}

fn open_settings(file_path: &str) -> Result<(JsonSettingsStore, UserSettings)> {
    let store = JsonSettingsStore::open(file_path)?;
    let settings = UserSettings::load(&store);
    Ok((store, settings))
}

/// Show the current meal.
fn cmd_meal(foods: &str, scheme: &str, settings: &str, separate_sugars: bool) -> Result<()> {
    let store = open_foods(foods)?;
    let scheme = load_scheme(scheme)?;
    let (_, settings) = open_settings(settings)?;

    let meal = store.meal()?;
    let selected: Vec<_> = store.selected().into_iter().cloned().collect();
    display_food_list(&selected, "Selected food items");
    display_meal(&meal, &scheme, &settings, separate_sugars)
}

/// Food item management.
fn cmd_food(file_path: &str, command: FoodCommand) -> Result<()> {
    let mut store = open_foods(file_path)?;

    match command {
        FoodCommand::List => {
            display_food_list(&store.all(), "Food items");
            return Ok(());
        }
        FoodCommand::Add => {
            let item = prompt_food_item()?;
            if store.get(&item.name).is_some()
                && !prompt_yes_no(&format!("Replace existing '{}'?", item.name), false)?
            {
                return Ok(());
            }
            let name = item.name.clone();
            store.upsert(item)?;
            println!("Added: {}", name);
        }
        FoodCommand::Amount { name, grams } => {
            let resolved = match store.get(&name) {
                Some(item) => item.name,
                None => {
                    let candidates = store.find_similar(&name);
                    match prompt_food_choice(&name, &candidates)? {
                        Some(item) => item.name.clone(),
                        None => return Err(FpuError::NotFound(format!("food item '{}'", name))),
                    }
                }
            };
            store.set_amount(&resolved, grams)?;
            println!("{}: {} g", resolved, grams);
        }
        FoodCommand::Clear => {
            store.clear_amounts();
            println!("All amounts reset to 0.");
        }
        FoodCommand::Remove { name } => {
            let removed = store.remove(&name)?;
            println!("Removed: {}", removed.name);
        }
    }

    save_foods(file_path, &store.to_foods())?;
    Ok(())
}

/// Absorption scheme management.
fn cmd_scheme(scheme_path: &str, settings_path: &str, command: SchemeCommand) -> Result<()> {
    let mut scheme = load_scheme(scheme_path)?;

    match command {
        SchemeCommand::Show => {
            display_scheme(&scheme);
            return Ok(());
        }
        SchemeCommand::Add { max_fpu, time } => {
            scheme.add_block(AbsorptionBlock::new(max_fpu, time)?)?;
        }
        SchemeCommand::Edit {
            old_max_fpu,
            max_fpu,
            time,
        } => {
            scheme.replace_block(old_max_fpu, AbsorptionBlock::new(max_fpu, time)?)?;
        }
        SchemeCommand::Remove { max_fpu } => {
            scheme.remove_block(max_fpu)?;
        }
        SchemeCommand::Reset => {
            scheme = default_scheme()?;
            let (mut store, mut settings) = open_settings(settings_path)?;
            settings.reset_absorption_parameters();
            settings.save(&mut store)?;
            println!("Absorption scheme and parameters reset to defaults.");
        }
    }

    save_scheme(scheme_path, &scheme)?;
    display_scheme(&scheme);
    Ok(())
}

/// Settings management.
fn cmd_settings(file_path: &str, command: SettingsCommand) -> Result<()> {
    let (mut store, mut settings) = open_settings(file_path)?;

    match command {
        SettingsCommand::Show => {}
        SettingsCommand::Set {
            e_carbs_factor,
            e_carbs_delay,
            e_carbs_interval,
            carbs_delay,
            carbs_interval,
            carbs_duration,
        } => {
            if let Some(v) = e_carbs_factor {
                settings.e_carbs_factor = v;
            }
            if let Some(v) = e_carbs_delay {
                settings.e_carbs_delay_minutes = v;
            }
            if let Some(v) = e_carbs_interval {
                settings.e_carbs_interval_minutes = v;
            }
            if let Some(v) = carbs_delay {
                settings.carbs_delay_minutes = v;
            }
            if let Some(v) = carbs_interval {
                settings.carbs_interval_minutes = v;
            }
            if let Some(v) = carbs_duration {
                settings.carbs_duration_hours = v;
            }
            settings.save(&mut store)?;
            println!("Settings saved.");
        }
    }

    display_settings(&settings);
    Ok(())
}

/// Lay the current meal out as a carbs regime.
fn cmd_export(
    foods: &str,
    scheme: &str,
    settings: &str,
    separate_sugars: bool,
    interval: Option<i64>,
    csv_path: Option<&str>,
) -> Result<()> {
    let store = open_foods(foods)?;
    let scheme = load_scheme(scheme)?;
    let (_, settings) = open_settings(settings)?;

    let meal = store.meal()?;
    if meal.is_empty() {
        println!("No food items selected (set an amount with 'food amount').");
        return Ok(());
    }

    let now = Utc::now();
    let export = MealExport::plan(&meal, &scheme, &settings, separate_sugars, now)?;
    let regime = export.regime(now, interval)?;

    display_meal(&meal, &scheme, &settings, separate_sugars)?;
    display_regime(&regime);

    if let Some(path) = csv_path {
        write_regime_csv(&regime, Path::new(path))?;
        println!("Wrote carbs regime to {}", path);
    }

    Ok(())
}
