use crate::calculator::{AbsorptionScheme, Meal};
use crate::error::Result;
use crate::models::{CarbsKind, FoodItem};
use crate::regime::CarbsRegime;
use crate::settings::UserSettings;

/// Width of the bar chart column in the regime table.
const BAR_WIDTH: f64 = 30.0;

/// Display the meal totals with extended carbs and absorption time.
pub fn display_meal(
    meal: &Meal,
    scheme: &AbsorptionScheme,
    settings: &UserSettings,
    treat_sugars_separately: bool,
) -> Result<()> {
    if meal.is_empty() {
        println!("No food items selected (set an amount with 'food amount').");
        return Ok(());
    }

    let absorption_time = meal.absorption_time(scheme)?;

    println!();
    println!("=== Total meal ===");
    println!();
    println!("Amount:          {:>8.0} g", meal.amount);
    println!("Calories:        {:>8.0} kcal", meal.calories);
    if treat_sugars_separately {
        println!("Sugars:          {:>8.1} g", meal.sugars(true));
        println!("Regular carbs:   {:>8.1} g", meal.regular_carbs(true));
    } else {
        println!("Carbs:           {:>8.1} g", meal.carbs);
    }
    println!("FPU:             {:>8.2}", meal.fpu.value());
    println!(
        "Extended carbs:  {:>8.1} g",
        meal.extended_carbs(settings.e_carbs_factor)
    );
    println!("{}", absorption_time_line(absorption_time));
    println!();
    Ok(())
}

fn absorption_time_line(hours: f64) -> String {
    format!("Absorption time: {:>8.1} h", hours)
}

/// Display a list of food items with their per-100g values.
pub fn display_food_list(foods: &[FoodItem], title: &str) {
    if foods.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, foods.len());
    println!();

    let max_name_len = foods.iter().map(|f| f.name.len()).max().unwrap_or(10);

    for food in foods {
        let star = if food.favorite { "*" } else { " " };
        let amount = if food.amount > 0 {
            format!("  [{} g]", food.amount)
        } else {
            String::new()
        };
        println!(
            "{} {:<width$}  {:>6.1} kcal  C:{:>5.1}  S:{:>5.1}{}",
            star,
            food.name,
            food.calories_per_100g,
            food.carbs_per_100g,
            food.sugars_per_100g,
            amount,
            width = max_name_len
        );
    }

    println!();
}

/// Display the absorption scheme as a threshold table.
pub fn display_scheme(scheme: &AbsorptionScheme) {
    println!();
    println!("=== Absorption scheme ===");
    println!();
    for block in scheme.blocks() {
        println!("  up to {:>6.1} FPU - {:>4.1} h", block.max_fpu, block.absorption_time);
    }
    println!();
}

/// Display the resolved user settings.
pub fn display_settings(settings: &UserSettings) {
    println!();
    println!("=== Settings ===");
    println!();
    println!("e-Carbs factor:     {} g/FPU", settings.e_carbs_factor);
    println!("e-Carbs delay:      {} min", settings.e_carbs_delay_minutes);
    println!("e-Carbs interval:   {} min", settings.e_carbs_interval_minutes);
    println!("Carbs delay:        {} min", settings.carbs_delay_minutes);
    println!("Carbs interval:     {} min", settings.carbs_interval_minutes);
    println!("Carbs duration:     {} h", settings.carbs_duration_hours);
    println!("Export e-carbs:     {}", settings.export_e_carbs);
    println!("Export meal carbs:  {}", settings.export_total_meal_carbs);
    println!("Export meal sugars: {}", settings.export_total_meal_sugars);
    println!("Export calories:    {}", settings.export_total_meal_calories);
    println!();
}

/// Display a carbs regime as a table with a bar per slot.
pub fn display_regime(regime: &CarbsRegime) {
    if regime.max_total_carbs <= 0.0 {
        println!("Nothing to export.");
        return;
    }

    println!();
    println!(
        "=== Carbs regime ({} slots of {} min) ===",
        regime.len(),
        regime.interval_minutes
    );
    println!();
    println!("  time    sugars  carbs  e-carbs  total");

    for time in regime.entries.keys() {
        let total = regime.total_carbs(time);
        let bar_len = ((total / regime.max_total_carbs) * BAR_WIDTH).round() as usize;
        println!(
            "  {}  {:>6.1} {:>6.1} {:>8.1} {:>6.1}  {}",
            time.format("%H:%M"),
            regime.carbs_of_kind(time, CarbsKind::Sugars),
            regime.carbs_of_kind(time, CarbsKind::Carbs),
            regime.carbs_of_kind(time, CarbsKind::ECarbs),
            total,
            "#".repeat(bar_len)
        );
    }

    println!();
    println!("Max carbs per slot: {:.1} g", regime.max_total_carbs);
    println!();
}
