use clap::{Parser, Subcommand};

/// EasyFPU: fat-protein units, extended carbs and absorption times for a meal.
#[derive(Parser, Debug)]
#[command(name = "easy_fpu")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the food items JSON file.
    #[arg(short, long, default_value = "food_items.json", global = true)]
    pub foods: String,

    /// Path to the absorption scheme JSON file.
    #[arg(long, default_value = "absorption_scheme.json", global = true)]
    pub scheme: String,

    /// Path to the settings JSON file.
    #[arg(long, default_value = "settings.json", global = true)]
    pub settings: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show totals, extended carbs and absorption time of the current meal.
    Meal {
        /// Count sugars separately from regular carbs.
        #[arg(long)]
        separate_sugars: bool,
    },

    /// Manage food items.
    #[command(subcommand)]
    Food(FoodCommand),

    /// Manage the absorption scheme.
    #[command(subcommand)]
    Scheme(SchemeCommand),

    /// Show or change settings.
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Lay the current meal out as a carbs regime.
    Export {
        /// Count sugars separately from regular carbs.
        #[arg(long)]
        separate_sugars: bool,

        /// Slot length of the regime in minutes (default: the shortest entry spacing).
        #[arg(long)]
        interval: Option<i64>,

        /// Also write the regime as CSV to this path.
        #[arg(long)]
        csv: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FoodCommand {
    /// List all food items.
    List,

    /// Add a food item interactively.
    Add,

    /// Set the eaten amount of a food item (0 deselects it).
    Amount {
        /// Food name; close matches are offered when there is no exact one.
        name: String,

        /// Grams.
        grams: u32,
    },

    /// Set every amount back to 0.
    Clear,

    /// Remove a food item.
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
pub enum SchemeCommand {
    /// Show the absorption blocks.
    Show,

    /// Add an absorption block.
    Add {
        #[arg(long)]
        max_fpu: f64,

        /// Hours.
        #[arg(long)]
        time: f64,
    },

    /// Replace the block with threshold `old_max_fpu`.
    Edit {
        old_max_fpu: f64,

        #[arg(long)]
        max_fpu: f64,

        /// Hours.
        #[arg(long)]
        time: f64,
    },

    /// Remove the block with this threshold.
    Remove { max_fpu: f64 },

    /// Restore the default scheme and absorption parameters.
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show all settings.
    Show,

    /// Change one or more settings.
    Set {
        /// Grams of extended carbs per FPU.
        #[arg(long)]
        e_carbs_factor: Option<f64>,

        /// Minutes before extended carbs start.
        #[arg(long)]
        e_carbs_delay: Option<i64>,

        /// Minutes between extended-carbs entries.
        #[arg(long)]
        e_carbs_interval: Option<i64>,

        /// Minutes before regular carbs start.
        #[arg(long)]
        carbs_delay: Option<i64>,

        /// Minutes between regular-carbs entries.
        #[arg(long)]
        carbs_interval: Option<i64>,

        /// Hours over which regular carbs are absorbed.
        #[arg(long)]
        carbs_duration: Option<f64>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Meal {
            separate_sugars: false,
        }
    }
}
