pub mod calculator;
pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod regime;
pub mod settings;
pub mod state;

pub use calculator::{AbsorptionScheme, Fpu, Meal, compute_fpu};
pub use error::{FpuError, Result};
pub use models::{AbsorptionBlock, CarbsEntry, FoodItem};
pub use regime::CarbsRegime;
