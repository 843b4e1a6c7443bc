pub mod builder;
pub mod export;

pub use builder::CarbsRegime;
pub use export::{MealExport, write_regime_csv};
