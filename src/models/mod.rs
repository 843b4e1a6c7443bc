pub mod absorption;
pub mod carbs;
pub mod food;

pub use absorption::{AbsorptionBlock, AbsorptionBlockRecord};
pub use carbs::{CarbsEntries, CarbsEntry, CarbsKind, collect_entries};
pub use food::{FoodItem, TypicalAmount};
