pub mod constants;
pub mod fpu;
pub mod meal;
pub mod scheme;

pub use constants::*;
pub use fpu::{Fpu, compute_fpu};
pub use meal::Meal;
pub use scheme::AbsorptionScheme;
