mod persistence;
mod repository;

pub use persistence::{
    default_scheme, default_scheme_records, load_foods, load_scheme, save_foods, save_scheme,
};
pub use repository::{FoodRepository, FoodStore};
