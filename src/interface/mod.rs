pub mod prompts;
pub mod render;

pub use prompts::{prompt_food_choice, prompt_food_item, prompt_yes_no};
pub use render::{
    display_food_list, display_meal, display_regime, display_scheme, display_settings,
};
