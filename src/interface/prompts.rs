use dialoguer::{Confirm, Input, Select};

use crate::error::{FpuError, Result};
use crate::models::FoodItem;

/// Prompt for all fields of a new food item.
///
/// Numeric fields may be left empty (zero). The whole item is checked once
/// all fields are entered; on a rejected entry the user may start over.
pub fn prompt_food_item() -> Result<FoodItem> {
    loop {
        let name: String = Input::new().with_prompt("Name").interact_text()?;
        let favorite = prompt_yes_no("Favorite?", false)?;
        let calories = prompt_optional("Calories per 100g (kcal)")?;
        let carbs = prompt_optional("Carbs per 100g (g)")?;
        let sugars = prompt_optional("Thereof sugars per 100g (g)")?;
        let amount = prompt_optional("Amount eaten (g)")?;

        match FoodItem::parse(&name, favorite, &calories, &carbs, &sugars, &amount) {
            Ok(item) => return Ok(item),
            Err(FpuError::InvalidNumericInput(msg)) => {
                println!("{}", msg);
                if !prompt_yes_no("Try again?", true)? {
                    return Err(FpuError::InvalidNumericInput(msg));
                }
            }
            Err(e) => return Err(e),
        }
    }
}

fn prompt_optional(prompt: &str) -> Result<String> {
    Ok(Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}

/// Let the user pick one of several similarly named food items.
pub fn prompt_food_choice<'a>(
    query: &str,
    candidates: &[&'a FoodItem],
) -> Result<Option<&'a FoodItem>> {
    match candidates {
        [] => Ok(None),
        [only] => {
            let confirm = prompt_yes_no(&format!("Did you mean '{}'?", only.name), true)?;
            Ok(confirm.then_some(*only))
        }
        _ => {
            let mut options: Vec<String> =
                candidates.iter().take(5).map(|f| f.name.clone()).collect();
            let shown = options.len();
            options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt(format!("Which did you mean by '{}'?", query))
                .items(&options)
                .default(0)
                .interact()?;

            Ok((selection < shown).then(|| candidates[selection]))
        }
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
