pub mod catalog;
pub mod ledger;
pub mod orders;
pub mod system;

use crate::catalog::Category;
use crate::cli::core::CommandError;
use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(catalog::definitions());
    commands.extend(ledger::definitions());
    commands.extend(orders::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn expect_args(args: &[&str], count: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(CommandError::InvalidArguments(format!("usage: {usage}")))
    }
}

pub(crate) fn parse_amount(value: &str) -> Result<f64, CommandError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "invalid amount `{value}`, expected a non-negative number"
            ))
        })
}

/// Accepts a type number (`2`) or a category name (`cherry`).
pub(crate) fn parse_category(value: &str) -> Result<Category, CommandError> {
    if let Ok(number) = value.parse::<u8>() {
        return Ok(Category::from_number(number)?);
    }
    Category::ALL
        .into_iter()
        .find(|category| category.name().eq_ignore_ascii_case(value))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown category `{value}`, choose 1-Apple, 2-Cherry or 3-Peach"
            ))
        })
}
