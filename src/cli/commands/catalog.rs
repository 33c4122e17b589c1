use chrono::{Datelike, Local};

use crate::catalog::{parse_month, AreaType};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, money, quantity, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::errors::OrchardError;
use crate::reporting::ReportService;

use super::{expect_args, parse_category};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("fruits", "List the fruit catalog", "fruits", cmd_fruits),
        CommandEntry::new(
            "fruit",
            "Describe one fruit",
            "fruit <category> <variety>",
            cmd_fruit,
        ),
        CommandEntry::new(
            "season",
            "Show which fruits are in season",
            "season [MM-DD]",
            cmd_season,
        ),
        CommandEntry::new("regions", "Show planting regions per fruit", "regions", cmd_regions),
        CommandEntry::new(
            "region-switch",
            "Switch a region between pick and market",
            "region-switch <id> <pick|market>",
            cmd_region_switch,
        ),
    ]
}

fn cmd_fruits(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let catalog = context.orchard().catalog();
    if catalog.is_empty() {
        io::print_info("No fruits recorded yet.");
        return Ok(());
    }
    output_section("Fruits");
    let rows: Vec<Vec<String>> = catalog
        .varieties()
        .iter()
        .map(|fruit| {
            vec![
                fruit.category.number().to_string(),
                fruit.name.clone(),
                fruit.size.clone(),
                fruit.sweet.clone(),
                fruit.sour.clone(),
                fruit.taste.clone(),
                money(fruit.price),
                fruit.usage.clone(),
            ]
        })
        .collect();
    output::render_table(
        &["type_num", "variety", "size", "sweet", "sour", "taste", "price", "use"],
        &rows,
    );
    Ok(())
}

fn cmd_fruit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "fruit <category> <variety>")?;
    let category = parse_category(args[0])?;
    let fruit = context
        .orchard()
        .catalog()
        .lookup(category, args[1])
        .ok_or_else(|| OrchardError::FruitNotFound {
            category: category.number(),
            variety: args[1].to_string(),
        })?;
    output_section(fruit.display_name());
    io::print_info(fruit.describe());
    io::print_info(format!("Price: {}", money(fruit.price)));
    if let Some(months) = fruit.season() {
        let months: Vec<String> = months.iter().map(u32::to_string).collect();
        io::print_info(format!("Season months: {}", months.join(", ")));
    }
    Ok(())
}

fn cmd_season(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = match args.first() {
        Some(date) => parse_month(date)?,
        None => Local::now().month(),
    };
    let catalog = context.orchard().catalog();
    output_section(format!("Season for month {month}"));
    for fruit in catalog.varieties() {
        let status = fruit.in_season(month);
        if status.is_available() {
            io::print_success(status.message(fruit));
        } else {
            io::print_info(status.message(fruit));
        }
    }
    let available: Vec<&str> = catalog
        .available_in(month)
        .into_iter()
        .map(|fruit| fruit.name.as_str())
        .collect();
    if available.is_empty() {
        io::print_warning("No fruit is in season.");
    } else {
        io::print_info(format!("Available now: {}", available.join(", ")));
    }
    Ok(())
}

fn join_ids(ids: &[u32]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter().map(u32::to_string).collect::<Vec<_>>().join(", ")
}

fn cmd_regions(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let orchard = context.orchard();
    let summary = ReportService::region_summary(orchard.catalog(), orchard.plantation());
    if summary.is_empty() {
        io::print_info("No fruits recorded yet.");
        return Ok(());
    }
    output_section("Regions");
    let rows: Vec<Vec<String>> = summary
        .iter()
        .map(|entry| {
            vec![
                entry.display_name.clone(),
                quantity(entry.pick_area),
                quantity(entry.market_area),
                join_ids(&entry.pick_regions),
                join_ids(&entry.market_regions),
            ]
        })
        .collect();
    output::render_table(
        &["fruit", "pick area", "market area", "pick regions", "market regions"],
        &rows,
    );
    for region in orchard.plantation().regions() {
        io::print_info(region.describe());
    }

    output_section("Area by fruit");
    let areas: Vec<Vec<String>> =
        ReportService::area_summary(orchard.catalog(), orchard.plantation())
            .into_iter()
            .map(|row| vec![row.key, quantity(row.picking), quantity(row.marketing)])
            .collect();
    output::render_table(&["fruit", "picking", "marketing"], &areas);
    Ok(())
}

fn cmd_region_switch(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "region-switch <id> <pick|market>")?;
    let id = args[0].parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid region id `{}`", args[0]))
    })?;
    let area_type = args[1].parse::<AreaType>()?;
    let region = context.orchard_mut().set_area_type(id, area_type)?;
    io::print_success(region.describe());
    Ok(())
}
