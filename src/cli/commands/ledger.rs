use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, quantity, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::ledger::SequenceKind;
use crate::reporting::ReportService;

use super::{expect_args, parse_amount, parse_category};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("inventory", "Show current inventory", "inventory", cmd_inventory),
        CommandEntry::new(
            "remaining",
            "Show remaining productivity",
            "remaining",
            cmd_remaining,
        ),
        CommandEntry::new("extra", "Show extra productivity", "extra", cmd_extra),
        CommandEntry::new(
            "add-inventory",
            "Record harvested fruit",
            "add-inventory <variety> <qty>",
            cmd_add_inventory,
        ),
        CommandEntry::new(
            "remove-inventory",
            "Take fruit out of inventory",
            "remove-inventory <variety> <qty>",
            cmd_remove_inventory,
        ),
        CommandEntry::new(
            "history",
            "Show a ledger's rows for one category",
            "history <inventory|remaining|extra> <category>",
            cmd_history,
        ),
        CommandEntry::new(
            "estimate",
            "Seed remaining productivity from planned areas",
            "estimate",
            cmd_estimate,
        ),
    ]
}

fn print_current(context: &ShellContext, kind: SequenceKind) {
    let sequence = context.orchard().ledger().sequence(kind);
    let Some(row) = sequence.current() else {
        io::print_warning(format!("{kind} is empty"));
        return;
    };
    output_section(format!("{kind} (row {})", row.index));
    let rows: Vec<Vec<String>> = sequence
        .labelled(row)
        .map(|(variety, value)| vec![variety.to_string(), quantity(value)])
        .collect();
    output::render_table(&["variety", "quantity"], &rows);
}

fn cmd_inventory(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_current(context, SequenceKind::Inventory);
    Ok(())
}

fn cmd_remaining(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_current(context, SequenceKind::RemainingProductivity);
    Ok(())
}

fn cmd_extra(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_current(context, SequenceKind::ExtraProductivity);
    Ok(())
}

fn cmd_add_inventory(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "add-inventory <variety> <qty>")?;
    let amount = parse_amount(args[1])?;
    let harvest = context.orchard_mut().add_inventory(args[0], amount)?;
    io::print_success(format!(
        "Added {} {} to inventory (row {}).",
        quantity(amount),
        args[0],
        harvest.inventory_index
    ));
    match harvest.consumption {
        Some(consumption) => io::print_info(format!("{}: {consumption}", args[0])),
        None => io::print_warning(
            "Remaining productivity not seeded. Please estimate capacity first.",
        ),
    }
    Ok(())
}

fn cmd_remove_inventory(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "remove-inventory <variety> <qty>")?;
    let amount = parse_amount(args[1])?;
    let row = context.orchard_mut().remove_inventory(args[0], amount)?;
    io::print_success(format!(
        "Removed {} {} from inventory (row {}).",
        quantity(amount),
        args[0],
        row.index
    ));
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "history <inventory|remaining|extra> <category>")?;
    let kind = args[0].parse::<SequenceKind>()?;
    let category = parse_category(args[1])?;
    let table = ReportService::history(context.orchard().ledger(), kind, category);
    if table.rows.is_empty() {
        io::print_warning(format!("{kind} is empty"));
        return Ok(());
    }
    output_section(format!("{kind} history for {}", category.label()));
    let mut headers = vec!["index"];
    headers.extend(table.columns.iter().map(String::as_str));
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|(index, values)| {
            let mut row = vec![index.to_string()];
            row.extend(values.iter().map(|value| quantity(*value)));
            row
        })
        .collect();
    output::render_table(&headers, &rows);
    Ok(())
}

fn cmd_estimate(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.orchard_mut().estimate_capacity()?;
    io::print_success("Remaining productivity seeded from planned areas.");
    print_current(context, SequenceKind::RemainingProductivity);
    Ok(())
}
