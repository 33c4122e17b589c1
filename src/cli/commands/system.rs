use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandHandler};
use crate::utils::build_info;

use super::orders::print_order;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "bootstrap",
            "Load the demo dataset into an empty orchard",
            "bootstrap",
            cmd_bootstrap,
        ),
        CommandEntry::new("menu", "Pick a command from a list", "menu", cmd_menu),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_bootstrap(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let report = context.orchard_mut().bootstrap()?;
    io::print_success(format!(
        "Demo dataset loaded: {} fruits, {} regions, {} harvests, {} orders.",
        report.fruits,
        report.regions,
        report.harvests,
        report.orders.len()
    ));
    for order in &report.orders {
        print_order(order);
    }
    Ok(())
}

fn cmd_menu(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require_interactive("menu")?;
    let choices: Vec<(&'static str, &'static str, CommandHandler)> = context
        .registry
        .list()
        .into_iter()
        .filter(|entry| entry.takes_no_arguments() && entry.name != "menu")
        .map(|entry| (entry.name, entry.description, entry.handler))
        .collect();
    let labels: Vec<String> = choices
        .iter()
        .map(|(name, description, _)| format!("{name:<16} {description}"))
        .collect();
    let Some(index) = io::select_option(&context.theme, "Choose a command", &labels)? else {
        return Ok(());
    };
    let (_, _, handler) = choices[index];
    handler(context, &[])
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Orchard Core {}", meta.version));
    io::print_info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Target       : {}", meta.target));
    io::print_info(format!("  Profile      : {}", meta.profile));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first().map(|name| name.to_lowercase()) {
        match context.command(&name) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(args[0]),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
