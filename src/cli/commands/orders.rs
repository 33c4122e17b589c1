use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, money, quantity, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::orders::{GroupKey, OrderRecord};
use crate::reporting::ReportService;

use super::{expect_args, parse_amount};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "sell",
            "Sell fruit from inventory",
            "sell <variety> <weight>",
            cmd_sell,
        ),
        CommandEntry::new(
            "pick",
            "Record a pick-your-own order",
            "pick <variety> <weight>",
            cmd_pick,
        ),
        CommandEntry::new(
            "check",
            "Check whether inventory covers a sale",
            "check <variety> <weight>",
            cmd_check,
        ),
        CommandEntry::new("orders", "List recorded orders", "orders", cmd_orders),
        CommandEntry::new(
            "revenue",
            "Total revenue grouped by sales or fruit type",
            "revenue <sales_type|fruit_type>",
            cmd_revenue,
        ),
        CommandEntry::new(
            "revenue-share",
            "Share of revenue per fruit type",
            "revenue-share",
            cmd_revenue_share,
        ),
    ]
}

pub(crate) fn print_order(order: &OrderRecord) {
    io::print_success(format!(
        "Order {} recorded: {} {} {} at {}, revenue {}",
        order.index,
        order.kind,
        quantity(order.weight),
        order.variety,
        money(order.unit_price),
        money(order.revenue)
    ));
}

fn cmd_sell(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "sell <variety> <weight>")?;
    let weight = parse_amount(args[1])?;
    let order = context.orchard_mut().sell(args[0], weight)?;
    print_order(&order);
    Ok(())
}

fn cmd_pick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "pick <variety> <weight>")?;
    let weight = parse_amount(args[1])?;
    let order = context.orchard_mut().pick(args[0], weight)?;
    print_order(&order);
    Ok(())
}

fn cmd_check(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "check <variety> <weight>")?;
    let weight = parse_amount(args[1])?;
    let check = context.orchard().check_stock(args[0], weight)?;
    if check.sufficient {
        io::print_success(format!(
            "Enough {} in inventory: {} available.",
            args[0],
            quantity(check.available)
        ));
    } else {
        io::print_warning(format!(
            "Not enough {} in inventory, only {} left",
            args[0],
            quantity(check.available)
        ));
    }
    Ok(())
}

fn cmd_orders(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let orders = context.orchard().orders().orders();
    if orders.is_empty() {
        io::print_info("No orders recorded yet.");
        return Ok(());
    }
    output_section("Orders");
    let rows: Vec<Vec<String>> = orders
        .iter()
        .map(|order| {
            vec![
                order.index.to_string(),
                order.kind.to_string(),
                order.category.number().to_string(),
                order.variety.clone(),
                quantity(order.weight),
                money(order.unit_price),
                money(order.revenue),
            ]
        })
        .collect();
    output::render_table(
        &[
            "index",
            "sales_type",
            "fruit_type",
            "fruit_variety",
            "weight",
            "unit_price",
            "revenue",
        ],
        &rows,
    );
    Ok(())
}

fn cmd_revenue(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, "revenue <sales_type|fruit_type>")?;
    let key = args[0].parse::<GroupKey>()?;
    let Some(groups) = ReportService::revenue_by(context.orchard().orders(), key) else {
        io::print_info("No data");
        return Ok(());
    };
    output_section(format!("Revenue by {key}"));
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|group| vec![group.key.clone(), money(group.revenue)])
        .collect();
    output::render_table(&[key.as_str(), "revenue"], &rows);
    Ok(())
}

fn cmd_revenue_share(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(shares) = ReportService::revenue_share_by_category(context.orchard().orders()) else {
        io::print_info("No data");
        return Ok(());
    };
    output_section("Revenue share by fruit type");
    let rows: Vec<Vec<String>> = shares
        .iter()
        .map(|share| {
            vec![
                share.category.label().to_string(),
                money(share.revenue),
                format!("{:.1}%", share.percent),
            ]
        })
        .collect();
    output::render_table(&["fruit_type", "revenue", "share"], &rows);
    Ok(())
}
