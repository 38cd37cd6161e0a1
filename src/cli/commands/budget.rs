use fintrack_core::{BudgetService, LedgerStore};
use fintrack_domain::{Budget, BudgetOverview, BudgetUsage};

use crate::cli::core::{CommandResult, RefreshNotice};
use crate::cli::formatters::CliFormatters;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

use super::{invalid, parse_amount, resolve_id, short_id, split_subcommand, usage_error};

const USAGE: &str = "budget set <category> <limit>
budget list
budget remove <category|id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "budget",
        "Manage monthly category budgets",
        USAGE,
        cmd_budget,
    )]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "set" => budget_set(context, rest),
        "list" | "ls" => budget_list(context),
        "remove" | "rm" => budget_remove(context, rest),
        other => Err(invalid(format!("unknown budget action `{other}`"))),
    }
}

/// Updates the first budget for the category or creates one.
fn budget_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [category, limit] = args else {
        return Err(usage_error("budget set <category> <limit>"));
    };
    let limit = parse_amount("limit", limit)?;
    let user = context.active_user()?.to_string();

    let existing = context
        .ledger()?
        .budgets
        .iter()
        .find(|budget| budget.category == *category)
        .cloned();
    let created = existing.is_none();
    let budget = match existing {
        Some(budget) => Budget { limit, ..budget },
        None => Budget::new(&user, *category, limit),
    };
    context.store.upsert_budget(&budget)?;
    context.refresh(RefreshNotice::Quiet)?;

    let verb = if created { "Created" } else { "Updated" };
    output::success(format!(
        "{verb} budget for `{category}`: {}",
        context.formatters.money(limit)
    ));
    Ok(())
}

fn budget_list(context: &mut ShellContext) -> CommandResult {
    let budgets = BudgetService::with_spent(
        &context.ledger()?.budgets,
        &context.ledger()?.transactions,
        context.now(),
    );
    let usage: Vec<BudgetUsage> = budgets.iter().map(BudgetService::usage).collect();
    let overview = BudgetService::overview(&budgets, context.now());
    print_budgets(&context.formatters, &usage, &overview);
    Ok(())
}

fn budget_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [target] = args else {
        return Err(usage_error("budget remove <category|id>"));
    };
    let user = context.active_user()?.to_string();
    let budgets = &context.ledger()?.budgets;
    let id = match budgets.iter().find(|budget| budget.category == *target) {
        Some(budget) => budget.id,
        None => resolve_id(target, budgets.iter().map(|budget| budget.id), "budget")?,
    };
    if !context.confirm(&format!("Remove budget {}?", short_id(id)))? {
        return Ok(());
    }
    context.store.delete_budget(&user, id)?;
    context.refresh(RefreshNotice::Quiet)?;
    output::success(format!("Removed budget {}.", short_id(id)));
    Ok(())
}

pub(crate) fn print_budgets(
    fmt: &CliFormatters,
    budgets: &[BudgetUsage],
    overview: &BudgetOverview,
) {
    output::section("Budgets this month");
    if budgets.is_empty() {
        output::info("  (none)");
        return;
    }
    for usage in budgets {
        let flag = if usage.over_limit { "  OVER" } else { "" };
        output::info(format!(
            "  {}  {:<18} {} / {} ({}){flag}",
            short_id(usage.budget.id),
            usage.budget.category,
            fmt.money(usage.budget.spent),
            fmt.money(usage.budget.limit),
            fmt.percent(usage.percent_used),
        ));
    }
    output::field("Total budgeted", fmt.money(overview.total_budgeted));
    output::field("Total spent", fmt.money(overview.total_spent));
    output::field("Remaining", fmt.money(overview.total_remaining));
    output::field("Progress", fmt.percent(overview.progress_pct));
    output::field("Days remaining", overview.days_remaining);
    output::field("Safe daily spend", fmt.money(overview.safe_daily_spend));
}
