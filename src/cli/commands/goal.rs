use fintrack_core::{CategoryService, GoalService, LedgerService, LedgerStore};
use fintrack_domain::{GoalProgress, SavingsGoal};

use crate::cli::core::{CommandResult, RefreshNotice};
use crate::cli::formatters::CliFormatters;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

use super::{
    invalid, parse_amount, parse_date, resolve_id, short_id, split_subcommand, usage_error,
    ParsedArgs,
};

const USAGE: &str = "goal add <name> <target> <deadline YYYY-MM-DD> [--color #RRGGBB]
goal list
goal fund <id> <amount>
goal remove <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "goal",
        "Manage savings goals",
        USAGE,
        cmd_goal,
    )]
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "add" => goal_add(context, rest),
        "list" | "ls" => goal_list(context),
        "fund" => goal_fund(context, rest),
        "remove" | "rm" => goal_remove(context, rest),
        other => Err(invalid(format!("unknown goal action `{other}`"))),
    }
}

fn goal_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["color"])?;
    let [name, target, deadline] = parsed.positional.as_slice() else {
        return Err(usage_error(USAGE));
    };
    let target = parse_amount("target", target)?;
    let deadline = parse_date(deadline)?;
    let color = parsed
        .option("color")
        .unwrap_or_else(|| CategoryService::palette_color(name));

    let goal = SavingsGoal::new(context.active_user()?, *name, target, deadline, color);
    context.store.create_savings_goal(&goal)?;
    context.refresh(RefreshNotice::Quiet)?;
    output::success(format!(
        "Created goal `{}` ({}) targeting {}.",
        goal.name,
        short_id(goal.id),
        context.formatters.money(goal.target_amount)
    ));
    Ok(())
}

fn goal_list(context: &mut ShellContext) -> CommandResult {
    let now = context.now();
    let progress: Vec<GoalProgress> = context
        .ledger()?
        .savings_goals
        .iter()
        .map(|goal| GoalService::progress(goal, now))
        .collect();
    print_goals(&context.formatters, &progress);
    Ok(())
}

/// "Add funds" action; the amount is not tied to a transaction.
fn goal_fund(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [target, amount] = args else {
        return Err(usage_error("goal fund <id> <amount>"));
    };
    let amount = parse_amount("amount", amount)?;
    let user = context.active_user()?.to_string();
    let id = resolve_id(
        target,
        context.ledger()?.savings_goals.iter().map(|goal| goal.id),
        "goal",
    )?;

    let outcome = LedgerService::add_funds(&context.store, &user, id, amount)?;
    context.refresh(RefreshNotice::Quiet)?;
    let fmt = &context.formatters;
    output::success(format!(
        "Added {} to `{}`: {} of {}.",
        fmt.money(amount),
        outcome.goal.name,
        fmt.money(outcome.goal.current_amount),
        fmt.money(outcome.goal.target_amount)
    ));
    if outcome.completed_now {
        output::success(format!("Goal `{}` reached!", outcome.goal.name));
    }
    Ok(())
}

fn goal_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [target] = args else {
        return Err(usage_error("goal remove <id>"));
    };
    let user = context.active_user()?.to_string();
    let id = resolve_id(
        target,
        context.ledger()?.savings_goals.iter().map(|goal| goal.id),
        "goal",
    )?;
    if !context.confirm(&format!("Remove goal {}?", short_id(id)))? {
        return Ok(());
    }
    context.store.delete_savings_goal(&user, id)?;
    context.refresh(RefreshNotice::Quiet)?;
    output::success(format!("Removed goal {}.", short_id(id)));
    Ok(())
}

pub(crate) fn print_goals(fmt: &CliFormatters, goals: &[GoalProgress]) {
    output::section("Savings goals");
    if goals.is_empty() {
        output::info("  (none)");
        return;
    }
    for goal in goals {
        let status = if goal.complete {
            "complete".to_string()
        } else {
            format!("{} to go, {} days left", fmt.money(goal.remaining), goal.days_left)
        };
        output::info(format!(
            "  {}  {:<18} {} / {} ({}) {status}",
            short_id(goal.goal_id),
            goal.name,
            fmt.money(goal.current_amount),
            fmt.money(goal.target_amount),
            fmt.percent(goal.percent),
        ));
    }
}
