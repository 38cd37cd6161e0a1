use fintrack_core::{format::DateFormatter, LedgerStore, RecurrenceService};
use fintrack_domain::RecurringRule;

use crate::cli::core::{CommandResult, RefreshNotice};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

use super::{
    invalid, parse_amount, parse_date, parse_frequency, parse_kind, parse_number, resolve_id,
    short_id, split_subcommand, usage_error, ParsedArgs,
};

const DEFAULT_HORIZON_DAYS: u32 = 30;

const USAGE: &str = "rule add <income|expense> <amount> <category> <daily|weekly|monthly|yearly> [title] [--start YYYY-MM-DD]
rule list [horizon days]
rule remove <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "rule",
        "Manage recurring income and expense rules",
        USAGE,
        cmd_rule,
    )]
}

fn cmd_rule(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "add" => rule_add(context, rest),
        "list" | "ls" => rule_list(context, rest),
        "remove" | "rm" => rule_remove(context, rest),
        other => Err(invalid(format!("unknown rule action `{other}`"))),
    }
}

/// New rules are due immediately unless `--start` says otherwise.
fn rule_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["start"])?;
    let (kind, amount, category, frequency, title) = match parsed.positional.as_slice() {
        [kind, amount, category, frequency] => {
            (kind, amount, category, frequency, category.to_string())
        }
        [kind, amount, category, frequency, title @ ..] => {
            (kind, amount, category, frequency, title.join(" "))
        }
        _ => return Err(usage_error(USAGE)),
    };
    let kind = parse_kind(kind)?;
    let amount = parse_amount("amount", amount)?;
    let frequency = parse_frequency(frequency)?;

    let mut rule = RecurringRule::new(
        context.active_user()?,
        title,
        amount,
        kind,
        *category,
        frequency,
        context.now(),
    );
    if let Some(raw) = parsed.option("start") {
        rule = rule.starting(parse_date(raw)?);
    }

    context.store.create_recurring_rule(&rule)?;
    output::success(format!(
        "Created {} rule `{}` ({}).",
        rule.frequency.as_str(),
        rule.title,
        short_id(rule.id)
    ));
    context.refresh(RefreshNotice::Quiet)?;
    Ok(())
}

fn rule_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let horizon = match args.first() {
        Some(raw) => parse_number::<u32>("horizon", raw)?,
        None => DEFAULT_HORIZON_DAYS,
    };
    let now = context.now();
    let rules = &context.ledger()?.recurring_rules;
    let fmt = &context.formatters;

    output::section("Recurring rules");
    if rules.is_empty() {
        output::info("  (none)");
    }
    for rule in rules {
        let next = rule
            .next_due_date
            .map(|due| fmt.format_date(due.date_naive()))
            .unwrap_or_else(|| "never (missing due date)".into());
        output::info(format!(
            "  {}  {:<8} {:<8} {:<14} {:<16} {}  next {next}",
            short_id(rule.id),
            rule.frequency,
            rule.kind,
            fmt.money(rule.amount),
            rule.category,
            rule.title
        ));
    }

    let upcoming = RecurrenceService::peek_upcoming(rules, now, horizon);
    output::section(format!("Upcoming in {horizon} days"));
    if upcoming.is_empty() {
        output::info("  (none)");
    }
    for occurrence in upcoming {
        output::info(format!(
            "  {}  {:<8} {:<14} {}",
            fmt.format_date(occurrence.due.date_naive()),
            occurrence.kind,
            fmt.money(occurrence.amount),
            occurrence.title
        ));
    }
    Ok(())
}

fn rule_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [target] = args else {
        return Err(usage_error("rule remove <id>"));
    };
    let user = context.active_user()?.to_string();
    let id = resolve_id(
        target,
        context.ledger()?.recurring_rules.iter().map(|rule| rule.id),
        "rule",
    )?;
    if !context.confirm(&format!("Remove rule {}?", short_id(id)))? {
        return Ok(());
    }
    context.store.delete_recurring_rule(&user, id)?;
    context.refresh(RefreshNotice::Quiet)?;
    output::success(format!(
        "Removed rule {}. Transactions it already created are kept.",
        short_id(id)
    ));
    Ok(())
}
