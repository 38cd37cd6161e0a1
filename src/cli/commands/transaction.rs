use chrono::{Datelike, NaiveDate};

use fintrack_core::{
    format::DateFormatter, LedgerService, LedgerStore, TransactionFilter, TransactionService,
};
use fintrack_domain::{EntryKind, Transaction};

use crate::cli::core::{CommandResult, RefreshNotice};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

use super::{
    invalid, parse_amount, parse_date, parse_kind, parse_number, resolve_id, short_id,
    split_subcommand, usage_error, ParsedArgs,
};

const USAGE: &str = "tx add <income|expense> <amount> <category> [title] [--date YYYY-MM-DD] [--notes text] [--goal id] [--attachment ref]
tx list [income|expense|all] [search] [--limit n]
tx edit <id> [--amount n] [--title text] [--category name] [--kind income|expense] [--date YYYY-MM-DD] [--notes text]
tx remove <id>
tx calendar [YYYY-MM]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "tx",
        "Record, list, edit and remove transactions",
        USAGE,
        cmd_tx,
    )]
}

fn cmd_tx(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "add" => tx_add(context, rest),
        "list" | "ls" => tx_list(context, rest),
        "edit" => tx_edit(context, rest),
        "remove" | "rm" => tx_remove(context, rest),
        "calendar" | "cal" => tx_calendar(context, rest),
        other => Err(invalid(format!("unknown tx action `{other}`"))),
    }
}

fn tx_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["date", "notes", "goal", "attachment"])?;
    let (kind, amount, category, title) = match parsed.positional.as_slice() {
        [kind, amount, category] => (kind, amount, category, category.to_string()),
        [kind, amount, category, title @ ..] => (kind, amount, category, title.join(" ")),
        _ => return Err(usage_error(USAGE)),
    };
    let kind = parse_kind(kind)?;
    let amount = parse_amount("amount", amount)?;
    let date = match parsed.option("date") {
        Some(raw) => parse_date(raw)?,
        None => context.now(),
    };
    let goal_id = match parsed.option("goal") {
        Some(raw) => Some(resolve_id(
            raw,
            context.ledger()?.savings_goals.iter().map(|goal| goal.id),
            "goal",
        )?),
        None => None,
    };

    let mut txn = Transaction::new(context.active_user()?, title, amount, kind, *category, date);
    txn.notes = parsed.option("notes").map(str::to_string);
    txn.attachment = parsed.option("attachment").map(str::to_string);
    txn.savings_goal_id = goal_id;

    let outcome = LedgerService::record_transaction(&context.store, txn)?;
    context.refresh(RefreshNotice::Quiet)?;

    let fmt = &context.formatters;
    output::success(format!(
        "Recorded {} {} `{}` ({}).",
        outcome.transaction.kind.as_str(),
        fmt.money(outcome.transaction.amount),
        outcome.transaction.title,
        short_id(outcome.transaction.id)
    ));
    if let Some(category) = &outcome.created_category {
        output::info(format!(
            "New {} category `{}`.",
            category.kind.as_str(),
            category.name
        ));
    }
    if let Some(funding) = &outcome.funding {
        output::info(format!(
            "Goal `{}` is now at {} of {}.",
            funding.goal.name,
            fmt.money(funding.goal.current_amount),
            fmt.money(funding.goal.target_amount)
        ));
        if funding.completed_now {
            output::success(format!("Goal `{}` reached!", funding.goal.name));
        }
    }
    if let Some(err) = &outcome.funding_error {
        output::warning(format!("Transaction saved but the goal was not funded: {err}"));
    }
    Ok(())
}

fn tx_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["limit"])?;
    let mut positional = parsed.positional.as_slice();
    let mut filter = TransactionFilter::default();
    if let Some((first, rest)) = positional.split_first() {
        if first.eq_ignore_ascii_case("all") {
            positional = rest;
        } else if let Some(kind) = EntryKind::parse(first) {
            filter.kind = Some(kind);
            positional = rest;
        }
    }
    if !positional.is_empty() {
        filter.search = Some(positional.join(" "));
    }
    let limit = match parsed.option("limit") {
        Some(raw) => parse_number::<usize>("limit", raw)?,
        None => usize::MAX,
    };

    let matching = TransactionService::filter(&context.ledger()?.transactions, &filter);
    let recent = TransactionService::recent(&matching, limit);
    let groups = TransactionService::group_by_day(&recent);

    let fmt = &context.formatters;
    output::section(format!("Transactions ({})", recent.len()));
    if groups.is_empty() {
        output::info("  (none)");
    }
    for group in groups {
        output::info(fmt.format_date(group.date));
        for txn in &group.transactions {
            let sign = if txn.is_income() { '+' } else { '-' };
            let recurring = if txn.recurring_rule_id.is_some() { " (recurring)" } else { "" };
            output::info(format!(
                "  {}  {sign}{:<14} {:<16} {}{recurring}",
                short_id(txn.id),
                fmt.money(txn.amount),
                txn.category,
                txn.title
            ));
        }
    }
    Ok(())
}

fn tx_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const EDIT_USAGE: &str = "tx edit <id> [--amount n] [--title text] [--category name] \
                              [--kind income|expense] [--date YYYY-MM-DD] [--notes text]";
    let parsed = ParsedArgs::parse(
        args,
        &["amount", "title", "category", "kind", "date", "notes"],
    )?;
    let [target] = parsed.positional.as_slice() else {
        return Err(usage_error(EDIT_USAGE));
    };
    if parsed.options.is_empty() {
        return Err(usage_error(EDIT_USAGE));
    }
    let ledger = context.ledger()?;
    let id = resolve_id(target, ledger.transactions.iter().map(|txn| txn.id), "transaction")?;
    let mut txn = ledger
        .transactions
        .iter()
        .find(|txn| txn.id == id)
        .cloned()
        .ok_or_else(|| invalid(format!("no transaction matches `{target}`")))?;
    let recorded_amount = txn.amount;

    if let Some(raw) = parsed.option("amount") {
        txn.amount = parse_amount("amount", raw)?;
    }
    if let Some(title) = parsed.option("title") {
        txn.title = title.to_string();
    }
    if let Some(category) = parsed.option("category") {
        txn.category = category.trim().to_string();
    }
    if let Some(raw) = parsed.option("kind") {
        txn.kind = parse_kind(raw)?;
    }
    if let Some(raw) = parsed.option("date") {
        txn.date = parse_date(raw)?;
    }
    if let Some(notes) = parsed.option("notes") {
        txn.notes = Some(notes.to_string()).filter(|notes| !notes.is_empty());
    }

    context.store.update_transaction(&txn)?;
    context.refresh(RefreshNotice::Quiet)?;
    output::success(format!("Updated `{}` ({}).", txn.title, short_id(txn.id)));
    if txn.savings_goal_id.is_some() && txn.amount != recorded_amount {
        output::hint("Linked goal totals are not adjusted when a transaction is edited.");
    }
    Ok(())
}

fn tx_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [target] = args else {
        return Err(usage_error("tx remove <id>"));
    };
    let user = context.active_user()?.to_string();
    let id = resolve_id(
        target,
        context.ledger()?.transactions.iter().map(|txn| txn.id),
        "transaction",
    )?;
    if !context.confirm(&format!("Remove transaction {}?", short_id(id)))? {
        return Ok(());
    }
    let removed = context.store.delete_transaction(&user, id)?;
    context.refresh(RefreshNotice::Quiet)?;
    output::success(format!("Removed `{}` ({}).", removed.title, short_id(removed.id)));
    if removed.savings_goal_id.is_some() {
        output::hint("Linked goal totals are not reduced when a transaction is removed.");
    }
    Ok(())
}

fn tx_calendar(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (year, month) = match args.first() {
        Some(raw) => {
            let first = NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
                .map_err(|_| invalid(format!("expected a month like 2024-06, got `{raw}`")))?;
            (first.year(), first.month())
        }
        None => {
            let today = context.now().date_naive();
            (today.year(), today.month())
        }
    };
    let cells = TransactionService::month_calendar(&context.ledger()?.transactions, year, month)?;

    let fmt = &context.formatters;
    output::section(format!("{year}-{month:02}"));
    let mut active = 0usize;
    for cell in cells.iter().filter(|cell| cell.has_activity) {
        active += 1;
        output::info(format!(
            "  {}  +{:<14} -{}",
            fmt.format_date(cell.date),
            fmt.money(cell.income),
            fmt.money(cell.expense)
        ));
    }
    output::field("Active days", format!("{active} of {}", cells.len()));
    Ok(())
}
