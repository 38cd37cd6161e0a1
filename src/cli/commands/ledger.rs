use fintrack_core::{
    format::DateFormatter, DashboardOptions, DashboardService, SummaryService, TrendService,
};
use fintrack_domain::{
    CategoryTotal, DailyPoint, EntryKind, MonthTrend, Summary, MAX_SERIES_WINDOW_DAYS,
};

use crate::cli::core::{CommandResult, RefreshNotice};
use crate::cli::formatters::CliFormatters;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

use super::{budget, goal, invalid, parse_kind, parse_number};

const SERIES_BAR_WIDTH: f64 = 24.0;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "user",
            "Show or switch the active user",
            "user [name]",
            cmd_user,
        )
        .standalone(),
        CommandEntry::new(
            "sync",
            "Process due recurring rules and report ledger problems",
            "sync",
            cmd_sync,
        )
        .standalone(),
        CommandEntry::new(
            "dashboard",
            "Show every insight for the active user",
            "dashboard [json]",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "summary",
            "Income, expense, balance and financial health",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "trend",
            "Month-over-month income and expense change",
            "trend",
            cmd_trend,
        ),
        CommandEntry::new(
            "series",
            "Daily income and expense for the last N days",
            "series [days]",
            cmd_series,
        ),
        CommandEntry::new(
            "top",
            "Largest categories by total",
            "top [income|expense] [count]",
            cmd_top,
        ),
    ]
}

fn dashboard_options(context: &ShellContext) -> DashboardOptions {
    DashboardOptions {
        daily_window_days: context.config.daily_window_days,
        top_categories: context.config.top_categories,
    }
}

fn cmd_user(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first().map(|name| name.trim()).filter(|name| !name.is_empty()) else {
        match &context.user {
            Some(user) => output::info(format!("Active user: {user}")),
            None => output::info("No active user. Use `user <name>` to pick one."),
        }
        return Ok(());
    };

    context.switch_user(name)?;
    let ledger = &context.refresh(RefreshNotice::Full)?.ledger;
    let counts = format!(
        "{} transactions, {} rules, {} budgets, {} goals",
        ledger.transactions.len(),
        ledger.recurring_rules.len(),
        ledger.budgets.len(),
        ledger.savings_goals.len()
    );
    output::success(format!("Active user set to `{name}` ({counts})."));
    Ok(())
}

fn cmd_sync(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let report = context.refresh(RefreshNotice::Full)?;
    if report.materialized == 0 && report.issues.is_empty() {
        output::info("Ledger is up to date.");
    }
    Ok(())
}

fn cmd_dashboard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dashboard =
        DashboardService::build(context.ledger()?, context.now(), dashboard_options(context));

    match args.first().map(|arg| arg.to_lowercase()) {
        Some(format) if format == "json" => {
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            return Ok(());
        }
        Some(other) => return Err(invalid(format!("unknown dashboard format `{other}`"))),
        None => {}
    }

    let fmt = &context.formatters;
    print_summary(fmt, &dashboard.summary);
    print_trend(fmt, &dashboard.trend);

    output::section("Top income");
    print_top(fmt, &dashboard.top_income);
    output::section("Top expenses");
    print_top(fmt, &dashboard.top_expense);

    budget::print_budgets(fmt, &dashboard.budgets, &dashboard.budget_overview);
    goal::print_goals(fmt, &dashboard.goals);
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = SummaryService::summarize(&context.ledger()?.transactions);
    print_summary(&context.formatters, &summary);
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let trend = TrendService::month_over_month(&context.ledger()?.transactions, context.now());
    print_trend(&context.formatters, &trend);
    Ok(())
}

fn cmd_series(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let days = match args.first() {
        Some(raw) => parse_number::<u32>("days", raw)?,
        None => context.config.daily_window_days,
    };
    if days > MAX_SERIES_WINDOW_DAYS {
        return Err(invalid(format!(
            "series covers at most {MAX_SERIES_WINDOW_DAYS} days"
        )));
    }
    let series = TrendService::daily_series(&context.ledger()?.transactions, context.now(), days);
    output::section(format!("Last {days} days"));
    print_series(&context.formatters, &series);
    Ok(())
}

fn cmd_top(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = match args.first() {
        Some(raw) => parse_kind(raw)?,
        None => EntryKind::Expense,
    };
    let count = match args.get(1) {
        Some(raw) => parse_number::<usize>("count", raw)?,
        None => context.config.top_categories,
    };
    let totals = TrendService::top_categories(&context.ledger()?.transactions, kind, count);
    output::section(format!("Top {kind} categories"));
    print_top(&context.formatters, &totals);
    Ok(())
}

fn print_summary(fmt: &CliFormatters, summary: &Summary) {
    let health = SummaryService::health_report(summary);
    output::section("Summary");
    output::field("Income", fmt.money(summary.income));
    output::field("Expense", fmt.money(summary.expense));
    output::field("Balance", fmt.money(summary.balance));
    output::field("Savings rate", fmt.percent(health.savings_rate_pct));
    output::field("Health score", format!("{}/100 ({})", health.score, health.status));
}

fn print_trend(fmt: &CliFormatters, trend: &MonthTrend) {
    output::section("Month over month");
    output::field("Income", fmt.delta(trend.income_trend_pct));
    output::field("Expense", fmt.delta(trend.expense_trend_pct));
}

fn print_top(fmt: &CliFormatters, totals: &[CategoryTotal]) {
    if totals.is_empty() {
        output::info("  (none)");
        return;
    }
    for (rank, total) in totals.iter().enumerate() {
        output::info(format!(
            "  {}. {:<20} {}",
            rank + 1,
            total.category,
            fmt.money(total.total)
        ));
    }
}

fn print_series(fmt: &CliFormatters, series: &[DailyPoint]) {
    let peak = series
        .iter()
        .map(|point| point.income.max(point.expense))
        .fold(0.0_f64, f64::max);
    for point in series {
        let bar = if peak > 0.0 {
            "#".repeat((point.expense / peak * SERIES_BAR_WIDTH).round() as usize)
        } else {
            String::new()
        };
        output::info(format!(
            "  {}  +{:<14} -{:<14} {}",
            fmt.format_date(point.date),
            fmt.money(point.income),
            fmt.money(point.expense),
            bar
        ));
    }
}
