use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    budget_service::BudgetService,
    calculator_service::CalculatorService,
    dashboard_service::{DashboardOptions, DashboardService},
    error::{CoreError, ValidationError},
    goal_service::GoalService,
    ledger_service::LedgerService,
    recurrence_service::{RecurrenceService, RuleIssue, RuleProblem, MAX_CATCH_UP_OCCURRENCES},
    storage::{LedgerStore, MemoryLedgerStore},
    summary_service::SummaryService,
    transaction_service::{TransactionFilter, TransactionService},
    trend_service::TrendService,
};
use fintrack_domain::{
    Budget, Category, EntryKind, Frequency, GoalFundingPolicy, HealthStatus, Ledger,
    RecurringRule, SavingsGoal, Summary, Transaction, MAX_SERIES_WINDOW_DAYS,
};

const USER: &str = "user-1";

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn txn(amount: f64, kind: EntryKind, category: &str, date: DateTime<Utc>) -> Transaction {
    Transaction::new(USER, category, amount, kind, category, date)
}

fn monthly_rule(amount: f64, kind: EntryKind, category: &str, due: DateTime<Utc>) -> RecurringRule {
    RecurringRule::new(USER, category, amount, kind, category, Frequency::Monthly, due)
}

#[test]
fn scheduler_catches_up_every_missed_period() {
    let now = at(2025, 6, 15);
    let rule = monthly_rule(42.0, EntryKind::Expense, "Streaming", at(2025, 3, 20));

    let outcome = RecurrenceService::process_due_rules(&[rule.clone()], now);

    assert_eq!(outcome.count(), 3);
    let dates: Vec<_> = outcome.materialized.iter().map(|t| t.day()).collect();
    assert_eq!(dates, vec![day(2025, 3, 20), day(2025, 4, 20), day(2025, 5, 20)]);
    for materialized in &outcome.materialized {
        assert_eq!(materialized.amount, rule.amount);
        assert_eq!(materialized.kind, rule.kind);
        assert_eq!(materialized.category, rule.category);
        assert_eq!(materialized.notes.as_deref(), Some("Streaming"));
        assert_eq!(materialized.recurring_rule_id, Some(rule.id));
    }

    let updated = &outcome.updated_rules[0];
    assert_eq!(updated.next_due_date, Some(at(2025, 6, 20)));
    assert_eq!(updated.last_processed, Some(at(2025, 5, 20)));
    assert!(outcome.issues.is_empty());
}

#[test]
fn salary_rule_two_months_overdue_lands_in_current_month() {
    let now = at(2025, 6, 15);
    let rule = monthly_rule(5_000_000.0, EntryKind::Income, "Salary", at(2025, 4, 16));

    let outcome = RecurrenceService::process_due_rules(&[rule], now);

    assert_eq!(outcome.count(), 2);
    let next = outcome.updated_rules[0].next_due_date.unwrap();
    assert!(next > now);
    assert_eq!(next.date_naive(), day(2025, 6, 16));
}

#[test]
fn rules_not_yet_due_are_left_alone() {
    let now = at(2025, 6, 15);
    let rule = monthly_rule(10.0, EntryKind::Expense, "Gym", at(2025, 6, 16));

    let outcome = RecurrenceService::process_due_rules(&[rule], now);

    assert_eq!(outcome.count(), 0);
    assert!(outcome.updated_rules.is_empty());
    assert!(!outcome.has_changes());
}

#[test]
fn rule_due_exactly_now_is_processed() {
    let now = at(2025, 6, 15);
    let rule = monthly_rule(10.0, EntryKind::Expense, "Gym", now);

    let outcome = RecurrenceService::process_due_rules(&[rule], now);

    assert_eq!(outcome.count(), 1);
    assert_eq!(outcome.updated_rules[0].next_due_date, Some(at(2025, 7, 15)));
}

#[test]
fn invalid_rules_are_reported_without_blocking_the_batch() {
    let now = at(2025, 6, 15);
    let good = monthly_rule(10.0, EntryKind::Expense, "Gym", at(2025, 6, 1));
    let mut unknown = monthly_rule(5.0, EntryKind::Expense, "Misc", at(2025, 6, 1));
    unknown.frequency = Frequency::from_label("hourly");
    let mut undated = monthly_rule(5.0, EntryKind::Expense, "Misc", at(2025, 6, 1));
    undated.next_due_date = None;

    let outcome =
        RecurrenceService::process_due_rules(&[unknown.clone(), good, undated.clone()], now);

    assert_eq!(outcome.count(), 1);
    assert_eq!(outcome.issues.len(), 2);
    assert_eq!(outcome.issues[0].rule_id, unknown.id);
    assert_eq!(
        outcome.issues[0].problem,
        RuleProblem::Invalid(ValidationError::UnknownFrequency("hourly".into()))
    );
    assert_eq!(
        outcome.issues[1].problem,
        RuleProblem::Invalid(ValidationError::MissingDueDate)
    );
}

#[test]
fn month_end_rules_clamp_and_keep_the_clamped_day() {
    let now = at(2025, 3, 31);
    let rule = monthly_rule(1.0, EntryKind::Expense, "Rent", at(2025, 1, 31));

    let outcome = RecurrenceService::process_due_rules(&[rule], now);

    let dates: Vec<_> = outcome.materialized.iter().map(|t| t.day()).collect();
    assert_eq!(dates, vec![day(2025, 1, 31), day(2025, 2, 28), day(2025, 3, 28)]);
    assert_eq!(
        outcome.updated_rules[0].next_due_date.map(|d| d.date_naive()),
        Some(day(2025, 4, 28))
    );
}

#[test]
fn materialized_ids_are_stable_across_reruns() {
    let now = at(2025, 6, 15);
    let rule = monthly_rule(10.0, EntryKind::Expense, "Gym", at(2025, 5, 1));

    let first = RecurrenceService::process_due_rules(&[rule.clone()], now);
    let second = RecurrenceService::process_due_rules(&[rule], now);

    let first_ids: Vec<Uuid> = first.materialized.iter().map(|t| t.id).collect();
    let second_ids: Vec<Uuid> = second.materialized.iter().map(|t| t.id).collect();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn catch_up_is_bounded_per_rule() {
    let now = at(2025, 6, 15);
    let mut rule = monthly_rule(1.0, EntryKind::Expense, "Coffee", now - Duration::days(5000));
    rule.frequency = Frequency::Daily;

    let outcome = RecurrenceService::process_due_rules(&[rule], now);

    assert_eq!(outcome.count(), MAX_CATCH_UP_OCCURRENCES);
    assert_eq!(
        outcome.issues[0].problem,
        RuleProblem::CatchUpLimit {
            materialized: MAX_CATCH_UP_OCCURRENCES
        }
    );
    let next = outcome.updated_rules[0].next_due_date.unwrap();
    assert!(next <= now);

    let resumed = RecurrenceService::process_due_rules(&outcome.updated_rules, now);
    assert!(resumed.issues.is_empty());
    assert_eq!(outcome.count() + resumed.count(), 5001);
}

#[test]
fn rule_at_the_end_of_the_calendar_is_reported() {
    let last = NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let mut rule = monthly_rule(1.0, EntryKind::Expense, "Forever", last);
    rule.frequency = Frequency::Daily;

    let outcome = RecurrenceService::process_due_rules(&[rule.clone()], last);

    assert_eq!(outcome.count(), 1);
    assert_eq!(outcome.materialized[0].date, last);
    assert_eq!(
        outcome.issues,
        vec![RuleIssue {
            rule_id: rule.id,
            problem: RuleProblem::EndOfCalendar { materialized: 1 },
        }]
    );
    assert_eq!(outcome.updated_rules[0].next_due_date, None);
    assert_eq!(outcome.updated_rules[0].last_processed, Some(last));
    assert!(outcome.issues[0].to_string().contains("out of range"));

    let upcoming = RecurrenceService::peek_upcoming(&[rule], last, 30);
    assert_eq!(upcoming.len(), 1);
}

#[test]
fn peek_upcoming_lists_occurrences_within_horizon() {
    let now = at(2025, 6, 15);
    let mut weekly = monthly_rule(20.0, EntryKind::Expense, "Groceries", at(2025, 6, 16));
    weekly.frequency = Frequency::Weekly;
    let monthly = monthly_rule(900.0, EntryKind::Expense, "Rent", at(2025, 7, 1));

    let upcoming = RecurrenceService::peek_upcoming(&[monthly, weekly], now, 16);

    let dates: Vec<_> = upcoming.iter().map(|o| o.due.date_naive()).collect();
    assert_eq!(
        dates,
        vec![day(2025, 6, 16), day(2025, 6, 23), day(2025, 6, 30), day(2025, 7, 1)]
    );
    assert_eq!(upcoming[3].category, "Rent");
}

#[test]
fn summarize_empty_is_zero() {
    let empty: Vec<Transaction> = Vec::new();
    assert_eq!(SummaryService::summarize(&empty), Summary::default());
}

#[test]
fn summarize_splits_by_kind() {
    let now = at(2025, 6, 15);
    let txns = vec![
        txn(1000.0, EntryKind::Income, "Salary", now),
        txn(250.0, EntryKind::Expense, "Food", now),
        txn(50.0, EntryKind::Expense, "Food", now),
    ];
    let summary = SummaryService::summarize(&txns);
    assert_eq!(summary, Summary::new(1000.0, 300.0));
    assert_eq!(summary.balance, 700.0);
}

#[test]
fn health_score_follows_the_formula() {
    assert_eq!(SummaryService::health_score(&Summary::new(0.0, 0.0)), 50);
    assert_eq!(SummaryService::health_score(&Summary::new(0.0, 100.0)), 0);
    assert_eq!(SummaryService::health_score(&Summary::new(100.0, 0.0)), 100);
    assert_eq!(SummaryService::health_score(&Summary::new(100.0, 70.0)), 90);
    assert_eq!(SummaryService::health_score(&Summary::new(100.0, 90.0)), 70);
    assert_eq!(SummaryService::health_score(&Summary::new(100.0, 100.0)), 50);
    assert_eq!(SummaryService::health_score(&Summary::new(100.0, 150.0)), 50);
}

#[test]
fn health_report_labels_and_savings_rate() {
    let report = SummaryService::health_report(&Summary::new(100.0, 150.0));
    assert_eq!(report.savings_rate_pct, 0.0);
    assert_eq!(report.status, HealthStatus::Fair);

    let report = SummaryService::health_report(&Summary::new(0.0, 10.0));
    assert_eq!(report.status, HealthStatus::Critical);

    let report = SummaryService::health_report(&Summary::new(200.0, 50.0));
    assert_eq!(report.savings_rate_pct, 75.0);
    assert_eq!(report.status, HealthStatus::Excellent);
    assert_eq!(SummaryService::savings_rate_pct(&Summary::new(0.0, 0.0)), 0.0);
}

#[test]
fn trend_edge_policy() {
    assert_eq!(TrendService::trend_pct(500.0, 0.0), 100.0);
    assert_eq!(TrendService::trend_pct(0.0, 0.0), 0.0);
    assert_eq!(TrendService::trend_pct(300.0, 200.0), 50.0);
    assert_eq!(TrendService::trend_pct(100.0, 200.0), -50.0);
}

#[test]
fn month_over_month_uses_previous_calendar_month() {
    let now = at(2025, 3, 31);
    let txns = vec![
        txn(500.0, EntryKind::Income, "Salary", at(2025, 3, 2)),
        txn(200.0, EntryKind::Expense, "Food", at(2025, 2, 10)),
        txn(300.0, EntryKind::Expense, "Food", at(2025, 3, 10)),
        txn(999.0, EntryKind::Income, "Bonus", at(2025, 1, 31)),
    ];

    let trend = TrendService::month_over_month(&txns, now);

    assert_eq!(trend.income_trend_pct, 100.0);
    assert_eq!(trend.expense_trend_pct, 50.0);
}

#[test]
fn daily_series_is_zero_filled_and_ends_today() {
    let now = at(2025, 6, 15);
    let txns = vec![
        txn(10.0, EntryKind::Expense, "Food", at(2025, 6, 15)),
        txn(40.0, EntryKind::Income, "Gift", at(2025, 5, 17)),
        txn(99.0, EntryKind::Income, "Old", at(2025, 5, 16)),
    ];

    let series = TrendService::daily_series(&txns, now, 30);

    assert_eq!(series.len(), 30);
    assert_eq!(series[0].date, day(2025, 5, 17));
    assert_eq!(series[0].income, 40.0);
    assert_eq!(series[29].date, day(2025, 6, 15));
    assert_eq!(series[29].expense, 10.0);
    assert!(series.windows(2).all(|pair| pair[0].date < pair[1].date));
    assert_eq!(series.iter().map(|p| p.income).sum::<f64>(), 40.0);

    assert_eq!(TrendService::daily_series(&[], now, 30).len(), 30);
    assert!(TrendService::daily_series(&txns, now, 0).is_empty());
}

#[test]
fn daily_series_caps_oversized_windows() {
    let now = at(2025, 6, 15);

    let capped = TrendService::daily_series(&[], now, 100_000_000);
    assert_eq!(capped.len(), MAX_SERIES_WINDOW_DAYS as usize);
    assert_eq!(capped.last().map(|point| point.date), Some(day(2025, 6, 15)));

    let near_min = NaiveDate::MIN.and_hms_opt(12, 0, 0).unwrap().and_utc();
    assert!(TrendService::daily_series(&[], near_min, 30).is_empty());
    assert_eq!(TrendService::daily_series(&[], near_min, 1).len(), 1);
}

#[test]
fn top_categories_sorts_descending_with_stable_ties() {
    let now = at(2025, 6, 15);
    let txns = vec![
        txn(30.0, EntryKind::Expense, "Transport", now),
        txn(50.0, EntryKind::Expense, "Food", now),
        txn(20.0, EntryKind::Expense, "Fun", now),
        txn(10.0, EntryKind::Expense, "Fun", now),
        txn(500.0, EntryKind::Income, "Salary", now),
    ];

    let top = TrendService::top_categories(&txns, EntryKind::Expense, 5);
    let names: Vec<_> = top.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, vec!["Food", "Transport", "Fun"]);
    assert_eq!(top[2].total, 30.0);

    let top_two = TrendService::top_categories(&txns, EntryKind::Expense, 2);
    assert_eq!(top_two.len(), 2);
    assert!(TrendService::top_categories(&txns, EntryKind::Expense, 0).is_empty());
}

#[test]
fn budgets_only_count_this_months_exact_category_expenses() {
    let now = at(2025, 6, 15);
    let budgets = vec![Budget::new(USER, "Food", 400.0), Budget::new(USER, "Fun", 50.0)];
    let txns = vec![
        txn(100.0, EntryKind::Expense, "Food", at(2025, 6, 1)),
        txn(25.0, EntryKind::Expense, "Food", at(2025, 6, 30)),
        txn(80.0, EntryKind::Expense, "Food", at(2025, 5, 31)),
        txn(70.0, EntryKind::Expense, "food", at(2025, 6, 2)),
        txn(60.0, EntryKind::Income, "Food", at(2025, 6, 2)),
        txn(75.0, EntryKind::Expense, "Fun", at(2025, 6, 3)),
    ];

    let with_spent = BudgetService::with_spent(&budgets, &txns, now);

    assert_eq!(with_spent[0].spent, 125.0);
    assert_eq!(with_spent[1].spent, 75.0);
    let fun = BudgetService::usage(&with_spent[1]);
    assert!(fun.over_limit);
    assert_eq!(fun.percent_used, 150.0);
}

#[test]
fn budget_overview_computes_safe_daily_spend() {
    let now = at(2025, 6, 10);
    let mut food = Budget::new(USER, "Food", 400.0);
    food.spent = 200.0;
    let mut fun = Budget::new(USER, "Fun", 100.0);
    fun.spent = 100.0;

    let overview = BudgetService::overview(&[food, fun], now);

    assert_eq!(overview.total_budgeted, 500.0);
    assert_eq!(overview.total_spent, 300.0);
    assert_eq!(overview.total_remaining, 200.0);
    assert_eq!(overview.progress_pct, 60.0);
    assert_eq!(overview.days_remaining, 20);
    assert_eq!(overview.safe_daily_spend, 10.0);

    let last_day = BudgetService::overview(&[], at(2025, 6, 30));
    assert_eq!(last_day.days_remaining, 0);
    assert_eq!(last_day.safe_daily_spend, 0.0);
    assert_eq!(last_day.progress_pct, 0.0);
}

#[test]
fn contributing_reports_completion_crossing() {
    let goal = SavingsGoal::new(USER, "Laptop", 1000.0, at(2025, 12, 1), "#3b82f6");

    let first = GoalService::contribute(&goal, 600.0).unwrap();
    assert_eq!(first.previous_amount, 0.0);
    assert!(!first.completed_now);

    let second = GoalService::contribute(&first.goal, 400.0).unwrap();
    assert!(second.completed_now);
    assert!(second.goal.is_complete());

    let third = GoalService::contribute(&second.goal, 1.0).unwrap();
    assert!(!third.completed_now);

    let err = GoalService::add_manual_funds(&goal, -5.0).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn goal_progress_caps_percent_and_rounds_days_up() {
    let now = at(2025, 6, 15);
    let mut goal = SavingsGoal::new(USER, "Trip", 500.0, now + Duration::hours(36), "#10b981");
    goal.current_amount = 750.0;

    let progress = GoalService::progress(&goal, now);
    assert_eq!(progress.percent, 100.0);
    assert_eq!(progress.remaining, 0.0);
    assert_eq!(progress.days_left, 2);
    assert!(progress.complete);

    goal.deadline = now - Duration::days(3);
    assert_eq!(GoalService::progress(&goal, now).days_left, 0);
}

#[test]
fn calculators_match_closed_forms() {
    let flat = CalculatorService::compound(1000.0, 0.0, 100.0, 1).unwrap();
    assert_eq!(flat.months, 12);
    assert_eq!(flat.final_balance, 2200.0);
    assert_eq!(flat.interest_earned, 0.0);

    let grown = CalculatorService::compound(1000.0, 12.0, 0.0, 1).unwrap();
    assert!((grown.final_balance - 1126.825).abs() < 0.001);

    let loan = CalculatorService::loan(12_000.0, 12.0, 12).unwrap();
    assert!((loan.monthly_payment - 1066.19).abs() < 0.01);
    assert!((loan.total_interest - (loan.total_payment - 12_000.0)).abs() < 1e-9);

    let interest_free = CalculatorService::loan(1200.0, 0.0, 12).unwrap();
    assert_eq!(interest_free.monthly_payment, 100.0);
    assert!(CalculatorService::loan(1200.0, 5.0, 0).is_err());
}

#[test]
fn history_filters_groups_and_calendar() {
    let txns = vec![
        txn(12.0, EntryKind::Expense, "Coffee", at(2025, 6, 1)),
        txn(900.0, EntryKind::Income, "Salary", at(2025, 6, 3)),
        txn(8.0, EntryKind::Expense, "Snacks", at(2025, 6, 1)),
    ];

    let expenses = TransactionService::filter(
        &txns,
        &TransactionFilter {
            kind: Some(EntryKind::Expense),
            search: None,
        },
    );
    assert_eq!(expenses.len(), 2);

    let search = TransactionService::filter(
        &txns,
        &TransactionFilter {
            kind: None,
            search: Some("SAL".into()),
        },
    );
    assert_eq!(search.len(), 1);
    assert_eq!(search[0].category, "Salary");

    let groups = TransactionService::group_by_day(&txns);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].date, day(2025, 6, 3));
    assert_eq!(groups[1].transactions[0].category, "Coffee");
    assert_eq!(groups[1].transactions[1].category, "Snacks");

    let calendar = TransactionService::month_calendar(&txns, 2025, 6).unwrap();
    assert_eq!(calendar.len(), 30);
    assert_eq!(calendar[0].expense, 20.0);
    assert!(calendar[2].has_activity);
    assert!(!calendar[1].has_activity);
    assert!(TransactionService::month_calendar(&txns, 2025, 13).is_err());
}

#[test]
fn store_rejects_duplicates_and_missing_records() {
    let store = MemoryLedgerStore::new();
    let entry = txn(10.0, EntryKind::Expense, "Food", at(2025, 6, 1));

    store.create_transaction(&entry).unwrap();
    let err = store.create_transaction(&entry).unwrap_err();
    assert!(matches!(err, CoreError::Duplicate { collection: "transactions", .. }));

    let goal = SavingsGoal::new(USER, "Ghost", 10.0, at(2025, 12, 1), "#fff");
    let err = store.update_savings_goal(&goal).unwrap_err();
    assert!(matches!(err, CoreError::GoalNotFound(id) if id == goal.id));

    let err = store.delete_transaction(USER, Uuid::new_v4()).unwrap_err();
    assert!(err.is_not_found());

    let removed = store.delete_transaction(USER, entry.id).unwrap();
    assert_eq!(removed.id, entry.id);
    assert!(store.list_transactions(USER).unwrap().is_empty());
    assert!(store.list_transactions("someone-else").unwrap().is_empty());
}

#[test]
fn loading_screens_out_invalid_and_foreign_records() {
    let mut ledger = Ledger::new(USER);
    ledger.transactions.push(txn(10.0, EntryKind::Expense, "Food", at(2025, 6, 1)));
    ledger.transactions.push(txn(-3.0, EntryKind::Expense, "Food", at(2025, 6, 1)));
    ledger.budgets.push(Budget::new("intruder", "Food", 10.0));

    let store = MemoryLedgerStore::with_ledger(ledger);
    let report = store.load(USER).unwrap();

    assert_eq!(report.ledger.transactions.len(), 1);
    assert!(report.ledger.budgets.is_empty());
    assert_eq!(report.rejected.len(), 2);
    assert_eq!(report.rejected[0].collection, "transactions");
    assert_eq!(report.rejected[0].position, 1);
    assert!(matches!(
        report.rejected[1].error,
        ValidationError::ForeignRecord { .. }
    ));
}

#[test]
fn recording_creates_category_and_funds_goal() {
    let store = MemoryLedgerStore::new();
    let goal = SavingsGoal::new(USER, "Bike", 300.0, at(2025, 12, 1), "#8b5cf6");
    store.create_savings_goal(&goal).unwrap();
    store
        .create_category(&Category::new(USER, "Food", EntryKind::Expense, "#ef4444"))
        .unwrap();

    let known = txn(5.0, EntryKind::Expense, "FOOD", at(2025, 6, 1));
    let outcome = LedgerService::record_transaction(&store, known).unwrap();
    assert!(outcome.created_category.is_none());

    let saving = txn(300.0, EntryKind::Expense, "Savings", at(2025, 6, 2)).with_goal(goal.id);
    let outcome = LedgerService::record_transaction(&store, saving).unwrap();
    let created = outcome.created_category.expect("category created");
    assert_eq!(created.name, "Savings");
    let funding = outcome.funding.expect("goal funded");
    assert!(funding.completed_now);
    assert_eq!(store.list_savings_goals(USER).unwrap()[0].current_amount, 300.0);
    assert_eq!(store.list_categories(USER).unwrap().len(), 2);
}

#[test]
fn recording_with_unknown_goal_keeps_transaction() {
    let store = MemoryLedgerStore::new();
    let missing = Uuid::new_v4();
    let entry = txn(20.0, EntryKind::Expense, "Savings", at(2025, 6, 2)).with_goal(missing);

    let outcome = LedgerService::record_transaction(&store, entry).unwrap();

    assert!(outcome.funding.is_none());
    assert!(matches!(outcome.funding_error, Some(CoreError::GoalNotFound(id)) if id == missing));
    assert_eq!(store.list_transactions(USER).unwrap().len(), 1);
}

#[test]
fn rejected_transaction_leaves_no_new_category() {
    let store = MemoryLedgerStore::new();
    let entry = txn(12.0, EntryKind::Expense, "Groceries", at(2025, 6, 3));
    store.create_transaction(&entry).unwrap();

    let mut again = entry.clone();
    again.category = "Brand new".into();
    let err = LedgerService::record_transaction(&store, again).unwrap_err();

    assert!(matches!(
        err,
        CoreError::Duplicate { collection: "transactions", id } if id == entry.id
    ));
    assert!(store.list_categories(USER).unwrap().is_empty());
    assert_eq!(store.list_transactions(USER).unwrap().len(), 1);
}

#[test]
fn editing_a_goal_linked_transaction_keeps_goal_total() {
    let store = MemoryLedgerStore::new();
    let goal = SavingsGoal::new(USER, "Trip", 500.0, at(2025, 12, 1), "#0ea5e9");
    store.create_savings_goal(&goal).unwrap();
    let entry = txn(100.0, EntryKind::Expense, "Savings", at(2025, 6, 2)).with_goal(goal.id);
    LedgerService::record_transaction(&store, entry.clone()).unwrap();

    let mut edited = entry.clone();
    edited.amount = 150.0;
    edited.title = "Trip fund".into();
    store.update_transaction(&edited).unwrap();

    let stored = store.list_transactions(USER).unwrap();
    assert_eq!(stored[0].amount, 150.0);
    assert_eq!(stored[0].title, "Trip fund");
    assert_eq!(store.list_savings_goals(USER).unwrap()[0].current_amount, 100.0);

    let ledger = store.load(USER).unwrap().ledger;
    let drift = GoalService::reconcile(&ledger);
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].goal_id, goal.id);
    assert_eq!(drift[0].recorded, 100.0);
    assert_eq!(drift[0].expected, 150.0);

    let report =
        LedgerService::refresh(&store, USER, at(2025, 6, 3), GoalFundingPolicy::Incremental)
            .unwrap();
    assert!(report.warnings.iter().any(|w| w.contains("Trip")));
}

#[test]
fn updating_and_deleting_unknown_records_is_not_found() {
    let store = MemoryLedgerStore::new();
    let ghost = txn(1.0, EntryKind::Expense, "Food", at(2025, 6, 1));
    let err = store.update_transaction(&ghost).unwrap_err();
    assert!(matches!(err, CoreError::TransactionNotFound(id) if id == ghost.id));

    let mut invalid = ghost.clone();
    invalid.amount = 0.0;
    assert!(matches!(
        store.update_transaction(&invalid).unwrap_err(),
        CoreError::Validation(_)
    ));

    let category = Category::new(USER, "Food", EntryKind::Expense, "#ef4444");
    store.create_category(&category).unwrap();
    let removed = store.delete_category(USER, category.id).unwrap();
    assert_eq!(removed.name, "Food");
    let err = store.delete_category(USER, category.id).unwrap_err();
    assert!(matches!(err, CoreError::CategoryNotFound(id) if id == category.id));
}

#[test]
fn add_funds_tracks_manual_contributions() {
    let store = MemoryLedgerStore::new();
    let goal = SavingsGoal::new(USER, "Fund", 100.0, at(2025, 12, 1), "#14b8a6");
    store.create_savings_goal(&goal).unwrap();

    let outcome = LedgerService::add_funds(&store, USER, goal.id, 40.0).unwrap();
    assert_eq!(outcome.goal.current_amount, 40.0);
    assert_eq!(outcome.goal.manual_funds, 40.0);

    let err = LedgerService::add_funds(&store, USER, Uuid::new_v4(), 1.0).unwrap_err();
    assert!(err.is_not_found());
    let err = LedgerService::add_funds(&store, USER, goal.id, f64::INFINITY).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn refresh_persists_materialized_entries_once() {
    let store = MemoryLedgerStore::new();
    let now = at(2025, 6, 15);
    let rule = monthly_rule(5_000_000.0, EntryKind::Income, "Salary", at(2025, 4, 16));
    store.create_recurring_rule(&rule).unwrap();

    let report =
        LedgerService::refresh(&store, USER, now, GoalFundingPolicy::Incremental).unwrap();
    assert_eq!(report.materialized, 2);
    assert_eq!(report.ledger.transactions.len(), 2);
    assert_eq!(
        report.ledger.recurring_rules[0].next_due_date,
        Some(at(2025, 6, 16))
    );

    let again =
        LedgerService::refresh(&store, USER, now, GoalFundingPolicy::Incremental).unwrap();
    assert_eq!(again.materialized, 0);
    assert_eq!(again.ledger.transactions.len(), 2);
}

#[test]
fn refresh_skips_occurrences_that_were_already_stored() {
    let now = at(2025, 6, 15);
    let rule = monthly_rule(10.0, EntryKind::Expense, "Gym", at(2025, 6, 1));
    let mut ledger = Ledger::new(USER);
    ledger
        .transactions
        .push(RecurrenceService::materialize(&rule, at(2025, 6, 1)));
    ledger.recurring_rules.push(rule);
    let store = MemoryLedgerStore::with_ledger(ledger);

    let report =
        LedgerService::refresh(&store, USER, now, GoalFundingPolicy::Incremental).unwrap();

    assert_eq!(report.duplicates_skipped, 1);
    assert_eq!(report.ledger.transactions.len(), 1);
    assert!(report.ledger.recurring_rules[0].next_due_date > Some(now));
}

#[test]
fn goal_policy_controls_drift_handling() {
    let now = at(2025, 6, 15);
    let mut goal = SavingsGoal::new(USER, "Car", 5000.0, at(2026, 1, 1), "#f59e0b");
    goal.current_amount = 900.0;
    goal.manual_funds = 100.0;
    let mut ledger = Ledger::new(USER);
    ledger
        .transactions
        .push(txn(300.0, EntryKind::Expense, "Savings", at(2025, 6, 1)).with_goal(goal.id));
    ledger.savings_goals.push(goal);

    let incremental = MemoryLedgerStore::with_ledger(ledger.clone());
    let report =
        LedgerService::refresh(&incremental, USER, now, GoalFundingPolicy::Incremental).unwrap();
    assert_eq!(report.ledger.savings_goals[0].current_amount, 900.0);
    assert!(report.warnings.iter().any(|w| w.contains("Car")));

    let recompute = MemoryLedgerStore::with_ledger(ledger);
    let report =
        LedgerService::refresh(&recompute, USER, now, GoalFundingPolicy::RecomputeOnLoad).unwrap();
    assert_eq!(report.recomputed_goals, 1);
    assert_eq!(report.ledger.savings_goals[0].current_amount, 400.0);
    assert!(report.warnings.is_empty());
}

#[test]
fn dashboard_composes_all_views() {
    let now = at(2025, 6, 15);
    let mut ledger = Ledger::new(USER);
    ledger.transactions = vec![
        txn(3000.0, EntryKind::Income, "Salary", at(2025, 6, 1)),
        txn(600.0, EntryKind::Expense, "Food", at(2025, 6, 5)),
        txn(2000.0, EntryKind::Income, "Salary", at(2025, 5, 1)),
    ];
    ledger.budgets.push(Budget::new(USER, "Food", 500.0));
    ledger
        .savings_goals
        .push(SavingsGoal::new(USER, "Trip", 1000.0, at(2025, 7, 15), "#ec4899"));

    let dashboard = DashboardService::build(
        &ledger,
        now,
        DashboardOptions {
            daily_window_days: 7,
            top_categories: 1,
        },
    );

    assert_eq!(dashboard.summary, Summary::new(5000.0, 600.0));
    assert_eq!(dashboard.health.score, 100);
    assert_eq!(dashboard.trend.income_trend_pct, 50.0);
    assert_eq!(dashboard.daily.len(), 7);
    assert_eq!(dashboard.top_income.len(), 1);
    assert_eq!(dashboard.top_expense[0].category, "Food");
    assert!(dashboard.budgets[0].over_limit);
    assert_eq!(dashboard.budget_overview.total_spent, 600.0);
    assert_eq!(dashboard.goals[0].days_left, 30);
}

#[test]
fn public_api_matches_service_layer() {
    use crate::public_api::{
        api_budgets_with_spent, api_fund_goal, api_process_due_rules, api_summarize,
        api_top_categories,
    };

    let now = at(2025, 6, 15);
    let transactions = vec![
        txn(1200.0, EntryKind::Income, "Salary", at(2025, 6, 1)),
        txn(80.0, EntryKind::Expense, "Food", at(2025, 6, 3)),
        txn(20.0, EntryKind::Expense, "Food", at(2025, 5, 3)),
    ];

    assert_eq!(api_summarize(&transactions), Summary::new(1200.0, 100.0));
    assert_eq!(api_top_categories(&transactions, EntryKind::Expense, 3)[0].total, 100.0);

    let budgets = api_budgets_with_spent(&[Budget::new(USER, "Food", 50.0)], &transactions, now);
    assert_eq!(budgets[0].spent, 80.0);

    let rule = monthly_rule(9.0, EntryKind::Expense, "Music", at(2025, 5, 15));
    assert_eq!(api_process_due_rules(&[rule], now).count(), 2);

    let goal = SavingsGoal::new(USER, "Bike", 100.0, at(2025, 9, 1), "#10b981");
    let funded = api_fund_goal(&goal, 100.0).unwrap();
    assert!(funded.completed_now);
    assert!(api_fund_goal(&goal, 0.0).is_err());
}
