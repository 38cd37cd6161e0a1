use fintrack_core::CalculatorService;

use crate::cli::core::CommandResult;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

use super::{invalid, parse_amount, parse_number, split_subcommand, usage_error};

const USAGE: &str = "calc compound <principal> <annual rate %> <monthly contribution> <years>
calc loan <principal> <annual rate %> <months>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "calc",
        "Compound growth and loan payment calculators",
        USAGE,
        cmd_calc,
    )
    .standalone()]
}

fn cmd_calc(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "compound" => calc_compound(context, rest),
        "loan" => calc_loan(context, rest),
        other => Err(invalid(format!("unknown calculator `{other}`"))),
    }
}

fn calc_compound(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [principal, rate, monthly, years] = args else {
        return Err(usage_error(USAGE));
    };
    let projection = CalculatorService::compound(
        parse_amount("principal", principal)?,
        parse_amount("rate", rate)?,
        parse_amount("monthly contribution", monthly)?,
        parse_number("years", years)?,
    )?;

    let fmt = &context.formatters;
    output::section(format!("Compound growth over {} months", projection.months));
    output::field("Final balance", fmt.money(projection.final_balance));
    output::field("Contributed", fmt.money(projection.total_contributed));
    output::field("Interest earned", fmt.money(projection.interest_earned));
    Ok(())
}

fn calc_loan(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [principal, rate, months] = args else {
        return Err(usage_error("calc loan <principal> <annual rate %> <months>"));
    };
    let quote = CalculatorService::loan(
        parse_amount("principal", principal)?,
        parse_amount("rate", rate)?,
        parse_number("months", months)?,
    )?;

    let fmt = &context.formatters;
    output::section("Loan");
    output::field("Monthly payment", fmt.money(quote.monthly_payment));
    output::field("Total payment", fmt.money(quote.total_payment));
    output::field("Total interest", fmt.money(quote.total_interest));
    Ok(())
}
