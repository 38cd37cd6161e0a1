use fintrack_core::{CategoryService, LedgerStore};
use fintrack_domain::Category;

use crate::cli::core::{CommandResult, RefreshNotice};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

use super::{invalid, parse_kind, resolve_id, split_subcommand, usage_error, ParsedArgs};

const USAGE: &str = "category list
category add <name> <income|expense> [--color #RRGGBB] [--icon name]
category remove <name|id> [income|expense]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "List, add or remove categories",
        USAGE,
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "list" | "ls" => category_list(context),
        "add" => category_add(context, rest),
        "remove" | "rm" => category_remove(context, rest),
        other => Err(invalid(format!("unknown category action `{other}`"))),
    }
}

fn category_list(context: &mut ShellContext) -> CommandResult {
    let mut categories = context.ledger()?.categories.clone();
    categories.sort_by(|a, b| {
        a.kind
            .as_str()
            .cmp(b.kind.as_str())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    output::section("Categories");
    if categories.is_empty() {
        output::info("  (none)");
    }
    for category in &categories {
        let icon = category.icon.as_deref().unwrap_or("-");
        output::info(format!(
            "  {:<8} {:<20} {} {icon}",
            category.kind, category.name, category.color
        ));
    }
    Ok(())
}

fn category_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["color", "icon"])?;
    let [name, kind] = parsed.positional.as_slice() else {
        return Err(usage_error("category add <name> <income|expense>"));
    };
    let kind = parse_kind(kind)?;

    if CategoryService::find(&context.ledger()?.categories, name, kind).is_some() {
        return Err(invalid(format!("{kind} category `{name}` already exists")));
    }
    let color = parsed
        .option("color")
        .unwrap_or_else(|| CategoryService::palette_color(name));
    let mut category = Category::new(context.active_user()?, name.trim(), kind, color);
    category.icon = parsed.option("icon").map(str::to_string);

    context.store.create_category(&category)?;
    context.refresh(RefreshNotice::Quiet)?;
    output::success(format!(
        "Added {} category `{}`.",
        kind.as_str(),
        category.name
    ));
    Ok(())
}

fn category_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (target, kind) = match args {
        [target] => (*target, None),
        [target, kind] => (*target, Some(parse_kind(kind)?)),
        _ => return Err(usage_error("category remove <name|id> [income|expense]")),
    };
    let user = context.active_user()?.to_string();
    let categories = &context.ledger()?.categories;
    let by_name: Vec<&Category> = categories
        .iter()
        .filter(|category| category.name.eq_ignore_ascii_case(target.trim()))
        .filter(|category| kind.map_or(true, |kind| category.kind == kind))
        .collect();
    let id = match by_name.as_slice() {
        [category] => category.id,
        [] => resolve_id(target, categories.iter().map(|category| category.id), "category")?,
        _ => {
            return Err(invalid(format!(
                "`{target}` names several categories, add income or expense"
            )))
        }
    };
    if !context.confirm(&format!("Remove category `{target}`?"))? {
        return Ok(());
    }
    let removed = context.store.delete_category(&user, id)?;
    context.refresh(RefreshNotice::Quiet)?;
    output::success(format!(
        "Removed {} category `{}`.",
        removed.kind.as_str(),
        removed.name
    ));
    output::hint("Transactions keep their category name.");
    Ok(())
}
