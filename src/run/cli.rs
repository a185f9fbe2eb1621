use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::format::{format_amount, format_change, progress_bar, truncate};
use crate::analytics::{self, BudgetStatus};
use crate::config::{parse_date, Config};
use crate::db::Database;
use crate::ledger::{self, Ledger};
use crate::models::{Category, CategoryFilter, Month, TransactionDraft, TransactionType};
use crate::store::{paginate, total_pages};

/// Flags that take a value; their values are never positional arguments.
const VALUE_FLAGS: &[&str] = &[
    "--category",
    "--date",
    "--notes",
    "--page",
    "--amount",
    "--description",
    "--type",
    "--month",
];

const TREND_MONTHS: u32 = 6;

pub(crate) fn as_cli(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let Some(command) = args.first() else {
        return cli_summary(config, db);
    };
    let rest = &args[1..];
    match command.as_str() {
        "summary" | "s" => cli_summary(config, db),
        "list" | "ls" => cli_list(rest, config, db),
        "add" => cli_add(rest, config, db),
        "edit" => cli_edit(rest, config, db),
        "delete" | "rm" => cli_delete(rest, config, db),
        "budgets" | "b" => cli_budgets(config, db),
        "budget" => cli_set_budget(rest, config, db),
        "categories" => {
            cli_categories();
            Ok(())
        }
        "export" => cli_export(rest, config, db),
        "import" => cli_import(rest, config, db),
        "sample" => cli_sample(config, db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("ledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("ledger — local-only expense and budget tracker");
    println!();
    println!("Usage: ledger [--db <path>] [--as-of <YYYY-MM-DD>] [-v] [command]");
    println!();
    println!("Commands:");
    println!("  summary                       Totals and month-over-month changes (default)");
    println!("  list [search]                 List transactions, newest first");
    println!("    --category <name|all>       Only show one category");
    println!("    --month <YYYY-MM>           Only show one month");
    println!("    --page <n>                  Page to show (10 per page)");
    println!("  add <expense|income> <amount> <description>");
    println!("    --category <name>           Expense category (default: other)");
    println!("    --date <YYYY-MM-DD>         Date (default: today)");
    println!("    --notes <text>              Free-form notes");
    println!("  edit <id> [--amount] [--description] [--category] [--date] [--notes] [--type]");
    println!("  delete <id> [--yes]           Delete a transaction");
    println!("  budgets                       Budget usage for the current month");
    println!("  budget <category> <limit>     Set a monthly budget limit");
    println!("  categories                    List categories");
    println!("  export [path]                 Export everything to JSON");
    println!("  import <file.json>            Replace all data with an export");
    println!("  sample                        Add demo transactions to an empty ledger");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor the value of a flag.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s.trim().trim_start_matches('$').replace(',', "");
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount: {s}"))
}

fn parse_category(s: &str) -> Result<Category> {
    Category::parse(s).ok_or_else(|| {
        let keys: Vec<&str> = Category::all().iter().map(|c| c.key()).collect();
        anyhow::anyhow!("Unknown category '{s}'. Expected one of: {}", keys.join(", "))
    })
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

// ── Commands ─────────────────────────────────────────────────

fn cli_summary(config: &Config, db: &mut Database) -> Result<()> {
    let ledger = Ledger::load(db);
    let summary = ledger.summary(config.as_of);
    let usage = analytics::overall_usage(&ledger.budget_report(config.as_of));

    println!("Ledger — {}", summary.month);
    println!("{}", "─".repeat(48));
    println!("  Total Income:    {:>14}", format_amount(summary.all_time.income));
    println!("  Total Expenses:  {:>14}", format_amount(summary.all_time.expenses));
    println!("  Balance:         {:>14}", format_amount(summary.all_time.balance()));
    println!();
    println!("This month:");
    println!(
        "  Income:          {:>14}  {} vs last month",
        format_amount(summary.this_month.income),
        format_change(summary.income_change())
    );
    println!(
        "  Expenses:        {:>14}  {} vs last month",
        format_amount(summary.this_month.expenses),
        format_change(summary.expense_change())
    );
    println!(
        "  Net:             {:>14}  {} ({})",
        format_amount(summary.this_month.balance()),
        format_change(summary.net_change_percent()),
        format_amount(summary.net_change())
    );
    println!("  Budget used:     {:>13.1}%", usage.percent);

    let trend = analytics::monthly_trend(ledger.store().all(), config.as_of, TREND_MONTHS);
    println!();
    println!("{:<10} {:>14} {:>14}", "Month", "Income", "Expenses");
    for point in &trend {
        println!(
            "{:<10} {:>14} {:>14}",
            point.month.to_string(),
            format_amount(point.totals.income),
            format_amount(point.totals.expenses)
        );
    }
    Ok(())
}

fn cli_list(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let filter = match flag_value(args, "--category") {
        Some(c) => CategoryFilter::parse(c).ok_or_else(|| anyhow::anyhow!("Unknown category '{c}'"))?,
        None => CategoryFilter::All,
    };
    let page: usize = match flag_value(args, "--page") {
        Some(p) => p.parse().with_context(|| format!("Invalid page number: {p}"))?,
        None => 1,
    };
    let month = match flag_value(args, "--month") {
        Some(m) => Some(Month::parse(m).ok_or_else(|| anyhow::anyhow!("Invalid month '{m}', expected YYYY-MM"))?),
        None => None,
    };
    let search = positionals(args).join(" ");

    let ledger = Ledger::load(db);
    let mut results = ledger.store().query(&search, filter);
    if let Some(month) = month {
        results.retain(|t| t.in_month(month));
    }
    let rows = paginate(&results, config.page_size, page);

    if rows.is_empty() {
        println!("No transactions found");
        if !search.is_empty() || filter != CategoryFilter::All || month.is_some() {
            println!("Try adjusting your search or filter");
        } else if ledger.store().is_empty() {
            println!("Add one with `ledger add expense <amount> <description>`");
        }
        return Ok(());
    }

    println!(
        "{:<11} {:<36} {:<28} {:<15} {:>12}",
        "Date", "ID", "Description", "Category", "Amount"
    );
    println!("{}", "─".repeat(106));
    for txn in rows {
        println!(
            "{:<11} {:<36} {:<28} {:<15} {:>12}",
            txn.date.format("%Y-%m-%d").to_string(),
            txn.id,
            truncate(&txn.description, 28),
            txn.category.label(),
            format_amount(txn.signed_amount())
        );
    }
    println!();
    println!(
        "Page {page} of {} ({} transactions)",
        total_pages(results.len(), config.page_size),
        results.len()
    );
    Ok(())
}

fn cli_add(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let positional = positionals(args);
    let [kind, amount, description @ ..] = positional.as_slice() else {
        anyhow::bail!("Usage: ledger add <expense|income> <amount> <description> [--category <name>]");
    };
    let kind = TransactionType::parse(kind)
        .ok_or_else(|| anyhow::anyhow!("Type must be 'expense' or 'income', got '{kind}'"))?;
    let amount = parse_amount(amount)?;
    let category = match flag_value(args, "--category") {
        Some(c) => parse_category(c)?,
        None => kind.default_category(),
    };
    let date = match flag_value(args, "--date") {
        Some(d) => parse_date(d)?,
        None => config.as_of,
    };
    let draft = TransactionDraft::new(kind, amount, description.join(" "), category, date)
        .with_notes(flag_value(args, "--notes").unwrap_or_default());

    let mut ledger = Ledger::load(db);
    let id = ledger.add_transaction(draft)?;
    ledger.save(db, config.as_of)?;

    println!("Added {kind} {} ({id})", format_amount(amount));
    Ok(())
}

fn cli_edit(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let Some(id) = positionals(args).first().map(|s| s.to_string()) else {
        anyhow::bail!("Usage: ledger edit <id> [--amount <n>] [--description <text>] ...");
    };

    let mut ledger = Ledger::load(db);
    let Some(existing) = ledger.transaction(&id) else {
        println!("No transaction with id {id}");
        return Ok(());
    };

    let mut draft = TransactionDraft::from(existing);
    if let Some(kind) = flag_value(args, "--type") {
        draft.kind = TransactionType::parse(kind)
            .ok_or_else(|| anyhow::anyhow!("Type must be 'expense' or 'income', got '{kind}'"))?;
        if !draft.category.allows(draft.kind) {
            draft.category = draft.kind.default_category();
        }
    }
    if let Some(amount) = flag_value(args, "--amount") {
        draft.amount = parse_amount(amount)?;
    }
    if let Some(description) = flag_value(args, "--description") {
        draft.description = description.to_string();
    }
    if let Some(category) = flag_value(args, "--category") {
        draft.category = parse_category(category)?;
    }
    if let Some(date) = flag_value(args, "--date") {
        draft.date = parse_date(date)?;
    }
    if let Some(notes) = flag_value(args, "--notes") {
        draft.notes = notes.to_string();
    }

    if ledger.update_transaction(&id, draft)? {
        ledger.save(db, config.as_of)?;
        println!("Updated {id}");
    }
    Ok(())
}

fn cli_delete(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let Some(id) = positionals(args).first().map(|s| s.to_string()) else {
        anyhow::bail!("Usage: ledger delete <id> [--yes]");
    };

    let mut ledger = Ledger::load(db);
    let Some(txn) = ledger.transaction(&id) else {
        println!("No transaction with id {id}");
        return Ok(());
    };
    let prompt = format!(
        "Delete {} {} \"{}\"?",
        txn.date,
        format_amount(txn.signed_amount()),
        txn.description
    );
    if !has_flag(args, "--yes") && !confirm(&prompt)? {
        println!("Cancelled");
        return Ok(());
    }

    if ledger.delete_transaction(&id) {
        ledger.save(db, config.as_of)?;
        println!("Deleted {id}");
    }
    Ok(())
}

fn cli_budgets(config: &Config, db: &mut Database) -> Result<()> {
    let ledger = Ledger::load(db);
    let month = Month::of(config.as_of);
    let lines = ledger.budget_report(config.as_of);

    println!("Budgets — {month}");
    println!("{}", "─".repeat(72));
    for line in &lines {
        let status = match line.status {
            BudgetStatus::OverBudget => format!("{} ({} over)", line.status.label(), format_amount(-line.remaining())),
            BudgetStatus::NearLimit | BudgetStatus::OnTrack => line.status.label().to_string(),
        };
        println!(
            "  {:<15} {:>10} / {:<10} {} {:>6.1}%  {}",
            line.name,
            format_amount(line.spent),
            format_amount(line.limit),
            progress_bar(line.usage_percent(), 12),
            line.usage_percent(),
            status
        );
    }

    let usage = analytics::overall_usage(&lines);
    println!();
    println!(
        "  Total: {} of {} ({:.1}%)",
        format_amount(usage.total_spent),
        format_amount(usage.total_limit),
        usage.percent
    );

    let breakdown = analytics::category_breakdown(ledger.store().all(), month);
    if !breakdown.is_empty() {
        println!();
        println!("Spending by Category:");
        for (category, amount) in &breakdown {
            println!("  {:<24} {}", category.label(), format_amount(*amount));
        }
    }
    Ok(())
}

fn cli_set_budget(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let positional = positionals(args);
    let [category, limit] = positional.as_slice() else {
        anyhow::bail!("Usage: ledger budget <category> <limit>");
    };
    let category = parse_category(category)?;
    let limit = parse_amount(limit)?;

    let mut ledger = Ledger::load(db);
    if !ledger.set_budget_limit(category, limit)? {
        anyhow::bail!("There is no budget for {category}");
    }
    ledger.save(db, config.as_of)?;
    println!("{category} budget set to {}", format_amount(limit));
    Ok(())
}

fn cli_categories() {
    println!("{:<15} {:<16} Used for", "Key", "Name");
    println!("{}", "─".repeat(44));
    for category in Category::all() {
        let used_for = if category.allows(TransactionType::Income) {
            "income"
        } else {
            "expenses"
        };
        println!("{:<15} {:<16} {used_for}", category.key(), category.label());
    }
}

fn cli_export(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let path = export_path(positionals(args).first().copied(), today);

    let ledger = Ledger::load(db);
    let doc = ledger.export(Utc::now(), config.as_of);
    ledger::write_export(&doc, &path)?;
    println!(
        "Exported {} transactions to {}",
        doc.transactions.len(),
        path.display()
    );
    Ok(())
}

/// An explicit file path is used as-is; a directory (or nothing, meaning the
/// working directory) gets the dated default file name.
fn export_path(arg: Option<&str>, today: chrono::NaiveDate) -> PathBuf {
    let file_name = ledger::export_file_name(today);
    match arg.map(shellexpand) {
        Some(p) if Path::new(&p).is_dir() => Path::new(&p).join(file_name),
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(file_name),
    }
}

fn cli_import(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let Some(file_path) = positionals(args).first().map(|s| shellexpand(s)) else {
        anyhow::bail!("Usage: ledger import <file.json>");
    };
    let path = Path::new(&file_path);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    let doc = ledger::read_export(path)?;
    let count = doc.transactions.len();
    let mut ledger = Ledger::load(db);
    ledger
        .import(doc)
        .with_context(|| format!("{file_path} contains invalid data; nothing was imported"))?;
    ledger.save(db, config.as_of)?;
    println!("Imported {count} transactions");
    Ok(())
}

fn cli_sample(config: &Config, db: &mut Database) -> Result<()> {
    let mut ledger = Ledger::load(db);
    if !ledger.seed_sample_data(config.as_of)? {
        println!("Ledger already has transactions; sample data not added");
        return Ok(());
    }
    ledger.save(db, config.as_of)?;
    println!("Added {} sample transactions", ledger.store().len());
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn config() -> Config {
        Config {
            db_path: PathBuf::from(":memory:"),
            as_of: NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            page_size: 10,
            verbose: false,
        }
    }

    #[test]
    fn test_positionals_skip_flag_values() {
        let a = args(&["expense", "12.50", "--category", "food", "Lunch", "out", "--yes"]);
        assert_eq!(positionals(&a), vec!["expense", "12.50", "Lunch", "out"]);
        assert_eq!(flag_value(&a, "--category"), Some("food"));
        assert!(has_flag(&a, "--yes"));
        assert_eq!(flag_value(&a, "--date"), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,200.00").unwrap(), dec!(1200));
        assert_eq!(parse_amount("$65.30").unwrap(), dec!(65.30));
        assert!(parse_amount("lots").is_err());
    }

    #[test]
    fn test_export_path() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        assert_eq!(
            export_path(None, today),
            PathBuf::from("expense_tracker_export_2024-06-12.json")
        );
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_string_lossy().to_string();
        assert_eq!(
            export_path(Some(&dir_arg), today),
            dir.path().join("expense_tracker_export_2024-06-12.json")
        );
        assert_eq!(
            export_path(Some("backup.json"), today),
            PathBuf::from("backup.json")
        );
    }

    #[test]
    fn test_add_edit_delete_through_cli() {
        let mut db = Database::open_in_memory().unwrap();
        let config = config();

        as_cli(
            &args(&["add", "expense", "125.50", "Grocery", "Shopping", "--category", "food"]),
            &config,
            &mut db,
        )
        .unwrap();
        let ledger = Ledger::load(&db);
        let txn = ledger.store().all()[0].clone();
        assert_eq!(txn.description, "Grocery Shopping");
        assert_eq!(txn.category, Category::Food);
        assert_eq!(txn.date, config.as_of);

        as_cli(
            &args(&["edit", txn.id.as_str(), "--amount", "130", "--notes", "weekly"]),
            &config,
            &mut db,
        )
        .unwrap();
        let edited = Ledger::load(&db).transaction(&txn.id).unwrap().clone();
        assert_eq!(edited.amount, dec!(130));
        assert_eq!(edited.notes, "weekly");
        assert_eq!(edited.created_at, txn.created_at);

        as_cli(&args(&["delete", txn.id.as_str(), "--yes"]), &config, &mut db).unwrap();
        assert!(Ledger::load(&db).store().is_empty());
    }

    #[test]
    fn test_add_invalid_is_rejected() {
        let mut db = Database::open_in_memory().unwrap();
        let config = config();
        let result = as_cli(&args(&["add", "expense", "0", "Nothing"]), &config, &mut db);
        assert!(result.is_err());
        assert!(Ledger::load(&db).store().is_empty());
    }

    #[test]
    fn test_edit_unknown_id_is_not_an_error() {
        let mut db = Database::open_in_memory().unwrap();
        let config = config();
        as_cli(&args(&["edit", "missing", "--amount", "5"]), &config, &mut db).unwrap();
        as_cli(&args(&["delete", "missing", "--yes"]), &config, &mut db).unwrap();
    }

    #[test]
    fn test_set_budget_through_cli() {
        let mut db = Database::open_in_memory().unwrap();
        let config = config();
        as_cli(&args(&["budget", "health", "250"]), &config, &mut db).unwrap();
        let health = Ledger::load(&db)
            .budgets(config.as_of)
            .into_iter()
            .find(|b| b.category == Category::Health)
            .unwrap();
        assert_eq!(health.amount, dec!(250));
        assert!(as_cli(&args(&["budget", "other", "50"]), &config, &mut db).is_err());
    }

    #[test]
    fn test_unknown_command() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(as_cli(&args(&["frobnicate"]), &config(), &mut db).is_err());
    }
}
