// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use flat_ledger::{
    open_file_ledger, Account, AccountRepository, AuthGateway, Config, Currency, LedgerEngine,
    LedgerError, SpendAnalyzer, SpendBreakdown, StatementView, TransactionLog,
    TransactionOutcome, TransactionRecord,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::env;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Invalid configuration")?;
    let (accounts, log) = open_file_ledger(&config);
    let mut console = Console::new();

    let args: Vec<String> = env::args().collect();

    let result = if args.len() > 2 && args[1] == "report" {
        // Report mode
        run_report(&mut console, &accounts, &log, &config, &args[2])
    } else {
        // Interactive mode (default)
        run_menu(&mut console, &accounts, &log, &config)
    };

    match result {
        Err(err) if err.downcast_ref::<InputClosed>().is_some() => Ok(()),
        other => other,
    }
}

/// Logs go to stderr so they never mix with menu output
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

// ============================================================================
// CONSOLE
// ============================================================================

/// stdin reached end of input
#[derive(Debug, thiserror::Error)]
#[error("input closed")]
struct InputClosed;

/// Login failed; unknown account and wrong password are not told apart
#[derive(Debug, thiserror::Error)]
#[error("Invalid account number or password.")]
struct InvalidCredentials;

struct Console {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl Console {
    fn new() -> Self {
        Console {
            lines: io::stdin().lock().lines(),
        }
    }

    fn prompt(&mut self, label: &str) -> Result<String> {
        print!("{}", label);
        io::stdout().flush()?;

        match self.lines.next() {
            Some(line) => Ok(line?.trim().to_string()),
            None => Err(InputClosed.into()),
        }
    }
}

/// Positive decimal typed by the operator
fn parse_amount(text: &str) -> Option<Decimal> {
    let amount = Decimal::from_str(text.trim()).ok()?;
    if amount <= Decimal::ZERO {
        return None;
    }
    Some(amount)
}

/// Run one menu action; failures end the action, not the program
fn attempt(result: Result<()>) -> Result<()> {
    match result {
        Err(err) if err.downcast_ref::<InputClosed>().is_some() => Err(err),
        Err(err) => {
            let message = format!("{:#}", err);
            tracing::error!(error = %message, "operation failed");
            println!("Error: {}", message);
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

// ============================================================================
// MAIN MENU
// ============================================================================

fn run_menu(
    console: &mut Console,
    accounts: &AccountRepository,
    log: &TransactionLog,
    config: &Config,
) -> Result<()> {
    loop {
        println!("\nBanking System");
        println!("1. Create Account");
        println!("2. Login");
        println!("3. Currency Conversion");
        println!("4. Exit");

        let choice = console.prompt("Enter your choice: ")?;

        match choice.as_str() {
            "1" => attempt(create_account(console, accounts, log))?,
            "2" => attempt(login(console, accounts, log, config))?,
            "3" => attempt(currency_conversion(console))?,
            "4" => {
                println!("Thank you for using the Banking System. Goodbye!");
                return Ok(());
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn create_account(
    console: &mut Console,
    accounts: &AccountRepository,
    log: &TransactionLog,
) -> Result<()> {
    let account_number = console.prompt("Enter Account Number: ")?;
    let name = console.prompt("Enter Name: ")?;
    let password = console.prompt("Enter Password: ")?;
    let deposit = console.prompt("Enter Initial Deposit Amount: ")?;

    let opening_balance = match Decimal::from_str(deposit.trim()) {
        Ok(amount) => amount,
        Err(_) => {
            println!("Invalid amount.");
            return Ok(());
        }
    };

    let engine = LedgerEngine::new(accounts, log);
    match engine.open_account(&account_number, &name, &password, opening_balance) {
        Ok(_) => println!("Account created successfully!"),
        Err(err) => match err.downcast_ref::<LedgerError>() {
            Some(reason) => println!("Account not created: {}", reason),
            None => return Err(err),
        },
    }

    Ok(())
}

fn login(
    console: &mut Console,
    accounts: &AccountRepository,
    log: &TransactionLog,
    config: &Config,
) -> Result<()> {
    let account_number = console.prompt("Enter Account Number: ")?;
    let password = console.prompt("Enter Password: ")?;

    match AuthGateway::new(accounts).authenticate(&account_number, &password)? {
        Some(account) => {
            println!("Login successful! Your balance: {:.2}", account.balance);
            run_session(console, accounts, log, config, account)
        }
        None => {
            println!("Invalid account number or password.");
            Ok(())
        }
    }
}

// ============================================================================
// LOGGED-IN SESSION
// ============================================================================

fn run_session(
    console: &mut Console,
    accounts: &AccountRepository,
    log: &TransactionLog,
    config: &Config,
    mut account: Account,
) -> Result<()> {
    let engine = LedgerEngine::new(accounts, log);

    loop {
        println!("\n1. Deposit");
        println!("2. Withdraw");
        println!("3. Check Balance");
        println!("4. View Mini Statement");
        println!("5. Spend Analysis");
        println!("6. Logout");

        let choice = console.prompt("Enter your choice: ")?;

        match choice.as_str() {
            "1" => attempt(deposit(console, &engine, &mut account))?,
            "2" => attempt(withdraw(console, &engine, &mut account))?,
            "3" => attempt(check_balance(&engine, &mut account))?,
            "4" => attempt(mini_statement(log, &account, config.statement_limit))?,
            "5" => attempt(spend_analysis(log, &account))?,
            "6" => return Ok(()),
            _ => println!("Invalid choice."),
        }
    }
}

fn report_outcome(kind: &str, amount: Decimal, outcome: &TransactionOutcome, account: &mut Account) {
    match outcome {
        TransactionOutcome::Applied { balance } => {
            if let Some(balance) = balance {
                account.balance = *balance;
            }
            println!("{} of {} successful.", kind, amount);
        }
        TransactionOutcome::InsufficientFunds { .. } => println!("Insufficient balance."),
    }
}

fn deposit(console: &mut Console, engine: &LedgerEngine, account: &mut Account) -> Result<()> {
    let input = console.prompt("Enter deposit amount: ")?;
    let Some(amount) = parse_amount(&input) else {
        println!("Invalid amount.");
        return Ok(());
    };

    let outcome = engine.deposit(&account.account_number, amount)?;
    report_outcome("Deposit", amount, &outcome, account);
    Ok(())
}

fn withdraw(console: &mut Console, engine: &LedgerEngine, account: &mut Account) -> Result<()> {
    let input = console.prompt("Enter withdrawal amount: ")?;
    let Some(amount) = parse_amount(&input) else {
        println!("Invalid amount.");
        return Ok(());
    };
    let purpose = console.prompt("Enter purpose (Online Shopping, POS, ATM): ")?;

    let outcome = engine.withdraw(&account.account_number, amount, &purpose)?;
    report_outcome("Withdrawal", amount, &outcome, account);
    Ok(())
}

fn check_balance(engine: &LedgerEngine, account: &mut Account) -> Result<()> {
    if let Some(balance) = engine.balance(&account.account_number)? {
        account.balance = balance;
    }
    println!("Your current balance is: {:.2}", account.balance);
    Ok(())
}

fn mini_statement(log: &TransactionLog, account: &Account, limit: usize) -> Result<()> {
    let recent = StatementView::new(log).recent_transactions(&account.account_number, limit)?;

    if recent.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!("Last {} Transactions:", limit);
    for record in &recent {
        println!("{}", format_record(record));
    }
    Ok(())
}

fn format_record(record: &TransactionRecord) -> String {
    format!(
        "{}  {:<10} {:>12.2}  {}",
        record.date,
        record.kind,
        record.amount,
        record.purpose.as_deref().unwrap_or("-")
    )
}

fn spend_analysis(log: &TransactionLog, account: &Account) -> Result<()> {
    let breakdown = SpendAnalyzer::new(log).category_totals(&account.account_number)?;
    show_spend(&account.account_number, &breakdown);
    Ok(())
}

#[cfg(feature = "tui")]
fn show_spend(account_number: &str, breakdown: &SpendBreakdown) {
    let chart = ui::SpendChart::new(account_number, breakdown);
    if let Err(err) = ui::run_chart(&chart) {
        tracing::warn!(error = %err, "chart unavailable, printing totals");
        print_spend(breakdown);
    }
}

#[cfg(not(feature = "tui"))]
fn show_spend(_account_number: &str, breakdown: &SpendBreakdown) {
    print_spend(breakdown);
}

fn print_spend(breakdown: &SpendBreakdown) {
    println!("Spend Analysis");
    for (category, total) in breakdown.iter() {
        println!("  {:<16} {:>12.2}", category.label(), total);
    }
}

// ============================================================================
// CURRENCY CONVERSION
// ============================================================================

fn currency_conversion(console: &mut Console) -> Result<()> {
    println!("\nCurrency Conversion");
    for (i, currency) in Currency::ALL.iter().enumerate() {
        println!("{}. {} to INR", i + 1, currency.code());
    }
    println!("4. Exit");

    let choice = console.prompt("Enter your choice: ")?;

    if let Some(currency) = Currency::from_menu_choice(&choice) {
        let input = console.prompt("Enter amount: ")?;
        match Decimal::from_str(input.trim()) {
            Ok(amount) => println!("{}", format_conversion(currency, amount)),
            Err(_) => println!("Invalid amount."),
        }
    } else if choice == "4" {
        println!("Exiting Currency Conversion.");
    } else {
        println!("Invalid choice.");
    }

    Ok(())
}

fn format_conversion(currency: Currency, amount: Decimal) -> String {
    match currency.convert_to_inr(amount) {
        Some(inr) => format!("Converted amount: {:.2} INR", inr),
        None => "Amount too large to convert.".to_string(),
    }
}

// ============================================================================
// REPORT MODE
// ============================================================================

#[derive(Serialize)]
struct Report<'a> {
    account_number: &'a str,
    name: &'a str,
    balance: Decimal,
    recent: Vec<TransactionRecord>,
    spend: SpendBreakdown,
}

fn run_report(
    console: &mut Console,
    accounts: &AccountRepository,
    log: &TransactionLog,
    config: &Config,
    account_number: &str,
) -> Result<()> {
    let password = console.prompt("Enter Password: ")?;
    let account = authenticate_for_report(accounts, account_number, &password)?;

    let report = Report {
        account_number: &account.account_number,
        name: &account.name,
        balance: account.balance,
        recent: StatementView::new(log)
            .recent_transactions(&account.account_number, config.statement_limit)?,
        spend: SpendAnalyzer::new(log).category_totals(&account.account_number)?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Report mode has no retry loop, so a failed login is an error (non-zero exit)
fn authenticate_for_report(
    accounts: &AccountRepository,
    account_number: &str,
    password: &str,
) -> Result<Account> {
    AuthGateway::new(accounts)
        .authenticate(account_number, password)?
        .ok_or_else(|| InvalidCredentials.into())
}
