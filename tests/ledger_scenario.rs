//! End-to-end ledger scenario against real files

use chrono::Local;
use flat_ledger::{
    hash_password, open_file_ledger, AuthGateway, Config, LedgerEngine, SpendAnalyzer,
    SpendCategory, StatementView, TransactionKind, TransactionOutcome,
};
use rust_decimal_macros::dec;
use std::fs;
use std::path::PathBuf;

fn temp_config() -> (PathBuf, Config) {
    let dir = std::env::temp_dir().join(format!("flat-ledger-it-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();

    let config = Config {
        accounts_file: dir.join("accounts.txt"),
        transactions_file: dir.join("transactions.txt"),
        ..Config::default()
    };
    (dir, config)
}

fn read_lines(path: &PathBuf) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.to_string())
        .collect()
}

#[test]
fn test_create_login_deposit_withdraw_scenario() {
    let (dir, config) = temp_config();
    let (accounts, log) = open_file_ledger(&config);
    let engine = LedgerEngine::new(&accounts, &log);

    // Create 1001/Alice/secret with 100
    engine.open_account("1001", "Alice", "secret", dec!(100)).unwrap();
    assert_eq!(
        read_lines(&config.accounts_file),
        vec![format!("1001,Alice,{},100", hash_password("secret"))]
    );

    // Login succeeds only on exact credentials; both failures look the same
    let gateway = AuthGateway::new(&accounts);
    assert!(gateway.authenticate("1001", "secret").unwrap().is_some());
    let wrong_password = gateway.authenticate("1001", "wrong").unwrap();
    let unknown_account = gateway.authenticate("9999", "secret").unwrap();
    assert!(wrong_password.is_none());
    assert_eq!(wrong_password, unknown_account);

    // Deposit 50
    let outcome = engine.deposit("1001", dec!(50)).unwrap();
    assert_eq!(outcome, TransactionOutcome::Applied { balance: Some(dec!(150)) });
    assert_eq!(engine.balance("1001").unwrap(), Some(dec!(150)));

    let today = Local::now().date_naive();
    assert_eq!(
        read_lines(&config.transactions_file),
        vec![format!("1001,Deposit,50,,{}", today.format("%Y-%m-%d"))]
    );

    // Guard amount 30 against 150 passes the guard
    let outcome = engine
        .apply_transaction("1001", TransactionKind::Withdrawal, dec!(30), Some("ATM"))
        .unwrap();
    assert!(outcome.is_success());

    // Guard amount above balance is declined and leaves both files alone
    let accounts_before = read_lines(&config.accounts_file);
    let log_before = read_lines(&config.transactions_file);
    let outcome = engine
        .apply_transaction("1001", TransactionKind::Withdrawal, dec!(10000), Some("POS"))
        .unwrap();
    assert!(!outcome.is_success());
    assert_eq!(read_lines(&config.accounts_file), accounts_before);
    assert_eq!(read_lines(&config.transactions_file), log_before);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_views_over_file_log() {
    let (dir, config) = temp_config();
    let (accounts, log) = open_file_ledger(&config);
    let engine = LedgerEngine::new(&accounts, &log);

    engine.open_account("1001", "Alice", "secret", dec!(1000)).unwrap();
    engine.open_account("100", "Bob", "pw", dec!(1000)).unwrap();

    engine.withdraw("1001", dec!(30), "ATM").unwrap();
    engine.withdraw("100", dec!(999), "ATM").unwrap();
    engine.withdraw("1001", dec!(20), "POS").unwrap();
    engine.deposit("1001", dec!(5)).unwrap();
    engine.withdraw("1001", dec!(10), "ATM").unwrap();
    engine.withdraw("1001", dec!(7), "Groceries").unwrap();

    let breakdown = SpendAnalyzer::new(&log).category_totals("1001").unwrap();
    assert_eq!(breakdown.get(SpendCategory::Atm), dec!(-40));
    assert_eq!(breakdown.get(SpendCategory::Pos), dec!(-20));
    assert_eq!(breakdown.get(SpendCategory::OnlineShopping), dec!(0));

    let recent = StatementView::new(&log).recent_transactions("1001", 3).unwrap();
    let amounts: Vec<_> = recent.iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![dec!(5), dec!(-10), dec!(-7)]);
    assert!(recent.iter().all(|r| r.account_number == "1001"));

    assert_eq!(engine.balance("1001").unwrap(), Some(dec!(938)));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_malformed_store_lines_survive_rewrites() {
    let (dir, config) = temp_config();
    fs::write(
        &config.accounts_file,
        "1001,Alice,h,100\nthis line is broken\n1002,Smith, John,h,5\n",
    )
    .unwrap();
    let (accounts, log) = open_file_ledger(&config);

    let defects: Vec<_> = accounts
        .scan()
        .unwrap()
        .into_iter()
        .filter_map(|line| line.err())
        .collect();
    assert_eq!(defects.len(), 2);
    assert_eq!(defects[0].line_number, 2);

    LedgerEngine::new(&accounts, &log).deposit("1001", dec!(1)).unwrap();

    assert_eq!(
        read_lines(&config.accounts_file),
        vec!["1001,Alice,h,101", "this line is broken", "1002,Smith, John,h,5"]
    );

    fs::remove_dir_all(dir).ok();
}
