//! Edge case tests for accounts and transaction groups through the public API.

use exceptional_banking::group::{
    EMPTY_ENCODING, INTEGER_ZERO, INVALID_TAG, NON_INTEGER_TOKEN, QUICK_WITHDRAW_LENGTH,
    QUICK_WITHDRAW_NEGATIVE,
};
use exceptional_banking::{
    Account, AccountConfig, Amount, BankingError, IdAllocator, TransactionGroup,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn new_account() -> Account {
    Account::new("test", &IdAllocator::new(), AccountConfig::default())
}

fn add_error(command: &str) -> String {
    let mut account = new_account();
    match account.add_transaction_group(command) {
        Err(BankingError::InvalidEncoding(message)) => message,
        other => panic!("Expected InvalidEncoding for {:?}, got {:?}", command, other),
    }
}

fn account_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ==================== ENCODING VALIDATION ====================

#[test]
fn test_empty_encoding_message() {
    let empty: &[Amount] = &[];
    match TransactionGroup::try_from(empty) {
        Err(BankingError::InvalidEncoding(message)) => assert_eq!(message, EMPTY_ENCODING),
        other => panic!("Expected InvalidEncoding, got {:?}", other),
    }
}

#[test]
fn test_invalid_tag_message() {
    let encoding: &[Amount] = &[3, 2, 2, 2, 1, 2];
    match TransactionGroup::try_from(encoding) {
        Err(BankingError::InvalidEncoding(message)) => {
            assert_eq!(
                message,
                "the first element within a transaction group must be 0, 1, or 2"
            );
            assert_eq!(message, INVALID_TAG);
        }
        other => panic!("Expected InvalidEncoding, got {:?}", other),
    }
}

#[test]
fn test_blank_command_is_empty_encoding() {
    assert_eq!(add_error("   "), EMPTY_ENCODING);
}

#[test]
fn test_non_integer_checked_before_variant_rules() {
    assert_eq!(add_error("2 1 1 hello -1"), NON_INTEGER_TOKEN);
    assert_eq!(add_error("7 x"), NON_INTEGER_TOKEN);
    assert_eq!(add_error("1 2.5"), NON_INTEGER_TOKEN);
}

#[test]
fn test_variant_rule_messages() {
    assert_eq!(add_error("2 1 1 1 -1"), QUICK_WITHDRAW_NEGATIVE);
    assert_eq!(add_error("2 1 1 1"), QUICK_WITHDRAW_LENGTH);
    assert_eq!(add_error("1 4 0"), INTEGER_ZERO);
    assert_eq!(
        add_error("0 1 0 5"),
        "binary amount transaction groups may only contain 0s and 1s"
    );
}

#[test]
fn test_error_display_is_message() {
    let err = new_account().add_transaction_group("1 0").unwrap_err();
    assert_eq!(err.to_string(), INTEGER_ZERO);
}

// ==================== AGGREGATION ====================

#[test]
fn test_binary_balance_fixture() {
    let mut account = new_account();
    account.add_transaction_group("0 1 1 1 1 0 0 1").unwrap();
    assert_eq!(account.transaction_count(), 3);
    assert_eq!(account.current_balance(), 3);
}

#[test]
fn test_binary_overdraft_fixture() {
    let mut account = new_account();
    account.add_transaction_group("0 0 0 0 1 1 1 1 0 0 0 0").unwrap();
    assert_eq!(account.number_of_overdrafts(), 2);
}

#[test]
fn test_index_out_of_range_fixture() {
    let mut account = new_account();
    account.add_transaction_group("0 1 1 1 1").unwrap();

    let err = account.transaction_amount(2).unwrap_err();
    assert!(matches!(
        err,
        BankingError::IndexOutOfRange { index: 2, limit: 1 }
    ));
    assert!(err.to_string().contains('2'));
    assert!(err.to_string().contains('1'));
}

#[test]
fn test_empty_account_has_no_transactions() {
    let account = new_account();
    assert!(matches!(
        account.transaction_amount(0),
        Err(BankingError::IndexOutOfRange { index: 0, limit: 0 })
    ));
}

#[test]
fn test_indexed_sum_matches_balance() {
    let mut account = new_account();
    for command in ["0 1 0 1 1 0 0 0", "1 12 -7 -30", "2 3 1 0 2", "0 0"] {
        account.add_transaction_group(command).unwrap();
    }

    let indexed: Amount = (0..account.transaction_count())
        .map(|i| account.transaction_amount(i).unwrap())
        .sum();
    assert_eq!(indexed, account.current_balance());
}

#[test]
fn test_quick_withdraw_overdrafts_every_debit_below_zero() {
    let mut account = new_account();
    account.add_transaction_group("1 100").unwrap();
    account.add_transaction_group("2 2 1 0 1").unwrap();
    // 100 -> 80 -> 60 -> 20 -> -80
    assert_eq!(account.current_balance(), -80);
    assert_eq!(account.number_of_overdrafts(), 1);
}

#[test]
fn test_large_quick_withdraw_counts() {
    let mut account = new_account();
    account.add_transaction_group("2 0 0 0 100000").unwrap();
    assert_eq!(account.transaction_count(), 100_000);
    assert_eq!(account.transaction_amount(99_999).unwrap(), -100);
    assert_eq!(account.current_balance(), -10_000_000);
    assert_eq!(account.number_of_overdrafts(), 100_000);
}

// ==================== RECONSTRUCTION ====================

#[test]
fn test_load_skips_malformed_line_keeping_order() {
    let file = account_file("savings\n4242\n1 10\n1 0\n1 20\n1 30\n");
    let ids = IdAllocator::new();

    let loaded = Account::load(file.path(), &ids, AccountConfig::default()).unwrap();
    let groups: Vec<String> = loaded
        .account
        .groups()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(groups, vec!["1 10", "1 20", "1 30"]);
    assert_eq!(loaded.skipped.len(), 1);
    assert_eq!(loaded.skipped[0].line, 4);
    assert_eq!(loaded.account.id(), 4242);
    assert_eq!(ids.next_id(), 4243);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");

    match Account::load(&missing, &IdAllocator::new(), AccountConfig::default()) {
        Err(BankingError::SourceNotFound { path }) => assert!(path.ends_with("missing.txt")),
        other => panic!("Expected SourceNotFound, got {:?}", other),
    }
}

#[test]
fn test_saved_account_reloads_identically() {
    let ids = IdAllocator::new();
    let mut account = Account::new("roundtrip", &ids, AccountConfig::default());
    account.add_transaction_group("0 0 1 1 0").unwrap();
    account.add_transaction_group("2 0 3 0 1").unwrap();

    let mut file = NamedTempFile::new().unwrap();
    account.write_to(file.as_file_mut()).unwrap();

    let reloaded = Account::load(file.path(), &ids, AccountConfig::default()).unwrap();
    assert!(reloaded.skipped.is_empty());
    assert_eq!(reloaded.account, account);
    assert_eq!(
        reloaded.account.current_balance(),
        account.current_balance()
    );
}

#[test]
fn test_new_accounts_continue_after_loaded_id() {
    let ids = IdAllocator::new();
    let file = account_file("old\n5000\n");
    Account::load(file.path(), &ids, AccountConfig::default()).unwrap();

    let fresh = Account::new("fresh", &ids, AccountConfig::default());
    assert_eq!(fresh.id(), 5001);
}

#[test]
fn test_load_skips_overflowing_and_undecodable_lines() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"big\n9\n1 9223372036854775807\n1 1\n").unwrap();
    file.write_all(&[b'1', b' ', 0xc3, b'\n']).unwrap();
    file.write_all(b"1 -7\n").unwrap();
    file.flush().unwrap();

    let loaded = Account::load(file.path(), &IdAllocator::new(), AccountConfig::default()).unwrap();

    assert_eq!(loaded.account.groups().len(), 2);
    assert_eq!(loaded.account.current_balance(), Amount::MAX - 7);
    let skipped: Vec<usize> = loaded.skipped.iter().map(|s| s.line).collect();
    assert_eq!(skipped, vec![4, 5]);
}
