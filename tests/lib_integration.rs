use std::ffi::OsString;

use expense_split_lib::{process_expenses, EngineConfig, SplitError};
use test_utils::{assert_unsorted_eq, create_balances_csv, create_settlements_csv};

extern crate test_utils;

fn members(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn two_people_one_dinner() {
    let sut = process_expenses(
        &OsString::from("tests/resources/two_people.csv"),
        &members(&["Alice", "Bob"]),
        &EngineConfig::default(),
    )
    .unwrap();

    let expected = create_balances_csv(vec![["Alice", "50.00"], ["Bob", "-50.00"]]);
    assert_eq!(sut.balances_csv, expected);
    let expected = create_settlements_csv(vec![["Bob", "Alice", "50.00"]]);
    assert_eq!(sut.settlements_csv, expected);
}

#[test]
fn one_payer_three_way_split() {
    let sut = process_expenses(
        &OsString::from("tests/resources/three_way.csv"),
        &members(&["A", "B", "C"]),
        &EngineConfig::default(),
    )
    .unwrap();

    let expected = create_balances_csv(vec![["A", "60.00"], ["B", "-30.00"], ["C", "-30.00"]]);
    assert_eq!(sut.balances_csv, expected);
    let expected = create_settlements_csv(vec![["B", "A", "30.00"], ["C", "A", "30.00"]]);
    assert_unsorted_eq(&sut.settlements_csv, &expected);
}

#[test]
fn empty_split_is_shared_by_the_whole_group() {
    let sut = process_expenses(
        &OsString::from("tests/resources/default_split.csv"),
        &members(&["Alice", "Bob"]),
        &EngineConfig::default(),
    )
    .unwrap();
    let explicit = process_expenses(
        &OsString::from("tests/resources/two_people.csv"),
        &members(&["Alice", "Bob"]),
        &EngineConfig::default(),
    )
    .unwrap();

    assert_eq!(sut.balances_csv, explicit.balances_csv);
    assert_eq!(sut.settlements_csv, explicit.settlements_csv);
}

#[test]
fn settled_group_needs_no_transfers() {
    let sut = process_expenses(
        &OsString::from("tests/resources/already_settled.csv"),
        &members(&["Alice", "Bob"]),
        &EngineConfig::default(),
    )
    .unwrap();

    let expected = create_balances_csv(vec![["Alice", "0.00"], ["Bob", "0.00"]]);
    assert_eq!(sut.balances_csv, expected);
    assert_eq!(sut.settlements_csv, create_settlements_csv(vec![]));
}

#[test]
fn weekend_trip_with_mixed_splits() {
    let sut = process_expenses(
        &OsString::from("tests/resources/weekend_trip.csv"),
        &members(&["Alice", "Bob", "Carol", "Dave"]),
        &EngineConfig::default(),
    )
    .unwrap();

    let expected = create_balances_csv(vec![
        ["Alice", "75.00"],
        ["Bob", "0.00"],
        ["Carol", "-30.00"],
        ["Dave", "-45.00"],
    ]);
    assert_eq!(sut.balances_csv, expected);
    // largest debt is paid first
    let expected = create_settlements_csv(vec![["Dave", "Alice", "45.00"], ["Carol", "Alice", "30.00"]]);
    assert_eq!(sut.settlements_csv, expected);

    assert_eq!(sut.summary.expense_count, 4);
    assert_eq!(sut.summary.participant_count, 4);
    let report = sut.to_string();
    assert!(report.starts_with("total expenses: 235.00 (4 expenses)\nsplit per person: 58.75 (4 people)\n"));
    assert_eq!(
        sut.expenses_csv,
        "description,payer,amount,split_among\n\
         Groceries,Alice,120.00,\n\
         Taxi,Bob,60.00,Bob;Carol\n\
         Museum,Carol,45.00,Alice;Carol;Dave\n\
         Coffee,Dave,10.00,Dave\n"
    );
    assert!(report.contains("Museum,Carol,45.00,Alice;Carol;Dave\n"));
}

// Members who only appear in the member list still share costs split among everyone.
#[test]
fn uneven_split_is_rounded_only_for_display() {
    let sut = process_expenses(
        &OsString::from("tests/resources/thirds.csv"),
        &members(&["Alice", "Bob", "Carol"]),
        &EngineConfig::default(),
    )
    .unwrap();

    let expected = create_balances_csv(vec![["Alice", "66.67"], ["Bob", "-33.33"], ["Carol", "-33.33"]]);
    assert_eq!(sut.balances_csv, expected);
    let expected = create_settlements_csv(vec![["Bob", "Alice", "33.33"], ["Carol", "Alice", "33.33"]]);
    assert_unsorted_eq(&sut.settlements_csv, &expected);
}

#[test]
fn participants_are_inferred_without_member_list() {
    let sut = process_expenses(
        &OsString::from("tests/resources/implicit_participant.csv"),
        &[],
        &EngineConfig::default(),
    )
    .unwrap();

    let expected = create_balances_csv(vec![["Alice", "40.00"], ["Dave", "-40.00"]]);
    assert_eq!(sut.balances_csv, expected);
    let expected = create_settlements_csv(vec![["Dave", "Alice", "40.00"]]);
    assert_eq!(sut.settlements_csv, expected);
}

#[test]
fn display_scale_is_configurable() {
    let config = EngineConfig {
        display_scale: 4,
        ..EngineConfig::default()
    };
    let sut = process_expenses(
        &OsString::from("tests/resources/thirds.csv"),
        &members(&["Alice", "Bob", "Carol"]),
        &config,
    )
    .unwrap();

    let expected = create_balances_csv(vec![
        ["Alice", "66.6667"],
        ["Bob", "-33.3333"],
        ["Carol", "-33.3333"],
    ]);
    assert_eq!(sut.balances_csv, expected);
}

#[test]
fn negative_amounts_are_rejected() {
    let err = process_expenses(
        &OsString::from("tests/resources/negative_amount.csv"),
        &[],
        &EngineConfig::default(),
    )
    .err()
    .unwrap();

    assert!(matches!(err, SplitError::NegativeAmount { line: 3, .. }));
    assert!(err.is_input_error());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = process_expenses(
        &OsString::from("tests/resources/does_not_exist.csv"),
        &[],
        &EngineConfig::default(),
    )
    .err()
    .unwrap();

    assert!(matches!(err, SplitError::Io(_)));
}

#[test]
fn amounts_at_the_cap_are_summed_without_overflow() {
    let sut = process_expenses(
        &OsString::from("tests/resources/largest_amounts.csv"),
        &[],
        &EngineConfig::default(),
    )
    .unwrap();

    assert!(sut
        .to_string()
        .starts_with("total expenses: 2000000000000000.00 (2 expenses)\n"));
    assert_eq!(sut.settlements_csv, create_settlements_csv(vec![]));
}

#[test]
fn oversized_amounts_are_rejected_before_summing() {
    let err = process_expenses(
        &OsString::from("tests/resources/oversized_amount.csv"),
        &[],
        &EngineConfig::default(),
    )
    .err()
    .unwrap();

    assert!(matches!(err, SplitError::AmountTooLarge { line: 2, .. }));
    assert!(err.is_input_error());
}
