mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::process::Command;

#[test]
fn test_malformed_lines_are_skipped() {
    let journal = common::write_journal(&[
        common::line("create_bill", json!({"id": "bill-1", "booking": "B1", "room_charges": "50"})),
        "{\"op\": \"add_payment\", \"bill\": ".to_string(),
        common::line("refund", json!({"bill": "bill-1"})),
        common::line("add_payment", json!({"bill": "bill-1", "amount": "not-a-number"})),
        common::line("add_payment", json!({"bill": "bill-1", "amount": "20"})),
    ]);

    let mut cmd = Command::new(cargo_bin!("hotel-ledger"));
    cmd.arg(journal.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading journal entry"))
        .stdout(predicate::str::contains("bill-1,B1,50,0,0,0,50,20,1,partial"));
}

#[test]
fn test_failed_commands_do_not_stop_replay() {
    let journal = common::write_journal(&[
        common::line("add_payment", json!({"bill": "ghost", "amount": "20"})),
        common::line("create_member", json!({"id": "m1", "name": ""})),
        common::line("create_member", json!({"id": "m1", "name": "Ada"})),
        common::line("create_member", json!({"id": "m1", "name": "Ada again"})),
        common::line("earn_points", json!({"member": "m1", "points": 0})),
        common::line("earn_points", json!({"member": "m1", "points": 2000})),
    ]);

    let mut cmd = Command::new(cargo_bin!("hotel-ledger"));
    cmd.arg(journal.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("m1,Ada,2000,silver,10,3"));
}

#[test]
fn test_commands_without_caller_are_unauthorized() {
    let journal = common::write_journal(&[
        json!({"op": "create_bill", "id": "bill-1", "booking": "B1", "room_charges": "50"}).to_string(),
        json!({"op": "create_member", "id": "m1", "name": "Ada", "caller": {"id": "  "}}).to_string(),
    ]);

    let mut cmd = Command::new(cargo_bin!("hotel-ledger"));
    cmd.arg(journal.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("status=401"))
        .stdout(predicate::str::contains("bill-1").not())
        .stdout(predicate::str::contains("m1").not());
}

#[test]
fn test_out_of_range_amounts_do_not_abort_replay() {
    let huge = rust_decimal::Decimal::MAX.to_string();
    let journal = common::write_journal(&[
        common::line("create_bill", json!({"id": "bill-1", "booking": "B1", "room_charges": "50"})),
        common::line(
            "create_food_order",
            json!({"id": "o1", "booking": "B1", "items": [{"item": "Caviar", "quantity": 2, "price": huge}]}),
        ),
        common::line("add_payment", json!({"bill": "bill-1", "amount": "50"})),
    ]);

    let mut cmd = Command::new(cargo_bin!("hotel-ledger"));
    cmd.arg(journal.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("out of range"))
        .stdout(predicate::str::contains("bill-1,B1,50,0,0,0,50,50,1,paid"))
        .stdout(predicate::str::contains("o1,").not());
}

#[test]
fn test_blank_lines_are_ignored() {
    let journal = common::write_journal(&[
        String::new(),
        common::line("create_member", json!({"id": "m1", "name": "Ada"})),
        "   ".to_string(),
    ]);

    let mut cmd = Command::new(cargo_bin!("hotel-ledger"));
    cmd.arg(journal.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARN").not())
        .stdout(predicate::str::contains("m1,Ada,0,bronze,5,2"));
}
