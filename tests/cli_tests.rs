mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::process::Command;

#[test]
fn test_cli_end_to_end() {
    let file = common::requests_file(&[
        common::create_user("Ada"),
        json!({"op": "create_payment", "orderId": "ORDER-CLI001", "userId": common::USER_ID,
               "amount": "12.34", "paymentMethod": "paypal"}),
        json!({"op": "list_payments"}),
    ]);

    let mut cmd = Command::new(cargo_bin!("paylane"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"status\":201"))
        .stdout(predicate::str::contains("ORDER-CLI001"))
        .stdout(predicate::str::contains("\"amount\":\"12.34\""));
}

#[test]
fn test_missing_input_file_fails() {
    let mut cmd = Command::new(cargo_bin!("paylane"));
    cmd.arg("does-not-exist.jsonl");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No such file"));
}
