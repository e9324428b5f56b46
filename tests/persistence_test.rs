#![cfg(feature = "storage-rocksdb")]

mod common;

use serde_json::json;
use tempfile::tempdir;

#[test]
fn test_rocksdb_state_survives_restart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("payments_db");
    let db_arg = format!("--db-path={}", db_path.display());

    // First run: create a user and a payment, move it to completed.
    let first = common::requests_file(&[
        common::create_user("Ada"),
        json!({"op": "create_payment", "orderId": "ORDER-DB0001", "userId": common::USER_ID,
               "amount": "75.25", "paymentMethod": "bank_transfer"}),
        json!({"op": "update_status", "orderId": "ORDER-DB0001", "status": "processing"}),
        json!({"op": "update_status", "orderId": "ORDER-DB0001", "status": "completed"}),
    ]);
    let responses = common::run_args(first.path(), &[&db_arg]);
    assert_eq!(responses[3]["body"]["status"], "completed");

    // Second run against the same database: the payment is still there and
    // still refundable.
    let second = common::requests_file(&[
        json!({"op": "get_payment", "orderId": "ORDER-DB0001"}),
        json!({"op": "refund", "orderId": "ORDER-DB0001", "refundAmount": "75.25",
               "refundReason": "Customer request"}),
    ]);
    let responses = common::run_args(second.path(), &[&db_arg]);
    assert_eq!(responses[0]["status"], 200);
    assert_eq!(responses[0]["body"]["status"], "completed");
    assert_eq!(responses[0]["body"]["amount"], "75.25");
    assert_eq!(responses[1]["status"], 200);
    assert_eq!(responses[1]["body"]["status"], "refunded");

    // Third run: the refund is permanent.
    let third = common::requests_file(&[
        json!({"op": "refund", "orderId": "ORDER-DB0001", "refundAmount": "10.00",
               "refundReason": "Customer request"}),
    ]);
    let responses = common::run_args(third.path(), &[&db_arg]);
    assert_eq!(responses[0]["status"], 400);
    assert_eq!(
        responses[0]["body"]["message"],
        "This payment has already been refunded"
    );
}
