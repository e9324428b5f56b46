mod common;

use serde_json::json;
use std::io::Write;

#[test]
fn test_create_payment_accumulates_all_field_errors() {
    let file = common::requests_file(&[json!({
        "op": "create_payment",
        "orderId": "order-lowercase",
        "userId": "not-a-uuid",
        "amount": "-5",
        "paymentMethod": "iou",
    })]);

    let responses = common::run(&file);
    assert_eq!(responses[0]["status"], 400);
    assert_eq!(responses[0]["body"]["message"], "Validation failed");
    let errors = responses[0]["body"]["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 4);
    assert!(errors.contains_key("orderId"));
    assert!(errors.contains_key("userId"));
    assert_eq!(errors["amount"], "Amount must be a positive number");
    assert!(
        errors["paymentMethod"]
            .as_str()
            .unwrap()
            .starts_with("Invalid payment method. Valid options are:")
    );
}

#[test]
fn test_card_payments_require_details() {
    let file = common::requests_file(&[
        common::create_user("Ada"),
        json!({
            "op": "create_payment",
            "orderId": "ORDER-VAL001",
            "userId": common::USER_ID,
            "amount": "10.00",
            "paymentMethod": "debit_card",
        }),
        json!({
            "op": "create_payment",
            "orderId": "ORDER-VAL001",
            "userId": common::USER_ID,
            "amount": "10.00",
            "paymentMethod": "debit_card",
            "paymentDetails": {"lastFourDigits": "12ab", "expiryDate": "13/28"},
        }),
    ]);

    let responses = common::run(&file);
    assert_eq!(responses[1]["status"], 400);
    assert_eq!(
        responses[1]["body"]["errors"]["paymentDetails"],
        "Payment details are required for card payments"
    );
    assert_eq!(responses[2]["status"], 400);
    assert_eq!(
        responses[2]["body"]["errors"]["lastFourDigits"],
        "Last four digits must be 4 numeric characters"
    );
    assert_eq!(
        responses[2]["body"]["errors"]["expiryDate"],
        "Expiry date must be in MM/YY format"
    );
}

#[test]
fn test_duplicate_order_reference_conflicts() {
    let payment = json!({
        "op": "create_payment",
        "orderId": "ORDER-VAL002",
        "userId": common::USER_ID,
        "amount": "10.00",
        "paymentMethod": "crypto",
    });
    let file = common::requests_file(&[common::create_user("Ada"), payment.clone(), payment]);

    let responses = common::run(&file);
    assert_eq!(responses[1]["status"], 201);
    assert_eq!(responses[2]["status"], 400);
    assert_eq!(
        responses[2]["body"]["message"],
        "Payment with this order ID already exists"
    );
}

#[test]
fn test_unknown_user_is_404_on_create() {
    let file = common::requests_file(&[json!({
        "op": "create_payment",
        "orderId": "ORDER-VAL003",
        "userId": "97f36dd8-58bb-4c3a-8c4e-5417ec3c0f6b",
        "amount": "10.00",
        "paymentMethod": "crypto",
    })]);

    let responses = common::run(&file);
    assert_eq!(responses[0]["status"], 404);
    assert_eq!(responses[0]["body"]["message"], "User not found");
}

#[test]
fn test_malformed_line_answers_400_and_stream_continues() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "this is not json").unwrap();
    writeln!(file, "{}", json!({"op": "list_payments"})).unwrap();

    let responses = common::run(&file);
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["status"], 400);
    assert!(
        responses[0]["body"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Malformed request:")
    );
    assert_eq!(responses[1]["status"], 200);
    assert_eq!(responses[1]["body"], json!([]));
}

#[test]
fn test_refund_reason_bounds() {
    let file = common::requests_file(&[
        json!({"op": "refund", "orderId": "ORDER-VAL004", "refundAmount": "10.00",
               "refundReason": "meh"}),
        json!({"op": "refund", "orderId": "ORDER-VAL004"}),
    ]);

    let responses = common::run(&file);
    assert_eq!(responses[0]["status"], 400);
    assert_eq!(
        responses[0]["body"]["errors"]["refundReason"],
        "Refund reason must be between 5 and 500 characters"
    );
    assert_eq!(responses[1]["status"], 400);
    assert_eq!(
        responses[1]["body"]["errors"]["refundAmount"],
        "Refund amount is required"
    );
    assert_eq!(
        responses[1]["body"]["errors"]["refundReason"],
        "Refund reason is required"
    );
}
