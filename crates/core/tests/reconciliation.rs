//! Integration tests for merging backend records with the local cache.

use smallvec::SmallVec;
use testresult::TestResult;

use storefront::{
    customers::Customer,
    normalize::{NormalizeError, WireCustomer, WireOrder, WirePayment, normalize_all},
    orders::Order,
    payments::{PaymentRecord, backfill_items},
    reconcile::{RecordSource, fallback_records, into_records, merge_records, merge_records_by_any},
};

fn orders(json: &str) -> TestResult<Vec<Order>> {
    let wire: Vec<WireOrder> = serde_json::from_str(json)?;
    let (orders, failures): (Vec<Order>, Vec<NormalizeError>) = normalize_all(wire);

    if let Some(failure) = failures.into_iter().next() {
        return Err(failure.into());
    }

    Ok(orders)
}

fn order_keys(order: &Order) -> SmallVec<[String; 2]> {
    let mut keys = SmallVec::new();
    keys.push(order.id.to_string());
    keys.extend(order.payment_reference.as_ref().map(ToString::to_string));
    keys
}

#[test]
fn local_orders_missing_from_backend_are_appended() -> TestResult {
    let remote = orders(
        r#"[
            {"id": 1, "customer_email": "ada@example.com", "total": 41200, "status": "confirmed",
             "created_at": "2025-01-13T10:00:00", "payment_reference": "BMP_1_a"}
        ]"#,
    )?;

    let local = orders(
        r#"[
            {"id": "1736762400000", "customer_email": "ada@example.com", "total": 41200,
             "status": "confirmed", "created_at": "2025-01-13T10:00:00Z", "payment_reference": "BMP_1_a"},
            {"id": "1736848800000", "customer_email": "ada@example.com", "total": 9000,
             "status": "pending", "created_at": "2025-01-14T10:00:00Z"}
        ]"#,
    )?;

    let merged = merge_records_by_any(&remote, &local, order_keys);

    let summary: Vec<(&str, RecordSource)> = merged
        .iter()
        .map(|order| (order.id.as_str(), order.source))
        .collect();

    assert_eq!(
        summary,
        [
            ("1", RecordSource::Remote),
            ("1736848800000", RecordSource::Local),
        ]
    );

    Ok(())
}

#[test]
fn payments_merge_by_reference_and_pick_up_order_items() -> TestResult {
    let remote: Vec<WirePayment> = serde_json::from_str(
        r#"[{"reference": "BMP_1_a", "orderId": 1, "amount": 41200, "status": "confirmed",
             "date": "2025-01-13T10:00:00", "paymentMethod": "Card", "items": []}]"#,
    )?;
    let local: Vec<WirePayment> = serde_json::from_str(
        r#"[
            {"reference": "BMP_1_a", "orderId": 1, "amount": 41200, "status": "completed", "date": "2025-01-13T10:00:00Z"},
            {"reference": "BMP_2_b", "orderId": 2, "amount": 9000, "status": "completed", "date": "2025-01-14T10:00:00Z"}
        ]"#,
    )?;

    let (remote, _): (Vec<PaymentRecord>, _) = normalize_all(remote);
    let (local, _): (Vec<PaymentRecord>, _) = normalize_all(local);

    let mut payments = into_records(merge_records(&remote, &local, |p| p.reference.clone()));

    let placed = orders(
        r#"[{"id": 1, "customer_email": "ada@example.com", "total": 41200, "created_at": "2025-01-13",
             "items": [{"product_id": "1", "name": "Classic White T-Shirt", "price": 18000, "quantity": 2}]}]"#,
    )?;

    backfill_items(&mut payments, &placed);

    let item_counts: Vec<(&str, usize)> = payments
        .iter()
        .map(|p| (p.reference.as_str(), p.items.len()))
        .collect();

    assert_eq!(item_counts, [("BMP_1_a", 1), ("BMP_2_b", 0)]);

    Ok(())
}

#[test]
fn customers_merge_by_normalized_email() -> TestResult {
    let remote: Vec<WireCustomer> = serde_json::from_str(
        r#"[{"name": "Ada", "email": "ADA@example.com", "registrationDate": "2025-01-13"}]"#,
    )?;
    let local: Vec<WireCustomer> = serde_json::from_str(
        r#"[
            {"name": "Ada L", "email": "ada@example.com", "registrationDate": "2025-01-12"},
            {"name": "Grace", "email": "grace@example.com", "registrationDate": "2025-01-14"}
        ]"#,
    )?;

    let (remote, _): (Vec<Customer>, _) = normalize_all(remote);
    let (local, _): (Vec<Customer>, _) = normalize_all(local);

    let merged = into_records(merge_records(&remote, &local, |c| c.email.clone()));

    let names: Vec<&str> = merged.iter().map(|c| c.name.as_str()).collect();

    assert_eq!(names, ["Ada", "Grace"]);

    Ok(())
}

#[test]
fn unreachable_backend_falls_back_to_local() -> TestResult {
    let local = orders(
        r#"[{"id": 5, "customer_email": "ada@example.com", "total": 100, "created_at": "2025-01-13"}]"#,
    )?;

    let merged = fallback_records(&local);

    assert!(merged.iter().all(|order| order.source == RecordSource::LocalFallback));
    assert_eq!(into_records(merged), local);

    Ok(())
}
