//! Integration tests for cart totals through the public cart API.

use rust_decimal::Decimal;
use testresult::TestResult;

use storefront::{
    cart::{Cart, CartLine, CartTotals, compute_totals},
    products::{Product, ProductId},
    promotions::PromoCode,
};

fn product(id: &str, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        brand: "Premium Basics".to_string(),
        category: "Tops".to_string(),
        price,
        original_price: None,
        stock: 20,
        colors: Vec::new(),
        sizes: Vec::new(),
        on_sale: false,
        image: None,
    }
}

fn line(id: &str, price: i64, quantity: u32) -> CartLine {
    CartLine::from_product(&product(id, price), quantity, None, None)
}

fn minor(totals: &CartTotals) -> [i64; 6] {
    [
        totals.subtotal.to_minor_units(),
        totals.discount.to_minor_units(),
        totals.taxable_base.to_minor_units(),
        totals.tax.to_minor_units(),
        totals.shipping.to_minor_units(),
        totals.total.to_minor_units(),
    ]
}

#[test]
fn two_shirts_without_promo() {
    let totals = compute_totals(&[line("1", 1_800_000, 2)], None);

    assert_eq!(
        minor(&totals),
        [3_600_000, 0, 3_600_000, 270_000, 250_000, 4_120_000]
    );
}

#[test]
fn two_shirts_with_ten_percent_promo() {
    let promo = PromoCode::percentage("234567", Decimal::from(10));

    let totals = compute_totals(&[line("1", 1_800_000, 2)], Some(&promo));

    assert_eq!(
        minor(&totals),
        [3_600_000, 360_000, 3_240_000, 243_000, 250_000, 3_733_000]
    );
}

#[test]
fn cart_totals_match_free_function() -> TestResult {
    let mut cart = Cart::new();
    cart.add(line("1", 1_800_000, 1))?;
    cart.add(line("1", 1_800_000, 1))?;
    cart.add(line("2", 450_050, 3))?;

    let promo = PromoCode::fixed("SAVE500", 50_000);

    assert_eq!(
        cart.totals(Some(&promo)),
        compute_totals(cart.lines(), Some(&promo))
    );
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 5);

    Ok(())
}

#[test]
fn total_never_below_subtotal_without_promo() {
    let carts = [
        vec![],
        vec![line("1", 0, 1)],
        vec![line("1", 1, 1)],
        vec![line("1", 999, 7), line("2", 12_345, 2)],
        vec![line("1", 5_000_000, 1)],
        vec![line("1", 2_500_000, 3), line("2", 1, 1)],
    ];

    for lines in &carts {
        let totals = compute_totals(lines, None);

        assert!(
            totals.total >= totals.subtotal,
            "total below subtotal for {lines:?}"
        );
    }
}

#[test]
fn larger_discount_lowers_total_within_a_shipping_band() {
    let lines = [line("1", 1_800_000, 2)];

    let totals: Vec<i64> = [0, 5, 10, 25, 50]
        .into_iter()
        .map(|points| {
            let promo = PromoCode::percentage("P", Decimal::from(points));
            compute_totals(&lines, Some(&promo)).total.to_minor_units()
        })
        .collect();

    assert!(
        totals.windows(2).all(|pair| pair.first() > pair.get(1)),
        "totals not strictly decreasing: {totals:?}"
    );
}

#[test]
fn fixed_promo_above_subtotal_discounts_everything() {
    let promo = PromoCode::fixed("BIG", 10_000_000);

    let totals = compute_totals(&[line("1", 1_800_000, 2)], Some(&promo));

    assert_eq!(totals.discount, totals.subtotal);
    assert_eq!(totals.taxable_base.to_minor_units(), 0);
    assert_eq!(totals.total.to_minor_units(), 250_000);
}

#[test]
fn shipping_is_charged_at_the_threshold_and_free_above_it() {
    let at = compute_totals(&[line("1", 5_000_000, 1)], None);
    let above = compute_totals(&[line("1", 5_000_001, 1)], None);

    assert_eq!(at.shipping.to_minor_units(), 250_000);
    assert_eq!(above.shipping.to_minor_units(), 0);
}

#[test]
fn discount_can_move_cart_into_the_shipping_band() {
    let lines = [line("1", 5_500_000, 1)];
    let promo = PromoCode::percentage("P", Decimal::from(10));

    let full = compute_totals(&lines, None);
    let discounted = compute_totals(&lines, Some(&promo));

    assert_eq!(full.shipping.to_minor_units(), 0);
    assert_eq!(discounted.taxable_base.to_minor_units(), 4_950_000);
    assert_eq!(discounted.shipping.to_minor_units(), 250_000);
}
