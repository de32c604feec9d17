//! Dashboard analytics

use std::string::FromUtf8Error;

use csv::Writer;
use jiff::{civil::Date, tz::TimeZone};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    customers::Customer,
    orders::Order,
    payments::PaymentRecord,
    pricing::{line_total, minor_to_major},
    products::{Product, ProductId},
};

/// Number of best sellers listed on the dashboard.
pub const TOP_PRODUCTS: usize = 5;

/// Units and revenue for one product across all orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    /// Product id
    pub product_id: ProductId,

    /// Product name as ordered
    pub name: String,

    /// Brand as ordered
    pub brand: String,

    /// Units sold
    pub sold: u64,

    /// Revenue in minor units
    pub revenue: i64,
}

/// Figures shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    /// Registered users
    pub total_users: usize,

    /// Orders placed
    pub total_orders: usize,

    /// Sum of order totals in minor units
    pub total_revenue: i64,

    /// Orders placed today
    pub today_orders: usize,

    /// Sum of today's order totals in minor units
    pub today_revenue: i64,

    /// Products running low on stock
    pub low_stock: Vec<ProductId>,

    /// Users who registered today
    pub new_users_today: usize,

    /// Best sellers by units, most sold first
    pub top_products: Vec<ProductSales>,

    /// Payment records seen
    pub total_payments: usize,
}

/// Derive dashboard figures. `today` is a UTC calendar date.
pub fn summarize(
    users: &[Customer],
    products: &[Product],
    orders: &[Order],
    payments: &[PaymentRecord],
    today: Date,
) -> DashboardSnapshot {
    let placed_today: Vec<&Order> = orders
        .iter()
        .filter(|order| order.created_at.to_zoned(TimeZone::UTC).date() == today)
        .collect();

    DashboardSnapshot {
        total_users: users.len(),
        total_orders: orders.len(),
        total_revenue: sum_totals(orders.iter()),
        today_orders: placed_today.len(),
        today_revenue: sum_totals(placed_today.iter().copied()),
        low_stock: products
            .iter()
            .filter(|product| product.is_low_stock())
            .map(|product| product.id.clone())
            .collect(),
        new_users_today: users
            .iter()
            .filter(|user| user.registration_date == Some(today))
            .count(),
        top_products: top_products(orders, TOP_PRODUCTS),
        total_payments: payments.len(),
    }
}

/// Best sellers by units sold, ties broken by first appearance.
pub fn top_products(orders: &[Order], limit: usize) -> Vec<ProductSales> {
    let mut positions: FxHashMap<&ProductId, usize> = FxHashMap::default();
    let mut sales: Vec<ProductSales> = Vec::new();

    for item in orders.iter().flat_map(|order| &order.items) {
        let index = *positions.entry(&item.product_id).or_insert_with(|| {
            sales.push(ProductSales {
                product_id: item.product_id.clone(),
                name: item.name.clone(),
                brand: item.brand.clone(),
                sold: 0,
                revenue: 0,
            });

            sales.len() - 1
        });

        if let Some(entry) = sales.get_mut(index) {
            entry.sold = entry.sold.saturating_add(u64::from(item.quantity));
            entry.revenue = entry
                .revenue
                .saturating_add(line_total(item.unit_price, item.quantity));
        }
    }

    sales.sort_by(|a, b| b.sold.cmp(&a.sold));
    sales.truncate(limit);

    sales
}

/// Errors raised while writing a CSV export.
#[derive(Debug, Error)]
pub enum CsvExportError {
    /// A record could not be written.
    #[error("failed to write CSV")]
    Csv(#[from] csv::Error),

    /// The written bytes are not UTF-8.
    #[error("CSV export is not valid UTF-8")]
    Encoding(#[from] FromUtf8Error),
}

/// `Name,Email,Registration Date` export of the user list.
///
/// # Errors
///
/// Returns an error when a record cannot be written.
pub fn users_csv(users: &[Customer]) -> Result<String, CsvExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Name", "Email", "Registration Date"])?;

    for user in users {
        let date = user
            .registration_date
            .map_or_else(|| "N/A".to_string(), |date| date.to_string());

        writer.write_record([user.name.as_str(), user.email.as_str(), date.as_str()])?;
    }

    finish(writer)
}

/// `Reference,Customer,Amount,Method,Status,Date` export of payment history.
///
/// # Errors
///
/// Returns an error when a record cannot be written.
pub fn payments_csv(payments: &[PaymentRecord]) -> Result<String, CsvExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Reference", "Customer", "Amount", "Method", "Status", "Date"])?;

    for payment in payments {
        writer.write_record([
            payment.reference.to_string(),
            payment
                .customer_email
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            minor_to_major(payment.amount).to_string(),
            payment.method.clone().unwrap_or_else(|| "Card".to_string()),
            payment.status.to_string(),
            payment.date.to_string(),
        ])?;
    }

    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, CsvExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))?;

    Ok(String::from_utf8(bytes)?)
}

fn sum_totals<'a>(orders: impl Iterator<Item = &'a Order>) -> i64 {
    orders.fold(0_i64, |sum, order| sum.saturating_add(order.total))
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};
    use testresult::TestResult;

    use crate::{
        cart::CartLine, orders::test_support::order, payments::test_support::payment,
        products::test_support::product,
    };

    use super::*;

    fn item(id: &str, name: &str, unit_price: i64, quantity: u32) -> CartLine {
        CartLine::from_product(&product(id, name, "Brand", "misc", unit_price), quantity, None, None)
    }

    fn customer(email: &str, registered: Option<Date>) -> Customer {
        Customer {
            name: "Ada, Countess".to_string(),
            email: email.to_string(),
            registration_date: registered,
        }
    }

    #[test]
    fn summarize_counts_today_and_low_stock() -> TestResult {
        let today = date(2025, 3, 10);
        let orders = [
            order("1", "a@example.com", 4_120_000, "2025-03-10T09:00:00Z".parse()?),
            order("2", "b@example.com", 1_000_000, "2025-03-09T23:59:59Z".parse()?),
        ];
        let mut scarce = product("p2", "Scarf", "Mango", "accessories", 800_000);
        scarce.stock = 3;
        let products = [product("p1", "Shirt", "Zara", "shirts", 1_800_000), scarce];
        let users = [
            customer("a@example.com", Some(today)),
            customer("b@example.com", Some(date(2025, 1, 1))),
            customer("c@example.com", None),
        ];

        let snapshot = summarize(&users, &products, &orders, &[payment("BMP_A", None, 1)], today);

        assert_eq!(snapshot.total_users, 3);
        assert_eq!(snapshot.total_orders, 2);
        assert_eq!(snapshot.total_revenue, 5_120_000);
        assert_eq!(snapshot.today_orders, 1);
        assert_eq!(snapshot.today_revenue, 4_120_000);
        assert_eq!(snapshot.low_stock, [ProductId::new("p2")]);
        assert_eq!(snapshot.new_users_today, 1);
        assert_eq!(snapshot.total_payments, 1);

        Ok(())
    }

    #[test]
    fn top_products_ranks_by_units_and_keeps_five() {
        let mut orders = Vec::new();

        for (index, quantity) in [1_u32, 6, 3, 2, 5, 4].into_iter().enumerate() {
            let id = format!("p{index}");
            let mut placed = order(&id, "a@example.com", 0, Timestamp::UNIX_EPOCH);
            placed.items = vec![item(&id, &id, 1_000, quantity)];
            orders.push(placed);
        }

        let mut repeat = order("again", "a@example.com", 0, Timestamp::UNIX_EPOCH);
        repeat.items = vec![item("p0", "p0", 1_000, 9)];
        orders.push(repeat);

        let top = top_products(&orders, TOP_PRODUCTS);
        let ranked: Vec<(&str, u64, i64)> = top
            .iter()
            .map(|s| (s.product_id.as_str(), s.sold, s.revenue))
            .collect();

        assert_eq!(
            ranked,
            [
                ("p0", 10, 10_000),
                ("p1", 6, 6_000),
                ("p4", 5, 5_000),
                ("p5", 4, 4_000),
                ("p2", 3, 3_000),
            ]
        );
    }

    #[test]
    fn users_csv_quotes_commas() -> TestResult {
        let csv = users_csv(&[
            customer("a@example.com", Some(date(2025, 3, 10))),
            customer("b@example.com", None),
        ])?;

        assert_eq!(
            csv,
            "Name,Email,Registration Date\n\
             \"Ada, Countess\",a@example.com,2025-03-10\n\
             \"Ada, Countess\",b@example.com,N/A\n"
        );

        Ok(())
    }

    #[test]
    fn payments_csv_uses_major_units() -> TestResult {
        let csv = payments_csv(&[payment("BMP_A", Some("10"), 4_120_000)])?;

        assert_eq!(
            csv,
            "Reference,Customer,Amount,Method,Status,Date\n\
             BMP_A,N/A,41200.00,Card,completed,1970-01-01T00:00:00Z\n"
        );

        Ok(())
    }

    #[test]
    fn payments_csv_quotes_every_column_that_needs_it() -> TestResult {
        let mut quoted = payment("BMP_A", None, 100);
        quoted.customer_email = Some("ada@example.com".to_string());
        quoted.method = Some("Card, \"Visa\"".to_string());

        let csv = payments_csv(&[quoted])?;

        assert!(csv.contains(",\"Card, \"\"Visa\"\"\",completed,"));

        Ok(())
    }

    #[test]
    fn empty_exports_have_only_headers() -> TestResult {
        assert_eq!(users_csv(&[])?, "Name,Email,Registration Date\n");
        assert_eq!(
            payments_csv(&[])?,
            "Reference,Customer,Amount,Method,Status,Date\n"
        );

        Ok(())
    }
}
