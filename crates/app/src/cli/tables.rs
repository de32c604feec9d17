//! Table rendering for command output

use storefront::{
    cart::{CartLine, CartTotals},
    customers::Customer,
    orders::Order,
    payments::PaymentRecord,
    pricing::money,
    products::Product,
    reconcile::{RecordSource, Sourced},
};
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

fn source_label(source: RecordSource) -> &'static str {
    match source {
        RecordSource::Remote => "server",
        RecordSource::Local => "local",
        RecordSource::LocalFallback => "local (offline)",
    }
}

fn finish(builder: Builder, amount_columns: &[usize]) -> String {
    let mut table: Table = builder.build();
    table.with(Style::modern_rounded());

    for &column in amount_columns {
        table.modify(Columns::new(column..=column), Alignment::right());
    }

    table.to_string()
}

pub(crate) fn products(products: &[Product]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Brand", "Category", "Price", "Stock"]);

    for product in products {
        let price = match product.original_price {
            Some(original) if original > product.price => {
                format!("{} (was {})", money(product.price), money(original))
            }
            _ => money(product.price).to_string(),
        };

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.brand.clone(),
            product.category.clone(),
            price,
            product.stock.to_string(),
        ]);
    }

    finish(builder, &[4, 5])
}

pub(crate) fn cart(lines: &[CartLine]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Key", "Item", "Variant", "Qty", "Price", "Total"]);

    for line in lines {
        let variant = [line.color.as_deref(), line.size.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" / ");

        builder.push_record([
            line.item_key.to_string(),
            format!("{} ({})", line.name, line.brand),
            variant,
            line.quantity.to_string(),
            money(line.unit_price).to_string(),
            money(line.line_total()).to_string(),
        ]);
    }

    finish(builder, &[3, 4, 5])
}

pub(crate) fn totals(totals: &CartTotals) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Subtotal".to_string(), totals.subtotal.to_string()]);

    if !totals.discount.is_zero() {
        builder.push_record(["Discount".to_string(), format!("-{}", totals.discount)]);
    }

    builder.push_record(["VAT (7.5%)".to_string(), totals.tax.to_string()]);
    builder.push_record([
        "Shipping".to_string(),
        if totals.shipping.is_zero() {
            "Free".to_string()
        } else {
            totals.shipping.to_string()
        },
    ]);
    builder.push_record(["Total".to_string(), totals.total.to_string()]);

    finish(builder, &[1])
}

pub(crate) fn orders(orders: &[&Sourced<Order>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Order", "Date", "Customer", "Items", "Total", "Status", "Source"]);

    for order in orders {
        builder.push_record([
            order.id.to_string(),
            order.created_on().to_string(),
            order
                .customer_name
                .clone()
                .unwrap_or_else(|| order.customer_email.clone()),
            order.items.len().to_string(),
            money(order.total).to_string(),
            order.status.to_string(),
            source_label(order.source).to_string(),
        ]);
    }

    finish(builder, &[3, 4])
}

pub(crate) fn payments(payments: &[&Sourced<PaymentRecord>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Reference", "Date", "Order", "Amount", "Method", "Status", "Source"]);

    for payment in payments {
        builder.push_record([
            payment.reference.to_string(),
            payment.date.strftime("%Y-%m-%d %H:%M").to_string(),
            payment
                .order_id
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            money(payment.amount).to_string(),
            payment.method.clone().unwrap_or_else(|| "Card".to_string()),
            payment.status.to_string(),
            source_label(payment.source).to_string(),
        ]);
    }

    finish(builder, &[3])
}

pub(crate) fn users(users: &[Sourced<Customer>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Name", "Email", "Registered", "Source"]);

    for user in users {
        builder.push_record([
            user.name.clone(),
            user.email.clone(),
            user.registration_date
                .map_or_else(|| "N/A".to_string(), |date| date.to_string()),
            source_label(user.source).to_string(),
        ]);
    }

    finish(builder, &[])
}
