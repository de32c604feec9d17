//! Storefront
//!
//! Storefront is the domain core of a retail shop client: catalog browsing, a cart with
//! promo-aware totals, checkout records, order and payment history, and reconciliation of
//! backend records with a locally cached copy.

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod customers;
mod ids;
pub mod normalize;
pub mod orders;
pub mod payments;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod reconcile;
pub mod session;
