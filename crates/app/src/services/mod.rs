//! Client services
//!
//! Each service pairs the backend API with the local store and decides which one a caller sees.

pub mod accounts;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod payments;
