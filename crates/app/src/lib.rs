//! Storefront client: backend API, local storage and the services that reconcile them.

pub mod api;
pub mod config;
pub mod context;
pub mod logging;
pub mod services;
pub mod storage;


mod wire;
