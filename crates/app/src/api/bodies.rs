//! Request and response bodies

use serde::{Deserialize, Serialize};
use storefront::normalize::{WireCartLine, WireProduct};

#[derive(Debug, Serialize)]
pub(super) struct AddToCartBody<'a> {
    pub(super) product_id: &'a str,
    pub(super) quantity: u32,
    pub(super) size: Option<&'a str>,
    pub(super) color: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateCartBody<'a> {
    pub(super) item_key: &'a str,
    pub(super) quantity: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct ItemKeyBody<'a> {
    pub(super) item_key: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct EmailBody<'a> {
    pub(super) email: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct PromoBody<'a> {
    pub(super) code: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct RegisterBody<'a> {
    pub(super) name: &'a str,
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct LoginBody<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct StatusBody {
    pub(super) status: &'static str,
}

#[derive(Debug, Deserialize)]
pub(super) struct CartEnvelope {
    #[serde(default)]
    pub(super) cart: Vec<WireCartLine>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserEnvelope<U> {
    pub(super) user: U,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductEnvelope {
    pub(super) product: WireProduct,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub(super) error: Option<String>,

    #[serde(default)]
    pub(super) message: Option<String>,
}
