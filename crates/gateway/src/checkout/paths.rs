//! Endpoint URL builders for the order-management API.
//!
//! All path construction lives here so the client methods read as
//! operation, payload, done. Builders join against the configured base URL,
//! which is expected to be a host root (`https://checkout.example/`).

use driftline_core::OrderFormId;
use url::Url;

use crate::error::Result;

/// The three attachment sections the gateway writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    MarketingData,
    ClientProfileData,
    PaymentData,
}

impl Attachment {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MarketingData => "marketingData",
            Self::ClientProfileData => "clientProfileData",
            Self::PaymentData => "paymentData",
        }
    }
}

pub fn order_form(base: &Url) -> Result<Url> {
    Ok(base.join("api/checkout/pub/orderForm")?)
}

pub fn orders(base: &Url) -> Result<Url> {
    Ok(base.join("api/checkout/pub/orders")?)
}

pub fn shipping_simulation(base: &Url) -> Result<Url> {
    Ok(base.join("api/checkout/pub/orderForms/simulation")?)
}

pub fn add_item(base: &Url, order_form_id: &OrderFormId) -> Result<Url> {
    Ok(base.join(&format!("api/checkout/pub/orderForm/{order_form_id}/items"))?)
}

pub fn update_items(base: &Url, order_form_id: &OrderFormId) -> Result<Url> {
    Ok(base.join(&format!(
        "api/checkout/pub/orderForm/{order_form_id}/items/update"
    ))?)
}

pub fn attachment(base: &Url, order_form_id: &OrderFormId, section: Attachment) -> Result<Url> {
    Ok(base.join(&format!(
        "api/checkout/pub/orderForm/{order_form_id}/attachments/{}",
        section.as_str()
    ))?)
}

pub fn profile(base: &Url, order_form_id: &OrderFormId) -> Result<Url> {
    Ok(base.join(&format!("api/checkout/pub/orderForm/{order_form_id}/profile"))?)
}

pub fn custom_data(
    base: &Url,
    order_form_id: &OrderFormId,
    app_id: &str,
    field: &str,
) -> Result<Url> {
    Ok(base.join(&format!(
        "api/checkout/pub/orderForm/{order_form_id}/customData/{app_id}/{field}"
    ))?)
}

pub fn payment_token(base: &Url, order_form_id: &OrderFormId) -> Result<Url> {
    Ok(base.join(&format!(
        "api/checkout/pub/orderForm/{order_form_id}/paymentData/paymentToken"
    ))?)
}

pub fn cancel_order(base: &Url, order_form_id: &OrderFormId) -> Result<Url> {
    Ok(base.join(&format!(
        "api/checkout/pub/orders/{order_form_id}/user-cancel-request"
    ))?)
}
