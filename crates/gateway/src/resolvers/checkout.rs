//! Checkout query and mutation handlers.
//!
//! Most of these forward their arguments to exactly one checkout operation;
//! the one multi-step handler is [`add_item`], which settles marketing
//! attribution before the item lands in the cart.

use driftline_core::{MarketingData, OrderFormId, is_divergent, merge_segment};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::context::RequestContext;
use crate::error::{GatewayError, Result};
use crate::proxy::{HeaderSpec, HttpProxy};
use crate::resolvers::registry::HandlerFuture;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemsArgs {
    order_form_id: OrderFormId,
    items: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelOrderArgs {
    order_form_id: OrderFormId,
    reason: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomDataArgs {
    order_form_id: OrderFormId,
    app_id: String,
    field: String,
    value: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IgnoreProfileArgs {
    order_form_id: OrderFormId,
    ignore_profile_data: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentArgs {
    order_form_id: OrderFormId,
    payments: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileFieldsArgs {
    order_form_id: OrderFormId,
    fields: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShippingAddressArgs {
    order_form_id: OrderFormId,
    address: Value,
}

// ─────────────────────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn order_form(_parent: Value, _args: Value, ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { ctx.checkout().order_form().await })
}

pub(crate) fn orders(_parent: Value, _args: Value, ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { ctx.checkout().orders().await })
}

pub(crate) fn shipping(_parent: Value, args: Value, ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { ctx.checkout().shipping(args).await })
}

// ─────────────────────────────────────────────────────────────────────────────
// Mutations
// ─────────────────────────────────────────────────────────────────────────────

/// Add items to the order form, settling marketing attribution first.
///
/// The order form and the session's segment record are fetched concurrently;
/// either failure aborts the mutation before anything is written. When the
/// stored attribution diverges from the session's, the merged record is
/// persisted and awaited before the item add — persisting after the add
/// would race concurrent mutations, so the ordering is fixed.
pub(crate) fn add_item(_parent: Value, args: Value, ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move {
        let ItemsArgs {
            order_form_id,
            items,
        } = serde_json::from_value(args)?;

        let (current_form, segment) = tokio::try_join!(
            ctx.checkout().order_form(),
            ctx.session().get_segment_data()
        )?;

        let marketing: Option<MarketingData> = match current_form.get("marketingData") {
            None | Some(Value::Null) => None,
            Some(stored) => Some(serde_json::from_value(stored.clone())?),
        };

        if is_divergent(marketing.as_ref(), &segment) {
            let merged = merge_segment(marketing, &segment);
            ctx.checkout()
                .update_order_form_marketing_data(&order_form_id, &merged)
                .await?;
        }

        ctx.checkout().add_item(&order_form_id, items).await
    })
}

pub(crate) fn add_order_form_payment_token(
    _parent: Value,
    args: Value,
    ctx: RequestContext,
) -> HandlerFuture {
    Box::pin(async move { ctx.payment_tokens().add_payment_token(args).await })
}

pub(crate) fn cancel_order(_parent: Value, args: Value, ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move {
        let CancelOrderArgs {
            order_form_id,
            reason,
        } = serde_json::from_value(args)?;
        ctx.checkout().cancel_order(&order_form_id, &reason).await
    })
}

pub(crate) fn set_order_form_custom_data(
    _parent: Value,
    args: Value,
    ctx: RequestContext,
) -> HandlerFuture {
    Box::pin(async move {
        let CustomDataArgs {
            order_form_id,
            app_id,
            field,
            value,
        } = serde_json::from_value(args)?;
        ctx.checkout()
            .set_order_form_custom_data(&order_form_id, &app_id, &field, value)
            .await
    })
}

pub(crate) fn update_items(_parent: Value, args: Value, ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move {
        let ItemsArgs {
            order_form_id,
            items,
        } = serde_json::from_value(args)?;
        ctx.checkout().update_items(&order_form_id, items).await
    })
}

pub(crate) fn update_order_form_ignore_profile(
    _parent: Value,
    args: Value,
    ctx: RequestContext,
) -> HandlerFuture {
    Box::pin(async move {
        let IgnoreProfileArgs {
            order_form_id,
            ignore_profile_data,
        } = serde_json::from_value(args)?;
        ctx.checkout()
            .update_order_form_ignore_profile(&order_form_id, ignore_profile_data)
            .await
    })
}

pub(crate) fn update_order_form_payment(
    _parent: Value,
    args: Value,
    ctx: RequestContext,
) -> HandlerFuture {
    Box::pin(async move {
        let PaymentArgs {
            order_form_id,
            payments,
        } = serde_json::from_value(args)?;
        ctx.checkout()
            .update_order_form_payment(&order_form_id, payments)
            .await
    })
}

pub(crate) fn update_order_form_profile(
    _parent: Value,
    args: Value,
    ctx: RequestContext,
) -> HandlerFuture {
    Box::pin(async move {
        let ProfileFieldsArgs {
            order_form_id,
            fields,
        } = serde_json::from_value(args)?;
        ctx.checkout()
            .update_order_form_profile(&order_form_id, fields)
            .await
    })
}

/// Named alias: forwards `address` into the same profile-attachment call as
/// `updateOrderFormProfile`. Kept as-is to preserve observable behavior; see
/// DESIGN.md before changing.
pub(crate) fn update_order_form_shipping(
    _parent: Value,
    args: Value,
    ctx: RequestContext,
) -> HandlerFuture {
    Box::pin(async move {
        let ShippingAddressArgs {
            order_form_id,
            address,
        } = serde_json::from_value(args)?;
        ctx.checkout()
            .update_order_form_profile(&order_form_id, address)
            .await
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Declarative descriptors
// ─────────────────────────────────────────────────────────────────────────────

/// `createPaymentSession`: forwarded to the payment gateway over https.
pub(crate) fn create_payment_session(payments_url: &Url) -> Result<HttpProxy> {
    Ok(HttpProxy {
        method: Method::POST,
        url: payments_url.join("api/payments/pub/sessions")?,
        secure: true,
        enable_cookies: true,
        headers: HeaderSpec::JsonWithAuth,
        data: None,
    })
}

/// `createPaymentTokens`: tokenization call whose body is the `payments`
/// argument alone.
pub(crate) fn create_payment_tokens(payments_url: &Url) -> Result<HttpProxy> {
    Ok(HttpProxy {
        method: Method::POST,
        url: payments_url.join("api/payments/pub/payment-tokens")?,
        secure: false,
        enable_cookies: true,
        headers: HeaderSpec::JsonWithAuth,
        data: Some(payments_body),
    })
}

fn payments_body(args: &Value) -> Result<Value> {
    args.get("payments")
        .cloned()
        .ok_or(GatewayError::MissingArgument {
            operation: "createPaymentTokens",
            argument: "payments",
        })
}
