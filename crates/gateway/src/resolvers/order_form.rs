//! `OrderForm` field resolvers.
//!
//! The backend document passes through as-is except for the members the
//! schema derives: the cache key and the normalized amounts.

use serde_json::Value;

use crate::checkout::conversions;
use crate::context::RequestContext;
use crate::resolvers::member;
use crate::resolvers::registry::HandlerFuture;

/// `OrderForm.cacheId`: the order form's natural key.
pub(crate) fn cache_id(parent: Value, _args: Value, _ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { Ok(member(&parent, "orderFormId")) })
}

/// `OrderForm.items`: line items with prices at the schema scale.
pub(crate) fn items(parent: Value, _args: Value, _ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { conversions::normalized_items(&parent) })
}

/// `OrderForm.value`: order total at the schema scale.
pub(crate) fn value(parent: Value, _args: Value, _ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { conversions::normalized_amount(&parent, "value") })
}
