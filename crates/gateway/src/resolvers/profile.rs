//! `Profile`, `Address`, `PaymentProfile`, and `ProfileCustomField` field
//! resolvers.
//!
//! Cache keys project each entity's natural key. `birthDate` and
//! `customFields` reshape what the profile backend stores; the service-backed
//! fields (`addresses`, `payments`, `passwordLastUpdate`) fetch fresh from
//! the profile collaborator on every request.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde_json::{Value, json};

use crate::context::RequestContext;
use crate::error::{GatewayError, Result};
use crate::resolvers::member;
use crate::resolvers::registry::HandlerFuture;

pub(crate) fn cache_id(parent: Value, _args: Value, _ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { Ok(member(&parent, "email")) })
}

/// `Profile.birthDate`: normalized to a millisecond-precision UTC timestamp
/// when present; absent and null pass through unchanged.
pub(crate) fn birth_date(parent: Value, _args: Value, _ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { format_birth_date(&parent) })
}

/// `Profile.customFields`: the backend sometimes returns the field list as a
/// serialized string; project it to `{key, value}` pairs from the parent
/// document. Structured values pass through untouched.
pub(crate) fn custom_fields(parent: Value, _args: Value, _ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { Ok(project_custom_fields(&parent)) })
}

pub(crate) fn addresses(_parent: Value, _args: Value, ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { ctx.profile().get_addresses().await })
}

pub(crate) fn payments(_parent: Value, _args: Value, ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { ctx.profile().get_payments().await })
}

pub(crate) fn password_last_update(
    _parent: Value,
    _args: Value,
    ctx: RequestContext,
) -> HandlerFuture {
    Box::pin(async move { ctx.profile().get_password_last_update().await })
}

/// `Address.cacheId` and `Address.id`: both the address book key.
pub(crate) fn address_name(parent: Value, _args: Value, _ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { Ok(member(&parent, "addressName")) })
}

pub(crate) fn payment_profile_id(
    parent: Value,
    _args: Value,
    _ctx: RequestContext,
) -> HandlerFuture {
    Box::pin(async move { Ok(member(&parent, "id")) })
}

pub(crate) fn custom_field_key(parent: Value, _args: Value, _ctx: RequestContext) -> HandlerFuture {
    Box::pin(async move { Ok(member(&parent, "key")) })
}

/// The profile backend emits birth dates either as RFC 3339 timestamps or as
/// bare `YYYY-MM-DD` dates; both land as `…T00:00:00.000Z`-style UTC strings.
fn format_birth_date(parent: &Value) -> Result<Value> {
    let Some(raw) = parent.get("birthDate") else {
        return Ok(Value::Null);
    };
    match raw {
        Value::Null => Ok(Value::Null),
        Value::String(text) => {
            let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(text).map_or_else(
                |_| {
                    NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
                },
                |parsed| Ok(parsed.with_timezone(&Utc)),
            )
            .map_err(|_| GatewayError::UnexpectedShape {
                field: "birthDate".to_owned(),
                expected: "RFC 3339 timestamp or YYYY-MM-DD date",
            })?;
            Ok(Value::String(
                timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            ))
        }
        _ => Err(GatewayError::UnexpectedShape {
            field: "birthDate".to_owned(),
            expected: "RFC 3339 timestamp or YYYY-MM-DD date",
        }),
    }
}

fn project_custom_fields(parent: &Value) -> Value {
    match parent.get("customFields") {
        Some(Value::String(names)) => {
            let fields: Vec<Value> = names
                .split(',')
                .filter(|name| !name.is_empty())
                .filter_map(|name| {
                    parent
                        .get(name)
                        .map(|value| json!({ "key": name, "value": value }))
                })
                .collect();
            Value::Array(fields)
        }
        Some(structured) => structured.clone(),
        None => Value::Null,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_date_formats_rfc3339_input() {
        let parent = json!({"birthDate": "1990-04-02T12:30:00-03:00"});
        assert_eq!(
            format_birth_date(&parent).unwrap(),
            json!("1990-04-02T15:30:00.000Z")
        );
    }

    #[test]
    fn test_birth_date_formats_bare_date() {
        let parent = json!({"birthDate": "1990-04-02"});
        assert_eq!(
            format_birth_date(&parent).unwrap(),
            json!("1990-04-02T00:00:00.000Z")
        );
    }

    #[test]
    fn test_birth_date_passes_null_through() {
        assert_eq!(
            format_birth_date(&json!({"birthDate": null})).unwrap(),
            Value::Null
        );
        assert_eq!(format_birth_date(&json!({})).unwrap(), Value::Null);
    }

    #[test]
    fn test_birth_date_rejects_garbage() {
        let err = format_birth_date(&json!({"birthDate": "not a date"})).unwrap_err();
        assert!(matches!(err, GatewayError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_custom_fields_projects_comma_list() {
        let parent = json!({
            "customFields": "isNewsletterOptIn,preferredLocale",
            "isNewsletterOptIn": "true",
            "preferredLocale": "en-US",
            "email": "ana@example.com",
        });
        assert_eq!(
            project_custom_fields(&parent),
            json!([
                {"key": "isNewsletterOptIn", "value": "true"},
                {"key": "preferredLocale", "value": "en-US"},
            ])
        );
    }

    #[test]
    fn test_custom_fields_skips_names_missing_from_parent() {
        let parent = json!({
            "customFields": "isNewsletterOptIn,unknownField",
            "isNewsletterOptIn": "true",
        });
        assert_eq!(
            project_custom_fields(&parent),
            json!([{"key": "isNewsletterOptIn", "value": "true"}])
        );
    }

    #[test]
    fn test_custom_fields_structured_passes_through() {
        let structured = json!([{"key": "a", "value": "1"}]);
        let parent = json!({"customFields": structured.clone()});
        assert_eq!(project_custom_fields(&parent), structured);
    }
}
