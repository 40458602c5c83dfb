//! Registry dispatch: every schema name resolves, unknown names do not, and
//! the declarative/alias behaviors hold through the full dispatch path.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use driftline_gateway::GatewayError;
use driftline_gateway::resolvers::ResolverRegistry;
use driftline_integration_tests::TestHarness;
use serde_json::{Value, json};
use url::Url;

fn registry() -> ResolverRegistry {
    ResolverRegistry::new(&Url::parse("http://payments.test.example/").unwrap()).unwrap()
}

/// Arguments that satisfy every registered mutation.
fn args_for(mutation: &str) -> Value {
    match mutation {
        "addItem" | "updateItems" => json!({"orderFormId": "of-1", "items": []}),
        "addOrderFormPaymentToken" => json!({"orderFormId": "of-1", "paymentToken": "tok"}),
        "cancelOrder" => json!({"orderFormId": "of-1", "reason": "changed my mind"}),
        "createPaymentSession" => json!({}),
        "createPaymentTokens" => json!({"payments": []}),
        "setOrderFormCustomData" => json!({
            "orderFormId": "of-1", "appId": "loyalty", "field": "tier", "value": "gold",
        }),
        "updateOrderFormIgnoreProfile" => json!({"orderFormId": "of-1", "ignoreProfileData": true}),
        "updateOrderFormPayment" => json!({"orderFormId": "of-1", "payments": []}),
        "updateOrderFormProfile" => json!({"orderFormId": "of-1", "fields": {}}),
        "updateOrderFormShipping" => json!({"orderFormId": "of-1", "address": {}}),
        other => panic!("no arguments defined for {other}"),
    }
}

/// A parent document that satisfies every registered field resolver.
fn parent_for(type_name: &str) -> Value {
    match type_name {
        "OrderForm" => json!({
            "orderFormId": "of-1",
            "value": 1000,
            "items": [{"price": 1000, "listPrice": 1000, "sellingPrice": 900}],
        }),
        "Profile" => json!({"email": "ana@example.com", "birthDate": "1990-04-02"}),
        "Address" => json!({"addressName": "home"}),
        "PaymentProfile" => json!({"id": "pay-1"}),
        "ProfileCustomField" => json!({"key": "preferredLocale"}),
        other => panic!("no parent defined for {other}"),
    }
}

#[tokio::test]
async fn test_every_registered_name_resolves() {
    let registry = registry();
    let harness = TestHarness::new();
    harness
        .checkout
        .serve_order_form(json!({"orderFormId": "of-1"}));
    let ctx = harness.context();

    let queries: Vec<_> = registry.query_names().collect();
    assert_eq!(queries.len(), 3);
    for name in queries {
        registry
            .execute_query(name, Value::Null, json!({}), &ctx)
            .await
            .unwrap_or_else(|e| panic!("query {name} failed: {e}"));
    }

    let mutations: Vec<_> = registry.mutation_names().collect();
    assert_eq!(mutations.len(), 11);
    for name in mutations {
        registry
            .execute_mutation(name, Value::Null, args_for(name), &ctx)
            .await
            .unwrap_or_else(|e| panic!("mutation {name} failed: {e}"));
    }

    let fields: Vec<_> = registry.field_names().collect();
    assert_eq!(fields.len(), 14);
    for (type_name, field) in fields {
        registry
            .execute_field(type_name, field, parent_for(type_name), json!({}), &ctx)
            .await
            .unwrap_or_else(|e| panic!("field {type_name}.{field} failed: {e}"));
    }
}

#[tokio::test]
async fn test_unknown_names_fail_without_touching_collaborators() {
    let registry = registry();
    let harness = TestHarness::new();
    let ctx = harness.context();

    let err = registry
        .execute_mutation("addGiftWrap", Value::Null, json!({}), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::UnknownResolver(ref name) if name == "Mutation.addGiftWrap"));

    let err = registry
        .execute_query("wishlist", Value::Null, json!({}), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::UnknownResolver(ref name) if name == "Query.wishlist"));

    let err = registry
        .execute_field("OrderForm", "giftWrap", json!({}), json!({}), &ctx)
        .await
        .unwrap_err();
    assert!(
        matches!(err, GatewayError::UnknownResolver(ref name) if name == "OrderForm.giftWrap")
    );

    assert!(harness.checkout.log.lock().unwrap().is_empty());
    assert_eq!(harness.session.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.http.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_shipping_mutation_aliases_the_profile_attachment() {
    let registry = registry();
    let harness = TestHarness::new();
    let ctx = harness.context();
    let address = json!({"street": "Rua A", "number": "52"});

    registry
        .execute_mutation(
            "updateOrderFormShipping",
            Value::Null,
            json!({"orderFormId": "of-1", "address": address}),
            &ctx,
        )
        .await
        .unwrap();
    registry
        .execute_mutation(
            "updateOrderFormProfile",
            Value::Null,
            json!({"orderFormId": "of-1", "fields": address}),
            &ctx,
        )
        .await
        .unwrap();

    // Both mutations land on the identical backend operation with the same
    // payload; see DESIGN.md for the product flag on this aliasing.
    let captured = harness.checkout.profile_args.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0], captured[1]);
    assert_eq!(
        *harness.checkout.log.lock().unwrap(),
        vec!["updateOrderFormProfile", "updateOrderFormProfile"]
    );
}

#[tokio::test]
async fn test_payment_session_descriptor_resolves_secure_with_auth() {
    let registry = registry();
    let harness = TestHarness::new();

    registry
        .execute_mutation(
            "createPaymentSession",
            Value::Null,
            json!({"customerId": "c-1"}),
            &harness.context(),
        )
        .await
        .unwrap();

    let requests = harness.http.requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request.method.as_str(), "POST");
    // The descriptor's http target upgrades to https.
    assert_eq!(
        request.url.as_str(),
        "https://payments.test.example/api/payments/pub/sessions"
    );
    assert!(
        request
            .headers
            .iter()
            .any(|(n, v)| n == "Authorization" && v == "Bearer test-token")
    );
    assert!(
        request
            .headers
            .iter()
            .any(|(n, v)| n == "Cookie" && v == "checkout.session=it-1")
    );
    assert_eq!(request.body, Some(json!({"customerId": "c-1"})));
}

#[tokio::test]
async fn test_payment_tokens_descriptor_maps_body_and_stays_plain() {
    let registry = registry();
    let harness = TestHarness::new();

    registry
        .execute_mutation(
            "createPaymentTokens",
            Value::Null,
            json!({"payments": [{"method": "card"}], "ignored": true}),
            &harness.context(),
        )
        .await
        .unwrap();

    let requests = harness.http.requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(
        request.url.as_str(),
        "http://payments.test.example/api/payments/pub/payment-tokens"
    );
    // Body is the payments argument alone.
    assert_eq!(request.body, Some(json!([{"method": "card"}])));
}

#[tokio::test]
async fn test_payment_tokens_descriptor_requires_payments_argument() {
    let registry = registry();
    let harness = TestHarness::new();

    let err = registry
        .execute_mutation(
            "createPaymentTokens",
            Value::Null,
            json!({}),
            &harness.context(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::MissingArgument { .. }));
    assert_eq!(harness.http.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_order_form_fields_normalize_amounts() {
    let registry = registry();
    let harness = TestHarness::new();
    let ctx = harness.context();
    let parent = json!({
        "orderFormId": "of-9",
        "value": 11440,
        "items": [
            {"id": "sku-1", "quantity": 1, "price": 10990, "listPrice": 12990, "sellingPrice": 10990},
            {"id": "sku-2", "quantity": 1, "price": 450, "listPrice": 450, "sellingPrice": 450},
        ],
    });

    let cache_id = registry
        .execute_field("OrderForm", "cacheId", parent.clone(), json!({}), &ctx)
        .await
        .unwrap();
    assert_eq!(cache_id, json!("of-9"));

    let value = registry
        .execute_field("OrderForm", "value", parent.clone(), json!({}), &ctx)
        .await
        .unwrap();
    assert_eq!(value, json!(114.40));

    let items = registry
        .execute_field("OrderForm", "items", parent, json!({}), &ctx)
        .await
        .unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["price"], json!(109.90));
    assert_eq!(items[0]["listPrice"], json!(129.90));
    assert_eq!(items[1]["sellingPrice"], json!(4.50));
    // Non-price members pass through unchanged.
    assert_eq!(items[0]["id"], json!("sku-1"));
}

#[tokio::test]
async fn test_profile_service_fields_hit_the_profile_collaborator() {
    let registry = registry();
    let harness = TestHarness::new();
    let ctx = harness.context();
    let parent = json!({"email": "ana@example.com"});

    let addresses = registry
        .execute_field("Profile", "addresses", parent.clone(), json!({}), &ctx)
        .await
        .unwrap();
    let address_alias = registry
        .execute_field("Profile", "address", parent.clone(), json!({}), &ctx)
        .await
        .unwrap();
    assert_eq!(addresses, address_alias);
    assert_eq!(harness.profile.address_calls.load(Ordering::SeqCst), 2);

    registry
        .execute_field("Profile", "payments", parent.clone(), json!({}), &ctx)
        .await
        .unwrap();
    assert_eq!(harness.profile.payment_calls.load(Ordering::SeqCst), 1);

    registry
        .execute_field("Profile", "passwordLastUpdate", parent, json!({}), &ctx)
        .await
        .unwrap();
    assert_eq!(harness.profile.password_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cache_ids_project_natural_keys() {
    let registry = registry();
    let harness = TestHarness::new();
    let ctx = harness.context();

    let cases = [
        ("Profile", "cacheId", json!({"email": "ana@example.com"}), json!("ana@example.com")),
        ("Address", "cacheId", json!({"addressName": "home"}), json!("home")),
        ("Address", "id", json!({"addressName": "home"}), json!("home")),
        ("PaymentProfile", "cacheId", json!({"id": "pay-1"}), json!("pay-1")),
        ("ProfileCustomField", "cacheId", json!({"key": "tier"}), json!("tier")),
    ];
    for (type_name, field, parent, expected) in cases {
        let resolved = registry
            .execute_field(type_name, field, parent, json!({}), &ctx)
            .await
            .unwrap();
        assert_eq!(resolved, expected, "{type_name}.{field}");
    }
}
