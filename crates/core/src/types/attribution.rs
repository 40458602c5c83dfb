//! Marketing attribution records and session reconciliation.
//!
//! An order form carries a `marketingData` attachment recording how the
//! customer arrived (UTM campaign parameters, camelCase keys). The session
//! service tracks the same three fields live, under snake_case names. Before
//! an item lands in the cart the two records are compared and, when they
//! disagree, the session's view is written back to the order so downstream
//! analytics attribute the cart activity correctly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marketing attribution stored on an order form.
///
/// Only the three UTM fields participate in reconciliation. Everything else
/// the attachment carries (coupons, marketing tags, custom fields) rides
/// along in `extra` and is preserved verbatim through a merge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utmi_campaign: Option<String>,
    /// Attachment fields outside the three tracked keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Session-tracked attribution, as the segment service reports it.
///
/// Field names are snake_case on the wire and pair one-to-one with the
/// camelCase fields on [`MarketingData`]. Session fields outside the tracked
/// trio (channel, currency, price tables) are carried in `extra` and ignored
/// by reconciliation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utmi_campaign: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// True when the order's stored attribution disagrees with the session's
/// current attribution on any of the three tracked UTM fields.
///
/// A missing order record compares as all-null, so it diverges from any
/// session that has at least one tracked field set. Equality is strict: no
/// case folding, no trimming, and absent never equals empty-string.
#[must_use]
pub fn is_divergent(order: Option<&MarketingData>, segment: &SegmentData) -> bool {
    let (utm_source, utm_campaign, utmi_campaign) = order.map_or((None, None, None), |m| {
        (
            m.utm_source.as_deref(),
            m.utm_campaign.as_deref(),
            m.utmi_campaign.as_deref(),
        )
    });

    utm_source != segment.utm_source.as_deref()
        || utm_campaign != segment.utm_campaign.as_deref()
        || utmi_campaign != segment.utmi_campaign.as_deref()
}

/// Overlay the session's tracked fields onto the order's attribution.
///
/// The session wins on all three tracked fields, including when its value is
/// absent; every other field already on the order is preserved unchanged.
/// The merge is one-way: nothing flows back into the session.
#[must_use]
pub fn merge_segment(order: Option<MarketingData>, segment: &SegmentData) -> MarketingData {
    let mut merged = order.unwrap_or_default();
    merged.utm_source = segment.utm_source.clone();
    merged.utm_campaign = segment.utm_campaign.clone();
    merged.utmi_campaign = segment.utmi_campaign.clone();
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn segment(source: &str, campaign: &str, internal: &str) -> SegmentData {
        SegmentData {
            utm_source: Some(source.to_owned()),
            utm_campaign: Some(campaign.to_owned()),
            utmi_campaign: Some(internal.to_owned()),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_absent_order_attribution_diverges() {
        assert!(is_divergent(None, &segment("a", "b", "c")));
    }

    #[test]
    fn test_absent_order_attribution_matches_empty_session() {
        assert!(!is_divergent(None, &SegmentData::default()));
    }

    #[test]
    fn test_matching_fields_do_not_diverge() {
        let order: MarketingData = serde_json::from_value(json!({
            "utmSource": "a",
            "utmCampaign": "b",
            "utmiCampaign": "c",
        }))
        .unwrap();
        assert!(!is_divergent(Some(&order), &segment("a", "b", "c")));
    }

    #[test]
    fn test_partial_order_attribution_diverges() {
        let order: MarketingData = serde_json::from_value(json!({
            "utmSource": "a",
        }))
        .unwrap();
        assert!(is_divergent(Some(&order), &segment("a", "b", "c")));
    }

    #[test]
    fn test_equality_is_strict() {
        let order: MarketingData = serde_json::from_value(json!({
            "utmSource": "",
            "utmCampaign": "b",
            "utmiCampaign": "c",
        }))
        .unwrap();
        // Empty string is not the same as an absent session field.
        let mut seg = segment("", "b", "c");
        assert!(!is_divergent(Some(&order), &seg));
        seg.utm_source = None;
        assert!(is_divergent(Some(&order), &seg));
    }

    #[test]
    fn test_single_field_mismatch_diverges() {
        let order: MarketingData = serde_json::from_value(json!({
            "utmSource": "a",
            "utmCampaign": "b",
            "utmiCampaign": "c",
        }))
        .unwrap();
        assert!(is_divergent(Some(&order), &segment("a", "B", "c")));
    }

    #[test]
    fn test_merge_session_wins_on_tracked_fields() {
        let order: MarketingData = serde_json::from_value(json!({
            "utmSource": "old-source",
            "utmCampaign": "old-campaign",
        }))
        .unwrap();
        let merged = merge_segment(Some(order), &segment("new-source", "new-campaign", "internal"));
        assert_eq!(merged.utm_source.as_deref(), Some("new-source"));
        assert_eq!(merged.utm_campaign.as_deref(), Some("new-campaign"));
        assert_eq!(merged.utmi_campaign.as_deref(), Some("internal"));
    }

    #[test]
    fn test_merge_preserves_untracked_fields() {
        let order: MarketingData = serde_json::from_value(json!({
            "utmSource": "old",
            "coupon": "WELCOME10",
            "marketingTags": ["newsletter"],
        }))
        .unwrap();
        let merged = merge_segment(Some(order), &segment("new", "camp", "int"));
        assert_eq!(merged.extra.get("coupon"), Some(&json!("WELCOME10")));
        assert_eq!(
            merged.extra.get("marketingTags"),
            Some(&json!(["newsletter"]))
        );
    }

    #[test]
    fn test_merge_absent_session_field_clears_tracked_field() {
        let order: MarketingData = serde_json::from_value(json!({
            "utmSource": "old",
            "utmCampaign": "old",
            "utmiCampaign": "old",
        }))
        .unwrap();
        let seg = SegmentData {
            utm_source: Some("new".to_owned()),
            ..SegmentData::default()
        };
        let merged = merge_segment(Some(order), &seg);
        assert_eq!(merged.utm_source.as_deref(), Some("new"));
        assert_eq!(merged.utm_campaign, None);
        assert_eq!(merged.utmi_campaign, None);
    }

    #[test]
    fn test_merge_from_no_attribution() {
        let merged = merge_segment(None, &segment("s", "c", "i"));
        assert_eq!(merged.utm_source.as_deref(), Some("s"));
        assert!(merged.extra.is_empty());
    }

    #[test]
    fn test_serialized_shape_uses_camel_case_and_omits_absent() {
        let merged = merge_segment(
            None,
            &SegmentData {
                utm_source: Some("s".to_owned()),
                ..SegmentData::default()
            },
        );
        let value = serde_json::to_value(&merged).unwrap();
        assert_eq!(value, json!({ "utmSource": "s" }));
    }

    #[test]
    fn test_null_wire_fields_deserialize_as_absent() {
        let order: MarketingData = serde_json::from_value(json!({
            "utmSource": null,
            "utmCampaign": "b",
        }))
        .unwrap();
        assert_eq!(order.utm_source, None);
        assert!(!order.extra.contains_key("utmSource"));
    }
}
