//! Tests for the encoded query state

use super::state_codec::*;
use crate::{FilterOperator, FilterSpec, KindviewError, Limit, Query, ValueType};
use url::Url;

fn sample_query() -> Query {
    Query::new("User")
        .with_ancestor("Org(7)")
        .with_filter(FilterSpec::new(
            "age",
            FilterOperator::GreaterThan,
            ValueType::Long,
            "5",
        ))
        .with_limit(100)
}

// ============================================================================
// Encoding
// ============================================================================

mod encode_tests {
    use super::*;

    #[test]
    fn test_encode_document_shape() {
        assert_eq!(
            encode_state(&sample_query()),
            r#"{"kind":"User","ancestor":"Org(7)","filters":["age > Long(5)"],"limit":"100"}"#
        );
    }

    #[test]
    fn test_encode_omits_missing_ancestor() {
        let encoded = encode_state(&Query::new("User"));
        assert_eq!(encoded, r#"{"kind":"User","filters":[],"limit":""}"#);
    }

    #[test]
    fn test_encode_skips_inactive_and_unnamed_filters() {
        let query = Query::new("User")
            .with_filter(FilterSpec::new("a", FilterOperator::Equal, ValueType::Long, "1"))
            .with_filter(
                FilterSpec::new("b", FilterOperator::Equal, ValueType::Long, "2").with_active(false),
            )
            .with_filter(FilterSpec::new("", FilterOperator::Equal, ValueType::Long, "3"))
            .with_filter(FilterSpec::new("c", FilterOperator::LessThan, ValueType::Long, "4"));
        assert_eq!(
            encode_state(&query),
            r#"{"kind":"User","filters":["a = Long(1)","c < Long(4)"],"limit":""}"#
        );
    }

    #[test]
    fn test_encode_never_writes_count_flag() {
        let encoded = encode_state(&sample_query().as_count());
        assert!(!encoded.contains("count"));
    }
}

// ============================================================================
// Decoding
// ============================================================================

mod decode_tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let query = sample_query();
        assert_eq!(decode_state(&encode_state(&query)).unwrap(), query);
    }

    #[test]
    fn test_round_trip_drops_inactive_filters() {
        let query = sample_query().with_filter(
            FilterSpec::new("name", FilterOperator::Equal, ValueType::String, "x")
                .with_active(false),
        );
        let decoded = decode_state(&encode_state(&query)).unwrap();
        assert_eq!(decoded.filters.len(), 1);
        assert!(decoded.filters.iter().all(|f| f.active));
    }

    #[test]
    fn test_decode_numeric_limit() {
        let query = decode_state(r#"{"kind":"User","filters":[],"limit":25}"#).unwrap();
        assert_eq!(query.limit, Limit::new("25"));
    }

    #[test]
    fn test_decode_minimal_document() {
        let query = decode_state(r#"{"kind":"User"}"#).unwrap();
        assert_eq!(query.kind.as_deref(), Some("User"));
        assert!(query.ancestor.is_none());
        assert!(query.filters.is_empty());
        assert!(query.limit.is_empty());
    }

    #[test]
    fn test_decode_without_kind_is_not_runnable() {
        let query = decode_state(r#"{"filters":[],"limit":"10"}"#).unwrap();
        assert!(!query.is_runnable());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_state("not json").unwrap_err();
        assert!(matches!(err, KindviewError::Decode(_)));
    }

    #[test]
    fn test_decode_propagates_filter_parse_error() {
        let err =
            decode_state(r#"{"kind":"User","filters":["a = Long(1)","bad filter"],"limit":""}"#)
                .unwrap_err();
        assert!(matches!(err, KindviewError::Parse { ref input } if input == "bad filter"));
    }
}

// ============================================================================
// Fragments and links
// ============================================================================

mod fragment_tests {
    use super::*;

    #[test]
    fn test_fragment_round_trip() {
        let encoded = encode_state(&sample_query());
        let fragment = to_fragment(&encoded);
        assert!(!fragment.contains('{'));
        assert_eq!(from_fragment(&fragment).unwrap(), encoded);
        assert_eq!(from_fragment(&format!("#{}", fragment)).unwrap(), encoded);
    }

    #[test]
    fn test_fragment_accepts_bare_json() {
        let json = r#"{"kind":"User"}"#;
        assert_eq!(from_fragment(json).unwrap(), json);
    }

    #[test]
    fn test_fragment_rejects_empty() {
        assert!(matches!(from_fragment("#"), Err(KindviewError::Decode(_))));
    }

    #[test]
    fn test_share_link_round_trip() {
        let base = Url::parse("http://localhost:8080/db/").unwrap();
        let query = sample_query();
        let link = share_link(&base, &query);
        assert!(link.as_str().starts_with("http://localhost:8080/db/#"));

        let encoded = state_from_link(link.as_str()).unwrap();
        assert_eq!(decode_state(&encoded).unwrap(), query);
    }

    #[test]
    fn test_link_with_bare_json_fragment() {
        let encoded = state_from_link(r#"http://localhost:8080/#{"kind":"User"}"#).unwrap();
        assert_eq!(encoded, r#"{"kind":"User"}"#);
    }

    #[test]
    fn test_link_with_percent_encoded_json_fragment() {
        let link = "http://localhost:8080/#{%22kind%22:%22User%22,%22filters%22:[%22age%20%3E%20Long(5)%22],%22limit%22:%22100%22}";
        let query = state_from_link(link).and_then(|s| decode_state(&s)).unwrap();

        assert_eq!(query.kind.as_deref(), Some("User"));
        assert_eq!(query.limit.as_str(), "100");
        assert_eq!(query.filters.len(), 1);
        assert_eq!(
            query.filters[0],
            FilterSpec::new("age", FilterOperator::GreaterThan, ValueType::Long, "5")
        );
    }

    #[test]
    fn test_fragment_decodes_percent_escapes() {
        let json = r#"{"kind":"User"}"#;
        assert_eq!(from_fragment("%7B%22kind%22:%22User%22%7D").unwrap(), json);
    }

    #[test]
    fn test_link_without_fragment() {
        assert!(state_from_link("http://localhost:8080/db/").is_err());
        assert!(state_from_link("not a url").is_err());
    }
}
