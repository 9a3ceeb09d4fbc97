//! Property-based tests for message field normalization
//!
//! Uses proptest to generate random inputs and verify properties

use chrono::{DateTime, Utc};
use limechat::shared::message::{parse_client_date, sentinel_date, truncate_chars, Message};
use limechat::shared::ClientFrame;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_truncate_chars_is_a_bounded_prefix(text in ".*", max in 0usize..40) {
        let cut = truncate_chars(&text, max);
        prop_assert!(text.starts_with(cut));
        prop_assert_eq!(cut.chars().count(), text.chars().count().min(max));
    }

    #[test]
    fn test_author_never_exceeds_limit(author in "\\PC{0,80}") {
        prop_assert!(truncate_chars(&author, 25).chars().count() <= 25);
    }

    #[test]
    fn test_epoch_millis_dates_round_trip(millis in 0i64..4_102_444_800_000) {
        let parsed = parse_client_date(&serde_json::json!(millis));
        prop_assert_eq!(parsed.map(|d| d.timestamp_millis()), Some(millis));
    }

    #[test]
    fn test_wire_date_keeps_milliseconds(millis in 0i64..4_102_444_800_000) {
        let date = DateTime::<Utc>::from_timestamp_millis(millis).unwrap();
        let message = Message::new(String::new(), String::new(), date);
        let value = serde_json::to_value(&message).unwrap();
        let wire = value["date"].as_str().unwrap();

        prop_assert!(wire.ends_with('Z'));
        let reparsed = parse_client_date(&value["date"]).unwrap();
        prop_assert_eq!(reparsed, date);
    }

    #[test]
    fn test_garbage_dates_fall_back_to_sentinel(raw in "[a-z ]{0,20}") {
        let date = parse_client_date(&serde_json::json!(raw)).unwrap_or_else(sentinel_date);
        prop_assert_eq!(date, sentinel_date());
    }

    #[test]
    fn test_non_object_frames_are_rejected(n in any::<i64>(), s in "[a-z]{0,10}") {
        prop_assert!(ClientFrame::parse(&n.to_string()).is_err());
        prop_assert!(ClientFrame::parse(&serde_json::json!(s).to_string()).is_err());
        prop_assert!(ClientFrame::parse(&serde_json::json!([s]).to_string()).is_err());
    }
}
