//! Unit tests for pricing identifiers

use core_kernel::QuoteId;
use uuid::Uuid;

#[test]
fn test_new_generates_unique_ids() {
    assert_ne!(QuoteId::new(), QuoteId::new());
}

#[test]
fn test_display_uses_prefix() {
    let id = QuoteId::new();
    assert!(id.to_string().starts_with("QTE-"));
    assert_eq!(QuoteId::prefix(), "QTE");
}

#[test]
fn test_parse_with_and_without_prefix() {
    let uuid = Uuid::new_v4();
    let with_prefix: QuoteId = format!("QTE-{}", uuid).parse().unwrap();
    let bare: QuoteId = uuid.to_string().parse().unwrap();

    assert_eq!(with_prefix, bare);
    assert_eq!(*bare.as_uuid(), uuid);
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("QTE-not-a-uuid".parse::<QuoteId>().is_err());
}

#[test]
fn test_serde_is_transparent() {
    let id = QuoteId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", id.as_uuid()));

    let back: QuoteId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
