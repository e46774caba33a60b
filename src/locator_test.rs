// Unit tests for locator descriptors and sets

use super::*;

#[test]
fn test_set_preserves_order() {
    let set = LocatorSet::new("message input box", Descriptor::css("#primary"))
        .or(Descriptor::css(".fallback"))
        .or(Descriptor::text("Send a message"));

    let descriptors = set.descriptors();
    assert_eq!(descriptors.len(), 3);
    assert_eq!(descriptors[0], Descriptor::css("#primary"));
    assert_eq!(descriptors[1], Descriptor::css(".fallback"));
    assert_eq!(descriptors[2], Descriptor::text("Send a message"));
    assert_eq!(set.target(), "message input box");
}

#[test]
fn test_from_vec_rejects_empty() {
    let result = LocatorSet::from_vec("anything", vec![]);
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("anything"));
}

#[test]
fn test_from_vec_keeps_order() {
    let set = LocatorSet::from_vec(
        "search box",
        vec![Descriptor::css("a"), Descriptor::css("b")],
    )
    .unwrap();
    assert_eq!(set.descriptors()[0], Descriptor::css("a"));
    assert_eq!(set.descriptors()[1], Descriptor::css("b"));
}

#[test]
fn test_descriptor_display() {
    assert_eq!(
        Descriptor::css("div[role='button']").to_string(),
        "css:div[role='button']"
    );
    assert_eq!(Descriptor::text("Proceed").to_string(), "text:\"Proceed\"");
    assert_eq!(Descriptor::role("button").to_string(), "role:button");
    assert_eq!(
        Descriptor::role_with_text("button", "Proceed").to_string(),
        "role:button[text=\"Proceed\"]"
    );
    assert_eq!(
        Descriptor::attr_contains("title", "Attach").to_string(),
        "attr:title*=\"Attach\""
    );
}

#[test]
fn test_set_display_lists_descriptors() {
    let set = LocatorSet::new("attachment button", Descriptor::css("[data-testid=\"clip\"]"))
        .or(Descriptor::attr_contains("aria-label", "Attach"));
    let rendered = set.to_string();
    assert!(rendered.starts_with("attachment button ("));
    assert!(rendered.contains("css:[data-testid=\"clip\"]"));
    assert!(rendered.contains("attr:aria-label*=\"Attach\""));
}

#[test]
fn test_descriptor_equality() {
    assert_eq!(Descriptor::css("x"), Descriptor::css("x"));
    assert_ne!(Descriptor::css("x"), Descriptor::text("x"));
    assert_ne!(
        Descriptor::role("button"),
        Descriptor::role_with_text("button", "Proceed")
    );
}
