//! Locator sets for the WhatsApp Web targets the scenarios touch
//!
//! Scenario data, not core design: each function names one logical target
//! and lists every selector generation we have seen for it, most stable
//! first. WhatsApp Web renames its `data-testid` hooks regularly, which is
//! why nothing here is a single selector.

use crate::locator::{Descriptor, LocatorSet};

/// The QR canvas shown when the session is not yet linked
pub fn qr_code() -> LocatorSet {
    LocatorSet::new(
        "QR code canvas",
        Descriptor::css(r#"canvas[aria-label="Scan me!"]"#),
    )
}

/// Interchangeable signals that login completed; raced, not chained
pub fn login_signals() -> Vec<Descriptor> {
    vec![
        Descriptor::css(r#"[data-testid="chat-list"]"#),
        Descriptor::css(r#"[data-testid="chat-list-search"]"#),
        Descriptor::css(r#"div[contenteditable="true"]"#),
    ]
}

/// The chat-list search box
pub fn search_box() -> LocatorSet {
    LocatorSet::new(
        "chat search box",
        Descriptor::css(r#"[data-testid="chat-list-search"]"#),
    )
    .or(Descriptor::css(r#"div[contenteditable="true"][data-tab="3"]"#))
    .or(Descriptor::css(r#"div[contenteditable="true"]"#))
}

/// A search result row for the given contact
pub fn contact_result(contact: &str) -> LocatorSet {
    LocatorSet::new(
        "contact search result",
        Descriptor::css(r#"[data-testid="cell-frame-container"]"#),
    )
    .or(Descriptor::attr_contains("title", contact))
    .or(Descriptor::css(r#"div[role="listitem"]"#))
}

/// The conversation compose box
pub fn message_box() -> LocatorSet {
    LocatorSet::new(
        "message input box",
        Descriptor::css(r#"[data-testid="conversation-compose-box-input"]"#),
    )
    .or(Descriptor::css(r#"div[contenteditable="true"][data-tab="10"]"#))
    .or(Descriptor::css(r#"div[contenteditable="true"]"#))
}

/// The bot's Proceed button
pub fn proceed_button() -> LocatorSet {
    LocatorSet::new(
        "Proceed button",
        Descriptor::role_with_text("button", "Proceed"),
    )
    .or(Descriptor::css(r#"div._ahef[role="button"]"#))
    .or(Descriptor::text("Proceed"))
}

/// Direct evidence that the bot rejected the last input
pub fn error_indicators() -> LocatorSet {
    LocatorSet::new(
        "validation error indicator",
        Descriptor::text("Please enter a valid name"),
    )
    .or(Descriptor::text("Invalid name format"))
    .or(Descriptor::text("Name should only contain letters"))
    .or(Descriptor::text("Please try again"))
    .or(Descriptor::text(
        "Please enter your FULL NAME ONLY as per your NRIC, without any numbers, symbols or images",
    ))
    .or(Descriptor::attr_contains("aria-label", "error"))
    .or(Descriptor::attr_contains("class", "error"))
}

/// Indirect evidence that the flow moved on past the name prompt
///
/// Lower-confidence by nature: "the conversation continued" is an inference,
/// not an error check. Callers must treat a hit here as a weaker signal than
/// a direct error indicator.
pub fn continuation_signals() -> LocatorSet {
    LocatorSet::new(
        "conversation continuation signal",
        Descriptor::text("Please submit your receipt as a proof of purchase"),
    )
    .or(Descriptor::text("Next step"))
    .or(Descriptor::text("Please upload"))
    .or(Descriptor::text("Proceed"))
}

/// The attachment (paperclip) button
pub fn attach_button() -> LocatorSet {
    LocatorSet::new("attachment button", Descriptor::css(r#"[data-testid="clip"]"#))
        .or(Descriptor::css(r#"span[data-icon="clip"]"#))
        .or(Descriptor::attr_contains("aria-label", "Attach"))
        .or(Descriptor::attr_contains("title", "Attach"))
}

/// The "Photos & Videos" entry in the attachment menu
pub fn photo_option() -> LocatorSet {
    LocatorSet::new(
        "photo upload option",
        Descriptor::role_with_text("menuitem", "Photos & Videos"),
    )
    .or(Descriptor::role_with_text("button", "Photos"))
    .or(Descriptor::text("Photos"))
    .or(Descriptor::css(r#"input[type="file"][accept*="image"]"#))
}

/// A bare file input, for when the menu click exposes one
pub fn file_input() -> LocatorSet {
    LocatorSet::new("file input", Descriptor::css(r#"input[type="file"]"#))
}

/// The send button for a staged attachment
pub fn send_button() -> LocatorSet {
    LocatorSet::new("send button", Descriptor::css(r#"[data-testid="send"]"#))
        .or(Descriptor::css(r#"span[data-icon="send"]"#))
}

/// The "Chat with Agent" hand-off button
pub fn agent_button() -> LocatorSet {
    LocatorSet::new(
        "Chat with Agent button",
        Descriptor::role_with_text("button", "Chat with Agent"),
    )
    .or(Descriptor::text("Chat with Agent"))
}
