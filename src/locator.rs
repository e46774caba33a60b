//! Locator descriptors and ordered fallback sets
//!
//! WhatsApp Web churns its DOM attributes between releases, so no single
//! selector stays reliable. A [`LocatorSet`] names one logical target ("the
//! message input box") and carries every way we know to find it, most
//! specific first. Resolution walks the set in order and the first hit wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single rule for finding one element in the live document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Descriptor {
    /// CSS selector match
    Css(String),
    /// Visible text content match
    Text(String),
    /// ARIA role, optionally narrowed by visible text
    Role {
        role: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// Attribute whose value contains the given fragment
    AttrContains { attr: String, fragment: String },
}

impl Descriptor {
    pub fn css(selector: impl Into<String>) -> Self {
        Descriptor::Css(selector.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Descriptor::Text(text.into())
    }

    pub fn role(role: impl Into<String>) -> Self {
        Descriptor::Role {
            role: role.into(),
            text: None,
        }
    }

    pub fn role_with_text(role: impl Into<String>, text: impl Into<String>) -> Self {
        Descriptor::Role {
            role: role.into(),
            text: Some(text.into()),
        }
    }

    pub fn attr_contains(attr: impl Into<String>, fragment: impl Into<String>) -> Self {
        Descriptor::AttrContains {
            attr: attr.into(),
            fragment: fragment.into(),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Css(selector) => write!(f, "css:{}", selector),
            Descriptor::Text(text) => write!(f, "text:{:?}", text),
            Descriptor::Role { role, text: None } => write!(f, "role:{}", role),
            Descriptor::Role {
                role,
                text: Some(text),
            } => write!(f, "role:{}[text={:?}]", role, text),
            Descriptor::AttrContains { attr, fragment } => {
                write!(f, "attr:{}*={:?}", attr, fragment)
            }
        }
    }
}

/// Ordered, non-empty list of equivalent descriptors for one logical target
///
/// Order encodes preference: the first descriptor that matches wins and the
/// rest are never evaluated. There is no scoring and no "best match" -
/// predictable behavior over optimality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorSet {
    target: String,
    descriptors: Vec<Descriptor>,
}

impl LocatorSet {
    /// Create a set with its first (most preferred) descriptor
    ///
    /// Non-emptiness is guaranteed by construction; add fallbacks with
    /// [`LocatorSet::or`].
    pub fn new(target: impl Into<String>, first: Descriptor) -> Self {
        LocatorSet {
            target: target.into(),
            descriptors: vec![first],
        }
    }

    /// Append a less-preferred fallback descriptor
    pub fn or(mut self, descriptor: Descriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Build a set from an existing descriptor list
    ///
    /// Fails on an empty list; prefer [`LocatorSet::new`] plus
    /// [`LocatorSet::or`] for statically-known sets.
    pub fn from_vec(target: impl Into<String>, descriptors: Vec<Descriptor>) -> anyhow::Result<Self> {
        let target = target.into();
        if descriptors.is_empty() {
            anyhow::bail!("Locator set for '{}' must have at least one descriptor", target);
        }
        Ok(LocatorSet {
            target,
            descriptors,
        })
    }

    /// Human-readable name of the logical target
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Descriptors in preference order
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }
}

impl fmt::Display for LocatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.target)?;
        for (i, descriptor) in self.descriptors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", descriptor)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod locator_test;
