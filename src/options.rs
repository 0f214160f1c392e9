//! Sprite assembly options.
//!
//! All options exist at two levels: builder-wide defaults on
//! [`Options`], and per-call [`Overrides`] merged over them field by field.
//! The [`Clean`] and [`CopyAttrs`] rules keep the bool-or-list wire shape
//! used by config files:
//!
//! ```toml
//! clean_defs = true
//! clean_symbols = ["fill", "stroke"]
//! copy_attrs = false
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::dom::Element;

/// Attribute names preserved from every source root onto its symbol,
/// regardless of the `copy_attrs` rule.
pub const DEFAULT_COPY_ATTRS: &[&str] = &["viewBox", "aria-labelledby", "role"];

// ============================================================================
// Clean
// ============================================================================

/// Three-way attribute stripping rule for `<defs>` and symbol contents.
///
/// - `Off`: leave attributes untouched (default)
/// - `All`: strip every attribute
/// - `Names`: strip only the named attributes; an empty list strips nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Clean {
    #[default]
    Off,
    All,
    Names(Vec<String>),
}

impl Clean {
    /// Whether this rule strips the given attribute name.
    pub fn strips(&self, name: &str) -> bool {
        match self {
            Clean::Off => false,
            Clean::All => true,
            Clean::Names(names) => names.iter().any(|n| n == name),
        }
    }
}

impl Serialize for Clean {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Clean::Off => serializer.serialize_bool(false),
            Clean::All => serializer.serialize_bool(true),
            Clean::Names(names) => names.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Clean {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Names(Vec<String>),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Flag(false) => Clean::Off,
            Repr::Flag(true) => Clean::All,
            Repr::Names(names) => Clean::Names(names),
        })
    }
}

// ============================================================================
// CopyAttrs
// ============================================================================

/// Rule for copying attributes from a source root onto its symbol.
///
/// The [`DEFAULT_COPY_ATTRS`] set is always preserved. `Extend` adds names
/// on top of it; `All` copies everything the source root carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CopyAttrs {
    #[default]
    Defaults,
    All,
    Extend(Vec<String>),
}

impl CopyAttrs {
    /// Whether this rule copies the given attribute name.
    pub fn copies(&self, name: &str) -> bool {
        if DEFAULT_COPY_ATTRS.contains(&name) {
            return true;
        }
        match self {
            CopyAttrs::Defaults => false,
            CopyAttrs::All => true,
            CopyAttrs::Extend(extra) => extra.iter().any(|n| n == name),
        }
    }
}

impl Serialize for CopyAttrs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CopyAttrs::Defaults => serializer.serialize_bool(false),
            CopyAttrs::All => serializer.serialize_bool(true),
            CopyAttrs::Extend(extra) => extra.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CopyAttrs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Names(Vec<String>),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Flag(false) => CopyAttrs::Defaults,
            Repr::Flag(true) => CopyAttrs::All,
            Repr::Names(extra) => CopyAttrs::Extend(extra),
        })
    }
}

// ============================================================================
// Attribute patches
// ============================================================================

/// One attribute edit: set a fixed value, remove the attribute, or compute
/// the new value from the current one.
#[derive(Clone)]
pub enum AttrValue {
    Set(String),
    Remove,
    /// Receives the current value; returning `None` removes the attribute.
    Update(Arc<dyn Fn(Option<&str>) -> Option<String> + Send + Sync>),
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Set(v) => f.debug_tuple("Set").field(v).finish(),
            AttrValue::Remove => f.write_str("Remove"),
            AttrValue::Update(_) => f.write_str("Update(..)"),
        }
    }
}

/// An ordered set of attribute edits applied to one element.
#[derive(Debug, Clone, Default)]
pub struct AttrPatch {
    entries: Vec<(String, AttrValue)>,
}

impl AttrPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to a fixed value.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((name.into(), AttrValue::Set(value.into())));
        self
    }

    /// Remove `name`.
    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.entries.push((name.into(), AttrValue::Remove));
        self
    }

    /// Update `name` from its current value.
    pub fn update<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        self.entries.push((name.into(), AttrValue::Update(Arc::new(f))));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the edits to an element, in insertion order.
    pub(crate) fn apply(&self, el: &mut Element) {
        for (name, value) in &self.entries {
            match value {
                AttrValue::Set(v) => el.set_attr(name.clone(), v.clone()),
                AttrValue::Remove => {
                    el.remove_attr(name);
                }
                AttrValue::Update(f) => {
                    let next = f(el.attr(name));
                    match next {
                        Some(v) => el.set_attr(name.clone(), v),
                        None => {
                            el.remove_attr(name);
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Builder-wide sprite options. The default is fully permissive: no
/// cleaning, standalone output framing, default attribute copying only.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Attribute stripping applied to migrated `<defs>` contents.
    pub clean_defs: Clean,
    /// Attribute stripping applied to symbol contents.
    pub clean_symbols: Clean,
    /// Emit a bare `<svg>` fragment instead of a standalone document.
    pub inline: bool,
    /// Attribute edits applied to the output root.
    pub svg_attrs: AttrPatch,
    /// Attribute edits applied to each symbol.
    pub symbol_attrs: AttrPatch,
    /// Source-root attribute copy rule.
    pub copy_attrs: CopyAttrs,
}

/// Per-call option overrides, merged over the builder options field by
/// field.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub clean_defs: Option<Clean>,
    pub clean_symbols: Option<Clean>,
    pub inline: Option<bool>,
    pub svg_attrs: Option<AttrPatch>,
    pub symbol_attrs: Option<AttrPatch>,
    pub copy_attrs: Option<CopyAttrs>,
}

impl Options {
    /// Overlay per-call overrides onto these options.
    pub fn merged(&self, overrides: &Overrides) -> Options {
        Options {
            clean_defs: overrides
                .clean_defs
                .clone()
                .unwrap_or_else(|| self.clean_defs.clone()),
            clean_symbols: overrides
                .clean_symbols
                .clone()
                .unwrap_or_else(|| self.clean_symbols.clone()),
            inline: overrides.inline.unwrap_or(self.inline),
            svg_attrs: overrides
                .svg_attrs
                .clone()
                .unwrap_or_else(|| self.svg_attrs.clone()),
            symbol_attrs: overrides
                .symbol_attrs
                .clone()
                .unwrap_or_else(|| self.symbol_attrs.clone()),
            copy_attrs: overrides
                .copy_attrs
                .clone()
                .unwrap_or_else(|| self.copy_attrs.clone()),
        }
    }
}
