//! Assemble individual SVG documents into a single `<symbol>` sprite sheet.
//!
//! [`SpriteStore`] holds one parent document seeded from a
//! `<svg><defs/></svg>` template. Each [`SpriteStore::add`] call parses a
//! source SVG, merges its `<defs>` into the parent's, and appends the rest
//! of the source as a `<symbol>` under the given id.
//! [`SpriteStore::render`] serializes the sheet, either as a standalone
//! SVG 1.1 document (XML declaration, DOCTYPE, default namespaces) or as an
//! inline `<svg>` fragment.
//!
//! Attribute handling is configurable through [`Options`]: stripping rules
//! for `<defs>` and symbol contents ([`Clean`]), which source-root
//! attributes survive onto each symbol ([`CopyAttrs`]), and ordered
//! set/remove/update patches for the root and for symbols ([`AttrPatch`]).
//! Every option can be overridden per call with [`Overrides`].
//!
//! # Example
//!
//! ```
//! use svgsprite::SpriteStore;
//!
//! let mut store = SpriteStore::new();
//! store
//!     .add("check", r#"<svg viewBox="0 0 24 24"><path d="M4 12l5 5L20 6"/></svg>"#)?
//!     .add("cross", r#"<svg viewBox="0 0 24 24"><path d="M6 6l12 12M18 6L6 18"/></svg>"#)?;
//!
//! let sheet = store.render()?;
//! assert!(sheet.starts_with("<?xml"));
//! assert!(sheet.contains(r#"<symbol id="check" viewBox="0 0 24 24">"#));
//! # Ok::<(), svgsprite::Error>(())
//! ```

mod attrs;
pub mod dom;
mod error;
mod options;
mod store;

pub use error::Error;
pub use options::{AttrPatch, AttrValue, Clean, CopyAttrs, DEFAULT_COPY_ATTRS, Options, Overrides};
pub use store::SpriteStore;
