//! Sprite store: merge individual SVG documents into one symbol sheet.

use log::debug;

use crate::attrs::{clean_descendants, copy_attributes};
use crate::dom::{Element, Node, parse_document, write_document};
use crate::error::Error;
use crate::options::{Options, Overrides};

/// XML declaration and SVG 1.1 DOCTYPE emitted in standalone mode.
const DOCTYPE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">";

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

const TAG_SVG: &str = "svg";
const TAG_DEFS: &str = "defs";
const TAG_SYMBOL: &str = "symbol";

/// Accumulates source SVG documents into a single sprite sheet.
///
/// The parent document starts as `<svg><defs/></svg>`. Every [`add`] merges
/// one source's `<defs>` into the parent's and appends the rest of the
/// source as a `<symbol>`; [`render`] serializes the sheet without mutating
/// it, so adds and renders may be interleaved freely.
///
/// Symbol ids are taken verbatim; uniqueness is the caller's concern.
///
/// [`add`]: SpriteStore::add
/// [`render`]: SpriteStore::render
pub struct SpriteStore {
    options: Options,
    root: Element,
}

impl Default for SpriteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteStore {
    /// Create an empty store with default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create an empty store with the given builder options.
    pub fn with_options(options: Options) -> Self {
        let mut root = Element::new(TAG_SVG);
        root.children.push(Node::Element(Element::new(TAG_DEFS)));
        Self { options, root }
    }

    /// The assembled sprite tree.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Number of symbols added so far.
    pub fn symbol_count(&self) -> usize {
        self.root
            .child_elements()
            .filter(|el| el.tag == TAG_SYMBOL)
            .count()
    }

    /// Whether no symbols have been added yet.
    pub fn is_empty(&self) -> bool {
        self.symbol_count() == 0
    }

    /// Add one source SVG document under the given symbol id.
    ///
    /// The source may carry an XML declaration and DOCTYPE. Fails only on
    /// ill-formed XML; a missing `<defs>`, a duplicate id, or absent copied
    /// attributes are all tolerated silently.
    pub fn add(&mut self, id: &str, source: &str) -> Result<&mut Self, Error> {
        let options = self.options.clone();
        self.add_merged(id, source, &options)
    }

    /// Add one source SVG document with per-call option overrides.
    pub fn add_with(
        &mut self,
        id: &str,
        source: &str,
        overrides: &Overrides,
    ) -> Result<&mut Self, Error> {
        let options = self.options.merged(overrides);
        self.add_merged(id, source, &options)
    }

    fn add_merged(&mut self, id: &str, source: &str, options: &Options) -> Result<&mut Self, Error> {
        let mut child = parse_document(source)?;

        // Migrate every <defs> block in the child, in document order, into
        // the parent's <defs>.
        let mut migrated = 0;
        while let Some(mut defs) = child.detach_first(TAG_DEFS) {
            clean_descendants(&mut defs, &options.clean_defs);
            migrated += defs.children.len();
            if let Some(parent_defs) = self.root.child_mut(TAG_DEFS) {
                parent_defs.children.append(&mut defs.children);
            }
        }

        // Rebuild the child root as a <symbol>. Inherited attributes only
        // survive through the copy rule.
        let mut symbol = Element::new(TAG_SYMBOL);
        symbol.set_attr("id", id);
        symbol.children = std::mem::take(&mut child.children);

        clean_descendants(&mut symbol, &options.clean_symbols);
        copy_attributes(&mut symbol, &child.attrs, &options.copy_attrs);
        // The caller-supplied id wins over any copied one.
        symbol.set_attr("id", id);
        options.symbol_attrs.apply(&mut symbol);

        debug!("added symbol '{id}' ({migrated} defs nodes migrated)");
        self.root.children.push(Node::Element(symbol));
        Ok(self)
    }

    /// Serialize the sprite with the builder options.
    ///
    /// A pure read: repeated renders yield identical output and never
    /// affect later adds.
    pub fn render(&self) -> Result<String, Error> {
        self.render_merged(&self.options)
    }

    /// Serialize the sprite with per-call option overrides.
    pub fn render_with(&self, overrides: &Overrides) -> Result<String, Error> {
        self.render_merged(&self.options.merged(overrides))
    }

    fn render_merged(&self, options: &Options) -> Result<String, Error> {
        debug!(
            "rendering sprite ({} symbols, inline: {})",
            self.symbol_count(),
            options.inline
        );

        // Work on a clone so the parent document stays untouched.
        let mut root = self.root.clone();
        options.svg_attrs.apply(&mut root);

        if options.inline {
            return write_document(&root);
        }

        // Standalone framing: default namespaces (an existing value wins)
        // plus the fixed declaration and DOCTYPE.
        if root.attr("xmlns").is_none() {
            root.set_attr("xmlns", SVG_NS);
        }
        if root.attr("xmlns:xlink").is_none() {
            root.set_attr("xmlns:xlink", XLINK_NS);
        }
        Ok(format!("{DOCTYPE}{}", write_document(&root)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{AttrPatch, Clean, CopyAttrs};

    const SVG_NS_OPEN: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">";

    const FOO: &str = r#"<svg viewBox="0 0 100 100"><defs><linearGradient style="fill: red;"/></defs><path style="fill: red;"/></svg>"#;
    const BAR: &str = r#"<svg viewBox="0 0 200 200"><defs><radialGradient style="stroke: red;"/></defs><rect style="stroke: red;"/></svg>"#;
    const BAZ: &str = r#"<svg viewBox="0 0 200 200"><defs><linearGradient style="fill: red;"/></defs><path style="fill: red;"/></svg>"#;
    const QUX: &str = r#"<svg viewBox="0 0 200 200"><defs><radialGradient style="stroke: red;" fill="blue"/></defs><rect style="stroke: red;" fill="blue"/></svg>"#;
    const QUUX: &str = r#"<svg viewBox="0 0 200 200" aria-labelledby="titleId" role="img"><title id="titleId">A boxy shape</title><rect/></svg>"#;
    const CORGE: &str = r#"<svg viewBox="0 0 200 200" aria-labelledby="titleId" role="img" preserveAspectRatio="xMinYMax" take-me-too="foo" count-me-out="bar"><title id="titleId">A boxy shape</title><rect/></svg>"#;

    fn with_prologue(body: &str) -> String {
        format!("{DOCTYPE}{body}")
    }

    #[test]
    fn test_empty_store_standalone() {
        let store = SpriteStore::new();
        let svg = store.render().unwrap();
        assert!(svg.starts_with("<?xml"));
        assert_eq!(svg, format!("{DOCTYPE}{SVG_NS_OPEN}<defs/></svg>"));
    }

    #[test]
    fn test_empty_store_inline() {
        let store = SpriteStore::new();
        let svg = store
            .render_with(&Overrides {
                inline: Some(true),
                ..Overrides::default()
            })
            .unwrap();
        assert_eq!(svg, "<svg><defs/></svg>");
    }

    #[test]
    fn test_combines_sources() {
        // Sources may carry their own declaration and DOCTYPE.
        let mut store = SpriteStore::new();
        store
            .add("foo", &with_prologue(FOO))
            .unwrap()
            .add("bar", &with_prologue(BAR))
            .unwrap();

        let expected = format!(
            "{DOCTYPE}{SVG_NS_OPEN}\
            <defs>\
            <linearGradient style=\"fill: red;\"/>\
            <radialGradient style=\"stroke: red;\"/>\
            </defs>\
            <symbol id=\"foo\" viewBox=\"0 0 100 100\"><path style=\"fill: red;\"/></symbol>\
            <symbol id=\"bar\" viewBox=\"0 0 200 200\"><rect style=\"stroke: red;\"/></symbol>\
            </svg>"
        );
        assert_eq!(store.render().unwrap(), expected);
    }

    #[test]
    fn test_clean_defs() {
        let mut store = SpriteStore::with_options(Options {
            clean_defs: Clean::All,
            ..Options::default()
        });
        store
            .add("foo", FOO)
            .unwrap()
            .add("bar", BAR)
            .unwrap()
            .add_with(
                "baz",
                BAZ,
                &Overrides {
                    clean_defs: Some(Clean::Names(Vec::new())),
                    ..Overrides::default()
                },
            )
            .unwrap()
            .add_with(
                "qux",
                QUX,
                &Overrides {
                    clean_defs: Some(Clean::Names(vec!["fill".to_string()])),
                    ..Overrides::default()
                },
            )
            .unwrap();

        let expected = format!(
            "{DOCTYPE}{SVG_NS_OPEN}\
            <defs>\
            <linearGradient/><radialGradient/>\
            <linearGradient style=\"fill: red;\"/>\
            <radialGradient style=\"stroke: red;\"/>\
            </defs>\
            <symbol id=\"foo\" viewBox=\"0 0 100 100\"><path style=\"fill: red;\"/></symbol>\
            <symbol id=\"bar\" viewBox=\"0 0 200 200\"><rect style=\"stroke: red;\"/></symbol>\
            <symbol id=\"baz\" viewBox=\"0 0 200 200\"><path style=\"fill: red;\"/></symbol>\
            <symbol id=\"qux\" viewBox=\"0 0 200 200\"><rect style=\"stroke: red;\" fill=\"blue\"/></symbol>\
            </svg>"
        );
        assert_eq!(store.render().unwrap(), expected);
    }

    #[test]
    fn test_clean_symbols() {
        let mut store = SpriteStore::with_options(Options {
            clean_symbols: Clean::All,
            ..Options::default()
        });
        store
            .add("foo", FOO)
            .unwrap()
            .add("bar", BAR)
            .unwrap()
            .add_with(
                "baz",
                BAZ,
                &Overrides {
                    clean_symbols: Some(Clean::Names(Vec::new())),
                    ..Overrides::default()
                },
            )
            .unwrap()
            .add_with(
                "qux",
                QUX,
                &Overrides {
                    clean_symbols: Some(Clean::Names(vec!["fill".to_string()])),
                    ..Overrides::default()
                },
            )
            .unwrap();

        let expected = format!(
            "{DOCTYPE}{SVG_NS_OPEN}\
            <defs>\
            <linearGradient style=\"fill: red;\"/>\
            <radialGradient style=\"stroke: red;\"/>\
            <linearGradient style=\"fill: red;\"/>\
            <radialGradient style=\"stroke: red;\" fill=\"blue\"/>\
            </defs>\
            <symbol id=\"foo\" viewBox=\"0 0 100 100\"><path/></symbol>\
            <symbol id=\"bar\" viewBox=\"0 0 200 200\"><rect/></symbol>\
            <symbol id=\"baz\" viewBox=\"0 0 200 200\"><path style=\"fill: red;\"/></symbol>\
            <symbol id=\"qux\" viewBox=\"0 0 200 200\"><rect style=\"stroke: red;\"/></symbol>\
            </svg>"
        );
        assert_eq!(store.render().unwrap(), expected);
    }

    #[test]
    fn test_default_copy_attrs() {
        let mut store = SpriteStore::new();
        store.add("quux", QUUX).unwrap();

        let expected = format!(
            "{DOCTYPE}{SVG_NS_OPEN}\
            <defs/>\
            <symbol id=\"quux\" viewBox=\"0 0 200 200\" aria-labelledby=\"titleId\" role=\"img\">\
            <title id=\"titleId\">A boxy shape</title><rect/>\
            </symbol>\
            </svg>"
        );
        assert_eq!(store.render().unwrap(), expected);
    }

    #[test]
    fn test_copy_attrs_extends_defaults() {
        let mut store = SpriteStore::with_options(Options {
            copy_attrs: CopyAttrs::Extend(vec![
                "preserveAspectRatio".to_string(),
                "take-me-too".to_string(),
                "role".to_string(),
            ]),
            ..Options::default()
        });
        store.add("corge", CORGE).unwrap();

        let expected = format!(
            "{DOCTYPE}{SVG_NS_OPEN}\
            <defs/>\
            <symbol id=\"corge\" viewBox=\"0 0 200 200\" aria-labelledby=\"titleId\" \
            role=\"img\" preserveAspectRatio=\"xMinYMax\" take-me-too=\"foo\">\
            <title id=\"titleId\">A boxy shape</title><rect/>\
            </symbol>\
            </svg>"
        );
        assert_eq!(store.render().unwrap(), expected);
    }

    #[test]
    fn test_symbol_attr_patch() {
        let mut store = SpriteStore::with_options(Options {
            inline: true,
            symbol_attrs: AttrPatch::new()
                .remove("viewBox")
                .update("id", |id| id.map(|v| format!("icon-{v}"))),
            ..Options::default()
        });
        store.add("foo", FOO).unwrap().add("bar", BAR).unwrap();

        let expected = "<svg>\
            <defs>\
            <linearGradient style=\"fill: red;\"/>\
            <radialGradient style=\"stroke: red;\"/>\
            </defs>\
            <symbol id=\"icon-foo\"><path style=\"fill: red;\"/></symbol>\
            <symbol id=\"icon-bar\"><rect style=\"stroke: red;\"/></symbol>\
            </svg>";
        assert_eq!(store.render().unwrap(), expected);
    }

    #[test]
    fn test_svg_attr_patch() {
        let mut store = SpriteStore::with_options(Options {
            inline: true,
            svg_attrs: AttrPatch::new()
                .set("id", "spritesheet")
                .set("style", "display: none"),
            ..Options::default()
        });
        store.add("foo", FOO).unwrap().add("bar", BAR).unwrap();

        let expected = "<svg id=\"spritesheet\" style=\"display: none\">\
            <defs>\
            <linearGradient style=\"fill: red;\"/>\
            <radialGradient style=\"stroke: red;\"/>\
            </defs>\
            <symbol id=\"foo\" viewBox=\"0 0 100 100\"><path style=\"fill: red;\"/></symbol>\
            <symbol id=\"bar\" viewBox=\"0 0 200 200\"><rect style=\"stroke: red;\"/></symbol>\
            </svg>";
        assert_eq!(store.render().unwrap(), expected);
    }

    #[test]
    fn test_svg_attrs_win_over_namespace_injection() {
        let mut store = SpriteStore::with_options(Options {
            svg_attrs: AttrPatch::new().set("xmlns", "urn:custom"),
            ..Options::default()
        });
        store.add("foo", FOO).unwrap();
        let svg = store.render().unwrap();
        assert!(svg.contains("xmlns=\"urn:custom\""));
        assert!(!svg.contains("http://www.w3.org/2000/svg"));
        assert!(svg.contains("xmlns:xlink=\"http://www.w3.org/1999/xlink\""));
    }

    #[test]
    fn test_render_is_pure() {
        let mut store = SpriteStore::new();
        store.add("foo", FOO).unwrap();

        let first = store.render().unwrap();
        let second = store.render().unwrap();
        assert_eq!(first, second);

        // Rendering (even with svg_attrs) must not leak into later adds.
        store
            .render_with(&Overrides {
                svg_attrs: Some(AttrPatch::new().set("id", "sheet")),
                ..Overrides::default()
            })
            .unwrap();
        store.add("bar", BAR).unwrap();
        let third = store.render().unwrap();
        assert!(!third.contains("id=\"sheet\""));
        assert_eq!(store.symbol_count(), 2);
    }

    #[test]
    fn test_add_returns_parse_error() {
        let mut store = SpriteStore::new();
        assert!(matches!(
            store.add("bad", "<svg><g></svg>"),
            Err(Error::Parse { .. })
        ));
        assert!(store.add("empty", "").is_err());
        // A failed add leaves the store usable.
        store.add("foo", FOO).unwrap();
        assert_eq!(store.symbol_count(), 1);
    }

    #[test]
    fn test_multiple_defs_blocks_all_migrated() {
        let mut store = SpriteStore::new();
        store
            .add(
                "multi",
                r#"<svg viewBox="0 0 10 10"><defs><linearGradient id="a"/></defs><rect/><defs><radialGradient id="b"/></defs></svg>"#,
            )
            .unwrap();

        let expected = format!(
            "{DOCTYPE}{SVG_NS_OPEN}\
            <defs><linearGradient id=\"a\"/><radialGradient id=\"b\"/></defs>\
            <symbol id=\"multi\" viewBox=\"0 0 10 10\"><rect/></symbol>\
            </svg>"
        );
        assert_eq!(store.render().unwrap(), expected);
    }

    #[test]
    fn test_missing_defs_tolerated() {
        let mut store = SpriteStore::new();
        store.add("quux", QUUX).unwrap();
        let svg = store.render().unwrap();
        assert!(svg.contains("<defs/>"));
    }

    #[test]
    fn test_duplicate_ids_tolerated() {
        let mut store = SpriteStore::new();
        store.add("dup", FOO).unwrap().add("dup", BAR).unwrap();
        assert_eq!(store.symbol_count(), 2);
    }

    #[test]
    fn test_accessors() {
        let mut store = SpriteStore::new();
        assert!(store.is_empty());
        assert_eq!(store.symbol_count(), 0);
        assert_eq!(store.root().tag, "svg");

        store.add("foo", FOO).unwrap();
        assert!(!store.is_empty());
        assert_eq!(store.symbol_count(), 1);
    }
}
