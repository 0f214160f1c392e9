//! Attribute cleaning and copying over element subtrees.

use crate::dom::Element;
use crate::options::{Clean, CopyAttrs};

/// Strip attributes from every element below `el` per the clean rule. The
/// element itself is left untouched.
pub(crate) fn clean_descendants(el: &mut Element, rule: &Clean) {
    if *rule == Clean::Off {
        return;
    }
    for child in el.child_elements_mut() {
        clean_subtree(child, rule);
    }
}

fn clean_subtree(el: &mut Element, rule: &Clean) {
    el.attrs.retain(|(name, _)| !rule.strips(name));
    for child in el.child_elements_mut() {
        clean_subtree(child, rule);
    }
}

/// Copy attributes from a source root's attribute list onto `dst` in
/// document order, per the copy rule.
pub(crate) fn copy_attributes(dst: &mut Element, src_attrs: &[(String, String)], rule: &CopyAttrs) {
    for (name, value) in src_attrs {
        if rule.copies(name) {
            dst.set_attr(name.clone(), value.clone());
        }
    }
}
