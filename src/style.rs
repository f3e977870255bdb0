//! SVG style cascade primitives.
//!
//! Only five presentation properties matter to the contract; everything else
//! an element declares is ignored. Inline `style="..."` declarations are
//! consulted first, then presentation attributes override them.

use std::collections::HashMap;

/// Attributes declared directly on one element, keyed by local name.
pub type AttrMap = HashMap<String, String>;

/// Inherited style in scope at one node. Keys are a subset of
/// [`TRACKED_PROPERTIES`].
pub type StyleMap = HashMap<String, String>;

/// The closed set of properties the contract checks. Nothing else is
/// carried through the cascade.
pub const TRACKED_PROPERTIES: [&str; 5] = [
    "fill",
    "stroke",
    "stroke-width",
    "stroke-opacity",
    "fill-opacity",
];

/// Parses a `style="k:v; k2:v2"` declaration. Empty segments are skipped,
/// segments without a colon are skipped, keys and values are trimmed.
pub fn parse_style_decl(s: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for part in s.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((k, v)) = part.split_once(':') else {
            continue;
        };
        out.insert(k.trim().to_string(), v.trim().to_string());
    }
    out
}

/// Builds the style an element declares itself, from its inline `style`
/// declaration and its presentation attributes. Presentation attributes win
/// over the inline declaration.
pub fn style_from_attrs(attrs: &AttrMap) -> StyleMap {
    let mut out = StyleMap::new();

    if let Some(decl) = attrs.get("style") {
        let parsed = parse_style_decl(decl);
        for key in TRACKED_PROPERTIES {
            if let Some(v) = parsed.get(key) {
                out.insert(key.to_string(), v.clone());
            }
        }
    }

    for key in TRACKED_PROPERTIES {
        if let Some(v) = attrs.get(key) {
            out.insert(key.to_string(), v.clone());
        }
    }

    out
}

/// Merges a child's declared style over the inherited parent style.
/// Returns an independent snapshot; neither input is mutated.
pub fn merge_styles(parent: &StyleMap, child: &StyleMap) -> StyleMap {
    let mut out = parent.clone();
    for (k, v) in child {
        out.insert(k.clone(), v.clone());
    }
    out
}

/// Whether this element hides itself: `display:none` or `visibility:hidden`,
/// via direct attribute or inline style. Either source suffices; ancestral
/// hidden state is the validator's concern, not this function's.
pub fn element_hidden(attrs: &AttrMap) -> bool {
    if attrs.get("display").is_some_and(|v| v.trim() == "none") {
        return true;
    }
    if attrs.get("visibility").is_some_and(|v| v.trim() == "hidden") {
        return true;
    }
    if let Some(decl) = attrs.get("style") {
        let parsed = parse_style_decl(decl);
        if parsed.get("display").is_some_and(|v| v.trim() == "none")
            || parsed.get("visibility").is_some_and(|v| v.trim() == "hidden")
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttrMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_style_decl_basic() {
        let s = parse_style_decl("fill:#ffffff; stroke : #000000 ;;not-a-pair; stroke-width:0.5");
        assert_eq!(s.get("fill").unwrap(), "#ffffff");
        assert_eq!(s.get("stroke").unwrap(), "#000000");
        assert_eq!(s.get("stroke-width").unwrap(), "0.5");
        assert!(!s.contains_key("not-a-pair"));
    }

    #[test]
    fn test_presentation_attrs_override_inline_style() {
        let a = attrs(&[("style", "stroke-width:0.5;fill:#abcdef"), ("stroke-width", "0.26458333")]);
        let s = style_from_attrs(&a);
        assert_eq!(s.get("stroke-width").unwrap(), "0.26458333");
        assert_eq!(s.get("fill").unwrap(), "#abcdef");
    }

    #[test]
    fn test_untracked_properties_dropped() {
        let a = attrs(&[("style", "opacity:0.5;fill:#ffffff"), ("transform", "rotate(45)")]);
        let s = style_from_attrs(&a);
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("fill").unwrap(), "#ffffff");
    }

    #[test]
    fn test_merge_child_overrides_parent() {
        let parent = attrs(&[("fill", "#111111"), ("stroke", "#000000")]);
        let child = attrs(&[("fill", "#ffffff")]);
        let merged = merge_styles(&parent, &child);
        assert_eq!(merged.get("fill").unwrap(), "#ffffff");
        assert_eq!(merged.get("stroke").unwrap(), "#000000");
        // snapshot, not a view
        assert_eq!(parent.get("fill").unwrap(), "#111111");
    }

    #[test]
    fn test_element_hidden_sources() {
        assert!(element_hidden(&attrs(&[("display", "none")])));
        assert!(element_hidden(&attrs(&[("visibility", " hidden ")])));
        assert!(element_hidden(&attrs(&[("style", "display:none")])));
        assert!(element_hidden(&attrs(&[("style", "fill:#fff;visibility:hidden")])));
        assert!(!element_hidden(&attrs(&[("display", "inline")])));
        assert!(!element_hidden(&attrs(&[("style", "visibility:visible")])));
        assert!(!element_hidden(&attrs(&[])));
    }
}
