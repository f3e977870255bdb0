//! Style-Compliance Validator
//!
//! Walks an SVG document as a flat event stream and checks every *visible*
//! drawable element against the [`StyleContract`]. Two parallel stacks carry
//! the inherited state (visibility, style); a depth counter skips whole
//! subtrees that are hidden or live inside `<defs>`. Rule violations are
//! collected, never thrown - only unreadable or malformed input aborts.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contract::{StyleContract, FULL_OPACITY};
use crate::style::{self, AttrMap, StyleMap};
use crate::units::{close_enough, parse_number, parse_px_length};

/// Shape elements subject to the drawable style checks.
const DRAWABLE_TAGS: [&str; 7] = [
    "path", "rect", "circle", "ellipse", "polygon", "polyline", "line",
];

/// Reusable, non-rendered content. Nothing inside is validated.
const DEFS_TAG: &str = "defs";

/// One rule violation. A document can accumulate many; they are reported in
/// document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub file: String,
    pub line: usize,
    pub message: String,
}

impl Issue {
    fn new(file: &str, line: usize, message: String) -> Self {
        // Unknown positions are pinned to line 1 so log output stays sane.
        Self {
            file: file.to_string(),
            line: line.max(1),
            message,
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("xml parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
}

/// Validates SVG sources against one [`StyleContract`].
///
/// All state is local to a single call; one validator may be shared freely
/// across threads and documents.
pub struct SvgValidator {
    contract: StyleContract,
}

impl SvgValidator {
    pub fn new(contract: StyleContract) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> &StyleContract {
        &self.contract
    }

    /// Reads and validates one SVG file. The returned list is empty for a
    /// compliant document; a non-empty list is still a successful call.
    pub fn validate_file(&self, path: &Path) -> Result<Vec<Issue>, ValidateError> {
        let src = fs::read_to_string(path).map_err(|source| ValidateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.validate_source(&src, &path.to_string_lossy())
    }

    /// Validates SVG markup already in memory. `file` only labels issues.
    pub fn validate_source(&self, src: &str, file: &str) -> Result<Vec<Issue>, ValidateError> {
        let mut reader = Reader::from_str(src);
        // Self-closing tags become Start+End pairs, so every open event has
        // a matching close and the stacks track tree depth exactly.
        reader.config_mut().expand_empty_elements = true;

        let mut issues: Vec<Issue> = Vec::new();

        // Effective hidden state, starting at "not hidden".
        let mut hidden_stack: Vec<bool> = vec![false];

        // Inherited style in scope. Base entry is never popped.
        let mut style_stack: Vec<StyleMap> = vec![StyleMap::new()];

        // While > 0 we are inside a hidden or <defs> subtree and do no work
        // beyond keeping the stacks depth-aligned.
        let mut skip_depth: usize = 0;

        let mut seen_root_svg = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let line = line_of(src, reader.buffer_position() as usize);
                    let attrs = collect_attrs(&e)?;

                    let parent_hidden = hidden_stack.last().copied().unwrap_or(false);
                    let this_hidden = style::element_hidden(&attrs);
                    let effective_hidden = parent_hidden || this_hidden;

                    // Push exactly once per open, in every state.
                    hidden_stack.push(effective_hidden);

                    if skip_depth > 0 {
                        skip_depth += 1;
                        push_duplicate_top(&mut style_stack);
                        continue;
                    }

                    let tag = local_name(&e);

                    // Hidden subtrees and <defs> content are excluded
                    // together, before any style work happens.
                    if effective_hidden || tag == DEFS_TAG {
                        skip_depth = 1;
                        push_duplicate_top(&mut style_stack);
                        continue;
                    }

                    let own = style::style_from_attrs(&attrs);
                    let parent_style = style_stack.last().cloned().unwrap_or_default();
                    let effective = style::merge_styles(&parent_style, &own);
                    style_stack.push(effective.clone());

                    if !seen_root_svg && tag == "svg" {
                        seen_root_svg = true;
                        self.check_root_svg(file, line, &attrs, &mut issues);
                    }

                    match tag.as_str() {
                        "image" => issues.push(Issue::new(
                            file,
                            line,
                            "visible <image> found (reference artwork must be hidden)".to_string(),
                        )),
                        t if DRAWABLE_TAGS.contains(&t) => {
                            self.check_drawable(file, line, t, &effective, &mut issues);
                        }
                        _ => {}
                    }
                }

                Event::End(_) => {
                    if hidden_stack.len() > 1 {
                        hidden_stack.pop();
                    }
                    if style_stack.len() > 1 {
                        style_stack.pop();
                    }
                    if skip_depth > 0 {
                        skip_depth -= 1;
                    }
                }

                Event::Eof => break,

                _ => {}
            }
        }

        if !seen_root_svg {
            issues.push(Issue::new(
                file,
                1,
                "no <svg> root element found".to_string(),
            ));
        }

        Ok(issues)
    }

    /// The root canvas must be a square of the contract's pixel size.
    fn check_root_svg(&self, file: &str, line: usize, attrs: &AttrMap, issues: &mut Vec<Issue>) {
        let want = self.contract.canvas_size_px;
        let tol = self.contract.canvas_size_tol_px;

        let (w, h) = (attrs.get("width"), attrs.get("height"));
        let (Some(w), Some(h)) = (w, h) else {
            issues.push(Issue::new(
                file,
                line,
                "root <svg> missing width/height attributes".to_string(),
            ));
            return;
        };

        match (parse_px_length(w), parse_px_length(h)) {
            (Ok(wpx), Ok(hpx)) => {
                if !close_enough(wpx, want, tol) || !close_enough(hpx, want, tol) {
                    issues.push(Issue::new(
                        file,
                        line,
                        format!(
                            "root <svg> width/height must be {want}px/{want}px (got width={wpx}px height={hpx}px)"
                        ),
                    ));
                }
            }
            _ => issues.push(Issue::new(
                file,
                line,
                format!(
                    "root <svg> width/height must be {want}px/{want}px (got width={w:?} height={h:?})"
                ),
            )),
        }
    }

    /// Checks one visible shape against the contract. Every violation on the
    /// element is reported, not just the first.
    fn check_drawable(
        &self,
        file: &str,
        line: usize,
        name: &str,
        style: &StyleMap,
        issues: &mut Vec<Issue>,
    ) {
        let c = &self.contract;

        let get = |key: &str| style.get(key).map(String::as_str).unwrap_or("").trim();

        // Colors compare as normalized lowercase strings.
        let fill = get("fill").to_lowercase();
        let stroke = get("stroke").to_lowercase();

        if fill != c.fill {
            issues.push(Issue::new(
                file,
                line,
                format!("<{name}> fill must be {} (got {fill:?})", c.fill),
            ));
        }
        if stroke != c.stroke {
            issues.push(Issue::new(
                file,
                line,
                format!("<{name}> stroke must be {} (got {stroke:?})", c.stroke),
            ));
        }

        let sw = get("stroke-width");
        if sw.is_empty() {
            issues.push(Issue::new(file, line, format!("<{name}> missing stroke-width")));
        } else {
            match parse_number(sw) {
                Err(_) => issues.push(Issue::new(
                    file,
                    line,
                    format!("<{name}> invalid stroke-width {sw:?}"),
                )),
                Ok(v) if !close_enough(v, c.stroke_width, c.stroke_width_tol) => {
                    issues.push(Issue::new(
                        file,
                        line,
                        format!(
                            "<{name}> stroke-width must be {:.8} (got {v:.8})",
                            c.stroke_width
                        ),
                    ));
                }
                Ok(_) => {}
            }
        }

        for prop in ["stroke-opacity", "fill-opacity"] {
            let v = get(prop);
            if v.is_empty() {
                issues.push(Issue::new(file, line, format!("<{name}> missing {prop}")));
            } else {
                let ok = parse_number(v)
                    .map(|op| close_enough(op, FULL_OPACITY, c.opacity_tol))
                    .unwrap_or(false);
                if !ok {
                    issues.push(Issue::new(
                        file,
                        line,
                        format!("<{name}> {prop} must be 1 (got {v:?})"),
                    ));
                }
            }
        }
    }
}

impl Default for SvgValidator {
    fn default() -> Self {
        Self::new(StyleContract::default())
    }
}

/// Keeps the style stack depth-aligned without computing anything; the
/// duplicated entry is never consulted while skipping.
fn push_duplicate_top(style_stack: &mut Vec<StyleMap>) {
    let top = style_stack.last().cloned().unwrap_or_default();
    style_stack.push(top);
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned()
}

fn collect_attrs(e: &BytesStart) -> Result<AttrMap, ValidateError> {
    let mut out = AttrMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        out.insert(key, value);
    }
    Ok(out)
}

/// 1-based line of a byte offset into the source.
fn line_of(src: &str, byte_pos: usize) -> usize {
    let end = byte_pos.min(src.len());
    src.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_of() {
        let src = "a\nbb\nccc";
        assert_eq!(line_of(src, 0), 1);
        assert_eq!(line_of(src, 1), 1);
        assert_eq!(line_of(src, 2), 2);
        assert_eq!(line_of(src, 5), 3);
        assert_eq!(line_of(src, 999), 3);
    }

    #[test]
    fn test_issue_line_pinned_to_one() {
        let i = Issue::new("f.svg", 0, "msg".to_string());
        assert_eq!(i.line, 1);
    }
}
