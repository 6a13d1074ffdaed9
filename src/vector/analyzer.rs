use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    foundation::core::{Affine, BoundingBox},
    foundation::error::{LogofitError, LogofitResult},
    vector::transform::{compose, identity, parse_transform},
    vector::tree::{
        LengthAxis, NodeKind, VectorNode, intrinsic_box, parse_length, resolve_length, unit_length,
    },
};

/// Canvas size used when a document declares neither a `viewBox` nor a width/height.
pub const FALLBACK_CANVAS_SIZE: f64 = 100.0;

/// Structural description of a vector logo.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorAnalysis {
    /// Document element with its full subtree.
    pub root: VectorNode,
    /// Canvas rectangle declared by `viewBox`, or width/height, or the 100x100 fallback.
    pub canvas_box: BoundingBox,
    /// Union of every resolved shape box; `None` when the document draws nothing measurable.
    pub content_box: Option<BoundingBox>,
}

impl VectorAnalysis {
    /// Content box when there is one, otherwise the canvas box.
    pub fn bounding_box(&self) -> BoundingBox {
        self.content_box.unwrap_or(self.canvas_box)
    }

    /// Number of element nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        self.root.descendants().count()
    }
}

/// Parse vector markup into a node tree with resolved transforms and compute its boxes.
///
/// The tree is built bottom-up in a single streaming pass: an element is attached to its
/// parent when its end tag is seen, so every node is complete before it is moved.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn analyze_vector(bytes: &[u8]) -> LogofitResult<VectorAnalysis> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut open: Vec<VectorNode> = Vec::new();
    // User-space viewport of every open <svg>, innermost last.
    let mut viewports: Vec<BoundingBox> = Vec::new();
    let mut root: Option<VectorNode> = None;
    let mut canvas: Option<BoundingBox> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            LogofitError::malformed(format!("xml error near byte {}: {e}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(e) => {
                let (node, viewport) =
                    open_node(&e, open.last(), root.is_some(), viewports.last())?;
                if let Some(vp) = viewport {
                    canvas = canvas.or(Some(vp));
                    viewports.push(vp);
                }
                open.push(node);
            }
            Event::Empty(e) => {
                let (node, viewport) =
                    open_node(&e, open.last(), root.is_some(), viewports.last())?;
                canvas = canvas.or(viewport);
                close_node(node, &mut open, &mut root);
            }
            Event::End(_) => {
                let node = open
                    .pop()
                    .ok_or_else(|| LogofitError::malformed("unmatched end tag"))?;
                if node.name == "svg" {
                    viewports.pop();
                }
                close_node(node, &mut open, &mut root);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(unclosed) = open.last() {
        return Err(LogofitError::malformed(format!(
            "unclosed element <{}>",
            unclosed.name
        )));
    }
    let root = root.ok_or_else(|| LogofitError::malformed("document has no root element"))?;
    let canvas_box =
        canvas.ok_or_else(|| LogofitError::malformed("document has no root element"))?;

    let content_box = root.content_box();
    let analysis = VectorAnalysis {
        root,
        canvas_box,
        content_box,
    };
    tracing::debug!(
        nodes = analysis.node_count(),
        ?canvas_box,
        ?content_box,
        "vector analysis"
    );
    Ok(analysis)
}

/// Build a node; for `<svg>` elements also return the viewport its children see.
fn open_node(
    e: &BytesStart<'_>,
    parent: Option<&VectorNode>,
    root_seen: bool,
    outer: Option<&BoundingBox>,
) -> LogofitResult<(VectorNode, Option<BoundingBox>)> {
    let name = std::str::from_utf8(e.local_name().as_ref())
        .map_err(|_| LogofitError::malformed("element name is not utf-8"))?
        .to_owned();

    let is_document_element = parent.is_none();
    if is_document_element {
        if root_seen {
            return Err(LogofitError::malformed("multiple root elements"));
        }
        if name != "svg" {
            return Err(LogofitError::malformed(format!(
                "root element must be <svg>, found <{name}>"
            )));
        }
    }

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| LogofitError::malformed(format!("bad attribute: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|_| LogofitError::malformed("attribute name is not utf-8"))?
            .to_owned();
        let raw = std::str::from_utf8(&attr.value)
            .map_err(|_| LogofitError::malformed(format!("attribute {key} is not utf-8")))?;
        let value = quick_xml::escape::unescape(raw)
            .map_err(|e| LogofitError::malformed(format!("attribute {key}: {e}")))?
            .into_owned();
        attributes.push((key, value));
    }

    let (viewport, placement) = match (name == "svg", outer) {
        (false, _) => (None, identity()),
        (true, None) => (Some(canvas_box(&attributes)?), identity()),
        (true, Some(outer)) => {
            let (vp, m) = nested_viewport(&attributes, outer)?;
            (Some(vp), m)
        }
    };
    let shape_viewport = outer
        .copied()
        .unwrap_or_else(|| BoundingBox::from_size(FALLBACK_CANVAS_SIZE, FALLBACK_CANVAS_SIZE));

    let kind = NodeKind::from_element(&name, is_document_element);
    let local = match attr(&attributes, "transform") {
        Some(t) => parse_transform(t)?,
        None => identity(),
    };
    let parent_transform = parent.map_or_else(identity, |p| p.transform);

    let node = VectorNode {
        kind,
        intrinsic_box: intrinsic_box(kind, &attributes, &shape_viewport)?,
        transform: compose(compose(parent_transform, local), placement),
        name,
        attributes,
        children: Vec::new(),
    };
    Ok((node, viewport))
}

fn close_node(node: VectorNode, open: &mut [VectorNode], root: &mut Option<VectorNode>) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn canvas_box(attrs: &[(String, String)]) -> LogofitResult<BoundingBox> {
    if let Some(vb) = attr(attrs, "viewBox").map(parse_view_box).transpose()?.flatten() {
        return Ok(vb);
    }
    let width = dimension(attr(attrs, "width"))?;
    let height = dimension(attr(attrs, "height"))?;
    Ok(BoundingBox::from_size(
        width.unwrap_or(FALLBACK_CANVAS_SIZE),
        height.unwrap_or(FALLBACK_CANVAS_SIZE),
    ))
}

/// Viewport and placement of an inner `<svg>` inside `outer`.
///
/// The placement maps the inner user space into the outer one: `x`/`y` offset, then the
/// `viewBox` fit with the default `xMidYMid meet` policy. Clipping to the inner viewport is
/// not modelled.
fn nested_viewport(
    attrs: &[(String, String)],
    outer: &BoundingBox,
) -> LogofitResult<(BoundingBox, Affine)> {
    let length = |name: &str, axis: LengthAxis, default: f64| -> LogofitResult<f64> {
        Ok(match attr(attrs, name) {
            Some(v) => resolve_length(v, axis, outer)?.unwrap_or(default),
            None => default,
        })
    };
    let x = length("x", LengthAxis::Horizontal, 0.0)?;
    let y = length("y", LengthAxis::Vertical, 0.0)?;
    let w = length("width", LengthAxis::Horizontal, outer.width)?.max(0.0);
    let h = length("height", LengthAxis::Vertical, outer.height)?.max(0.0);

    match attr(attrs, "viewBox").map(parse_view_box).transpose()?.flatten() {
        Some(vb) => {
            let k = (w / vb.width).min(h / vb.height);
            let tx = x + (w - vb.width * k) * 0.5 - vb.x * k;
            let ty = y + (h - vb.height * k) * 0.5 - vb.y * k;
            Ok((vb, Affine::new([k, 0.0, 0.0, k, tx, ty])))
        }
        None => Ok((BoundingBox::from_size(w, h), Affine::translate((x, y)))),
    }
}

/// `Ok(None)` for a well-formed viewBox with a non-positive size, which is ignored.
fn parse_view_box(raw: &str) -> LogofitResult<Option<BoundingBox>> {
    let nums = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_length)
        .collect::<LogofitResult<Vec<_>>>()?;
    match nums.as_slice() {
        [x, y, w, h] if *w > 0.0 && *h > 0.0 => Ok(Some(BoundingBox::new(*x, *y, *w, *h))),
        [_, _, _, _] => {
            tracing::debug!(view_box = raw, "ignoring viewBox with non-positive size");
            Ok(None)
        }
        _ => Err(LogofitError::malformed(format!(
            "viewBox needs 4 numbers, got {raw:?}"
        ))),
    }
}

fn dimension(raw: Option<&str>) -> LogofitResult<Option<f64>> {
    match raw.map(str::trim) {
        None => Ok(None),
        // Percentages are relative to an outer viewport this document does not have.
        Some(s) if s.ends_with('%') => Ok(None),
        Some(s) => Ok(unit_length(s)?.filter(|v| *v > 0.0)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/vector/analyzer.rs"]
mod tests;
