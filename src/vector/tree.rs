use kurbo::{BezPath, Shape};

use crate::foundation::core::{Affine, BoundingBox, Point};
use crate::foundation::error::{LogofitError, LogofitResult};

/// Closed set of vector element kinds the analyzer understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The document element.
    Root,
    /// A container whose children inherit its transform.
    Group,
    /// `<path d="...">`.
    Path,
    /// `<rect>`.
    Rect,
    /// `<circle>`.
    Circle,
    /// `<ellipse>`.
    Ellipse,
    /// `<line>`.
    Line,
    /// `<polygon>`.
    Polygon,
    /// `<polyline>`.
    Polyline,
    /// `<text>`; glyph geometry is not resolved.
    Text,
    /// Anything else. Preserved in the tree, skipped for geometry.
    Other,
}

impl NodeKind {
    /// Map an element's local name to its kind. `is_document_element` marks the outermost element.
    pub fn from_element(local_name: &str, is_document_element: bool) -> Self {
        match local_name {
            "svg" if is_document_element => Self::Root,
            "svg" | "g" | "a" | "switch" => Self::Group,
            "path" => Self::Path,
            "rect" => Self::Rect,
            "circle" => Self::Circle,
            "ellipse" => Self::Ellipse,
            "line" => Self::Line,
            "polygon" => Self::Polygon,
            "polyline" => Self::Polyline,
            "text" => Self::Text,
            _ => Self::Other,
        }
    }

    /// `true` for kinds whose children can contribute geometry.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Root | Self::Group)
    }
}

/// One element of the parsed vector document.
///
/// Nodes are immutable once built. `transform` is already composed with every ancestor's
/// transform, so no parent links are needed to resolve geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorNode {
    /// Element kind.
    pub kind: NodeKind,
    /// Element local name as written in the document.
    pub name: String,
    /// Raw attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Untransformed geometry box, only for shape kinds with known geometry.
    pub intrinsic_box: Option<BoundingBox>,
    /// Parent transform composed with this node's own `transform` attribute.
    pub transform: Affine,
    /// Children in document order.
    pub children: Vec<VectorNode>,
}

impl VectorNode {
    /// Raw attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Intrinsic box mapped through the resolved transform.
    pub fn resolved_box(&self) -> Option<BoundingBox> {
        self.intrinsic_box.map(|b| b.transform(self.transform))
    }

    /// Union of every resolved box reachable through container ancestry, including `self`.
    ///
    /// Children of non-container kinds (`defs`, `clipPath`, `text`, ...) never contribute.
    pub fn content_box(&self) -> Option<BoundingBox> {
        let own = self.resolved_box();
        if !self.kind.is_container() {
            return own;
        }
        self.children
            .iter()
            .filter_map(VectorNode::content_box)
            .fold(own, |acc, b| match acc {
                Some(acc) => Some(acc.union(&b)),
                None => Some(b),
            })
    }

    /// Depth-first iterator over this node and all descendants, in document order.
    pub fn descendants(&self) -> impl Iterator<Item = &VectorNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Viewport dimension a percentage length refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LengthAxis {
    /// x, cx, width, rx, x1, x2.
    Horizontal,
    /// y, cy, height, ry, y1, y2.
    Vertical,
    /// r: the normalized diagonal, `sqrt((w^2 + h^2) / 2)`.
    Diagonal,
}

/// CSS absolute units at 96 px per inch.
pub(crate) const ABSOLUTE_UNITS: [(&str, f64); 5] = [
    ("mm", 96.0 / 25.4),
    ("cm", 96.0 / 2.54),
    ("in", 96.0),
    ("pt", 96.0 / 72.0),
    ("pc", 16.0),
];

// Relative to fonts or the host window; none of that is known here.
// "rem" and "vmin" are listed before their suffixes "em" and "in".
const CONTEXT_UNITS: [&str; 8] = ["rem", "em", "ex", "ch", "vmin", "vmax", "vw", "vh"];

/// Geometry box of a shape element before any transform is applied.
///
/// Percentages resolve against `viewport`, the nearest enclosing `<svg>`'s user-space box.
/// `Ok(None)` is also returned for shapes whose lengths use font or window relative units.
pub(crate) fn intrinsic_box(
    kind: NodeKind,
    attrs: &[(String, String)],
    viewport: &BoundingBox,
) -> LogofitResult<Option<BoundingBox>> {
    use LengthAxis::{Diagonal, Horizontal, Vertical};

    let num = |name: &str, axis: LengthAxis| -> LogofitResult<Option<f64>> {
        match attrs.iter().find(|(k, _)| k == name) {
            Some((_, v)) => resolve_length(v, axis, viewport),
            None => Ok(Some(0.0)),
        }
    };
    let unresolved = || -> LogofitResult<Option<BoundingBox>> {
        tracing::warn!(?kind, "shape uses context-relative lengths; geometry skipped");
        Ok(None)
    };

    let bbox = match kind {
        NodeKind::Rect => {
            let (Some(x), Some(y), Some(w), Some(h)) = (
                num("x", Horizontal)?,
                num("y", Vertical)?,
                num("width", Horizontal)?,
                num("height", Vertical)?,
            ) else {
                return unresolved();
            };
            if w < 0.0 || h < 0.0 {
                return Err(LogofitError::malformed("rect with negative size"));
            }
            Some(BoundingBox::new(x, y, w, h))
        }
        NodeKind::Circle => {
            let (Some(cx), Some(cy), Some(r)) =
                (num("cx", Horizontal)?, num("cy", Vertical)?, num("r", Diagonal)?)
            else {
                return unresolved();
            };
            if r < 0.0 {
                return Err(LogofitError::malformed("circle with negative radius"));
            }
            Some(BoundingBox::new(cx - r, cy - r, 2.0 * r, 2.0 * r))
        }
        NodeKind::Ellipse => {
            let (Some(cx), Some(cy), Some(rx), Some(ry)) = (
                num("cx", Horizontal)?,
                num("cy", Vertical)?,
                num("rx", Horizontal)?,
                num("ry", Vertical)?,
            ) else {
                return unresolved();
            };
            if rx < 0.0 || ry < 0.0 {
                return Err(LogofitError::malformed("ellipse with negative radius"));
            }
            Some(BoundingBox::new(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry))
        }
        NodeKind::Line => {
            let (Some(x1), Some(y1), Some(x2), Some(y2)) = (
                num("x1", Horizontal)?,
                num("y1", Vertical)?,
                num("x2", Horizontal)?,
                num("y2", Vertical)?,
            ) else {
                return unresolved();
            };
            Some(BoundingBox::from_corners(x1, y1, x2, y2))
        }
        NodeKind::Polygon | NodeKind::Polyline => {
            let points = attrs
                .iter()
                .find(|(k, _)| k == "points")
                .map(|(_, v)| parse_points(v))
                .transpose()?
                .unwrap_or_default();
            BoundingBox::from_points(points)
        }
        NodeKind::Path => match attrs.iter().find(|(k, _)| k == "d") {
            Some((_, d)) if !d.trim().is_empty() => {
                let path = BezPath::from_svg(d)
                    .map_err(|e| LogofitError::malformed(format!("invalid path data: {e}")))?;
                if path.elements().is_empty() {
                    None
                } else {
                    Some(BoundingBox::from(path.bounding_box()))
                }
            }
            _ => None,
        },
        NodeKind::Root
        | NodeKind::Group
        | NodeKind::Text
        | NodeKind::Other => None,
    };
    Ok(bbox)
}

/// Resolve an attribute length to user units, with percentages taken from `viewport`.
pub(crate) fn resolve_length(
    raw: &str,
    axis: LengthAxis,
    viewport: &BoundingBox,
) -> LogofitResult<Option<f64>> {
    let s = raw.trim();
    let Some(pct) = s.strip_suffix('%') else {
        return unit_length(s);
    };
    let base = match axis {
        LengthAxis::Horizontal => viewport.width,
        LengthAxis::Vertical => viewport.height,
        LengthAxis::Diagonal => {
            ((viewport.width * viewport.width + viewport.height * viewport.height) / 2.0).sqrt()
        }
    };
    Ok(Some(parse_length(pct)? / 100.0 * base))
}

/// Length with an optional unit suffix; `Ok(None)` for font or window relative units.
pub(crate) fn unit_length(raw: &str) -> LogofitResult<Option<f64>> {
    let s = raw.trim();
    if let Some(n) = CONTEXT_UNITS.iter().find_map(|u| s.strip_suffix(u)) {
        parse_length(n)?;
        return Ok(None);
    }
    match ABSOLUTE_UNITS
        .iter()
        .find_map(|&(unit, k)| s.strip_suffix(unit).map(|n| (n, k)))
    {
        Some((n, k)) => Ok(Some(parse_length(n)? * k)),
        None => parse_length(s).map(Some),
    }
}

/// Parse a plain user-space number, accepting an optional `px` suffix.
pub(crate) fn parse_length(raw: &str) -> LogofitResult<f64> {
    let s = raw.trim();
    let s = s.strip_suffix("px").unwrap_or(s).trim_end();
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LogofitError::malformed(format!("non-numeric length {raw:?}"))),
    }
}

fn parse_points(raw: &str) -> LogofitResult<Vec<Point>> {
    let nums = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_length)
        .collect::<LogofitResult<Vec<_>>>()?;
    if nums.len() % 2 != 0 {
        return Err(LogofitError::malformed("points list has an odd number of values"));
    }
    Ok(nums.chunks_exact(2).map(|p| Point::new(p[0], p[1])).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/vector/tree.rs"]
mod tests;
