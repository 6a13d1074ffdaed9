//! Affine transform helpers and the `transform` attribute parser.
//!
//! Coefficients follow the `[a, b, c, d, e, f]` convention, mapping
//! `(x, y) -> (a*x + c*y + e, b*x + d*y + f)`.

use crate::foundation::core::{Affine, BoundingBox};
use crate::foundation::error::{LogofitError, LogofitResult};

/// Compose `parent` then `child`: the child's coordinates are mapped by `child` first.
#[inline]
pub fn compose(parent: Affine, child: Affine) -> Affine {
    parent * child
}

/// The identity transform `[1, 0, 0, 1, 0, 0]`.
#[inline]
pub fn identity() -> Affine {
    Affine::IDENTITY
}

/// Axis-aligned box of `bbox` mapped through `m` (min/max of the four transformed corners).
pub fn transform_box(bbox: &BoundingBox, m: Affine) -> BoundingBox {
    bbox.transform(m)
}

/// Rotation by `deg` degrees around `(cx, cy)`, folded into a single matrix
/// `translate(cx, cy) * rotate(deg) * translate(-cx, -cy)`.
pub fn rotate_about(deg: f64, cx: f64, cy: f64) -> Affine {
    let (sin, cos) = deg.to_radians().sin_cos();
    Affine::new([
        cos,
        sin,
        -sin,
        cos,
        cx - cx * cos + cy * sin,
        cy - cx * sin - cy * cos,
    ])
}

/// Parse an SVG `transform` list into a single matrix.
///
/// Operations are folded left to right: `M = M * op` for each op, so
/// `translate(10,20) scale(2)` scales first, then translates.
pub fn parse_transform(src: &str) -> LogofitResult<Affine> {
    let mut acc = identity();
    let mut rest = src.trim();

    while !rest.is_empty() {
        let Some(open) = rest.find('(') else {
            return Err(LogofitError::malformed(format!(
                "transform: expected '(' in {src:?}"
            )));
        };
        let name = rest[..open].trim().trim_start_matches(',').trim();
        let after = &rest[open + 1..];
        let Some(close) = after.find(')') else {
            return Err(LogofitError::malformed(format!(
                "transform: unclosed '(' in {src:?}"
            )));
        };
        let args = parse_args(&after[..close])
            .map_err(|arg| LogofitError::malformed(format!("transform: bad number {arg:?}")))?;

        acc = compose(acc, transform_op(name, &args)?);
        rest = after[close + 1..].trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    }

    Ok(acc)
}

fn transform_op(name: &str, args: &[f64]) -> LogofitResult<Affine> {
    let arity_err = |expected: &str| {
        LogofitError::malformed(format!(
            "transform: {name} expects {expected} argument(s), got {}",
            args.len()
        ))
    };

    let op = match name {
        "matrix" => match args {
            [a, b, c, d, e, f] => Affine::new([*a, *b, *c, *d, *e, *f]),
            _ => return Err(arity_err("6")),
        },
        "translate" => match args {
            [tx] => Affine::translate((*tx, 0.0)),
            [tx, ty] => Affine::translate((*tx, *ty)),
            _ => return Err(arity_err("1 or 2")),
        },
        "scale" => match args {
            [s] => Affine::scale(*s),
            [sx, sy] => Affine::scale_non_uniform(*sx, *sy),
            _ => return Err(arity_err("1 or 2")),
        },
        "rotate" => match args {
            [deg] => rotate_about(*deg, 0.0, 0.0),
            [deg, cx, cy] => rotate_about(*deg, *cx, *cy),
            _ => return Err(arity_err("1 or 3")),
        },
        "skewX" => match args {
            [deg] => Affine::new([1.0, 0.0, deg.to_radians().tan(), 1.0, 0.0, 0.0]),
            _ => return Err(arity_err("1")),
        },
        "skewY" => match args {
            [deg] => Affine::new([1.0, deg.to_radians().tan(), 0.0, 1.0, 0.0, 0.0]),
            _ => return Err(arity_err("1")),
        },
        other => {
            return Err(LogofitError::malformed(format!(
                "transform: unknown function {other:?}"
            )));
        }
    };
    Ok(op)
}

fn parse_args(inner: &str) -> Result<Vec<f64>, String> {
    inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(s.to_owned()),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/vector/transform.rs"]
mod tests;
