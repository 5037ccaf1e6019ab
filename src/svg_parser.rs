use anyhow::{Context, Result};
use kurbo::{Affine, BezPath, Cap, Join, PathEl, PathSeg, Point, Shape, Stroke, StrokeOpts};
use std::path::Path;
use usvg::{Options, Tree};

/// Flattening tolerance used when expanding strokes, in SVG user units.
const STROKE_TOLERANCE: f64 = 0.01;

/// The outline of one SVG icon, still in SVG (Y-down) coordinates
#[derive(Debug, Clone)]
pub struct IconOutline {
    /// Every filled or stroked shape of the icon merged into one path
    pub path: BezPath,
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
}

/// Parse a single SVG file into an outline
pub fn load_outline(path: &Path) -> Result<IconOutline> {
    let svg_content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_outline(&svg_content).with_context(|| format!("Failed to parse SVG: {}", path.display()))
}

pub fn parse_outline(svg: &str) -> Result<IconOutline> {
    let tree = Tree::from_str(svg, &Options::default())?;

    let size = tree.size();
    let mut combined = BezPath::new();
    collect_paths_recursive(tree.root(), &mut combined);

    Ok(IconOutline {
        path: combined,
        width: size.width() as f64,
        height: size.height() as f64,
    })
}

/// Recursively collect paths from a group and its children
fn collect_paths_recursive(group: &usvg::Group, combined: &mut BezPath) {
    for node in group.children() {
        match node {
            usvg::Node::Path(ref path) => {
                for el in path_outline(path).elements() {
                    combined.push(*el);
                }
            }
            usvg::Node::Group(ref g) => collect_paths_recursive(g, combined),
            _ => {}
        }
    }
}

/// Filled area plus expanded stroke of one usvg path, in canvas coordinates.
///
/// Every region leaves here with outer contours of negative area, so regions
/// from different fills, strokes and paths add up under non-zero filling
/// instead of cancelling where they overlap.
fn path_outline(path: &usvg::Path) -> BezPath {
    let local = usvg_path_to_kurbo(path.data());
    let t = path.abs_transform();
    let transform = Affine::new([
        t.sx as f64,
        t.ky as f64,
        t.kx as f64,
        t.sy as f64,
        t.tx as f64,
        t.ty as f64,
    ]);
    let mut outline = BezPath::new();

    if let Some(fill) = path.fill() {
        let mut filled = transform * local.clone();
        match fill.rule() {
            usvg::FillRule::EvenOdd => fix_evenodd_winding(&mut filled),
            usvg::FillRule::NonZero => orient_nonzero(&mut filled),
        }
        outline.extend(filled.iter());
    }

    if let Some(stroke) = path.stroke() {
        let style = Stroke::new(stroke.width().get() as f64)
            .with_join(match stroke.linejoin() {
                usvg::LineJoin::Round => Join::Round,
                usvg::LineJoin::Bevel => Join::Bevel,
                usvg::LineJoin::Miter | usvg::LineJoin::MiterClip => Join::Miter,
            })
            .with_miter_limit(stroke.miterlimit().get() as f64)
            .with_caps(match stroke.linecap() {
                usvg::LineCap::Butt => Cap::Butt,
                usvg::LineCap::Round => Cap::Round,
                usvg::LineCap::Square => Cap::Square,
            });
        let expanded = kurbo::stroke(
            local.iter(),
            &style,
            &StrokeOpts::default(),
            STROKE_TOLERANCE,
        );
        let mut expanded = transform * expanded;
        orient_nonzero(&mut expanded);
        outline.extend(expanded.iter());
    }

    outline
}

fn usvg_path_to_kurbo(data: &usvg::tiny_skia_path::Path) -> BezPath {
    use usvg::tiny_skia_path::PathSegment;

    let mut bez = BezPath::new();
    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(pt) => bez.move_to((pt.x as f64, pt.y as f64)),
            PathSegment::LineTo(pt) => bez.line_to((pt.x as f64, pt.y as f64)),
            PathSegment::QuadTo(p1, p2) => {
                bez.quad_to((p1.x as f64, p1.y as f64), (p2.x as f64, p2.y as f64))
            }
            PathSegment::CubicTo(p1, p2, p3) => bez.curve_to(
                (p1.x as f64, p1.y as f64),
                (p2.x as f64, p2.y as f64),
                (p3.x as f64, p3.y as f64),
            ),
            PathSegment::Close => bez.close_path(),
        }
    }
    bez
}

/// Split a BezPath into its sub-paths
fn split_into_contours(path: &BezPath) -> Vec<BezPath> {
    let mut contours: Vec<BezPath> = Vec::new();
    for el in path.elements() {
        match el {
            PathEl::MoveTo(p) => {
                let mut contour = BezPath::new();
                contour.move_to(*p);
                contours.push(contour);
            }
            _ => {
                if let Some(current) = contours.last_mut() {
                    current.push(*el);
                }
            }
        }
    }
    contours
}

/// Reverse the direction of a closed contour
fn reverse_contour(contour: &BezPath) -> BezPath {
    let segments: Vec<PathSeg> = contour.segments().collect();
    let mut reversed = BezPath::new();

    for (i, seg) in segments.iter().rev().map(PathSeg::reverse).enumerate() {
        match seg {
            PathSeg::Line(line) => {
                if i == 0 {
                    reversed.move_to(line.p0);
                }
                reversed.line_to(line.p1);
            }
            PathSeg::Quad(quad) => {
                if i == 0 {
                    reversed.move_to(quad.p0);
                }
                reversed.quad_to(quad.p1, quad.p2);
            }
            PathSeg::Cubic(cubic) => {
                if i == 0 {
                    reversed.move_to(cubic.p0);
                }
                reversed.curve_to(cubic.p1, cubic.p2, cubic.p3);
            }
        }
    }

    if !reversed.elements().is_empty() {
        reversed.close_path();
    }
    reversed
}

/// Start point of every contour
fn contour_starts(contours: &[BezPath]) -> Vec<Option<Point>> {
    contours
        .iter()
        .map(|c| match c.elements().first() {
            Some(PathEl::MoveTo(p)) => Some(*p),
            _ => None,
        })
        .collect()
}

/// Indices of the other contours enclosing `start`
fn enclosing(contours: &[BezPath], i: usize, start: Option<Point>) -> Vec<usize> {
    start.map_or_else(Vec::new, |start| {
        contours
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != i && other.winding(start) != 0)
            .map(|(j, _)| j)
            .collect()
    })
}

/// Re-wind even-odd sub-paths so non-zero filling paints the same area.
///
/// A contour nested inside an even number of others is outer and gets
/// negative signed area; odd nesting gets positive area.
fn fix_evenodd_winding(path: &mut BezPath) {
    let contours = split_into_contours(path);
    let starts = contour_starts(&contours);

    let mut fixed = BezPath::new();
    for (i, contour) in contours.iter().enumerate() {
        let nesting = enclosing(&contours, i, starts[i]).len();
        let should_be_negative = nesting % 2 == 0;
        let is_negative = contour.area() < 0.0;

        if should_be_negative != is_negative {
            fixed.extend(reverse_contour(contour).iter());
        } else {
            fixed.extend(contour.iter());
        }
    }
    *path = fixed;
}

/// Turn a non-zero region so its outermost contours have negative area.
///
/// Each top-level contour is flipped together with everything nested in it,
/// which keeps the region's own holes and overlaps intact.
fn orient_nonzero(path: &mut BezPath) {
    let contours = split_into_contours(path);
    let starts = contour_starts(&contours);
    let parents: Vec<Vec<usize>> = (0..contours.len())
        .map(|i| enclosing(&contours, i, starts[i]))
        .collect();

    let flip: Vec<bool> = (0..contours.len())
        .map(|i| {
            let top = parents[i]
                .iter()
                .copied()
                .find(|p| parents[*p].is_empty())
                .unwrap_or(i);
            contours[top].area() > 0.0
        })
        .collect();

    let mut fixed = BezPath::new();
    for (contour, flip) in contours.iter().zip(flip) {
        if flip {
            fixed.extend(reverse_contour(contour).iter());
        } else {
            fixed.extend(contour.iter());
        }
    }
    *path = fixed;
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_WITH_HOLE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
        <path fill-rule="evenodd" d="M2 2h20v20H2z M8 8h8v8H8z"/>
    </svg>"#;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
        let mut p = BezPath::new();
        p.move_to((x0, y0));
        p.line_to((x1, y0));
        p.line_to((x1, y1));
        p.line_to((x0, y1));
        p.close_path();
        p
    }

    #[test]
    fn test_reverse_flips_area() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        let reversed = reverse_contour(&outer);
        assert!((outer.area() + reversed.area()).abs() < 1e-9);
        assert!((outer.area().abs() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_evenodd_hole_winds_opposite() {
        let mut path = square(0.0, 0.0, 10.0, 10.0);
        path.extend(square(3.0, 3.0, 6.0, 6.0).iter());
        fix_evenodd_winding(&mut path);

        let contours = split_into_contours(&path);
        assert_eq!(contours.len(), 2);
        assert!(contours[0].area() < 0.0);
        assert!(contours[1].area() > 0.0);
        // The hole is not painted under non-zero filling.
        assert_eq!(path.winding((4.5, 4.5).into()), 0);
        assert_ne!(path.winding((1.0, 1.0).into()), 0);
    }

    #[test]
    fn test_parse_outline_reads_canvas() {
        let outline = parse_outline(SQUARE_WITH_HOLE).unwrap();
        assert_eq!(outline.width, 24.0);
        assert_eq!(outline.height, 24.0);
        assert_eq!(split_into_contours(&outline.path).len(), 2);
        assert_eq!(outline.path.winding((12.0, 12.0).into()), 0);
    }

    #[test]
    fn test_stroke_becomes_area() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
            <path d="M4 12H20" stroke="black" stroke-width="2" fill="none"/>
        </svg>"#;
        let outline = parse_outline(svg).unwrap();
        let bbox = outline.path.bounding_box();
        assert!(bbox.height() > 1.5, "stroke was not expanded: {bbox:?}");
        assert_ne!(outline.path.winding((12.0, 12.0).into()), 0);
    }

    #[test]
    fn test_single_contour_is_outer() {
        let mut path = square(0.0, 0.0, 10.0, 10.0);
        if path.area() < 0.0 {
            path = reverse_contour(&path);
        }
        fix_evenodd_winding(&mut path);
        assert!(path.area() < 0.0);
    }

    #[test]
    fn test_filled_and_stroked_circle_stays_solid() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
            <circle cx="12" cy="12" r="10" fill="black" stroke="black" stroke-width="2"/>
        </svg>"#;
        let outline = parse_outline(svg).unwrap();
        for (x, y) in [(12.0, 12.0), (12.0, 2.5), (12.0, 1.5), (20.0, 12.0)] {
            assert_ne!(outline.path.winding((x, y).into()), 0, "hole at ({x}, {y})");
        }
        assert_eq!(outline.path.winding((0.5, 0.5).into()), 0);
    }

    #[test]
    fn test_overlapping_paths_drawn_in_opposite_directions() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
            <path d="M2 2H16V16H2Z"/>
            <path d="M8 8V22H22V8Z"/>
        </svg>"#;
        let outline = parse_outline(svg).unwrap();
        assert_ne!(outline.path.winding((12.0, 12.0).into()), 0);
        assert_ne!(outline.path.winding((4.0, 4.0).into()), 0);
        assert_ne!(outline.path.winding((20.0, 20.0).into()), 0);
        assert_eq!(outline.path.winding((20.0, 4.0).into()), 0);
    }

    #[test]
    fn test_nonzero_region_keeps_its_holes() {
        // Outer and hole wound in opposite directions: a ring.
        let mut path = square(0.0, 0.0, 10.0, 10.0);
        path.extend(reverse_contour(&square(3.0, 3.0, 6.0, 6.0)).iter());
        let mut flipped = reverse_contour(&square(0.0, 0.0, 10.0, 10.0));
        flipped.extend(square(3.0, 3.0, 6.0, 6.0).iter());

        for mut ring in [path, flipped] {
            orient_nonzero(&mut ring);
            let contours = split_into_contours(&ring);
            assert!(contours[0].area() < 0.0);
            assert_eq!(ring.winding((4.5, 4.5).into()), 0);
            assert_ne!(ring.winding((1.0, 1.0).into()), 0);
        }
    }

    #[test]
    fn test_mirrored_transform_keeps_orientation() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
            <path d="M2 2H14V14H2Z"/>
            <path d="M2 2H14V14H2Z" transform="translate(24 0) scale(-1 1)"/>
            <path d="M6 6H18V18H6Z"/>
        </svg>"#;
        let outline = parse_outline(svg).unwrap();
        for contour in split_into_contours(&outline.path) {
            assert!(contour.area() < 0.0);
        }
        assert_ne!(outline.path.winding((12.0, 8.0).into()), 0);
    }

    #[test]
    fn test_invalid_svg_is_an_error() {
        assert!(parse_outline("<not-svg>").is_err());
    }
}
