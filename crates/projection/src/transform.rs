//! Point and extent transforms between supported CRSs.

use map_common::{BoundingBox, CrsCode};

use crate::mercator::{lon_lat_to_mercator, mercator_to_lon_lat};

/// Transform a single point from one CRS to another.
///
/// Geographic systems (EPSG:4326, CRS84) share the WGS84 datum and are
/// treated as identical in x=lon, y=lat order. Returns `None` where the
/// target projection is undefined.
#[inline]
pub fn transform_point(from: CrsCode, to: CrsCode, x: f64, y: f64) -> Option<(f64, f64)> {
    match (from.is_geographic(), to.is_geographic()) {
        (true, true) | (false, false) => Some((x, y)),
        (true, false) => lon_lat_to_mercator(x, y),
        (false, true) => mercator_to_lon_lat(x, y),
    }
}

/// Transform an extent, sampling `samples_per_edge` points along each side.
///
/// Edges are densified because a straight edge in one CRS may curve in
/// another. Points that fail to project are skipped; `None` is returned when
/// none project at all.
pub fn transform_bbox(
    from: CrsCode,
    to: CrsCode,
    bbox: &BoundingBox,
    samples_per_edge: usize,
) -> Option<BoundingBox> {
    let steps = samples_per_edge.max(2) - 1;
    let mut out: Option<BoundingBox> = None;

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = bbox.min_x + t * bbox.width();
        let y = bbox.min_y + t * bbox.height();
        let edge_points = [
            (x, bbox.min_y),
            (x, bbox.max_y),
            (bbox.min_x, y),
            (bbox.max_x, y),
        ];

        for (px, py) in edge_points {
            if let Some((tx, ty)) = transform_point(from, to, px, py) {
                let b = out.get_or_insert(BoundingBox::new(tx, ty, tx, ty));
                b.min_x = b.min_x.min(tx);
                b.min_y = b.min_y.min(ty);
                b.max_x = b.max_x.max(tx);
                b.max_y = b.max_y.max(ty);
            }
        }
    }

    out
}
