use crate::{
    config::TileFootprint,
    grid::hex::{CubePoint, FractionalPoint},
    Point2, Vector2,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// The mapping between cube space and (unrotated) pixel space, for a particular
/// tile footprint. Tiles are pointy-topped.
///
/// Every tile gets an **anchor**: the top-left corner of its footprint. The
/// anchor of the tile at axial `(q, r)` is
///
/// ```text
/// x = round(Sx * (√3 * q + √3/2 * r))
/// y = round(Sy * (3/2 * r))
/// ```
///
/// where `Sx` and `Sy` are the footprint's tuned adjusted sizes. Anchors are
/// rounded to whole pixels so that tile art is never blurred by subpixel
/// placement.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    footprint: TileFootprint,
}

impl Layout {
    pub fn new(footprint: TileFootprint) -> Self {
        Self { footprint }
    }

    pub fn footprint(&self) -> &TileFootprint {
        &self.footprint
    }

    /// Half of the footprint size, i.e. the offset from a tile's anchor to its
    /// center
    pub fn half_footprint(&self) -> Vector2 {
        self.footprint.size() / 2.0
    }

    /// Compute the anchor position of a tile
    pub fn point_to_pixel(&self, point: CubePoint) -> Point2 {
        let axial = point.to_axial();
        let q = f64::from(axial.q);
        let r = f64::from(axial.r);
        Point2::new(
            (self.footprint.adjusted_size_x * (SQRT_3 * q + SQRT_3 / 2.0 * r))
                .round(),
            (self.footprint.adjusted_size_y * (3.0 / 2.0 * r)).round(),
        )
    }

    /// The inverse of [Self::point_to_pixel], minus the rounding. Maps a pixel
    /// in anchor space to a fractional point in cube space.
    pub fn pixel_to_fractional(&self, pixel: Point2) -> FractionalPoint {
        let r = pixel.y / (3.0 / 2.0 * self.footprint.adjusted_size_y);
        let q = pixel.x / (SQRT_3 * self.footprint.adjusted_size_x) - r / 2.0;
        FractionalPoint::from_axial(q, r)
    }

    /// Find the cell containing a pixel in unrotated, uncentered pixel space
    /// (i.e. the same space as the tile anchors). The pixel is shifted from
    /// footprint coordinates to center coordinates, corrected by the
    /// footprint's pick skew, then mapped back into cube space and rounded.
    ///
    /// The returned cell isn't necessarily on the board.
    pub fn pixel_to_point(&self, pixel: Point2) -> CubePoint {
        let corrected =
            pixel - self.half_footprint() + self.footprint.pick_skew();
        self.pixel_to_fractional(corrected).round()
    }
}

/// An axis-aligned rectangle in pixel space
#[derive(Copy, Clone, Debug, Display, PartialEq, Serialize, Deserialize)]
#[display(fmt = "[{}, {}]", min, max)]
pub struct PixelBounds {
    pub min: Point2,
    pub max: Point2,
}

impl PixelBounds {
    /// Compute the tightest bounds covering a set of tile footprints, given
    /// the anchor of each. Returns an empty bounds at the origin if there are
    /// no anchors.
    pub fn covering(
        anchors: impl IntoIterator<Item = Point2>,
        footprint: Vector2,
    ) -> Self {
        anchors
            .into_iter()
            .map(|anchor| Self {
                min: anchor,
                max: anchor + footprint,
            })
            .reduce(|a, b| Self {
                min: a.min.min(b.min),
                max: a.max.max(b.max),
            })
            .unwrap_or(Self {
                min: Point2::ORIGIN,
                max: Point2::ORIGIN,
            })
    }

    pub fn size(&self) -> Vector2 {
        self.max - self.min
    }

    pub fn center(&self) -> Point2 {
        self.min + self.size() / 2.0
    }

    /// Is the point inside these bounds? Inclusive on all edges.
    pub fn contains(&self, point: Point2) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
    }
}
