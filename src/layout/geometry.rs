//! Per-control geometry: write-once coordinate fields and their derivation

use super::coord::{Axis, Coord, CoordKind};

/// The five coordinates of one control on one axis
///
/// Every field starts unresolved at the beginning of a layout pass and is
/// written at most once. After each write, [`AxisSpan::recalculate`] fills in
/// whatever else has become derivable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisSpan {
    near: Option<i32>,
    size: Option<i32>,
    far: Option<i32>,
    near_extent: Option<i32>,
    far_extent: Option<i32>,
}

impl AxisSpan {
    pub fn get(&self, kind: CoordKind) -> Option<i32> {
        match kind {
            CoordKind::Near => self.near,
            CoordKind::Size => self.size,
            CoordKind::Far => self.far,
            CoordKind::NearExtent => self.near_extent,
            CoordKind::FarExtent => self.far_extent,
        }
    }

    fn slot(&mut self, kind: CoordKind) -> &mut Option<i32> {
        match kind {
            CoordKind::Near => &mut self.near,
            CoordKind::Size => &mut self.size,
            CoordKind::Far => &mut self.far,
            CoordKind::NearExtent => &mut self.near_extent,
            CoordKind::FarExtent => &mut self.far_extent,
        }
    }

    /// Write a coordinate once. Returns the existing value if it was already set.
    pub(crate) fn set(&mut self, kind: CoordKind, value: i32) -> Result<(), i32> {
        let slot = self.slot(kind);
        match *slot {
            Some(existing) => Err(existing),
            None => {
                *slot = Some(value);
                Ok(())
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of resolved coordinates on this axis
    pub fn known(&self) -> usize {
        CoordKind::ALL
            .iter()
            .filter(|kind| self.get(**kind).is_some())
            .count()
    }

    /// True once all five coordinates are resolved
    pub fn is_complete(&self) -> bool {
        self.known() == CoordKind::ALL.len()
    }

    /// Derive every coordinate that follows from the known ones.
    ///
    /// The five coordinates are tied by four relations:
    ///
    /// ```text
    /// near + size        = near_extent
    /// far  + size        = far_extent
    /// near + size + far  = parent
    /// near_extent + far_extent = parent + size
    /// ```
    ///
    /// Any two known coordinates determine the rest, except the pairs
    /// (near, far_extent) and (far, near_extent): each of those sums to the
    /// parent size and carries no information about the control's size, so
    /// they are left alone until a third value arrives. Without a parent size
    /// only the first two relations apply.
    ///
    /// Fails with the kind of the coordinate whose derived value does not fit
    /// in an `i32`; the span is left partially derived in that case.
    pub fn recalculate(&mut self, parent: Option<i32>) -> Result<(), CoordKind> {
        loop {
            let mut changed = solve_sum(
                &mut self.near,
                &mut self.size,
                &mut self.near_extent,
                [CoordKind::Near, CoordKind::Size, CoordKind::NearExtent],
            )?;
            changed |= solve_sum(
                &mut self.far,
                &mut self.size,
                &mut self.far_extent,
                [CoordKind::Far, CoordKind::Size, CoordKind::FarExtent],
            )?;
            if let Some(parent) = parent {
                changed |= solve_span(&mut self.near, &mut self.size, &mut self.far, parent)?;
                changed |= solve_extents(
                    &mut self.near_extent,
                    &mut self.far_extent,
                    &mut self.size,
                    parent,
                )?;
            }
            if !changed {
                return Ok(());
            }
        }
    }
}

fn fits(value: i64, kind: CoordKind) -> Result<i32, CoordKind> {
    i32::try_from(value).map_err(|_| kind)
}

/// `a + b = sum`, with `kinds` naming `[a, b, sum]`
fn solve_sum(
    a: &mut Option<i32>,
    b: &mut Option<i32>,
    sum: &mut Option<i32>,
    kinds: [CoordKind; 3],
) -> Result<bool, CoordKind> {
    let wide = |v: i32| i64::from(v);
    match (*a, *b, *sum) {
        (Some(a), Some(b), None) => *sum = Some(fits(wide(a) + wide(b), kinds[2])?),
        (Some(a), None, Some(sum)) => *b = Some(fits(wide(sum) - wide(a), kinds[1])?),
        (None, Some(b), Some(sum)) => *a = Some(fits(wide(sum) - wide(b), kinds[0])?),
        _ => return Ok(false),
    }
    Ok(true)
}

/// `near + size + far = parent`
fn solve_span(
    near: &mut Option<i32>,
    size: &mut Option<i32>,
    far: &mut Option<i32>,
    parent: i32,
) -> Result<bool, CoordKind> {
    let p = i64::from(parent);
    match (*near, *size, *far) {
        (Some(n), Some(s), None) => {
            *far = Some(fits(p - i64::from(n) - i64::from(s), CoordKind::Far)?)
        }
        (Some(n), None, Some(f)) => {
            *size = Some(fits(p - i64::from(n) - i64::from(f), CoordKind::Size)?)
        }
        (None, Some(s), Some(f)) => {
            *near = Some(fits(p - i64::from(s) - i64::from(f), CoordKind::Near)?)
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// `near_extent + far_extent = parent + size`
fn solve_extents(
    near_extent: &mut Option<i32>,
    far_extent: &mut Option<i32>,
    size: &mut Option<i32>,
    parent: i32,
) -> Result<bool, CoordKind> {
    let p = i64::from(parent);
    match (*near_extent, *far_extent, *size) {
        (Some(d), Some(e), None) => {
            *size = Some(fits(i64::from(d) + i64::from(e) - p, CoordKind::Size)?)
        }
        (Some(d), None, Some(s)) => {
            *far_extent = Some(fits(p + i64::from(s) - i64::from(d), CoordKind::FarExtent)?)
        }
        (None, Some(e), Some(s)) => {
            *near_extent = Some(fits(p + i64::from(s) - i64::from(e), CoordKind::NearExtent)?)
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// All ten coordinates of a control, relative to its parent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    horizontal: AxisSpan,
    vertical: AxisSpan,
}

impl Geometry {
    pub fn span(&self, axis: Axis) -> &AxisSpan {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    pub(crate) fn span_mut(&mut self, axis: Axis) -> &mut AxisSpan {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    pub fn get(&self, coord: Coord) -> Option<i32> {
        self.span(coord.axis()).get(coord.kind())
    }

    pub fn x(&self) -> Option<i32> {
        self.get(Coord::X)
    }

    pub fn y(&self) -> Option<i32> {
        self.get(Coord::Y)
    }

    pub fn w(&self) -> Option<i32> {
        self.get(Coord::W)
    }

    pub fn h(&self) -> Option<i32> {
        self.get(Coord::H)
    }

    pub fn size(&self, axis: Axis) -> Option<i32> {
        self.span(axis).get(CoordKind::Size)
    }

    pub(crate) fn reset(&mut self) {
        self.horizontal.reset();
        self.vertical.reset();
    }

    /// Position and size relative to the parent, once both are resolved
    pub fn rect(&self) -> Option<Rect> {
        Some(Rect::new(self.x()?, self.y()?, self.w()?, self.h()?))
    }
}

/// A resolved rectangle in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Shift by an origin, turning parent-relative coordinates into absolute ones
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}
