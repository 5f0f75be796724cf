//! Constraint kinds and their apply / done / unstick behaviour
//!
//! A constraint is discharged by [`Constraint::apply`], which either writes
//! the coordinates it determines and returns `true`, or changes nothing and
//! returns `false` because a coordinate it depends on is still unknown.

use super::config::LayoutConfig;
use super::coord::{Axis, Coord, CoordKind};
use super::error::LayoutError;
use super::fill::FillConstraint;
use super::tree::{ConstraintId, ControlArena, ControlId};

/// A constraint together with the container that owns it
#[derive(Debug, Clone)]
pub struct Constraint {
    pub(crate) owner: ControlId,
    pub(crate) kind: ConstraintKind,
}

/// The closed set of constraint kinds
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    Static(StaticConstraint),
    Align(AlignConstraint),
    Fill(FillConstraint),
    Content(ContentConstraint),
    Center(CenterConstraint),
}

/// `control.coord = value`
#[derive(Debug, Clone)]
pub struct StaticConstraint {
    pub(crate) control: ControlId,
    pub(crate) coord: Coord,
    value: i32,
}

impl StaticConstraint {
    pub(crate) fn new(control: ControlId, coord: Coord, value: f64) -> Self {
        Self {
            control,
            coord,
            value: to_pixels(value),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub(crate) fn set(&mut self, value: f64) {
        self.value = to_pixels(value);
    }

    pub(crate) fn add(&mut self, delta: f64) {
        self.value = to_pixels(f64::from(self.value) + delta);
    }

    fn apply(&self, arena: &mut ControlArena) -> Result<bool, LayoutError> {
        arena.write(self.control, self.coord, self.value)?;
        Ok(true)
    }
}

fn to_pixels(value: f64) -> i32 {
    value.round() as i32
}

/// `control.coord = source.source_coord + offset`
#[derive(Debug, Clone)]
pub struct AlignConstraint {
    pub(crate) control: ControlId,
    pub(crate) coord: Coord,
    pub(crate) source: ControlId,
    pub(crate) source_coord: Coord,
    pub(crate) offset: i32,
}

impl AlignConstraint {
    fn apply(&self, arena: &mut ControlArena, description: impl FnOnce() -> String) -> Result<bool, LayoutError> {
        let target = arena.coord(self.control, self.coord);
        let source = arena.coord(self.source, self.source_coord);
        match (target, source) {
            (Some(_), Some(_)) => Err(LayoutError::AlignOverspecified {
                constraint: description(),
            }),
            (Some(target), None) => {
                let value = target
                    .checked_sub(self.offset)
                    .ok_or_else(|| LayoutError::out_of_range(arena.label(self.source), self.source_coord))?;
                arena.write(self.source, self.source_coord, value)?;
                Ok(true)
            }
            (None, Some(source)) => {
                let value = source
                    .checked_add(self.offset)
                    .ok_or_else(|| LayoutError::out_of_range(arena.label(self.control), self.coord))?;
                arena.write(self.control, self.coord, value)?;
                Ok(true)
            }
            (None, None) => Ok(false),
        }
    }

    /// Give a control on either side a default size so one of its edges can resolve.
    /// The target side goes first; the source side only if the target already has one.
    fn unstick(&self, arena: &mut ControlArena, config: &LayoutConfig) -> Result<bool, LayoutError> {
        for (control, coord) in [(self.control, self.coord), (self.source, self.source_coord)] {
            let axis = coord.axis();
            if arena.coord(control, axis.size()).is_none() {
                arena.write(control, axis.size(), config.default_size(axis))?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Size `control` along one axis to its children's furthest far edge plus padding
#[derive(Debug, Clone)]
pub struct ContentConstraint {
    pub(crate) control: ControlId,
    pub(crate) coord: Coord,
    pub(crate) padding: i32,
    pub(crate) minimum: i32,
}

impl ContentConstraint {
    fn apply(&self, arena: &mut ControlArena) -> Result<bool, LayoutError> {
        let extent_coord = Coord::new(self.coord.axis(), CoordKind::NearExtent);
        let mut extent = 0;
        for child in arena.content_children(self.control) {
            match arena.coord(child, extent_coord) {
                Some(edge) => extent = extent.max(edge),
                None => return Ok(false),
            }
        }
        let size = extent
            .checked_add(self.padding)
            .ok_or_else(|| LayoutError::out_of_range(arena.label(self.control), self.coord))?
            .max(self.minimum);
        arena.write(self.control, self.coord, size)?;
        Ok(true)
    }
}

/// Centering built from two spacer controls and five simpler constraints
#[derive(Debug, Clone)]
pub struct CenterConstraint {
    pub(crate) control: ControlId,
    pub(crate) axis: Axis,
    pub(crate) helpers: [ControlId; 2],
    pub(crate) parts: Vec<ConstraintId>,
}

impl Constraint {
    pub fn owner(&self) -> ControlId {
        self.owner
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// Controls this constraint references
    pub fn controls(&self) -> Vec<ControlId> {
        match &self.kind {
            ConstraintKind::Static(c) => vec![c.control],
            ConstraintKind::Align(c) if c.control == c.source => vec![c.control],
            ConstraintKind::Align(c) => vec![c.control, c.source],
            ConstraintKind::Fill(c) => c.controls().to_vec(),
            ConstraintKind::Content(c) => vec![c.control],
            ConstraintKind::Center(c) => vec![c.control],
        }
    }

    /// Try to resolve this constraint's coordinates for the current pass.
    pub(crate) fn apply(&mut self, arena: &mut ControlArena, config: &LayoutConfig) -> Result<bool, LayoutError> {
        let description = self.describe(arena);
        match &mut self.kind {
            ConstraintKind::Static(c) => c.apply(arena),
            ConstraintKind::Align(c) => c.apply(arena, || description),
            ConstraintKind::Fill(c) => c.apply(self.owner, arena, config, &description),
            ConstraintKind::Content(c) => c.apply(arena),
            // the parts do the work
            ConstraintKind::Center(_) => Ok(true),
        }
    }

    /// Whether this constraint is satisfied after a full round
    pub(crate) fn done(&mut self, round: usize, arena: &ControlArena) -> Result<bool, LayoutError> {
        let description = self.describe(arena);
        match &mut self.kind {
            ConstraintKind::Fill(c) => c.done(round, self.owner, arena, &description),
            _ => Ok(true),
        }
    }

    /// Inject a provisional value to break a deadlock
    pub(crate) fn unstick(&mut self, arena: &mut ControlArena, config: &LayoutConfig) -> Result<bool, LayoutError> {
        match &self.kind {
            ConstraintKind::Align(c) => c.unstick(arena, config),
            _ => Ok(false),
        }
    }

    pub fn describe(&self, arena: &ControlArena) -> String {
        match &self.kind {
            ConstraintKind::Static(c) => {
                format!("{}.{} = {}", arena.label(c.control), c.coord, c.value)
            }
            ConstraintKind::Align(c) => {
                let base = format!(
                    "{}.{} = {}.{}",
                    arena.label(c.control),
                    c.coord,
                    arena.label(c.source),
                    c.source_coord
                );
                match c.offset {
                    0 => base,
                    offset if offset < 0 => format!("{} - {}", base, -offset),
                    offset => format!("{} + {}", base, offset),
                }
            }
            ConstraintKind::Fill(c) => {
                let names: Vec<String> = c.controls().iter().map(|id| arena.label(*id)).collect();
                format!("fill({}).{}", names.join(", "), c.axis().size())
            }
            ConstraintKind::Content(c) => format!(
                "content({}.{}, padding {}, minimum {})",
                arena.label(c.control),
                c.coord,
                c.padding,
                c.minimum
            ),
            ConstraintKind::Center(c) => {
                format!("center({}, {})", arena.label(c.control), c.axis)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tree::ControlTree;

    #[test]
    fn test_describe() {
        let mut tree = ControlTree::default();
        let root = tree.root();
        let a = tree.add_control(root, "a").unwrap();
        let b = tree.add_control(root, "b").unwrap();

        let align = tree.align(b, Coord::X, a, Coord::XW, 5).unwrap();
        let back = tree.align(a, Coord::X2, b, Coord::X2W, -3).unwrap();
        let fixed = tree.fix(a, Coord::Y, 12.0).unwrap();
        let fill = tree.fill(&[a, b], Coord::H).unwrap();
        let content = tree.fit_content(a, Coord::W, 4, 10).unwrap();

        assert_eq!(tree.describe_constraint(align).unwrap(), "b.x = a.xw + 5");
        assert_eq!(tree.describe_constraint(back).unwrap(), "a.x2 = b.x2w - 3");
        assert_eq!(tree.describe_constraint(fixed).unwrap(), "a.y = 12");
        assert_eq!(tree.describe_constraint(fill).unwrap(), "fill(a, b).h");
        assert_eq!(
            tree.describe_constraint(content).unwrap(),
            "content(a.w, padding 4, minimum 10)"
        );
    }

    #[test]
    fn test_static_rounds_to_pixels() {
        assert_eq!(to_pixels(9.5), 10);
        assert_eq!(to_pixels(-2.4), -2);
        assert_eq!(to_pixels(7.0), 7);
    }
}
