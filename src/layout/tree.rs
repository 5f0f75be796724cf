//! Control tree and constraint arena
//!
//! Controls and constraints live in two slot maps keyed by stable ids. A
//! constraint is owned by the container whose children it constrains; the
//! controls it mentions only hold back-references, kept in a separate table
//! so detaching a control can find and destroy every rule that names it.

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use super::config::LayoutConfig;
use super::constraint::{
    AlignConstraint, CenterConstraint, Constraint, ConstraintKind, ContentConstraint,
    StaticConstraint,
};
use super::coord::{Axis, Coord, CoordKind};
use super::error::LayoutError;
use super::fill::FillConstraint;
use super::geometry::Geometry;

new_key_type! {
    /// Stable identity of a control
    pub struct ControlId;
    /// Stable identity of a constraint
    pub struct ConstraintId;
}

/// A node in the control tree
#[derive(Debug, Clone, Default)]
pub struct Control {
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<ControlId>,
    pub(crate) children: Vec<ControlId>,
    /// Constraints declared against this control's children, in application order
    pub(crate) constraints: Vec<ConstraintId>,
    pub(crate) geometry: Geometry,
    /// Size the control measures for itself, written at the start of every pass
    pub(crate) measured: [Option<i32>; 2],
    /// Helper controls created by composite constraints
    pub(crate) synthetic: bool,
    pub(crate) laid_out: bool,
}

impl Control {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<ControlId> {
        self.parent
    }

    pub fn children(&self) -> &[ControlId] {
        &self.children
    }

    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn measured(&self, axis: Axis) -> Option<i32> {
        self.measured[axis_index(axis)]
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// True once the subtree below this control finished its last pass
    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }
}

fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::Horizontal => 0,
        Axis::Vertical => 1,
    }
}

/// Control storage with the coordinate write path used by constraints
#[derive(Debug, Default)]
pub struct ControlArena {
    controls: SlotMap<ControlId, Control>,
}

impl ControlArena {
    pub fn get(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.get_mut(id)
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.controls.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn coord(&self, id: ControlId, coord: Coord) -> Option<i32> {
        self.controls.get(id)?.geometry.get(coord)
    }

    /// Size of the space a control is positioned in: its parent's size, or
    /// its own size for the root.
    pub fn parent_size(&self, id: ControlId, axis: Axis) -> Option<i32> {
        let control = self.controls.get(id)?;
        match control.parent {
            Some(parent) => self.controls.get(parent)?.geometry.size(axis),
            None => control.geometry.size(axis),
        }
    }

    /// Non-synthetic children, the ones that take up visible space
    pub fn content_children(&self, id: ControlId) -> Vec<ControlId> {
        self.controls
            .get(id)
            .map(|control| {
                control
                    .children
                    .iter()
                    .copied()
                    .filter(|child| self.controls.get(*child).is_some_and(|c| !c.synthetic))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Human-readable name for diagnostics
    pub fn label(&self, id: ControlId) -> String {
        match self.controls.get(id) {
            Some(Control {
                name: Some(name), ..
            }) => name.clone(),
            Some(control) if control.synthetic => format!("<helper {:?}>", id),
            Some(_) => format!("{:?}", id),
            None => format!("<detached {:?}>", id),
        }
    }

    /// Write one coordinate and derive what follows from it.
    pub(crate) fn write(&mut self, id: ControlId, coord: Coord, value: i32) -> Result<(), LayoutError> {
        let parent = self.parent_size(id, coord.axis());
        let control = self.controls.get_mut(id).ok_or(LayoutError::UnknownControl)?;
        let span = control.geometry.span_mut(coord.axis());
        if let Err(existing) = span.set(coord.kind(), value) {
            return Err(LayoutError::overspecified(self.label(id), coord, existing, value));
        }
        span.recalculate(parent)
            .map_err(|kind| LayoutError::out_of_range(self.label(id), Coord::new(coord.axis(), kind)))
    }

    /// Re-run derivation on both axes, e.g. after the parent's size became known
    pub(crate) fn rederive(&mut self, id: ControlId) -> Result<(), LayoutError> {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let parent = self.parent_size(id, axis);
            let control = self.controls.get_mut(id).ok_or(LayoutError::UnknownControl)?;
            control
                .geometry
                .span_mut(axis)
                .recalculate(parent)
                .map_err(|kind| LayoutError::out_of_range(self.label(id), Coord::new(axis, kind)))?;
        }
        Ok(())
    }

    /// Clear a control's coordinates for a new pass and apply its measured size.
    pub(crate) fn reset(&mut self, id: ControlId) -> Result<(), LayoutError> {
        let control = self.controls.get_mut(id).ok_or(LayoutError::UnknownControl)?;
        control.geometry.reset();
        control.laid_out = false;
        let measured = control.measured;
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if let Some(size) = measured[axis_index(axis)] {
                self.write(id, axis.size(), size)?;
            }
        }
        Ok(())
    }
}

/// A tree of controls together with the constraints declared over it
#[derive(Debug)]
pub struct ControlTree {
    pub(crate) controls: ControlArena,
    pub(crate) constraints: SlotMap<ConstraintId, Constraint>,
    /// control -> constraints that reference it
    pub(crate) references: SecondaryMap<ControlId, Vec<ConstraintId>>,
    pub(crate) root: ControlId,
    pub(crate) config: LayoutConfig,
    pub(crate) layout_requested: bool,
}

impl Default for ControlTree {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl ControlTree {
    /// Create a tree holding a single root control named `root`
    pub fn new(config: LayoutConfig) -> Self {
        let mut controls = ControlArena::default();
        let root = controls.controls.insert(Control {
            name: Some("root".to_string()),
            ..Control::default()
        });
        let mut references = SecondaryMap::new();
        references.insert(root, Vec::new());
        Self {
            controls,
            constraints: SlotMap::with_key(),
            references,
            root,
            config,
            layout_requested: true,
        }
    }

    pub fn root(&self) -> ControlId {
        self.root
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn controls(&self) -> &ControlArena {
        &self.controls
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id)
    }

    pub fn geometry(&self, id: ControlId) -> Option<&Geometry> {
        self.controls.get(id).map(|control| &control.geometry)
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Constraints that mention a control
    pub fn references(&self, id: ControlId) -> &[ConstraintId] {
        self.references.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn label(&self, id: ControlId) -> String {
        self.controls.label(id)
    }

    pub fn describe_constraint(&self, id: ConstraintId) -> Option<String> {
        self.constraints
            .get(id)
            .map(|constraint| constraint.describe(&self.controls))
    }

    /// Find a control by name, depth-first from the root
    pub fn find(&self, name: &str) -> Option<ControlId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let control = self.controls.get(id)?;
            if control.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(control.children.iter().rev().copied());
        }
        None
    }

    /// Ask for a layout pass. Requests are coalesced until the next pass runs.
    pub fn request_layout(&mut self) {
        self.layout_requested = true;
    }

    pub fn layout_requested(&self) -> bool {
        self.layout_requested
    }

    pub(crate) fn clear_layout_request(&mut self) {
        self.layout_requested = false;
    }

    // ------------------------------------------------------------------
    // Controls
    // ------------------------------------------------------------------

    /// Attach a new named control as the last child of `parent`
    pub fn add_control(&mut self, parent: ControlId, name: impl Into<String>) -> Result<ControlId, LayoutError> {
        self.insert_control(parent, Some(name.into()), false)
    }

    /// Attach a new unnamed control as the last child of `parent`
    pub fn add_anonymous(&mut self, parent: ControlId) -> Result<ControlId, LayoutError> {
        self.insert_control(parent, None, false)
    }

    fn insert_control(
        &mut self,
        parent: ControlId,
        name: Option<String>,
        synthetic: bool,
    ) -> Result<ControlId, LayoutError> {
        if !self.controls.contains(parent) {
            return Err(LayoutError::UnknownControl);
        }
        let id = self.controls.controls.insert(Control {
            name,
            parent: Some(parent),
            synthetic,
            ..Control::default()
        });
        self.references.insert(id, Vec::new());
        if let Some(parent) = self.controls.get_mut(parent) {
            parent.children.push(id);
        }
        self.request_layout();
        Ok(id)
    }

    /// Set the size a control measures for itself (its self-constrained extent).
    /// `None` leaves that axis to constraints and defaults.
    pub fn set_measured_size(
        &mut self,
        id: ControlId,
        width: Option<i32>,
        height: Option<i32>,
    ) -> Result<(), LayoutError> {
        let control = self.controls.get_mut(id).ok_or(LayoutError::UnknownControl)?;
        control.measured = [width, height];
        self.request_layout();
        Ok(())
    }

    /// Set the root's self-constrained size, i.e. the viewport.
    pub(crate) fn set_viewport(&mut self, width: Option<i32>, height: Option<i32>) {
        let root = self.root;
        if let Some(control) = self.controls.get_mut(root) {
            control.measured = [width, height];
        }
        self.request_layout();
    }

    /// Detach a control and its subtree.
    ///
    /// Every constraint that references a detached control is destroyed
    /// first; none of the built-in kinds can survive losing a control.
    pub fn detach(&mut self, id: ControlId) -> Result<(), LayoutError> {
        if id == self.root {
            return Err(LayoutError::DetachRoot);
        }
        let control = self.controls.get(id).ok_or(LayoutError::UnknownControl)?;
        let children = control.children.clone();
        let parent = control.parent;

        for child in children {
            self.detach(child)?;
        }

        let referencing = self.references(id).to_vec();
        for constraint in referencing {
            if self.constraints.contains_key(constraint) {
                self.remove_constraint(constraint)?;
            }
        }

        let remaining = self.references(id).len();
        if remaining > 0 {
            return Err(LayoutError::StillReferenced {
                control: self.label(id),
                count: remaining,
            });
        }

        if let Some(parent) = parent.and_then(|p| self.controls.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }
        self.controls.controls.remove(id);
        self.references.remove(id);
        self.request_layout();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Constraints
    // ------------------------------------------------------------------

    /// The shared parent of a set of controls, which will own the constraint
    fn common_parent(&self, controls: &[ControlId]) -> Result<ControlId, LayoutError> {
        let mut owner: Option<(ControlId, ControlId)> = None;
        for &id in controls {
            let control = self.controls.get(id).ok_or(LayoutError::UnknownControl)?;
            let parent = control.parent.ok_or_else(|| LayoutError::NoParent {
                control: self.label(id),
            })?;
            match owner {
                None => owner = Some((parent, id)),
                Some((existing, first)) if existing != parent => {
                    return Err(LayoutError::ParentMismatch {
                        first: self.label(first),
                        second: self.label(id),
                    })
                }
                Some(_) => {}
            }
        }
        owner.map(|(parent, _)| parent).ok_or(LayoutError::UnknownControl)
    }

    fn register(&mut self, owner: ControlId, kind: ConstraintKind) -> ConstraintId {
        let constraint = Constraint { owner, kind };
        let referenced = constraint.controls();
        let id = self.constraints.insert(constraint);
        if let Some(owner) = self.controls.get_mut(owner) {
            owner.constraints.push(id);
        }
        for control in referenced {
            if let Some(refs) = self.references.get_mut(control) {
                refs.push(id);
            }
        }
        tracing::trace!(
            constraint = %self.constraints[id].describe(&self.controls),
            "constraint added"
        );
        self.request_layout();
        id
    }

    /// Fix `control.coord` to a value. Fractional values are rounded to whole pixels.
    pub fn fix(&mut self, control: ControlId, coord: Coord, value: f64) -> Result<ConstraintId, LayoutError> {
        let owner = self.common_parent(&[control])?;
        Ok(self.register(
            owner,
            ConstraintKind::Static(StaticConstraint::new(control, coord, value)),
        ))
    }

    /// Tie `control.coord = source.source_coord + offset`
    pub fn align(
        &mut self,
        control: ControlId,
        coord: Coord,
        source: ControlId,
        source_coord: Coord,
        offset: i32,
    ) -> Result<ConstraintId, LayoutError> {
        let owner = self.common_parent(&[control, source])?;
        if control == source && coord == source_coord {
            return Err(LayoutError::SelfAlignment {
                control: self.label(control),
                coord,
            });
        }
        Ok(self.register(
            owner,
            ConstraintKind::Align(AlignConstraint {
                control,
                coord,
                source,
                source_coord,
                offset,
            }),
        ))
    }

    /// Make the sizes of `controls` equal along the axis of `coord` (`w` or `h`)
    pub fn fill(&mut self, controls: &[ControlId], coord: Coord) -> Result<ConstraintId, LayoutError> {
        let ratios = vec![1.0; controls.len()];
        self.fill_with_ratios(controls, coord, &ratios)
    }

    /// Make the sizes of `controls` proportional to `ratios` along the axis of `coord`
    pub fn fill_with_ratios(
        &mut self,
        controls: &[ControlId],
        coord: Coord,
        ratios: &[f64],
    ) -> Result<ConstraintId, LayoutError> {
        if !coord.is_size() {
            return Err(LayoutError::NotASize { coord });
        }
        if controls.len() < 2 {
            return Err(LayoutError::FillTooFew {
                count: controls.len(),
            });
        }
        if ratios.len() != controls.len() {
            return Err(LayoutError::RatioMismatch {
                controls: controls.len(),
                ratios: ratios.len(),
            });
        }
        if let Some(ratio) = ratios.iter().find(|r| !r.is_finite() || **r <= 0.0) {
            return Err(LayoutError::InvalidRatio { ratio: *ratio });
        }
        for (i, control) in controls.iter().enumerate() {
            if controls[..i].contains(control) {
                return Err(LayoutError::DuplicateFillControl {
                    control: self.label(*control),
                });
            }
        }
        let owner = self.common_parent(controls)?;
        Ok(self.register(
            owner,
            ConstraintKind::Fill(FillConstraint::new(controls.to_vec(), coord.axis(), ratios.to_vec())),
        ))
    }

    /// Size `control` along `coord` (`w` or `h`) to the extent of its children
    pub fn fit_content(
        &mut self,
        control: ControlId,
        coord: Coord,
        padding: i32,
        minimum: i32,
    ) -> Result<ConstraintId, LayoutError> {
        if !coord.is_size() {
            return Err(LayoutError::NotASize { coord });
        }
        let owner = self.common_parent(&[control])?;
        Ok(self.register(
            owner,
            ConstraintKind::Content(ContentConstraint {
                control,
                coord,
                padding,
                minimum,
            }),
        ))
    }

    /// Center `control` in its parent along `axis`.
    ///
    /// Builds two invisible spacers around the control, pins them to the
    /// parent's edges and fills them to equal size.
    pub fn center(&mut self, control: ControlId, axis: Axis) -> Result<ConstraintId, LayoutError> {
        let owner = self.common_parent(&[control])?;
        let lead = self.insert_control(owner, None, true)?;
        let trail = self.insert_control(owner, None, true)?;

        let near = Coord::new(axis, CoordKind::Near);
        let near_extent = Coord::new(axis, CoordKind::NearExtent);
        let far = Coord::new(axis, CoordKind::Far);
        let parts = vec![
            self.fix(lead, near, 0.0)?,
            self.align(control, near, lead, near_extent, 0)?,
            self.align(trail, near, control, near_extent, 0)?,
            self.fix(trail, far, 0.0)?,
            self.fill(&[lead, trail], axis.size())?,
        ];

        Ok(self.register(
            owner,
            ConstraintKind::Center(CenterConstraint {
                control,
                axis,
                helpers: [lead, trail],
                parts,
            }),
        ))
    }

    /// Destroy a constraint and unregister it everywhere
    pub fn remove_constraint(&mut self, id: ConstraintId) -> Result<(), LayoutError> {
        let constraint = self
            .constraints
            .remove(id)
            .ok_or(LayoutError::UnknownConstraint)?;
        if let Some(owner) = self.controls.get_mut(constraint.owner) {
            owner.constraints.retain(|c| *c != id);
        }
        for control in constraint.controls() {
            if let Some(refs) = self.references.get_mut(control) {
                refs.retain(|c| *c != id);
            }
        }
        if let ConstraintKind::Center(center) = &constraint.kind {
            for part in &center.parts {
                if self.constraints.contains_key(*part) {
                    self.remove_constraint(*part)?;
                }
            }
            for helper in center.helpers {
                if self.controls.contains(helper) {
                    self.detach(helper)?;
                }
            }
        }
        self.request_layout();
        Ok(())
    }

    /// Replace the value of a static constraint
    pub fn set_static(&mut self, id: ConstraintId, value: f64) -> Result<(), LayoutError> {
        self.static_mut(id)?.set(value);
        self.request_layout();
        Ok(())
    }

    /// Shift the value of a static constraint
    pub fn add_static(&mut self, id: ConstraintId, delta: f64) -> Result<(), LayoutError> {
        self.static_mut(id)?.add(delta);
        self.request_layout();
        Ok(())
    }

    pub fn static_value(&self, id: ConstraintId) -> Option<i32> {
        match &self.constraints.get(id)?.kind {
            ConstraintKind::Static(constraint) => Some(constraint.value()),
            _ => None,
        }
    }

    fn static_mut(&mut self, id: ConstraintId) -> Result<&mut StaticConstraint, LayoutError> {
        let description = self.describe_constraint(id).ok_or(LayoutError::UnknownConstraint)?;
        match self.constraints.get_mut(id).map(|c| &mut c.kind) {
            Some(ConstraintKind::Static(constraint)) => Ok(constraint),
            Some(_) => Err(LayoutError::NotStatic {
                constraint: description,
            }),
            None => Err(LayoutError::UnknownConstraint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(names: &[&str]) -> (ControlTree, Vec<ControlId>) {
        let mut tree = ControlTree::default();
        let root = tree.root();
        let ids = names
            .iter()
            .map(|name| tree.add_control(root, *name).unwrap())
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_constraint_registers_on_parent_and_controls() {
        let (mut tree, ids) = tree_with(&["a", "b"]);
        let id = tree.align(ids[1], Coord::X, ids[0], Coord::XW, 5).unwrap();

        let root = tree.control(tree.root()).unwrap();
        assert_eq!(root.constraints(), &[id]);
        assert_eq!(tree.references(ids[0]), &[id]);
        assert_eq!(tree.references(ids[1]), &[id]);
    }

    #[test]
    fn test_remove_constraint_unregisters() {
        let (mut tree, ids) = tree_with(&["a", "b"]);
        let id = tree.align(ids[1], Coord::X, ids[0], Coord::XW, 5).unwrap();
        tree.remove_constraint(id).unwrap();

        assert!(tree.control(tree.root()).unwrap().constraints().is_empty());
        assert!(tree.references(ids[0]).is_empty());
        assert!(tree.references(ids[1]).is_empty());
        assert_eq!(
            tree.remove_constraint(id),
            Err(LayoutError::UnknownConstraint)
        );
    }

    #[test]
    fn test_constraining_root_fails() {
        let mut tree = ControlTree::default();
        let root = tree.root();
        assert!(matches!(
            tree.fix(root, Coord::X, 0.0),
            Err(LayoutError::NoParent { .. })
        ));
    }

    #[test]
    fn test_controls_must_share_parent() {
        let (mut tree, ids) = tree_with(&["a", "b"]);
        let nested = tree.add_control(ids[0], "nested").unwrap();
        assert!(matches!(
            tree.align(nested, Coord::X, ids[1], Coord::X, 0),
            Err(LayoutError::ParentMismatch { .. })
        ));
    }

    #[test]
    fn test_fill_validation() {
        let (mut tree, ids) = tree_with(&["a", "b", "c"]);
        assert_eq!(
            tree.fill(&ids[..1], Coord::W),
            Err(LayoutError::FillTooFew { count: 1 })
        );
        assert_eq!(
            tree.fill(&ids, Coord::X),
            Err(LayoutError::NotASize { coord: Coord::X })
        );
        assert_eq!(
            tree.fill_with_ratios(&ids, Coord::W, &[1.0, 2.0]),
            Err(LayoutError::RatioMismatch {
                controls: 3,
                ratios: 2
            })
        );
        assert!(matches!(
            tree.fill_with_ratios(&ids, Coord::W, &[1.0, 0.0, 1.0]),
            Err(LayoutError::InvalidRatio { .. })
        ));
        assert!(matches!(
            tree.fill(&[ids[0], ids[1], ids[0]], Coord::W),
            Err(LayoutError::DuplicateFillControl { .. })
        ));
        assert_eq!(tree.constraint_count(), 0);
    }

    #[test]
    fn test_content_requires_size_coord() {
        let (mut tree, ids) = tree_with(&["panel"]);
        assert_eq!(
            tree.fit_content(ids[0], Coord::YH, 0, 0),
            Err(LayoutError::NotASize { coord: Coord::YH })
        );
    }

    #[test]
    fn test_self_alignment_of_same_coord_fails() {
        let (mut tree, ids) = tree_with(&["a"]);
        assert!(matches!(
            tree.align(ids[0], Coord::W, ids[0], Coord::W, 0),
            Err(LayoutError::SelfAlignment { .. })
        ));
        assert!(tree.align(ids[0], Coord::H, ids[0], Coord::W, 0).is_ok());
    }

    #[test]
    fn test_detach_destroys_referencing_constraints() {
        let (mut tree, ids) = tree_with(&["a", "b"]);
        tree.align(ids[1], Coord::X, ids[0], Coord::XW, 0).unwrap();
        tree.fix(ids[1], Coord::Y, 4.0).unwrap();

        tree.detach(ids[0]).unwrap();
        assert_eq!(tree.constraint_count(), 1);
        assert_eq!(tree.references(ids[1]).len(), 1);

        tree.detach(ids[1]).unwrap();
        assert_eq!(tree.constraint_count(), 0);
        assert!(tree.control(tree.root()).unwrap().constraints().is_empty());
        assert!(tree.control(tree.root()).unwrap().children().is_empty());
    }

    #[test]
    fn test_detach_subtree_removes_nested_constraints() {
        let (mut tree, ids) = tree_with(&["panel"]);
        let inner = tree.add_control(ids[0], "inner").unwrap();
        tree.fix(inner, Coord::X, 3.0).unwrap();
        tree.detach(ids[0]).unwrap();
        assert_eq!(tree.constraint_count(), 0);
        assert!(tree.control(inner).is_none());
    }

    #[test]
    fn test_detach_root_fails() {
        let mut tree = ControlTree::default();
        let root = tree.root();
        assert_eq!(tree.detach(root), Err(LayoutError::DetachRoot));
    }

    #[test]
    fn test_center_owns_helpers() {
        let (mut tree, ids) = tree_with(&["logo"]);
        let id = tree.center(ids[0], Axis::Horizontal).unwrap();
        let root = tree.root();
        assert_eq!(tree.control(root).unwrap().children().len(), 3);
        assert_eq!(tree.constraint_count(), 6);

        tree.remove_constraint(id).unwrap();
        assert_eq!(tree.control(root).unwrap().children(), &[ids[0]]);
        assert_eq!(tree.constraint_count(), 0);
    }

    #[test]
    fn test_static_mutation_requests_layout() {
        let (mut tree, ids) = tree_with(&["a"]);
        let id = tree.fix(ids[0], Coord::X, 10.4).unwrap();
        assert_eq!(tree.static_value(id), Some(10));
        tree.clear_layout_request();

        tree.add_static(id, 5.0).unwrap();
        assert_eq!(tree.static_value(id), Some(15));
        assert!(tree.layout_requested());

        tree.set_static(id, 2.6).unwrap();
        assert_eq!(tree.static_value(id), Some(3));
    }

    #[test]
    fn test_set_static_on_other_kind_fails() {
        let (mut tree, ids) = tree_with(&["a", "b"]);
        let id = tree.fill(&ids, Coord::W).unwrap();
        assert!(matches!(
            tree.set_static(id, 1.0),
            Err(LayoutError::NotStatic { .. })
        ));
    }

    #[test]
    fn test_find_by_name() {
        let (mut tree, ids) = tree_with(&["a", "b"]);
        let nested = tree.add_control(ids[1], "c").unwrap();
        assert_eq!(tree.find("c"), Some(nested));
        assert_eq!(tree.find("root"), Some(tree.root()));
        assert_eq!(tree.find("missing"), None);
    }

    #[test]
    fn test_anonymous_control_as_spacer() {
        let (mut tree, ids) = tree_with(&["a"]);
        let root = tree.root();
        let spacer = tree.add_anonymous(root).unwrap();
        tree.fix(spacer, Coord::X, 0.0).unwrap();
        tree.fix(spacer, Coord::W, 15.0).unwrap();
        tree.align(ids[0], Coord::X, spacer, Coord::XW, 0).unwrap();
        tree.set_measured_size(root, Some(100), Some(50)).unwrap();
        tree.layout(root).unwrap();

        let control = tree.control(spacer).unwrap();
        assert_eq!(control.name(), None);
        assert!(!control.is_synthetic());
        assert_eq!(tree.geometry(ids[0]).unwrap().x(), Some(15));
        assert_eq!(tree.controls().content_children(root), vec![ids[0], spacer]);
    }
}
