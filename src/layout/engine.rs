//! Layout engine: the per-container fixed point
//!
//! Layout runs top-down. For each container the engine resets the children's
//! coordinates, applies the container's constraints until none can make
//! further progress, repeats whole rounds until every constraint reports
//! itself done, places whatever is still unplaced, and then recurses.

use super::constraint::ConstraintKind;
use super::coord::{Axis, Coord, CoordKind};
use super::error::LayoutError;
use super::tree::{ConstraintId, ControlId, ControlTree};

/// Whether a pass produces final geometry or only measures a subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Final,
    /// Lay out a container's children so a content constraint can read their
    /// extents, without sizing the container itself.
    Probe,
}

const AXES: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

impl ControlTree {
    /// Lay out the subtree below `id`.
    ///
    /// Called on the root this resolves the whole tree. Called on any other
    /// control it reuses that control's current geometry as the coordinate
    /// space of its children.
    pub fn layout(&mut self, id: ControlId) -> Result<(), LayoutError> {
        let control = self.controls.get(id).ok_or(LayoutError::UnknownControl)?;
        if control.parent.is_none() {
            self.place_root(id)?;
        }
        self.layout_control(id, Pass::Final)?;
        self.clear_layout_request();
        Ok(())
    }

    fn place_root(&mut self, id: ControlId) -> Result<(), LayoutError> {
        self.controls.reset(id)?;
        self.controls.write(id, Coord::X, 0)?;
        self.controls.write(id, Coord::Y, 0)?;
        Ok(())
    }

    fn layout_control(&mut self, id: ControlId, pass: Pass) -> Result<(), LayoutError> {
        let children = match self.controls.get_mut(id) {
            Some(control) => {
                control.laid_out = false;
                control.children.clone()
            }
            None => return Err(LayoutError::UnknownControl),
        };

        if !children.is_empty() {
            self.solve_children(id, &children)?;
            self.place_unresolved(&children)?;
            for &child in &children {
                self.layout_control(child, Pass::Final)?;
            }
            if pass == Pass::Final {
                self.fit_to_children(id, &children)?;
            }
        }

        if pass == Pass::Final {
            if let Some(control) = self.controls.get_mut(id) {
                control.laid_out = true;
            }
        }
        Ok(())
    }

    /// Run outer rounds until every constraint owned by `id` is done.
    fn solve_children(&mut self, id: ControlId, children: &[ControlId]) -> Result<(), LayoutError> {
        let max_rounds = self.config.max_rounds;
        for round in 0..max_rounds {
            for &child in children {
                self.controls.reset(child)?;
            }
            self.apply_pending(id)?;

            if self.all_done(id, round)? {
                let rounds = round + 1;
                if rounds > self.config.warn_rounds {
                    tracing::warn!(
                        container = %self.label(id),
                        rounds,
                        "layout needed more rounds than expected; check for nested fills"
                    );
                } else {
                    tracing::debug!(container = %self.label(id), rounds, "layout converged");
                }
                return Ok(());
            }
        }
        Err(LayoutError::NonConvergent {
            container: self.label(id),
            rounds: max_rounds,
        })
    }

    /// Apply pending constraints until all are discharged, unsticking when a
    /// whole pass makes no progress. The order in which they succeeded is kept
    /// for the next round.
    fn apply_pending(&mut self, id: ControlId) -> Result<(), LayoutError> {
        let mut pending = self
            .controls
            .get(id)
            .map(|control| control.constraints.clone())
            .unwrap_or_default();
        let mut applied = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let attempted = pending.len();
            let mut retry = Vec::new();
            for constraint in pending {
                if self.apply_constraint(constraint)? {
                    applied.push(constraint);
                } else {
                    retry.push(constraint);
                }
            }

            if retry.len() == attempted && !self.unstick_any(&retry)? {
                let remaining = retry
                    .iter()
                    .filter_map(|c| self.describe_constraint(*c))
                    .collect();
                return Err(LayoutError::stuck(self.label(id), remaining));
            }
            pending = retry;
        }

        if let Some(control) = self.controls.get_mut(id) {
            control.constraints = applied;
        }
        Ok(())
    }

    fn apply_constraint(&mut self, id: ConstraintId) -> Result<bool, LayoutError> {
        let constraint = self.constraints.get(id).ok_or(LayoutError::UnknownConstraint)?;
        if let ConstraintKind::Content(content) = &constraint.kind {
            let (target, coord) = (content.control, content.coord);
            let needs_measure = self.controls.coord(target, coord).is_none()
                && !self.controls.content_children(target).is_empty();
            if needs_measure {
                match self.layout_control(target, Pass::Probe) {
                    Ok(()) => {}
                    Err(err) if err.is_deferrable() => {
                        // children not measurable yet; retried on the next inner pass
                        tracing::debug!(control = %self.label(target), %err, "content measurement deferred");
                        return Ok(false);
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        let constraint = self.constraints.get_mut(id).ok_or(LayoutError::UnknownConstraint)?;
        let applied = constraint.apply(&mut self.controls, &self.config)?;
        if applied {
            tracing::trace!(constraint = %constraint.describe(&self.controls), "applied");
        }
        Ok(applied)
    }

    fn unstick_any(&mut self, stuck: &[ConstraintId]) -> Result<bool, LayoutError> {
        for &id in stuck {
            let constraint = self.constraints.get_mut(id).ok_or(LayoutError::UnknownConstraint)?;
            if constraint.unstick(&mut self.controls, &self.config)? {
                tracing::debug!(constraint = %constraint.describe(&self.controls), "unstuck with default size");
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn all_done(&mut self, id: ControlId, round: usize) -> Result<bool, LayoutError> {
        let owned = self
            .controls
            .get(id)
            .map(|control| control.constraints.clone())
            .unwrap_or_default();
        let mut done = true;
        for constraint in owned {
            let constraint = self
                .constraints
                .get_mut(constraint)
                .ok_or(LayoutError::UnknownConstraint)?;
            // every constraint sees every round, so no short-circuit
            done &= constraint.done(round, &self.controls)?;
        }
        Ok(done)
    }

    /// Give children that no constraint positioned or sized a default.
    ///
    /// An axis with no position gets a staggered near edge; an axis with at
    /// most one known coordinate gets the default size. Containers are left
    /// unsized here and fit their own children instead. Axes with two known
    /// coordinates that still cannot be derived are left alone.
    fn place_unresolved(&mut self, children: &[ControlId]) -> Result<(), LayoutError> {
        let step = self.config.placement_step;
        let mut unplaced = 0;
        for &child in children {
            let Some(control) = self.controls.get(child) else {
                continue;
            };
            if control.synthetic {
                continue;
            }
            let is_container = !self.controls.content_children(child).is_empty();
            let unpositioned: Vec<Axis> = AXES
                .into_iter()
                .filter(|axis| {
                    let span = control.geometry.span(*axis);
                    let has_size = span.get(CoordKind::Size).is_some();
                    span.known() == usize::from(has_size)
                })
                .collect();

            let offset = unplaced * step;
            if !unpositioned.is_empty() {
                unplaced += 1;
            }

            for axis in AXES {
                if unpositioned.contains(&axis) {
                    self.controls
                        .write(child, Coord::new(axis, CoordKind::Near), offset)?;
                }
                let span = self
                    .controls
                    .get(child)
                    .map(|control| *control.geometry.span(axis))
                    .unwrap_or_default();
                if !is_container && span.get(CoordKind::Size).is_none() && span.known() < 2 {
                    self.controls
                        .write(child, axis.size(), self.config.default_size(axis))?;
                }
            }
        }
        Ok(())
    }

    /// Size a container that nothing else sized to its children's extent.
    fn fit_to_children(&mut self, id: ControlId, children: &[ControlId]) -> Result<(), LayoutError> {
        let content = self.controls.content_children(id);
        if content.is_empty() {
            return Ok(());
        }
        for axis in AXES {
            if self.controls.coord(id, axis.size()).is_some() {
                continue;
            }
            let extent_coord = Coord::new(axis, CoordKind::NearExtent);
            let extent = content
                .iter()
                .filter_map(|child| self.controls.coord(*child, extent_coord))
                .max()
                .unwrap_or(0);
            tracing::debug!(container = %self.label(id), %axis, extent, "fit to children");
            self.controls.write(id, axis.size(), extent)?;
            for &child in children {
                self.controls.rederive(child)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::LayoutConfig;

    fn form(width: i32, height: i32) -> ControlTree {
        let mut tree = ControlTree::new(LayoutConfig::default());
        let root = tree.root();
        tree.set_measured_size(root, Some(width), Some(height)).unwrap();
        tree
    }

    #[test]
    fn test_static_positions() {
        let mut tree = form(200, 100);
        let root = tree.root();
        let a = tree.add_control(root, "a").unwrap();
        tree.fix(a, Coord::X, 10.0).unwrap();
        tree.fix(a, Coord::W, 50.0).unwrap();
        tree.fix(a, Coord::Y2, 5.0).unwrap();
        tree.fix(a, Coord::H, 20.0).unwrap();
        tree.layout(root).unwrap();

        let geometry = tree.geometry(a).unwrap();
        assert_eq!(geometry.get(Coord::X2), Some(140));
        assert_eq!(geometry.get(Coord::Y), Some(75));
        assert_eq!(geometry.get(Coord::YH), Some(95));
        assert!(tree.control(a).unwrap().is_laid_out());
    }

    #[test]
    fn test_unconstrained_children_are_staggered() {
        let mut tree = form(200, 100);
        let root = tree.root();
        let a = tree.add_control(root, "a").unwrap();
        let b = tree.add_control(root, "b").unwrap();
        tree.layout(root).unwrap();

        let a = tree.geometry(a).unwrap();
        let b = tree.geometry(b).unwrap();
        assert_eq!((a.x(), a.y(), a.w(), a.h()), (Some(0), Some(0), Some(80), Some(30)));
        assert_eq!((b.x(), b.y(), b.w(), b.h()), (Some(10), Some(10), Some(80), Some(30)));
    }

    #[test]
    fn test_far_anchored_child_gets_default_size() {
        let mut tree = form(200, 100);
        let root = tree.root();
        let a = tree.add_control(root, "a").unwrap();
        tree.fix(a, Coord::X2, 0.0).unwrap();
        tree.layout(root).unwrap();

        let geometry = tree.geometry(a).unwrap();
        assert_eq!(geometry.w(), Some(80));
        assert_eq!(geometry.x(), Some(120));
        assert_eq!(geometry.y(), Some(0));
    }

    #[test]
    fn test_unsolvable_pair_is_left_unresolved() {
        let mut tree = form(200, 100);
        let root = tree.root();
        let a = tree.add_control(root, "a").unwrap();
        tree.fix(a, Coord::X, 10.0).unwrap();
        tree.fix(a, Coord::X2W, 190.0).unwrap();
        tree.layout(root).unwrap();

        let geometry = tree.geometry(a).unwrap();
        assert_eq!(geometry.w(), None);
        assert_eq!(geometry.span(Axis::Horizontal).known(), 2);
    }

    #[test]
    fn test_overspecified_static_fails() {
        let mut tree = form(200, 100);
        let root = tree.root();
        let a = tree.add_control(root, "a").unwrap();
        tree.fix(a, Coord::X, 10.0).unwrap();
        tree.fix(a, Coord::W, 20.0).unwrap();
        tree.fix(a, Coord::XW, 40.0).unwrap();

        let err = tree.layout(root).unwrap_err();
        assert_eq!(err, LayoutError::overspecified("a", Coord::XW, 30, 40));
    }

    #[test]
    fn test_container_fits_children() {
        let mut tree = form(400, 300);
        let root = tree.root();
        let panel = tree.add_control(root, "panel").unwrap();
        let inner = tree.add_control(panel, "inner").unwrap();
        tree.fix(panel, Coord::X2, 0.0).unwrap();
        tree.fix(inner, Coord::X, 15.0).unwrap();
        tree.fix(inner, Coord::W, 45.0).unwrap();
        tree.layout(root).unwrap();

        let panel = tree.geometry(panel).unwrap();
        assert_eq!(panel.w(), Some(60));
        assert_eq!(panel.x(), Some(340));
        // inner had no vertical rule: default height at the origin
        assert_eq!(panel.h(), Some(30));
    }

    #[test]
    fn test_root_without_size_fits_children() {
        let mut tree = ControlTree::default();
        let root = tree.root();
        let a = tree.add_control(root, "a").unwrap();
        tree.fix(a, Coord::X, 20.0).unwrap();
        tree.fix(a, Coord::W, 30.0).unwrap();
        tree.fix(a, Coord::Y, 5.0).unwrap();
        tree.fix(a, Coord::H, 5.0).unwrap();
        tree.layout(root).unwrap();

        let root_geometry = tree.geometry(root).unwrap();
        assert_eq!(root_geometry.w(), Some(50));
        assert_eq!(root_geometry.h(), Some(10));
        assert_eq!(tree.geometry(a).unwrap().get(Coord::X2), Some(0));
    }

    #[test]
    fn test_align_unsticks_missing_size() {
        let mut tree = form(300, 100);
        let root = tree.root();
        let a = tree.add_control(root, "a").unwrap();
        let b = tree.add_control(root, "b").unwrap();
        tree.fix(a, Coord::X, 10.0).unwrap();
        tree.align(b, Coord::X, a, Coord::XW, 5).unwrap();
        tree.layout(root).unwrap();

        // a received the default width so b could follow it
        assert_eq!(tree.geometry(a).unwrap().w(), Some(80));
        assert_eq!(tree.geometry(b).unwrap().x(), Some(95));
    }

    #[test]
    fn test_successful_order_is_persisted() {
        let mut tree = form(300, 100);
        let root = tree.root();
        let a = tree.add_control(root, "a").unwrap();
        let b = tree.add_control(root, "b").unwrap();
        let follow = tree.align(b, Coord::X, a, Coord::XW, 0).unwrap();
        let width = tree.fix(a, Coord::W, 10.0).unwrap();
        let anchor = tree.fix(a, Coord::X, 0.0).unwrap();
        tree.layout(root).unwrap();

        assert_eq!(
            tree.control(root).unwrap().constraints(),
            &[width, anchor, follow]
        );
    }
}
