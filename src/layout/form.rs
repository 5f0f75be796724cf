//! The root form: scheduling and the last good layout
//!
//! Relayout requests are coalesced into a single pending pass that runs on
//! the next [`Form::frame`]. A pass that fails leaves the previous snapshot in
//! place, so painting keeps showing the last geometry that was consistent.

use slotmap::SecondaryMap;

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::geometry::{Geometry, Rect};
use super::tree::{ControlId, ControlTree};

/// Resolved geometry of one control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// All ten coordinates relative to the parent
    pub geometry: Geometry,
    /// Position and size in form coordinates
    pub bounds: Rect,
    /// Distance from the root
    pub depth: usize,
}

/// Read-only geometry captured after a successful pass
#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    placements: SecondaryMap<ControlId, Placement>,
    /// Depth-first paint order
    order: Vec<ControlId>,
}

impl LayoutSnapshot {
    /// Capture every fully placed, non-synthetic control of a tree
    pub fn capture(tree: &ControlTree) -> Self {
        let mut snapshot = Self::default();
        let mut stack = vec![(tree.root(), 0, 0, 0)];
        while let Some((id, dx, dy, depth)) = stack.pop() {
            let Some(control) = tree.control(id) else {
                continue;
            };
            if control.is_synthetic() {
                continue;
            }
            // a control with an underdetermined axis is skipped with its subtree
            let Some(local) = control.geometry().rect() else {
                continue;
            };
            let bounds = local.offset(dx, dy);
            snapshot.placements.insert(
                id,
                Placement {
                    geometry: *control.geometry(),
                    bounds,
                    depth,
                },
            );
            snapshot.order.push(id);
            for child in control.children().iter().rev() {
                stack.push((*child, bounds.x, bounds.y, depth + 1));
            }
        }
        snapshot
    }

    pub fn get(&self, id: ControlId) -> Option<&Placement> {
        self.placements.get(id)
    }

    /// Absolute bounds of a control
    pub fn bounds(&self, id: ControlId) -> Option<Rect> {
        self.placements.get(id).map(|placement| placement.bounds)
    }

    /// Placements in paint order (parents before children)
    pub fn iter(&self) -> impl Iterator<Item = (ControlId, &Placement)> {
        self.order
            .iter()
            .filter_map(|id| self.placements.get(*id).map(|placement| (*id, placement)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The topmost control containing a point in form coordinates
    pub fn hit_test(&self, x: i32, y: i32) -> Option<ControlId> {
        self.iter()
            .filter(|(_, placement)| placement.bounds.contains(x, y))
            .last()
            .map(|(id, _)| id)
    }
}

/// Root container that owns a control tree and schedules its layout
#[derive(Debug)]
pub struct Form {
    tree: ControlTree,
    snapshot: LayoutSnapshot,
    passes: u64,
}

impl Default for Form {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Form {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            tree: ControlTree::new(config),
            snapshot: LayoutSnapshot::default(),
            passes: 0,
        }
    }

    pub fn root(&self) -> ControlId {
        self.tree.root()
    }

    pub fn tree(&self) -> &ControlTree {
        &self.tree
    }

    /// Mutable access for declaring controls and constraints
    pub fn tree_mut(&mut self) -> &mut ControlTree {
        &mut self.tree
    }

    /// Set the viewport size. Without one the form fits its content.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.tree.set_viewport(Some(width), Some(height));
    }

    pub fn clear_size(&mut self) {
        self.tree.set_viewport(None, None);
    }

    pub fn request_layout(&mut self) {
        self.tree.request_layout();
    }

    pub fn needs_layout(&self) -> bool {
        self.tree.layout_requested()
    }

    /// Number of successful passes so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Geometry of the last successful pass
    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    /// Run the pending pass, if any. Returns whether a pass ran.
    pub fn frame(&mut self) -> Result<bool, LayoutError> {
        if !self.needs_layout() {
            return Ok(false);
        }
        self.layout()?;
        Ok(true)
    }

    /// Lay out the whole form now.
    ///
    /// On failure the pending request is dropped and the previous snapshot
    /// is kept.
    pub fn layout(&mut self) -> Result<(), LayoutError> {
        let root = self.tree.root();
        match self.tree.layout(root) {
            Ok(()) => {
                self.snapshot = LayoutSnapshot::capture(&self.tree);
                self.passes += 1;
                tracing::debug!(pass = self.passes, controls = self.snapshot.len(), "layout pass complete");
                Ok(())
            }
            Err(err) => {
                self.tree.clear_layout_request();
                tracing::error!(%err, "layout pass aborted; keeping previous geometry");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::coord::Coord;

    #[test]
    fn test_requests_are_coalesced() {
        let mut form = Form::default();
        form.resize(100, 100);
        let root = form.root();
        let a = form.tree_mut().add_control(root, "a").unwrap();
        form.tree_mut().fix(a, Coord::X, 1.0).unwrap();
        form.request_layout();

        assert!(form.frame().unwrap());
        assert!(!form.frame().unwrap());
        assert_eq!(form.passes(), 1);
    }

    #[test]
    fn test_viewport_sizes_the_root() {
        let mut form = Form::default();
        let root = form.root();
        let a = form.tree_mut().add_control(root, "a").unwrap();
        form.tree_mut().fix(a, Coord::W, 30.0).unwrap();
        form.tree_mut().fix(a, Coord::H, 20.0).unwrap();

        form.resize(120, 90);
        assert!(form.needs_layout());
        form.frame().unwrap();
        assert_eq!(form.snapshot().bounds(root), Some(Rect::new(0, 0, 120, 90)));

        form.clear_size();
        assert!(form.needs_layout());
        form.frame().unwrap();
        assert_eq!(form.snapshot().bounds(root), Some(Rect::new(0, 0, 30, 20)));
    }

    #[test]
    fn test_failed_pass_keeps_previous_snapshot() {
        let mut form = Form::default();
        form.resize(100, 100);
        let root = form.root();
        let a = form.tree_mut().add_control(root, "a").unwrap();
        let x = form.tree_mut().fix(a, Coord::X, 10.0).unwrap();
        form.tree_mut().fix(a, Coord::W, 20.0).unwrap();
        form.frame().unwrap();
        assert_eq!(form.snapshot().bounds(a).map(|r| r.x), Some(10));

        form.tree_mut().fix(a, Coord::XW, 99.0).unwrap();
        form.tree_mut().set_static(x, 40.0).unwrap();
        assert!(form.frame().is_err());
        assert!(!form.needs_layout());
        assert_eq!(form.snapshot().bounds(a).map(|r| r.x), Some(10));
    }

    #[test]
    fn test_snapshot_uses_absolute_bounds() {
        let mut form = Form::default();
        form.resize(200, 200);
        let root = form.root();
        let tree = form.tree_mut();
        let panel = tree.add_control(root, "panel").unwrap();
        let button = tree.add_control(panel, "button").unwrap();
        for (id, coord, value) in [
            (panel, Coord::X, 50.0),
            (panel, Coord::Y, 40.0),
            (panel, Coord::W, 100.0),
            (panel, Coord::H, 100.0),
            (button, Coord::X, 5.0),
            (button, Coord::Y, 6.0),
        ] {
            tree.fix(id, coord, value).unwrap();
        }
        form.layout().unwrap();

        let snapshot = form.snapshot();
        assert_eq!(snapshot.bounds(button), Some(Rect::new(55, 46, 80, 30)));
        assert_eq!(snapshot.get(button).unwrap().depth, 2);
        assert_eq!(snapshot.hit_test(60, 50), Some(button));
        assert_eq!(snapshot.hit_test(140, 130), Some(panel));
        assert_eq!(snapshot.hit_test(10, 10), Some(root));
        assert_eq!(snapshot.hit_test(500, 10), None);
    }
}
