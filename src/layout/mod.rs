//! Constraint-based layout of a control tree
//!
//! Controls carry ten write-once coordinates per pass. Constraints owned by
//! a container fix, align, fill or content-size its children, and the engine
//! iterates them to a fixed point before recursing into each child.

pub mod config;
pub mod constraint;
pub mod coord;
pub mod engine;
pub mod error;
pub mod fill;
pub mod form;
pub mod geometry;
pub mod tree;

pub use config::LayoutConfig;
pub use constraint::{Constraint, ConstraintKind};
pub use coord::{Axis, Coord, CoordKind, UnknownCoord};
pub use error::LayoutError;
pub use fill::FillConstraint;
pub use form::{Form, LayoutSnapshot, Placement};
pub use geometry::{AxisSpan, Geometry, Rect};
pub use tree::{Control, ControlArena, ControlId, ControlTree, ConstraintId};
