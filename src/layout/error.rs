//! Error types for the layout engine
//!
//! Every variant is fatal for the pass (or the call) that raised it: a
//! malformed constraint graph is reported, never papered over.

use thiserror::Error;

use super::coord::Coord;

/// Errors that can occur while declaring constraints or laying out controls
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A coordinate was written twice in one pass
    #[error("overspecified coordinate {control}.{coord}: already {existing}, cannot set to {attempted}")]
    Overspecified {
        control: String,
        coord: Coord,
        existing: i32,
        attempted: i32,
    },

    /// Both sides of an alignment were resolved by other rules
    #[error("aligning two coordinates that are already specified: {constraint}")]
    AlignOverspecified { constraint: String },

    /// A fill target already had a size when the fill wrote its share
    #[error("fill conflict: {control}.{coord} is already set by another rule ({constraint})")]
    FillConflict {
        control: String,
        coord: Coord,
        constraint: String,
    },

    /// The first control of a fill never received a size from the other rules
    #[error("fill could not resolve {control}.{coord}: pin it with align/static constraints ({constraint})")]
    FillUnresolved {
        control: String,
        coord: Coord,
        constraint: String,
    },

    /// No pending constraint could make progress or unstick
    #[error("unable to apply remaining constraints in '{container}': {}", remaining.join("; "))]
    Stuck {
        container: String,
        remaining: Vec<String>,
    },

    /// A written or derived coordinate does not fit in the pixel range
    #[error("coordinate {control}.{coord} is out of range")]
    OutOfRange { control: String, coord: Coord },

    /// The outer-round cap was exceeded
    #[error("layout of '{container}' did not converge after {rounds} rounds")]
    NonConvergent { container: String, rounds: usize },

    #[error("unknown control")]
    UnknownControl,

    #[error("unknown constraint")]
    UnknownConstraint,

    /// Constraints can only reference controls that are attached to a parent
    #[error("control '{control}' has no parent and cannot be constrained")]
    NoParent { control: String },

    /// All controls of one constraint must be siblings
    #[error("controls '{first}' and '{second}' do not share a parent")]
    ParentMismatch { first: String, second: String },

    #[error("fill needs at least two controls, got {count}")]
    FillTooFew { count: usize },

    #[error("control '{control}' appears more than once in a fill")]
    DuplicateFillControl { control: String },

    #[error("fill has {controls} controls but {ratios} ratios")]
    RatioMismatch { controls: usize, ratios: usize },

    #[error("fill ratio {ratio} must be a positive number")]
    InvalidRatio { ratio: f64 },

    /// Fill and content constraints only operate on `w` or `h`
    #[error("coordinate '{coord}' is not a width or height")]
    NotASize { coord: Coord },

    #[error("control '{control}' cannot be aligned to its own {coord}")]
    SelfAlignment { control: String, coord: Coord },

    /// Detaching a control that constraints still point at
    #[error("control '{control}' is still referenced by {count} constraint(s)")]
    StillReferenced { control: String, count: usize },

    #[error("the root control cannot be detached")]
    DetachRoot,

    #[error("constraint '{constraint}' is not a static constraint")]
    NotStatic { constraint: String },
}

impl LayoutError {
    pub fn overspecified(control: impl Into<String>, coord: Coord, existing: i32, attempted: i32) -> Self {
        Self::Overspecified {
            control: control.into(),
            coord,
            existing,
            attempted,
        }
    }

    pub fn stuck(container: impl Into<String>, remaining: Vec<String>) -> Self {
        Self::Stuck {
            container: container.into(),
            remaining,
        }
    }

    pub fn out_of_range(control: impl Into<String>, coord: Coord) -> Self {
        Self::OutOfRange {
            control: control.into(),
            coord,
        }
    }

    /// Whether a failed content measurement should wait for a later attempt.
    ///
    /// Only a deadlock or an unfinished fill can clear up once more of the
    /// parent is known; every other failure is an authoring error in the
    /// measured subtree.
    pub(crate) fn is_deferrable(&self) -> bool {
        matches!(self, Self::Stuck { .. } | Self::FillUnresolved { .. })
    }

    /// True for errors raised by a layout pass rather than by misuse of the API
    pub fn is_pass_failure(&self) -> bool {
        matches!(
            self,
            Self::Overspecified { .. }
                | Self::AlignOverspecified { .. }
                | Self::FillConflict { .. }
                | Self::FillUnresolved { .. }
                | Self::Stuck { .. }
                | Self::NonConvergent { .. }
                | Self::OutOfRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overspecified_display() {
        let err = LayoutError::overspecified("sidebar", Coord::W, 120, 80);
        assert_eq!(
            err.to_string(),
            "overspecified coordinate sidebar.w: already 120, cannot set to 80"
        );
    }

    #[test]
    fn test_stuck_display_lists_constraints() {
        let err = LayoutError::stuck(
            "root",
            vec!["a.x = b.x".to_string(), "b.x = a.x".to_string()],
        );
        assert!(err.to_string().contains("a.x = b.x; b.x = a.x"));
        assert!(err.is_pass_failure());
    }

    #[test]
    fn test_only_waiting_errors_are_deferrable() {
        assert!(LayoutError::stuck("panel", vec![]).is_deferrable());
        assert!(!LayoutError::overspecified("ok", Coord::X, 1, 2).is_deferrable());
        assert!(!LayoutError::out_of_range("ok", Coord::XW).is_deferrable());
        assert!(LayoutError::out_of_range("ok", Coord::XW).is_pass_failure());
    }

    #[test]
    fn test_structural_errors_are_not_pass_failures() {
        assert!(!LayoutError::FillTooFew { count: 1 }.is_pass_failure());
        assert!(!LayoutError::DetachRoot.is_pass_failure());
    }
}
