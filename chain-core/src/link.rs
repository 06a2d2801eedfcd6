use serde::{Deserialize, Serialize};

/// Identity of one rigid chain segment. Allocated by the physics layer and
/// treated as opaque everywhere in the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u64);

/// What a rigid body in the world stands for. Merge and interaction logic
/// only ever acts on `Chain` bodies; the other roles exist so walls and the
/// drag pointer can be rejected exhaustively instead of by string compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkRole {
    /// A segment of a chain.
    Chain,
    /// Static scenery: walls and fixed anchor points.
    Boundary,
    /// The kinematic pointer body the drag joint attaches to.
    DragAnchor,
}

/// Visual state of a link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkStyle {
    #[default]
    Normal,
    /// The link is detached and waiting for connections.
    Opened,
}

/// Visual state of a constraint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConstraintStyle {
    #[default]
    Normal,
    /// A connector made during an open-link session, not yet finalized.
    Pending,
}

/// Axis a chain is laid out along. Horizontal links are wider than tall,
/// vertical links taller than wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}
