//! Capability surface the physics engine exposes to the core. The browser
//! build implements this over rapier2d; tests use an in-memory graph.

use crate::link::{ConstraintStyle, LinkId, LinkRole, LinkStyle};

/// Identity of a joint in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintId(pub u64);

/// What the merge resolver and the interaction controller need from the
/// simulated world. A constraint is *structural* when it joins two bodies
/// that both carry [`LinkRole::Chain`]; drag joints and fixed anchors are
/// excluded by that definition and never show up in the queries below.
pub trait ChainWorld {
    fn role_of(&self, link: LinkId) -> Option<LinkRole>;

    /// All structural constraints currently touching `link`.
    fn structural_constraints(&self, link: LinkId) -> Vec<ConstraintId>;

    /// Endpoints of a constraint, if it still exists.
    fn constraint_ends(&self, constraint: ConstraintId) -> Option<(LinkId, LinkId)>;

    /// Create a short connecting constraint between two links.
    fn connect(&mut self, a: LinkId, b: LinkId) -> ConstraintId;

    /// Destroy a constraint. Unknown ids are ignored.
    fn disconnect(&mut self, constraint: ConstraintId);

    /// Number of structural constraints touching `link`; a link with degree
    /// <= 1 is physically an end link.
    fn structural_degree(&self, link: LinkId) -> usize {
        self.structural_constraints(link).len()
    }

    fn set_link_style(&mut self, _link: LinkId, _style: LinkStyle) {}

    fn set_constraint_style(&mut self, _constraint: ConstraintId, _style: ConstraintStyle) {}
}
