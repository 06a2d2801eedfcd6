#![allow(dead_code)]

//! In-memory `ChainWorld` used by the test suites: a plain constraint graph
//! with the same role/structural rules the rapier-backed world applies.

use std::collections::HashMap;

use chain_core::{
    ChainRegistry, ChainWorld, ConstraintId, ConstraintStyle, LinkId, LinkRole, LinkStyle,
};

#[derive(Default)]
pub struct TestWorld {
    roles: HashMap<LinkId, LinkRole>,
    constraints: HashMap<ConstraintId, (LinkId, LinkId)>,
    pub link_styles: HashMap<LinkId, LinkStyle>,
    pub constraint_styles: HashMap<ConstraintId, ConstraintStyle>,
    next_link: u64,
    next_constraint: u64,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_body(&mut self, role: LinkRole) -> LinkId {
        let id = LinkId(self.next_link);
        self.next_link += 1;
        self.roles.insert(id, role);
        id
    }

    /// Spawn `n` connected chain links and register them as one chain.
    pub fn spawn_chain(&mut self, registry: &mut ChainRegistry, n: usize) -> Vec<LinkId> {
        let links: Vec<LinkId> = (0..n).map(|_| self.add_body(LinkRole::Chain)).collect();
        for pair in links.windows(2) {
            self.connect(pair[0], pair[1]);
        }
        registry
            .insert(links.clone())
            .expect("fresh links are unowned");
        links
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn are_connected(&self, a: LinkId, b: LinkId) -> bool {
        self.constraints
            .values()
            .any(|&(x, y)| (x, y) == (a, b) || (y, x) == (a, b))
    }
}

impl ChainWorld for TestWorld {
    fn role_of(&self, link: LinkId) -> Option<LinkRole> {
        self.roles.get(&link).copied()
    }

    fn structural_constraints(&self, link: LinkId) -> Vec<ConstraintId> {
        let mut out: Vec<ConstraintId> = self
            .constraints
            .iter()
            .filter(|(_, (a, b))| {
                (*a == link || *b == link)
                    && self.roles.get(a) == Some(&LinkRole::Chain)
                    && self.roles.get(b) == Some(&LinkRole::Chain)
            })
            .map(|(id, _)| *id)
            .collect();
        out.sort_by_key(|c| c.0);
        out
    }

    fn constraint_ends(&self, constraint: ConstraintId) -> Option<(LinkId, LinkId)> {
        self.constraints.get(&constraint).copied()
    }

    fn connect(&mut self, a: LinkId, b: LinkId) -> ConstraintId {
        let id = ConstraintId(self.next_constraint);
        self.next_constraint += 1;
        self.constraints.insert(id, (a, b));
        id
    }

    fn disconnect(&mut self, constraint: ConstraintId) {
        self.constraints.remove(&constraint);
        self.constraint_styles.remove(&constraint);
    }

    fn set_link_style(&mut self, link: LinkId, style: LinkStyle) {
        self.link_styles.insert(link, style);
    }

    fn set_constraint_style(&mut self, constraint: ConstraintId, style: ConstraintStyle) {
        self.constraint_styles.insert(constraint, style);
    }
}
