//! Click-to-open puzzle variant: a small state machine that opens a link,
//! connects it to other chain ends and closes or cancels the session.

use crate::chain::ChainId;
use crate::link::{ConstraintStyle, LinkId, LinkRole, LinkStyle};
use crate::message::Instruction;
use crate::registry::ChainRegistry;
use crate::world::{ChainWorld, ConstraintId};

/// Observable controller state: `Idle -> LinkOpened -> Connecting -> Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    LinkOpened,
    Connecting,
}

/// One connection made during a session.
#[derive(Clone, Copy, Debug)]
pub struct Connection {
    /// The chain end the opened link was connected to.
    pub end: LinkId,
    /// The connector constraint created for it.
    pub constraint: ConstraintId,
}

/// Transient state of an in-progress open-link interaction. Created when a
/// link is opened, dropped when the session is closed or cancelled. While a
/// session lives, the opened link belongs to no registry chain.
#[derive(Clone, Debug)]
pub struct OpenLinkSession {
    opened: LinkId,
    /// Full link order of the chain that was split, for exact restore.
    original: Vec<LinkId>,
    /// Endpoints of the structural constraints removed to open the link.
    removed: Vec<(LinkId, LinkId)>,
    /// The sub-chains the split produced (zero, one or two).
    parts: Vec<ChainId>,
    connections: Vec<Connection>,
}

impl OpenLinkSession {
    pub fn opened(&self) -> LinkId {
        self.opened
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }
}

/// What a click (or cancel) did. `RejectedAnchor` is the defensive skip for
/// links with more structural constraints than any normal chain link can
/// carry; the caller may log it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClickOutcome {
    Opened { link: LinkId },
    Connected { count: usize },
    Closed { chain: ChainId, links: usize },
    Cancelled { partial: bool },
    RejectedAnchor { link: LinkId, degree: usize },
    Ignored,
}

#[derive(Debug, Default)]
pub struct LinkInteractionController {
    session: Option<OpenLinkSession>,
}

impl LinkInteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        match &self.session {
            None => InteractionState::Idle,
            Some(s) if s.connections.is_empty() => InteractionState::LinkOpened,
            Some(_) => InteractionState::Connecting,
        }
    }

    pub fn session(&self) -> Option<&OpenLinkSession> {
        self.session.as_ref()
    }

    /// The prompt matching the current state.
    pub fn instruction(&self) -> Instruction {
        match &self.session {
            None => Instruction::PickLink,
            Some(s) => match s.connections.len() {
                0 => Instruction::LinkOpened,
                1 => Instruction::OneConnected,
                _ => Instruction::TwoConnected,
            },
        }
    }

    pub fn handle_click<W: ChainWorld>(
        &mut self,
        registry: &mut ChainRegistry,
        world: &mut W,
        link: LinkId,
    ) -> ClickOutcome {
        match &self.session {
            None => self.open_link(registry, world, link),
            Some(s) if s.opened == link => self.close(registry, world),
            Some(_) => self.try_connect(registry, world, link),
        }
    }

    /// Roll the session back. Always restores the originally removed
    /// constraints; the registry split is only reversed when no connection
    /// was made. With connections present this is the observed
    /// partial rollback: connectors stay in the world and the split stays
    /// in the registry (`partial: true`).
    pub fn cancel<W: ChainWorld>(
        &mut self,
        registry: &mut ChainRegistry,
        world: &mut W,
    ) -> ClickOutcome {
        let Some(session) = self.session.take() else {
            return ClickOutcome::Ignored;
        };
        for (a, b) in &session.removed {
            world.connect(*a, *b);
        }
        let partial = !session.connections.is_empty();
        if !partial {
            let _ = registry.replace_chains(&session.parts, vec![session.original]);
        }
        for conn in &session.connections {
            world.set_constraint_style(conn.constraint, ConstraintStyle::Normal);
        }
        world.set_link_style(session.opened, LinkStyle::Normal);
        ClickOutcome::Cancelled { partial }
    }

    fn open_link<W: ChainWorld>(
        &mut self,
        registry: &mut ChainRegistry,
        world: &mut W,
        link: LinkId,
    ) -> ClickOutcome {
        if world.role_of(link) != Some(LinkRole::Chain) {
            return ClickOutcome::Ignored;
        }
        let Some(chain_id) = registry.find_chain_of(link) else {
            return ClickOutcome::Ignored;
        };
        let degree = world.structural_degree(link);
        if degree > 2 {
            // A normal chain link has at most two structural neighbors;
            // more means we hit some fixed point, so leave it alone.
            return ClickOutcome::RejectedAnchor { link, degree };
        }

        let Some(chain) = registry.chain(chain_id) else {
            return ClickOutcome::Ignored;
        };
        let original = chain.links().to_vec();
        let Some(idx) = chain.position_of(link) else {
            return ClickOutcome::Ignored;
        };
        let left = original[..idx].to_vec();
        let right = original[idx + 1..].to_vec();

        let mut removed = Vec::new();
        for c in world.structural_constraints(link) {
            if let Some(ends) = world.constraint_ends(c) {
                removed.push(ends);
            }
            world.disconnect(c);
        }
        let parts = match registry.replace_chains(&[chain_id], vec![left, right]) {
            Ok(ids) => ids,
            Err(_) => {
                // Defensive: put the constraints back and pretend the click
                // never happened.
                for (a, b) in &removed {
                    world.connect(*a, *b);
                }
                return ClickOutcome::Ignored;
            }
        };
        world.set_link_style(link, LinkStyle::Opened);
        self.session = Some(OpenLinkSession {
            opened: link,
            original,
            removed,
            parts,
            connections: Vec::new(),
        });
        ClickOutcome::Opened { link }
    }

    fn try_connect<W: ChainWorld>(
        &mut self,
        registry: &mut ChainRegistry,
        world: &mut W,
        link: LinkId,
    ) -> ClickOutcome {
        let Some(session) = self.session.as_mut() else {
            return ClickOutcome::Ignored;
        };
        if session.connections.len() >= 2
            || session.connections.iter().any(|c| c.end == link)
            || world.role_of(link) != Some(LinkRole::Chain)
            || !registry.is_end_link(link)
        {
            return ClickOutcome::Ignored;
        }
        // One connection per chain: taking both ends of the same chain
        // would close the merge into a ring instead of a path.
        let target = registry.find_chain_of(link);
        if session
            .connections
            .iter()
            .any(|c| registry.find_chain_of(c.end) == target)
        {
            return ClickOutcome::Ignored;
        }
        let constraint = world.connect(session.opened, link);
        world.set_constraint_style(constraint, ConstraintStyle::Pending);
        session.connections.push(Connection {
            end: link,
            constraint,
        });
        ClickOutcome::Connected {
            count: session.connections.len(),
        }
    }

    /// Click on the opened link: finalize with at least one connection,
    /// otherwise a full rollback.
    fn close<W: ChainWorld>(
        &mut self,
        registry: &mut ChainRegistry,
        world: &mut W,
    ) -> ClickOutcome {
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.connections.is_empty())
        {
            return self.cancel(registry, world);
        }
        let Some(session) = self.session.take() else {
            return ClickOutcome::Ignored;
        };

        world.set_link_style(session.opened, LinkStyle::Normal);
        for conn in &session.connections {
            world.set_constraint_style(conn.constraint, ConstraintStyle::Normal);
        }

        // Rebuild one chain from the opened link plus every chain reachable
        // through the connected ends, each oriented so its connected end
        // sits next to the opened link. Chain membership is re-resolved from
        // the registry here rather than trusted from the session.
        let mut absorbed: Vec<ChainId> = Vec::new();
        let mut links: Vec<LinkId> = Vec::new();
        links.push(session.opened);
        for conn in &session.connections {
            let Some(cid) = registry.find_chain_of(conn.end) else {
                continue;
            };
            if absorbed.contains(&cid) {
                continue;
            }
            let Some(chain) = registry.chain(cid) else {
                continue;
            };
            if links.len() == 1 {
                // First absorbed chain goes in front of the opened link.
                if let Some(mut front) = chain.oriented_end_last(conn.end) {
                    front.extend(links);
                    links = front;
                    absorbed.push(cid);
                }
            } else if let Some(back) = chain.oriented_end_first(conn.end) {
                links.extend(back);
                absorbed.push(cid);
            }
        }
        let total = links.len();
        match registry.replace_chains(&absorbed, vec![links]) {
            Ok(ids) => ClickOutcome::Closed {
                chain: ids[0],
                links: total,
            },
            Err(_) => ClickOutcome::Ignored,
        }
    }
}
