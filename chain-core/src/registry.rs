//! The authoritative list of independent chains, kept as a derived index
//! over the physics world's joint graph. Any code path that mutates one
//! side mutates the other in the same logical step.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::chain::{Chain, ChainId};
use crate::link::{LinkId, LinkRole};
use crate::world::ChainWorld;

/// Rejected registry mutations. None of these are fatal at runtime; callers
/// degrade them to skipped events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A chain id passed to `replace_chains` is not (or no longer) live.
    UnknownChain(ChainId),
    /// An added link is still owned by a chain outside the removed set.
    LinkAlreadyOwned(LinkId),
    /// The same link appears twice in the added set.
    DuplicateLink(LinkId),
    /// A chain must hold at least one link.
    EmptyChain,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownChain(id) => write!(f, "chain {:?} is not live", id),
            RegistryError::LinkAlreadyOwned(l) => {
                write!(f, "link {:?} already belongs to another chain", l)
            }
            RegistryError::DuplicateLink(l) => write!(f, "link {:?} added twice", l),
            RegistryError::EmptyChain => write!(f, "refusing to register an empty chain"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Set of all currently live chains plus a link-to-chain back-reference so
/// `find_chain_of` never scans engine internals.
#[derive(Debug, Default)]
pub struct ChainRegistry {
    chains: BTreeMap<ChainId, Chain>,
    owner: HashMap<LinkId, ChainId>,
    next_id: u64,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh chain of at least one link. Every link must be
    /// currently unowned.
    pub fn insert(&mut self, links: Vec<LinkId>) -> Result<ChainId, RegistryError> {
        if links.is_empty() {
            return Err(RegistryError::EmptyChain);
        }
        for l in &links {
            if self.owner.contains_key(l) {
                return Err(RegistryError::LinkAlreadyOwned(*l));
            }
        }
        Ok(self.admit(links))
    }

    pub fn all_chains(&self) -> impl Iterator<Item = &Chain> {
        self.chains.values()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(&id)
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Total links across all live chains.
    pub fn link_count(&self) -> usize {
        self.owner.len()
    }

    pub fn find_chain_of(&self, link: LinkId) -> Option<ChainId> {
        self.owner.get(&link).copied()
    }

    pub fn end_links_of(&self, id: ChainId) -> Option<(LinkId, LinkId)> {
        self.chains.get(&id)?.end_links()
    }

    /// True iff the link sits at either extremity of its owning chain.
    pub fn is_end_link(&self, link: LinkId) -> bool {
        self.find_chain_of(link)
            .and_then(|id| self.chains.get(&id))
            .is_some_and(|c| c.is_end(link))
    }

    /// Atomically swap `removed` chains for the `added` link groups. Empty
    /// groups are discarded. Validation happens before any mutation: no
    /// added link may be owned outside the removed set and none may appear
    /// twice, so a failed call leaves the registry untouched.
    pub fn replace_chains(
        &mut self,
        removed: &[ChainId],
        added: Vec<Vec<LinkId>>,
    ) -> Result<Vec<ChainId>, RegistryError> {
        let mut freed: HashSet<LinkId> = HashSet::new();
        for id in removed {
            let chain = self
                .chains
                .get(id)
                .ok_or(RegistryError::UnknownChain(*id))?;
            freed.extend(chain.links().iter().copied());
        }
        let mut seen: HashSet<LinkId> = HashSet::new();
        for group in &added {
            for l in group {
                if !seen.insert(*l) {
                    return Err(RegistryError::DuplicateLink(*l));
                }
                if !freed.contains(l) && self.owner.contains_key(l) {
                    return Err(RegistryError::LinkAlreadyOwned(*l));
                }
            }
        }

        for id in removed {
            if let Some(chain) = self.chains.remove(id) {
                for l in chain.links() {
                    self.owner.remove(l);
                }
            }
        }
        let mut new_ids = Vec::new();
        for group in added {
            if group.is_empty() {
                continue;
            }
            new_ids.push(self.admit(group));
        }
        Ok(new_ids)
    }

    fn admit(&mut self, links: Vec<LinkId>) -> ChainId {
        let id = ChainId(self.next_id);
        self.next_id += 1;
        for l in &links {
            self.owner.insert(*l, id);
        }
        self.chains.insert(id, Chain::new(id, links));
        id
    }

    /// Reconciliation check used by tests: the registry must describe the
    /// same graph the world holds. Verifies the owner index, that every
    /// registered link is a chain-role body, and that consecutive links of
    /// every chain share a structural constraint (so a chain of k links has
    /// its k - 1 internal path edges).
    pub fn check_against<W: ChainWorld>(&self, world: &W) -> Result<(), String> {
        for chain in self.chains.values() {
            for l in chain.links() {
                if self.owner.get(l) != Some(&chain.id()) {
                    return Err(format!("owner index out of date for {:?}", l));
                }
                if world.role_of(*l) != Some(LinkRole::Chain) {
                    return Err(format!("{:?} registered but not a chain link", l));
                }
            }
            for pair in chain.links().windows(2) {
                let connected = world.structural_constraints(pair[0]).iter().any(|c| {
                    world
                        .constraint_ends(*c)
                        .is_some_and(|(a, b)| (a, b) == (pair[0], pair[1]) || (b, a) == (pair[0], pair[1]))
                });
                if !connected {
                    return Err(format!(
                        "links {:?} and {:?} adjacent in registry but not joined in world",
                        pair[0], pair[1]
                    ));
                }
            }
        }
        if self.owner.len() != self.chains.values().map(Chain::len).sum::<usize>() {
            return Err("owner index size disagrees with chain contents".into());
        }
        Ok(())
    }
}
