use crate::link::LinkId;

/// Identity of a live chain in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub u64);

/// An ordered, path-shaped group of links. The links at index 0 and
/// `len - 1` are the end links; a chain of one link is its own both ends.
#[derive(Clone, Debug)]
pub struct Chain {
    id: ChainId,
    links: Vec<LinkId>,
}

impl Chain {
    pub(crate) fn new(id: ChainId, links: Vec<LinkId>) -> Self {
        Chain { id, links }
    }

    pub fn id(&self) -> ChainId {
        self.id
    }

    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The two extremities, first and last. For a single-link chain both are
    /// that link.
    pub fn end_links(&self) -> Option<(LinkId, LinkId)> {
        Some((*self.links.first()?, *self.links.last()?))
    }

    pub fn is_end(&self, link: LinkId) -> bool {
        self.links.first() == Some(&link) || self.links.last() == Some(&link)
    }

    pub fn position_of(&self, link: LinkId) -> Option<usize> {
        self.links.iter().position(|l| *l == link)
    }

    /// Link order with `end` moved to the back, reversing if needed.
    /// `None` when `end` is not an extremity of this chain.
    pub fn oriented_end_last(&self, end: LinkId) -> Option<Vec<LinkId>> {
        if self.links.last() == Some(&end) {
            Some(self.links.clone())
        } else if self.links.first() == Some(&end) {
            Some(self.links.iter().rev().copied().collect())
        } else {
            None
        }
    }

    /// Link order with `end` moved to the front, reversing if needed.
    pub fn oriented_end_first(&self, end: LinkId) -> Option<Vec<LinkId>> {
        if self.links.first() == Some(&end) {
            Some(self.links.clone())
        } else if self.links.last() == Some(&end) {
            Some(self.links.iter().rev().copied().collect())
        } else {
            None
        }
    }
}
