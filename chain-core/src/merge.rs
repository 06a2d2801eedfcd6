//! Auto-merge variant: decide, per collision tick, whether a pair of
//! touching bodies should join their chains.

use crate::chain::ChainId;
use crate::link::{LinkId, LinkRole};
use crate::registry::ChainRegistry;
use crate::world::{ChainWorld, ConstraintId};

/// Outcome of an accepted merge.
#[derive(Clone, Copy, Debug)]
pub struct MergedChains {
    /// The surviving chain (a fresh id; both inputs are gone).
    pub chain: ChainId,
    /// The constraint inserted between the two former end links.
    pub connector: ConstraintId,
    /// Link count of the merged chain.
    pub links: usize,
}

/// Process one collision tick's newly-touching pairs, in engine order, and
/// perform at most one merge. Stopping after the first accepted pair keeps
/// later pairs in the same tick from acting on chains that no longer exist;
/// a skipped pair simply waits for a future tick.
///
/// A pair is accepted only when both bodies are chain links, they belong to
/// two different live chains, and both are end links (structural degree
/// <= 1). Everything else is a silent no-op.
pub fn resolve_collisions<W: ChainWorld>(
    registry: &mut ChainRegistry,
    world: &mut W,
    pairs: &[(LinkId, LinkId)],
) -> Option<MergedChains> {
    for (a, b) in pairs.iter().copied() {
        if world.role_of(a) != Some(LinkRole::Chain) || world.role_of(b) != Some(LinkRole::Chain) {
            continue;
        }
        let (Some(chain_a), Some(chain_b)) = (registry.find_chain_of(a), registry.find_chain_of(b))
        else {
            continue;
        };
        if chain_a == chain_b {
            // Self-touch, including re-presented pairs of an earlier merge.
            continue;
        }
        // Stale ids cannot survive the owner lookup above, but a chain may
        // in principle have been emptied by the same tick's bookkeeping.
        let (Some(ca), Some(cb)) = (registry.chain(chain_a), registry.chain(chain_b)) else {
            continue;
        };
        if ca.is_empty() || cb.is_empty() {
            continue;
        }
        if world.structural_degree(a) > 1 || world.structural_degree(b) > 1 {
            // Interior links never trigger a merge.
            continue;
        }

        let (Some(mut links), Some(tail)) = (ca.oriented_end_last(a), cb.oriented_end_first(b))
        else {
            continue;
        };
        links.extend(tail);
        let total = links.len();
        let connector = world.connect(a, b);
        match registry.replace_chains(&[chain_a, chain_b], vec![links]) {
            Ok(ids) => {
                let chain = ids[0];
                return Some(MergedChains {
                    chain,
                    connector,
                    links: total,
                });
            }
            Err(_) => {
                // Keep world and registry agreeing even on a rejected swap.
                world.disconnect(connector);
                continue;
            }
        }
    }
    None
}
