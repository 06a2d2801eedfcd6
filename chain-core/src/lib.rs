//! Core logic for the chain-link puzzle: the chain registry, the collision
//! merge resolver, the click-to-open interaction controller and the initial
//! layout builder. Everything here is pure and platform independent; the
//! physics engine and the DOM are reached only through the [`ChainWorld`]
//! trait and the [`Instruction`] messages.

mod chain;
mod controller;
mod layout;
mod link;
mod merge;
mod message;
mod palette;
mod registry;
mod world;

pub use chain::{Chain, ChainId};
pub use controller::{
    ClickOutcome, Connection, InteractionState, LinkInteractionController, OpenLinkSession,
};
pub use layout::{ChainSeed, FrameLayout, LayoutSpec};
pub use link::{ConstraintStyle, LinkId, LinkRole, LinkStyle, Orientation};
pub use merge::{MergedChains, resolve_collisions};
pub use message::Instruction;
pub use palette::{OPENED_COLOR, PENDING_COLOR, chain_color};
pub use registry::{ChainRegistry, RegistryError};
pub use world::{ChainWorld, ConstraintId};
