use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use chain_core::{ChainRegistry, Instruction, LayoutSpec, LinkId, LinkInteractionController};

use crate::physics::PhysicsWorld;
use crate::view::Viewport;

/// Which puzzle variant is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Drag chains; end links merge on contact.
    Auto,
    /// Click a link to open it, connect it to other chain ends, close it.
    Puzzle,
}

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub mode: Mode,
    pub layout: LayoutSpec,
    pub physics: PhysicsWorld,
    pub registry: ChainRegistry,
    pub controller: LinkInteractionController,
    pub dragging: Option<LinkId>,
    pub view: Viewport,
    /// Transient status override; `None` falls back to the mode's prompt.
    pub status: Option<Instruction>,
    // UI language: "en" or "zh"
    pub lang: String,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
