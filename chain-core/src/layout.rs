//! Initial placement of the chains around a virtual rectangle. Pure
//! geometry, run once at startup; the seeds it produces are handed to the
//! physics layer to spawn bodies and to the registry to record the chains.

use serde::{Deserialize, Serialize};

use crate::link::Orientation;

/// Layout configuration. Loaded from the bundled default or fetched by name
/// via the `?layout=` query parameter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayoutSpec {
    /// Number of horizontal chains (rows).
    #[serde(default = "default_horizontal")]
    pub horizontal: u32,
    /// Number of vertical chains (columns).
    #[serde(default = "default_vertical")]
    pub vertical: u32,
    #[serde(default = "default_links")]
    pub links_per_chain: u32,
    /// Center-to-center distance between neighboring links.
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    // Optional per-layout notes in two languages
    pub note_en: Option<String>,
    pub note_zh: Option<String>,
}

fn default_horizontal() -> u32 {
    3
}
fn default_vertical() -> u32 {
    1
}
fn default_links() -> u32 {
    3
}
fn default_spacing() -> f32 {
    34.0
}

impl Default for LayoutSpec {
    fn default() -> Self {
        LayoutSpec {
            horizontal: default_horizontal(),
            vertical: default_vertical(),
            links_per_chain: default_links(),
            spacing: default_spacing(),
            note_en: None,
            note_zh: None,
        }
    }
}

/// Starting position of every link of one chain.
#[derive(Clone, Debug)]
pub struct ChainSeed {
    pub orientation: Orientation,
    pub positions: Vec<(f32, f32)>,
}

/// The virtual rectangle the chains are arranged around, in world units.
#[derive(Clone, Copy, Debug)]
pub struct FrameLayout {
    pub origin: (f32, f32),
    pub width: f32,
    pub height: f32,
}

impl FrameLayout {
    /// Horizontal chains become evenly spaced rows across the rectangle,
    /// vertical chains evenly spaced columns, each chain centered along its
    /// axis.
    pub fn seeds(&self, spec: &LayoutSpec) -> Vec<ChainSeed> {
        let n = spec.links_per_chain.max(1) as usize;
        let span = (n - 1) as f32 * spec.spacing;
        let (ox, oy) = self.origin;
        let mut seeds = Vec::with_capacity((spec.horizontal + spec.vertical) as usize);

        for row in 0..spec.horizontal {
            let y = oy + self.height * (row + 1) as f32 / (spec.horizontal + 1) as f32;
            let x0 = ox + (self.width - span) / 2.0;
            let positions = (0..n)
                .map(|i| (x0 + i as f32 * spec.spacing, y))
                .collect();
            seeds.push(ChainSeed {
                orientation: Orientation::Horizontal,
                positions,
            });
        }
        for col in 0..spec.vertical {
            let x = ox + self.width * (col + 1) as f32 / (spec.vertical + 1) as f32;
            let y0 = oy + (self.height - span) / 2.0;
            let positions = (0..n)
                .map(|i| (x, y0 + i as f32 * spec.spacing))
                .collect();
            seeds.push(ChainSeed {
                orientation: Orientation::Vertical,
                positions,
            });
        }
        seeds
    }
}
