/// Stable per-chain colors, cycling by index. A merged chain takes the
/// index of whichever color slot the renderer assigns it next; stability
/// only matters within one frame.
pub fn chain_color(i: usize) -> &'static str {
    const PALETTE: [&str; 8] = [
        "dodgerblue",     // 0
        "orangered",      // 1
        "mediumseagreen", // 2
        "gold",           // 3
        "blueviolet",     // 4
        "teal",           // 5
        "hotpink",        // 6
        "peru",           // 7
    ];
    PALETTE[i % PALETTE.len()]
}

/// Highlight for an opened link waiting for connections.
pub const OPENED_COLOR: &str = "crimson";

/// Highlight for a pending connector constraint.
pub const PENDING_COLOR: &str = "darkorange";
