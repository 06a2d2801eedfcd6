use chain_core::{FrameLayout, LayoutSpec, Orientation};

fn frame() -> FrameLayout {
    FrameLayout {
        origin: (100.0, 50.0),
        width: 400.0,
        height: 300.0,
    }
}

#[test]
fn default_spec_parses_from_empty_json() {
    let spec: LayoutSpec = serde_json::from_str("{}").unwrap();
    assert_eq!(spec.horizontal, 3);
    assert_eq!(spec.vertical, 1);
    assert_eq!(spec.links_per_chain, 3);
}

#[test]
fn spec_overrides_apply() {
    let spec: LayoutSpec =
        serde_json::from_str(r#"{"horizontal":2,"vertical":2,"links_per_chain":5,"spacing":20.0,"note_en":"hi"}"#)
            .unwrap();
    assert_eq!(spec.horizontal, 2);
    assert_eq!(spec.vertical, 2);
    assert_eq!(spec.links_per_chain, 5);
    assert_eq!(spec.note_en.as_deref(), Some("hi"));
}

#[test]
fn default_layout_yields_four_chains() {
    let seeds = frame().seeds(&LayoutSpec::default());
    assert_eq!(seeds.len(), 4);
    let horizontal = seeds
        .iter()
        .filter(|s| s.orientation == Orientation::Horizontal)
        .count();
    assert_eq!(horizontal, 3);
    for seed in &seeds {
        assert_eq!(seed.positions.len(), 3);
    }
}

#[test]
fn horizontal_rows_are_level_and_evenly_spaced() {
    let spec = LayoutSpec::default();
    let seeds = frame().seeds(&spec);
    for seed in seeds.iter().filter(|s| s.orientation == Orientation::Horizontal) {
        let y0 = seed.positions[0].1;
        for (i, (x, y)) in seed.positions.iter().enumerate() {
            assert_eq!(*y, y0, "row stays level");
            let expected = seed.positions[0].0 + i as f32 * spec.spacing;
            assert!((x - expected).abs() < 1e-4);
        }
    }
    // Rows split the frame height evenly.
    let ys: Vec<f32> = seeds
        .iter()
        .filter(|s| s.orientation == Orientation::Horizontal)
        .map(|s| s.positions[0].1)
        .collect();
    assert_eq!(ys, vec![125.0, 200.0, 275.0]);
}

#[test]
fn vertical_columns_run_down_the_frame() {
    let spec = LayoutSpec::default();
    let seeds = frame().seeds(&spec);
    let vertical: Vec<_> = seeds
        .iter()
        .filter(|s| s.orientation == Orientation::Vertical)
        .collect();
    assert_eq!(vertical.len(), 1);
    let col = vertical[0];
    let x0 = col.positions[0].0;
    assert_eq!(x0, 300.0, "single column sits mid-frame");
    for pair in col.positions.windows(2) {
        assert!((pair[1].1 - pair[0].1 - spec.spacing).abs() < 1e-4);
        assert_eq!(pair[0].0, pair[1].0);
    }
}

#[test]
fn chains_are_centered_along_their_axis() {
    let spec = LayoutSpec::default();
    let f = frame();
    let seeds = f.seeds(&spec);
    let row = &seeds[0];
    let first_x = row.positions.first().unwrap().0;
    let last_x = row.positions.last().unwrap().0;
    let mid = (first_x + last_x) / 2.0;
    assert!((mid - (f.origin.0 + f.width / 2.0)).abs() < 1e-3);
}
