mod common;

use chain_core::{ChainRegistry, ChainWorld, LinkRole, resolve_collisions};
use common::TestWorld;

#[test]
fn end_links_touching_merges_chains() {
    let mut registry = ChainRegistry::new();
    let mut world = TestWorld::new();
    let a = world.spawn_chain(&mut registry, 3);
    let b = world.spawn_chain(&mut registry, 3);

    let merged = resolve_collisions(&mut registry, &mut world, &[(a[2], b[0])])
        .expect("end links of two chains should merge");
    assert_eq!(merged.links, 6);
    assert_eq!(registry.chain_count(), 1);
    assert_eq!(registry.link_count(), 6);
    assert_eq!(world.constraint_count(), 5, "4 originals + 1 connector");
    assert!(world.are_connected(a[2], b[0]));
    registry.check_against(&world).expect("registry mirrors world");
}

#[test]
fn drag_scenario_leaves_three_chains() {
    // Rectangle-frame start: four 3-link chains. Touch an end of chain A to
    // an end of chain B.
    let mut registry = ChainRegistry::new();
    let mut world = TestWorld::new();
    let a = world.spawn_chain(&mut registry, 3);
    let b = world.spawn_chain(&mut registry, 3);
    world.spawn_chain(&mut registry, 3);
    world.spawn_chain(&mut registry, 3);

    let merged = resolve_collisions(&mut registry, &mut world, &[(a[2], b[0])]).unwrap();
    assert_eq!(registry.chain_count(), 3);
    let chain = registry.chain(merged.chain).unwrap();
    assert_eq!(chain.len(), 6);
    // 5 structural constraints inside the merged chain.
    let internal: usize = chain
        .links()
        .windows(2)
        .filter(|w| world.are_connected(w[0], w[1]))
        .count();
    assert_eq!(internal, 5);
}

#[test]
fn merged_order_keeps_touching_ends_adjacent() {
    let mut registry = ChainRegistry::new();
    let mut world = TestWorld::new();
    let a = world.spawn_chain(&mut registry, 3);
    let b = world.spawn_chain(&mut registry, 3);

    // Touch the *first* end of a against the *last* end of b; both sides
    // must be reoriented so the pair ends up adjacent in the path.
    let merged = resolve_collisions(&mut registry, &mut world, &[(a[0], b[2])]).unwrap();
    let links = registry.chain(merged.chain).unwrap().links().to_vec();
    let ia = links.iter().position(|l| *l == a[0]).unwrap();
    let ib = links.iter().position(|l| *l == b[2]).unwrap();
    assert_eq!(
        ia.abs_diff(ib),
        1,
        "former end links must be neighbors, got positions {} and {}",
        ia,
        ib
    );
    registry.check_against(&world).expect("registry mirrors world");
}

#[test]
fn interior_links_never_merge() {
    let mut registry = ChainRegistry::new();
    let mut world = TestWorld::new();
    let a = world.spawn_chain(&mut registry, 3);
    let b = world.spawn_chain(&mut registry, 3);

    // Any pair where either side is interior is skipped, whatever the order.
    for pair in [(a[1], b[0]), (a[0], b[1]), (a[1], b[1]), (b[1], a[2])] {
        assert!(
            resolve_collisions(&mut registry, &mut world, &[pair]).is_none(),
            "interior pair {:?} must not merge",
            pair
        );
    }
    assert_eq!(registry.chain_count(), 2);
}

#[test]
fn same_chain_touch_is_rejected_after_merge() {
    let mut registry = ChainRegistry::new();
    let mut world = TestWorld::new();
    let a = world.spawn_chain(&mut registry, 3);
    let b = world.spawn_chain(&mut registry, 3);

    assert!(resolve_collisions(&mut registry, &mut world, &[(a[2], b[0])]).is_some());
    // Re-presenting the now co-resident pair must never merge again.
    assert!(resolve_collisions(&mut registry, &mut world, &[(a[2], b[0])]).is_none());
    assert!(resolve_collisions(&mut registry, &mut world, &[(b[0], a[2])]).is_none());
    assert_eq!(registry.chain_count(), 1);
    assert_eq!(world.constraint_count(), 5);
}

#[test]
fn at_most_one_merge_per_tick() {
    let mut registry = ChainRegistry::new();
    let mut world = TestWorld::new();
    let a = world.spawn_chain(&mut registry, 2);
    let b = world.spawn_chain(&mut registry, 2);
    let c = world.spawn_chain(&mut registry, 2);

    // Two valid pairs in one tick: only the first is honored.
    let pairs = [(a[1], b[0]), (b[1], c[0])];
    let merged = resolve_collisions(&mut registry, &mut world, &pairs).unwrap();
    assert_eq!(merged.links, 4);
    assert_eq!(registry.chain_count(), 2);

    // The skipped pair merges on the next tick.
    let merged = resolve_collisions(&mut registry, &mut world, &pairs).unwrap();
    assert_eq!(merged.links, 6);
    assert_eq!(registry.chain_count(), 1);
}

#[test]
fn non_chain_bodies_are_skipped() {
    let mut registry = ChainRegistry::new();
    let mut world = TestWorld::new();
    let a = world.spawn_chain(&mut registry, 2);
    let wall = world.add_body(LinkRole::Boundary);
    let pointer = world.add_body(LinkRole::DragAnchor);

    assert!(resolve_collisions(&mut registry, &mut world, &[(a[1], wall)]).is_none());
    assert!(resolve_collisions(&mut registry, &mut world, &[(pointer, a[0])]).is_none());
    assert_eq!(registry.chain_count(), 1);
}

#[test]
fn unregistered_link_is_skipped() {
    let mut registry = ChainRegistry::new();
    let mut world = TestWorld::new();
    let a = world.spawn_chain(&mut registry, 2);
    // A chain-role body the registry has never seen.
    let loose = world.add_body(LinkRole::Chain);

    assert!(resolve_collisions(&mut registry, &mut world, &[(a[1], loose)]).is_none());
}

#[test]
fn single_link_chains_merge() {
    let mut registry = ChainRegistry::new();
    let mut world = TestWorld::new();
    let a = world.spawn_chain(&mut registry, 1);
    let b = world.spawn_chain(&mut registry, 1);

    let merged = resolve_collisions(&mut registry, &mut world, &[(a[0], b[0])]).unwrap();
    assert_eq!(merged.links, 2);
    assert!(world.are_connected(a[0], b[0]));
    registry.check_against(&world).expect("registry mirrors world");
}
