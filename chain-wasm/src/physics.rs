//! rapier2d-backed implementation of the core's `ChainWorld` capability:
//! bodies, joints, collision events, point picking and the drag pointer.

use std::collections::HashMap;
use std::sync::Mutex;

use parry2d::query::PointQuery;
use rapier2d::prelude::*;

use chain_core::{
    ChainRegistry, ChainSeed, ChainWorld, ConstraintId, ConstraintStyle, LinkId, LinkRole,
    LinkStyle, Orientation, RegistryError,
};

use crate::constants::{
    DRAG_DAMPING, DRAG_STIFFNESS, GRAVITY_Y, LINK_HALF_LEN, LINK_HALF_THICK, WALL_THICKNESS,
    WORLD_H, WORLD_W,
};

/// Collects the tick's newly started contacts; drained after every step.
#[derive(Default)]
struct CollisionCollector {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl EventHandler for CollisionCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(a, b, _) = event
            && let Ok(mut started) = self.started.lock()
        {
            started.push((a, b));
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// The simulated world plus the indexes that translate between rapier
/// handles and the core's link/constraint identities.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    events: CollisionCollector,

    link_bodies: HashMap<LinkId, RigidBodyHandle>,
    body_links: HashMap<RigidBodyHandle, LinkId>,
    roles: HashMap<LinkId, LinkRole>,
    orientations: HashMap<LinkId, Orientation>,
    link_styles: HashMap<LinkId, LinkStyle>,
    joints: HashMap<ConstraintId, ImpulseJointHandle>,
    joint_ids: HashMap<ImpulseJointHandle, ConstraintId>,
    constraint_styles: HashMap<ConstraintId, ConstraintStyle>,
    next_link: u64,
    next_constraint: u64,

    pointer: RigidBodyHandle,
    drag_joint: Option<ImpulseJointHandle>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let mut bodies = RigidBodySet::new();
        // The drag pointer: a kinematic body the spring joint hooks onto.
        let pointer = bodies.insert(
            RigidBodyBuilder::kinematic_position_based().translation(vector![0.0, 0.0]),
        );
        let mut world = PhysicsWorld {
            gravity: vector![0.0, GRAVITY_Y],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            events: CollisionCollector::default(),
            link_bodies: HashMap::new(),
            body_links: HashMap::new(),
            roles: HashMap::new(),
            orientations: HashMap::new(),
            link_styles: HashMap::new(),
            joints: HashMap::new(),
            joint_ids: HashMap::new(),
            constraint_styles: HashMap::new(),
            next_link: 0,
            next_constraint: 0,
            pointer,
            drag_joint: None,
        };
        let pointer_id = world.register_body(pointer, LinkRole::DragAnchor);
        world.orientations.insert(pointer_id, Orientation::Horizontal);
        world
    }

    fn register_body(&mut self, handle: RigidBodyHandle, role: LinkRole) -> LinkId {
        let id = LinkId(self.next_link);
        self.next_link += 1;
        self.link_bodies.insert(id, handle);
        self.body_links.insert(handle, id);
        self.roles.insert(id, role);
        id
    }

    /// Static walls around the world rectangle so chains cannot be dragged
    /// off screen.
    pub fn spawn_walls(&mut self) {
        let ht = WALL_THICKNESS / 2.0;
        let walls = [
            (WORLD_W / 2.0, ht, WORLD_W / 2.0, ht),              // floor
            (WORLD_W / 2.0, WORLD_H - ht, WORLD_W / 2.0, ht),    // ceiling
            (ht, WORLD_H / 2.0, ht, WORLD_H / 2.0),              // left
            (WORLD_W - ht, WORLD_H / 2.0, ht, WORLD_H / 2.0),    // right
        ];
        for (x, y, hx, hy) in walls {
            let body = self
                .bodies
                .insert(RigidBodyBuilder::fixed().translation(vector![x, y]));
            self.colliders.insert_with_parent(
                ColliderBuilder::cuboid(hx, hy).friction(0.6),
                body,
                &mut self.bodies,
            );
            self.register_body(body, LinkRole::Boundary);
        }
    }

    /// Spawn one chain from a layout seed and register it. `group` is the
    /// chain's index in the original layout; links of the same original
    /// chain never collide with each other.
    pub fn spawn_chain(
        &mut self,
        registry: &mut ChainRegistry,
        seed: &ChainSeed,
        group: usize,
    ) -> Result<Vec<LinkId>, RegistryError> {
        let membership = Group::from_bits_truncate(1 << (group % 32));
        let filter = membership.complement();
        let (hx, hy) = match seed.orientation {
            Orientation::Horizontal => (LINK_HALF_LEN, LINK_HALF_THICK),
            Orientation::Vertical => (LINK_HALF_THICK, LINK_HALF_LEN),
        };

        let mut links = Vec::with_capacity(seed.positions.len());
        for (x, y) in &seed.positions {
            let body = self.bodies.insert(
                RigidBodyBuilder::dynamic()
                    .translation(vector![*x, *y])
                    .linear_damping(1.5)
                    .angular_damping(1.5),
            );
            self.colliders.insert_with_parent(
                ColliderBuilder::cuboid(hx, hy)
                    .density(1.0)
                    .friction(0.4)
                    .collision_groups(InteractionGroups::new(membership, filter))
                    .active_events(ActiveEvents::COLLISION_EVENTS),
                body,
                &mut self.bodies,
            );
            let id = self.register_body(body, LinkRole::Chain);
            self.orientations.insert(id, seed.orientation);
            links.push(id);
        }
        for pair in links.windows(2) {
            self.connect(pair[0], pair[1]);
        }
        registry.insert(links.clone())?;
        Ok(links)
    }

    /// Puzzle variant: hang a link from a fixed point at its current
    /// position. The anchor body is `Boundary`, so the joint is never
    /// counted as structural.
    pub fn pin_link(&mut self, link: LinkId) {
        let Some(&handle) = self.link_bodies.get(&link) else {
            return;
        };
        let pos = *self.bodies[handle].translation();
        let anchor = self
            .bodies
            .insert(RigidBodyBuilder::fixed().translation(vector![pos.x, pos.y]));
        self.register_body(anchor, LinkRole::Boundary);
        let joint = RevoluteJointBuilder::new()
            .local_anchor1(point![0.0, 0.0])
            .local_anchor2(point![0.0, 0.0]);
        self.impulse_joints.insert(anchor, handle, joint, true);
    }

    /// Advance the simulation one tick and return the newly-touching link
    /// pairs reported by the engine, in engine order.
    pub fn step(&mut self) -> Vec<(LinkId, LinkId)> {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &self.events,
        );
        let drained: Vec<(ColliderHandle, ColliderHandle)> = match self.events.started.lock() {
            Ok(mut started) => started.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        drained
            .into_iter()
            .filter_map(|(ca, cb)| Some((self.link_of_collider(ca)?, self.link_of_collider(cb)?)))
            .collect()
    }

    fn link_of_collider(&self, collider: ColliderHandle) -> Option<LinkId> {
        let body = self.colliders.get(collider)?.parent()?;
        self.body_links.get(&body).copied()
    }

    /// Topmost body under a world-space point, most recently spawned first.
    pub fn link_at_point(&self, x: f32, y: f32) -> Option<LinkId> {
        let p = point![x, y];
        let mut hit = None;
        for (handle, collider) in self.colliders.iter() {
            if collider.shape().contains_point(collider.position(), &p)
                && let Some(link) = self
                    .colliders
                    .get(handle)
                    .and_then(|c| c.parent())
                    .and_then(|b| self.body_links.get(&b))
            {
                hit = Some(*link);
            }
        }
        hit
    }

    pub fn begin_drag(&mut self, link: LinkId, x: f32, y: f32) {
        self.end_drag();
        let Some(&handle) = self.link_bodies.get(&link) else {
            return;
        };
        if self.roles.get(&link) != Some(&LinkRole::Chain) {
            return;
        }
        self.move_pointer(x, y);
        let local = self.bodies[handle]
            .position()
            .inverse_transform_point(&point![x, y]);
        let joint = SpringJointBuilder::new(0.0, DRAG_STIFFNESS, DRAG_DAMPING)
            .local_anchor1(point![0.0, 0.0])
            .local_anchor2(local);
        self.drag_joint = Some(self.impulse_joints.insert(self.pointer, handle, joint, true));
    }

    pub fn move_pointer(&mut self, x: f32, y: f32) {
        if let Some(pointer) = self.bodies.get_mut(self.pointer) {
            pointer.set_next_kinematic_translation(vector![x, y]);
        }
    }

    pub fn end_drag(&mut self) {
        if let Some(joint) = self.drag_joint.take() {
            self.impulse_joints.remove(joint, true);
        }
    }

    // ---- render access ----

    pub fn link_pose(&self, link: LinkId) -> Option<(f32, f32, f32)> {
        let handle = self.link_bodies.get(&link)?;
        let body = self.bodies.get(*handle)?;
        let t = body.translation();
        Some((t.x, t.y, body.rotation().angle()))
    }

    pub fn link_half_extents(&self, link: LinkId) -> (f32, f32) {
        match self.orientations.get(&link) {
            Some(Orientation::Vertical) => (LINK_HALF_THICK, LINK_HALF_LEN),
            _ => (LINK_HALF_LEN, LINK_HALF_THICK),
        }
    }

    pub fn link_style(&self, link: LinkId) -> LinkStyle {
        self.link_styles.get(&link).copied().unwrap_or_default()
    }

    /// World-space segments for every registered constraint, for drawing.
    pub fn constraint_segments(&self) -> Vec<((f32, f32), (f32, f32), ConstraintStyle)> {
        let mut out = Vec::with_capacity(self.joints.len());
        for (id, handle) in &self.joints {
            let Some(joint) = self.impulse_joints.get(*handle) else {
                continue;
            };
            let (Some(b1), Some(b2)) = (self.bodies.get(joint.body1), self.bodies.get(joint.body2))
            else {
                continue;
            };
            let (p1, p2) = (b1.translation(), b2.translation());
            let style = self.constraint_styles.get(id).copied().unwrap_or_default();
            out.push(((p1.x, p1.y), (p2.x, p2.y), style));
        }
        out
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainWorld for PhysicsWorld {
    fn role_of(&self, link: LinkId) -> Option<LinkRole> {
        self.roles.get(&link).copied()
    }

    fn structural_constraints(&self, link: LinkId) -> Vec<ConstraintId> {
        let Some(&handle) = self.link_bodies.get(&link) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for (b1, b2, jh, _) in self.impulse_joints.attached_joints(handle) {
            let other = if b1 == handle { b2 } else { b1 };
            let other_role = self
                .body_links
                .get(&other)
                .and_then(|l| self.roles.get(l));
            // Drag and anchor joints attach to non-chain bodies.
            if other_role != Some(&LinkRole::Chain) {
                continue;
            }
            if let Some(id) = self.joint_ids.get(&jh) {
                out.push(*id);
            }
        }
        out.sort_by_key(|c| c.0);
        out
    }

    fn constraint_ends(&self, constraint: ConstraintId) -> Option<(LinkId, LinkId)> {
        let handle = self.joints.get(&constraint)?;
        let joint = self.impulse_joints.get(*handle)?;
        Some((
            *self.body_links.get(&joint.body1)?,
            *self.body_links.get(&joint.body2)?,
        ))
    }

    fn connect(&mut self, a: LinkId, b: LinkId) -> ConstraintId {
        let id = ConstraintId(self.next_constraint);
        self.next_constraint += 1;
        let (Some(&ha), Some(&hb)) = (self.link_bodies.get(&a), self.link_bodies.get(&b)) else {
            return id;
        };
        // Pin the two links together at the midpoint between their centers;
        // for freshly spawned chains this is where neighbors overlap, for a
        // merge it is the contact point the collision just produced.
        let pa = self.bodies[ha].translation();
        let pb = self.bodies[hb].translation();
        let mid = point![(pa.x + pb.x) / 2.0, (pa.y + pb.y) / 2.0];
        let la = self.bodies[ha].position().inverse_transform_point(&mid);
        let lb = self.bodies[hb].position().inverse_transform_point(&mid);
        let joint = RevoluteJointBuilder::new()
            .local_anchor1(la)
            .local_anchor2(lb);
        let handle = self.impulse_joints.insert(ha, hb, joint, true);
        self.joints.insert(id, handle);
        self.joint_ids.insert(handle, id);
        id
    }

    fn disconnect(&mut self, constraint: ConstraintId) {
        if let Some(handle) = self.joints.remove(&constraint) {
            self.joint_ids.remove(&handle);
            self.impulse_joints.remove(handle, true);
        }
        self.constraint_styles.remove(&constraint);
    }

    fn set_link_style(&mut self, link: LinkId, style: LinkStyle) {
        self.link_styles.insert(link, style);
    }

    fn set_constraint_style(&mut self, constraint: ConstraintId, style: ConstraintStyle) {
        self.constraint_styles.insert(constraint, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_core::{FrameLayout, LayoutSpec};

    fn seeded_world() -> (PhysicsWorld, ChainRegistry, Vec<Vec<LinkId>>) {
        let mut world = PhysicsWorld::new();
        let mut registry = ChainRegistry::new();
        world.spawn_walls();
        let frame = FrameLayout {
            origin: (100.0, 100.0),
            width: 600.0,
            height: 400.0,
        };
        let mut chains = Vec::new();
        for (i, seed) in frame.seeds(&LayoutSpec::default()).iter().enumerate() {
            chains.push(world.spawn_chain(&mut registry, seed, i).unwrap());
        }
        (world, registry, chains)
    }

    #[test]
    fn spawned_chains_have_path_degrees() {
        let (world, registry, chains) = seeded_world();
        assert_eq!(registry.chain_count(), 4);
        assert_eq!(registry.link_count(), 12);
        for links in &chains {
            assert_eq!(world.structural_degree(links[0]), 1);
            assert_eq!(world.structural_degree(links[1]), 2);
            assert_eq!(world.structural_degree(links[2]), 1);
        }
        registry.check_against(&world).expect("registry mirrors world");
    }

    #[test]
    fn connect_and_disconnect_round_trip() {
        let (mut world, _registry, chains) = seeded_world();
        let (a, b) = (chains[0][2], chains[1][0]);
        let c = world.connect(a, b);
        assert_eq!(world.structural_degree(a), 2);
        assert_eq!(world.constraint_ends(c), Some((a, b)));
        world.disconnect(c);
        assert_eq!(world.structural_degree(a), 1);
        assert_eq!(world.constraint_ends(c), None);
    }

    #[test]
    fn anchor_and_drag_joints_are_not_structural() {
        let (mut world, _registry, chains) = seeded_world();
        let end = chains[0][0];
        world.pin_link(end);
        let (x, y, _) = world.link_pose(end).unwrap();
        world.begin_drag(end, x, y);
        assert_eq!(world.structural_degree(end), 1, "only the chain neighbor counts");
        world.end_drag();
    }

    #[test]
    fn picks_topmost_link_under_point() {
        let (world, _registry, chains) = seeded_world();
        let (x, y, _) = world.link_pose(chains[2][1]).unwrap();
        assert_eq!(world.link_at_point(x, y), Some(chains[2][1]));
        assert_eq!(world.link_at_point(-50.0, -50.0), None);
    }

    #[test]
    fn stepping_pulls_free_chains_down() {
        let (mut world, _registry, chains) = seeded_world();
        let (_, y0, _) = world.link_pose(chains[0][1]).unwrap();
        for _ in 0..30 {
            world.step();
        }
        let (_, y1, _) = world.link_pose(chains[0][1]).unwrap();
        assert!(y1 < y0, "gravity should lower an unsupported link");
    }
}
