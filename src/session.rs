use bevy::prelude::*;

use crate::court::{classify, CourtDims};
use crate::engine::{
    compute_target_position, CrewSize, EngineError, GameSnapshot, PositioningMode, Slot, Target,
    Tuning,
};
use crate::rotation::{update_rotation_state, RefereeAssignment, RotationState};

/// The dragged ball. `last_x` is the previous sample consumed by the
/// rotation state machine.
#[derive(Resource, Debug, Clone, Copy)]
pub struct BallState {
    pub position: Vec2,
    pub last_x: f32,
}

impl BallState {
    pub fn centered(dims: &CourtDims) -> Self {
        let center = dims.center();
        Self {
            position: center,
            last_x: center.x,
        }
    }
}

/// A polled one-shot flag: armed for a fixed duration, then clears itself.
/// Re-arming supersedes the pending expiry — the generation counter marks
/// which arming is current, so an older expiry can never clobber a newer
/// arm.
#[derive(Debug, Clone)]
pub struct OneShotFlag {
    timer: Timer,
    generation: u32,
    active: bool,
}

impl Default for OneShotFlag {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(0.0, TimerMode::Once),
            generation: 0,
            active: false,
        }
    }
}

impl OneShotFlag {
    pub fn arm(&mut self, duration_secs: f32) {
        self.timer = Timer::from_seconds(duration_secs, TimerMode::Once);
        self.generation = self.generation.wrapping_add(1);
        self.active = true;
    }

    /// Advance the current arming. Returns true on the tick the flag clears.
    pub fn tick(&mut self, delta: std::time::Duration) -> bool {
        if !self.active {
            return false;
        }
        self.timer.tick(delta);
        if self.timer.finished() {
            self.active = false;
            true
        } else {
            false
        }
    }

    pub fn is_set(&self) -> bool {
        self.active
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn clear(&mut self) {
        self.active = false;
    }
}

/// Shot mode: armed when the dragged ball comes within shot distance of the
/// basket, auto-clearing after a fixed interval.
#[derive(Resource, Debug, Clone, Default)]
pub struct ShotClock(pub OneShotFlag);

/// Transient rotation-highlight flag consumed by the renderer.
#[derive(Resource, Debug, Clone, Default)]
pub struct TransitionFlash(pub OneShotFlag);

/// Rotation machinery: crossing tracker plus the live slot→role mapping.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RotationTracker {
    pub state: RotationState,
    pub assignment: RefereeAssignment,
}

/// Per-slot target positions. `SlotTargets` always holds the latest
/// auto-computed targets (the last-known-good fallback for manual mode);
/// `RenderTargets` is what the markers actually ease toward.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SlotTargets {
    pub lead_slot: Target,
    pub trail_slot: Target,
    pub center_slot: Target,
}

impl Default for SlotTargets {
    fn default() -> Self {
        let t = Target {
            pos: Vec2::ZERO,
            visible: true,
        };
        Self {
            lead_slot: t,
            trail_slot: t,
            center_slot: t,
        }
    }
}

impl SlotTargets {
    pub fn get(&self, slot: Slot) -> Target {
        match slot {
            Slot::LeadSlot => self.lead_slot,
            Slot::TrailSlot => self.trail_slot,
            Slot::CenterSlot => self.center_slot,
        }
    }

    pub fn set(&mut self, slot: Slot, target: Target) {
        match slot {
            Slot::LeadSlot => self.lead_slot = target,
            Slot::TrailSlot => self.trail_slot = target,
            Slot::CenterSlot => self.center_slot = target,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RenderTargets(pub SlotTargets);

/// Independently user-set marker positions for manual training mode. Seeded
/// from the current auto targets when the mode flips, so the switch never
/// jumps a marker.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ManualPositions {
    pub lead_slot: Option<Vec2>,
    pub trail_slot: Option<Vec2>,
    pub center_slot: Option<Vec2>,
    warned_uninit: bool,
}

impl ManualPositions {
    pub fn get(&self, slot: Slot) -> Option<Vec2> {
        match slot {
            Slot::LeadSlot => self.lead_slot,
            Slot::TrailSlot => self.trail_slot,
            Slot::CenterSlot => self.center_slot,
        }
    }

    pub fn set(&mut self, slot: Slot, pos: Vec2) {
        match slot {
            Slot::LeadSlot => self.lead_slot = Some(pos),
            Slot::TrailSlot => self.trail_slot = Some(pos),
            Slot::CenterSlot => self.center_slot = Some(pos),
        }
    }

    pub fn seed_from(&mut self, targets: &SlotTargets) {
        self.lead_slot = Some(targets.lead_slot.pos);
        self.trail_slot = Some(targets.trail_slot.pos);
        self.center_slot = Some(targets.center_slot.pos);
        self.warned_uninit = false;
    }

    pub fn clear(&mut self) {
        self.lead_slot = None;
        self.trail_slot = None;
        self.center_slot = None;
        self.warned_uninit = false;
    }
}

/// Fired when a Lead/Trail rotation swap happens; the particle layer reacts.
#[derive(Event)]
pub struct RotationFired {
    pub lead_slot_pos: Vec2,
    pub trail_slot_pos: Vec2,
}

// --- Systems ----------------------------------------------------------------

/// Recompute the derived game state from the ball position each frame.
pub fn derive_game_state(
    ball: Res<BallState>,
    shot_clock: Res<ShotClock>,
    crew: Res<CrewSize>,
    dims: Res<CourtDims>,
    mut snapshot: ResMut<GameSnapshot>,
) {
    let classification = classify(ball.position, &dims);
    *snapshot = GameSnapshot::derive(classification, shot_clock.0.is_set(), *crew);
}

/// Advance the one-shot flag timers.
pub fn tick_flags(
    time: Res<Time>,
    mut shot_clock: ResMut<ShotClock>,
    mut flash: ResMut<TransitionFlash>,
) {
    if shot_clock.0.tick(time.delta()) {
        debug!("shot mode cleared");
    }
    flash.0.tick(time.delta());
}

/// Feed ball x samples to the rotation state machine and apply swaps to the
/// assignment mapping. Suspended in manual training mode.
pub fn rotation_system(
    time: Res<Time>,
    mode: Res<PositioningMode>,
    dims: Res<CourtDims>,
    tuning: Res<Tuning>,
    mut ball: ResMut<BallState>,
    mut tracker: ResMut<RotationTracker>,
    mut flash: ResMut<TransitionFlash>,
    targets: Res<RenderTargets>,
    mut fired: EventWriter<RotationFired>,
) {
    if *mode == PositioningMode::Manual {
        ball.last_x = ball.position.x;
        return;
    }

    let (new_state, swapped) = update_rotation_state(
        tracker.state,
        ball.position.x,
        ball.last_x,
        time.elapsed_secs_f64(),
        &dims,
        &tuning,
    );
    tracker.state = new_state;

    if swapped {
        tracker.assignment.swap();
        flash.0.arm(tuning.flash_secs);
        info!(
            "transition rotation: lead slot now covers {:?}",
            tracker.assignment.role_for(Slot::LeadSlot)
        );
        fired.send(RotationFired {
            lead_slot_pos: targets.0.lead_slot.pos,
            trail_slot_pos: targets.0.trail_slot.pos,
        });
    }

    ball.last_x = ball.position.x;
}

/// Compute the auto target for every slot from its current role.
pub fn compute_slot_targets(
    ball: Res<BallState>,
    snapshot: Res<GameSnapshot>,
    dims: Res<CourtDims>,
    tuning: Res<Tuning>,
    tracker: Res<RotationTracker>,
    mut targets: ResMut<SlotTargets>,
) {
    for slot in Slot::ALL {
        let role = tracker.assignment.role_for(slot);
        targets.set(
            slot,
            compute_target_position(role, ball.position, &snapshot, &dims, &tuning),
        );
    }
}

/// Pick the rendered target per slot: the manual coordinate in manual mode,
/// otherwise the engine output. A manual slot with no coordinate yet falls
/// back to the last auto target rather than failing.
pub fn resolve_render_targets(
    mode: Res<PositioningMode>,
    crew: Res<CrewSize>,
    auto: Res<SlotTargets>,
    mut manual: ResMut<ManualPositions>,
    mut render: ResMut<RenderTargets>,
) {
    for slot in Slot::ALL {
        let auto_target = auto.get(slot);
        let target = match *mode {
            PositioningMode::Auto => auto_target,
            PositioningMode::Manual => match manual.get(slot) {
                Some(pos) => Target {
                    pos,
                    visible: auto_target.visible,
                },
                None => {
                    if !manual.warned_uninit {
                        warn!(
                            "{}, using last auto target",
                            EngineError::InconsistentMode(slot.label())
                        );
                        manual.warned_uninit = true;
                    }
                    auto_target
                }
            },
        };
        render.0.set(slot, target);
    }

    // Two-person crews never show the center slot, in either mode.
    if *crew == CrewSize::TwoPerson {
        let mut t = render.0.center_slot;
        t.visible = false;
        render.0.center_slot = t;
    }
}

/// Put the session back to its starting state. Called from the UI reset
/// button and at startup.
pub fn reset_session(
    dims: &CourtDims,
    ball: &mut BallState,
    tracker: &mut RotationTracker,
    shot_clock: &mut ShotClock,
    flash: &mut TransitionFlash,
    manual: &mut ManualPositions,
) {
    *ball = BallState::centered(dims);
    *tracker = RotationTracker::default();
    shot_clock.0.clear();
    flash.0.clear();
    manual.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn one_shot_flag_arms_and_expires() {
        let mut flag = OneShotFlag::default();
        assert!(!flag.is_set());

        flag.arm(1.5);
        assert!(flag.is_set());

        assert!(!flag.tick(Duration::from_millis(1000)));
        assert!(flag.is_set());

        // Crosses 1.5s total: clears exactly once.
        assert!(flag.tick(Duration::from_millis(600)));
        assert!(!flag.is_set());
        assert!(!flag.tick(Duration::from_millis(600)));
    }

    #[test]
    fn rearming_supersedes_the_pending_expiry() {
        let mut flag = OneShotFlag::default();
        flag.arm(1.5);
        let first_gen = flag.generation();

        flag.tick(Duration::from_millis(1400));
        // Qualifying event just before expiry: full duration again.
        flag.arm(1.5);
        assert_ne!(flag.generation(), first_gen);

        // The old arming's remaining 100ms must not clear the new one.
        assert!(!flag.tick(Duration::from_millis(200)));
        assert!(flag.is_set());

        assert!(flag.tick(Duration::from_millis(1400)));
        assert!(!flag.is_set());
    }

    #[test]
    fn manual_seed_copies_auto_targets() {
        let mut targets = SlotTargets::default();
        targets.set(
            Slot::LeadSlot,
            Target {
                pos: Vec2::new(700.0, 100.0),
                visible: true,
            },
        );
        targets.set(
            Slot::CenterSlot,
            Target {
                pos: Vec2::new(500.0, 300.0),
                visible: true,
            },
        );

        let mut manual = ManualPositions::default();
        assert_eq!(manual.get(Slot::LeadSlot), None);

        manual.seed_from(&targets);
        assert_eq!(manual.get(Slot::LeadSlot), Some(Vec2::new(700.0, 100.0)));
        assert_eq!(manual.get(Slot::CenterSlot), Some(Vec2::new(500.0, 300.0)));
    }

    #[test]
    fn pipeline_resolves_targets_and_crew_visibility() {
        let dims = CourtDims::default();
        let mut app = App::new();
        app.insert_resource(dims)
            .insert_resource(Tuning::default())
            .insert_resource(BallState::centered(&dims))
            .insert_resource(GameSnapshot::default())
            .insert_resource(CrewSize::ThreePerson)
            .insert_resource(PositioningMode::Auto)
            .insert_resource(RotationTracker::default())
            .insert_resource(ShotClock::default())
            .insert_resource(SlotTargets::default())
            .insert_resource(RenderTargets::default())
            .insert_resource(ManualPositions::default())
            .add_systems(
                Update,
                (derive_game_state, compute_slot_targets, resolve_render_targets).chain(),
            );

        app.update();
        let render = app.world().resource::<RenderTargets>();
        assert!(render.0.lead_slot.visible);
        assert!(render.0.center_slot.visible);
        assert!(render.0.lead_slot.pos != Vec2::ZERO);

        // Dropping to a two-person crew hides the center slot output.
        app.insert_resource(CrewSize::TwoPerson);
        app.update();
        let render = app.world().resource::<RenderTargets>();
        assert!(!render.0.center_slot.visible);
        assert!(render.0.lead_slot.visible);
    }

    #[test]
    fn reset_restores_defaults() {
        let dims = CourtDims::default();
        let mut ball = BallState {
            position: Vec2::new(10.0, 10.0),
            last_x: 10.0,
        };
        let mut tracker = RotationTracker::default();
        tracker.assignment.swap();
        let mut shot = ShotClock::default();
        shot.0.arm(1.5);
        let mut flash = TransitionFlash::default();
        let mut manual = ManualPositions::default();
        manual.set(Slot::LeadSlot, Vec2::new(1.0, 2.0));

        reset_session(
            &dims, &mut ball, &mut tracker, &mut shot, &mut flash, &mut manual,
        );

        assert_eq!(ball.position, dims.center());
        assert_eq!(
            tracker.assignment.role_for(Slot::LeadSlot),
            crate::engine::Role::Lead
        );
        assert!(!shot.0.is_set());
        assert_eq!(manual.get(Slot::LeadSlot), None);
    }
}
