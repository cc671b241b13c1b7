use crate::court::CourtDims;
use crate::engine::{Role, Slot, Tuning};

/// Direction of a half-court crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingDirection {
    ToFrontcourt,
    ToBackcourt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationPhase {
    #[default]
    Stable,
    Cooldown,
}

/// Tracks half-court crossings and gates Lead/Trail swaps. The machine only
/// ever swaps while Stable; after a swap it sits in Cooldown for a fixed
/// interval, during which further crossings are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub phase: RotationPhase,
    pub last_direction: Option<CrossingDirection>,
    pub last_swap_secs: f64,
}

/// Detect a hysteresis-filtered half-court crossing between two ball x
/// samples. The ball must clear the line by the margin before a crossing
/// registers, so jitter at the line never flickers.
fn detect_crossing(
    ball_x: f32,
    last_ball_x: f32,
    dims: &CourtDims,
    margin: f32,
) -> Option<CrossingDirection> {
    let half = dims.half_court_x();
    if last_ball_x < half && ball_x > half + margin {
        Some(CrossingDirection::ToFrontcourt)
    } else if last_ball_x > half && ball_x < half - margin {
        Some(CrossingDirection::ToBackcourt)
    } else {
        None
    }
}

/// Advance the rotation state machine for one ball-position update.
/// Returns the new state and whether a Lead/Trail swap fired.
pub fn update_rotation_state(
    prev: RotationState,
    ball_x: f32,
    last_ball_x: f32,
    now_secs: f64,
    dims: &CourtDims,
    tuning: &Tuning,
) -> (RotationState, bool) {
    let mut state = prev;

    // Cooldown expires on elapsed time alone, regardless of ball movement.
    if state.phase == RotationPhase::Cooldown
        && now_secs - state.last_swap_secs >= tuning.cooldown_secs as f64
    {
        state.phase = RotationPhase::Stable;
    }

    let crossing = detect_crossing(ball_x, last_ball_x, dims, dims.ft(tuning.hysteresis));

    if let Some(direction) = crossing {
        let new_direction = state.last_direction != Some(direction);
        if state.phase == RotationPhase::Stable && new_direction {
            state.last_direction = Some(direction);
            state.last_swap_secs = now_secs;
            state.phase = RotationPhase::Cooldown;
            return (state, true);
        }
    }

    (state, false)
}

/// Explicit slot → role mapping. Swapping is a mapping update; the slots
/// (and their marker entities) never change identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefereeAssignment {
    lead_slot: Role,
    trail_slot: Role,
}

impl Default for RefereeAssignment {
    fn default() -> Self {
        Self {
            lead_slot: Role::Lead,
            trail_slot: Role::Trail,
        }
    }
}

impl RefereeAssignment {
    pub fn role_for(&self, slot: Slot) -> Role {
        match slot {
            Slot::LeadSlot => self.lead_slot,
            Slot::TrailSlot => self.trail_slot,
            Slot::CenterSlot => Role::Center,
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.lead_slot, &mut self.trail_slot);
    }
}
