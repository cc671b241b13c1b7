use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MARKER_RADIUS;
use crate::court::{ball_side, BallSide, Classification, CourtDims, VerticalHalf, Zone};

/// Officiating role labels. Lead and Trail can migrate between slots during
/// a transition rotation; Center is fixed to its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Lead,
    Trail,
    Center,
}

impl Role {
    pub fn letter(self) -> &'static str {
        match self {
            Role::Lead => "L",
            Role::Trail => "T",
            Role::Center => "C",
        }
    }
}

impl FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LEAD" => Ok(Role::Lead),
            "TRAIL" => Ok(Role::Trail),
            "CENTER" => Ok(Role::Center),
            other => Err(EngineError::InvalidRole(other.to_string())),
        }
    }
}

/// Logical crew slots. A slot keeps its marker entity; the role label it
/// carries is what swaps on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    LeadSlot,
    TrailSlot,
    CenterSlot,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::LeadSlot, Slot::TrailSlot, Slot::CenterSlot];

    pub fn label(self) -> &'static str {
        match self {
            Slot::LeadSlot => "lead slot",
            Slot::TrailSlot => "trail slot",
            Slot::CenterSlot => "center slot",
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrewSize {
    TwoPerson,
    #[default]
    ThreePerson,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositioningMode {
    #[default]
    Auto,
    Manual,
}

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("unknown referee role '{0}'")]
    InvalidRole(String),
    #[error("coordinates ({x:.1}, {y:.1}) outside court bounds")]
    OutOfBounds { x: f32, y: f32 },
    #[error("manual override requested for {0} before any manual position was set")]
    InconsistentMode(&'static str),
}

/// Derived per-update game state consumed by the positioning rules.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct GameSnapshot {
    pub zone: Zone,
    pub side: BallSide,
    pub is_post_play: bool,
    pub is_corner_play: bool,
    pub is_transition_play: bool,
    pub shot_mode: bool,
    pub crew: CrewSize,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            zone: Zone::Perimeter,
            side: BallSide::BallSide,
            is_post_play: false,
            is_corner_play: false,
            is_transition_play: false,
            shot_mode: false,
            crew: CrewSize::ThreePerson,
        }
    }
}

impl GameSnapshot {
    pub fn derive(
        classification: Classification,
        shot_mode: bool,
        crew: CrewSize,
    ) -> Self {
        Self {
            zone: classification.zone,
            side: classification.side,
            is_post_play: classification.zone == Zone::Paint,
            is_corner_play: matches!(
                classification.zone,
                Zone::CornerLeft | Zone::CornerRight
            ),
            is_transition_play: classification.zone == Zone::Backcourt,
            shot_mode,
            crew,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub pos: Vec2,
    pub visible: bool,
}

// --- Tuning -----------------------------------------------------------------

/// Per-role positioning offsets, all in feet. The original tool shipped
/// several mutually inconsistent constant sets; this is the one documented
/// set, overridable via assets/tuning.ron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeadTuning {
    pub shot_x: f32,
    pub shot_y: f32,
    pub post_x: f32,
    pub post_y: f32,
    pub baseline_x: f32,
    pub corner_y: f32,
    pub follow_y: f32,
    pub margin_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailTuning {
    pub shot_x: f32,
    pub shot_y: f32,
    pub back_trail: f32,
    pub back_min_x: f32,
    pub back_margin_y: f32,
    pub key_x: f32,
    pub arc_x: f32,
    pub arc_y: f32,
    /// Fractional band (of court height) the trail stays inside on the arc.
    pub band_frac: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterTuning {
    pub shot_x: f32,
    pub shot_y: f32,
    pub mid_offset: f32,
    pub deep_x: f32,
    pub help_x: f32,
    /// Fraction of court height the help-side y sits from the far sideline.
    pub help_y_frac: f32,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub shot_distance: f32,
    pub hysteresis: f32,
    pub cooldown_secs: f32,
    pub shot_clear_secs: f32,
    pub flash_secs: f32,
    pub lead: LeadTuning,
    pub trail: TrailTuning,
    pub center: CenterTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            shot_distance: 20.0,
            hysteresis: 5.0,
            cooldown_secs: 1.5,
            shot_clear_secs: 1.5,
            flash_secs: 1.0,
            lead: LeadTuning {
                shot_x: 8.0,
                shot_y: 6.0,
                post_x: 3.0,
                post_y: 8.0,
                baseline_x: 5.0,
                corner_y: 8.0,
                follow_y: 12.0,
                margin_y: 10.0,
            },
            trail: TrailTuning {
                shot_x: 28.0,
                shot_y: 8.0,
                back_trail: 12.0,
                back_min_x: 8.0,
                back_margin_y: 8.0,
                key_x: 35.0,
                arc_x: 32.0,
                arc_y: 15.0,
                band_frac: 0.2,
            },
            center: CenterTuning {
                shot_x: 18.0,
                shot_y: 8.0,
                mid_offset: 5.0,
                deep_x: 25.0,
                help_x: 30.0,
                help_y_frac: 0.25,
            },
        }
    }
}

impl Tuning {
    /// Load the tuning file if present, otherwise fall back to the built-in
    /// constant set. A malformed file is reported and ignored.
    pub fn load() -> Self {
        match std::fs::read_to_string("assets/tuning.ron") {
            Ok(content) => match ron::de::from_str::<Tuning>(&content) {
                Ok(tuning) => tuning,
                Err(e) => {
                    warn!("assets/tuning.ron is malformed ({e}), using defaults");
                    Tuning::default()
                }
            },
            Err(_) => Tuning::default(),
        }
    }
}

// --- Positioning rules ------------------------------------------------------

/// Compute the auto-positioning target for a role. Priority order: shot-mode
/// rebound coverage overrides everything; otherwise placement is conditioned
/// on the classified zone. Manual mode is resolved by the caller and never
/// reaches this function.
///
/// The returned point is always clamped inside the court, inset by the
/// marker radius.
pub fn compute_target_position(
    role: Role,
    ball: Vec2,
    snapshot: &GameSnapshot,
    dims: &CourtDims,
    tuning: &Tuning,
) -> Target {
    let visible = role != Role::Center || snapshot.crew == CrewSize::ThreePerson;
    let half = VerticalHalf::of(ball.y, dims);

    let raw = if snapshot.shot_mode {
        rebound_coverage(role, ball, half, dims, tuning)
    } else {
        match role {
            Role::Lead => lead_position(ball, half, snapshot, dims, tuning),
            Role::Trail => trail_position(ball, half, snapshot, dims, tuning),
            Role::Center => center_position(ball, snapshot, dims, tuning),
        }
    };

    Target {
        pos: dims.clamp_inset(raw, MARKER_RADIUS),
        visible,
    }
}

/// Fixed rebound-coverage spots, distinct per role, biased by the ball's
/// vertical half.
fn rebound_coverage(
    role: Role,
    ball: Vec2,
    half: VerticalHalf,
    dims: &CourtDims,
    tuning: &Tuning,
) -> Vec2 {
    let basket = dims.basket();
    match role {
        // Lead pinches to the baseline on the ball's side of the rim.
        Role::Lead => Vec2::new(
            dims.width - dims.ft(tuning.lead.shot_x),
            basket.y + half.sign() * dims.ft(tuning.lead.shot_y),
        ),
        // Trail stays wide to watch the shooter and the flight.
        Role::Trail => Vec2::new(
            dims.width - dims.ft(tuning.trail.shot_x),
            ball.y + half.sign() * dims.ft(tuning.trail.shot_y),
        ),
        // Center takes the weak-side lane line.
        Role::Center => Vec2::new(
            dims.width - dims.ft(tuning.center.shot_x),
            basket.y - half.sign() * dims.ft(tuning.center.shot_y),
        ),
    }
}

fn lead_position(
    ball: Vec2,
    half: VerticalHalf,
    snapshot: &GameSnapshot,
    dims: &CourtDims,
    tuning: &Tuning,
) -> Vec2 {
    let t = &tuning.lead;

    if snapshot.is_post_play {
        // Post play: hug the baseline, shaded off the ball toward mid-lane.
        return Vec2::new(
            dims.width - dims.ft(t.post_x),
            ball.y - half.sign() * dims.ft(t.post_y),
        );
    }

    let x = dims.width - dims.ft(t.baseline_x);
    let y = if snapshot.is_corner_play {
        // Corner coverage pins the lead to the ball's corner band.
        match half {
            VerticalHalf::Upper => dims.height - dims.ft(t.corner_y),
            VerticalHalf::Lower => dims.ft(t.corner_y),
        }
    } else {
        // Free-throw-line extended: follow the ball's y, offset toward the
        // far half so the lead keeps an open look at the play.
        let follow = ball.y - half.sign() * dims.ft(t.follow_y);
        follow.clamp(dims.ft(t.margin_y), dims.height - dims.ft(t.margin_y))
    };

    Vec2::new(x, y)
}

fn trail_position(
    ball: Vec2,
    half: VerticalHalf,
    snapshot: &GameSnapshot,
    dims: &CourtDims,
    tuning: &Tuning,
) -> Vec2 {
    let t = &tuning.trail;

    if snapshot.is_transition_play {
        // Backcourt: stay behind the play, never pinned to the end line.
        return Vec2::new(
            (ball.x - dims.ft(t.back_trail)).max(dims.ft(t.back_min_x)),
            ball.y.clamp(
                dims.ft(t.back_margin_y),
                dims.height - dims.ft(t.back_margin_y),
            ),
        );
    }

    if ball_side(ball.x, dims) == BallSide::DeepBallSide {
        // Ball deep: park at the top of the key.
        return Vec2::new(dims.width - dims.ft(t.key_x), dims.height / 2.0);
    }

    // Perimeter ball: slide along the arc, offset away from the ball's half,
    // staying inside the central band.
    let y = (ball.y + half.sign() * dims.ft(t.arc_y)).clamp(
        dims.height * t.band_frac,
        dims.height * (1.0 - t.band_frac),
    );
    Vec2::new(dims.width - dims.ft(t.arc_x), y)
}

fn center_position(
    ball: Vec2,
    snapshot: &GameSnapshot,
    dims: &CourtDims,
    tuning: &Tuning,
) -> Vec2 {
    let t = &tuning.center;

    if snapshot.is_transition_play {
        // Transition: drift toward mid-court ahead of the ball.
        return Vec2::new(
            dims.half_court_x() - dims.ft(t.mid_offset),
            dims.height / 2.0,
        );
    }

    let x = if snapshot.side == BallSide::DeepBallSide {
        dims.width - dims.ft(t.deep_x)
    } else {
        dims.width - dims.ft(t.help_x)
    };

    // Help side: always the opposite vertical half from the ball.
    let y = match VerticalHalf::of(ball.y, dims).opposite() {
        VerticalHalf::Upper => dims.height * (1.0 - t.help_y_frac),
        VerticalHalf::Lower => dims.height * t.help_y_frac,
    };

    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::court::classify;

    fn setup() -> (CourtDims, Tuning) {
        (CourtDims::default(), Tuning::default())
    }

    fn snapshot_for(ball: Vec2, shot: bool, crew: CrewSize, dims: &CourtDims) -> GameSnapshot {
        GameSnapshot::derive(classify(ball, dims), shot, crew)
    }

    #[test]
    fn role_parsing() {
        assert_eq!("lead".parse::<Role>().unwrap(), Role::Lead);
        assert_eq!("TRAIL".parse::<Role>().unwrap(), Role::Trail);
        assert_eq!("Center".parse::<Role>().unwrap(), Role::Center);
        assert_eq!(
            "umpire".parse::<Role>(),
            Err(EngineError::InvalidRole("UMPIRE".to_string()))
        );
    }

    #[test]
    fn targets_stay_inside_the_court() {
        let (dims, tuning) = setup();
        // Sweep a grid of ball positions, including the extremes.
        let steps = 12;
        for i in 0..=steps {
            for j in 0..=steps {
                let ball = Vec2::new(
                    dims.width * i as f32 / steps as f32,
                    dims.height * j as f32 / steps as f32,
                );
                for shot in [false, true] {
                    let snap = snapshot_for(ball, shot, CrewSize::ThreePerson, &dims);
                    for role in [Role::Lead, Role::Trail, Role::Center] {
                        let t = compute_target_position(role, ball, &snap, &dims, &tuning);
                        assert!(
                            t.pos.x >= 0.0
                                && t.pos.x <= dims.width
                                && t.pos.y >= 0.0
                                && t.pos.y <= dims.height,
                            "{role:?} escaped at ball {ball:?}: {:?}",
                            t.pos
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn shot_mode_overrides_every_zone() {
        let (dims, tuning) = setup();
        let balls = [
            Vec2::new(dims.ft(10.0), dims.height * 0.5), // backcourt
            Vec2::new(dims.width - dims.ft(10.0), dims.height * 0.5), // paint
            Vec2::new(dims.width - dims.ft(5.0), dims.height * 0.9), // corner
            Vec2::new(dims.half_court_x() + dims.ft(8.0), dims.height * 0.4), // perimeter
        ];
        for ball in balls {
            let shot = snapshot_for(ball, true, CrewSize::ThreePerson, &dims);
            for role in [Role::Lead, Role::Trail, Role::Center] {
                let with_shot = compute_target_position(role, ball, &shot, &dims, &tuning);
                let half = VerticalHalf::of(ball.y, &dims);
                let expected = dims.clamp_inset(
                    rebound_coverage(role, ball, half, &dims, &tuning),
                    MARKER_RADIUS,
                );
                assert_eq!(with_shot.pos, expected, "{role:?} at {ball:?}");
            }
        }
    }

    #[test]
    fn center_invisible_for_two_person_crew() {
        let (dims, tuning) = setup();
        let ball = dims.center();
        let snap = snapshot_for(ball, false, CrewSize::TwoPerson, &dims);
        let t = compute_target_position(Role::Center, ball, &snap, &dims, &tuning);
        assert!(!t.visible);
        let lead = compute_target_position(Role::Lead, ball, &snap, &dims, &tuning);
        assert!(lead.visible);
    }

    #[test]
    fn center_court_scenario() {
        // Ball at dead center, three-person crew, no shot: lead near the
        // offensive baseline, trail in the top-of-key band, center on the
        // opposite vertical half.
        let (dims, tuning) = setup();
        let ball = dims.center();
        let snap = snapshot_for(ball, false, CrewSize::ThreePerson, &dims);

        let lead = compute_target_position(Role::Lead, ball, &snap, &dims, &tuning);
        assert!(lead.pos.x > dims.width - dims.ft(10.0));

        let trail = compute_target_position(Role::Trail, ball, &snap, &dims, &tuning);
        assert!(trail.pos.x < dims.width - dims.ft(25.0));
        assert!(trail.pos.y >= dims.height * 0.2 && trail.pos.y <= dims.height * 0.8);

        // Ball y is exactly H/2 which counts as the upper half, so center
        // covers the lower half.
        let center = compute_target_position(Role::Center, ball, &snap, &dims, &tuning);
        assert!(center.pos.y < dims.height / 2.0);
        assert!(center.visible);
    }

    #[test]
    fn trail_stays_behind_ball_in_backcourt() {
        let (dims, tuning) = setup();
        let ball = Vec2::new(dims.ft(30.0), dims.height * 0.6);
        let snap = snapshot_for(ball, false, CrewSize::ThreePerson, &dims);
        let trail = compute_target_position(Role::Trail, ball, &snap, &dims, &tuning);
        assert!(trail.pos.x < ball.x);
    }

    #[test]
    fn lead_post_play_hugs_the_baseline() {
        let (dims, tuning) = setup();
        let ball = Vec2::new(dims.width - dims.ft(10.0), dims.height * 0.55);
        let snap = snapshot_for(ball, false, CrewSize::ThreePerson, &dims);
        assert!(snap.is_post_play);
        let lead = compute_target_position(Role::Lead, ball, &snap, &dims, &tuning);
        // Closer to the baseline than the standard spot.
        assert!(lead.pos.x > dims.width - dims.ft(4.0));
    }

    #[test]
    fn center_moves_to_mid_court_in_transition() {
        let (dims, tuning) = setup();
        let ball = Vec2::new(dims.ft(20.0), dims.height * 0.3);
        let snap = snapshot_for(ball, false, CrewSize::ThreePerson, &dims);
        let center = compute_target_position(Role::Center, ball, &snap, &dims, &tuning);
        assert!((center.pos.x - dims.half_court_x()).abs() < dims.ft(6.0));
    }

    #[test]
    fn tuning_round_trips_through_ron() {
        let tuning = Tuning::default();
        let text = ron::ser::to_string(&tuning).unwrap();
        let back: Tuning = ron::de::from_str(&text).unwrap();
        assert_eq!(tuning, back);
    }
}
