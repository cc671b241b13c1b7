use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::{BALL_RADIUS, MARKER_RADIUS};
use crate::court::CourtDims;
use crate::engine::{CrewSize, EngineError, PositioningMode, Slot, Tuning};
use crate::session::{BallState, ManualPositions, RenderTargets, ShotClock};
use crate::visualization::MainCamera;

/// What the pointer is currently dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Ball,
    Marker(Slot),
}

#[derive(Resource, Debug, Default)]
pub struct DragState {
    pub target: Option<DragTarget>,
    warned_out_of_bounds: bool,
}

/// Translate the cursor into court-local coordinates (origin bottom-left of
/// the playing surface). Unclamped; callers decide how to treat
/// out-of-bounds samples.
fn cursor_court_pos(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    dims: &CourtDims,
) -> Option<Vec2> {
    let cursor = window.cursor_position()?;
    let world = camera.viewport_to_world_2d(camera_transform, cursor).ok()?;
    // The court is drawn centered on the world origin.
    Some(world + Vec2::new(dims.width, dims.height) / 2.0)
}

pub fn begin_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    dims: Res<CourtDims>,
    mode: Res<PositioningMode>,
    crew: Res<CrewSize>,
    targets: Res<RenderTargets>,
    mut ball: ResMut<BallState>,
    mut drag: ResMut<DragState>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Some(pos) = cursor_court_pos(window, camera, camera_transform, &dims) else {
        return;
    };

    // In manual mode the markers themselves are grabbable and take
    // precedence over the ball.
    if *mode == PositioningMode::Manual {
        let grab_radius = MARKER_RADIUS * 1.6;
        for slot in Slot::ALL {
            if slot == Slot::CenterSlot && *crew == CrewSize::TwoPerson {
                continue;
            }
            if targets.0.get(slot).pos.distance(pos) <= grab_radius {
                drag.target = Some(DragTarget::Marker(slot));
                return;
            }
        }
    }

    if dims.contains(pos) || pos.distance(dims.clamp_point(pos)) <= BALL_RADIUS {
        drag.target = Some(DragTarget::Ball);
        ball.position = dims.clamp_point(pos);
    }
}

pub fn drag_move(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    dims: Res<CourtDims>,
    mode: Res<PositioningMode>,
    tuning: Res<Tuning>,
    mut drag: ResMut<DragState>,
    mut ball: ResMut<BallState>,
    mut manual: ResMut<ManualPositions>,
    mut shot_clock: ResMut<ShotClock>,
) {
    let Some(target) = drag.target else {
        return;
    };
    if !buttons.pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Some(raw) = cursor_court_pos(window, camera, camera_transform, &dims) else {
        return;
    };

    if !dims.contains(raw) && !drag.warned_out_of_bounds {
        // Recoverable: clamp and keep going, but note it once per drag.
        warn!(
            "{}",
            EngineError::OutOfBounds { x: raw.x, y: raw.y }
        );
        drag.warned_out_of_bounds = true;
    }

    match target {
        DragTarget::Ball => {
            ball.position = dims.clamp_point(raw);

            // Shot detection only applies while auto positioning is active.
            if *mode == PositioningMode::Auto
                && ball.position.distance(dims.basket()) < dims.ft(tuning.shot_distance)
            {
                shot_clock.0.arm(tuning.shot_clear_secs);
            }
        }
        DragTarget::Marker(slot) => {
            manual.set(slot, dims.clamp_inset(raw, MARKER_RADIUS));
        }
    }
}

pub fn end_drag(buttons: Res<ButtonInput<MouseButton>>, mut drag: ResMut<DragState>) {
    if buttons.just_released(MouseButton::Left) {
        drag.target = None;
        drag.warned_out_of_bounds = false;
    }
}
