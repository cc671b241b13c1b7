use bevy::prelude::*;
use bevy_egui::EguiPlugin;

mod constants;
mod court;
mod engine;
mod input;
mod particles;
mod rotation;
mod session;
mod ui;
mod visualization;

use court::CourtDims;
use engine::{CrewSize, GameSnapshot, PositioningMode, Tuning};
use input::{begin_drag, drag_move, end_drag, DragState};
use session::{
    compute_slot_targets, derive_game_state, resolve_render_targets, rotation_system, tick_flags,
    BallState, ManualPositions, RenderTargets, RotationFired, RotationTracker, ShotClock,
    SlotTargets, TransitionFlash,
};
use ui::{ui_system, UiSettings};
use visualization::{
    spawn_court, spawn_markers, update_ball_visual, update_coverage_zones, update_markers,
    update_role_labels, update_shot_overlay, MainCamera,
};

fn main() {
    let dims = CourtDims::default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Referee Positioning Trainer".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(dims)
        .insert_resource(Tuning::load())
        .insert_resource(BallState::centered(&dims))
        .insert_resource(GameSnapshot::default())
        .insert_resource(CrewSize::default())
        .insert_resource(PositioningMode::default())
        .insert_resource(RotationTracker::default())
        .insert_resource(ShotClock::default())
        .insert_resource(TransitionFlash::default())
        .insert_resource(SlotTargets::default())
        .insert_resource(RenderTargets::default())
        .insert_resource(ManualPositions::default())
        .insert_resource(DragState::default())
        .insert_resource(UiSettings::default())
        .add_event::<RotationFired>()
        .add_systems(Startup, (setup, spawn_court, spawn_markers))
        .add_systems(
            Update,
            (
                // Input first, then derived state, then targets.
                begin_drag,
                drag_move,
                end_drag,
                tick_flags,
                derive_game_state,
                rotation_system,
                compute_slot_targets,
                resolve_render_targets,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                ui_system,
                update_ball_visual,
                update_markers,
                update_role_labels,
                update_shot_overlay,
                update_coverage_zones,
                particles::particle_system,
            )
                .after(resolve_render_targets),
        )
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera));
}
