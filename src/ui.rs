use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::constants::COURT_FEET_WIDTH;
use crate::court::CourtDims;
use crate::engine::{CrewSize, GameSnapshot, PositioningMode, Slot};
use crate::session::{
    reset_session, BallState, ManualPositions, RotationTracker, ShotClock, SlotTargets,
    TransitionFlash,
};

#[derive(Resource, Default)]
pub struct UiSettings {
    pub show_coverage: bool,
}

#[allow(clippy::too_many_arguments)]
pub fn ui_system(
    mut contexts: EguiContexts,
    dims: Res<CourtDims>,
    snapshot: Res<GameSnapshot>,
    targets: Res<SlotTargets>,
    mut crew: ResMut<CrewSize>,
    mut mode: ResMut<PositioningMode>,
    mut settings: ResMut<UiSettings>,
    mut ball: ResMut<BallState>,
    mut tracker: ResMut<RotationTracker>,
    mut shot_clock: ResMut<ShotClock>,
    mut flash: ResMut<TransitionFlash>,
    mut manual: ResMut<ManualPositions>,
) {
    let mut reset_requested = false;

    egui::SidePanel::right("control_panel")
        .default_width(300.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("Referee Positioning Trainer");
            ui.label("Drag the ball to train crew positioning.");
            ui.add_space(8.0);

            ui.label("Crew");
            ui.horizontal(|ui| {
                ui.selectable_value(&mut *crew, CrewSize::TwoPerson, "2-Person");
                ui.selectable_value(&mut *crew, CrewSize::ThreePerson, "3-Person");
            });
            ui.add_space(4.0);

            ui.label("Positioning");
            let was_manual = *mode == PositioningMode::Manual;
            ui.horizontal(|ui| {
                ui.selectable_value(&mut *mode, PositioningMode::Auto, "Auto");
                ui.selectable_value(&mut *mode, PositioningMode::Manual, "Manual training");
            });
            if *mode == PositioningMode::Manual && !was_manual {
                // Continuity: manual starts exactly where auto left the crew.
                manual.seed_from(&targets);
                info!("manual training mode: markers seeded from auto positions");
            }
            if *mode == PositioningMode::Manual {
                ui.small("Drag individual markers to place the crew yourself.");
            }
            ui.add_space(4.0);

            ui.checkbox(&mut settings.show_coverage, "Show coverage zones");
            ui.add_space(8.0);
            ui.separator();

            ui.label("Crew assignment");
            for slot in Slot::ALL {
                if slot == Slot::CenterSlot && *crew == CrewSize::TwoPerson {
                    continue;
                }
                let role = tracker.assignment.role_for(slot);
                ui.label(format!("{:?} → {:?}", slot, role));
            }
            ui.add_space(8.0);

            if snapshot.shot_mode {
                ui.colored_label(egui::Color32::LIGHT_RED, "SHOT — rebound coverage");
            }
            if flash.0.is_set() {
                ui.colored_label(egui::Color32::YELLOW, "Transition: lead/trail rotating");
            }

            ui.add_space(8.0);
            if ui.button("Reset").clicked() {
                reset_requested = true;
            }
        });

    egui::TopBottomPanel::bottom("telemetry")
        .min_height(60.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal(|ui| {
                let to_ft = COURT_FEET_WIDTH / dims.width;
                ui.vertical(|ui| {
                    ui.label("Ball:");
                    ui.label(format!(
                        "({:.1} ft, {:.1} ft)",
                        ball.position.x * to_ft,
                        ball.position.y * to_ft
                    ));
                });
                ui.add_space(20.0);
                ui.vertical(|ui| {
                    ui.label("Zone:");
                    ui.label(format!("{:?}", snapshot.zone));
                });
                ui.add_space(20.0);
                ui.vertical(|ui| {
                    ui.label("Side:");
                    ui.label(format!("{:?}", snapshot.side));
                });
                ui.add_space(20.0);
                ui.vertical(|ui| {
                    ui.label("Flags:");
                    ui.label(format!(
                        "post {} | corner {} | transition {}",
                        snapshot.is_post_play, snapshot.is_corner_play, snapshot.is_transition_play
                    ));
                });
            });
        });

    if reset_requested {
        *mode = PositioningMode::Auto;
        reset_session(
            &dims,
            &mut ball,
            &mut tracker,
            &mut shot_clock,
            &mut flash,
            &mut manual,
        );
        info!("session reset");
    }
}
