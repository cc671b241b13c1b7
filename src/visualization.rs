use bevy::asset::RenderAssetUsages;
use bevy::color::palettes::css::*;
use bevy::prelude::*;

use crate::constants::{BALL_RADIUS, MARKER_RADIUS};
use crate::court::CourtDims;
use crate::engine::Slot;
use crate::session::{BallState, RenderTargets, RotationTracker, ShotClock, TransitionFlash};
use crate::ui::UiSettings;

const LINE_THICKNESS: f32 = 2.0;
const BALL_SMOOTHING: f32 = 14.0; // higher = snappier
const MARKER_SMOOTHING: f32 = 8.0;
const FLASH_SCALE: f32 = 1.3;

#[derive(Component)]
pub struct MainCamera;

#[derive(Component)]
pub struct Ball;

#[derive(Component)]
pub struct RefMarker(pub Slot);

#[derive(Component)]
pub struct RoleLabel(pub Slot);

#[derive(Component)]
pub struct ShotOverlay;

#[derive(Component)]
pub struct CoverageZone;

/// Court-local coordinates (origin bottom-left) to world coordinates (court
/// centered on the origin).
pub fn court_to_world(pos: Vec2, dims: &CourtDims) -> Vec2 {
    pos - Vec2::new(dims.width, dims.height) / 2.0
}

fn line_strip_mesh(points: Vec<Vec2>) -> Mesh {
    let mut mesh = Mesh::new(
        bevy::render::render_resource::PrimitiveTopology::LineStrip,
        RenderAssetUsages::default(),
    );
    let count = points.len();
    let vertices: Vec<[f32; 3]> = points.into_iter().map(|p| [p.x, p.y, 0.0]).collect();
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, vec![[0.0, 0.0, 1.0]; count]);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, vec![[0.0, 0.0]; count]);
    mesh
}

fn circle_points(center: Vec2, radius: f32, start: f32, end: f32, segments: usize) -> Vec<Vec2> {
    (0..=segments)
        .map(|i| {
            let a = start + (end - start) * i as f32 / segments as f32;
            center + radius * Vec2::new(a.cos(), a.sin())
        })
        .collect()
}

fn spawn_line(commands: &mut Commands, center: Vec2, size: Vec2, z: f32) {
    commands.spawn((
        Sprite {
            color: WHITE.into(),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(center.x, center.y, z),
    ));
}

pub fn spawn_court(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    dims: Res<CourtDims>,
) {
    let w = dims.width;
    let h = dims.height;

    // Playing surface
    commands.spawn((
        Sprite {
            color: Color::srgb(0.76, 0.60, 0.42),
            custom_size: Some(Vec2::new(w, h)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    // Boundary and half-court lines
    spawn_line(&mut commands, Vec2::new(0.0, h / 2.0), Vec2::new(w, LINE_THICKNESS), 0.1);
    spawn_line(&mut commands, Vec2::new(0.0, -h / 2.0), Vec2::new(w, LINE_THICKNESS), 0.1);
    spawn_line(&mut commands, Vec2::new(-w / 2.0, 0.0), Vec2::new(LINE_THICKNESS, h), 0.1);
    spawn_line(&mut commands, Vec2::new(w / 2.0, 0.0), Vec2::new(LINE_THICKNESS, h), 0.1);
    spawn_line(&mut commands, Vec2::ZERO, Vec2::new(LINE_THICKNESS, h), 0.1);

    let line_material = materials.add(ColorMaterial::from_color(WHITE));

    // Center circle
    let center_circle = circle_points(Vec2::ZERO, dims.ft(6.0), 0.0, std::f32::consts::TAU, 48);
    commands.spawn((
        Mesh2d(meshes.add(line_strip_mesh(center_circle))),
        MeshMaterial2d(line_material.clone()),
        Transform::from_xyz(0.0, 0.0, 0.1),
    ));

    // Both lanes, free-throw circles, and three-point arcs
    for right_end in [false, true] {
        let dir = if right_end { 1.0 } else { -1.0 };
        let baseline_x = dir * w / 2.0;
        let lane_depth = dims.ft(19.0);
        let lane_center_x = baseline_x - dir * lane_depth / 2.0;

        commands.spawn((
            Sprite {
                color: Color::srgba(0.55, 0.27, 0.22, 0.55),
                custom_size: Some(Vec2::new(lane_depth, dims.ft(16.0))),
                ..default()
            },
            Transform::from_xyz(lane_center_x, 0.0, 0.05),
        ));

        let ft_circle = circle_points(
            Vec2::new(baseline_x - dir * lane_depth, 0.0),
            dims.ft(6.0),
            0.0,
            std::f32::consts::TAU,
            48,
        );
        commands.spawn((
            Mesh2d(meshes.add(line_strip_mesh(ft_circle))),
            MeshMaterial2d(line_material.clone()),
            Transform::from_xyz(0.0, 0.0, 0.1),
        ));

        let basket = Vec2::new(baseline_x - dir * dims.ft(4.0), 0.0);
        let (start, end) = if right_end {
            (std::f32::consts::FRAC_PI_2, 3.0 * std::f32::consts::FRAC_PI_2)
        } else {
            (-std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2)
        };
        let arc = circle_points(basket, dims.ft(23.75), start, end, 64);
        commands.spawn((
            Mesh2d(meshes.add(line_strip_mesh(arc))),
            MeshMaterial2d(line_material.clone()),
            Transform::from_xyz(0.0, 0.0, 0.1),
        ));

        // Rim
        commands.spawn((
            Mesh2d(meshes.add(Circle::new(4.0))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(ORANGE_RED))),
            Transform::from_xyz(basket.x, basket.y, 0.15),
        ));
    }

    // Shot overlay: translucent ring around the offensive basket, shown
    // only while shot mode is set.
    let basket_world = court_to_world(dims.basket(), &dims);
    commands.spawn((
        Mesh2d(meshes.add(Annulus::new(dims.ft(17.0), dims.ft(20.0)))),
        MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgba(1.0, 0.2, 0.1, 0.25)))),
        Transform::from_xyz(basket_world.x, basket_world.y, 0.2),
        Visibility::Hidden,
        ShotOverlay,
    ));

    // Coverage-zone overlays (toggled from the panel): the deep corner bands
    // and the help-side strip the center works from.
    let corner_w = dims.ft(25.0);
    let corner_h = h * 0.3;
    for upper in [false, true] {
        let y = if upper {
            h / 2.0 - corner_h / 2.0
        } else {
            -(h / 2.0) + corner_h / 2.0
        };
        commands.spawn((
            Sprite {
                color: Color::srgba(0.2, 0.5, 0.9, 0.18),
                custom_size: Some(Vec2::new(corner_w, corner_h)),
                ..default()
            },
            Transform::from_xyz(w / 2.0 - corner_w / 2.0, y, 0.2),
            Visibility::Hidden,
            CoverageZone,
        ));
    }
    commands.spawn((
        Sprite {
            color: Color::srgba(0.2, 0.9, 0.5, 0.15),
            custom_size: Some(Vec2::new(dims.ft(12.0), h)),
            ..default()
        },
        Transform::from_xyz(w / 2.0 - dims.ft(30.0), 0.0, 0.2),
        Visibility::Hidden,
        CoverageZone,
    ));
}

pub fn spawn_markers(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    dims: Res<CourtDims>,
    ball: Res<BallState>,
) {
    let ball_world = court_to_world(ball.position, &dims);
    commands
        .spawn((
            Mesh2d(meshes.add(Circle::new(BALL_RADIUS))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(DARK_ORANGE))),
            Transform::from_xyz(ball_world.x, ball_world.y, 1.2),
            Ball,
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh2d(meshes.add(Circle::new(BALL_RADIUS * 0.35))),
                MeshMaterial2d(
                    materials.add(ColorMaterial::from_color(Color::srgb(0.4, 0.2, 0.05))),
                ),
                Transform::from_xyz(0.0, 0.0, 0.01),
            ));
        });

    let slots = [
        (Slot::LeadSlot, GOLD),
        (Slot::TrailSlot, ROYAL_BLUE),
        (Slot::CenterSlot, SEA_GREEN),
    ];
    for (slot, color) in slots {
        commands
            .spawn((
                Mesh2d(meshes.add(Circle::new(MARKER_RADIUS))),
                MeshMaterial2d(materials.add(ColorMaterial::from_color(color))),
                Transform::from_xyz(0.0, 0.0, 1.0),
                RefMarker(slot),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text2d::new(""),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(Color::BLACK),
                    Transform::from_xyz(0.0, 0.0, 0.01),
                    RoleLabel(slot),
                ));
            });
    }
}

/// Frame-rate independent exponential approach, the spring-style easing the
/// ball and markers animate with.
fn ease_toward(current: Vec2, target: Vec2, smoothing: f32, dt: f32) -> Vec2 {
    let alpha = 1.0 - (-smoothing * dt).exp();
    current + (target - current) * alpha
}

pub fn update_ball_visual(
    time: Res<Time>,
    dims: Res<CourtDims>,
    ball: Res<BallState>,
    mut query: Query<&mut Transform, With<Ball>>,
) {
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    let target = court_to_world(ball.position, &dims);
    let current = transform.translation.truncate();
    let eased = ease_toward(current, target, BALL_SMOOTHING, time.delta_secs());
    transform.translation.x = eased.x;
    transform.translation.y = eased.y;
}

pub fn update_markers(
    time: Res<Time>,
    dims: Res<CourtDims>,
    render: Res<RenderTargets>,
    flash: Res<TransitionFlash>,
    mut query: Query<(&RefMarker, &mut Transform, &mut Visibility)>,
) {
    let dt = time.delta_secs();
    for (marker, mut transform, mut visibility) in query.iter_mut() {
        let target = render.0.get(marker.0);

        *visibility = if target.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };

        let world_target = court_to_world(target.pos, &dims);
        let current = transform.translation.truncate();
        let eased = ease_toward(current, world_target, MARKER_SMOOTHING, dt);
        transform.translation.x = eased.x;
        transform.translation.y = eased.y;

        // Rotation highlight: the swapping lead/trail markers pulse while
        // the flash flag is set.
        let flashing = flash.0.is_set() && marker.0 != Slot::CenterSlot;
        let target_scale = if flashing { FLASH_SCALE } else { 1.0 };
        let scale = transform.scale.x + (target_scale - transform.scale.x) * (dt * 10.0).min(1.0);
        transform.scale = Vec3::splat(scale);
    }
}

pub fn update_role_labels(
    tracker: Res<RotationTracker>,
    mut query: Query<(&RoleLabel, &mut Text2d)>,
) {
    for (label, mut text) in query.iter_mut() {
        let letter = tracker.assignment.role_for(label.0).letter();
        if text.0 != letter {
            text.0 = letter.to_string();
        }
    }
}

pub fn update_shot_overlay(
    shot_clock: Res<ShotClock>,
    mut query: Query<&mut Visibility, With<ShotOverlay>>,
) {
    for mut visibility in query.iter_mut() {
        *visibility = if shot_clock.0.is_set() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

pub fn update_coverage_zones(
    settings: Res<UiSettings>,
    mut query: Query<&mut Visibility, With<CoverageZone>>,
) {
    for mut visibility in query.iter_mut() {
        *visibility = if settings.show_coverage {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
