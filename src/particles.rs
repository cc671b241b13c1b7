use bevy::prelude::*;
use rand::Rng;

use crate::court::CourtDims;
use crate::session::RotationFired;
use crate::visualization::court_to_world;

const PARTICLE_LIFETIME: f32 = 0.6;
const PARTICLE_SIZE: f32 = 3.0;
const PARTICLE_BASE_SPEED: f32 = 90.0;
const BURST_COUNT: usize = 24;
const PARTICLE_DRAG: f32 = 2.5;

#[derive(Component)]
pub struct SwapParticle {
    lifetime: Timer,
    velocity: Vec2,
}

fn spawn_burst(commands: &mut Commands, center: Vec2, color: Color) {
    let mut rng = rand::thread_rng();
    for i in 0..BURST_COUNT {
        let angle = (i as f32 / BURST_COUNT as f32) * std::f32::consts::TAU;
        let speed = PARTICLE_BASE_SPEED * rng.gen_range(0.7..1.3);
        let velocity = speed * Vec2::new(angle.cos(), angle.sin());

        commands.spawn((
            Sprite {
                color,
                custom_size: Some(Vec2::splat(PARTICLE_SIZE)),
                ..default()
            },
            Transform::from_xyz(center.x, center.y, 1.5),
            SwapParticle {
                lifetime: Timer::from_seconds(
                    PARTICLE_LIFETIME * rng.gen_range(0.7..1.0),
                    TimerMode::Once,
                ),
                velocity,
            },
        ));
    }
}

/// Spawn a burst at each swapping marker when a rotation fires, and age out
/// the live particles.
pub fn particle_system(
    mut commands: Commands,
    time: Res<Time>,
    dims: Res<CourtDims>,
    mut fired: EventReader<RotationFired>,
    mut query: Query<(Entity, &mut Transform, &mut SwapParticle)>,
) {
    let dt = time.delta_secs();

    let mut to_despawn = Vec::new();
    for (entity, mut transform, mut particle) in query.iter_mut() {
        particle.lifetime.tick(time.delta());
        if particle.lifetime.finished() {
            to_despawn.push(entity);
        } else {
            let delta = particle.velocity * dt;
            transform.translation.x += delta.x;
            transform.translation.y += delta.y;
            particle.velocity *= 1.0 - (PARTICLE_DRAG * dt).min(1.0);
        }
    }
    for entity in to_despawn {
        commands.entity(entity).despawn();
    }

    for event in fired.read() {
        spawn_burst(
            &mut commands,
            court_to_world(event.lead_slot_pos, &dims),
            Color::srgb(1.0, 0.85, 0.3),
        );
        spawn_burst(
            &mut commands,
            court_to_world(event.trail_slot_pos, &dims),
            Color::srgb(0.4, 0.6, 1.0),
        );
    }
}
