//! Headless painters: a few wandering bots per team that fire paint claims at
//! the floor under them until the match clock runs out.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use turf::arena::ArenaLayout;
use turf::config::MatchConfig;
use turf::paint::{Claim, ClaimQueue, ClaimSource};
use turf::team::TeamRoster;
use turf::terrain_query::{OnOwnTurf, TurfOccupant};
use turf::turf_modifiers::TurfModifiers;
use turf::{TickCounter, TurfSet};

const BOTS_PER_TEAM: usize = 3;
/// World units per second at full speed.
const BOT_SPEED: f32 = 4.0;
/// Fixed ticks between shots.
const FIRE_INTERVAL: u32 = 6;
/// Chance per tick of picking a new heading.
const TURN_CHANCE: f64 = 0.05;
/// Shots land within this distance of the shooter.
const AIM_SPREAD: f32 = 1.5;
const MATCH_TICKS: u64 = 64 * 60;

#[derive(Component)]
struct Painter {
    heading: Vec2,
    cooldown: u32,
}

#[derive(Resource)]
struct BotRng(ChaCha8Rng);

pub struct BotsPlugin;

impl Plugin for BotsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_bots);
        app.add_systems(
            FixedUpdate,
            (wander, fire_claims)
                .chain()
                .before(TurfSet::Resolve),
        );
        app.add_systems(FixedUpdate, end_match.after(TurfSet::Aggregate));
    }
}

fn random_heading(rng: &mut ChaCha8Rng) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec2::from_angle(angle)
}

fn spawn_bots(
    mut commands: Commands,
    config: Res<MatchConfig>,
    roster: Res<TeamRoster>,
    layout: Res<ArenaLayout>,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let spawn_radius = layout.fill_radius * 0.8;

    for team in roster.ids() {
        for _ in 0..BOTS_PER_TEAM {
            let offset = random_heading(&mut rng) * rng.gen_range(0.0..=spawn_radius);
            let position = Vec3::new(offset.x, layout.base_height + 0.5, offset.y);
            commands.spawn((
                TurfOccupant { team },
                Transform::from_translation(position),
                Painter {
                    heading: random_heading(&mut rng),
                    cooldown: rng.gen_range(0..FIRE_INTERVAL),
                },
            ));
        }
    }
    info!(
        "{} bots spawned for {} teams",
        roster.len() * BOTS_PER_TEAM,
        roster.len()
    );
    commands.insert_resource(BotRng(rng));
}

/// Random walk, slowed off own turf, turned back at the arena edge.
fn wander(
    time: Res<Time>,
    layout: Res<ArenaLayout>,
    modifiers: Res<TurfModifiers>,
    mut rng: ResMut<BotRng>,
    mut bots: Query<(&mut Transform, &mut Painter, Option<&OnOwnTurf>)>,
) {
    let dt = time.delta_secs();
    for (mut transform, mut painter, on_turf) in &mut bots {
        if rng.0.gen_bool(TURN_CHANCE) {
            painter.heading = random_heading(&mut rng.0);
        }
        let on_turf = on_turf.is_some_and(|s| s.0);
        let step = painter.heading * BOT_SPEED * modifiers.speed_multiplier(on_turf) * dt;
        let next = Vec2::new(transform.translation.x, transform.translation.z) + step;

        if next.length() > layout.fill_radius {
            painter.heading = -next.normalize_or_zero();
            continue;
        }
        transform.translation.x = next.x;
        transform.translation.z = next.y;
    }
}

fn fire_claims(
    tick: Res<TickCounter>,
    config: Res<MatchConfig>,
    layout: Res<ArenaLayout>,
    mut rng: ResMut<BotRng>,
    mut queue: ResMut<ClaimQueue>,
    mut bots: Query<(&Transform, &TurfOccupant, &mut Painter)>,
) {
    for (transform, occupant, mut painter) in &mut bots {
        if painter.cooldown > 0 {
            painter.cooldown -= 1;
            continue;
        }
        painter.cooldown = FIRE_INTERVAL;

        let spread = random_heading(&mut rng.0) * rng.0.gen_range(0.0..=AIM_SPREAD);
        let origin = Vec3::new(
            transform.translation.x + spread.x,
            layout.base_height,
            transform.translation.z + spread.y,
        );
        queue.push(
            tick.0,
            ClaimSource::Bot,
            Claim::new(origin, config.claim_radius, occupant.team),
        );
    }
}

fn end_match(tick: Res<TickCounter>, mut exit: EventWriter<AppExit>) {
    if tick.0 == MATCH_TICKS {
        info!("Match over after {} ticks", tick.0);
        exit.send(AppExit::Success);
    }
}
