//! Castle Sentinels - demo entry point.
//!
//! Loads the NPC definitions and the first level's spawn list, then runs the
//! enemies against a static player dummy standing on a flat floor.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use castle_sentinels::combat::{Health, Immunity, Player};
use castle_sentinels::core::{GameState, HitEvent};
use castle_sentinels::npc::{load_level_spawns, LevelSpawnList, Npc};
use castle_sentinels::probe::{collision_groups, Layer, ProbeTag};

const LEVEL_PATH: &str = "assets/data/levels/crypt.ron";

const PLAYER_SPEED: f32 = 4.0;
const STRIKE_REACH: f32 = 1.6;
const STRIKE_DAMAGE: f32 = 15.0;

fn main() {
    let mut app = App::new();

    app
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Castle Sentinels".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(32.0))

        // Our game plugin
        .add_plugins(castle_sentinels::SentinelsPlugin)

        .add_systems(Startup, setup_stage)
        .add_systems(
            Update,
            (move_player, strike_nearby_npcs).run_if(in_state(GameState::InGame)),
        );

    match load_level_spawns(LEVEL_PATH) {
        Ok(spawns) => {
            app.insert_resource(LevelSpawnList(spawns.spawns));
        }
        Err(e) => {
            error!("Failed to load level spawns: {}", e);
        }
    }

    app.run();
}

/// Camera, floor and a player dummy for the enemies to find.
fn setup_stage(mut commands: Commands) {
    commands.spawn(Camera2d);

    commands.spawn((
        Name::new("Floor"),
        ProbeTag::Ground,
        Transform::from_xyz(0.0, -1.0, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(40.0, 0.5),
        collision_groups(Layer::Foreground),
    ));

    commands.spawn((
        Name::new("Player"),
        Player,
        ProbeTag::Player,
        Health::new(100.0),
        Immunity::default(),
        Transform::from_xyz(6.0, 0.5, 0.0),
        RigidBody::Dynamic,
        Velocity::zero(),
        LockedAxes::ROTATION_LOCKED,
        Collider::cuboid(0.4, 0.9),
        collision_groups(Layer::Player),
    ));
}

/// Walk the player dummy with A/D.
fn move_player(keys: Res<ButtonInput<KeyCode>>, mut query: Query<&mut Velocity, With<Player>>) {
    let Ok(mut velocity) = query.get_single_mut() else {
        return;
    };

    let mut direction = 0.0;
    if keys.pressed(KeyCode::KeyA) {
        direction -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        direction += 1.0;
    }
    velocity.linvel.x = direction * PLAYER_SPEED;
}

/// Space hits every NPC within reach.
fn strike_nearby_npcs(
    keys: Res<ButtonInput<KeyCode>>,
    player: Query<(Entity, &Transform), With<Player>>,
    npcs: Query<(Entity, &Transform), With<Npc>>,
    mut hits: EventWriter<HitEvent>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    let Ok((player, player_transform)) = player.get_single() else {
        return;
    };

    for (npc, transform) in npcs.iter() {
        if transform.translation.distance(player_transform.translation) <= STRIKE_REACH {
            hits.send(HitEvent {
                target: npc,
                source: player,
                amount: STRIKE_DAMAGE,
            });
        }
    }
}
