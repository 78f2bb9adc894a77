//! Headless run with Rapier: body and hit box damage, corpse layer.

use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::hierarchy::HierarchyPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::*;

use castle_sentinels::combat::{Health, Player};
use castle_sentinels::core::{GameState, HitEvent, PlayerHitEvent};
use castle_sentinels::npc::{spawn_npc, Activity, Cue, CuePlayer, Npc, NpcDefinition, NpcSpawn};
use castle_sentinels::probe::{collision_groups, Layer, LayerConfig, ProbeTag};
use castle_sentinels::SentinelsPlugin;

/// Player hit events seen in each frame, oldest first.
#[derive(Resource, Default)]
struct HitLog(Vec<Vec<PlayerHitEvent>>);

fn record_player_hits(mut hits: EventReader<PlayerHitEvent>, mut log: ResMut<HitLog>) {
    log.0.push(hits.read().copied().collect());
}

fn app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin, HierarchyPlugin, StatesPlugin))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
        .add_plugins(SentinelsPlugin)
        .init_resource::<HitLog>()
        .add_systems(Last, record_player_hits);

    app.update();
    app.update();
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
    app
}

/// A player pinned in place so overlaps are never pushed apart.
fn spawn_player(app: &mut App, x: f32) -> Entity {
    app.world_mut()
        .spawn((
            Name::new("Player"),
            Player,
            ProbeTag::Player,
            Health::new(1000.0),
            Transform::from_xyz(x, 0.0, 0.0),
            RigidBody::Dynamic,
            GravityScale(0.0),
            LockedAxes::TRANSLATION_LOCKED | LockedAxes::ROTATION_LOCKED,
            Collider::cuboid(0.4, 0.9),
            collision_groups(Layer::Player),
        ))
        .id()
}

fn spawn_from(app: &mut App, key: &str, source: &str, x: f32) -> Entity {
    let definition: NpcDefinition = ron::from_str(source).unwrap();
    let spawn = NpcSpawn {
        definition: key.to_string(),
        position: (x, 0.0),
        waypoints: vec![(x, 0.0)],
        guard_point: None,
        facing_left: false,
    };
    let entity = app
        .world_mut()
        .run_system_once(move |mut commands: Commands| {
            spawn_npc(&mut commands, &definition, &spawn, LayerConfig::default())
        })
        .unwrap()
        .unwrap();
    app.world_mut().entity_mut(entity).insert(GravityScale(0.0));
    entity
}

fn frames_since(app: &App, start: usize) -> Vec<Vec<PlayerHitEvent>> {
    app.world().resource::<HitLog>().0[start..].to_vec()
}

fn logged_frames(app: &App) -> usize {
    app.world().resource::<HitLog>().0.len()
}

#[test]
fn bat_hurts_every_frame_of_contact_until_it_dies() {
    let mut app = app();
    let player = spawn_player(&mut app, 0.3);
    let bat = spawn_from(&mut app, "bat", include_str!("../assets/data/npcs/bat.ron"), 0.0);

    // Colliders and the first contact manifold need a couple of physics steps
    for _ in 0..3 {
        app.update();
    }
    let start = logged_frames(&app);
    for _ in 0..4 {
        app.update();
    }

    let touching = frames_since(&app, start);
    assert_eq!(touching.len(), 4);
    for frame in &touching {
        assert!(
            frame.iter().any(|hit| hit.source == bat && hit.player == player && hit.amount == 5.0),
            "no bat contact damage in frame: {frame:?}"
        );
    }

    app.world_mut().send_event(HitEvent {
        target: bat,
        source: player,
        amount: 100.0,
    });
    let killed = logged_frames(&app);
    for _ in 0..4 {
        app.update();
    }

    let npc = app.world().get::<Npc>(bat).unwrap();
    assert_eq!(npc.activity(), Activity::Dead);
    let groups = app.world().get::<CollisionGroups>(bat).unwrap();
    assert_eq!(groups.memberships, Layer::Corpse.group());
    assert!(!groups.filters.contains(Layer::Player.group()));
    assert!(frames_since(&app, killed).iter().all(|frame| frame.is_empty()));
}

#[test]
fn guardian_hit_box_only_hurts_inside_damage_window() {
    let mut app = app();
    let player = spawn_player(&mut app, 1.5);
    let guardian = spawn_from(&mut app, "guardian", include_str!("../assets/data/npcs/guardian.ron"), 0.0);

    // Makes sure the guardian goes after the player even if it never sees them
    app.world_mut().send_event(HitEvent {
        target: guardian,
        source: player,
        amount: 1.0,
    });

    let mut hurt_frames = 0;
    let mut quiet_attack_frames = 0;
    for _ in 0..50 {
        let before = logged_frames(&app);
        app.update();

        let cues = app.world().get::<CuePlayer>(guardian).unwrap();
        let attacking = cues.playing() == Some(Cue::Attack);
        let in_window = cues.in_damage_window();
        let hits: Vec<_> = frames_since(&app, before)
            .concat()
            .into_iter()
            .filter(|hit| hit.source == guardian)
            .collect();

        if hits.is_empty() {
            if attacking && !in_window {
                quiet_attack_frames += 1;
            }
        } else {
            assert!(in_window, "hit box hurt outside the damage window: {hits:?}");
            assert!(hits.iter().all(|hit| hit.player == player && hit.amount == 20.0));
            hurt_frames += 1;
        }
    }

    assert!(hurt_frames > 0);
    assert!(quiet_attack_frames > 0);
}
