//! Shared NPC state: health, patrol route, facing, senses, and the
//! hit/death sequence.
//!
//! The hit reaction spans several ticks. Every wait in it ("until the hurt
//! clip starts", "until it has played for its length", "until the death clip
//! starts") is a [`HitReaction`] phase re-checked once per tick, so a second
//! hit arriving mid-reaction simply finds the actor busy.

use bevy::prelude::*;

use super::context::{NpcEvent, Outbox, TickContext};
use super::cue::Cue;
use super::error::NpcConfigError;
use crate::core::NpcSound;
use crate::probe::{move_towards, raycast_fan, raycast_grid, LayerConfig, RayCaster, RayHit};

/// Distance under which a waypoint counts as reached.
pub const DEFAULT_WAYPOINT_RADIUS: f32 = 0.1;

/// Which way an actor looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn direction(self) -> Vec2 {
        Vec2::X * self.sign()
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Patrol route and how the actor walks it.
#[derive(Debug, Clone)]
pub struct Patrol {
    waypoints: Vec<Vec2>,
    current: usize,
    pub reached_radius: f32,
    /// Pause at a waypoint, in seconds
    pub stop_time: f32,
    /// Turn to face the destination while walking
    pub flip_on_move: bool,
    /// Route includes the vertical axis (flyers)
    pub vertical: bool,
}

impl Patrol {
    pub fn new(waypoints: Vec<Vec2>) -> Result<Self, NpcConfigError> {
        if waypoints.is_empty() {
            return Err(NpcConfigError::EmptyWaypoints);
        }
        Ok(Self {
            waypoints,
            current: 0,
            reached_radius: DEFAULT_WAYPOINT_RADIUS,
            stop_time: 0.0,
            flip_on_move: true,
            vertical: false,
        })
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_waypoint(&self) -> Vec2 {
        self.waypoints[self.current]
    }

    /// Move on to the next waypoint, wrapping to the first after the last.
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % self.waypoints.len();
        self.current
    }
}

/// Vision cone, cast in the facing direction every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionCone {
    pub rays: usize,
    /// Total spread in degrees
    pub angle: f32,
    pub distance: f32,
    /// Offset from the actor position, mirrored with facing
    pub origin_offset: Vec2,
}

/// Body extents and the grid probe cast ahead of movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProbe {
    pub half_extents: Vec2,
    pub samples: usize,
    pub distance: f32,
}

/// Phase of the take-hit / death sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HitReaction {
    /// Can be hit.
    #[default]
    Ready,
    /// Damage applied, waiting for the hurt clip to start.
    AwaitingHurt { source: Entity },
    /// Hurt clip playing; movement frozen.
    Hurting {
        source: Entity,
        elapsed: f32,
        duration: f32,
    },
    /// Death clip requested, waiting for it to start.
    AwaitingDeath { killer: Entity },
    /// Terminal.
    Dead,
}

impl HitReaction {
    /// A sequence is running and further hits are ignored.
    pub fn in_progress(self) -> bool {
        !matches!(self, HitReaction::Ready | HitReaction::Dead)
    }
}

/// How a finished hit reaction ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReactionOutcome {
    Survived { source: Entity },
    Died { killer: Entity },
}

/// Spawn-time actor settings.
#[derive(Debug, Clone)]
pub struct ActorConfig {
    pub health: f32,
    pub speed: f32,
    pub position: Vec2,
    pub facing: Facing,
    pub patrol: Patrol,
    pub vision: VisionCone,
    pub body: BodyProbe,
    pub layers: LayerConfig,
}

/// State shared by every NPC family.
#[derive(Debug, Clone)]
pub struct Actor {
    health: f32,
    pub position: Vec2,
    pub facing: Facing,
    pub speed: f32,
    pub patrol: Patrol,
    routine_active: bool,
    taking_hit: bool,
    stop_remaining: Option<f32>,
    vision: VisionCone,
    vision_hits: Vec<RayHit>,
    body: BodyProbe,
    movement_hits: Vec<RayHit>,
    heading: Vec2,
    layers: LayerConfig,
    reaction: HitReaction,
    player_contact: bool,
}

impl Actor {
    pub fn new(config: ActorConfig) -> Self {
        Self {
            health: config.health.max(0.0),
            position: config.position,
            facing: config.facing,
            speed: config.speed,
            patrol: config.patrol,
            routine_active: true,
            taking_hit: false,
            stop_remaining: None,
            vision: config.vision,
            vision_hits: Vec::new(),
            body: config.body,
            movement_hits: Vec::new(),
            heading: Vec2::ZERO,
            layers: config.layers,
            reaction: HitReaction::Ready,
            player_contact: true,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Automatic patrol movement is allowed.
    pub fn routine_active(&self) -> bool {
        self.routine_active
    }

    /// Hurt clip is playing.
    pub fn taking_hit(&self) -> bool {
        self.taking_hit
    }

    /// Still stopped at a waypoint.
    pub fn is_stopped(&self) -> bool {
        self.stop_remaining.is_some()
    }

    pub fn reaction(&self) -> HitReaction {
        self.reaction
    }

    /// Body may touch and hurt the player. Cleared for good when dying.
    pub fn player_contact(&self) -> bool {
        self.player_contact
    }

    pub fn vision_hits(&self) -> &[RayHit] {
        &self.vision_hits
    }

    pub fn movement_hits(&self) -> &[RayHit] {
        &self.movement_hits
    }

    pub fn body(&self) -> BodyProbe {
        self.body
    }

    /// Hand the actor over to a higher-priority behavior.
    ///
    /// Also cancels a pending waypoint stop so it cannot restart the patrol.
    pub fn suspend_routine(&mut self) {
        self.routine_active = false;
        self.stop_remaining = None;
    }

    /// Give the actor back to its patrol, unless it is dying.
    pub fn resume_routine(&mut self) {
        if self.is_alive() {
            self.routine_active = true;
        }
    }

    /// Per-tick reset of transient movement state.
    pub fn begin_tick(&mut self) {
        self.heading = Vec2::ZERO;
    }

    pub fn advance_stop(&mut self, dt: f32) {
        let Some(remaining) = self.stop_remaining else {
            return;
        };
        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.stop_remaining = Some(remaining);
            return;
        }

        self.stop_remaining = None;
        if self.is_alive() {
            self.routine_active = true;
        }
    }

    /// Recompute the vision cone from the current facing.
    pub fn cast_vision(&mut self, probe: &dyn RayCaster) {
        let sign = self.facing.sign();
        let offset = Vec2::new(self.vision.origin_offset.x * sign, self.vision.origin_offset.y);
        self.vision_hits = raycast_fan(
            probe,
            self.vision.rays,
            self.vision.angle,
            self.position + offset,
            0.0,
            self.facing.direction(),
            self.vision.distance,
            self.layers.vision,
        );
    }

    /// Walk the patrol route.
    ///
    /// The route index advances whenever the actor stands on its waypoint, even
    /// while a chase or hit has the routine suspended. `should_stop` is then
    /// asked whether to pause there. Movement only happens while patrolling.
    pub fn patrol(&mut self, dt: f32, out: &mut Outbox, should_stop: impl FnOnce(&Actor) -> bool) {
        if self.is_waypoint_reached(self.patrol.current_waypoint()) {
            self.patrol.advance();
            if self.is_alive() && should_stop(self) {
                self.begin_stop(out);
                return;
            }
        }

        if !self.routine_active {
            return;
        }

        let waypoint = self.patrol.current_waypoint();
        self.move_to(waypoint, dt, out);
    }

    fn begin_stop(&mut self, out: &mut Outbox) {
        self.routine_active = false;
        self.stop_remaining = Some(self.patrol.stop_time);
        out.walking(false);
        debug!("Stopping at waypoint {} for {}s", self.patrol.current_index(), self.patrol.stop_time);
    }

    /// Grid-probe the terrain ahead of this tick's movement, or ahead of the
    /// facing direction when standing still.
    pub fn probe_movement(&mut self, probe: &dyn RayCaster) {
        let movement = if self.heading == Vec2::ZERO {
            self.facing.direction()
        } else {
            self.heading
        };
        let bounds = Rect::from_center_half_size(self.position, self.body.half_extents);
        self.movement_hits = raycast_grid(
            probe,
            bounds,
            movement,
            self.body.samples,
            self.body.distance,
            self.layers.movement,
        );
    }

    /// Distance to `point`, ignoring height unless the route is vertical.
    pub fn planar_distance(&self, point: Vec2) -> f32 {
        if self.patrol.vertical {
            self.position.distance(point)
        } else {
            (self.position.x - point.x).abs()
        }
    }

    pub fn is_waypoint_reached(&self, point: Vec2) -> bool {
        self.planar_distance(point) < self.patrol.reached_radius
    }

    /// Step toward `destination` at constant speed. Frozen while hurt.
    pub fn move_to(&mut self, destination: Vec2, dt: f32, out: &mut Outbox) {
        if self.taking_hit {
            return;
        }

        if self.patrol.flip_on_move {
            self.face_towards(destination.x);
        }

        let target = if self.patrol.vertical {
            destination
        } else {
            Vec2::new(destination.x, self.position.y)
        };
        self.heading = target - self.position;
        self.position = move_towards(self.position, target, self.speed * dt);
        out.walking(true);
    }

    /// Turn around if `x` lies behind the actor.
    pub fn face_towards(&mut self, x: f32) {
        let behind = match self.facing {
            Facing::Right => self.position.x > x,
            Facing::Left => self.position.x < x,
        };
        if behind {
            self.facing = self.facing.flipped();
        }
    }

    /// Apply a hit. Ignored while dead or already reacting to another hit.
    pub fn take_hit(&mut self, source: Entity, amount: f32, out: &mut Outbox) -> bool {
        if !self.is_alive() || self.reaction != HitReaction::Ready {
            return false;
        }

        self.health = (self.health - amount.max(0.0)).max(0.0);
        out.trigger(Cue::TakeHit);
        self.reaction = HitReaction::AwaitingHurt { source };
        debug!("Hit by {:?} for {}, {} health left", source, amount, self.health);
        true
    }

    /// Run the hit/death sequence as far as the cues allow this tick.
    pub fn advance_reaction(&mut self, ctx: &TickContext, out: &mut Outbox) -> Option<ReactionOutcome> {
        loop {
            match self.reaction {
                HitReaction::Ready | HitReaction::Dead => return None,
                HitReaction::AwaitingHurt { source } => {
                    if !ctx.cues.has_started(Cue::TakeHit) {
                        return None;
                    }
                    self.taking_hit = true;
                    self.reaction = HitReaction::Hurting {
                        source,
                        elapsed: 0.0,
                        duration: ctx.cues.current_duration(),
                    };
                }
                HitReaction::Hurting {
                    source,
                    elapsed,
                    duration,
                } => {
                    let elapsed = elapsed + ctx.dt;
                    if elapsed < duration {
                        self.reaction = HitReaction::Hurting {
                            source,
                            elapsed,
                            duration,
                        };
                        return None;
                    }

                    self.taking_hit = false;
                    if self.is_alive() {
                        self.reaction = HitReaction::Ready;
                        return Some(ReactionOutcome::Survived { source });
                    }
                    self.begin_dying(source, out);
                }
                HitReaction::AwaitingDeath { killer } => {
                    if !ctx.cues.has_started(Cue::Death) {
                        return None;
                    }
                    self.reaction = HitReaction::Dead;
                    out.event(NpcEvent::Sound(NpcSound::Death));
                    return Some(ReactionOutcome::Died { killer });
                }
            }
        }
    }

    fn begin_dying(&mut self, killer: Entity, out: &mut Outbox) {
        self.routine_active = false;
        self.stop_remaining = None;
        self.player_contact = false;
        out.walking(false);
        out.trigger(Cue::Death);
        self.reaction = HitReaction::AwaitingDeath { killer };
        debug!("Dying, killed by {:?}", killer);
    }
}
