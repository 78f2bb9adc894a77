//! Animation cues and the stand-in cue player.
//!
//! The NPC core only ever signals named cues and asks two questions back:
//! "has cue X started playing?" and "how long is the clip playing now?".
//! [`CueFeed`] is that contract. [`CuePlayer`] implements it from clip
//! lengths in the NPC definition, so the hit and death sequences keep their
//! timing even without an animation graph attached.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

/// Named animation/audio cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Cue {
    Walking,
    Jump,
    Attack,
    Dash,
    TakeHit,
    Death,
}

impl Cue {
    /// Triggers of lower priority never replace a queued one of higher priority.
    fn priority(self) -> u8 {
        match self {
            Cue::Death => 2,
            Cue::TakeHit => 1,
            _ => 0,
        }
    }
}

/// What an NPC asks of the display layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CueSignal {
    /// Set a held boolean cue (e.g. walking on/off).
    Hold(Cue, bool),
    /// Fire a one-shot cue.
    Trigger(Cue),
}

/// Read side of the display layer, polled once per tick.
pub trait CueFeed {
    /// Whether `cue` is the clip currently playing.
    fn has_started(&self, cue: Cue) -> bool;

    /// Reported length, in seconds, of the clip currently playing.
    fn current_duration(&self) -> f32;
}

/// Timing of one clip.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CueClip {
    pub duration: f32,
    /// Part of the clip (as fractions of its length) where an attack connects
    #[serde(default)]
    pub damage_window: Option<(f32, f32)>,
}

/// Plays one-shot cues for their configured duration, then falls back to
/// locomotion. `Death` holds its last frame forever.
#[derive(Component, Debug, Clone, Default)]
pub struct CuePlayer {
    clips: HashMap<Cue, CueClip>,
    playing: Option<Cue>,
    elapsed: f32,
    queued: Option<Cue>,
    walking: bool,
}

impl CuePlayer {
    pub fn new(clips: HashMap<Cue, CueClip>) -> Self {
        Self {
            clips,
            ..default()
        }
    }

    /// Record a signal. Triggers start on the next [`CuePlayer::advance`].
    pub fn apply(&mut self, signal: CueSignal) {
        match signal {
            CueSignal::Hold(Cue::Walking, on) => self.walking = on,
            CueSignal::Hold(..) => {}
            CueSignal::Trigger(cue) => {
                let outranked = self.queued.is_some_and(|q| q.priority() > cue.priority());
                if !outranked && self.playing != Some(Cue::Death) {
                    self.queued = Some(cue);
                }
            }
        }
    }

    /// Advance clip time by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if let Some(cue) = self.queued.take() {
            self.playing = Some(cue);
            self.elapsed = 0.0;
            return;
        }

        let Some(cue) = self.playing else {
            return;
        };
        self.elapsed += dt;
        if cue != Cue::Death && self.elapsed >= self.clip_duration(cue) {
            self.playing = None;
            self.elapsed = 0.0;
        }
    }

    /// One-shot clip playing right now, if any.
    pub fn playing(&self) -> Option<Cue> {
        self.playing
    }

    /// Looping clip shown when no one-shot is playing.
    pub fn locomotion(&self) -> Option<Cue> {
        self.walking.then_some(Cue::Walking)
    }

    /// Whether the attack clip is inside its damage window.
    pub fn in_damage_window(&self) -> bool {
        if self.playing != Some(Cue::Attack) {
            return false;
        }
        let Some(clip) = self.clips.get(&Cue::Attack) else {
            return false;
        };
        let Some((start, end)) = clip.damage_window else {
            return false;
        };
        let progress = if clip.duration > 0.0 {
            self.elapsed / clip.duration
        } else {
            1.0
        };
        progress >= start && progress <= end
    }

    fn clip_duration(&self, cue: Cue) -> f32 {
        self.clips.get(&cue).map_or(0.0, |clip| clip.duration)
    }
}

impl CueFeed for CuePlayer {
    fn has_started(&self, cue: Cue) -> bool {
        self.playing == Some(cue)
    }

    fn current_duration(&self) -> f32 {
        self.playing.map_or(0.0, |cue| self.clip_duration(cue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> CuePlayer {
        CuePlayer::new(HashMap::from([
            (Cue::TakeHit, CueClip { duration: 0.4, damage_window: None }),
            (Cue::Death, CueClip { duration: 1.0, damage_window: None }),
            (
                Cue::Attack,
                CueClip {
                    duration: 1.0,
                    damage_window: Some((0.5, 0.75)),
                },
            ),
        ]))
    }

    #[test]
    fn trigger_starts_on_next_advance() {
        let mut cues = player();
        cues.apply(CueSignal::Trigger(Cue::TakeHit));
        assert!(!cues.has_started(Cue::TakeHit));

        cues.advance(0.1);
        assert!(cues.has_started(Cue::TakeHit));
        assert!((cues.current_duration() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn one_shot_returns_to_locomotion() {
        let mut cues = player();
        cues.apply(CueSignal::Hold(Cue::Walking, true));
        cues.apply(CueSignal::Trigger(Cue::TakeHit));
        cues.advance(0.1);
        cues.advance(0.3);
        assert_eq!(cues.playing(), Some(Cue::TakeHit));

        cues.advance(0.2);
        assert_eq!(cues.playing(), None);
        assert_eq!(cues.locomotion(), Some(Cue::Walking));
        assert_eq!(cues.current_duration(), 0.0);
    }

    #[test]
    fn death_holds_and_ignores_later_triggers() {
        let mut cues = player();
        cues.apply(CueSignal::Trigger(Cue::Death));
        cues.advance(0.1);
        cues.advance(5.0);
        assert!(cues.has_started(Cue::Death));

        cues.apply(CueSignal::Trigger(Cue::Attack));
        cues.advance(0.1);
        assert!(cues.has_started(Cue::Death));
    }

    #[test]
    fn hurt_is_not_replaced_by_queued_attack() {
        let mut cues = player();
        cues.apply(CueSignal::Trigger(Cue::TakeHit));
        cues.apply(CueSignal::Trigger(Cue::Attack));
        cues.advance(0.1);
        assert!(cues.has_started(Cue::TakeHit));
    }

    #[test]
    fn damage_window_tracks_attack_progress() {
        let mut cues = player();
        cues.apply(CueSignal::Trigger(Cue::Attack));
        cues.advance(0.1);
        assert!(!cues.in_damage_window());

        cues.advance(0.6);
        assert!(cues.in_damage_window());

        cues.advance(0.2);
        assert!(!cues.in_damage_window());
    }

    #[test]
    fn missing_clip_plays_for_zero_time() {
        let mut cues = CuePlayer::default();
        cues.apply(CueSignal::Trigger(Cue::Attack));
        cues.advance(0.1);
        assert!(cues.has_started(Cue::Attack));
        assert_eq!(cues.current_duration(), 0.0);

        cues.advance(0.1);
        assert_eq!(cues.playing(), None);
    }
}
