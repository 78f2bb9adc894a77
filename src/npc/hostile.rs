//! Damage-dealing layer shared by every hostile NPC.

/// Contact damage and whether the attack currently connects.
#[derive(Debug, Clone, PartialEq)]
pub struct Hostile {
    contact_damage: f32,
    damage_frame_playing: bool,
}

impl Hostile {
    pub fn new(contact_damage: f32) -> Self {
        Self {
            contact_damage: contact_damage.max(0.0),
            damage_frame_playing: false,
        }
    }

    pub fn contact_damage(&self) -> f32 {
        self.contact_damage
    }

    /// Set by the display layer while the damaging part of an attack plays.
    pub fn set_damage_frame_playing(&mut self, playing: bool) {
        self.damage_frame_playing = playing;
    }

    pub fn is_damage_frame_playing(&self) -> bool {
        self.damage_frame_playing
    }

    /// Hostiles pause at every waypoint.
    pub fn should_stop(&self) -> bool {
        true
    }
}
