//! Built-in avatar animations provided by the host

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a built-in avatar clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvatarPreset {
    Stand0,
    Stand1,
    Stand2,
    Stand3,
    Stand4,
    Stand5,
    Stand6,
    Stand7,
    Celebrate,
    Clap,
    Wave,
    MaleIdleLookAround,
    MaleIdleStretch,
    MaleIdleShiftWeight,
    MaleIdleCheckHand,
    MaleAngry,
    MaleConfused,
    MaleCry,
    MaleLaugh,
    MaleSurprised,
    MaleYawn,
    FemaleIdleCheckNails,
    FemaleIdleFixShoe,
    FemaleIdleGlance,
    FemaleIdleLookAround,
    FemaleIdleShiftWeight,
    FemaleIdleStretch,
    FemaleAngry,
    FemaleConfused,
    FemaleCry,
    FemaleLaugh,
    FemaleShocked,
    FemaleYawn,
}

impl AvatarPreset {
    pub const ALL: [AvatarPreset; 33] = [
        AvatarPreset::Stand0,
        AvatarPreset::Stand1,
        AvatarPreset::Stand2,
        AvatarPreset::Stand3,
        AvatarPreset::Stand4,
        AvatarPreset::Stand5,
        AvatarPreset::Stand6,
        AvatarPreset::Stand7,
        AvatarPreset::Celebrate,
        AvatarPreset::Clap,
        AvatarPreset::Wave,
        AvatarPreset::MaleIdleLookAround,
        AvatarPreset::MaleIdleStretch,
        AvatarPreset::MaleIdleShiftWeight,
        AvatarPreset::MaleIdleCheckHand,
        AvatarPreset::MaleAngry,
        AvatarPreset::MaleConfused,
        AvatarPreset::MaleCry,
        AvatarPreset::MaleLaugh,
        AvatarPreset::MaleSurprised,
        AvatarPreset::MaleYawn,
        AvatarPreset::FemaleIdleCheckNails,
        AvatarPreset::FemaleIdleFixShoe,
        AvatarPreset::FemaleIdleGlance,
        AvatarPreset::FemaleIdleLookAround,
        AvatarPreset::FemaleIdleShiftWeight,
        AvatarPreset::FemaleIdleStretch,
        AvatarPreset::FemaleAngry,
        AvatarPreset::FemaleConfused,
        AvatarPreset::FemaleCry,
        AvatarPreset::FemaleLaugh,
        AvatarPreset::FemaleShocked,
        AvatarPreset::FemaleYawn,
    ];

    /// Stable snake_case name, used as the library key
    pub fn name(self) -> &'static str {
        match self {
            AvatarPreset::Stand0 => "stand0",
            AvatarPreset::Stand1 => "stand1",
            AvatarPreset::Stand2 => "stand2",
            AvatarPreset::Stand3 => "stand3",
            AvatarPreset::Stand4 => "stand4",
            AvatarPreset::Stand5 => "stand5",
            AvatarPreset::Stand6 => "stand6",
            AvatarPreset::Stand7 => "stand7",
            AvatarPreset::Celebrate => "celebrate",
            AvatarPreset::Clap => "clap",
            AvatarPreset::Wave => "wave",
            AvatarPreset::MaleIdleLookAround => "male_idle_look_around",
            AvatarPreset::MaleIdleStretch => "male_idle_stretch",
            AvatarPreset::MaleIdleShiftWeight => "male_idle_shift_weight",
            AvatarPreset::MaleIdleCheckHand => "male_idle_check_hand",
            AvatarPreset::MaleAngry => "male_angry",
            AvatarPreset::MaleConfused => "male_confused",
            AvatarPreset::MaleCry => "male_cry",
            AvatarPreset::MaleLaugh => "male_laugh",
            AvatarPreset::MaleSurprised => "male_surprised",
            AvatarPreset::MaleYawn => "male_yawn",
            AvatarPreset::FemaleIdleCheckNails => "female_idle_check_nails",
            AvatarPreset::FemaleIdleFixShoe => "female_idle_fix_shoe",
            AvatarPreset::FemaleIdleGlance => "female_idle_glance",
            AvatarPreset::FemaleIdleLookAround => "female_idle_look_around",
            AvatarPreset::FemaleIdleShiftWeight => "female_idle_shift_weight",
            AvatarPreset::FemaleIdleStretch => "female_idle_stretch",
            AvatarPreset::FemaleAngry => "female_angry",
            AvatarPreset::FemaleConfused => "female_confused",
            AvatarPreset::FemaleCry => "female_cry",
            AvatarPreset::FemaleLaugh => "female_laugh",
            AvatarPreset::FemaleShocked => "female_shocked",
            AvatarPreset::FemaleYawn => "female_yawn",
        }
    }

    /// Idle presets, suitable for looping while the avatar waits
    pub fn is_idle(self) -> bool {
        matches!(
            self,
            AvatarPreset::Stand0
                | AvatarPreset::Stand1
                | AvatarPreset::Stand2
                | AvatarPreset::Stand3
                | AvatarPreset::Stand4
                | AvatarPreset::Stand5
                | AvatarPreset::Stand6
                | AvatarPreset::Stand7
                | AvatarPreset::MaleIdleLookAround
                | AvatarPreset::MaleIdleStretch
                | AvatarPreset::MaleIdleShiftWeight
                | AvatarPreset::MaleIdleCheckHand
                | AvatarPreset::FemaleIdleCheckNails
                | AvatarPreset::FemaleIdleFixShoe
                | AvatarPreset::FemaleIdleGlance
                | AvatarPreset::FemaleIdleLookAround
                | AvatarPreset::FemaleIdleShiftWeight
                | AvatarPreset::FemaleIdleStretch
        )
    }
}

impl fmt::Display for AvatarPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AvatarPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AvatarPreset::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown avatar preset '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_parse_back() {
        let mut seen = HashSet::new();
        for preset in AvatarPreset::ALL {
            assert!(seen.insert(preset.name()), "duplicate name {}", preset);
            assert_eq!(preset.name().parse::<AvatarPreset>().unwrap(), preset);
        }
    }

    #[test]
    fn unknown_name_fails() {
        assert!("moonwalk".parse::<AvatarPreset>().is_err());
    }

    #[test]
    fn idle_classification() {
        assert!(AvatarPreset::Stand3.is_idle());
        assert!(AvatarPreset::FemaleIdleGlance.is_idle());
        assert!(!AvatarPreset::Celebrate.is_idle());
    }
}
