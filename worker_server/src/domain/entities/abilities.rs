use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bitmask of abilities a player (or the projectile it fired) carries.
/// Multiple flags may be active at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilityFlags(u32);

impl AbilityFlags {
    /// Fire three projectiles per shot instead of one.
    pub const MULTISHOT: AbilityFlags = AbilityFlags(1 << 1);
    /// Projectiles get a wide rectangular hitbox.
    pub const WIDE_BEAM: AbilityFlags = AbilityFlags(1 << 2);
    /// Absorb one hit; consumed when it triggers.
    pub const SHIELD: AbilityFlags = AbilityFlags(1 << 3);

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_active(self, ability: AbilityFlags) -> bool {
        self.0 & ability.0 != 0
    }

    pub fn grant(&mut self, ability: AbilityFlags) {
        self.0 |= ability.0;
    }

    pub fn consume(&mut self, ability: AbilityFlags) {
        self.0 &= !ability.0;
    }
}

/// One ability flag chosen uniformly at random, for powerup generation.
pub fn random_ability() -> AbilityFlags {
    let mut rng = rand::thread_rng();
    AbilityFlags(1 << rng.gen_range(1..=3u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine_and_consume_independently() {
        let mut flags = AbilityFlags::default();
        assert!(!flags.is_active(AbilityFlags::SHIELD));

        flags.grant(AbilityFlags::MULTISHOT);
        flags.grant(AbilityFlags::SHIELD);
        assert!(flags.is_active(AbilityFlags::MULTISHOT));
        assert!(flags.is_active(AbilityFlags::SHIELD));
        assert!(!flags.is_active(AbilityFlags::WIDE_BEAM));

        flags.consume(AbilityFlags::SHIELD);
        assert!(!flags.is_active(AbilityFlags::SHIELD));
        assert!(flags.is_active(AbilityFlags::MULTISHOT));
    }

    #[test]
    fn random_ability_is_a_single_known_flag() {
        for _ in 0..32 {
            let ability = random_ability();
            assert!(
                ability == AbilityFlags::MULTISHOT
                    || ability == AbilityFlags::WIDE_BEAM
                    || ability == AbilityFlags::SHIELD
            );
        }
    }
}
