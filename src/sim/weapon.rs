//! Weapon factory: firing cadence and bullet behaviour per weapon class

use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponClass {
    /// Single straight shot
    #[default]
    Laser,
    /// 16-bullet radial volley
    Spray,
    /// Single heavy shot, faster cadence
    Blaster,
}

impl WeaponClass {
    pub fn index(self) -> u8 {
        match self {
            WeaponClass::Laser => 0,
            WeaponClass::Spray => 1,
            WeaponClass::Blaster => 2,
        }
    }
}

impl TryFrom<u8> for WeaponClass {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(WeaponClass::Laser),
            1 => Ok(WeaponClass::Spray),
            2 => Ok(WeaponClass::Blaster),
            other => Err(GameError::UnknownWeaponClass(other)),
        }
    }
}

/// Firing parameters for a weapon class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub class: WeaponClass,
    /// Seconds between shots
    pub fire_interval: f32,
    pub damage: i32,
    /// Player bullet speed (enemy bullets use `ENEMY_BULLET_SPEED`)
    pub bullet_speed: f32,
}

impl Weapon {
    pub fn for_class(class: WeaponClass) -> Self {
        match class {
            WeaponClass::Laser => Self {
                class,
                fire_interval: 0.25,
                damage: 1,
                bullet_speed: 600.0,
            },
            WeaponClass::Spray => Self {
                class,
                fire_interval: 0.6,
                damage: 1,
                bullet_speed: 0.0,
            },
            WeaponClass::Blaster => Self {
                class,
                fire_interval: 0.12,
                damage: 2,
                bullet_speed: 720.0,
            },
        }
    }

    /// Spray fires a radial volley instead of a single directional bullet
    pub fn is_spray(&self) -> bool {
        self.class == WeaponClass::Spray
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trips() {
        for class in [WeaponClass::Laser, WeaponClass::Spray, WeaponClass::Blaster] {
            assert_eq!(WeaponClass::try_from(class.index()).unwrap(), class);
        }
    }

    #[test]
    fn test_unknown_class_is_an_error() {
        assert!(matches!(
            WeaponClass::try_from(9),
            Err(GameError::UnknownWeaponClass(9))
        ));
    }

    #[test]
    fn test_only_class_one_sprays() {
        assert!(Weapon::for_class(WeaponClass::Spray).is_spray());
        assert!(!Weapon::for_class(WeaponClass::Laser).is_spray());
        assert!(!Weapon::for_class(WeaponClass::Blaster).is_spray());
    }

    #[test]
    fn test_blaster_outpaces_laser() {
        let laser = Weapon::for_class(WeaponClass::Laser);
        let blaster = Weapon::for_class(WeaponClass::Blaster);
        assert!(blaster.fire_interval < laser.fire_interval);
        assert!(blaster.damage > laser.damage);
    }
}
