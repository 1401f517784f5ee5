use strum_macros::{Display, EnumString};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Dev = 1,
    Owner = 2,
    Rh = 3,
    Manager = 4,
    Employee = 5,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Dev),
            2 => Some(Role::Owner),
            3 => Some(Role::Rh),
            4 => Some(Role::Manager),
            5 => Some(Role::Employee),
            _ => None,
        }
    }

    pub fn as_id(&self) -> u8 {
        *self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip() {
        for id in 1..=5u8 {
            let role = Role::from_id(id).unwrap();
            assert_eq!(role.as_id(), id);
        }
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(6), None);
    }

    #[test]
    fn string_form_matches_stored_values() {
        assert_eq!(Role::Rh.to_string(), "rh");
        assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
        assert!("admin".parse::<Role>().is_err());
    }
}
