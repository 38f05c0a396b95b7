use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::core::db::{
    model::{DEFAULT_USER_NAME, NEW_USER_NAME, new_id},
    util::null_as_default,
};

/// A profile. The `id` never changes once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// ISO `YYYY-MM-DD`, or empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub birth_date: String,
    /// Data URI of the profile photo, or empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub photo_base64: String,
}

impl User {
    /// Build a user from `new`, filling omitted fields with the new-profile defaults.
    pub fn from_new(new: NewUser) -> Self {
        Self {
            id: new_id(),
            name: new.name.unwrap_or_else(|| NEW_USER_NAME.to_owned()),
            birth_date: new.birth_date.unwrap_or_default(),
            photo_base64: new.photo_base64.unwrap_or_default(),
        }
    }

    /// The first-run profile.
    pub fn seed() -> Self {
        Self::from_new(NewUser::named(DEFAULT_USER_NAME))
    }

    /// Promote the legacy single-user record to a profile with a fresh id.
    pub(super) fn from_legacy(legacy: NewUser) -> Self {
        Self::from_new(NewUser {
            name: legacy.name.or_else(|| Some(DEFAULT_USER_NAME.to_owned())),
            ..legacy
        })
    }

    pub fn birth_date(&self) -> Option<Date> {
        parse_birth_date(&self.birth_date)
    }

    /// Age in whole years on `today`, if a valid birth date is recorded.
    pub fn age_on(&self, today: Date) -> Option<u16> {
        let born = self.birth_date()?;
        if today < born {
            return None;
        }
        let mut years = today.year() - born.year();
        if (today.month() as u8, today.day()) < (born.month() as u8, born.day()) {
            years -= 1;
        }
        u16::try_from(years).ok()
    }
}

/// Parse a stored birth date; empty or malformed input yields `None`.
pub fn parse_birth_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Fields for a new profile. `None` fields take their defaults.
///
/// Also the shape of the legacy single-user record, which carried the same
/// fields without an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewUser {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub photo_base64: Option<String>,
}

impl NewUser {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Partial profile edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub photo_base64: Option<String>,
}

impl UserUpdate {
    pub(super) fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(birth_date) = self.birth_date {
            user.birth_date = birth_date;
        }
        if let Some(photo_base64) = self.photo_base64 {
            user.photo_base64 = photo_base64;
        }
    }
}

pub trait UserRepository {
    /// Every profile, in creation order.
    fn list_users(&self) -> Vec<User>;
    /// The active profile.
    fn get_user(&self) -> Option<User>;
    fn active_user_id(&self) -> String;
    /// Merge `update` into the active profile. Returns `false` if there is none.
    fn set_user(&mut self, update: UserUpdate) -> bool;
    /// Append a profile and make it active.
    fn add_user(&mut self, user: NewUser) -> User;
    /// Returns `false`, changing nothing, if `id` is unknown.
    fn set_active_user(&mut self, id: &str) -> bool;
}
