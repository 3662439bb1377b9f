use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::schema::{NewUser, PermissionLevel, User, UserPatch};
use crate::intent::{require_text, DeskError, Outcome, StatusMessage, ValidationError};
use crate::session::Session;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

/// REGULAR -> MANAGER -> ADMIN -> REGULAR.
pub const fn next_permission(level: PermissionLevel) -> PermissionLevel {
    match level {
        PermissionLevel::Regular => PermissionLevel::Manager,
        PermissionLevel::Manager => PermissionLevel::Admin,
        PermissionLevel::Admin => PermissionLevel::Regular,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub admins: usize,
    pub managers: usize,
}

impl UserStats {
    pub fn from_users(users: &[User]) -> Self {
        users.iter().fold(Self::default(), |mut stats, user| {
            stats.total += 1;
            stats.active += usize::from(user.is_active);
            match user.permission_level {
                PermissionLevel::Admin => stats.admins += 1,
                PermissionLevel::Manager => stats.managers += 1,
                PermissionLevel::Regular => {}
            }
            stats
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDirectory {
    pub users: Vec<User>,
    pub stats: UserStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub permission_level: PermissionLevel,
}

impl NewUserForm {
    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        let username = require_text(&self.username, "Please fill all fields")?;
        if self.password.is_empty() {
            return Err(ValidationError::Incomplete("Please fill all fields"));
        }
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(ValidationError::UsernameTooShort {
                min: MIN_USERNAME_LEN,
            });
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(NewUser {
            username,
            password: self.password.clone(),
            permission_level: self.permission_level,
        })
    }
}

pub async fn list_users(session: &mut Session) -> Result<Outcome<UserDirectory>, DeskError> {
    session.require_admin().await?;
    let result = session.require_authenticated()?.list_users().await;
    let users = session.settle(result)?;
    let stats = UserStats::from_users(&users);
    Ok(Outcome::new(
        UserDirectory { users, stats },
        StatusMessage::cleared(),
    ))
}

pub async fn create_user(
    session: &mut Session,
    form: &NewUserForm,
) -> Result<Outcome<User>, DeskError> {
    let request = form.validate()?;
    session.require_admin().await?;
    let result = session.require_authenticated()?.create_user(&request).await;
    let user = session.settle(result)?;
    info!(username = %user.username, level = %user.permission_level, "user created");
    Ok(Outcome::new(user, StatusMessage::info("User created successfully")))
}

/// Moves a user to the next permission level in the cycle.
pub async fn cycle_permission(
    session: &mut Session,
    user_id: i64,
    current: PermissionLevel,
) -> Result<Outcome<User>, DeskError> {
    session.require_admin().await?;
    let patch = UserPatch {
        permission_level: Some(next_permission(current)),
        ..UserPatch::default()
    };
    let result = session.require_authenticated()?.update_user(user_id, &patch).await;
    let user = session.settle(result)?;
    info!(user_id, level = %user.permission_level, "permission updated");
    Ok(Outcome::new(
        user,
        StatusMessage::info("Permission updated successfully"),
    ))
}

pub async fn deactivate_user(
    session: &mut Session,
    user_id: i64,
) -> Result<Outcome<User>, DeskError> {
    session.require_admin().await?;
    let result = session.require_authenticated()?.deactivate_user(user_id).await;
    let user = session.settle(result)?;
    info!(user_id, "user deactivated");
    Ok(Outcome::new(
        user,
        StatusMessage::info("User deactivated successfully"),
    ))
}

pub async fn activate_user(session: &mut Session, user_id: i64) -> Result<Outcome<User>, DeskError> {
    session.require_admin().await?;
    let patch = UserPatch {
        is_active: Some(true),
        ..UserPatch::default()
    };
    let result = session.require_authenticated()?.update_user(user_id, &patch).await;
    let user = session.settle(result)?;
    info!(user_id, "user activated");
    Ok(Outcome::new(user, StatusMessage::info("User activated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, level: PermissionLevel, is_active: bool) -> User {
        User {
            id,
            username: format!("user{id}"),
            permission_level: level,
            is_active,
        }
    }

    #[test]
    fn permission_cycle_wraps_around() {
        let mut level = PermissionLevel::Regular;
        let mut seen = Vec::new();
        for _ in 0..3 {
            level = next_permission(level);
            seen.push(level);
        }
        assert_eq!(
            seen,
            vec![
                PermissionLevel::Manager,
                PermissionLevel::Admin,
                PermissionLevel::Regular
            ]
        );
    }

    #[test]
    fn stats_count_levels_and_activity() {
        let users = vec![
            user(1, PermissionLevel::Admin, true),
            user(2, PermissionLevel::Manager, true),
            user(3, PermissionLevel::Regular, false),
            user(4, PermissionLevel::Manager, false),
        ];
        assert_eq!(
            UserStats::from_users(&users),
            UserStats {
                total: 4,
                active: 2,
                admins: 1,
                managers: 2
            }
        );
    }

    #[test]
    fn new_user_form_checks_lengths() {
        let form = NewUserForm {
            username: "al".to_string(),
            password: "secret1".to_string(),
            permission_level: PermissionLevel::Regular,
        };
        assert_eq!(
            form.validate().expect_err("short username"),
            ValidationError::UsernameTooShort { min: 3 }
        );

        let form = NewUserForm {
            username: "alice".to_string(),
            password: "12345".to_string(),
            permission_level: PermissionLevel::Manager,
        };
        assert_eq!(
            form.validate().expect_err("short password").to_string(),
            "Password must be at least 6 characters"
        );

        let form = NewUserForm {
            username: "  ".to_string(),
            password: String::new(),
            permission_level: PermissionLevel::Manager,
        };
        assert_eq!(
            form.validate().expect_err("empty").to_string(),
            "Please fill all fields"
        );
    }
}
