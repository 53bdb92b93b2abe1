//! Project collaborators: access roles, the permissions they grant, film
//! crew role tags, and access resolution for a user on a project.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Access roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorRole {
    Viewer,
    Editor,
    Admin,
}

impl CollaboratorRole {
    pub const ALL: &'static [CollaboratorRole] = &[Self::Viewer, Self::Editor, Self::Admin];

    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(CoreError::Validation(format!(
                "Invalid collaborator role '{s}'. Must be one of: viewer, editor, admin"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    /// Everyone can view; editors and admins can edit; only admins administer.
    pub fn permissions(self) -> Permissions {
        Permissions {
            view: true,
            edit: matches!(self, Self::Editor | Self::Admin),
            admin: self == Self::Admin,
        }
    }
}

/// Permission flags stored alongside each collaborator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    pub view: bool,
    pub edit: bool,
    pub admin: bool,
}

impl Permissions {
    pub const ALL: Permissions = Permissions {
        view: true,
        edit: true,
        admin: true,
    };

    pub const NONE: Permissions = Permissions {
        view: false,
        edit: false,
        admin: false,
    };
}

// ---------------------------------------------------------------------------
// Film roles
// ---------------------------------------------------------------------------

/// Crew role tags with display labels. Purely descriptive.
pub const FILM_ROLES: &[(&str, &str)] = &[
    ("director", "Director"),
    ("cinematographer", "Cinematographer"),
    ("editor", "Editor"),
    ("producer", "Producer"),
    ("writer", "Writer"),
    ("sound", "Sound Engineer"),
    ("gaffer", "Gaffer"),
    ("assistant", "Assistant"),
    ("crew", "General Crew"),
];

pub const DEFAULT_FILM_ROLE: &str = "crew";

pub fn is_valid_film_role(role: &str) -> bool {
    FILM_ROLES.iter().any(|(value, _)| *value == role)
}

/// Display label for a film role; unknown roles show as general crew.
pub fn film_role_label(role: &str) -> &'static str {
    FILM_ROLES
        .iter()
        .find(|(value, _)| *value == role)
        .map_or("General Crew", |(_, label)| label)
}

// ---------------------------------------------------------------------------
// Access resolution
// ---------------------------------------------------------------------------

/// What a user may do on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAccess {
    Owner,
    Collaborator(CollaboratorRole),
    None,
}

/// Which permission an operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    View,
    Edit,
    Admin,
}

impl ProjectAccess {
    /// Resolve access from the project's owner and the user's collaborator
    /// role on it, if any.
    pub fn resolve(owner_id: DbId, user_id: DbId, role: Option<CollaboratorRole>) -> Self {
        if owner_id == user_id {
            return Self::Owner;
        }
        match role {
            Some(role) => Self::Collaborator(role),
            None => Self::None,
        }
    }

    pub fn permissions(self) -> Permissions {
        match self {
            Self::Owner => Permissions::ALL,
            Self::Collaborator(role) => role.permissions(),
            Self::None => Permissions::NONE,
        }
    }

    pub fn allows(self, needed: Permission) -> bool {
        let p = self.permissions();
        match needed {
            Permission::View => p.view,
            Permission::Edit => p.edit,
            Permission::Admin => p.admin,
        }
    }

    /// Fail with `Forbidden` unless `needed` is granted.
    pub fn require(self, needed: Permission) -> Result<(), CoreError> {
        if self.allows(needed) {
            return Ok(());
        }
        let what = match needed {
            Permission::View => "view",
            Permission::Edit => "edit",
            Permission::Admin => "manage",
        };
        Err(CoreError::Forbidden(format!(
            "You do not have permission to {what} this project"
        )))
    }
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

/// Normalize and sanity-check an invite email address.
pub fn validate_invite_email(email: &str) -> Result<String, CoreError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(email)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn role_permissions() {
        assert_eq!(
            CollaboratorRole::Viewer.permissions(),
            Permissions { view: true, edit: false, admin: false }
        );
        assert_eq!(
            CollaboratorRole::Editor.permissions(),
            Permissions { view: true, edit: true, admin: false }
        );
        assert_eq!(CollaboratorRole::Admin.permissions(), Permissions::ALL);
    }

    #[test]
    fn owner_has_everything() {
        let access = ProjectAccess::resolve(1, 1, None);
        assert_eq!(access, ProjectAccess::Owner);
        assert!(access.require(Permission::Admin).is_ok());
    }

    #[test]
    fn viewer_cannot_edit() {
        let access = ProjectAccess::resolve(1, 2, Some(CollaboratorRole::Viewer));
        assert!(access.require(Permission::View).is_ok());
        assert_matches!(access.require(Permission::Edit), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn stranger_has_nothing() {
        let access = ProjectAccess::resolve(1, 3, None);
        assert!(!access.allows(Permission::View));
    }

    #[test]
    fn film_roles() {
        assert_eq!(FILM_ROLES.len(), 9);
        assert!(is_valid_film_role(DEFAULT_FILM_ROLE));
        assert!(!is_valid_film_role("caterer"));
        assert_eq!(film_role_label("sound"), "Sound Engineer");
        assert_eq!(film_role_label("caterer"), "General Crew");
    }

    #[test]
    fn invite_email_normalized() {
        assert_eq!(validate_invite_email("  Ana@Example.COM ").unwrap(), "ana@example.com");
        assert!(validate_invite_email("no-at-sign").is_err());
        assert!(validate_invite_email("@example.com").is_err());
        assert!(validate_invite_email("a@localhost").is_err());
    }

    #[test]
    fn role_round_trip() {
        for role in [CollaboratorRole::Viewer, CollaboratorRole::Editor, CollaboratorRole::Admin] {
            assert_eq!(CollaboratorRole::from_str_db(role.as_str()).unwrap(), role);
        }
        assert!(CollaboratorRole::from_str_db("owner").is_err());
    }
}
