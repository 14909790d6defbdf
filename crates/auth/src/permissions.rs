//! # Permissions
//!
//! Every protected operation names a [`Permission`]. A permission is granted
//! purely by the caller's role as loaded from the store.
//!
//! Permissions follow a `resource:action` naming convention, for example
//! `feedback:acknowledge` or `dashboard:read`.

use entity::sea_orm_active_enums::UserRole;
use serde::{Deserialize, Serialize};

/// Represents a single permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// User directory permissions
    Users(UserAction),
    /// Feedback permissions
    Feedback(FeedbackAction),
    /// Tag catalog permissions
    Tags(TagAction),
    /// Feedback request permissions
    FeedbackRequests(FeedbackRequestAction),
    /// Dashboard permissions
    Dashboard(DashboardAction),
}

/// Actions available for user resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserAction {
    /// Create new users
    Create,
    /// List every user
    Read,
    /// List the caller's direct reports
    Team,
    /// List managers
    Managers,
}

/// Actions available for feedback resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackAction {
    Create,
    /// Scoped to the caller's own feedback
    Read,
    Update,
    Acknowledge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagAction {
    Create,
}

/// Actions available for feedback requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackRequestAction {
    Create,
    /// Scoped to the caller's own or their team's requests
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DashboardAction {
    Read,
}

impl Permission {
    /// Roles granted this permission.
    #[must_use]
    pub fn roles(&self) -> &'static [UserRole] {
        const MANAGER: &[UserRole] = &[UserRole::Manager];
        const EMPLOYEE: &[UserRole] = &[UserRole::Employee];
        const ANYONE: &[UserRole] = &[UserRole::Manager, UserRole::Employee];

        match self {
            Permission::Users(_) => MANAGER,
            Permission::Feedback(FeedbackAction::Create | FeedbackAction::Update) => MANAGER,
            Permission::Feedback(FeedbackAction::Acknowledge) => EMPLOYEE,
            Permission::Feedback(FeedbackAction::Read) => ANYONE,
            Permission::Tags(TagAction::Create) => MANAGER,
            Permission::FeedbackRequests(FeedbackRequestAction::Create) => EMPLOYEE,
            Permission::FeedbackRequests(FeedbackRequestAction::Read) => ANYONE,
            Permission::Dashboard(DashboardAction::Read) => MANAGER,
        }
    }

    /// Whether `role` holds this permission.
    #[inline]
    pub fn allows(&self, role: &UserRole) -> bool { self.roles().contains(role) }

    /// Parse a permission string into a Permission enum
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        match (resource, action) {
            ("users", "create") => Some(Permission::Users(UserAction::Create)),
            ("users", "read") => Some(Permission::Users(UserAction::Read)),
            ("users", "team") => Some(Permission::Users(UserAction::Team)),
            ("users", "managers") => Some(Permission::Users(UserAction::Managers)),
            ("feedback", "create") => Some(Permission::Feedback(FeedbackAction::Create)),
            ("feedback", "read") => Some(Permission::Feedback(FeedbackAction::Read)),
            ("feedback", "update") => Some(Permission::Feedback(FeedbackAction::Update)),
            ("feedback", "acknowledge") => Some(Permission::Feedback(FeedbackAction::Acknowledge)),
            ("tags", "create") => Some(Permission::Tags(TagAction::Create)),
            ("feedback_requests", "create") => Some(Permission::FeedbackRequests(FeedbackRequestAction::Create)),
            ("feedback_requests", "read") => Some(Permission::FeedbackRequests(FeedbackRequestAction::Read)),
            ("dashboard", "read") => Some(Permission::Dashboard(DashboardAction::Read)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Users(action) => {
                let action = match action {
                    UserAction::Create => "create",
                    UserAction::Read => "read",
                    UserAction::Team => "team",
                    UserAction::Managers => "managers",
                };
                write!(f, "users:{}", action)
            },
            Permission::Feedback(action) => {
                let action = match action {
                    FeedbackAction::Create => "create",
                    FeedbackAction::Read => "read",
                    FeedbackAction::Update => "update",
                    FeedbackAction::Acknowledge => "acknowledge",
                };
                write!(f, "feedback:{}", action)
            },
            Permission::Tags(TagAction::Create) => write!(f, "tags:create"),
            Permission::FeedbackRequests(action) => {
                let action = match action {
                    FeedbackRequestAction::Create => "create",
                    FeedbackRequestAction::Read => "read",
                };
                write!(f, "feedback_requests:{}", action)
            },
            Permission::Dashboard(DashboardAction::Read) => write!(f, "dashboard:read"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Permission; 12] = [
        Permission::Users(UserAction::Create),
        Permission::Users(UserAction::Read),
        Permission::Users(UserAction::Team),
        Permission::Users(UserAction::Managers),
        Permission::Feedback(FeedbackAction::Create),
        Permission::Feedback(FeedbackAction::Read),
        Permission::Feedback(FeedbackAction::Update),
        Permission::Feedback(FeedbackAction::Acknowledge),
        Permission::Tags(TagAction::Create),
        Permission::FeedbackRequests(FeedbackRequestAction::Create),
        Permission::FeedbackRequests(FeedbackRequestAction::Read),
        Permission::Dashboard(DashboardAction::Read),
    ];

    #[test]
    fn test_manager_only_permissions() {
        for perm in [
            Permission::Users(UserAction::Create),
            Permission::Users(UserAction::Team),
            Permission::Feedback(FeedbackAction::Create),
            Permission::Feedback(FeedbackAction::Update),
            Permission::Tags(TagAction::Create),
            Permission::Dashboard(DashboardAction::Read),
        ] {
            assert!(perm.allows(&UserRole::Manager), "{perm}");
            assert!(!perm.allows(&UserRole::Employee), "{perm}");
        }
    }

    #[test]
    fn test_employee_only_permissions() {
        for perm in [
            Permission::Feedback(FeedbackAction::Acknowledge),
            Permission::FeedbackRequests(FeedbackRequestAction::Create),
        ] {
            assert!(perm.allows(&UserRole::Employee), "{perm}");
            assert!(!perm.allows(&UserRole::Manager), "{perm}");
        }
    }

    #[test]
    fn test_scoped_reads_allow_both_roles() {
        for perm in [
            Permission::Feedback(FeedbackAction::Read),
            Permission::FeedbackRequests(FeedbackRequestAction::Read),
        ] {
            assert!(perm.allows(&UserRole::Manager));
            assert!(perm.allows(&UserRole::Employee));
        }
    }

    #[test]
    fn test_display_parses_back() {
        for perm in ALL {
            assert_eq!(Permission::from_string(&perm.to_string()), Some(perm));
        }
        assert_eq!(
            Permission::Feedback(FeedbackAction::Acknowledge).to_string(),
            "feedback:acknowledge"
        );
    }

    #[test]
    fn test_from_string_rejects_unknown() {
        assert_eq!(Permission::from_string("teams:read"), None);
        assert_eq!(Permission::from_string("feedback"), None);
        assert_eq!(Permission::from_string("feedback:delete"), None);
    }
}
