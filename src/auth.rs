use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

/// Roles a caller may hold. The session layer in front of this service
/// resolves the cookie and forwards identity in trusted headers; the
/// service itself never authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Role {
    SuperAdmin = 1,
    EnrollmentAdmin = 1 << 1,
    Instructor = 1 << 2,
    Student = 1 << 3,
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super-admin" => Ok(Role::SuperAdmin),
            "enrollment-admin" => Ok(Role::EnrollmentAdmin),
            "instructor" => Ok(Role::Instructor),
            "student" => Ok(Role::Student),
            _ => Err(()),
        }
    }
}

/// Bitset of roles held by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    pub fn empty() -> Self {
        RoleSet(0)
    }

    pub fn of(roles: &[Role]) -> Self {
        let mut set = RoleSet(0);
        for role in roles {
            set.insert(*role);
        }
        set
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role as u8;
    }

    pub fn contains(self, role: Role) -> bool {
        self.0 & role as u8 != 0
    }
}

/// Operations gated by authorization. Every handler goes through
/// `AuthUser::authorize` with one of these instead of testing role
/// flags inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create/edit/list courses in the admin area.
    ManageCourses,
    /// Delete courses outright.
    DeleteCourses,
    /// List, publish or reject pending drafts.
    ReviewDrafts,
    /// Approve or reject enrollment requests.
    DecideEnrollments,
    /// Author quizzes, exercises, questions, modules and classes.
    AuthorContent,
    /// Create and list user accounts.
    ManageUsers,
    /// Request enrollment and use the student area.
    Study,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub roles: RoleSet,
}

impl AuthUser {
    pub fn is_super_admin(&self) -> bool {
        self.roles.contains(Role::SuperAdmin)
    }

    pub fn is_instructor(&self) -> bool {
        self.roles.contains(Role::Instructor)
    }

    pub fn authorize(&self, action: Action) -> Result<(), AppError> {
        let allowed = match action {
            Action::ManageCourses | Action::AuthorContent => {
                self.roles.contains(Role::SuperAdmin) || self.roles.contains(Role::Instructor)
            }
            Action::DeleteCourses | Action::ReviewDrafts | Action::ManageUsers => {
                self.roles.contains(Role::SuperAdmin)
            }
            Action::DecideEnrollments => {
                self.roles.contains(Role::SuperAdmin)
                    || self.roles.contains(Role::EnrollmentAdmin)
            }
            Action::Study => self.roles.contains(Role::Student),
        };

        if allowed {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Insufficient role for this operation".to_string(),
            ))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .ok_or(AppError::Unauthorized)?
            .to_string();

        let mut roles = RoleSet::empty();
        if let Some(raw) = parts.headers.get("x-user-roles").and_then(|v| v.to_str().ok()) {
            for name in raw.split(',') {
                if let Ok(role) = name.trim().parse::<Role>() {
                    roles.insert(role);
                }
            }
        }

        Ok(AuthUser { id, roles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_set_membership() {
        let set = RoleSet::of(&[Role::Instructor, Role::Student]);
        assert!(set.contains(Role::Instructor));
        assert!(set.contains(Role::Student));
        assert!(!set.contains(Role::SuperAdmin));
    }

    #[test]
    fn super_admin_can_review_drafts() {
        let user = AuthUser {
            id: "u1".to_string(),
            roles: RoleSet::of(&[Role::SuperAdmin]),
        };
        assert!(user.authorize(Action::ReviewDrafts).is_ok());
        assert!(user.authorize(Action::DecideEnrollments).is_ok());
    }

    #[test]
    fn student_cannot_manage_courses() {
        let user = AuthUser {
            id: "u1".to_string(),
            roles: RoleSet::of(&[Role::Student]),
        };
        assert!(user.authorize(Action::ManageCourses).is_err());
        assert!(user.authorize(Action::DecideEnrollments).is_err());
    }

    #[test]
    fn only_students_can_study() {
        let student = AuthUser {
            id: "u1".to_string(),
            roles: RoleSet::of(&[Role::Student]),
        };
        assert!(student.authorize(Action::Study).is_ok());

        let instructor = AuthUser {
            id: "u2".to_string(),
            roles: RoleSet::of(&[Role::Instructor]),
        };
        assert!(instructor.authorize(Action::Study).is_err());
    }

    #[test]
    fn deleting_courses_is_super_admin_only() {
        let instructor = AuthUser {
            id: "u1".to_string(),
            roles: RoleSet::of(&[Role::Instructor]),
        };
        assert!(instructor.authorize(Action::DeleteCourses).is_err());

        let admin = AuthUser {
            id: "u2".to_string(),
            roles: RoleSet::of(&[Role::SuperAdmin]),
        };
        assert!(admin.authorize(Action::DeleteCourses).is_ok());
    }

    #[test]
    fn enrollment_admin_decides_but_does_not_review() {
        let user = AuthUser {
            id: "u1".to_string(),
            roles: RoleSet::of(&[Role::EnrollmentAdmin]),
        };
        assert!(user.authorize(Action::DecideEnrollments).is_ok());
        assert!(user.authorize(Action::ReviewDrafts).is_err());
    }
}
