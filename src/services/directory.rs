use serde::Serialize;

use crate::clients::{self, BackendClient};
use crate::core::security::Session;
use crate::models::records::User;
use crate::models::types::Role;
use crate::schemas::user::{AdminUserCreate, AdminUserUpdate};
use crate::services::ServiceError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct SystemAnalytics {
    pub(crate) students: usize,
    pub(crate) advisors: usize,
    pub(crate) admins: usize,
    pub(crate) subjects: usize,
    pub(crate) assignments: usize,
}

/// Role filter of the user table: `all` (or nothing) keeps everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoleFilter {
    All,
    Only(Role),
}

impl RoleFilter {
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, ServiceError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::All),
            Some(raw) if raw.eq_ignore_ascii_case("all") => Ok(Self::All),
            Some(raw) => Role::parse(raw)
                .map(Self::Only)
                .ok_or_else(|| ServiceError::Invalid(format!("Unknown role filter: {raw}"))),
        }
    }

    fn keeps(self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::Only(role) => user.role == role,
        }
    }
}

fn require_admin(session: &Session) -> Result<(), ServiceError> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden("Admin access required"))
    }
}

pub(crate) fn count_roles(users: &[User]) -> (usize, usize, usize) {
    users.iter().fold((0, 0, 0), |(students, advisors, admins), user| match user.role {
        Role::Student => (students + 1, advisors, admins),
        Role::Advisor => (students, advisors + 1, admins),
        Role::Admin => (students, advisors, admins + 1),
    })
}

/// Case-insensitive match on first name, last name, email or the full name.
pub(crate) fn filter_users(users: Vec<User>, role: RoleFilter, search: Option<&str>) -> Vec<User> {
    let needle = search.map(|term| term.trim().to_lowercase()).filter(|term| !term.is_empty());

    users
        .into_iter()
        .filter(|user| role.keeps(user))
        .filter(|user| match needle.as_deref() {
            None => true,
            Some(needle) => [
                user.first_name.to_lowercase(),
                user.last_name.to_lowercase(),
                user.email.to_lowercase(),
                user.full_name().to_lowercase(),
            ]
            .iter()
            .any(|field| field.contains(needle)),
        })
        .collect()
}

pub(crate) async fn analytics(
    backend: &BackendClient,
    session: &Session,
) -> Result<SystemAnalytics, ServiceError> {
    require_admin(session)?;

    let (users, subjects, assignments) = tokio::try_join!(
        clients::users::list_all(backend, session),
        clients::subjects::list_all(backend, session),
        clients::assignments::list_all(backend, session),
    )?;

    let (students, advisors, admins) = count_roles(&users);
    Ok(SystemAnalytics {
        students,
        advisors,
        admins,
        subjects: subjects.len(),
        assignments: assignments.len(),
    })
}

pub(crate) async fn list_users(
    backend: &BackendClient,
    session: &Session,
    role: Option<&str>,
    search: Option<&str>,
) -> Result<Vec<User>, ServiceError> {
    require_admin(session)?;
    let role = RoleFilter::parse(role)?;
    let users = clients::users::list_all(backend, session).await?;
    Ok(filter_users(users, role, search))
}

/// Students visible to an advisor or admin.
pub(crate) async fn students(
    backend: &BackendClient,
    session: &Session,
    search: Option<&str>,
) -> Result<Vec<User>, ServiceError> {
    if !(session.is_advisor() || session.is_admin()) {
        return Err(ServiceError::Forbidden("Advisor access required"));
    }
    let users = clients::users::list_all(backend, session).await?;
    Ok(filter_users(users, RoleFilter::Only(Role::Student), search))
}

pub(crate) async fn create_user(
    backend: &BackendClient,
    session: &Session,
    user: &AdminUserCreate,
) -> Result<User, ServiceError> {
    require_admin(session)?;
    let created = clients::users::create(backend, session, user).await?;
    tracing::info!(user_id = %created.id, role = created.role.as_str(), "User created");
    Ok(created)
}

pub(crate) async fn update_user(
    backend: &BackendClient,
    session: &Session,
    user_id: &str,
    update: &AdminUserUpdate,
) -> Result<User, ServiceError> {
    require_admin(session)?;
    Ok(clients::users::update(backend, session, user_id, update).await?)
}

pub(crate) async fn delete_user(
    backend: &BackendClient,
    session: &Session,
    user_id: &str,
) -> Result<(), ServiceError> {
    require_admin(session)?;
    if user_id == session.user_id {
        return Err(ServiceError::Invalid("Admins cannot delete their own account".to_string()));
    }
    clients::users::delete(backend, session, user_id).await?;
    tracing::info!(user_id, "User deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> Vec<User> {
        serde_json::from_value(json!([
            {"_id": "u1", "firstName": "Ada", "lastName": "Lovelace", "email": "ada@uni.edu", "role": "student"},
            {"_id": "u2", "firstName": "Alan", "lastName": "Turing", "email": "alan@uni.edu", "role": "advisor"},
            {"_id": "u3", "firstName": "Grace", "lastName": "Hopper", "email": "grace@navy.mil", "role": "admin"},
            {"_id": "u4", "firstName": "Adam", "lastName": "Smith", "email": "adam@uni.edu"}
        ]))
        .expect("users")
    }

    fn ids(users: &[User]) -> Vec<&str> {
        users.iter().map(|user| user.id.as_str()).collect()
    }

    #[test]
    fn roles_are_counted_with_student_default() {
        assert_eq!(count_roles(&users()), (2, 1, 1));
    }

    #[test]
    fn search_covers_names_email_and_full_name() {
        assert_eq!(ids(&filter_users(users(), RoleFilter::All, Some("ADA"))), ["u1"]);
        assert_eq!(ids(&filter_users(users(), RoleFilter::All, Some("navy"))), ["u3"]);
        assert_eq!(ids(&filter_users(users(), RoleFilter::All, Some("alan turing"))), ["u2"]);
        assert_eq!(filter_users(users(), RoleFilter::All, Some("  ")).len(), 4);
    }

    #[test]
    fn role_filter_combines_with_search() {
        let filter = RoleFilter::parse(Some("student")).expect("filter");
        assert_eq!(ids(&filter_users(users(), filter, Some("ad"))), ["u1", "u4"]);
        assert_eq!(RoleFilter::parse(Some("all")).expect("all"), RoleFilter::All);
        assert!(RoleFilter::parse(Some("janitor")).is_err());
    }
}
