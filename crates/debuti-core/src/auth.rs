//! # Auth Model
//!
//! Roles, permissions, the mock login and the admin screen's rules.
//!
//! ## Role → Permission Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Permission        │ User │ Manager │ Admin │ SuperAdmin                │
//! │  ──────────────────┼──────┼─────────┼───────┼───────────                │
//! │  ViewDashboard     │      │    ✓    │   ✓   │     ✓                     │
//! │  ViewAnalytics     │      │    ✓    │   ✓   │     ✓                     │
//! │  ManageProducts    │      │    ✓    │   ✓   │     ✓                     │
//! │  ManageOrders      │      │    ✓    │   ✓   │     ✓                     │
//! │  ManageUsers       │      │         │   ✓   │     ✓                     │
//! │  ExportData        │      │         │   ✓   │     ✓                     │
//! │  ManageAdmins      │      │         │       │     ✓                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Login is mocked: any non-empty password is accepted for a well-formed
//! email, and the role comes from a [`RoleDirectory`] lookup.
//!
//! ## Admin Route Guard
//! ```text
//!   current user ──► Admin or SuperAdmin? ──no──► RedirectToLogin
//!                            │ yes
//!                            ▼
//!                    holds ViewDashboard? ──no──► RedirectToLogin
//!                            │ yes
//!                            ▼
//!                         Granted
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::AuthError;
use crate::store::{Mutation, ObservableStore, Unsubscribe};
use crate::validation::validate_credentials;

/// Shown when a non-admin is sent back to the login page.
pub const ADMIN_REQUIRED_NOTICE: &str = "You don't have admin privileges.";

// =============================================================================
// Role & Permission
// =============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    User,
    Manager,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::User, Role::Manager, Role::Admin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Admin-tier roles may enter the admin area (given ViewDashboard).
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Permission {
    ViewDashboard,
    ViewAnalytics,
    ManageProducts,
    ManageOrders,
    ManageUsers,
    ManageAdmins,
    ExportData,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::ViewDashboard,
        Permission::ViewAnalytics,
        Permission::ManageProducts,
        Permission::ManageOrders,
        Permission::ManageUsers,
        Permission::ManageAdmins,
        Permission::ExportData,
    ];
}

const MANAGER_PERMISSIONS: [Permission; 4] = [
    Permission::ViewDashboard,
    Permission::ViewAnalytics,
    Permission::ManageProducts,
    Permission::ManageOrders,
];

const ADMIN_EXTRA_PERMISSIONS: [Permission; 2] = [Permission::ManageUsers, Permission::ExportData];

/// The permission set granted to `role`.
pub fn permissions_for(role: Role) -> BTreeSet<Permission> {
    match role {
        Role::User => BTreeSet::new(),
        Role::Manager => MANAGER_PERMISSIONS.into_iter().collect(),
        Role::Admin => MANAGER_PERMISSIONS
            .into_iter()
            .chain(ADMIN_EXTRA_PERMISSIONS)
            .collect(),
        Role::SuperAdmin => Permission::ALL.into_iter().collect(),
    }
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

// =============================================================================
// User
// =============================================================================

/// The signed-in user. This is what the session slot persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    #[ts(as = "String")]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub logged_in_at: DateTime<Utc>,
}

impl User {
    /// A fresh user for `email`. The display name is the part before `@`.
    pub fn new(email: &str, role: Role) -> Self {
        let email = email.trim();
        let name = email.split('@').next().unwrap_or(email).to_string();

        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name,
            role,
            permissions: permissions_for(role).into_iter().collect(),
            logged_in_at: Utc::now(),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

// =============================================================================
// Role Directory
// =============================================================================

/// Which emails sign in with elevated roles. Everyone else is a `User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleDirectory {
    pub admin_emails: Vec<String>,
    pub super_admin_emails: Vec<String>,
}

impl RoleDirectory {
    /// Case-insensitive lookup. Super-admin wins if an email is in both lists.
    pub fn role_for(&self, email: &str) -> Role {
        let email = email.trim();
        let listed = |emails: &[String]| emails.iter().any(|e| e.trim().eq_ignore_ascii_case(email));

        if listed(&self.super_admin_emails) {
            Role::SuperAdmin
        } else if listed(&self.admin_emails) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl Default for RoleDirectory {
    fn default() -> Self {
        Self {
            admin_emails: vec!["admin@debutify.com".to_string()],
            super_admin_emails: vec!["owner@debutify.com".to_string()],
        }
    }
}

// =============================================================================
// Admin Guard
// =============================================================================

/// Result of the admin route guard. A redirect is navigation, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum AdminAccess {
    Granted,
    RedirectToLogin { notice: String },
}

impl AdminAccess {
    pub fn is_granted(&self) -> bool {
        matches!(self, AdminAccess::Granted)
    }
}

pub fn authorize_admin(user: Option<&User>) -> AdminAccess {
    match user {
        Some(user) if user.is_admin() && user.has_permission(Permission::ViewDashboard) => {
            AdminAccess::Granted
        }
        _ => AdminAccess::RedirectToLogin {
            notice: ADMIN_REQUIRED_NOTICE.to_string(),
        },
    }
}

// =============================================================================
// User-Management Policy
// =============================================================================

fn deny(reason: impl Into<String>) -> AuthError {
    AuthError::PermissionDenied(reason.into())
}

fn require_manage_users(acting: Role) -> Result<(), AuthError> {
    if has_permission(acting, Permission::ManageUsers) {
        Ok(())
    } else {
        Err(deny(format!("{acting} cannot manage users")))
    }
}

/// Checks that `acting` may act on an account currently holding `role`.
fn check_touch(acting: Role, role: Role) -> Result<(), AuthError> {
    if role == Role::SuperAdmin && acting != Role::SuperAdmin {
        return Err(deny("only a super admin can modify a super admin"));
    }
    if role == Role::Admin && !has_permission(acting, Permission::ManageAdmins) {
        return Err(deny(format!("{acting} cannot manage admins")));
    }
    Ok(())
}

/// Whether `acting` sees an account with role `target` in the user list.
/// Super-admin accounts are hidden from everyone but super admins, and
/// admin accounts from anyone without `ManageAdmins`.
pub fn can_view_user(acting: Role, target: Role) -> bool {
    has_permission(acting, Permission::ManageUsers)
        && (target != Role::SuperAdmin || acting == Role::SuperAdmin)
        && (target != Role::Admin || has_permission(acting, Permission::ManageAdmins))
}

/// May `acting` move an account from `current` to `new_role`?
pub fn check_role_change(acting: Role, current: Role, new_role: Role) -> Result<(), AuthError> {
    require_manage_users(acting)?;
    check_touch(acting, current)?;
    check_touch(acting, new_role)
}

/// May `acting` create an account with `role`?
pub fn check_create(acting: Role, role: Role) -> Result<(), AuthError> {
    require_manage_users(acting)?;
    check_touch(acting, role)
}

/// May `acting` delete an account holding `target`?
pub fn check_delete(acting: Role, target: Role) -> Result<(), AuthError> {
    require_manage_users(acting)?;
    check_touch(acting, target)
}

// =============================================================================
// Auth Store
// =============================================================================

/// Observable holder of the signed-in user (zero or one entry).
#[derive(Debug, Clone)]
pub struct AuthStore {
    store: ObservableStore<User>,
    directory: RoleDirectory,
}

impl AuthStore {
    pub fn new(directory: RoleDirectory) -> Self {
        Self {
            store: ObservableStore::new("auth"),
            directory,
        }
    }

    pub fn directory(&self) -> &RoleDirectory {
        &self.directory
    }

    /// Observers receive the signed-in user, or `None` after logout.
    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(Option<&User>) + Send + Sync + 'static,
    {
        self.store.subscribe(move |users| callback(users.first()))
    }

    /// Mock login. Replaces any current user.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self.authenticate(email, password)?;
        self.sign_in(user.clone());
        Ok(user)
    }

    /// Checks credentials and mints the user a login would sign in,
    /// without touching the store.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        validate_credentials(email, password)?;
        Ok(User::new(email, self.directory.role_for(email)))
    }

    /// Makes `user` the signed-in user. Replaces any current user.
    pub fn sign_in(&self, user: User) {
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        self.set(user);
    }

    /// Signs out. Returns `false` if nobody was signed in.
    pub fn logout(&self) -> bool {
        let signed_out = self.store.mutate(|users| {
            if users.is_empty() {
                Mutation::Skip(false)
            } else {
                users.clear();
                Mutation::Commit(true)
            }
        });
        if signed_out {
            tracing::info!("User logged out");
        }
        signed_out
    }

    /// Reinstates a persisted user.
    ///
    /// Permissions are re-derived from the role, so a stored permission list
    /// can never grant more than the role allows.
    pub fn restore(&self, mut user: User) {
        user.permissions = permissions_for(user.role).into_iter().collect();
        tracing::info!(user_id = %user.id, role = %user.role, "Session restored");
        self.set(user);
    }

    fn set(&self, user: User) {
        self.store.mutate(|users| {
            if users.first() == Some(&user) {
                return Mutation::Skip(());
            }
            users.clear();
            users.push(user);
            Mutation::Commit(())
        });
    }

    pub fn current_user(&self) -> Option<User> {
        self.store.read(|users| users.first().cloned())
    }

    pub fn is_logged_in(&self) -> bool {
        !self.store.is_empty()
    }

    pub fn is_admin(&self) -> bool {
        self.store
            .read(|users| users.first().is_some_and(User::is_admin))
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.store
            .read(|users| users.first().is_some_and(|user| user.has_permission(permission)))
    }

    pub fn authorize_admin(&self) -> AdminAccess {
        self.store.read(|users| authorize_admin(users.first()))
    }

    /// The acting role for user-management checks.
    pub fn acting_role(&self) -> Result<Role, AuthError> {
        self.store
            .read(|users| users.first().map(|user| user.role))
            .ok_or(AuthError::NotSignedIn)
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new(RoleDirectory::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
