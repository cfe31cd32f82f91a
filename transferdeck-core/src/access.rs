//! Folder-level access control.
//!
//! Every file operation that reaches the admin API (list, upload, download,
//! delete, move, create-folder) is gated through [`can_access`] before any
//! storage call is made. The browser runs the same checks to hide folders a
//! user cannot touch, but only the server-side verdict is authoritative.

use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};
use transferdeck_common::ConsoleUser;

/// Descriptive label shown next to a folder in the UI. Not an access grant:
/// [`can_access`] derives allow/deny from the path alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Enum)]
#[serde(rename_all = "snake_case")]
#[oai(rename_all = "snake_case")]
pub enum PermissionClass {
    Public,
    Private,
    AdminOnly,
    UserSpecific,
}

/// A quick-access folder surfaced in the dashboard sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Object)]
pub struct FolderDescriptor {
    /// Slash-separated path relative to the bucket root, no leading slash.
    pub path: String,
    pub display_name: String,
    pub icon: String,
    pub permission_class: PermissionClass,
}

impl FolderDescriptor {
    fn new(
        path: impl Into<String>,
        display_name: &str,
        icon: &str,
        permission_class: PermissionClass,
    ) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
            icon: icon.into(),
            permission_class,
        }
    }
}

/// Quick-access folders for a user. Presentation only; grants nothing.
///
/// Admins see the six well-known top-level folders. Everyone else sees their
/// own subtree plus `shared`.
pub fn accessible_folders(user: Option<&ConsoleUser>) -> Vec<FolderDescriptor> {
    use PermissionClass::*;
    let Some(user) = user else {
        return vec![];
    };

    if user.role.is_admin() {
        return vec![
            FolderDescriptor::new("admin", "Admin", "shield", AdminOnly),
            FolderDescriptor::new("shared", "Shared", "folder-shared", Public),
            FolderDescriptor::new("users", "Users", "users", AdminOnly),
            FolderDescriptor::new("system", "System", "settings", AdminOnly),
            FolderDescriptor::new("backups", "Backups", "archive", AdminOnly),
            FolderDescriptor::new("logs", "Logs", "file-text", AdminOnly),
        ];
    }

    vec![
        FolderDescriptor::new(format!("users/{}", user.username), "Home", "home", UserSpecific),
        FolderDescriptor::new(
            format!("users/{}/personal", user.username),
            "Personal",
            "folder",
            Private,
        ),
        FolderDescriptor::new(
            format!("users/{}/projects", user.username),
            "Projects",
            "briefcase",
            Private,
        ),
        FolderDescriptor::new("shared", "Shared", "folder-shared", Public),
    ]
}

/// Whether `user` may operate on `folder_path`. First match wins:
///
/// 1. no user: deny
/// 2. admin: allow any path, including the bucket root
/// 3. empty path (bucket root): deny
/// 4. `shared` and anything under it: allow
/// 5. `users/<username>` and anything under it: allow for that user
/// 6. deny
///
/// The rule-5 match is segment-aware: `users/alice-archive` does not match
/// user `alice`. Total over arbitrary strings, never panics.
pub fn can_access(user: Option<&ConsoleUser>, folder_path: &str) -> bool {
    let Some(user) = user else {
        return false;
    };
    if user.role.is_admin() {
        return true;
    }
    if folder_path.is_empty() {
        return false;
    }
    if folder_path == "shared" || folder_path.starts_with("shared/") {
        return true;
    }
    if let Some(owner_and_rest) = folder_path.strip_prefix("users/") {
        return match owner_and_rest.strip_prefix(user.username.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('/'),
            None => false,
        };
    }
    false
}

/// The folder that governs access to an object key: everything up to the
/// last slash. A top-level key maps to the bucket root (empty path), which
/// only admins may touch.
pub fn governing_folder(object_key: &str) -> &str {
    let trimmed = object_key.strip_suffix('/').unwrap_or(object_key);
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[..idx],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use transferdeck_common::Role;

    use super::*;

    fn admin() -> ConsoleUser {
        ConsoleUser::new("root", Role::Admin)
    }

    fn alice() -> ConsoleUser {
        ConsoleUser::new("alice", Role::User)
    }

    #[test]
    fn admin_can_access_everything() {
        let user = admin();
        for path in ["", "shared", "users/bob", "system/keys", "whatever"] {
            assert!(can_access(Some(&user), path), "admin denied on {path:?}");
        }
    }

    #[test]
    fn absent_user_is_always_denied() {
        for path in ["", "shared", "users/alice", "admin"] {
            assert!(!can_access(None, path));
        }
    }

    #[test]
    fn root_is_admin_only() {
        assert!(!can_access(Some(&alice()), ""));
        assert!(can_access(Some(&admin()), ""));
    }

    #[test]
    fn shared_subtree_is_open_to_authenticated_users() {
        let user = alice();
        assert!(can_access(Some(&user), "shared"));
        assert!(can_access(Some(&user), "shared/reports"));
        let moderator = ConsoleUser::new("mod", Role::Moderator);
        assert!(can_access(Some(&moderator), "shared/reports"));
    }

    #[test]
    fn user_subtree_is_owner_only() {
        let user = alice();
        assert!(can_access(Some(&user), "users/alice"));
        assert!(can_access(Some(&user), "users/alice/projects/x"));
        assert!(!can_access(Some(&user), "users/bob"));
        assert!(!can_access(Some(&user), "users/bob/shared"));
    }

    #[test]
    fn denies_sibling_folder_with_username_prefix() {
        // Segment-aware matching: a sibling folder whose name merely starts
        // with the username must not leak.
        let user = alice();
        assert!(!can_access(Some(&user), "users/alice-archive"));
        assert!(!can_access(Some(&user), "users/alice2"));
        assert!(!can_access(Some(&user), "users/alice2/files"));
        let al = ConsoleUser::new("al", Role::User);
        assert!(!can_access(Some(&al), "users/alice"));
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let user = alice();
        assert!(can_access(Some(&user), "users/alice/"));
        assert!(can_access(Some(&user), "shared/"));
        assert!(!can_access(Some(&user), "users/alice2/"));
    }

    #[test]
    fn malformed_paths_are_denied() {
        let user = alice();
        for path in ["/", "//", "users", "Users/alice", " shared", "users//alice"] {
            assert!(!can_access(Some(&user), path), "allowed {path:?}");
        }
    }

    #[test]
    fn is_idempotent() {
        let user = alice();
        for path in ["shared/x", "users/alice", "users/bob", ""] {
            assert_eq!(
                can_access(Some(&user), path),
                can_access(Some(&user), path)
            );
        }
        assert_eq!(accessible_folders(Some(&user)), accessible_folders(Some(&user)));
    }

    #[test]
    fn admin_catalog_has_six_well_known_folders() {
        let folders = accessible_folders(Some(&admin()));
        let paths: Vec<&str> = folders.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["admin", "shared", "users", "system", "backups", "logs"]
        );
        for folder in &folders {
            let expected = if folder.path == "shared" {
                PermissionClass::Public
            } else {
                PermissionClass::AdminOnly
            };
            assert_eq!(folder.permission_class, expected, "{}", folder.path);
        }
    }

    #[test]
    fn user_catalog_is_derived_from_username() {
        let bob = ConsoleUser::new("bob", Role::User);
        let folders = accessible_folders(Some(&bob));
        let paths: Vec<&str> = folders.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["users/bob", "users/bob/personal", "users/bob/projects", "shared"]
        );
        assert_eq!(
            folders.iter().map(|f| f.permission_class).collect::<Vec<_>>(),
            vec![
                PermissionClass::UserSpecific,
                PermissionClass::Private,
                PermissionClass::Private,
                PermissionClass::Public,
            ]
        );
    }

    #[test]
    fn unauthenticated_catalog_is_empty() {
        assert!(accessible_folders(None).is_empty());
    }

    #[test]
    fn empty_username_yields_degenerate_but_wellformed_paths() {
        let anon = ConsoleUser::new("", Role::User);
        let folders = accessible_folders(Some(&anon));
        assert_eq!(folders[0].path, "users/");
    }

    #[test]
    fn governing_folder_strips_the_last_segment() {
        assert_eq!(governing_folder("users/alice/file.txt"), "users/alice");
        assert_eq!(governing_folder("shared/reports/q3.csv"), "shared/reports");
        assert_eq!(governing_folder("top-level.txt"), "");
        assert_eq!(governing_folder("shared/"), "");
        assert_eq!(governing_folder("users/alice/projects/"), "users/alice");
    }
}
