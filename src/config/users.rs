use serde::Deserialize;
use std::fs;
use std::path::Path;
use log::info;
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::models::chat::{ User, UserId };

const DEFAULT_AVATAR: &str = "https://placeimg.com/140/140/any";

static DEFAULT_USERS: Lazy<Vec<User>> = Lazy::new(|| {
    vec![
        User { id: 1, name: Some("Tizzi".to_string()), avatar: Some(DEFAULT_AVATAR.to_string()) },
        User { id: 2, name: Some("Baku".to_string()), avatar: Some(DEFAULT_AVATAR.to_string()) }
    ]
});

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User directory IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("User directory JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("User directory '{0}' lists no users")]
    Empty(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DirectoryFile {
    Wrapped {
        users: Vec<User>,
    },
    Bare(Vec<User>),
}

/// Known chat participants, used to resolve the bare `{_id}` user references
/// carried by messages.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self { users: DEFAULT_USERS.clone() }
    }
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Accepts either a bare JSON array of users or `{ "users": [...] }`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let json_str = fs::read_to_string(path)?;
        let users = match serde_json::from_str::<DirectoryFile>(&json_str)? {
            DirectoryFile::Wrapped { users } => users,
            DirectoryFile::Bare(users) => users,
        };
        if users.is_empty() {
            return Err(DirectoryError::Empty(path.display().to_string()));
        }
        info!("Loaded {} users from {}", users.len(), path.display());
        Ok(Self { users })
    }

    pub fn load(path: Option<&str>) -> Result<Self, DirectoryError> {
        match path {
            Some(p) if !p.trim().is_empty() => Self::load_from_file(p),
            _ => Ok(Self::default()),
        }
    }

    pub fn find(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Unknown ids resolve to `None`; the reference is dropped rather than kept bare.
    pub fn resolve(&self, user: Option<&User>) -> Option<User> {
        user.and_then(|u| self.find(u.id)).cloned()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_directory_has_two_participants() {
        let dir = UserDirectory::default();
        assert_eq!(dir.users().len(), 2);
        assert_eq!(dir.find(1).and_then(|u| u.name.as_deref()), Some("Tizzi"));
        assert_eq!(dir.find(2).and_then(|u| u.name.as_deref()), Some("Baku"));
    }

    #[test]
    fn resolve_fills_in_known_users() {
        let dir = UserDirectory::default();
        let resolved = dir.resolve(Some(&User::reference(2))).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("Baku"));
        assert_eq!(resolved.avatar.as_deref(), Some(DEFAULT_AVATAR));
    }

    #[test]
    fn resolve_unknown_or_missing_is_none() {
        let dir = UserDirectory::default();
        assert!(dir.resolve(Some(&User::reference(99))).is_none());
        assert!(dir.resolve(None).is_none());
    }

    #[test]
    fn loads_bare_and_wrapped_files() {
        let mut bare = tempfile::NamedTempFile::new().unwrap();
        write!(bare, r#"[{{"_id": 5, "name": "Eve"}}]"#).unwrap();
        let dir = UserDirectory::load_from_file(bare.path()).unwrap();
        assert_eq!(dir.find(5).and_then(|u| u.name.as_deref()), Some("Eve"));

        let mut wrapped = tempfile::NamedTempFile::new().unwrap();
        write!(wrapped, r#"{{"users": [{{"_id": 6, "name": "Mo", "avatar": "x"}}]}}"#).unwrap();
        let dir = UserDirectory::load_from_file(wrapped.path()).unwrap();
        assert_eq!(dir.find(6).and_then(|u| u.avatar.as_deref()), Some("x"));
    }

    #[test]
    fn empty_file_is_rejected() {
        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        assert!(matches!(
            UserDirectory::load_from_file(empty.path()),
            Err(DirectoryError::Empty(_))
        ));
    }

    #[test]
    fn unreadable_files_keep_their_cause() {
        use std::error::Error as _;

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "not json").unwrap();
        let err = UserDirectory::load_from_file(broken.path()).unwrap_err();
        assert!(matches!(err, DirectoryError::JsonError(_)));
        assert!(err.to_string().starts_with("User directory JSON parsing error"));
        assert!(err.source().is_some());

        let err = UserDirectory::load_from_file("/nonexistent/pucci-users.json").unwrap_err();
        assert!(matches!(err, DirectoryError::IoError(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn blank_path_falls_back_to_default() {
        assert_eq!(UserDirectory::load(Some("  ")).unwrap(), UserDirectory::default());
        assert_eq!(UserDirectory::load(None).unwrap(), UserDirectory::default());
    }
}
