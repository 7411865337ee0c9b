//! Account entity definitions

use serde::{Deserialize, Serialize};

/// Account entity representing a member of the organization.
///
/// The password credential never appears here; it stays inside the repository
/// and the password utilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub public_id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Record for inserting a new account. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct CreateAccountRecord {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
}

/// Partial profile update. A field left as `None` keeps the stored value;
/// blanking a field requires sending an explicit empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub avatar: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.phone.is_none()
            && self.position.is_none()
            && self.avatar.is_none()
    }
}

/// Account role enum.
///
/// Capabilities are per-action sets checked by the authorization policy; the
/// roles carry no total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Trainer,
    Member,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Trainer => "trainer",
            Role::Member => "member",
            Role::Guest => "guest",
        }
    }

    /// Strict parse for caller-supplied role strings; unknown values are
    /// rejected rather than defaulted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "trainer" => Some(Role::Trainer),
            "member" => Some(Role::Member),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Elevated roles may manage groups, events, and documents.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin | Role::Trainer)
    }
}

impl From<&str> for Role {
    // Storage round-trip only; stored values are always one of the four.
    fn from(s: &str) -> Self {
        Role::parse(s).unwrap_or(Role::Member)
    }
}

impl ToString for Role {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}
