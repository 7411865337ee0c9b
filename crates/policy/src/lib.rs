//! Pure authorization decisions for the Clubhouse backend.
//!
//! Every mutating operation maps to exactly one [`Action`], and each action
//! has one declarative [`Rule`]: the role set that may perform it, whether
//! group membership grants it, and whether acting on one's own account grants
//! it. [`decide`] never touches storage; callers pass in already-loaded
//! facts through [`Context`]. Nothing is allowed by default.

use clubhouse_database::Role;
use thiserror::Error;

/// The closed set of policy-gated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateProfile,
    ChangeRole,
    CreateGroup,
    UpdateGroup,
    DeleteGroup,
    AddGroupMember,
    RemoveGroupMember,
    SendGroupMessage,
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
    CreateDocument,
    DeleteDocument,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::UpdateProfile => "update profile",
            Action::ChangeRole => "change role",
            Action::CreateGroup => "create group",
            Action::UpdateGroup => "update group",
            Action::DeleteGroup => "delete group",
            Action::AddGroupMember => "add group member",
            Action::RemoveGroupMember => "remove group member",
            Action::SendGroupMessage => "send group message",
            Action::CreateEvent => "create event",
            Action::UpdateEvent => "update event",
            Action::DeleteEvent => "delete event",
            Action::CreateDocument => "create document",
            Action::DeleteDocument => "delete document",
        }
    }
}

/// The authenticated account performing an operation.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }
}

/// Already-loaded facts about the target resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    /// Internal id of the account being acted on, for self-scoped rules.
    pub target_account: Option<i64>,
    /// Whether the actor is in the target group's member set.
    pub group_member: bool,
}

impl Context {
    /// No resource facts; the decision rests on roles alone.
    pub fn none() -> Self {
        Self::default()
    }

    /// Acting on a specific account.
    pub fn for_account(target_account: i64) -> Self {
        Self {
            target_account: Some(target_account),
            ..Self::default()
        }
    }

    /// Acting on a group the actor may or may not belong to.
    pub fn with_membership(group_member: bool) -> Self {
        Self {
            group_member,
            ..Self::default()
        }
    }
}

/// One row of the rule table.
struct Rule {
    allowed_roles: &'static [Role],
    membership_grants: bool,
    self_grants: bool,
}

const ELEVATED: &[Role] = &[Role::Admin, Role::Trainer];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const NOBODY: &[Role] = &[];

const fn rule_for(action: Action) -> Rule {
    match action {
        Action::UpdateProfile => Rule {
            allowed_roles: ADMIN_ONLY,
            membership_grants: false,
            self_grants: true,
        },
        Action::ChangeRole | Action::DeleteGroup => Rule {
            allowed_roles: ADMIN_ONLY,
            membership_grants: false,
            self_grants: false,
        },
        Action::CreateGroup
        | Action::UpdateGroup
        | Action::AddGroupMember
        | Action::RemoveGroupMember
        | Action::CreateEvent
        | Action::UpdateEvent
        | Action::DeleteEvent
        | Action::CreateDocument
        | Action::DeleteDocument => Rule {
            allowed_roles: ELEVATED,
            membership_grants: false,
            self_grants: false,
        },
        Action::SendGroupMessage => Rule {
            allowed_roles: NOBODY,
            membership_grants: true,
            self_grants: false,
        },
    }
}

/// A denied decision, with the action that was refused.
#[derive(Debug, Error)]
#[error("not allowed to {}", .action.as_str())]
pub struct Denied {
    pub action: Action,
}

/// Decide whether `actor` may perform `action` given the supplied facts.
///
/// Deterministic and side-effect-free. The admin role passes every check
/// unconditionally; everyone else needs their role, membership, or self
/// listed in the action's rule.
pub fn decide(actor: &Actor, action: Action, ctx: &Context) -> Result<(), Denied> {
    if actor.role.is_admin() {
        return Ok(());
    }

    let rule = rule_for(action);

    if rule.allowed_roles.contains(&actor.role) {
        return Ok(());
    }

    if rule.self_grants && ctx.target_account == Some(actor.id) {
        return Ok(());
    }

    if rule.membership_grants && ctx.group_member {
        return Ok(());
    }

    Err(Denied { action })
}
