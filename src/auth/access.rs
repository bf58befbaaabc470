use super::{Principal, Role};

/// Authentication requirement attached to a route group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    ForbiddenRole,
    ForbiddenOwner,
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "unauthenticated",
            DenyReason::ForbiddenRole => "forbidden_role",
            DenyReason::ForbiddenOwner => "forbidden_owner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Evaluates one request against a route requirement and, optionally, the
/// owner of the resource it targets.
pub fn decide(principal: Option<&Principal>, required: Access, owner_id: Option<&str>) -> Decision {
    let needs_identity = required != Access::Public || owner_id.is_some();

    let principal = match principal {
        Some(p) => p,
        None if needs_identity => return Decision::Deny(DenyReason::Unauthenticated),
        None => return Decision::Allow,
    };

    if let Access::Role(role) = required {
        if !principal.role.satisfies(role) {
            return Decision::Deny(DenyReason::ForbiddenRole);
        }
    }

    if let Some(owner) = owner_id {
        if principal.subject_id != owner && !principal.is_admin() {
            return Decision::Deny(DenyReason::ForbiddenOwner);
        }
    }

    Decision::Allow
}

/// Owner filter bound into owner-scoped statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Any,
    Owner(String),
}

impl Scope {
    pub fn of(principal: &Principal) -> Self {
        if principal.is_admin() {
            Scope::Any
        } else {
            Scope::Owner(principal.subject_id.clone())
        }
    }

    /// Value for the `$n::text IS NULL OR owner = $n` bind.
    pub fn owner_param(&self) -> Option<&str> {
        match self {
            Scope::Any => None,
            Scope::Owner(id) => Some(id.as_str()),
        }
    }

    pub fn permits(&self, owner_id: &str) -> bool {
        match self {
            Scope::Any => true,
            Scope::Owner(id) => id == owner_id,
        }
    }
}
