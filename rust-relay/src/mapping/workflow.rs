//! Clerk event type → Novu workflow identifier table.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Workflow triggered for event types missing from the table.
pub const FALLBACK_WORKFLOW: &str = "test";

const WORKFLOW_TABLE: &[(&str, &str)] = &[
    // Organization
    ("organization.created", "org-created"),
    ("organization.updated", "org-updated"),
    ("organization.deleted", "org-deleted"),
    // Organization domain
    ("organizationDomain.created", "org-domain-created"),
    ("organizationDomain.updated", "org-domain-updated"),
    ("organizationDomain.deleted", "org-domain-deleted"),
    // Organization invitation
    ("organizationInvitation.accepted", "org-invite-accepted"),
    ("organizationInvitation.created", "org-invite-created"),
    ("organizationInvitation.revoked", "org-invite-revoked"),
    // Organization membership
    ("organizationMembership.created", "org-member-created"),
    ("organizationMembership.deleted", "org-member-deleted"),
    ("organizationMembership.updated", "org-member-updated"),
    // Permission
    ("permission.created", "permission-created"),
    ("permission.deleted", "permission-deleted"),
    ("permission.updated", "permission-updated"),
    // Role
    ("role.created", "role-created"),
    ("role.deleted", "role-deleted"),
    ("role.updated", "role-updated"),
    // Session
    ("session.created", "session-created"),
    ("session.ended", "session-ended"),
    ("session.pending", "session-pending"),
    ("session.removed", "session-removed"),
    ("session.revoked", "session-revoked"),
    // User
    ("user.created", "user-created"),
    ("user.updated", "user-updated"),
    ("user.deleted", "user-deleted"),
    // Waitlist
    ("waitlistEntry.created", "waitlist-created"),
    ("waitlistEntry.updated", "waitlist-updated"),
];

static WORKFLOWS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| WORKFLOW_TABLE.iter().copied().collect());

/// Resolve the Novu workflow for a Clerk event type.
///
/// Unknown event types resolve to [`FALLBACK_WORKFLOW`].
pub fn resolve_workflow(event_type: &str) -> &'static str {
    WORKFLOWS
        .get(event_type)
        .copied()
        .unwrap_or(FALLBACK_WORKFLOW)
}
