//! Administration: user management and the audit trail. Every intent requires an admin.

pub mod audit;
pub mod users;

pub use audit::{load_audit_logs, AuditLogFilter, AuditLogPage, AuditRow, AUDIT_PAGE_SIZE};
pub use users::{
    activate_user, create_user, cycle_permission, deactivate_user, list_users, next_permission,
    NewUserForm, UserDirectory, UserStats,
};
