//! Role-based permissions.
//!
//! Every mutating route names the [`Action`] it performs; the requester's
//! [`Role`] decides whether it is allowed. Tenant isolation (same company) is
//! checked separately by the caller.

use crate::model::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Update or delete a company, manage its roster and member roles.
    ManageCompany,
    CreateProject,
    DeleteProject,
    /// Update project fields and project membership.
    EditProject,
    /// Create and delete tasks.
    ManageTasks,
    UpdateTask,
    UploadBlueprint,
    DeleteBlueprint,
    /// Create/update reports and add or edit their issues.
    FileReport,
    /// Delete reports or remove issues from them.
    DeleteReport,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageCompany => "manage company",
            Self::CreateProject => "create projects",
            Self::DeleteProject => "delete projects",
            Self::EditProject => "edit projects",
            Self::ManageTasks => "manage tasks",
            Self::UpdateTask => "update tasks",
            Self::UploadBlueprint => "upload blueprints",
            Self::DeleteBlueprint => "delete blueprints",
            Self::FileReport => "file reports",
            Self::DeleteReport => "delete reports",
        }
    }
}

impl Role {
    pub fn can(&self, action: Action) -> bool {
        use Action::*;
        match self {
            Role::Owner => true,
            Role::FieldManager => !matches!(action, ManageCompany | CreateProject | DeleteProject),
            Role::Engineer => matches!(action, UpdateTask | UploadBlueprint | FileReport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVERY_ACTION: &[Action] = &[
        Action::ManageCompany,
        Action::CreateProject,
        Action::DeleteProject,
        Action::EditProject,
        Action::ManageTasks,
        Action::UpdateTask,
        Action::UploadBlueprint,
        Action::DeleteBlueprint,
        Action::FileReport,
        Action::DeleteReport,
    ];

    #[test]
    fn test_owner_can_do_everything() {
        assert!(EVERY_ACTION.iter().all(|a| Role::Owner.can(*a)));
    }

    #[test]
    fn test_field_manager() {
        let fm = Role::FieldManager;
        assert!(!fm.can(Action::ManageCompany));
        assert!(!fm.can(Action::CreateProject));
        assert!(!fm.can(Action::DeleteProject));
        assert!(fm.can(Action::EditProject));
        assert!(fm.can(Action::ManageTasks));
        assert!(fm.can(Action::DeleteBlueprint));
        assert!(fm.can(Action::DeleteReport));
    }

    #[test]
    fn test_engineer() {
        let allowed: Vec<_> = EVERY_ACTION
            .iter()
            .copied()
            .filter(|a| Role::Engineer.can(*a))
            .collect();
        assert_eq!(
            allowed,
            vec![Action::UpdateTask, Action::UploadBlueprint, Action::FileReport]
        );
    }
}
