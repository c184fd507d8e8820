/// Role ids as stored in `users.role_id`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
    /// Internal integrations (e.g. the HR sync job)
    System = 4,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            4 => Some(Role::System),
            _ => None,
        }
    }

    /// May define shifts, assign them and act on anyone's attendance
    pub fn manages_schedule(self) -> bool {
        matches!(self, Role::Admin | Role::Hr | Role::System)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_ids_are_rejected() {
        assert_eq!(Role::from_id(2), Some(Role::Hr));
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(5), None);
    }

    #[test]
    fn only_staff_roles_manage_the_schedule() {
        assert!(Role::Admin.manages_schedule());
        assert!(Role::Hr.manages_schedule());
        assert!(Role::System.manages_schedule());
        assert!(!Role::Employee.manages_schedule());
    }
}
