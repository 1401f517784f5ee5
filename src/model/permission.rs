use std::collections::BTreeMap;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::model::role::Role;

/// Every page the dashboard can render. Unknown page identifiers cannot
/// exist on this side of the API.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Page {
    Dashboard,
    Employees,
    Departments,
    LeaveRequests,
    Holidays,
    Rooms,
    Bookings,
    Availability,
    Settings,
}

#[derive(Debug, Copy, Clone, Serialize, ToSchema)]
pub struct PagePermission {
    pub view: bool,
    pub manage: bool,
}

const fn perm(view: bool, manage: bool) -> PagePermission {
    PagePermission { view, manage }
}

impl Role {
    /// Role/page permission matrix. `manage` covers create/update/delete
    /// and workflow actions; `view` covers reads. Exhaustive on both axes.
    pub fn permission(self, page: Page) -> PagePermission {
        match self {
            // Dev and Owner see and manage everything.
            Role::Dev | Role::Owner => perm(true, true),
            Role::Rh => match page {
                Page::Dashboard => perm(true, false),
                Page::Employees => perm(true, true),
                Page::Departments => perm(true, true),
                Page::LeaveRequests => perm(true, true),
                Page::Holidays => perm(true, true),
                Page::Rooms => perm(true, true),
                Page::Bookings => perm(true, true),
                Page::Availability => perm(true, true),
                Page::Settings => perm(false, false),
            },
            Role::Manager => match page {
                Page::Dashboard => perm(true, false),
                Page::Employees => perm(true, false),
                Page::Departments => perm(true, false),
                Page::LeaveRequests => perm(true, true),
                Page::Holidays => perm(true, false),
                Page::Rooms => perm(true, false),
                Page::Bookings => perm(true, true),
                Page::Availability => perm(true, true),
                Page::Settings => perm(false, false),
            },
            Role::Employee => match page {
                Page::Dashboard => perm(true, false),
                Page::Employees => perm(false, false),
                Page::Departments => perm(false, false),
                Page::LeaveRequests => perm(true, false),
                Page::Holidays => perm(true, false),
                Page::Rooms => perm(true, false),
                Page::Bookings => perm(true, true),
                Page::Availability => perm(true, true),
                Page::Settings => perm(false, false),
            },
        }
    }

    /// Full page map for one role, keyed by the page identifier the UI
    /// uses. Fetched once per role change by the client.
    pub fn page_map(self) -> BTreeMap<String, PagePermission> {
        Page::iter()
            .map(|page| (page.to_string(), self.permission(page)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_page_is_restricted() {
        assert!(!Role::Employee.permission(Page::Settings).view);
        assert!(!Role::Manager.permission(Page::Settings).view);
        assert!(!Role::Rh.permission(Page::Settings).view);
        assert!(Role::Owner.permission(Page::Settings).manage);
        assert!(Role::Dev.permission(Page::Settings).manage);
    }

    #[test]
    fn rh_manages_employees_managers_do_not() {
        assert!(Role::Rh.permission(Page::Employees).manage);
        assert!(!Role::Manager.permission(Page::Employees).manage);
        assert!(!Role::Employee.permission(Page::Employees).view);
    }

    #[test]
    fn everyone_can_book_rooms() {
        for role in [Role::Dev, Role::Owner, Role::Rh, Role::Manager, Role::Employee] {
            assert!(role.permission(Page::Bookings).manage, "{role} cannot book");
        }
    }

    #[test]
    fn page_map_covers_every_page() {
        let map = Role::Employee.page_map();
        assert_eq!(map.len(), Page::iter().count());
        assert!(map.contains_key("leave-requests"));
        assert!(map.contains_key("dashboard"));
    }
}
