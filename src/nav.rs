//! Role-gated navigation and the protected-route guard.
//!
//! Both read the same [`PermissionSet`], so a route is visible in the menu
//! exactly when the guard lets it through.

use serde::Serialize;

use crate::auth::{Permission, PermissionSet};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub key: &'static str,
    pub title: &'static str,
    pub path: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

struct MenuEntry {
    key: &'static str,
    title: &'static str,
    path: &'static str,
    permission: Option<Permission>,
    children: &'static [MenuEntry],
}

const MENU: &[MenuEntry] = &[
    MenuEntry {
        key: "dashboard",
        title: "Tổng quan",
        path: "/me",
        permission: None,
        children: &[],
    },
    MenuEntry {
        key: "classes",
        title: "Lớp học",
        path: "/classes",
        permission: Some(Permission::ManageClasses),
        children: &[],
    },
    MenuEntry {
        key: "courses",
        title: "Khóa học",
        path: "/courses",
        permission: Some(Permission::ManageCourses),
        children: &[],
    },
    MenuEntry {
        key: "teachers",
        title: "Giáo viên",
        path: "/teachers",
        permission: Some(Permission::ManageTeachers),
        children: &[],
    },
    MenuEntry {
        key: "students",
        title: "Học viên",
        path: "/students",
        permission: Some(Permission::ManageStudents),
        children: &[],
    },
    MenuEntry {
        key: "schedules",
        title: "Lịch học",
        path: "/schedules",
        permission: Some(Permission::ViewSchedules),
        children: &[
            MenuEntry {
                key: "slot-grid",
                title: "Lịch rảnh giáo viên",
                path: "/teachers/slot-grid",
                permission: Some(Permission::ViewSchedules),
                children: &[],
            },
            MenuEntry {
                key: "makeup",
                title: "Lịch học bù",
                path: "/schedules/makeup/groups",
                permission: Some(Permission::ViewSchedules),
                children: &[],
            },
        ],
    },
    MenuEntry {
        key: "wallets",
        title: "Ví & kế toán",
        path: "/wallets/summary",
        permission: Some(Permission::ViewWallets),
        children: &[],
    },
    MenuEntry {
        key: "reports",
        title: "Báo cáo",
        path: "/exports/students",
        permission: Some(Permission::ExportData),
        children: &[
            MenuEntry {
                key: "export-students",
                title: "Danh sách học viên",
                path: "/exports/students",
                permission: Some(Permission::ExportData),
                children: &[],
            },
            MenuEntry {
                key: "export-teachers",
                title: "Danh sách giáo viên",
                path: "/exports/teachers",
                permission: Some(Permission::ExportData),
                children: &[],
            },
            MenuEntry {
                key: "export-classes",
                title: "Danh sách lớp học",
                path: "/exports/classes",
                permission: Some(Permission::ExportData),
                children: &[],
            },
            MenuEntry {
                key: "export-schedules",
                title: "Lịch học",
                path: "/exports/schedules",
                permission: Some(Permission::ExportData),
                children: &[],
            },
            MenuEntry {
                key: "export-wallets",
                title: "Sổ ví",
                path: "/exports/wallets",
                permission: Some(Permission::ExportData),
                children: &[],
            },
        ],
    },
];

fn visible(entries: &[MenuEntry], permissions: &PermissionSet) -> Vec<MenuItem> {
    entries
        .iter()
        .filter(|e| e.permission.is_none_or(|p| permissions.allows(p)))
        .map(|e| MenuItem {
            key: e.key,
            title: e.title,
            path: e.path,
            children: visible(e.children, permissions),
        })
        .collect()
}

pub fn menu_for(permissions: &PermissionSet) -> Vec<MenuItem> {
    visible(MENU, permissions)
}

/// Permission a gateway path requires, by longest matching prefix.
pub fn required_permission(path: &str) -> Option<Permission> {
    const ROUTES: &[(&str, Permission)] = &[
        ("/teachers/slot-grid", Permission::ViewSchedules),
        ("/schedules/makeup/groups", Permission::ViewSchedules),
        ("/schedules/auto", Permission::ManageSchedules),
        ("/schedules/makeup", Permission::ManageSchedules),
        ("/schedules", Permission::ViewSchedules),
        ("/classes", Permission::ManageClasses),
        ("/courses", Permission::ManageCourses),
        ("/teachers", Permission::ManageTeachers),
        ("/students", Permission::ManageStudents),
        ("/wallets", Permission::ViewWallets),
        ("/exports", Permission::ExportData),
    ];

    ROUTES
        .iter()
        .filter(|(prefix, _)| {
            path == *prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, permission)| *permission)
}

/// Rejects a request for `path` the permission set does not cover.
pub fn guard(permissions: &PermissionSet, path: &str) -> Result<(), AppError> {
    match required_permission(path) {
        Some(permission) => permissions.require(permission),
        None => Ok(()),
    }
}
