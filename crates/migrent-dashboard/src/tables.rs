//! Table definitions for the admin pages and their CSV exports.
//!
//! Display tables carry badges and action buttons; export tables carry raw
//! values only and are what the `.csv` routes serialize.

use crate::templates::{action_button, badge, html_escape};
use migrent_core::{AdminListing, AdminPayment, AdminUser, ListingStatus, PaymentStatus, Role};
use migrent_table::{Cell, Column, Table, TableError};

pub const USERS_CSV: &str = "migrent-users.csv";
pub const LISTINGS_CSV: &str = "migrent-listings.csv";
pub const PAYMENTS_CSV: &str = "migrent-payments.csv";

/// Every table the dashboard renders, built once at startup.
#[derive(Debug)]
pub struct Tables {
    pub users: Table<AdminUser>,
    pub user_export: Table<AdminUser>,
    pub listings: Table<AdminListing>,
    pub listing_export: Table<AdminListing>,
    pub payments: Table<AdminPayment>,
    pub payment_export: Table<AdminPayment>,
}

impl Tables {
    /// Build all tables; action links are rooted at `base_path`.
    pub fn new(base_path: &str) -> Result<Self, TableError> {
        let base = base_path.trim_end_matches('/').to_string();
        Ok(Self {
            users: users_table(&base)?,
            user_export: user_export_table()?,
            listings: listings_table(&base)?,
            listing_export: listing_export_table()?,
            payments: payments_table()?,
            payment_export: payment_export_table()?,
        })
    }
}

fn action_path(base: &str, kind: &str, id: &str, action: &str) -> String {
    format!("{}/{}/{}/{}", base, kind, urlencoding::encode(id), action)
}

fn role_color(role: Role) -> &'static str {
    match role {
        Role::Superadmin => "purple",
        Role::Owner => "blue",
        Role::Seeker => "gray",
    }
}

pub(crate) fn listing_color(status: ListingStatus) -> &'static str {
    match status {
        ListingStatus::Active => "green",
        ListingStatus::Pending => "yellow",
        ListingStatus::Rejected => "red",
    }
}

fn payment_color(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Completed => "green",
        PaymentStatus::Pending => "yellow",
        PaymentStatus::Refunded => "red",
    }
}

fn role_form(base: &str, user: &AdminUser) -> String {
    let options: String = Role::ALL
        .iter()
        .map(|role| {
            let selected = if *role == user.role { " selected" } else { "" };
            format!(r#"<option value="{role}"{selected}>{role}</option>"#)
        })
        .collect();
    format!(
        r##"<form method="POST" action="{action}" class="inline-flex gap-1"><select name="role" class="text-xs border border-gray-300 rounded">{options}</select><button type="submit" class="px-2 py-1 rounded text-xs font-medium text-gray-600 hover:bg-gray-100">Role</button></form>"##,
        action = html_escape(&action_path(base, "users", &user.id, "role")),
    )
}

fn users_table(base: &str) -> Result<Table<AdminUser>, TableError> {
    let base = base.to_string();
    Table::builder("users")
        .identity(|u: &AdminUser| u.id.clone())
        .column(Column::new("email", "Email", |u: &AdminUser| Some(u.email.clone())))
        .column(
            Column::new("role", "Role", |u: &AdminUser| Some(u.role.as_str().to_string()))
                .render(|u: &AdminUser| Cell::markup(badge(u.role.as_str(), role_color(u.role)))),
        )
        .column(Column::new("signup_date", "Signed up", |u: &AdminUser| {
            Some(u.signup_date.to_string())
        }))
        .column(Column::new("last_active", "Last active", |u: &AdminUser| {
            Some(u.last_active.to_string())
        }))
        .column(
            Column::new("status", "Status", |u: &AdminUser| Some(u.status_label().to_string()))
                .render(|u: &AdminUser| {
                    let color = if u.suspended { "red" } else { "green" };
                    Cell::markup(badge(u.status_label(), color))
                }),
        )
        .column(
            Column::new("verified", "Verified", |u: &AdminUser| {
                Some(u.verified_label().to_string())
            })
            .sortable(false),
        )
        .column(
            Column::rendered("actions", "Actions", move |u: &AdminUser| {
                let suspend = if u.suspended { "Unsuspend" } else { "Suspend" };
                Cell::markup(format!(
                    "{}{}{}",
                    role_form(&base, u),
                    action_button(&action_path(&base, "users", &u.id, "suspend"), suspend, "default"),
                    action_button(&action_path(&base, "users", &u.id, "delete"), "Delete", "danger"),
                ))
            })
            .sortable(false),
        )
        .build()
}

fn user_export_table() -> Result<Table<AdminUser>, TableError> {
    Table::builder("users-export")
        .identity(|u: &AdminUser| u.id.clone())
        .column(Column::new("email", "Email", |u: &AdminUser| Some(u.email.clone())))
        .column(Column::new("role", "Role", |u: &AdminUser| Some(u.role.as_str().to_string())))
        .column(Column::new("signup_date", "Signup Date", |u: &AdminUser| {
            Some(u.signup_date.to_string())
        }))
        .column(Column::new("last_active", "Last Active", |u: &AdminUser| {
            Some(u.last_active.to_string())
        }))
        .column(Column::new("verified", "Verified", |u: &AdminUser| Some(u.verified.to_string())))
        .column(Column::new("suspended", "Suspended", |u: &AdminUser| {
            Some(u.suspended.to_string())
        }))
        .build()
}

fn listings_table(base: &str) -> Result<Table<AdminListing>, TableError> {
    let base = base.to_string();
    Table::builder("listings")
        .identity(|l: &AdminListing| l.id.clone())
        .column(Column::new("title", "Title", |l: &AdminListing| Some(l.title.clone())))
        .column(Column::new("owner_email", "Owner", |l: &AdminListing| {
            Some(l.owner_email.clone())
        }))
        .column(Column::new("suburb", "Suburb", |l: &AdminListing| Some(l.suburb.clone())))
        .column(
            Column::new("status", "Status", |l: &AdminListing| Some(l.status.as_str().to_string()))
                .render(|l: &AdminListing| {
                    Cell::markup(badge(l.status.as_str(), listing_color(l.status)))
                }),
        )
        .column(Column::new("applicants", "Applicants", |l: &AdminListing| {
            Some(l.applicants.to_string())
        }))
        .column(
            Column::new("weekly_price", "Price", |l: &AdminListing| {
                Some(l.weekly_price.to_string())
            })
            .render(|l: &AdminListing| Cell::text(format!("${}/wk", l.weekly_price))),
        )
        .column(Column::new("created_at", "Created", |l: &AdminListing| {
            Some(l.created_at.to_string())
        }))
        .column(
            Column::rendered("actions", "Actions", move |l: &AdminListing| {
                let mut html = String::new();
                if l.status == ListingStatus::Pending {
                    html.push_str(&action_button(
                        &action_path(&base, "listings", &l.id, "approve"),
                        "Approve",
                        "success",
                    ));
                }
                if l.status != ListingStatus::Rejected {
                    html.push_str(&action_button(
                        &action_path(&base, "listings", &l.id, "reject"),
                        "Reject",
                        "default",
                    ));
                }
                html.push_str(&action_button(
                    &action_path(&base, "listings", &l.id, "delete"),
                    "Delete",
                    "danger",
                ));
                Cell::markup(html)
            })
            .sortable(false),
        )
        .build()
}

fn listing_export_table() -> Result<Table<AdminListing>, TableError> {
    Table::builder("listings-export")
        .identity(|l: &AdminListing| l.id.clone())
        .column(Column::new("title", "Title", |l: &AdminListing| Some(l.title.clone())))
        .column(Column::new("owner_email", "Owner", |l: &AdminListing| {
            Some(l.owner_email.clone())
        }))
        .column(Column::new("suburb", "Suburb", |l: &AdminListing| Some(l.suburb.clone())))
        .column(Column::new("status", "Status", |l: &AdminListing| {
            Some(l.status.as_str().to_string())
        }))
        .column(Column::new("applicants", "Applicants", |l: &AdminListing| {
            Some(l.applicants.to_string())
        }))
        .column(Column::new("weekly_price", "Weekly Price", |l: &AdminListing| {
            Some(l.weekly_price.to_string())
        }))
        .column(Column::new("created_at", "Created", |l: &AdminListing| {
            Some(l.created_at.to_string())
        }))
        .build()
}

fn payments_table() -> Result<Table<AdminPayment>, TableError> {
    Table::builder("payments")
        .identity(|p: &AdminPayment| p.id.clone())
        .column(Column::new("email", "Email", |p: &AdminPayment| Some(p.email.clone())))
        .column(
            Column::new("amount", "Amount", |p: &AdminPayment| Some(p.amount.to_string()))
                .render(|p: &AdminPayment| Cell::text(format!("${}", p.amount))),
        )
        .column(Column::new("type", "Type", |p: &AdminPayment| Some(p.kind.label())))
        .column(Column::new("date", "Date", |p: &AdminPayment| Some(p.date.to_string())))
        .column(
            Column::new("status", "Status", |p: &AdminPayment| {
                Some(p.status.as_str().to_string())
            })
            .render(|p: &AdminPayment| {
                Cell::markup(badge(p.status.as_str(), payment_color(p.status)))
            }),
        )
        .build()
}

fn payment_export_table() -> Result<Table<AdminPayment>, TableError> {
    Table::builder("payments-export")
        .identity(|p: &AdminPayment| p.id.clone())
        .column(Column::new("email", "Email", |p: &AdminPayment| Some(p.email.clone())))
        .column(Column::new("amount", "Amount", |p: &AdminPayment| Some(p.amount.to_string())))
        .column(Column::new("type", "Type", |p: &AdminPayment| {
            Some(p.kind.as_str().to_string())
        }))
        .column(Column::new("date", "Date", |p: &AdminPayment| Some(p.date.to_string())))
        .column(Column::new("status", "Status", |p: &AdminPayment| {
            Some(p.status.as_str().to_string())
        }))
        .build()
}
