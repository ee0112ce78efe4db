//! Page templates for dashboard views.

use crate::state::{AdminSession, AppState};
use crate::tables::listing_color;
use crate::templates::{
    action_button, badge, bar_chart, card, data_table, empty_state, html_escape, layout,
    page_header, public_layout, search_bar, stats_card,
};
use migrent_core::{
    AdminListing, AdminPayment, AdminStats, AdminUser, FunnelStage, GeoCount, ListingStatus,
    MonthlyRevenue, PageViews, PaymentStatus, Report, ReportStatus, RevenueShare, RevenueSummary,
    Role,
};
use migrent_table::ViewState;

fn admin_layout(state: &AppState, session: &AdminSession, title: &str, active: &str, content: &str) -> String {
    layout(
        title,
        &state.dashboard().base_path,
        session.display_name(),
        active,
        content,
    )
}

fn csv_button(href: &str) -> String {
    format!(
        r##"<a href="{href}" class="inline-flex items-center gap-2 px-4 py-2 bg-white border border-gray-300 rounded-lg text-sm font-medium text-gray-700 hover:bg-gray-50">
            <i class="fas fa-download"></i> Export CSV
        </a>"##
    )
}

// =============================================================================
// Public Pages
// =============================================================================

pub fn home_page(state: &AppState) -> String {
    let content = format!(
        r##"<div class="bg-white rounded-2xl shadow-2xl p-8 text-center">
            <h1 class="text-2xl font-bold text-gray-900">MigRent</h1>
            <p class="text-gray-500 mt-2">Find a room. List a room. Move in.</p>
            <div class="mt-6 flex justify-center gap-3">
                <a href="{signin}" class="px-4 py-2 bg-primary-600 hover:bg-primary-700 text-white rounded-lg">Sign in</a>
                <a href="{overview}" class="px-4 py-2 bg-gray-100 hover:bg-gray-200 text-gray-700 rounded-lg">Admin</a>
            </div>
        </div>"##,
        signin = state.dashboard().signin_path,
        overview = state.admin_path("overview"),
    );
    public_layout("Home", &content)
}

pub fn signin_page(state: &AppState, redirect: Option<&str>, error: Option<&str>) -> String {
    let error_html = match error {
        Some("invalid") => error_banner("Invalid email or password. Please try again."),
        Some(_) => error_banner("Sign-in is unavailable right now. Please try again later."),
        None => String::new(),
    };

    let redirect_input = redirect
        .map(|r| format!(r#"<input type="hidden" name="redirect" value="{}">"#, html_escape(r)))
        .unwrap_or_default();

    let content = format!(
        r##"<div class="bg-white rounded-2xl shadow-2xl p-8">
            <div class="text-center mb-6">
                <h2 class="text-xl font-semibold text-gray-900">Welcome back</h2>
                <p class="text-gray-500 mt-1">Sign in to access the admin dashboard</p>
            </div>

            {error_html}

            <form method="POST" action="{action}" class="space-y-5">
                {redirect_input}
                <div>
                    <label for="email" class="block text-sm font-medium text-gray-700 mb-2">Email</label>
                    <input type="email" id="email" name="email" required autofocus
                        class="block w-full px-4 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-primary-500"
                        placeholder="you@example.com">
                </div>
                <div>
                    <label for="password" class="block text-sm font-medium text-gray-700 mb-2">Password</label>
                    <input type="password" id="password" name="password" required
                        class="block w-full px-4 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-primary-500">
                </div>
                <button type="submit"
                    class="w-full py-3 px-4 bg-primary-600 hover:bg-primary-700 text-white font-medium rounded-lg">
                    Sign In
                </button>
            </form>
        </div>"##,
        action = state.dashboard().signin_path,
    );
    public_layout("Sign in", &content)
}

fn error_banner(message: &str) -> String {
    format!(
        r##"<div class="mb-6 p-4 bg-red-50 border border-red-200 rounded-lg">
            <div class="flex items-center gap-3">
                <i class="fas fa-exclamation-circle text-red-500"></i>
                <span class="text-red-700">{message}</span>
            </div>
        </div>"##
    )
}

/// Rendered when the gate denies without navigating.
pub fn unauthorized_page(state: &AppState) -> String {
    let content = format!(
        r##"<div class="bg-white rounded-2xl shadow-2xl p-8 text-center">
            <i class="fas fa-lock text-4xl text-gray-400 mb-4"></i>
            <h1 class="text-2xl font-bold text-gray-900">Unauthorized</h1>
            <p class="text-gray-500 mt-2">You do not have access to the admin dashboard.</p>
            <a href="{home}" class="mt-6 inline-block px-4 py-2 bg-primary-600 hover:bg-primary-700 text-white rounded-lg">Go home</a>
        </div>"##,
        home = state.dashboard().home_path,
    );
    public_layout("Unauthorized", &content)
}

// =============================================================================
// Overview Page
// =============================================================================

pub fn overview_page(state: &AppState, session: &AdminSession, stats: &AdminStats) -> String {
    let cards = format!(
        r##"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6 mb-8">
            {users}
            {listings}
            {revenue}
            {monthly}
        </div>"##,
        users = stats_card("Total Users", &stats.total_users.to_string(), "", "users", "blue"),
        listings = stats_card(
            "Active Listings",
            &stats.active_listings.to_string(),
            &format!("{} pending review", stats.pending_listings),
            "house",
            "green"
        ),
        revenue = stats_card("Revenue", &format!("${}", stats.total_revenue), "", "dollar-sign", "rose"),
        monthly = stats_card(
            "Revenue/Mo",
            &format!("${}", stats.monthly_revenue),
            "",
            "calendar",
            "purple"
        ),
    );

    let links: String = [
        ("users", "Manage Users", "View, suspend and change roles", "users", "blue"),
        ("revenue", "Revenue Report", "Payments and monthly trends", "dollar-sign", "green"),
        ("listings", "Review Listings", "Approve or reject new rooms", "house", "yellow"),
        ("analytics", "Analytics", "Signups, traffic and suburbs", "chart-line", "purple"),
    ]
    .iter()
    .map(|(page, title, description, icon, color)| {
        format!(
            r##"<a href="{href}" class="flex items-center gap-4 p-4 bg-gray-50 rounded-lg hover:bg-gray-100 transition-colors">
                <div class="w-10 h-10 rounded-full bg-{color}-100 flex items-center justify-center">
                    <i class="fas fa-{icon} text-{color}-500"></i>
                </div>
                <div>
                    <h4 class="font-medium text-gray-900">{title}</h4>
                    <p class="text-sm text-gray-500">{description}</p>
                </div>
            </a>"##,
            href = state.admin_path(page),
        )
    })
    .collect();

    let quick_links = card(
        "Quick Links",
        &format!(r#"<div class="grid grid-cols-1 md:grid-cols-2 gap-4">{links}</div>"#),
    );

    let content = format!(
        "{header}{cards}{quick_links}",
        header = page_header(
            "Dashboard Overview",
            &format!("Welcome back, {}", html_escape(session.display_name())),
            ""
        ),
    );
    admin_layout(state, session, "Overview", "overview", &content)
}

// =============================================================================
// Users Page
// =============================================================================

pub fn users_page(
    state: &AppState,
    session: &AdminSession,
    users: &[AdminUser],
    view_state: &ViewState,
) -> String {
    let table = &state.tables().users;
    let view = table.compute_view(users, view_state, Some("email"), Some("role"));
    let filters: Vec<(String, String)> = Role::ALL
        .iter()
        .map(|r| (r.as_str().to_string(), r.plural_label().to_string()))
        .collect();

    let content = format!(
        "{header}{search}{table}",
        header = page_header(
            "Users",
            &format!("{} accounts", users.len()),
            &csv_button(&state.admin_path("users.csv")),
        ),
        search = search_bar(view_state, "Search by email...", &filters),
        table = data_table(table, &view, view_state),
    );
    admin_layout(state, session, "Users", "users", &content)
}

// =============================================================================
// Listings Page
// =============================================================================

pub fn listings_page(
    state: &AppState,
    session: &AdminSession,
    listings: &[AdminListing],
    view_state: &ViewState,
) -> String {
    let table = &state.tables().listings;
    let view = table.compute_view(listings, view_state, Some("title"), Some("status"));

    let count = |status: ListingStatus| listings.iter().filter(|l| l.status == status).count();
    let summary: String = ListingStatus::ALL
        .iter()
        .map(|status| {
            let label = match status {
                ListingStatus::Active => "Active",
                ListingStatus::Pending => "Pending Review",
                ListingStatus::Rejected => "Rejected",
            };
            stats_card(label, &count(*status).to_string(), "", "house", listing_color(*status))
        })
        .collect();

    let filters: Vec<(String, String)> = vec![
        ("active".to_string(), "Active".to_string()),
        ("pending".to_string(), "Pending".to_string()),
        ("rejected".to_string(), "Rejected".to_string()),
    ];

    let content = format!(
        r##"{header}<div class="grid grid-cols-1 md:grid-cols-3 gap-6 mb-8">{summary}</div>{search}{table}"##,
        header = page_header(
            "Listings",
            "Review and moderate room listings",
            &csv_button(&state.admin_path("listings.csv")),
        ),
        search = search_bar(view_state, "Search by title...", &filters),
        table = data_table(table, &view, view_state),
    );
    admin_layout(state, session, "Listings", "listings", &content)
}

// =============================================================================
// Revenue Page
// =============================================================================

pub fn revenue_page(
    state: &AppState,
    session: &AdminSession,
    payments: &[AdminPayment],
    monthly: &[MonthlyRevenue],
    by_role: &[RevenueShare],
    view_state: &ViewState,
) -> String {
    let summary = RevenueSummary::from_payments(payments);
    let cards = format!(
        r##"<div class="grid grid-cols-1 md:grid-cols-3 gap-6 mb-8">{total}{completed}{average}</div>"##,
        total = stats_card("Total Revenue", &format!("${}", summary.total), "", "dollar-sign", "green"),
        completed = stats_card(
            "Completed Payments",
            &summary.completed_count.to_string(),
            &format!("of {} total", payments.len()),
            "check",
            "blue"
        ),
        average = stats_card("Avg. Payment", &format!("${}", summary.average), "", "calculator", "purple"),
    );

    let monthly_rows: Vec<(String, u64)> =
        monthly.iter().map(|m| (m.month.clone(), m.revenue)).collect();
    let role_rows: Vec<(String, u64)> = by_role.iter().map(|r| (r.name.clone(), r.value)).collect();
    let charts = format!(
        r##"<div class="grid grid-cols-1 lg:grid-cols-2 gap-6 mb-8">{monthly}{roles}</div>"##,
        monthly = card("Monthly Revenue", &bar_chart(&monthly_rows, "rose")),
        roles = card("Revenue by Role", &bar_chart(&role_rows, "blue")),
    );

    let table = &state.tables().payments;
    let view = table.compute_view(payments, view_state, Some("email"), Some("status"));
    let filters: Vec<(String, String)> = PaymentStatus::ALL
        .iter()
        .map(|s| {
            let label = match s {
                PaymentStatus::Completed => "Completed",
                PaymentStatus::Pending => "Pending",
                PaymentStatus::Refunded => "Refunded",
            };
            (s.as_str().to_string(), label.to_string())
        })
        .collect();

    let content = format!(
        "{header}{cards}{charts}{search}{table}",
        header = page_header(
            "Revenue",
            "Payments and revenue trends",
            &csv_button(&state.admin_path("revenue.csv")),
        ),
        search = search_bar(view_state, "Search by email...", &filters),
        table = data_table(table, &view, view_state),
    );
    admin_layout(state, session, "Revenue", "revenue", &content)
}

// =============================================================================
// Analytics Page
// =============================================================================

pub fn analytics_page(
    state: &AppState,
    session: &AdminSession,
    funnel: &[FunnelStage],
    page_views: &[PageViews],
    geo: &[GeoCount],
) -> String {
    let funnel_rows: String = funnel
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let conversion = i
                .checked_sub(1)
                .and_then(|prev| funnel.get(prev))
                .and_then(|prev| stage.conversion_from(prev))
                .map(|pct| format!("{}%", pct))
                .unwrap_or_default();
            format!(
                r##"<tr><td class="py-2 text-gray-700">{name}</td><td class="py-2 text-right font-medium">{count}</td><td class="py-2 text-right text-gray-500">{conversion}</td></tr>"##,
                name = html_escape(&stage.stage),
                count = stage.count,
            )
        })
        .collect();
    let funnel_html = if funnel.is_empty() {
        empty_state("filter", "No funnel data", "Nothing recorded yet.")
    } else {
        format!(r#"<table class="w-full text-sm">{funnel_rows}</table>"#)
    };

    let views: Vec<(String, u64)> = page_views.iter().map(|p| (p.date.clone(), p.views)).collect();
    let suburbs: Vec<(String, u64)> = geo.iter().map(|g| (g.suburb.clone(), g.users)).collect();

    let content = format!(
        r##"{header}<div class="grid grid-cols-1 lg:grid-cols-2 gap-6">{funnel}{views}{suburbs}</div>"##,
        header = page_header("Analytics", "Signups, traffic and where users are", ""),
        funnel = card("Signup Funnel", &funnel_html),
        views = card("Page Views", &bar_chart(&views, "blue")),
        suburbs = card("Users by Suburb", &bar_chart(&suburbs, "green")),
    );
    admin_layout(state, session, "Analytics", "analytics", &content)
}

// =============================================================================
// Reports Page
// =============================================================================

fn report_color(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "yellow",
        ReportStatus::Reviewed => "blue",
        ReportStatus::Actioned => "green",
        ReportStatus::Dismissed => "gray",
    }
}

pub fn reports_page(
    state: &AppState,
    session: &AdminSession,
    reports: &[Report],
    filter: ReportStatus,
) -> String {
    let reports_path = state.admin_path("reports");
    let tabs: String = ReportStatus::ALL
        .iter()
        .map(|status| {
            let class = if *status == filter {
                "bg-primary-600 text-white"
            } else {
                "bg-white text-gray-700 border border-gray-300 hover:bg-gray-50"
            };
            format!(
                r##"<a href="{reports_path}?status={status}" class="px-4 py-2 rounded-lg text-sm font-medium capitalize {class}">{status}</a>"##
            )
        })
        .collect();

    let list = if reports.is_empty() {
        empty_state("flag", "All clear", &format!("No {} reports found.", filter))
    } else {
        reports
            .iter()
            .map(|report| report_card(state, report))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let content = format!(
        r##"{header}<div class="flex gap-2 mb-6">{tabs}</div><div class="space-y-4">{list}</div>"##,
        header = page_header("Reports", "Content reported by users", ""),
    );
    admin_layout(state, session, "Reports", "reports", &content)
}

fn report_card(state: &AppState, report: &Report) -> String {
    let actions = if report.status == ReportStatus::Pending {
        let action = state.admin_path(&format!(
            "reports/{}/status",
            urlencoding::encode(&report.id)
        ));
        [
            (ReportStatus::Reviewed, "Mark Reviewed", "default"),
            (ReportStatus::Actioned, "Take Action", "success"),
            (ReportStatus::Dismissed, "Dismiss", "danger"),
        ]
        .iter()
        .map(|(status, label, variant)| {
            action_button(&format!("{}?status={}", action, status), label, variant)
        })
        .collect::<String>()
    } else {
        String::new()
    };

    let details = if report.details.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p class="mt-2 text-sm text-gray-600">{}</p>"#,
            html_escape(&report.details)
        )
    };

    let reviewed = report
        .reviewed_by
        .as_deref()
        .map(|by| format!(" · reviewed by {}", html_escape(by)))
        .unwrap_or_default();

    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
            <div class="flex items-start justify-between">
                <div>
                    <div class="flex items-center gap-2">
                        {status}
                        {kind}
                        <span class="text-sm text-gray-500">{item}</span>
                    </div>
                    <h4 class="mt-2 font-medium text-gray-900">{reason}</h4>
                    {details}
                    <p class="mt-2 text-xs text-gray-400">Reported by {reporter} on {date}{reviewed}</p>
                </div>
                <div class="flex gap-1">{actions}</div>
            </div>
        </div>"##,
        status = badge(report.status.as_str(), report_color(report.status)),
        kind = badge(report.item_type.as_str(), "gray"),
        item = html_escape(&report.listing_id),
        reason = html_escape(&report.reason),
        reporter = html_escape(&report.reporter_id),
        date = report.created_at.format("%Y-%m-%d %H:%M"),
    )
}
