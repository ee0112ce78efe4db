//! HTML templates for the dashboard.
//!
//! Server-rendered markup styled with Tailwind CSS. Every interpolated value
//! that did not originate in this crate goes through [`html_escape`].

use migrent_table::{Cell, SortDirection, Table, View, ViewState};

/// Admin pages listed in the sidebar: (path segment, label, icon).
pub const ADMIN_PAGES: [(&str, &str, &str); 6] = [
    ("overview", "Overview", "gauge"),
    ("users", "Users", "users"),
    ("listings", "Listings", "house"),
    ("revenue", "Revenue", "dollar-sign"),
    ("analytics", "Analytics", "chart-line"),
    ("reports", "Reports", "flag"),
];

fn head(title: &str) -> String {
    format!(
        r##"<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - MigRent Admin</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script>
        tailwind.config = {{
            theme: {{
                extend: {{
                    colors: {{
                        primary: {{
                            50: '#fff1f2',
                            100: '#ffe4e6',
                            500: '#f43f5e',
                            600: '#e11d48',
                            700: '#be123c',
                        }}
                    }}
                }}
            }}
        }}
    </script>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
</head>"##,
        title = html_escape(title),
    )
}

/// Admin layout: top bar, sidebar and content.
pub fn layout(title: &str, base_path: &str, user: &str, active: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
{head}
<body class="bg-gray-50 min-h-screen">
    {nav}
    <div class="flex">
        {sidebar}
        <main class="flex-1 p-6 lg:p-8">
            <div class="max-w-7xl mx-auto">
                {content}
            </div>
        </main>
    </div>
</body>
</html>"##,
        head = head(title),
        nav = nav_template(user),
        sidebar = sidebar_template(base_path, active),
    )
}

/// Layout for pages outside the admin area.
pub fn public_layout(title: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
{head}
<body class="bg-gradient-to-br from-primary-500 to-primary-700 min-h-screen flex items-center justify-center p-4">
    <div class="w-full max-w-md">
        {content}
    </div>
</body>
</html>"##,
        head = head(title),
    )
}

fn nav_template(user: &str) -> String {
    format!(
        r##"<nav class="bg-primary-600 text-white px-4 py-3 sticky top-0 z-50 shadow-lg">
        <div class="flex items-center justify-between">
            <a href="/" class="flex items-center gap-2 font-bold text-lg">
                <i class="fas fa-key"></i> MigRent
                <span class="text-sm bg-primary-500 px-2 py-1 rounded">SuperAdmin</span>
            </a>
            <div class="flex items-center gap-4 text-sm">
                <span>{user}</span>
                <a href="/signout" class="p-2 hover:bg-primary-700 rounded-lg"><i class="fas fa-right-from-bracket"></i> Sign out</a>
            </div>
        </div>
    </nav>"##,
        user = html_escape(user),
    )
}

fn sidebar_template(base_path: &str, active: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let links: String = ADMIN_PAGES
        .iter()
        .map(|(segment, label, icon)| {
            let class = if *segment == active {
                "bg-primary-50 text-primary-600"
            } else {
                "text-gray-700 hover:bg-primary-50"
            };
            format!(
                r##"<a href="{base}/{segment}" class="flex items-center gap-3 px-4 py-3 rounded-lg transition-colors {class}">
                    <i class="fas fa-{icon} w-5"></i>
                    <span>{label}</span>
                </a>"##
            )
        })
        .collect();

    format!(
        r##"<aside class="w-64 bg-white border-r border-gray-200 min-h-[calc(100vh-56px)]">
            <nav class="p-4 space-y-2">
                {links}
            </nav>
        </aside>"##
    )
}

/// Card component.
pub fn card(title: &str, content: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 overflow-hidden">
            <div class="px-6 py-4 border-b border-gray-200">
                <h3 class="text-lg font-semibold text-gray-900">{title}</h3>
            </div>
            <div class="p-6">
                {content}
            </div>
        </div>"##
    )
}

/// Stats card component.
pub fn stats_card(title: &str, value: &str, note: &str, icon: &str, color: &str) -> String {
    let note_html = if note.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="text-xs text-gray-400 mt-1">{note}</p>"#)
    };
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
            <div class="flex items-center justify-between">
                <div>
                    <p class="text-sm text-gray-500">{title}</p>
                    <p class="text-2xl font-bold text-gray-900 mt-1">{value}</p>
                    {note_html}
                </div>
                <div class="w-12 h-12 rounded-full bg-{color}-100 flex items-center justify-center">
                    <i class="fas fa-{icon} text-{color}-500 text-xl"></i>
                </div>
            </div>
        </div>"##
    )
}

/// Badge component.
pub fn badge(text: &str, color: &str) -> String {
    format!(
        r##"<span class="inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium bg-{color}-100 text-{color}-800">{text}</span>"##,
        text = html_escape(text),
    )
}

/// A one-button form posting to `action`.
pub fn action_button(action: &str, label: &str, variant: &str) -> String {
    let class = match variant {
        "danger" => "text-red-600 hover:bg-red-50",
        "success" => "text-green-600 hover:bg-green-50",
        _ => "text-gray-600 hover:bg-gray-100",
    };
    format!(
        r##"<form method="POST" action="{action}" class="inline"><button type="submit" class="px-2 py-1 rounded text-xs font-medium {class}">{label}</button></form>"##,
        action = html_escape(action),
    )
}

/// Empty state component.
pub fn empty_state(icon: &str, title: &str, description: &str) -> String {
    format!(
        r##"<div class="text-center py-12">
            <i class="fas fa-{icon} text-4xl text-gray-400 mb-4"></i>
            <h3 class="text-lg font-medium text-gray-900">{title}</h3>
            <p class="mt-1 text-gray-500">{description}</p>
        </div>"##,
        title = html_escape(title),
        description = html_escape(description),
    )
}

/// Page heading with an optional right-hand action.
pub fn page_header(title: &str, subtitle: &str, action: &str) -> String {
    format!(
        r##"<div class="mb-8 flex items-start justify-between">
            <div>
                <h1 class="text-3xl font-bold text-gray-900">{title}</h1>
                <p class="mt-2 text-gray-600">{subtitle}</p>
            </div>
            {action}
        </div>"##
    )
}

/// Query string carrying `state`, starting with `?`.
pub fn view_query(state: &ViewState) -> String {
    match serde_urlencoded::to_string(state) {
        Ok(query) => format!("?{}", query),
        Err(e) => {
            tracing::warn!(error = %e, "Could not encode table view state");
            String::new()
        }
    }
}

/// Search box plus a filter dropdown, submitted as a GET form.
///
/// `filters` are (value, label) pairs; "all" is always offered first.
pub fn search_bar(state: &ViewState, placeholder: &str, filters: &[(String, String)]) -> String {
    let options: String = std::iter::once((migrent_table::ALL.to_string(), "All".to_string()))
        .chain(filters.iter().cloned())
        .map(|(value, label)| {
            let selected = if value == state.filter_value { " selected" } else { "" };
            format!(
                r#"<option value="{value}"{selected}>{label}</option>"#,
                value = html_escape(&value),
                label = html_escape(&label),
            )
        })
        .collect();

    let sort_inputs = match &state.sort_key {
        Some(key) => format!(
            r#"<input type="hidden" name="sort" value="{key}"><input type="hidden" name="dir" value="{dir}">"#,
            key = html_escape(key),
            dir = state.sort_direction,
        ),
        None => String::new(),
    };

    format!(
        r##"<form method="GET" class="flex flex-wrap gap-3 mb-4">
            <input type="search" name="q" value="{search}" placeholder="{placeholder}"
                   class="flex-1 min-w-[200px] px-4 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-primary-500">
            <select name="filter" onchange="this.form.submit()"
                    class="px-4 py-2 border border-gray-300 rounded-lg bg-white">
                {options}
            </select>
            {sort_inputs}
            <button type="submit" class="px-4 py-2 bg-primary-600 hover:bg-primary-700 text-white rounded-lg">Search</button>
        </form>"##,
        search = html_escape(&state.search_text),
        placeholder = html_escape(placeholder),
    )
}

/// Render a computed view: sortable headers, rows, empty row, footer.
pub fn data_table<T>(table: &Table<T>, view: &View<'_, T>, state: &ViewState) -> String {
    let columns = table.columns();

    let headers_html: String = columns
        .iter()
        .map(|column| {
            let label = html_escape(column.label());
            let header = if column.is_sortable() && column.has_value() {
                let arrow = match (&state.sort_key, state.sort_direction) {
                    (Some(key), SortDirection::Ascending) if key == column.key() => " ↑",
                    (Some(key), SortDirection::Descending) if key == column.key() => " ↓",
                    _ => "",
                };
                format!(
                    r#"<a href="{href}" class="hover:text-gray-900">{label}{arrow}</a>"#,
                    href = html_escape(&view_query(&table.toggled(state, column.key()))),
                )
            } else {
                label
            };
            format!(
                r#"<th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{header}</th>"#
            )
        })
        .collect();

    let rows_html: String = if view.is_empty() {
        format!(
            r#"<tr><td colspan="{span}" class="px-6 py-8 text-center text-gray-500">No results found.</td></tr>"#,
            span = columns.len().max(1),
        )
    } else {
        view.iter()
            .map(|row| {
                let cells: String = columns
                    .iter()
                    .map(|column| {
                        let content = match column.cell(row) {
                            Cell::Text(text) => html_escape(&text),
                            Cell::Markup(markup) => markup,
                        };
                        format!(
                            r#"<td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">{content}</td>"#
                        )
                    })
                    .collect();
                format!(
                    r#"<tr data-key="{key}" class="hover:bg-gray-50">{cells}</tr>"#,
                    key = html_escape(&table.row_key(row)),
                )
            })
            .collect()
    };

    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 overflow-x-auto">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>{headers_html}</tr>
                </thead>
                <tbody class="bg-white divide-y divide-gray-200">
                    {rows_html}
                </tbody>
            </table>
            <div class="px-6 py-3 text-sm text-gray-500 border-t border-gray-200">Showing {shown} of {total} results</div>
        </div>"##,
        shown = view.len(),
        total = view.total(),
    )
}

/// Horizontal bar chart: one labelled bar per (label, value).
pub fn bar_chart(rows: &[(String, u64)], color: &str) -> String {
    let max = rows.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);
    let bars: String = rows
        .iter()
        .map(|(label, value)| {
            let width = (*value as f64 / max as f64 * 100.0).round() as u64;
            format!(
                r##"<div class="flex items-center gap-3">
                    <span class="w-40 text-sm text-gray-600 truncate">{label}</span>
                    <div class="flex-1 bg-gray-100 rounded h-4">
                        <div class="bg-{color}-500 h-4 rounded" style="width: {width}%"></div>
                    </div>
                    <span class="w-16 text-right text-sm font-medium text-gray-900">{value}</span>
                </div>"##,
                label = html_escape(label),
            )
        })
        .collect();
    if bars.is_empty() {
        return empty_state("chart-simple", "No data", "Nothing recorded yet.");
    }
    format!(r#"<div class="space-y-3">{bars}</div>"#)
}

/// Simple HTML escape function
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrent_table::Column;

    struct Row {
        id: u32,
        name: &'static str,
    }

    fn table() -> Table<Row> {
        Table::builder("rows")
            .identity(|r: &Row| r.id.to_string())
            .column(Column::new("name", "Name", |r: &Row| Some(r.name.to_string())))
            .build()
            .unwrap()
    }

    #[test]
    fn test_view_query_encodes_state() {
        let mut state = ViewState::new();
        state.set_search_text("a&b");
        assert_eq!(view_query(&state), "?q=a%26b&filter=all&dir=asc");

        let state = table().toggled(&state, "name");
        assert_eq!(view_query(&state), "?q=a%26b&filter=all&sort=name&dir=asc");
    }

    #[test]
    fn test_data_table_escapes_text_and_shows_footer() {
        let rows = vec![Row { id: 1, name: "<b>x</b>" }, Row { id: 2, name: "y" }];
        let table = table();
        let state = ViewState::new();
        let view = table.compute_view(&rows, &state, Some("name"), None);
        let html = data_table(&table, &view, &state);
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains("Showing 2 of 2 results"));
        assert!(html.contains("sort=name&amp;dir=asc"));
    }

    #[test]
    fn test_data_table_empty_row() {
        let rows: Vec<Row> = Vec::new();
        let table = table();
        let state = ViewState::new();
        let view = table.compute_view(&rows, &state, None, None);
        let html = data_table(&table, &view, &state);
        assert!(html.contains("No results found."));
        assert!(html.contains("Showing 0 of 0 results"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"<a href="x">'"#), "&lt;a href=&quot;x&quot;&gt;&#x27;");
    }
}
