//! Terminal rendering of users and form errors.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use uac_users::{ListState, User, UserField, UserStatus};

pub fn print_list(list: &ListState, query_string: &str) {
    println!("{}", list_table(list));
    println!("{}", list_footer(list, query_string));
}

pub fn print_user(user: &User) {
    println!("{}", user_table(user));
}

/// Print every field error of a rejected form, in field order.
pub fn print_field_errors<'a>(errors: impl IntoIterator<Item = (&'a UserField, &'a String)>) {
    eprintln!("error: the user form has invalid fields");
    for (field, message) in errors {
        eprintln!("  {field}: {message}");
    }
}

fn list_table(list: &ListState) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Full name"),
        header_cell("Email"),
        header_cell("Status"),
        header_cell("Created"),
    ]);
    for user in &list.items {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.full_name),
            Cell::new(&user.email),
            status_cell(user.status),
            dim_cell(user.created_at.format("%Y-%m-%d")),
        ]);
    }
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn list_footer(list: &ListState, query_string: &str) -> String {
    let pages = list.total.div_ceil(list.limit.max(1) as usize).max(1);
    let query = if query_string.is_empty() {
        "(defaults)"
    } else {
        query_string
    };
    format!(
        "Page {} of {} | {} matching | query: {}",
        list.page, pages, list.total, query
    )
}

fn user_table(user: &User) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    let rows = [
        ("ID", Cell::new(user.id)),
        (UserField::FullName.label(), Cell::new(&user.full_name)),
        (UserField::Email.label(), Cell::new(&user.email)),
        (UserField::Status.label(), status_cell(user.status)),
        ("Created", Cell::new(user.created_at.to_rfc3339())),
    ];
    for (label, value) in rows {
        table.add_row(vec![header_cell(label), value]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn status_cell(status: UserStatus) -> Cell {
    let color = match status {
        UserStatus::Active => Color::Green,
        UserStatus::Blocked => Color::Red,
    };
    Cell::new(status).fg(color)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
