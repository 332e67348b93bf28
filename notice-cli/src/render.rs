//! Plain-text rendering of a notice list.

use notice_core::View;
use notice_types::Notice;

/// Render the view a notice list UI would show.
pub fn view(view: View<'_>) -> String {
    match view {
        View::Idle => "(type to search)\n".to_string(),
        View::Loading { stale } => {
            let mut out = String::from("loading...\n");
            out.push_str(&table(stale));
            out
        }
        View::Error { message, retained } => {
            let mut out = format!("error: {}\n", message);
            out.push_str(&table(retained));
            out.push_str("(:retry to try again)\n");
            out
        }
        View::Table { items } if items.is_empty() => "no notices found\n".to_string(),
        View::Table { items } => table(items),
    }
}

fn table(items: &[Notice]) -> String {
    items
        .iter()
        .map(|notice| {
            format!(
                "  {}  {:<40}  {}\n",
                notice.publication_date, notice.title, notice.id
            )
        })
        .collect()
}
