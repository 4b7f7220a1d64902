use crate::filter::Filter;
use crate::store::Stats;
use crate::task::Task;
use crate::theme::ThemeMode;

/// One displayable task row. `text` is already escaped; `struck` asks the
/// surface for a strikethrough treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: u64,
    pub marker: &'static str,
    pub text: String,
    pub struck: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyView {
    pub message: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListView {
    Empty(EmptyView),
    Rows(Vec<RowView>),
}

/// Everything one render needs, independent of the surface that will
/// draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub filter: Filter,
    pub list: TaskListView,
    pub stats_line: String,
    pub clear_label: String,
    pub theme_hint: String,
}

pub fn build_page(visible: &[&Task], filter: Filter, stats: Stats, mode: ThemeMode) -> PageView {
    let list = if visible.is_empty() {
        TaskListView::Empty(empty_view(filter))
    } else {
        TaskListView::Rows(visible.iter().map(|task| row_view(task)).collect())
    };

    PageView {
        filter,
        list,
        stats_line: stats_line(stats),
        clear_label: clear_completed_label(stats.completed),
        theme_hint: theme_hint(mode),
    }
}

fn row_view(task: &Task) -> RowView {
    RowView {
        id: task.id,
        marker: if task.completed { "[x]" } else { "[ ]" },
        text: escape_html(&task.text),
        struck: task.completed,
    }
}

fn empty_view(filter: Filter) -> EmptyView {
    let message = match filter {
        Filter::All => "No tasks yet!",
        Filter::Active => "No active tasks!",
        Filter::Completed => "No completed tasks yet!",
    };

    EmptyView {
        message,
        hint: "Add a new task to get started!",
    }
}

pub fn stats_line(stats: Stats) -> String {
    format!(
        "{} active • {} completed • {} total",
        stats.active, stats.completed, stats.total
    )
}

/// The clear-completed affordance carries the count only when there is
/// something to clear.
pub fn clear_completed_label(completed: usize) -> String {
    if completed > 0 {
        format!("Clear Completed ({completed})")
    } else {
        "Clear Completed".to_string()
    }
}

/// The theme affordance names the mode a toggle would switch to.
pub fn theme_hint(mode: ThemeMode) -> String {
    let target = match mode {
        ThemeMode::Dark => "light",
        ThemeMode::Light => "dark",
    };
    format!("{} switch to {target}", mode.toggle_icon())
}

/// Neutralizes markup-significant characters so stored text can never be
/// read back as structure. Applied at render time only; the collection
/// keeps raw text.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{TaskListView, build_page, clear_completed_label, escape_html, theme_hint};
    use crate::filter::Filter;
    use crate::store::Stats;
    use crate::task::Task;
    use crate::theme::ThemeMode;

    fn stats(active: usize, completed: usize) -> Stats {
        Stats {
            active,
            completed,
            total: active + completed,
        }
    }

    #[test]
    fn empty_state_message_depends_on_the_filter() {
        for (filter, message) in [
            (Filter::All, "No tasks yet!"),
            (Filter::Active, "No active tasks!"),
            (Filter::Completed, "No completed tasks yet!"),
        ] {
            let page = build_page(&[], filter, stats(0, 0), ThemeMode::Dark);
            match page.list {
                TaskListView::Empty(empty) => {
                    assert_eq!(empty.message, message);
                    assert_eq!(empty.hint, "Add a new task to get started!");
                }
                TaskListView::Rows(_) => panic!("expected empty view"),
            }
        }
    }

    #[test]
    fn theme_only_changes_color_tokens_not_messages() {
        let dark = build_page(&[], Filter::All, stats(0, 0), ThemeMode::Dark);
        let light = build_page(&[], Filter::All, stats(0, 0), ThemeMode::Light);

        assert_eq!(dark.list, light.list);
        assert_eq!(dark.stats_line, light.stats_line);
        assert_ne!(dark.theme_hint, light.theme_hint);
    }

    #[test]
    fn rows_reflect_completion_state() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 11, 0, 0).unwrap();
        let mut done = Task::new("Buy milk".to_string(), now, 1);
        done.completed = true;
        let open = Task::new("Walk dog".to_string(), now, 2);

        let visible = [&open, &done];
        let page = build_page(&visible, Filter::All, stats(1, 1), ThemeMode::Dark);

        let TaskListView::Rows(rows) = page.list else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].marker, "[ ]");
        assert!(!rows[0].struck);
        assert_eq!(rows[1].marker, "[x]");
        assert!(rows[1].struck);
        assert_eq!(rows[1].text, "Buy milk");
    }

    #[test]
    fn hostile_text_is_neutralized() {
        let escaped = escape_html("<script>alert(1)</script>");
        assert_eq!(escaped, "&lt;script&gt;alert(1)&lt;/script&gt;");
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));

        assert_eq!(escape_html(r#"say "hi" & 'bye'"#), "say &quot;hi&quot; &amp; &#39;bye&#39;");
    }

    #[test]
    fn stats_line_uses_the_bullet_format() {
        let page = build_page(&[], Filter::All, stats(1, 1), ThemeMode::Dark);
        assert_eq!(page.stats_line, "1 active • 1 completed • 2 total");
    }

    #[test]
    fn clear_label_counts_only_when_nonzero() {
        assert_eq!(clear_completed_label(0), "Clear Completed");
        assert_eq!(clear_completed_label(3), "Clear Completed (3)");
    }

    #[test]
    fn theme_hint_points_at_the_target_mode() {
        assert_eq!(theme_hint(ThemeMode::Dark), "☀ switch to light");
        assert_eq!(theme_hint(ThemeMode::Light), "☾ switch to dark");
    }
}
