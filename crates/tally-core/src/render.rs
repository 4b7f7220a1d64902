use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::theme::Palette;
use crate::view::{PageView, RowView, TaskListView};

/// Thin adapter that draws a `PageView` on stdout. Holds no application
/// state beyond the color switch.
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, page, palette))]
    pub fn print_page(&mut self, page: &PageView, palette: &Palette) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        match &page.list {
            TaskListView::Empty(empty) => {
                writeln!(out, "{}", self.paint(empty.message, palette.text))?;
                writeln!(out, "{}", self.paint(empty.hint, palette.dim))?;
            }
            TaskListView::Rows(rows) => {
                self.write_rows(&mut out, rows, palette)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "{}", self.paint(&page.stats_line, palette.dim))?;
        writeln!(
            out,
            "{}  ·  {}",
            self.paint(&page.clear_label, palette.danger),
            self.paint(&page.theme_hint, palette.accent)
        )?;

        Ok(())
    }

    fn write_rows<W: Write>(
        &self,
        mut out: W,
        rows: &[RowView],
        palette: &Palette,
    ) -> anyhow::Result<()> {
        let id_width = rows
            .iter()
            .map(|row| UnicodeWidthStr::width(row.id.to_string().as_str()))
            .max()
            .unwrap_or(2)
            .max(2);

        writeln!(out, "{:>id_width$}  {:3}  Task", "ID", "")?;
        writeln!(out, "{:-<id_width$}  ---  {:-<24}", "", "")?;

        for row in rows {
            let id = self.paint(&format!("{:>id_width$}", row.id), palette.accent);
            let text = if row.struck {
                self.paint(&row.text, &format!("9;{}", palette.done))
            } else {
                self.paint(&row.text, palette.text)
            };
            writeln!(out, "{id}  {}  {text}", row.marker)?;
        }

        Ok(())
    }

    pub fn print_line(&mut self, text: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}
