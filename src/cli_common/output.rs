//! Вывод результатов CLI: текст для человека или JSON для скриптов

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Stdout, Write};
use std::str::FromStr;

/// `--format` of the `check` and `model-check` commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {other} (expected text or json)")),
        }
    }
}

/// Пишет отчёт в выбранном формате
pub struct ReportWriter<W: Write = Stdout> {
    out: W,
    format: OutputFormat,
}

impl ReportWriter<Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Pretty JSON document (the whole output in JSON mode)
    pub fn json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Заголовок секции; подчёркивается только в текстовом режиме
    pub fn heading(&mut self, title: &str) -> Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "\n{}", title.bold().blue())?;
            writeln!(self.out, "{}", "=".repeat(title.chars().count()).blue())?;
        } else {
            writeln!(self.out, "{title}")?;
        }
        Ok(())
    }

    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
        for line in table_lines(headers, rows) {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Renders a plain table: header, separator, rows; columns padded to the
/// widest cell.
pub fn table_lines(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[&str]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match widths.get(i) {
                Some(&width) => format!("{cell:width$}"),
                None => cell.to_string(),
            })
            .collect();
        padded.join(" │ ").trim_end().to_string()
    };

    let separator = widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("─┼─");
    let mut lines = vec![render(headers), separator];
    lines.extend(rows.iter().map(|row| {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        render(&cells)
    }));
    lines
}
