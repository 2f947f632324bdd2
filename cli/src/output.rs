//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use rfp_intake::{Notification, NotificationKind};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Row view of a value for `--format table`.
pub trait TableView {
    type Row: Tabled;

    fn rows(&self) -> Vec<Self::Row>;

    /// Lines printed under the table.
    fn footer(&self) -> Vec<String> {
        Vec::new()
    }
}

impl OutputFormat {
    pub fn print<T: Serialize + TableView>(&self, data: &T) {
        match self {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
            OutputFormat::Table => {
                println!("{}", Table::new(data.rows()));
                for line in data.footer() {
                    println!("{}", line);
                }
            }
        }
    }

    /// Progress indicator. Only rendered for tables; structured formats
    /// print the final result instead.
    pub fn notify(&self, notification: &Notification) {
        if !matches!(self, OutputFormat::Table) {
            return;
        }
        let title = match notification.kind {
            NotificationKind::Loading => notification.title.yellow().bold(),
            NotificationKind::Success => notification.title.green().bold(),
            NotificationKind::Failure => notification.title.red().bold(),
        };
        eprintln!("{} {}", title, notification.message.dimmed());
    }
}
