// src/cli.rs
use crate::auth::TokenStore;
use crate::core::{DirectoryConfig, EmployeeGateway, HttpGateway, JsonFileStore, KeyValueStore};
use crate::directory::{CvBadge, EmployeeDirectoryView, Level, Notification};
use crate::types::{Column, CvKind, EmployeeId, EmployeeRecord};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "agn-directory")]
#[command(about = "Browse and manage the AGN employee directory")]
pub struct DirectoryCli {
    #[command(subcommand)]
    pub command: DirectoryCommand,

    /// Backend base URL, overrides configuration
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Local storage file (viewed CVs, admin token)
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum DirectoryCommand {
    /// List employees, one page at a time
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Narrow the loaded rows locally (all terms must match)
        #[arg(long)]
        filter: Option<String>,
    },
    /// Export every employee matching a search to CSV
    Export {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Delete an employee
    Delete {
        id: EmployeeId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Replace an employee's CV (pdf, doc or docx)
    UpdateCv { id: EmployeeId, file: PathBuf },
    /// Mark an employee as appointed (admin login required)
    Appoint { id: EmployeeId },
    /// Print a CV link and record it as viewed
    ViewCv {
        id: EmployeeId,
        #[arg(long)]
        masked: bool,
    },
    /// Download an employee's CV
    DownloadCv {
        id: EmployeeId,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print a WhatsApp share link for an employee's profile
    Share { id: EmployeeId },
    /// Log in as admin and keep the token
    Login { username: String, password: String },
    /// Forget the admin token
    Logout,
}

impl DirectoryCli {
    pub fn apply_overrides(&self, mut config: DirectoryConfig) -> DirectoryConfig {
        if let Some(url) = &self.api_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = &self.storage {
            config.storage_path = path.clone();
        }
        config
    }
}

pub async fn handle_directory_command(cli: DirectoryCli, config: DirectoryConfig) -> Result<()> {
    let config = cli.apply_overrides(config);
    let gateway: Arc<dyn EmployeeGateway> = Arc::new(HttpGateway::new(&config)?);
    let file_store =
        JsonFileStore::open(&config.storage_path).context("Failed to open local storage")?;
    info!("Local storage: {}", file_store.path().display());
    let store: Arc<dyn KeyValueStore> = Arc::new(file_store);

    match &cli.command {
        DirectoryCommand::Login { username, password } => {
            let tokens = TokenStore::new(store);
            match tokens.login(gateway.as_ref(), username, password).await {
                Ok(()) => println!("✅ Logged in as {}", username),
                Err(e) => println!("❌ Login failed: {}", e),
            }
            return Ok(());
        }
        DirectoryCommand::Logout => {
            let tokens = TokenStore::new(store);
            if !tokens.is_authenticated() {
                println!("ℹ️  Not logged in");
                return Ok(());
            }
            tokens.logout()?;
            println!("✅ Logged out");
            return Ok(());
        }
        _ => {}
    }

    let mut view = EmployeeDirectoryView::new(gateway, store, &config);

    match cli.command {
        DirectoryCommand::List {
            search,
            pages,
            filter,
        } => {
            open(&mut view, &search).await;
            for _ in 1..pages {
                if !view.load_more().await {
                    break;
                }
            }
            let rows = match filter.as_deref() {
                Some(query) => view.filtered(query),
                None => view.rows().iter().collect(),
            };
            print_rows(&view, &rows);
            println!(
                "Showing {} of {} employee(s){}",
                rows.len(),
                view.state().total_count(),
                if view.state().has_more() {
                    " (more available)"
                } else {
                    ""
                }
            );
        }

        DirectoryCommand::Export { search, out } => {
            open(&mut view, &search).await;
            if let Some(path) = view.export_csv(&out).await {
                println!("📄 {}", path.display());
            }
        }

        DirectoryCommand::Delete { id, yes, search } => {
            open(&mut view, &search).await;
            locate(&mut view, id).await;
            view.delete(id, |row| yes || confirm_delete(row)).await;
        }

        DirectoryCommand::UpdateCv { id, file } => {
            open(&mut view, "").await;
            locate(&mut view, id).await;
            view.update_cv(id, &file).await;
        }

        DirectoryCommand::Appoint { id } => {
            open(&mut view, "").await;
            locate(&mut view, id).await;
            view.mark_appointed(id).await;
        }

        DirectoryCommand::ViewCv { id, masked } => {
            let kind = if masked { CvKind::Masked } else { CvKind::Original };
            open(&mut view, "").await;
            locate(&mut view, id).await;
            match view.view_cv(id, kind) {
                Some(url) => println!("{}", url),
                None => println!("No {} CV for employee {}", kind, id),
            }
        }

        DirectoryCommand::DownloadCv { id, out } => {
            open(&mut view, "").await;
            locate(&mut view, id).await;
            if let Some(path) = view.download_cv(id, &out).await {
                println!("📄 {}", path.display());
            }
        }

        DirectoryCommand::Share { id } => {
            open(&mut view, "").await;
            locate(&mut view, id).await;
            if let Some(link) = view.share(id) {
                println!("{}", link);
            }
        }

        DirectoryCommand::Login { .. } | DirectoryCommand::Logout => {}
    }

    print_notifications(view.drain_notifications());
    Ok(())
}

async fn open(view: &mut EmployeeDirectoryView, search: &str) {
    if search.trim().is_empty() {
        view.mount().await;
    } else {
        view.search(search).await;
    }
}

/// Page through the directory until `id` is cached or nothing is left.
async fn locate(view: &mut EmployeeDirectoryView, id: EmployeeId) {
    while view.row(id).is_none() {
        if !view.load_more().await {
            break;
        }
    }
    info!("Employee {} cached: {}", id, view.row(id).is_some());
}

fn confirm_delete(row: &EmployeeRecord) -> bool {
    print!(
        "Are you sure you want to delete employee \"{}\"? This action cannot be undone. [y/N] ",
        row.display(Column::Name)
    );
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_rows(view: &EmployeeDirectoryView, rows: &[&EmployeeRecord]) {
    println!(
        "{:<6} {:<24} {:<20} {:<14} {:<16} {:<10} {:<12} {:<12}",
        "ID", "Name", "Field", "Mobile", "Location", "Status", "CV", "Masked CV"
    );
    println!("{}", "-".repeat(120));

    for row in rows {
        println!(
            "{:<6} {:<24} {:<20} {:<14} {:<16} {:<10} {:<12} {:<12}",
            row.employee_id,
            truncate(row.display(Column::Name), 24),
            truncate(row.display(Column::Field), 20),
            truncate(row.display(Column::MobileNo), 14),
            truncate(row.display(Column::Location), 16),
            row.status.badge(),
            cv_cell(view, row, CvKind::Original),
            cv_cell(view, row, CvKind::Masked),
        );
    }
}

fn cv_cell(view: &EmployeeDirectoryView, row: &EmployeeRecord, kind: CvKind) -> String {
    if row.cv_url(kind).is_none() {
        return "-".to_string();
    }
    let badge = view.cv_badge(row.employee_id, kind);
    let mark = match badge {
        CvBadge::Viewed => '●',
        CvBadge::Unviewed => '○',
    };
    format!("{} {}", mark, badge.label())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn print_notifications(notes: Vec<Notification>) {
    for note in notes {
        let icon = match note.level {
            Level::Success => "✅",
            Level::Info => "ℹ️ ",
            Level::Error => "❌",
        };
        println!("{} {}", icon, note.text);
    }
}
