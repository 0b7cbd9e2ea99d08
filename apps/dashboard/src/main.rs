use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    session::{bootstrap_from_url, FileTokenStore, TokenStore},
    HttpContactsClient,
};
use crossbeam_channel::bounded;
use dashboard::{
    backend_bridge::{commands::BackendCommand, runtime},
    config::{load_settings, Settings},
    controller::{
        events::UiErrorContext,
        reducer::{Confirmer, ContactsDashboard},
        state::{FilterKey, RowsPerPage},
    },
    ui::{messages, table, DashboardApp, PumpOutcome},
};
use serde_json::Value;
use shared::{
    domain::{ContactId, Source, Stage, Temperature},
    error::ValidationError,
    protocol::ContactUpdate,
};
use tracing_subscriber::EnvFilter;

const COMMAND_QUEUE_CAPACITY: usize = 256;
const EVENT_QUEUE_CAPACITY: usize = 2048;

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Contacts management dashboard")]
struct Cli {
    /// Base URL of the contacts API, e.g. http://127.0.0.1:5000/api
    #[arg(long)]
    api_url: Option<String>,
    /// Launch URL that may carry a `token` query parameter to persist.
    #[arg(long)]
    launch_url: Option<String>,
    #[arg(long)]
    token_path: Option<PathBuf>,
    /// Skip confirmation prompts for destructive commands.
    #[arg(long)]
    yes: bool,
    /// Print JSON instead of the rendered table.
    #[arg(long)]
    json: bool,
    /// Seconds to wait for backend responses.
    #[arg(long)]
    wait_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    #[arg(long)]
    source: Option<String>,
    #[arg(long)]
    temperature: Option<String>,
    #[arg(long)]
    stage: Option<String>,
    #[arg(long)]
    group: Option<String>,
    #[arg(long)]
    sort_by: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        rows: Option<u32>,
    },
    Stats,
    Show {
        id: String,
    },
    Search {
        query: String,
    },
    Create {
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        source: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        temperature: Option<String>,
        #[arg(long)]
        stage: Option<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    Delete {
        id: String,
    },
    BulkDelete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    Export {
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        temperature: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Import {
        file: PathBuf,
    },
}

struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = apply_cli_overrides(load_settings(), &cli);

    let token_path = match settings.token_path.clone() {
        Some(path) => path,
        None => FileTokenStore::default_path()?,
    };
    let store = FileTokenStore::new(token_path);
    let token = match cli.launch_url.as_deref() {
        Some(launch_url) => {
            let bootstrap = bootstrap_from_url(launch_url, &store)?;
            tracing::info!(url = %bootstrap.url, "launch url cleaned");
            bootstrap.token
        }
        None => store.load()?,
    };

    let client = HttpContactsClient::new(&settings.api_url)
        .with_context(|| format!("invalid api url '{}'", settings.api_url))?
        .with_token(token);
    tracing::info!(api_url = %client.base_url(), "starting contacts dashboard");

    let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_CAPACITY);
    let (ui_tx, ui_rx) = bounded(EVENT_QUEUE_CAPACITY);
    let worker = runtime::launch(Arc::new(client), cmd_rx, ui_tx);

    let mut app = DashboardApp::new(
        ContactsDashboard::new(settings.rows_per_page),
        cmd_tx,
        ui_rx,
    );
    let wait = Duration::from_secs(settings.request_wait_secs.max(1));
    let confirmer: Box<dyn Confirmer> = if cli.yes {
        Box::new(|_: &str| true)
    } else {
        Box::new(StdinConfirmer)
    };

    let result = run(&mut app, cli.command, cli.json, confirmer.as_ref(), wait);

    drop(app);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    result
}

fn apply_cli_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(v) = &cli.api_url {
        settings.api_url = v.clone();
    }
    if let Some(v) = &cli.token_path {
        settings.token_path = Some(v.clone());
    }
    if let Some(v) = cli.wait_secs {
        settings.request_wait_secs = v;
    }
    settings
}

fn run(
    app: &mut DashboardApp,
    command: Command,
    json: bool,
    confirmer: &dyn Confirmer,
    wait: Duration,
) -> Result<()> {
    match command {
        Command::List {
            search,
            filters,
            page,
            rows,
        } => {
            if let Some(rows) = rows {
                let rows = RowsPerPage::try_from(rows).map_err(validation)?;
                app.state.set_rows_per_page(rows);
            }
            if let Some(search) = search {
                app.state.set_search(&search);
            }
            apply_filters(&mut app.state, &filters)?;
            app.act(ContactsDashboard::mount);
            settle(app, wait)?;
            if page > 1 {
                app.act(|state| {
                    state.set_page(page);
                    Vec::new()
                });
                settle(app, wait)?;
            }
            if let Some(banner) = app.state.banner() {
                bail!("{}", banner.message());
            }
            if json {
                print_json(&app.state.contacts())?;
            } else {
                print!("{}", table::render_dashboard(&app.state));
            }
        }
        Command::Stats => {
            app.act(ContactsDashboard::mount);
            settle(app, wait)?;
            if json {
                print_json(&app.state.stats())?;
            } else {
                println!("{}", table::render_stats(&app.state.stats()));
            }
        }
        Command::Show { id } => {
            app.act(|state| state.view_details(ContactId::server(id)));
            settle(app, wait)?;
            let contact = app.state.detail().ok_or_else(|| {
                anyhow!(
                    "{}",
                    messages::failure_fallback(UiErrorContext::FetchContact)
                )
            })?;
            if json {
                print_json(contact)?;
            } else {
                print!("{}", table::render_contact_detail(contact));
            }
        }
        Command::Search { query } => {
            app.act(|state| state.quick_search(&query));
            settle(app, wait)?;
            let contacts = app
                .state
                .search_results()
                .map(|(_, contacts)| contacts)
                .unwrap_or_default();
            if json {
                print_json(&contacts)?;
            } else if contacts.is_empty() {
                println!("{}", messages::NO_CONTACTS);
            } else {
                for contact in contacts {
                    println!("{}", table::render_contact_row(contact, false));
                }
            }
        }
        Command::Create {
            name,
            email,
            phone,
            source,
        } => {
            app.state.open_create_form();
            app.state.edit_draft(|draft| {
                draft.name = name;
                draft.email = email;
                draft.phone = phone;
                if let Some(source) = source {
                    draft.source = Source::from_label(&source);
                }
            });
            app.act(ContactsDashboard::create_contact);
            settle(app, wait)?;
            println!("{}", messages::CONTACT_CREATED);
        }
        Command::Update {
            id,
            name,
            email,
            phone,
            source,
            temperature,
            stage,
            group,
            tags,
        } => {
            let update = ContactUpdate {
                name,
                email,
                phone,
                source: source.map(|s| Source::from_label(&s)),
                temperature: temperature
                    .map(|t| Temperature::parse_filter(&t))
                    .transpose()
                    .map_err(validation)?,
                stage: stage
                    .map(|s| Stage::parse_filter(&s))
                    .transpose()
                    .map_err(validation)?,
                group,
                tags: (!tags.is_empty()).then_some(tags),
            };
            if update.is_empty() {
                bail!("{}", messages::NOTHING_TO_UPDATE);
            }
            app.act(|state| state.update_contact(ContactId::server(id), update));
            settle(app, wait)?;
            println!("{}", messages::CONTACT_UPDATED);
        }
        Command::Delete { id } => {
            let cmds = app.state.delete_one(ContactId::server(id), confirmer);
            if !dispatch_or_report(app, cmds)? {
                return Ok(());
            }
            settle(app, wait)?;
            println!("{}", messages::CONTACT_DELETED);
        }
        Command::BulkDelete { ids } => {
            for id in ids {
                app.state.select(ContactId::server(id));
            }
            let cmds = app.state.delete_selected(confirmer);
            if !dispatch_or_report(app, cmds)? {
                return Ok(());
            }
            settle(app, wait)?;
            println!("{}", messages::CONTACT_DELETED);
        }
        Command::Export {
            source,
            temperature,
            output,
        } => {
            let filters = FilterArgs {
                source,
                temperature,
                ..FilterArgs::default()
            };
            apply_filters(&mut app.state, &filters)?;
            let cmds = app.state.export_current();
            app.dispatch(cmds);
            settle(app, wait)?;
            let body = app.state.last_export().cloned().unwrap_or(Value::Null);
            let rendered = match body {
                Value::String(text) => text,
                other => serde_json::to_string_pretty(&other)?,
            };
            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                    if let Some(notice) = app.state.notice() {
                        eprintln!("{notice}: {}", path.display());
                    }
                }
                None => println!("{rendered}"),
            }
        }
        Command::Import { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("failed to read '{}'", file.display()))?;
            let payload: Value = serde_json::from_str(&raw)
                .with_context(|| format!("'{}' is not valid JSON", file.display()))?;
            app.act(|state| state.import_contacts(payload));
            settle(app, wait)?;
            println!("{}", messages::IMPORT_COMPLETE);
        }
    }
    Ok(())
}

fn apply_filters(state: &mut ContactsDashboard, filters: &FilterArgs) -> Result<()> {
    let pairs = [
        (FilterKey::Source, &filters.source),
        (FilterKey::Temperature, &filters.temperature),
        (FilterKey::Stage, &filters.stage),
        (FilterKey::Group, &filters.group),
        (FilterKey::SortBy, &filters.sort_by),
    ];
    for (key, value) in pairs {
        if let Some(value) = value {
            state.set_filter(key, value).map_err(validation)?;
        }
    }
    Ok(())
}

/// Sends the commands of a confirmed action. Returns false when the action
/// produced nothing to send, after reporting why.
fn dispatch_or_report(
    app: &mut DashboardApp,
    cmds: Vec<BackendCommand>,
) -> Result<bool> {
    if cmds.is_empty() {
        if let Some(alert) = app.state.take_alert() {
            bail!("{}", alert.message());
        }
        println!("{}", messages::CANCELLED);
        return Ok(false);
    }
    app.dispatch(cmds);
    Ok(true)
}

/// Waits for every outstanding command, then surfaces any alert as an error.
fn settle(app: &mut DashboardApp, wait: Duration) -> Result<()> {
    match app.run_until_idle(wait) {
        PumpOutcome::Idle => {}
        PumpOutcome::TimedOut => bail!(
            "timed out after {}s waiting for {} backend response(s)",
            wait.as_secs(),
            app.in_flight()
        ),
        PumpOutcome::BackendGone => bail!(
            "{}",
            app.status().unwrap_or("backend worker stopped unexpectedly")
        ),
    }
    if let Some(status) = app.status() {
        tracing::warn!(status, "command dispatch problem");
    }
    if let Some(alert) = app.state.take_alert() {
        bail!("{}", alert.message());
    }
    if let Some(banner) = app.state.banner() {
        tracing::warn!(error = banner.message(), "backend unavailable");
    }
    Ok(())
}

fn validation(err: ValidationError) -> anyhow::Error {
    anyhow!("{}", messages::validation_message(&err))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
