//! # Tubecast — YouTube chat & comment sender
//!
//! Sends a message to a video's comments or live chat, once or in auto mode,
//! through the Tubecast backend.
//!
//! Usage:
//!   tubecast send --video dQw4w9WgXcQ --message "Hello chat!" --live
//!   tubecast send --video dQw4w9WgXcQ --template <id> --auto --count 5 --interval 30
//!   tubecast check "message to test against the spam guard"
//!   tubecast status
//!   tubecast video dQw4w9WgXcQ
//!   tubecast config init
//!   tubecast templates add --title Greeting --text "Hello everyone!"

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tubecast_client::{HttpPlanSource, HttpTransport, HttpVideoLookup, StaticIdentity};
use tubecast_core::TubecastConfig;
use tubecast_core::traits::{PlanSource, TemplateStore};
use tubecast_core::types::{MessageKind, VideoInfo};
use tubecast_dashboard::{Dashboard, Session, SubmitOutcome, ToggleOutcome};
use tubecast_guard::MessageGuard;
use tubecast_scheduler::{FileTemplateStore, JobReport, SchedulerPhase, SendScheduler};

#[derive(Parser)]
#[command(
    name = "tubecast",
    version,
    about = "📺 Tubecast — YouTube live chat & comment sender"
)]
struct Cli {
    /// Config file (default: ~/.tubecast/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message once, or repeatedly in auto mode (PRO)
    Send {
        /// Target video ID
        #[arg(long)]
        video: String,

        /// Message text
        #[arg(long, conflicts_with = "template", required_unless_present = "template")]
        message: Option<String>,

        /// Use a saved template as the message text
        #[arg(long)]
        template: Option<String>,

        /// Post to the live chat instead of the comments
        #[arg(long)]
        live: bool,

        /// Repeat the message (requires the PRO plan)
        #[arg(long)]
        auto: bool,

        /// Number of sends in auto mode
        #[arg(long)]
        count: Option<u32>,

        /// Seconds between sends in auto mode (minimum 5)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Run the spam guard on a message without sending it
    Check {
        text: String,
    },

    /// Show the current plan and credits
    Status,

    /// Preview a video's title and channel
    Video {
        id: String,
    },

    /// Create or inspect the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage saved message templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config (file + environment)
    Show,
}

#[derive(Subcommand)]
enum TemplateAction {
    /// List saved templates
    List,
    /// Save a new template
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
    },
    /// Delete a template by ID
    Remove {
        id: String,
    },
}

fn config_path(path: Option<&str>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(shellexpand::tilde(p).to_string()),
        None => TubecastConfig::default_path(),
    }
}

fn load_config(path: Option<&str>) -> Result<TubecastConfig> {
    let config = match path {
        Some(_) => TubecastConfig::load_from(&config_path(path))?.with_env_overrides(),
        None => TubecastConfig::load()?,
    };
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "tubecast=debug,tubecast_scheduler=debug,tubecast_client=debug,tubecast_dashboard=debug"
    } else {
        "tubecast=info,tubecast_scheduler=info,tubecast_dashboard=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    if let Commands::Config { action: ConfigAction::Init { force } } = cli.command {
        let path = config_path(cli.config.as_deref());
        if TubecastConfig::default().save_to(&path, force)? {
            println!("✅ Wrote {}", path.display());
        } else {
            println!("⚠️  {} already exists (use --force to replace it)", path.display());
        }
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Config { .. } => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Commands::Check { text } => check(&config, &text),
        Commands::Status => status(&config).await,
        Commands::Video { id } => video(&config, &id).await,
        Commands::Templates { action } => templates(&config, action),
        Commands::Send {
            video,
            message,
            template,
            live,
            auto,
            count,
            interval,
        } => {
            let text = match (message, template) {
                (Some(m), _) => m,
                (None, Some(id)) => template_text(&config, &id)?,
                (None, None) => bail!("Provide --message or --template"),
            };
            let kind = if live { MessageKind::Live } else { MessageKind::Comment };
            send(&config, &video, &text, kind, auto, count, interval).await
        }
    }
}

fn check(config: &TubecastConfig, text: &str) -> Result<()> {
    let verdict = MessageGuard::from_config(&config.guard).validate(text);
    let as_json = serde_json::to_string_pretty(&verdict)?;
    println!("{as_json}");
    if let Some(msg) = verdict.inline_message() {
        println!("{} {msg}", if verdict.allowed { "⚠️" } else { "🚫" });
    }
    Ok(())
}

async fn status(config: &TubecastConfig) -> Result<()> {
    let session = Session::bootstrap(&StaticIdentity::from_config(&config.backend)).await?;
    let plans = HttpPlanSource::from_config(&config.backend)?;
    let status = plans.plan_status().await?;

    println!("👤 {}", session.uid);
    println!("💳 {}", status.label());
    if status.is_low_on_credits() {
        println!("⚠️  Only {} credits left — upgrade to PRO for auto mode.", status.credits);
    }
    Ok(())
}

fn print_video(info: &VideoInfo) {
    println!("🎬 {}", info.title);
    println!("📺 {}", info.channel);
    if !info.thumbnail.is_empty() {
        println!("🖼️  {}", info.thumbnail);
    }
}

async fn video(config: &TubecastConfig, id: &str) -> Result<()> {
    let session = Session::bootstrap(&StaticIdentity::from_config(&config.backend)).await?;
    let lookup = HttpVideoLookup::new(
        &config.backend.base_url,
        &session.token,
        std::time::Duration::from_secs(config.backend.timeout_secs),
    )?;
    match lookup.video_info(id).await? {
        Some(info) => print_video(&info),
        None => bail!("'{id}' is too short to be a video ID"),
    }
    Ok(())
}

fn template_store(config: &TubecastConfig) -> Result<FileTemplateStore> {
    Ok(FileTemplateStore::new(&config.templates.resolved_dir())?)
}

fn template_text(config: &TubecastConfig, id: &str) -> Result<String> {
    let store = template_store(config)?;
    match store.list()?.into_iter().find(|t| t.id == id) {
        Some(t) => Ok(t.text),
        None => bail!("Template '{id}' not found"),
    }
}

fn templates(config: &TubecastConfig, action: TemplateAction) -> Result<()> {
    let store = template_store(config)?;
    match action {
        TemplateAction::List => {
            let all = store.list()?;
            if all.is_empty() {
                println!("No templates yet.");
            }
            for t in all {
                println!("{}  {:<20} {}", t.id, t.title, t.text);
            }
        }
        TemplateAction::Add { title, text } => {
            let t = store.create(&title, &text)?;
            println!("✅ Saved template {}", t.id);
        }
        TemplateAction::Remove { id } => {
            if store.delete(&id)? {
                println!("🗑️  Removed {id}");
            } else {
                bail!("Template '{id}' not found");
            }
        }
    }
    Ok(())
}

async fn send(
    config: &TubecastConfig,
    video_id: &str,
    text: &str,
    kind: MessageKind,
    auto: bool,
    count: Option<u32>,
    interval: Option<u64>,
) -> Result<()> {
    let session = Session::bootstrap(&StaticIdentity::from_config(&config.backend)).await?;
    let transport = HttpTransport::from_config(&config.backend)?.with_token(&session.token);
    let plans = HttpPlanSource::new(
        &config.backend.base_url,
        &session.token,
        std::time::Duration::from_secs(config.backend.timeout_secs),
    )?;
    let lookup = HttpVideoLookup::new(
        &config.backend.base_url,
        &session.token,
        std::time::Duration::from_secs(config.backend.timeout_secs),
    )?;
    match lookup.video_info(video_id).await {
        Ok(Some(info)) => print_video(&info),
        Ok(None) => {}
        Err(e) => tracing::warn!("⚠️ Video preview unavailable: {e}"),
    }
    let scheduler = SendScheduler::from_config(Arc::new(transport), &config.scheduler);
    let mut dash = Dashboard::new(
        session,
        MessageGuard::from_config(&config.guard),
        scheduler,
        Arc::new(plans),
        &config.scheduler,
    );

    let verdict = dash.edit(text);
    if let Some(msg) = verdict.inline_message() {
        println!("{} {msg}", if verdict.allowed { "⚠️" } else { "🚫" });
    }

    if auto {
        if let ToggleOutcome::Denied(advisory) = dash.toggle_auto(true).await {
            bail!("{advisory}");
        }
        dash.set_repeat(
            count.unwrap_or(config.scheduler.default_repeat_count),
            interval.unwrap_or(config.scheduler.default_interval_secs),
        );
    }

    let handle = match dash.submit(video_id, kind) {
        SubmitOutcome::Started(handle) => handle,
        SubmitOutcome::Blocked(_) => bail!("Message blocked by the spam guard"),
        SubmitOutcome::Rejected(rejection) => bail!("{rejection}"),
        SubmitOutcome::StopRequested => bail!("A job was already running"),
    };

    let mut phases = dash.scheduler().subscribe();
    let wait = handle.wait();
    tokio::pin!(wait);
    let mut stop_sent = false;

    let report = loop {
        tokio::select! {
            report = &mut wait => break report,
            _ = tokio::signal::ctrl_c(), if !stop_sent => {
                stop_sent = true;
                dash.stop();
                eprintln!("\n⏹️  Stopping after the current step...");
            }
            changed = phases.changed() => {
                if changed.is_err() {
                    continue;
                }
                let phase = *phases.borrow_and_update();
                if let SchedulerPhase::Sending { attempt_index, total } = phase {
                    eprintln!("📤 Sending message {attempt_index} of {total}...");
                } else if !phase.is_idle() {
                    eprint!("\r{}   ", dash.affordance().label);
                }
            }
        }
    };

    match report {
        Some(report) => print_report(&report),
        None => bail!("Send job ended abnormally"),
    }
    Ok(())
}

fn print_report(report: &JobReport) {
    eprintln!();
    for attempt in &report.attempts {
        let icon = if attempt.is_success() { "✅" } else { "❌" };
        println!("{icon} {}", attempt.display_text());
    }
    if report.stopped_early {
        println!("⏹️  Stopped after {} of {} attempts.", report.attempts.len(), report.total);
    }
}
