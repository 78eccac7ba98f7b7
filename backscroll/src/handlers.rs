use crate::session::{PageSnapshot, Session, Step};
use anyhow::{Context, Result, anyhow, bail};
use backscroll_core::{NavigateEvent, NavigationCoordinator, NavigationOutcome, Settings};
use backscroll_page::{HeadlessPage, Page};
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use tracing::Level;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/backscroll/config.json";

/// What happened on one navigate step of a replay
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayEntry {
    pub from: String,
    pub destination: String,
    pub outcome: NavigationOutcome,
    /// Scroll offset once the step (including any re-render) settled
    pub scroll_y: f64,
}

/// Installs the fmt subscriber; debug logging shows every poll and state change
pub fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

/// Settings from `path`, else from the default location if present, else defaults
pub fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
            Settings::load(Path::new(&expanded))
                .with_context(|| format!("Failed to load settings from {}", path.display()))
        }
        None => {
            let expanded = shellexpand::tilde(DEFAULT_CONFIG_PATH).to_string();
            let default_path = Path::new(&expanded);
            if default_path.exists() {
                Settings::load(default_path).with_context(|| {
                    format!("Failed to load settings from {}", default_path.display())
                })
            } else {
                Ok(Settings::default())
            }
        }
    }
}

/// Reads a session file and inlines every `html_file`, resolved against the
/// session's directory
pub fn load_session(path: &Path) -> Result<Session> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file {}", path.display()))?;
    let mut session: Session = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse session file {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    validate_url(&session.start.url)?;
    inline_snapshot(&mut session.start, base_dir)?;
    if session.start.html.is_none() {
        bail!("Session start page {} has no html or html_file", session.start.url);
    }

    for step in &mut session.steps {
        if let Step::Navigate {
            destination,
            html,
            html_file,
            ..
        } = step
        {
            validate_url(destination)?;
            if let Some(file) = html_file.take() {
                *html = Some(read_relative(base_dir, &file)?);
            }
        }
    }

    Ok(session)
}

fn validate_url(url: &str) -> Result<()> {
    Url::parse(url).map_err(|e| anyhow!("Invalid URL '{}': {}", url, e))?;
    Ok(())
}

fn inline_snapshot(snapshot: &mut PageSnapshot, base_dir: &Path) -> Result<()> {
    if let Some(file) = snapshot.html_file.take() {
        snapshot.html = Some(read_relative(base_dir, &file)?);
    }
    Ok(())
}

fn read_relative(base_dir: &Path, file: &Path) -> Result<String> {
    let path = if file.is_absolute() {
        file.to_path_buf()
    } else {
        base_dir.join(file)
    };
    fs::read_to_string(&path).with_context(|| format!("Failed to read page {}", path.display()))
}

/// Plays the session against a headless page, one navigation at a time.
///
/// Each navigation runs alongside the host's re-render so the coordinator sees
/// the document change while it is polling, as it would in a browser.
pub async fn run_replay(session: &Session, settings: &Settings) -> Result<Vec<ReplayEntry>> {
    let start_html = session
        .start
        .html
        .as_deref()
        .ok_or_else(|| anyhow!("Session start page has no html"))?;
    let page = Rc::new(HeadlessPage::new(
        &session.start.url,
        start_html,
        session.viewport.into(),
    ));
    let coordinator = NavigationCoordinator::new(page.clone(), settings.clone());
    let mut entries = Vec::new();

    for step in &session.steps {
        match step {
            Step::Scroll { y } => page.scroll_to(0.0, *y),
            Step::Navigate {
                destination,
                render_after_ms,
                html,
                ..
            } => {
                let from = page.location();
                let event = NavigateEvent::new(destination.clone());
                let render = async {
                    if let Some(html) = html {
                        tokio::time::sleep(Duration::from_millis(*render_after_ms)).await;
                        page.render(destination, html);
                    }
                };
                let (outcome, ()) = tokio::join!(coordinator.handle_navigation(&event), render);
                entries.push(ReplayEntry {
                    from,
                    destination: destination.clone(),
                    outcome,
                    scroll_y: page.scroll_y(),
                });
            }
        }
    }

    Ok(entries)
}

pub fn format_entry(index: usize, entry: &ReplayEntry) -> String {
    let marker = match entry.outcome {
        NavigationOutcome::Restored { .. } => "✓".green().bold(),
        NavigationOutcome::Ignored(_) => "·".bright_black(),
        NavigationOutcome::Aborted { .. } => "✗".red().bold(),
    };
    format!(
        "{} [{}] {} -> {}\n    {} (scroll now {})",
        marker,
        index + 1,
        entry.from,
        entry.destination.bright_cyan(),
        entry.outcome,
        entry.scroll_y
    )
}

pub async fn handle_replay(args: &ArgMatches) {
    let session_path = args
        .get_one::<PathBuf>("SESSION")
        .expect("SESSION is required by clap");
    let config_path = args.get_one::<PathBuf>("config");

    let mut settings = match load_settings(config_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    };
    if args.get_flag("debug") {
        settings.debug_logging = true;
    }
    init_tracing(settings.debug_logging);

    let session = match load_session(session_path) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    };

    println!(
        "\n{} Replaying {} step(s) from {}\n",
        "▶".bright_blue().bold(),
        session.steps.len(),
        session.start.url
    );

    let entries = match run_replay(&session, &settings).await {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("✗ Replay failed: {:#}", e);
            std::process::exit(1);
        }
    };

    for (index, entry) in entries.iter().enumerate() {
        println!("{}", format_entry(index, entry));
    }

    let restored = entries
        .iter()
        .filter(|entry| matches!(entry.outcome, NavigationOutcome::Restored { .. }))
        .count();
    println!(
        "\n{} navigation(s), {} restored",
        entries.len(),
        restored.to_string().green()
    );
}

pub fn handle_config(args: &ArgMatches) {
    let config_path = args.get_one::<PathBuf>("config");
    match load_settings(config_path) {
        Ok(settings) => println!("{}", settings.to_json()),
        Err(e) => {
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    }
}
