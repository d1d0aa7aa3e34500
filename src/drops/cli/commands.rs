//! # CLI Layer
//!
//! This module is **one possible UI client** for drops, not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Installs the tracing subscriber
//! - Reads environment overrides for credentials and the API URL
//! - Formats output for human or machine consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Load config and credentials, build `DropsApi`
//! 3. **API Dispatch**: Call the appropriate `DropsApi` method
//! 4. **Output Formatting**: Convert `CmdResult` into terminal output
//! 5. **Error Handling**: `print_error` turns a `DropsError` into stderr lines
//!
//! Local commands (`login`, `logout`, `whoami`, `config`) never build the
//! HTTP service. Remote commands require authentication before anything else.

use super::render::{
    print_boards, print_config, print_created, print_drops, print_messages, print_values,
    OutputSettings,
};
use super::setup::{Cli, Commands, CreateArgs};
use clap::Parser;
use dialoguer::Password;
use drops::api::{ConfigAction, DropDefaults, DropsApi, NoteRequest, NoteSource};
use drops::commands::{self, CmdResult, CreateOptions};
use drops::config::{config_dir, DropsConfig, TOKEN_ENV};
use drops::credentials::{CredentialStore, EncryptedFileStore};
use drops::error::{CleanupOutcome, DropsError, Result};
use drops::model::{Credentials, Privacy};
use drops::service::http::HttpDropService;
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = OutputSettings::new(cli.porcelain, cli.debug);
    init_logging(&settings);

    let config_dir = config_dir()?;
    debug!(config_dir = %config_dir.display(), "resolved config directory");

    match cli.command {
        Commands::Login {
            token,
            username,
            password,
        } => handle_login(&config_dir, &settings, token, username, password),
        Commands::Logout => {
            let mut store = EncryptedFileStore::new(&config_dir);
            let result = commands::auth::logout(&mut store)?;
            print_messages(&settings, &result.messages);
            Ok(())
        }
        Commands::Whoami => handle_whoami(&config_dir),
        Commands::Config { key, value } => handle_config(&config_dir, &settings, key, value),
        command => {
            let mut api = init_api(&config_dir)?;
            dispatch(&mut api, &settings, command).inspect_err(log_failure)
        }
    }
}

fn log_failure(error: &DropsError) {
    if error.is_precondition() {
        debug!(%error, "rejected locally, nothing was sent");
    }
    if let DropsError::Reconciliation { cleanup, .. } = error {
        debug!(%cleanup, "reconciliation failed");
    }
}

fn dispatch(
    api: &mut DropsApi<HttpDropService>,
    settings: &OutputSettings,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Upload { path, options } => {
            let result = api.upload_file(&path, create_options(options))?;
            print_create_result(settings, &result);
        }
        Commands::Link { url, options } => {
            let result = api.shorten_link(&url, create_options(options))?;
            print_create_result(settings, &result);
        }
        Commands::Note {
            text,
            file,
            code,
            lang,
            as_code,
            options,
        } => {
            let request = note_request(text, file, code, lang, as_code)?;
            let result = api.create_note(request, create_options(options))?;
            print_create_result(settings, &result);
        }
        Commands::List => {
            let result = api.list_drops()?;
            print_drops(settings, &result.drops);
            print_messages(settings, &result.messages);
        }
        Commands::Delete { code } => {
            let result = api.delete_drop(&code)?;
            print_messages(settings, &result.messages);
        }
        Commands::Boards { id } => {
            let result = api.boards(id.as_deref())?;
            print_boards(settings, &result.boards);
            print_messages(settings, &result.messages);
        }
        Commands::Login { .. }
        | Commands::Logout
        | Commands::Whoami
        | Commands::Config { .. } => {}
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise `--debug` selects debug and everything else warn.
fn init_logging(settings: &OutputSettings) {
    let fallback = if settings.debug { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn init_api(config_dir: &Path) -> Result<DropsApi<HttpDropService>> {
    let config = DropsConfig::load(config_dir)?.with_env_overrides();
    let credentials = load_credentials(config_dir)?;
    credentials.require_authenticated()?;

    debug!(api_url = %config.api_url, auth = credentials.kind(), "building service");
    let service = HttpDropService::new(&config.api_url, credentials)?;
    Ok(DropsApi::new(service, DropDefaults::from(&config)))
}

/// `DROPS_TOKEN` takes precedence over the stored credentials.
fn load_credentials(config_dir: &Path) -> Result<Credentials> {
    if let Ok(jwt) = std::env::var(TOKEN_ENV) {
        let jwt = jwt.trim();
        if !jwt.is_empty() {
            return Ok(Credentials::Token {
                jwt: jwt.to_string(),
            });
        }
    }
    EncryptedFileStore::new(config_dir).get()
}

fn create_options(args: CreateArgs) -> CreateOptions {
    let privacy = if args.private {
        Some(Privacy::Private)
    } else if args.public {
        Some(Privacy::Public)
    } else {
        None
    };
    CreateOptions {
        title: args.title,
        privacy,
        password: args.password,
        board: args.board,
    }
}

fn note_request(
    text: Option<String>,
    file: Option<PathBuf>,
    code: Option<String>,
    lang: Option<String>,
    as_code: bool,
) -> Result<NoteRequest> {
    let source = match (text, file, code) {
        (_, Some(path), _) => NoteSource::File(path),
        (_, _, Some(snippet)) => NoteSource::Code(snippet),
        (Some(text), _, _) => NoteSource::Text(text),
        (None, None, None) => NoteSource::Text(read_stdin()?),
    };
    Ok(NoteRequest {
        source,
        language: lang,
        code: as_code,
    })
}

/// Reads all of stdin when it is piped; an interactive terminal yields nothing.
fn read_stdin() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut text = String::new();
    for line in stdin.lock().lines() {
        text.push_str(&line?);
        text.push('\n');
    }
    Ok(text)
}

fn print_create_result(settings: &OutputSettings, result: &CmdResult) {
    for drop in &result.drops {
        print_created(settings, drop);
    }
    print_messages(settings, &result.messages);
}

fn handle_login(
    config_dir: &Path,
    settings: &OutputSettings,
    token: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let credentials = match (token, username) {
        (Some(jwt), _) => Credentials::Token { jwt },
        (None, Some(username)) => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };
            Credentials::Basic { username, password }
        }
        (None, None) => Credentials::Anonymous,
    };

    let mut store = EncryptedFileStore::new(config_dir);
    let result = commands::auth::login(&mut store, &credentials)?;
    debug!(path = %store.path().display(), "credentials written");
    print_messages(settings, &result.messages);
    Ok(())
}

/// Hidden prompt on a terminal; piped input is read as one line.
fn prompt_password() -> Result<String> {
    let stdin = io::stdin();
    let password = if stdin.is_terminal() {
        Password::new().with_prompt("Password").interact()?
    } else {
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_string()
    };
    if password.is_empty() {
        return Err(DropsError::Credentials("password cannot be empty".to_string()));
    }
    Ok(password)
}

fn handle_whoami(config_dir: &Path) -> Result<()> {
    let store = EncryptedFileStore::new(config_dir);
    let result = commands::auth::whoami(&store)?;
    print_values(&result.messages);
    if std::env::var(TOKEN_ENV).is_ok_and(|token| !token.trim().is_empty()) {
        debug!("{} is set and overrides stored credentials", TOKEN_ENV);
    }
    Ok(())
}

fn handle_config(
    config_dir: &Path,
    settings: &OutputSettings,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_key = matches!(action, ConfigAction::ShowKey(_));

    let result = commands::config::run(config_dir, action)?;
    if show_key {
        print_values(&result.messages);
        return Ok(());
    }
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(settings, config);
        }
    }
    print_messages(settings, &result.messages);
    Ok(())
}

/// Writes an error to stderr.
pub fn print_error(error: &DropsError) {
    for line in error_lines(error) {
        eprintln!("{}", line);
    }
}

/// The error itself, then a login hint for rejected credentials and a warning
/// when a drop that should have been removed may still exist.
fn error_lines(error: &DropsError) -> Vec<String> {
    let mut lines = vec![format!("Error: {}", error)];

    if error.service_error().is_some_and(|e| e.is_unauthorized()) {
        lines.push("Hint: run `drops login` to store valid credentials".to_string());
    }
    if let DropsError::Reconciliation {
        cleanup: CleanupOutcome::Failed(reason),
        ..
    } = error
    {
        lines.push(format!(
            "Warning: the drop could not be deleted and may still be public: {}",
            reason
        ));
    }
    lines
}
