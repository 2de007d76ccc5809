use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use linedispatch::logging;
use linedispatch::manifest::{Manifest, ManifestError, ReplySink, Session};
use linedispatch::{AsyncDispatcher, DispatchError, Registrar, Value};

/// Run commands declared in a TOML manifest, one input line at a time.
///
/// Usage:
///   linedispatch                       interactive, default manifest
///   linedispatch -m cmds.toml -e "greet bob" -e "greet alice 3"
///
/// Manifest location defaults to `<config dir>/linedispatch/commands.toml`.
#[derive(Parser, Debug)]
#[command(name = "linedispatch", version, about = "Dispatch input lines to manifest commands")]
struct Cli {
    /// Command manifest to load
    #[arg(short, long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dispatch LINE and exit instead of reading stdin (repeatable)
    #[arg(short = 'e', long = "exec", value_name = "LINE")]
    exec: Vec<String>,

    /// User name carried in the session context (default: $USER)
    #[arg(short, long, value_name = "NAME")]
    user: Option<String>,

    /// Print errors as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let manifest = match load_manifest(cli.manifest.as_deref()) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let sink: ReplySink = Arc::new(|line| println!("{line}"));
    let mut registrar = Registrar::new();
    if let Err(e) = registrar.register(manifest.into_specs(sink)) {
        eprintln!("Failed to register commands: {e}");
        std::process::exit(2);
    }
    let dispatcher = AsyncDispatcher::new(registrar.finish());

    let user = cli
        .user
        .clone()
        .or_else(|| std::env::var("USER").ok().filter(|u| !u.trim().is_empty()))
        .unwrap_or_else(|| "anonymous".to_string());
    let session = Session::new(user).into_value();

    if !cli.exec.is_empty() {
        let mut failed = false;
        for line in &cli.exec {
            if let Err(err) = dispatcher.spawn(Some(session.clone()), line.as_str()).await {
                report(cli.json, &err);
                failed = true;
            }
        }
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    repl(&dispatcher, &session, &manifest.settings.prompt, cli.json).await
}

fn load_manifest(path: Option<&Path>) -> Result<Manifest, ManifestError> {
    match path {
        Some(path) => Manifest::load_from(path),
        None => Manifest::load(),
    }
}

async fn repl(dispatcher: &AsyncDispatcher, session: &Value, prompt: &str, json: bool) -> Result<()> {
    let interactive = std::io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if interactive {
            print!("{prompt}");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = dispatcher.spawn(Some(session.clone()), line).await {
            report(json, &err);
        }
    }

    Ok(())
}

fn report(json: bool, err: &DispatchError) {
    if json {
        let value = serde_json::json!({
            "status": "error",
            "type": err.error_type(),
            "error": err.to_string(),
            "input": err.input(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        );
    } else {
        eprintln!("error: {err}");
    }
}
