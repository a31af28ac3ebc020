//! Application orchestrator.
//! Loads/merges config, initializes logging, dispatches the subcommand and prints results.
//! Errors are logged once here with a stable code and returned to `main` for printing.

use anyhow::{bail, Result};
use tracing::{debug, error};

use ytool::cli::{Args, BomCommand, Command, CurlArgs, CurlCommand, EnvCommand};
use ytool::config::{load_config, CONFIG_ENV};
use ytool::curl::{self, Method};
use ytool::output as out;
use ytool::{bom, default_config_path, env, Config, YtoolError};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        return print_config();
    }

    let Some(command) = args.command.clone() else {
        bail!("no command given; run `ytool --help` for usage");
    };

    let (mut cfg, cfg_path) = load_config()?;
    args.apply_overrides(&mut cfg);

    // Held until the command returns so the file appender flushes.
    let _guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json)?;
    debug!(
        config = %cfg_path.as_deref().map(|p| p.display().to_string()).unwrap_or_default(),
        level = %cfg.log_level,
        "configuration loaded"
    );

    let result = dispatch(&cfg, command);
    if let Err(e) = &result {
        log_failure(e);
    }
    result
}

fn print_config() -> Result<()> {
    if let Some(v) = std::env::var_os(CONFIG_ENV) {
        out::print_info(&format!("using {CONFIG_ENV} (explicit): {}", v.to_string_lossy()));
    }
    let p = default_config_path()?;
    out::print_user(&p.display().to_string());
    if !p.exists() {
        out::print_info("no config file exists there yet; built-in defaults apply");
    }
    Ok(())
}

fn dispatch(cfg: &Config, command: Command) -> Result<()> {
    match command {
        Command::Env(EnvCommand::Get { name }) => {
            let value = env::lookup(&name)?;
            out::print_user(&value);
            Ok(())
        }
        Command::Curl(CurlCommand::Get(a)) => run_curl(cfg, Method::Get, &a),
        Command::Curl(CurlCommand::Post(a)) => run_curl(cfg, Method::Post, &a),
        Command::Bom(cmd) => run_bom(cfg, cmd),
    }
}

fn run_curl(cfg: &Config, method: Method, args: &CurlArgs) -> Result<()> {
    let reply = curl::execute(method, &args.invocation(), &cfg.http)?;
    if args.include {
        for line in reply.head_lines() {
            out::print_user(&line);
        }
        out::print_user("");
    }
    out::print_user(&reply.body);
    if !reply.is_success() {
        bail!("server answered {} {}", reply.status, reply.reason);
    }
    Ok(())
}

fn run_bom(cfg: &Config, cmd: BomCommand) -> Result<()> {
    let opts = cfg.rewrite_options();
    let ns = &ytool::fs_ops::StdNamespace;
    match cmd {
        BomCommand::Exist { path } => {
            if bom::detect(&path)? {
                out::print_success(&format!("{} has a BOM", path.display()));
            } else {
                out::print_info(&format!("{} has no BOM", path.display()));
            }
        }
        BomCommand::Add { path } => {
            let outcome = bom::add_marker_with(ns, &path, opts)?;
            warn_leftover(outcome.leftover_backup.as_deref());
            out::print_success(&format!("BOM added to {}", path.display()));
        }
        BomCommand::Remove { path } => {
            let outcome = bom::remove_marker_with(ns, &path, opts)?;
            warn_leftover(outcome.leftover_backup.as_deref());
            out::print_success(&format!("BOM removed from {}", path.display()));
        }
    }
    Ok(())
}

fn warn_leftover(backup: Option<&std::path::Path>) {
    if let Some(b) = backup {
        out::print_warn(&format!(
            "the update succeeded but the backup '{}' could not be deleted; remove it manually",
            b.display()
        ));
    }
}

fn log_failure(e: &anyhow::Error) {
    if let Some(ye) = e.downcast_ref::<YtoolError>() {
        let code = ye.code();
        match ye {
            YtoolError::CommitStranded { target, backup, .. } => {
                error!(code, kind = "stranded", path = %target.display(), backup = %backup.display(), "Rewrite failed and rollback failed")
            }
            YtoolError::Commit { stage, target, .. } => {
                error!(code, kind = "commit", %stage, path = %target.display(), "Rewrite failed; original intact")
            }
            YtoolError::Precondition { path, reason } => {
                error!(code, kind = "precondition", path = %path.display(), %reason, "Refused")
            }
            _ => error!(code, kind = "bom_error", error = %ye, "BOM operation failed"),
        }
    } else if let Some(ee) = e.downcast_ref::<env::EnvLookupError>() {
        error!(code = "env", error = %ee, "Env lookup failed");
    } else {
        error!(error = ?e, "Command failed");
    }
}
