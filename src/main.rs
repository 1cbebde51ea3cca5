// src/main.rs
mod types;

use clap::Parser;
use ssh_cert_provisioner::{utils::logging, ProvisionerConfig, SecretBuilder};
use std::{
    io::{self, Write},
    path::Path,
};
use tracing::{info, warn};
use types::{Args, Command, OutputFormat};

fn load_config(args: &Args) -> io::Result<ProvisionerConfig> {
    let config = if Path::new(shellexpand::tilde(&args.config).as_ref()).exists() {
        ProvisionerConfig::load_from_file(&args.config)?
    } else {
        ProvisionerConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Runs one subcommand. Results go to `out`, notices to `notice`.
fn execute(
    command: Command,
    config: &ProvisionerConfig,
    out: &mut dyn Write,
    notice: &mut dyn Write,
) -> io::Result<()> {
    match command {
        Command::Generate { public, private } => {
            let pair = config
                .key_pair_generator()?
                .generate(Some(&public), Some(&private))?;
            writeln!(out, "{}", pair.fingerprint())?;
        }
        Command::Check {
            framework,
            framework_version,
        } => {
            let needed = config
                .mount_policy()
                .needs_mounted_ssh_certs(&framework, &framework_version);
            writeln!(out, "{}", needed)?;
        }
        Command::Secret {
            name,
            training_id,
            framework,
            framework_version,
            format,
            force,
        } => {
            if !force
                && !config
                    .mount_policy()
                    .needs_mounted_ssh_certs(&framework, &framework_version)
            {
                writeln!(
                    notice,
                    "{} {} does not need mounted SSH certs; nothing to do",
                    framework, framework_version
                )?;
                return Ok(());
            }

            let builder = SecretBuilder::new(config.key_pair_generator()?);
            let record =
                builder.build_ssh_secret(&name, &training_id, &framework, &framework_version)?;
            let manifest = record.to_manifest(Some(&config.learner_namespace));
            let rendered = match format {
                OutputFormat::Yaml => manifest.to_yaml()?,
                OutputFormat::Json => manifest.to_json()?,
            };
            write!(out, "{}", rendered)?;
            if !rendered.ends_with('\n') {
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    let config = load_config(&args)?;

    logging::init_logging(config.log_file.as_deref(), args.debug || config.debug)?;
    info!(config = %args.config, namespace = %config.learner_namespace, "starting");

    let result = execute(
        args.command,
        &config,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    if let Err(err) = result {
        warn!(error = %err, "command failed");
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}
