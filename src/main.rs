use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Error};
use clap::Parser;
use log::{debug, error, info, LevelFilter};
use serde::Serialize;

use moutils::{Handle, MemoryHandle};
use ucsm_api::{
    config::BootPolicyProps,
    error::{BackendError, NotFoundError, OperationError, OperationResultExt, ReportError},
};

use ucsmkit::{
    boot,
    cli::{Cli, Commands, OrderCommand, PolicyCommand, SecurityCommand},
    config::{self, ConfigFile},
    MultiLogger, SessionLog,
};

const SHOW_CALLER: &str = "show";

/// What a command prints on success.
enum Output {
    Object(ucsm_api::ManagedObject),
    Missing,
    Flag(bool),
    Text(String),
}

struct Settings {
    store: PathBuf,
    org_dn: String,
}

fn setup_logging(args: &Cli) -> Result<(), Error> {
    let mut multilogger = MultiLogger::new()
        .with_logger(Box::new(
            env_logger::builder()
                .format_timestamp(None)
                .filter_level(args.verbosity)
                .build(),
        ))
        // Per-object store tracing stays out of every sink
        .with_target_filter("moutils::memory", LevelFilter::Debug);

    if let Some(path) = &args.log_file {
        multilogger.add_logger(
            SessionLog::create(path)
                .context("Failed to create session log")?
                .with_max_level(LevelFilter::Trace)
                .into_logger(),
        );
    }

    multilogger.init().context("Logger already registered")?;
    Ok(())
}

fn load_settings(args: &Cli) -> Result<Settings, Error> {
    let config = ConfigFile::load(&args.config)?;
    Ok(Settings {
        store: args.store.clone().unwrap_or_else(|| config.store_path()),
        org_dn: args.org.clone().unwrap_or_else(|| config.org_dn()),
    })
}

fn run_command(
    handle: &mut MemoryHandle,
    command: &Commands,
    org_dn: &str,
) -> Result<Output, Error> {
    let output = match command {
        Commands::Policy(PolicyCommand::Create { name, props }) => Output::Object(
            boot::boot_policy_create(handle, name, org_dn, &BootPolicyProps::from(props))?,
        ),
        Commands::Policy(PolicyCommand::Get { name }) => {
            match boot::boot_policy_get(handle, name, org_dn)? {
                Some(policy) => Output::Object(policy),
                None => Output::Missing,
            }
        }
        Commands::Policy(PolicyCommand::Exists { name, props }) => {
            let (exists, _) =
                boot::boot_policy_exists(handle, name, org_dn, &BootPolicyProps::from(props))?;
            Output::Flag(exists)
        }
        Commands::Policy(PolicyCommand::Modify { name, props }) => Output::Object(
            boot::boot_policy_modify(handle, name, org_dn, &BootPolicyProps::from(props))?,
        ),
        Commands::Policy(PolicyCommand::Delete { name }) => {
            Output::Object(boot::boot_policy_delete(handle, name, org_dn)?)
        }
        Commands::Order(OrderCommand::Set { name, devices }) => {
            let devices = config::load_device_list(devices)?;
            Output::Object(boot::boot_policy_order_set(
                handle, name, &devices, org_dn,
            )?)
        }
        Commands::Order(OrderCommand::Exists { name, devices }) => {
            let devices = config::load_device_list(devices)?;
            let (exists, _) = boot::boot_policy_order_exists(handle, name, &devices, org_dn);
            Output::Flag(exists)
        }
        Commands::Security(SecurityCommand::Enable { name }) => {
            Output::Object(boot::boot_security_enable(handle, name, org_dn)?)
        }
        Commands::Security(SecurityCommand::Disable { name }) => {
            Output::Object(boot::boot_security_disable(handle, name, org_dn)?)
        }
        Commands::Security(SecurityCommand::Exists { name }) => {
            let (exists, _) = boot::boot_security_exists(handle, name, org_dn)?;
            Output::Flag(exists)
        }
        Commands::Show { dn, text } => {
            let tree = show(handle, dn)?;
            if *text {
                Output::Text(tree.describe_tree())
            } else {
                Output::Object(tree)
            }
        }
    };
    Ok(output)
}

fn show(handle: &dyn Handle, dn: &str) -> Result<ucsm_api::ManagedObject, OperationError> {
    handle
        .query_hierarchy(dn)
        .structured(
            SHOW_CALLER,
            BackendError::QueryHierarchy { dn: dn.to_string() },
        )?
        .structured(
            SHOW_CALLER,
            NotFoundError::ManagedObject { dn: dn.to_string() },
        )
        .message("Nothing to show")
}

fn print_output(output: &Output) -> Result<(), Error> {
    match output {
        Output::Object(mo) => print_yaml(mo)?,
        Output::Missing => println!("null"),
        Output::Flag(flag) => println!("{flag}"),
        Output::Text(text) => print!("{text}"),
    }
    Ok(())
}

fn print_yaml(value: &impl Serialize) -> Result<(), Error> {
    print!(
        "{}",
        serde_yaml::to_string(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn main() -> ExitCode {
    // Parse args
    let args = Cli::parse();

    if let Err(e) = setup_logging(&args) {
        eprintln!("Failed to initialize logging: {e:?}");
        return ExitCode::from(1);
    }

    info!("ucsmkit version: {}", ucsmkit::UCSMKIT_VERSION);

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {e:?}");
            return ExitCode::from(1);
        }
    };
    debug!(
        "Using store '{}' and org '{}'",
        settings.store.display(),
        settings.org_dn
    );

    let mut handle = match MemoryHandle::load(&settings.store) {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to open store: {e:?}");
            return ExitCode::from(1);
        }
    };

    let output = match run_command(&mut handle, &args.command, &settings.org_dn)
        .context(format!("Failed to execute '{}' command", args.command))
    {
        Ok(output) => output,
        Err(e) => {
            error!("{e:?}");
            return ExitCode::from(2);
        }
    };

    if args.command.mutates() {
        if let Err(e) = handle.save(&settings.store) {
            error!("Failed to save store: {e:?}");
            return ExitCode::from(2);
        }
    }

    if let Err(e) = print_output(&output) {
        error!("{e:?}");
        return ExitCode::from(2);
    }

    ExitCode::SUCCESS
}
