use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use ucsm_api::{
    config::{BootMode, BootPolicyProps, YesNo},
    constants::UCSMKIT_CONFIG_PATH_DEFAULT,
};

use crate::UCSMKIT_VERSION;

#[derive(Parser, Debug)]
#[clap(version = UCSMKIT_VERSION)]
pub struct Cli {
    /// Logging verbosity [OFF, ERROR, WARN, INFO, DEBUG, TRACE]
    #[arg(global = true, short, long, default_value_t = LevelFilter::Info)]
    pub verbosity: LevelFilter,

    /// Path to the configuration file
    #[arg(global = true, short, long, default_value = UCSMKIT_CONFIG_PATH_DEFAULT)]
    pub config: PathBuf,

    /// Path to the object store, overriding the configuration file
    #[arg(global = true, long)]
    pub store: Option<PathBuf>,

    /// DN of the organization holding the policy, overriding the
    /// configuration file
    #[arg(global = true, long)]
    pub org: Option<String>,

    /// Path to write a JSON lines log of this invocation
    #[arg(global = true, long)]
    pub log_file: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage boot policies
    #[clap(subcommand)]
    Policy(PolicyCommand),

    /// Manage the boot order of a policy
    #[clap(subcommand)]
    Order(OrderCommand),

    /// Manage the boot security of a UEFI policy
    #[clap(subcommand)]
    Security(SecurityCommand),

    /// Print a subtree of the object store
    Show {
        /// DN of the subtree root
        dn: String,

        /// Print an indented listing instead of YAML
        #[clap(long)]
        text: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PolicyCommand {
    /// Create a boot policy, or update it if it exists
    Create {
        name: String,
        #[clap(flatten)]
        props: PolicyArgs,
    },

    /// Print a boot policy
    Get { name: String },

    /// Check whether a boot policy exists with the given properties
    Exists {
        name: String,
        #[clap(flatten)]
        props: PolicyArgs,
    },

    /// Change properties of an existing boot policy
    Modify {
        name: String,
        #[clap(flatten)]
        props: PolicyArgs,
    },

    /// Delete a boot policy
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// Replace the boot order of a policy with a device list
    Set {
        name: String,

        /// YAML file holding the device list
        devices: PathBuf,
    },

    /// Check whether the boot order of a policy matches a device list
    Exists {
        name: String,

        /// YAML file holding the device list
        devices: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum SecurityCommand {
    /// Turn secure boot on
    Enable { name: String },

    /// Turn secure boot off
    Disable { name: String },

    /// Check whether secure boot is on
    Exists { name: String },
}

/// Boot policy properties settable from the command line.
#[derive(Args, Debug, Default, Clone)]
pub struct PolicyArgs {
    /// Boot mode [legacy, uefi]
    #[clap(long)]
    pub boot_mode: Option<BootMode>,

    /// Reboot servers when the policy changes [yes, no]
    #[clap(long)]
    pub reboot_on_update: Option<YesNo>,

    /// Enforce vNIC names [yes, no]
    #[clap(long)]
    pub enforce_vnic_name: Option<YesNo>,

    #[clap(long)]
    pub policy_owner: Option<String>,

    #[clap(long)]
    pub description: Option<String>,
}

impl From<&PolicyArgs> for BootPolicyProps {
    fn from(args: &PolicyArgs) -> Self {
        Self {
            reboot_on_update: args.reboot_on_update,
            enforce_vnic_name: args.enforce_vnic_name,
            boot_mode: args.boot_mode,
            policy_owner: args.policy_owner.clone(),
            description: args.description.clone(),
        }
    }
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Policy(PolicyCommand::Create { .. }) => "policy create",
            Commands::Policy(PolicyCommand::Get { .. }) => "policy get",
            Commands::Policy(PolicyCommand::Exists { .. }) => "policy exists",
            Commands::Policy(PolicyCommand::Modify { .. }) => "policy modify",
            Commands::Policy(PolicyCommand::Delete { .. }) => "policy delete",
            Commands::Order(OrderCommand::Set { .. }) => "order set",
            Commands::Order(OrderCommand::Exists { .. }) => "order exists",
            Commands::Security(SecurityCommand::Enable { .. }) => "security enable",
            Commands::Security(SecurityCommand::Disable { .. }) => "security disable",
            Commands::Security(SecurityCommand::Exists { .. }) => "security exists",
            Commands::Show { .. } => "show",
        }
    }

    /// Whether the command may change the store.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Policy(
                PolicyCommand::Create { .. }
                    | PolicyCommand::Modify { .. }
                    | PolicyCommand::Delete { .. }
            ) | Commands::Order(OrderCommand::Set { .. })
                | Commands::Security(SecurityCommand::Enable { .. } | SecurityCommand::Disable { .. })
        )
    }
}

impl Display for Commands {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}
