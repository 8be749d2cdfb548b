use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vaj",
    about = "Versioned Artifact Journal: deployment history for smart contracts",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Journal root directory (overrides the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// TOML file with store settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show every recorded deployment
    Show(ShowArgs),
    /// Print the address of one version
    Get(GetArgs),
    /// Record a deployed version from local build files
    Add(AddArgs),
    /// Regenerate the type declaration file
    Types(TypesArgs),
    /// Check the journal against the artifact directories
    Verify(VerifyArgs),
    /// Delete the whole journal and all artifacts
    Reset(ResetArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    /// Only show this network
    pub network: Option<String>,
}

#[derive(Args)]
pub struct GetArgs {
    pub network: String,
    pub contract: String,
    pub alias: String,
    /// Version tag; defaults to the last recorded version
    pub version: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    pub network: String,
    pub contract: String,
    pub alias: String,
    /// Explicit version tag; `latest` or omitted picks the next `v_N`
    #[arg(long)]
    pub version: Option<String>,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub code_hash: String,
    /// Path to the ABI JSON file
    #[arg(long)]
    pub abi: PathBuf,
    /// Path to the compiled image
    #[arg(long)]
    pub tvc: PathBuf,
    /// Path to the bytecode file
    #[arg(long)]
    pub code: PathBuf,
    /// Init parameters as JSON
    #[arg(long)]
    pub init_params: Option<String>,
    /// Constructor parameters as JSON
    #[arg(long)]
    pub constructor_params: Option<String>,
    #[arg(long)]
    pub public_key: Option<String>,
}

#[derive(Args)]
pub struct TypesArgs {}

#[derive(Args)]
pub struct VerifyArgs {}

#[derive(Args)]
pub struct ResetArgs {
    /// Confirm deletion
    #[arg(long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_show() {
        let cli = Cli::try_parse_from(["vaj", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show(ShowArgs { network: None })));
    }

    #[test]
    fn parse_show_network_json() {
        let cli = Cli::try_parse_from(["vaj", "--format", "json", "show", "local"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        if let Command::Show(args) = cli.command {
            assert_eq!(args.network, Some("local".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_get_without_version() {
        let cli = Cli::try_parse_from(["vaj", "get", "local", "Sample", "SampleA"]).unwrap();
        if let Command::Get(args) = cli.command {
            assert_eq!(args.contract, "Sample");
            assert!(args.version.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_add() {
        let cli = Cli::try_parse_from([
            "vaj", "add", "local", "Sample", "SampleA",
            "--address", "0:abc", "--code-hash", "h1",
            "--abi", "Sample.abi.json", "--tvc", "Sample.tvc", "--code", "Sample.code",
            "--init-params", "{\"_nonce\":0}", "--version", "prod",
        ]).unwrap();
        if let Command::Add(args) = cli.command {
            assert_eq!(args.address, "0:abc");
            assert_eq!(args.code_hash, "h1");
            assert_eq!(args.abi, PathBuf::from("Sample.abi.json"));
            assert_eq!(args.init_params.as_deref(), Some("{\"_nonce\":0}"));
            assert_eq!(args.version.as_deref(), Some("prod"));
            assert!(args.public_key.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_add_requires_artifacts() {
        let result = Cli::try_parse_from([
            "vaj", "add", "local", "Sample", "SampleA", "--address", "0:abc", "--code-hash", "h1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_reset_yes() {
        let cli = Cli::try_parse_from(["vaj", "reset", "--yes"]).unwrap();
        if let Command::Reset(args) = cli.command {
            assert!(args.yes);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_root_and_config() {
        let cli = Cli::try_parse_from(["vaj", "verify", "--root", "/tmp/a", "--config", "vaj.toml"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/a")));
        assert_eq!(cli.config, Some(PathBuf::from("vaj.toml")));
        assert!(matches!(cli.command, Command::Verify(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["vaj", "--verbose", "types"]).unwrap();
        assert!(cli.verbose);
    }
}
