use clap::Parser;
use libpack_lib::{Config, Layout};
use libpack_tool::config::{merge_configs, read_config_file, read_env};
use libpack_tool::fs_utils::{encode_size, total_size};
use libpack_tool::{PackError, PackageSettings, package, plan_archives};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "libpack")]
#[command(author, version, about = "Package headers and static library builds into ZIP archives", long_about = None)]
pub struct Cli {
    /// File name the library gets inside the archive (e.g. app.lib)
    pub library_file_name: Option<String>,

    /// Path to the debug build of the library
    pub debug_library_path: Option<String>,

    /// Path to the release build of the library
    pub release_library_path: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Header directory to package [default: include]
    #[arg(short, long)]
    pub include: Option<String>,

    /// Folder the header tree is placed under inside the archive [default: include]
    #[arg(long)]
    pub include_prefix: Option<String>,

    /// Output directory, created if missing [default: package]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Archive file name template (%stem%, %lib%, %variant%, %date%, %datetime%, %unix%)
    #[arg(short = 'n', long)]
    pub archive_name: Option<String>,

    /// Write one archive per build variant instead of a combined one
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub split: bool,

    /// Store entries without compression
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub store: bool,

    /// Glob patterns of header paths to leave out (can be specified multiple times)
    #[arg(short = 'x', long)]
    pub exclude: Vec<String>,

    /// Dry run (just list archives and their entries)
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub dry: bool,

    /// Generate YAML config to stdout
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub generate_yaml_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .without_time()
        .init();

    // Step 1: Read environment
    let env_config = read_env()?;

    // Step 2: Read config file (if exists)
    let mut file_config = Config::default();
    if let Some(path) = cli.config.clone().or(env_config.config.clone()) {
        file_config = read_config_file(&path)?;
    }

    // Step 3: Merge configs: env < file < CLI
    let merged = merge_configs(env_config, file_config, cli_to_config(&cli));

    if cli.generate_yaml_config {
        let yaml = serde_yaml::to_string(&merged)?;
        println!("{yaml}");
        return Ok(());
    }

    let settings = match PackageSettings::resolve(&merged) {
        Ok(settings) => settings,
        Err(PackError::MissingSetting(name)) => {
            eprintln!(
                "Error: {name} is required (positional argument, config:{name} or LIBPACK_{})",
                name.to_uppercase()
            );
            std::process::exit(2);
        }
        Err(e @ PackError::InvalidLibraryName(_)) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    if merged.dry.unwrap_or(false) {
        println!("--- DRY RUN ---");
        for plan in plan_archives(&settings)? {
            let total = total_size(&plan.entries)?;
            println!(
                "{} ({} entries, {})",
                plan.path.display(),
                plan.entries.len(),
                encode_size(total)
            );
            for entry in &plan.entries {
                println!("  {} -> {}", entry.path.display(), entry.name_in_archive);
            }
        }
        return Ok(());
    }

    for report in package(&settings)? {
        println!(
            "{}: {} entries, {}",
            report.path.display(),
            report.entries,
            encode_size(report.bytes)
        );
    }
    Ok(())
}

/// Converts CLI struct into Config
fn cli_to_config(cli: &Cli) -> Config {
    Config {
        config: cli.config.clone(),
        include_directory: cli.include.clone(),
        include_prefix: cli.include_prefix.clone(),
        output_directory: cli.output.clone(),
        archive_name: cli.archive_name.clone(),
        library_file_name: cli.library_file_name.clone(),
        debug_library_path: cli.debug_library_path.clone(),
        release_library_path: cli.release_library_path.clone(),
        layout: cli.split.then_some(Layout::Split),
        exclude: if cli.exclude.is_empty() {
            None
        } else {
            Some(cli.exclude.clone())
        },
        compress: cli.store.then_some(false),
        dry: cli.dry.then_some(true),
    }
}
