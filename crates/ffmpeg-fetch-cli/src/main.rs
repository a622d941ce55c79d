use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use ffmpeg_fetch_core::{
    canonical_arch_name, canonical_platform_name, host_arch_name, host_platform_name,
    MatrixFilter, PLATFORM_MATRIX,
};
use ffmpeg_fetch_installer::{
    http_client, run_install, run_matrix, ArtifactDirMode, ArtifactLayout, FetchConfig,
    InstallOutcome, LiveHooks, MatrixReport, ProcessEnv,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod render;

use render::{render_section_header, render_status_line, resolve_output_style, OutputStyle};

const LOG_ENV: &str = "FFMPEG_FETCH_LOG";

#[derive(Parser, Debug)]
#[command(name = "ffmpeg-fetch")]
#[command(about = "Download and install prebuilt ffmpeg binaries", long_about = None)]
struct Cli {
    /// Directory holding package.json, downloads/ and artifacts/.
    #[arg(long, global = true, default_value = ".")]
    package_root: PathBuf,
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    artifact_dir: Option<PathBuf>,
    /// Config file; defaults to <package-root>/ffmpeg-fetch.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    plain: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch and extract ffmpeg for every supported platform, or the selected one.
    Download {
        platform: Option<String>,
        arch: Option<String>,
        /// Keep previously extracted artifacts instead of wiping the directory.
        #[arg(long)]
        keep_artifacts: bool,
    },
    /// Install the release binary for this host.
    Install,
    /// Print where the ffmpeg artifact for a platform lives.
    Path {
        platform: Option<String>,
        arch: Option<String>,
    },
    /// Show the supported platform matrix.
    Matrix,
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run_cli(cli)
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn default_log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    let style = resolve_output_style(
        io::stdout().is_terminal(),
        cli.plain,
        std::env::var_os("NO_COLOR").is_some(),
    );

    match &cli.command {
        Commands::Download {
            platform,
            arch,
            keep_artifacts,
        } => {
            let config = load_config(&cli)?;
            let layout = build_layout(&cli, &config);
            let filter = MatrixFilter::new(platform.as_deref(), arch.as_deref());
            let mode = if *keep_artifacts {
                ArtifactDirMode::Preserve
            } else {
                ArtifactDirMode::Reset
            };

            let client = http_client(&config)?;
            let mut hooks = LiveHooks::new(client);
            let report = run_matrix(&layout, &filter, &config, mode, &mut hooks)?;
            print_lines(&format_matrix_report_lines(&report, &filter, style));
        }
        Commands::Install => {
            let config = load_config(&cli)?;
            let layout = build_layout(&cli, &config);
            let client = http_client(&config)?;
            let outcome = run_install(&ProcessEnv, &cli.package_root, &layout, &client)?;
            print_lines(&format_install_outcome_lines(&outcome, style));
        }
        Commands::Path { platform, arch } => {
            let config = load_config(&cli)?;
            let layout = build_layout(&cli, &config);
            println!(
                "{}",
                resolve_artifact_path(&layout, platform.as_deref(), arch.as_deref()).display()
            );
        }
        Commands::Matrix => {
            let config = load_config(&cli)?;
            if let Some(header) = render_section_header(style, "platform matrix") {
                println!("{header}");
            }
            print_lines(&format_matrix_table_lines(&config));
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "ffmpeg-fetch", &mut io::stdout());
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<FetchConfig> {
    match &cli.config {
        Some(path) => FetchConfig::load(path),
        None => FetchConfig::load_from_package_root(&cli.package_root),
    }
}

/// Directory flags win over the config file, which wins over the defaults.
fn build_layout(cli: &Cli, config: &FetchConfig) -> ArtifactLayout {
    let configured = config.layout(&cli.package_root);
    let layout = ArtifactLayout::new(
        cli.download_dir
            .clone()
            .unwrap_or_else(|| configured.download_dir().to_path_buf()),
        cli.artifact_dir
            .clone()
            .unwrap_or_else(|| configured.artifact_dir().to_path_buf()),
    );
    debug!(
        download_dir = %layout.download_dir().display(),
        artifact_dir = %layout.artifact_dir().display(),
        "resolved artifact layout"
    );
    layout
}

fn resolve_artifact_path(
    layout: &ArtifactLayout,
    platform: Option<&str>,
    arch: Option<&str>,
) -> PathBuf {
    let platform = platform
        .map(canonical_platform_name)
        .unwrap_or_else(host_platform_name);
    let arch = arch.map(canonical_arch_name).unwrap_or_else(host_arch_name);
    layout.artifact_path(&platform, &arch)
}

fn format_matrix_report_lines(
    report: &MatrixReport,
    filter: &MatrixFilter,
    style: OutputStyle,
) -> Vec<String> {
    if report.is_empty() {
        return vec![render_status_line(
            style,
            "warn",
            &format!(
                "no supported platform matches platform={} arch={}",
                filter.platform().unwrap_or("*"),
                filter.arch().unwrap_or("*")
            ),
        )];
    }

    report
        .outcomes
        .iter()
        .map(|outcome| {
            render_status_line(
                style,
                "ok",
                &format!(
                    "{} {} ({}) -> {}",
                    outcome.id,
                    outcome.version,
                    outcome.download_status.as_str(),
                    outcome.final_path.display()
                ),
            )
        })
        .collect()
}

fn format_install_outcome_lines(outcome: &InstallOutcome, style: OutputStyle) -> Vec<String> {
    match outcome {
        InstallOutcome::Skipped { reason } => vec![render_status_line(
            style,
            "skip",
            &format!("skipping binary installation. {}", reason),
        )],
        InstallOutcome::Installed { url, path } => vec![
            render_status_line(style, "ok", &format!("installed {}", path.display())),
            format!("source: {url}"),
        ],
    }
}

fn format_matrix_table_lines(config: &FetchConfig) -> Vec<String> {
    PLATFORM_MATRIX
        .iter()
        .map(|entry| {
            let version = config.version_for(entry);
            format!(
                "{:<13} {:<10} {:<8} {}",
                entry.id(),
                entry.extraction.as_str(),
                version,
                entry.url(&version)
            )
        })
        .collect()
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
