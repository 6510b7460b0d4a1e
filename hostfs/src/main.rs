use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Confirm, Select, theme::ColorfulTheme};
use hostfs_core::{HostEnv, HostFs, SystemVolumes, format_size};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "hostfs")]
#[command(about = "Inspect drives, list directories, and convert paths", version)]
struct Cli {
    /// Use this home directory instead of the detected one
    #[arg(long, global = true, env = "HOSTFS_HOME")]
    home: Option<PathBuf>,

    /// Use this OS name instead of the detected one (e.g. "Windows 11")
    #[arg(long, global = true, env = "HOSTFS_OS_NAME")]
    os_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List browsable drives and their labels
    Drives {
        /// Also show volumes that were skipped
        #[arg(short, long)]
        verbose: bool,
    },
    /// List the files and subdirectories of a directory
    Ls {
        /// Directory to list; pick a drive interactively if omitted
        dir: Option<PathBuf>,

        /// Only list files
        #[arg(long, conflicts_with = "dirs_only")]
        files_only: bool,

        /// Only list directories
        #[arg(long)]
        dirs_only: bool,
    },
    /// Convert a host path to the portable form
    Normalize {
        #[arg(required = true)]
        path: String,
    },
    /// Convert a portable path to the host form
    Denormalize {
        #[arg(required = true)]
        path: String,
    },
    /// Delete a file or directory tree
    Rm {
        #[arg(required = true)]
        path: PathBuf,

        /// Do not ask for confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

/// Builds the host environment, letting command-line overrides win.
fn host_env(cli: &Cli) -> Result<HostEnv> {
    let env = match (HostEnv::detect(), &cli.home) {
        (Ok(env), _) => env,
        // The override makes a missing home directory irrelevant.
        (Err(_), Some(home)) => HostEnv::new(home, std::env::consts::OS),
        (Err(e), None) => return Err(e.into()),
    };

    let env = match &cli.home {
        Some(home) => env.with_home_dir(home),
        None => env,
    };
    let env = match &cli.os_name {
        Some(os_name) => env.with_os_name(os_name),
        None => env,
    };

    log::debug!("using host '{}' with home {}", env.os_name(), env.home_dir().display());
    Ok(env)
}

/// The label shown for a drive; volumes without a label get a placeholder.
fn display_label(host: &HostFs, drive: &str) -> String {
    let label = host.drive_label(drive);
    if label.is_empty() {
        format!("Drive ({drive})")
    } else {
        label
    }
}

/// Presents an interactive menu for the user to select a drive.
fn select_drive(host: &HostFs, prompt: &str) -> Result<String> {
    let drives = host.list_drives().drives;
    if drives.is_empty() {
        return Err(anyhow!("No drives found."));
    }

    let items: Vec<String> = drives
        .iter()
        .map(|d| format!("{:<30} {}", d, display_label(host, d)))
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;

    Ok(drives[selection].clone())
}

/// Presents a final "Yes/No" confirmation to the user.
fn confirm_operation(prompt: &str) -> Result<bool> {
    let confirmation = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;

    Ok(confirmation)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let host: HostFs<SystemVolumes> = HostFs::new(host_env(&cli)?, SystemVolumes);

    match cli.command {
        Commands::Drives { verbose } => {
            let scan = host.list_drives();

            println!("Found {} drives:", scan.drives.len());
            println!(
                "\n  {:<30} {:<20} {:>12} {:>12}",
                "DRIVE", "LABEL", "TOTAL", "FREE"
            );
            println!("  {:-<30} {:-<20} {:->12} {:->12}", "", "", "", "");
            for drive in &scan.drives {
                let (total, free) = match host.drive_space(drive) {
                    Ok(space) => (format_size(space.total), format_size(space.free)),
                    Err(e) => {
                        log::debug!("{}", e);
                        ("-".to_string(), "-".to_string())
                    }
                };
                println!(
                    "  {:<30} {:<20} {:>12} {:>12}",
                    drive,
                    display_label(&host, drive),
                    total,
                    free
                );
            }

            if verbose && !scan.skipped.is_empty() {
                println!("\nSkipped {} volumes:", scan.skipped.len());
                for skipped in &scan.skipped {
                    println!("  {}", style(skipped).dim());
                }
            }
        }
        Commands::Ls {
            dir,
            files_only,
            dirs_only,
        } => {
            let dir = match dir {
                Some(dir) => dir,
                None => host.drive_root(&select_drive(&host, "Select the drive to list")?),
            };

            if !files_only {
                for name in host.directories_in(&dir)? {
                    println!("{}", style(format!("{name}/")).blue().bold());
                }
            }
            if !dirs_only {
                for name in host.files_in(&dir)? {
                    println!("{name}");
                }
            }
        }
        Commands::Normalize { path } => {
            println!("{}", host.normalize_path(&path));
        }
        Commands::Denormalize { path } => {
            println!("{}", host.denormalize_path(&path));
        }
        Commands::Rm { path, yes } => {
            if !path.exists() && !path.is_symlink() {
                return Err(anyhow!("{} does not exist.", path.display()));
            }

            println!(
                "{} This will permanently delete '{}' and everything beneath it.",
                style("WARNING:").red().bold(),
                style(path.display()).cyan(),
            );
            println!();

            if !yes && !confirm_operation("Are you sure you want to proceed?")? {
                println!("Delete operation cancelled.");
                return Ok(());
            }

            // This flag allows for graceful cancellation of the deletion.
            let running = Arc::new(AtomicBool::new(true));
            let r = running.clone();

            // Set up the Ctrl+C handler to toggle the `running` flag.
            ctrlc::set_handler(move || {
                r.store(false, Ordering::SeqCst);
            })?;

            let delete_pb = ProgressBar::new_spinner();
            delete_pb.set_prefix("Deleting");
            delete_pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{prefix:12} [{elapsed_precise}] {spinner:.red} {pos} removed {wide_msg}")?,
            );
            delete_pb.enable_steady_tick(Duration::from_millis(100));

            let report = host.delete_path_with_progress(&path, running, |removed| {
                delete_pb.inc(1);
                delete_pb.set_message(removed.display().to_string());
            });

            if report.is_complete() {
                delete_pb.finish_with_message("Delete complete.");
                println!(
                    "\n✨ Successfully deleted {} ({} entries).",
                    style(path.display()).cyan(),
                    report.removed
                );
                return Ok(());
            }

            delete_pb.finish_with_message("❌ Operation incomplete.");
            for failure in &report.failures {
                eprintln!("  {} {}", style("failed:").red(), failure);
            }
            if report.cancelled {
                return Err(anyhow!(
                    "Operation cancelled by user after removing {} entries",
                    report.removed
                ));
            }
            return Err(anyhow!(
                "Could not delete {} of the entries under {}",
                report.failures.len(),
                path.display()
            ));
        }
    }

    Ok(())
}
