use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use owlbot_diff::{
    extract_library_name, generate_diff, load_from_path, GenerationConfig, OwlbotConfig,
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name matched (case-insensitively) under the input tree.
const OWLBOT_FILE_NAME: &str = ".owlbot-hermetic.yaml";

/// Where the mutated generation config lands after a `--config` run.
const AUGMENTED_CONFIG_NAME: &str = "config_augmented.yaml";

#[derive(Parser)]
#[command(name = "owlbot-diff")]
#[command(about = "Compare .owlbot-hermetic.yaml files in two directory trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the generated configs to check
    input_dir: PathBuf,

    /// Baseline directory holding the original configs
    original_dir: PathBuf,

    /// Print per-file differences
    #[arg(short, long)]
    diff: bool,

    /// Generation config to fold discovered differences into
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A bad config path is the one fatal input error; everything during the
    // walk itself degrades to skip-and-warn.
    let mut generation_config = match &cli.config {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("generation config {} does not exist", path.display());
            }
            println!("Generation config path: {}", path.display());
            Some(GenerationConfig::from_yaml(path)?)
        }
        None => None,
    };

    let report = compare_owlbot_trees(
        &cli.input_dir,
        &cli.original_dir,
        cli.diff,
        generation_config.as_mut(),
    )?;

    println!();
    if report.differing.is_empty() {
        println!("No YAML differences found.");
    } else {
        println!(
            "{}",
            "Files with YAML differences (relative to input):".bold()
        );
        for path in &report.differing {
            println!("  {}", path.display());
        }
        println!(
            "\nTotal YAML differences found: {}",
            format!("{}", report.differing.len()).red()
        );
    }
    println!("Total files compared: {}", report.total_compared);

    if let Some(config) = generation_config {
        let output = Path::new(AUGMENTED_CONFIG_NAME);
        config.write_to_yaml(output)?;
        println!("Wrote augmented generation config to {}", output.display());
    }

    Ok(())
}

struct CompareReport {
    /// Count of owlbot files found under the input tree, including pairs
    /// that were skipped with a warning.
    total_compared: usize,
    /// Relative paths whose configs differed, in traversal order.
    differing: Vec<PathBuf>,
}

/// Walk `input_dir` for owlbot configs, compare each against its
/// counterpart at the same relative path under `original_dir`, and report.
///
/// Missing counterparts and unparseable files are warned about and
/// skipped. Diffs are generated for unequal pairs whenever they are needed
/// for output (`show_diff`) or for registry updates (a generation config
/// was supplied); only `show_diff` controls printing.
fn compare_owlbot_trees(
    input_dir: &Path,
    original_dir: &Path,
    show_diff: bool,
    mut generation_config: Option<&mut GenerationConfig>,
) -> Result<CompareReport> {
    let mut owlbot_files = Vec::new();
    for entry in WalkDir::new(input_dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry
                .path()
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.eq_ignore_ascii_case(OWLBOT_FILE_NAME))
        {
            owlbot_files.push(entry.path().to_path_buf());
        }
    }
    owlbot_files.sort();

    let mut report = CompareReport {
        total_compared: 0,
        differing: Vec::new(),
    };

    for input_path in owlbot_files {
        report.total_compared += 1;

        let relative = input_path
            .strip_prefix(input_dir)
            .expect("walked path is under input_dir")
            .to_path_buf();
        let original_path = original_dir.join(&relative);

        if !original_path.exists() {
            eprintln!(
                "{}",
                format!(
                    "Warning: corresponding original file not found: {}",
                    original_path.display()
                )
                .yellow()
            );
            continue;
        }

        let (config1, config2) = match load_pair(&input_path, &original_path) {
            Some(pair) => pair,
            None => continue,
        };

        if config1 == config2 {
            continue;
        }
        report.differing.push(relative.clone());

        if !show_diff && generation_config.is_none() {
            continue;
        }

        let library_name = extract_library_name(&relative);
        if let Some(config) = generation_config.as_deref() {
            if !config.has_library(&library_name) {
                eprintln!(
                    "{}",
                    format!(
                        "Warning: library '{}' not found in generation config, \
                         differences in {} will not be recorded",
                        library_name,
                        relative.display()
                    )
                    .yellow()
                );
            }
        }

        let lines = generate_diff(
            &config1,
            &config2,
            &library_name,
            generation_config.as_deref_mut(),
        );

        if show_diff {
            println!("\nYAML differences in: {}", relative.display());
            for line in lines {
                if line.starts_with('-') {
                    println!("{}", line.red());
                } else {
                    println!("{}", line.green());
                }
            }
        }
    }

    Ok(report)
}

/// Load both sides of a pair, warning and returning `None` if either fails.
fn load_pair(input_path: &Path, original_path: &Path) -> Option<(OwlbotConfig, OwlbotConfig)> {
    match (load_from_path(input_path), load_from_path(original_path)) {
        (Ok(config1), Ok(config2)) => Some((config1, config2)),
        (input_result, original_result) => {
            for error in [input_result.err(), original_result.err()]
                .into_iter()
                .flatten()
            {
                eprintln!("{}", format!("Warning: {}", error).yellow());
            }
            eprintln!(
                "{}",
                format!(
                    "Warning: could not compare YAML files: {} or {}",
                    input_path.display(),
                    original_path.display()
                )
                .yellow()
            );
            None
        }
    }
}
