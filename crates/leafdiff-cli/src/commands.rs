use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use leafdiff_diff::{deep_equal, DiffConfig, Differ, Patch, PatchEntry, TreeNode};

use crate::cli::*;

/// Run a command, returning the process exit code.
pub fn run_command(cli: Cli) -> anyhow::Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Diff(args) => cmd_diff(args, config, cli.format),
        Command::Equal(args) => cmd_equal(args, cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DiffConfig> {
    let Some(path) = path else {
        return Ok(DiffConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: DiffConfig =
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_tree(path: &Path) -> anyhow::Result<TreeNode> {
    let text = read_text(path)?;
    TreeNode::parse(&text).with_context(|| format!("parsing {}", path.display()))
}

fn cmd_diff(args: DiffArgs, mut config: DiffConfig, format: OutputFormat) -> anyhow::Result<i32> {
    if args.max_depth.is_some() {
        config.max_depth = args.max_depth;
    }
    let old = read_text(&args.old)?;
    let current = read_text(&args.current)?;
    let patch = Differ::new(config)
        .find_changed_fields(&old, &current)
        .with_context(|| format!("diffing {} against {}", args.old.display(), args.current.display()))?;
    print!("{}", render_patch(&patch, format)?);
    Ok(0)
}

fn cmd_equal(args: EqualArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let left = read_tree(&args.left)?;
    let right = read_tree(&args.right)?;
    let equal = deep_equal(Some(&left), Some(&right));
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "equal": equal })),
        OutputFormat::Text if equal => println!("{} Documents are equal.", "✓".green().bold()),
        OutputFormat::Text => println!("{} Documents differ.", "✗".red().bold()),
    }
    Ok(if equal { 0 } else { 1 })
}

pub fn render_patch(patch: &Patch, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", patch.to_json_pretty()?)),
        OutputFormat::Text => {
            if patch.is_empty() {
                return Ok("No changes.\n".to_string());
            }
            let mut out = String::new();
            for (path, entry) in patch {
                let path = if path.is_root() { "(root)".to_string() } else { path.to_string() };
                match entry {
                    PatchEntry::Set(value) => {
                        out.push_str(&format!("  {} {} = {}\n", "set".green(), path.bold(), value));
                    }
                    PatchEntry::Clear => {
                        out.push_str(&format!("  {} {}\n", "clear".red(), path.bold()));
                    }
                }
            }
            out.push_str(&format!(
                "{} set, {} cleared\n",
                patch.set_count(),
                patch.clear_count()
            ));
            Ok(out)
        }
    }
}
