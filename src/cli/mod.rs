#![forbid(unsafe_code)]

use std::io::{self, Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{CommandFactory as _, Parser, Subcommand};
use tracing::info;

use crate::config::{self, Config, GlyphStyle};
use crate::error::TodoError;
use crate::logging;
use crate::output::table::Table;
use crate::task::list::{TodoList, Variant};
use crate::task::model::Task;
use crate::task::palette::PALETTE;
use crate::task::replay;
use crate::tui;
use crate::tui::app::AppOptions;

#[derive(Debug, Parser)]
#[command(
    name = "tinttodo",
    version,
    about = "Single-screen to-do list with color-tagged tasks"
)]
pub struct Cli {
    /// Disable color tagging for this session
    #[arg(long = "plain", global = true)]
    pub plain: bool,
    /// Use ASCII check glyphs instead of emoji
    #[arg(long = "ascii", global = true)]
    pub ascii: bool,
    /// Write logs to this file (overrides log.file)
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the color palette
    Palette(PaletteArgs),
    /// Apply a script of list operations without a terminal
    Replay(ReplayArgs),
    Config(ConfigArgs),
    Completion(CompletionArgs),
    Version,
}

#[derive(Debug, Parser)]
pub struct PaletteArgs {
    /// Output in JSON format
    #[arg(long = "json", conflicts_with = "csv")]
    pub json: bool,
    /// Output in CSV format
    #[arg(long = "csv")]
    pub csv: bool,
}

#[derive(Debug, Parser)]
pub struct ReplayArgs {
    /// Script file; reads stdin when omitted or "-"
    pub file: Option<PathBuf>,
    /// Output in JSON format
    #[arg(long = "json", conflicts_with = "csv")]
    pub json: bool,
    /// Output in CSV format
    #[arg(long = "csv")]
    pub csv: bool,
}

#[derive(Debug, Parser)]
pub struct CompletionArgs {
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub cmd: ConfigCmd,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCmd {
    List,
    Set(ConfigSetArgs),
    Get(ConfigGetArgs),
}

#[derive(Debug, Parser)]
pub struct ConfigSetArgs {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Parser)]
pub struct ConfigGetArgs {
    pub key: String,
}

#[must_use]
pub fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.cmd {
        None => cmd_default(cli.plain, cli.ascii, cli.log_file.as_deref()),
        Some(Commands::Completion(args)) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "tinttodo", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Config(args)) => match args.cmd {
            ConfigCmd::List => {
                print!("{}", config::list_resolved_toml()?);
                Ok(ExitCode::SUCCESS)
            }
            ConfigCmd::Set(set) => {
                config::set_value_string(&set.key, &set.value)?;
                println!("Set {} = {}", set.key, set.value);
                Ok(ExitCode::SUCCESS)
            }
            ConfigCmd::Get(get) => {
                let val = config::get_value_string(&get.key)?;
                match val {
                    Some(v) => {
                        println!("{v}");
                        Ok(ExitCode::SUCCESS)
                    }
                    None => anyhow::bail!(
                        "configuration key '{}' not found - use 'tinttodo config list' to see available keys",
                        get.key
                    ),
                }
            }
        },
        Some(Commands::Palette(args)) => cmd_palette(&args),
        Some(Commands::Replay(args)) => cmd_replay(&args, cli.plain, cli.log_file.as_deref()),
        Some(Commands::Version) => Ok(cmd_version()),
    }
}

/// Applies command-line overrides on top of the loaded configuration.
fn apply_flags(cfg: &mut Config, plain: bool, ascii: bool) {
    if plain {
        cfg.ui.variant = Variant::Plain;
    }
    if ascii {
        cfg.ui.glyphs = GlyphStyle::Ascii;
    }
}

fn cmd_default(plain: bool, ascii: bool, log_file: Option<&Path>) -> anyhow::Result<ExitCode> {
    let (mut cfg, _paths) = config::load()?;
    apply_flags(&mut cfg, plain, ascii);

    if !tui::is_tty() {
        return Err(TodoError::NotATty.into());
    }
    logging::init(&cfg.log, log_file)?;

    tui::app::run(AppOptions::from(&cfg))?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_palette(args: &PaletteArgs) -> anyhow::Result<ExitCode> {
    if args.json {
        let rows: Vec<serde_json::Value> = PALETTE
            .iter()
            .enumerate()
            .map(|(i, c)| {
                serde_json::json!({
                    "index": i + 1,
                    "name": c.name(),
                    "label": c.label(),
                    "hex": c.hex(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut t = Table::new(["#", "NAME", "LABEL", "HEX"]);
    for (i, c) in PALETTE.iter().enumerate() {
        t.row([(i + 1).to_string(), c.name().to_owned(), c.label().to_owned(), c.hex().to_owned()]);
    }
    if args.csv {
        t.print_csv()?;
    } else {
        t.print()?;
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_replay(args: &ReplayArgs, plain: bool, log_file: Option<&Path>) -> anyhow::Result<ExitCode> {
    let (mut cfg, _paths) = config::load()?;
    apply_flags(&mut cfg, plain, false);
    logging::init(&cfg.log, log_file)?;

    let src = read_script(args.file.as_deref(), io::stdin().lock())?;
    write_replay(args, cfg.ui.variant, &src, io::stdout().lock())?;
    Ok(ExitCode::SUCCESS)
}

fn write_replay(
    args: &ReplayArgs,
    variant: Variant,
    src: &str,
    mut out: impl io::Write,
) -> anyhow::Result<()> {
    let ops = replay::parse_script(src)?;
    let mut list = TodoList::new(variant);
    replay::run(&mut list, &ops);
    info!(ops = ops.len(), tasks = list.tasks().len(), "replay finished");

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(list.tasks())?)?;
        return Ok(());
    }

    let t = task_table(list.tasks());
    if args.csv {
        t.write_csv(&mut out)?;
    } else if t.is_empty() {
        writeln!(out, "No tasks")?;
    } else {
        t.write_plain(&mut out)?;
    }
    Ok(())
}

/// Reads the script from `path`, or from `stdin` when `path` is absent or `-`.
fn read_script(path: Option<&Path>, mut stdin: impl io::Read) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .map_err(|source| TodoError::IoPath {
                path: p.to_path_buf(),
                source,
            })
            .map_err(anyhow::Error::from),
        _ => {
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .context("failed to read script from stdin")?;
            Ok(buf)
        }
    }
}

fn task_table(tasks: &[Task]) -> Table {
    let mut t = Table::new(["#", "DONE", "TEXT", "COLOR"]);
    for (i, task) in tasks.iter().enumerate() {
        t.row([
            (i + 1).to_string(),
            if task.done { "yes" } else { "no" }.to_owned(),
            task.text.clone(),
            task.color.map_or_else(|| "-".to_owned(), |c| c.name().to_owned()),
        ]);
    }
    t
}

fn cmd_version() -> ExitCode {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "tinttodo version {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out, "  rust: {}", rustc_version_runtime::version());
    let _ = writeln!(
        out,
        "  os/arch: {}/{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::palette::TaskColor;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tinttodo", "replay", "ops.txt", "--plain", "--csv"]).unwrap();
        assert!(cli.plain);
        match cli.cmd {
            Some(Commands::Replay(args)) => {
                assert_eq!(args.file.as_deref(), Some(Path::new("ops.txt")));
                assert!(args.csv);
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn json_and_csv_conflict() {
        assert!(Cli::try_parse_from(["tinttodo", "palette", "--json", "--csv"]).is_err());
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["tinttodo", "--ascii"]).unwrap();
        assert!(cli.cmd.is_none());
        assert!(cli.ascii);
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = Config::default();
        apply_flags(&mut cfg, true, true);
        assert_eq!(cfg.ui.variant, Variant::Plain);
        assert_eq!(cfg.ui.glyphs, GlyphStyle::Ascii);

        let mut cfg = Config::default();
        apply_flags(&mut cfg, false, false);
        assert_eq!(cfg.ui.variant, Variant::Tinted);
    }

    #[test]
    fn task_table_lists_positions_and_colors() {
        let mut list = TodoList::new(Variant::Tinted);
        list.add_task("Buy milk");
        let id = list.add_task("Walk dog").unwrap();
        list.toggle_task(id);
        list.open_color_picker(Some(id));
        list.choose_color(TaskColor::Turquoise);

        let mut buf = Vec::new();
        task_table(list.tasks()).write_csv(&mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "#,DONE,TEXT,COLOR\n1,no,Buy milk,coral-red\n2,yes,Walk dog,turquoise\n"
        );
    }

    #[test]
    fn missing_script_names_the_path() {
        let err = read_script(Some(Path::new("/nonexistent/ops.txt")), io::empty()).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/ops.txt"));
    }

    fn replay_args(json: bool, csv: bool) -> ReplayArgs {
        ReplayArgs {
            file: None,
            json,
            csv,
        }
    }

    fn replay_output(args: &ReplayArgs, variant: Variant, src: &str) -> String {
        let mut buf = Vec::new();
        write_replay(args, variant, src, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn replays_a_script_file_as_a_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ops.txt");
        std::fs::write(&path, "add Buy milk\nadd Walk dog\ntoggle 2\n").unwrap();

        let src = read_script(Some(&path), io::empty()).unwrap();
        let out = replay_output(&replay_args(false, false), Variant::Tinted, &src);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "#  DONE  TEXT      COLOR");
        assert_eq!(lines[1], "1  no    Buy milk  coral-red");
        assert_eq!(lines[2], "2  yes   Walk dog  coral-red");
    }

    #[test]
    fn dash_and_missing_path_read_stdin() {
        let src = read_script(Some(Path::new("-")), "add a\n".as_bytes()).unwrap();
        assert_eq!(src, "add a\n");
        let src = read_script(None, "add b\n".as_bytes()).unwrap();
        assert_eq!(src, "add b\n");
    }

    #[test]
    fn json_output_lists_tasks() {
        let out = replay_output(
            &replay_args(true, false),
            Variant::Plain,
            "add a\nadd b\ndelete 1\n",
        );
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        let tasks = v.as_array().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0]["text"], "b");
        assert_eq!(tasks[0]["done"], false);
        assert!(tasks[0].get("color").is_none());
    }

    #[test]
    fn empty_result_prints_no_tasks() {
        let out = replay_output(&replay_args(false, false), Variant::Tinted, "add  \n# nothing\n");
        assert_eq!(out, "No tasks\n");

        let out = replay_output(&replay_args(false, true), Variant::Tinted, "");
        assert_eq!(out, "#,DONE,TEXT,COLOR\n");
    }

    #[test]
    fn bad_script_fails_before_output() {
        let mut buf = Vec::new();
        let err = write_replay(&replay_args(false, false), Variant::Tinted, "add a\nfrob 1\n", &mut buf)
            .unwrap_err();
        assert!(err.to_string().contains("replay line 2"));
        assert!(buf.is_empty());
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
