//! legacytxt - view legacy text as Unicode
//!
//! Reads DOS, Windows, EBCDIC, Shift JIS, UTF and historic ASCII text and
//! writes it to the terminal as UTF-8.
//!
//! # Quick Start
//!
//! ```text
//! legacytxt view readme.nfo              # CP437 by default
//! legacytxt view -i cp037 mainframe.txt  # EBCDIC
//! legacytxt view --mode ansi art.ans     # keep escape sequences
//! legacytxt table cp437 iso-8859-1       # code tables
//! legacytxt list                         # every encoding and sample
//! legacytxt info readme.nfo              # structure without converting
//! cat readme.nfo | legacytxt view -      # read standard input
//! ```
//!
//! Settings come from `~/.legacytxt/config.toml`, see [`legacytxt::config`].

use std::env;
use std::fs;
use std::io::{self, Read, Write};

use anyhow::{bail, Context};
use crossterm::tty::IsTty;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use legacytxt::codec::{self, Encoding};
use legacytxt::config::Config;
use legacytxt::{inspect, render_table, sample, ControlPolicy, Mode, Session, Swap};

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter
const LOG_ENV: &str = "LEGACYTXT_LOG";

/// Operand naming standard input
const STDIN: &str = "-";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    /// Convert files or built-in samples
    View(Vec<String>),
    /// Draw code tables
    Table(Vec<String>),
    /// List encodings and samples
    List,
    /// Describe files
    Info(Vec<String>),
    /// Print or save the configuration
    Config { save: bool },
}

/// Command line arguments, `None` where the configuration decides
#[derive(Debug, Clone, PartialEq)]
struct Args {
    command: Command,
    encoding: Option<String>,
    controls: Option<Vec<String>>,
    swap: Option<Vec<String>>,
    width: Option<usize>,
    mode: Option<Mode>,
}

fn print_version() {
    eprintln!("legacytxt {}", VERSION);
}

fn print_help() {
    eprintln!("legacytxt {} - view legacy text as Unicode", VERSION);
    eprintln!();
    eprintln!("Usage: legacytxt <COMMAND> [OPTIONS]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  view [FILE|SAMPLE]... Convert files or built-in samples to UTF-8");
    eprintln!("  table <NAME>...       Show code tables for encodings");
    eprintln!("  tables                Show the code table of every encoding that has one");
    eprintln!("  list                  List encodings and samples");
    eprintln!("  info [FILE]...        Describe line breaks, width, lines, words and SAUCE");
    eprintln!("  config [--save]       Print the configuration, or write it to disk");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -i, --input <NAME>    Encoding of the input (default: CP437)");
    eprintln!("  -c, --controls <LIST> Controls to keep: eof,tab,bell,cr,lf,bs,del,esc,ff,vt");
    eprintln!("  -x, --swap-chars <LIST>");
    eprintln!("                        Swaps: null,bar,house,pipe,root,space");
    eprintln!("  -w, --width <N>       Wrap lines at N characters, 0 to disable");
    eprintln!("      --mode <MODE>     ansi, chars, text or dump (default: text)");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  legacytxt view -c eof,tab,esc -x bar readme.nfo");
    eprintln!("  legacytxt view -i ebcdic 037");
    eprintln!("  legacytxt table cp437");
    eprintln!("  cat art.ans | legacytxt view --mode ansi");
    eprintln!();
    eprintln!("Files default to standard input, also named by -.");
    eprintln!();
    eprintln!("Configuration: ~/.legacytxt/config.toml");
    eprintln!("Logging: {}=debug", LOG_ENV);
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut command = None;
    let mut operands = Vec::new();
    let mut save = false;
    let mut parsed = Args {
        command: Command::List,
        encoding: None,
        controls: None,
        swap: None,
        width: None,
        mode: None,
    };
    let mut i = 1;

    let value = |i: usize, flag: &str| -> Result<String, String> {
        args.get(i)
            .cloned()
            .ok_or_else(|| format!("Missing value for {}", flag))
    };

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-i" | "--input" => {
                i += 1;
                parsed.encoding = Some(value(i, "--input")?);
            }
            "-c" | "--controls" => {
                i += 1;
                parsed.controls = Some(split_list(&value(i, "--controls")?));
            }
            "-x" | "--swap-chars" => {
                i += 1;
                parsed.swap = Some(split_list(&value(i, "--swap-chars")?));
            }
            "-w" | "--width" => {
                i += 1;
                let width: i64 = value(i, "--width")?
                    .parse()
                    .map_err(|_| format!("Invalid width: {}", args[i]))?;
                // negative widths disable wrapping
                parsed.width = Some(width.max(0) as usize);
            }
            "--mode" => {
                i += 1;
                let name = value(i, "--mode")?;
                parsed.mode =
                    Some(Mode::from_name(&name).ok_or_else(|| format!("Unknown mode: {}", name))?);
            }
            "--save" => {
                save = true;
            }
            arg if arg.starts_with('-') && arg != STDIN => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
            arg => {
                if command.is_none() {
                    command = Some(arg.to_string());
                } else {
                    operands.push(arg.to_string());
                }
            }
        }
        i += 1;
    }

    let files = |operands: Vec<String>| -> Vec<String> {
        if operands.is_empty() {
            vec![STDIN.to_string()]
        } else {
            operands
        }
    };

    parsed.command = match command.as_deref() {
        Some("view") => Command::View(files(operands)),
        Some("info") => Command::Info(files(operands)),
        Some("table") if operands.is_empty() => {
            return Err("table needs at least one encoding name".to_string())
        }
        Some("table") => Command::Table(operands),
        Some("tables") => Command::Table(
            codec::rows()
                .into_iter()
                .filter(|row| row.tabled)
                .map(|row| row.value.to_string())
                .collect(),
        ),
        Some("list") => Command::List,
        Some("config") => Command::Config { save },
        Some(other) => return Err(format!("Unknown command: {}. Use -h for help.", other)),
        None => return Err("Missing command".to_string()),
    };

    Ok(parsed)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let config = Config::load();
    debug!("legacytxt {} with {:?}", VERSION, config);

    match &args.command {
        Command::View(targets) => {
            check_stdin(targets)?;
            targets.iter().try_for_each(|t| run_view(&args, &config, t))
        }
        Command::Table(names) => run_table(&config, names),
        Command::List => run_list(),
        Command::Info(paths) => {
            check_stdin(paths)?;
            for (i, path) in paths.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                run_info(&args, &config, path)?;
            }
            Ok(())
        }
        Command::Config { save } => run_config(&config, *save),
    }
}

/// Refuse to wait on a terminal for input that will never be piped in.
fn check_stdin(targets: &[String]) -> anyhow::Result<()> {
    if targets.iter().any(|t| t == STDIN) && io::stdin().is_tty() {
        bail!("No input: name a file or pipe text to standard input");
    }
    Ok(())
}

/// Contents of a file, or of standard input for `-`.
fn read_input(target: &str) -> io::Result<Vec<u8>> {
    if target != STDIN {
        return fs::read(target);
    }
    let mut bytes = Vec::new();
    io::stdin().lock().read_to_end(&mut bytes)?;
    debug!("Read {} bytes from standard input", bytes.len());
    Ok(bytes)
}

/// Resolve the input encoding: flag, then fallback, then configuration.
fn input_encoding(args: &Args, config: &Config, fallback: Option<&str>) -> anyhow::Result<&'static Encoding> {
    let name = args
        .encoding
        .as_deref()
        .or(fallback)
        .unwrap_or(config.encoding.as_str());
    codec::resolve(name).with_context(|| "Use `legacytxt list` to see every encoding")
}

fn run_view(args: &Args, config: &Config, target: &str) -> anyhow::Result<()> {
    let (bytes, encoding, mode) = match read_input(target) {
        Ok(bytes) => (bytes, input_encoding(args, config, None)?, args.mode.unwrap_or_default()),
        Err(e) => {
            let Ok(sample) = sample::find(target) else {
                return Err(e).with_context(|| format!("Failed to read {}", target));
            };
            debug!("Viewing built-in sample {}", sample.name);
            (
                sample.bytes()?,
                input_encoding(args, config, Some(sample.encoding))?,
                args.mode.unwrap_or(sample.mode),
            )
        }
    };

    let policy = match &args.controls {
        Some(names) => {
            let (policy, unknown) = ControlPolicy::parse(names);
            for name in unknown {
                warn!("Unknown control name: {}", name);
            }
            policy
        }
        None => config.control_policy(),
    };
    let swaps = match &args.swap {
        Some(names) => {
            let (swaps, unknown) = Swap::parse(names);
            for name in unknown {
                warn!("Unknown swap name: {}", name);
            }
            swaps
        }
        None => config.swaps(),
    };

    let out = Session::with_encoding(&bytes, encoding)
        .controls(policy)
        .swaps(&swaps)
        .width(args.width.unwrap_or(config.width))
        .mode(mode)
        .run()
        .with_context(|| format!("Failed to convert {}", target))?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(out.to_string().as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn run_table(config: &Config, names: &[String]) -> anyhow::Result<()> {
    let color = config.table.color && io::stdout().is_tty();
    let mut stdout = io::stdout().lock();
    for (i, name) in names.iter().enumerate() {
        let table = render_table(name).with_context(|| format!("Cannot draw {}", name))?;
        if i > 0 {
            writeln!(stdout)?;
        }
        write!(stdout, "{}", table.render(color))?;
    }
    Ok(())
}

fn run_list() -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "{:<44} {:<14} {:<8} {:<12} {}",
        "Formal name", "Value", "Numeric", "Alias", "Family"
    )?;
    for row in codec::rows() {
        writeln!(
            stdout,
            "{:<44} {:<14} {:<8} {:<12} {}{}",
            row.name,
            row.value,
            row.numeric,
            row.alias,
            row.family,
            if row.tabled { "" } else { " *" }
        )?;
    }
    writeln!(stdout, "* no code table")?;
    writeln!(stdout)?;
    writeln!(stdout, "{:<10} {:<14} {:<6} {}", "Sample", "Encoding", "Mode", "Description")?;
    for s in sample::all() {
        writeln!(
            stdout,
            "{:<10} {:<14} {:<6} {}",
            s.name,
            s.encoding,
            s.mode.name(),
            s.description
        )?;
    }
    Ok(())
}

fn run_info(args: &Args, config: &Config, path: &str) -> anyhow::Result<()> {
    let bytes = read_input(path).with_context(|| format!("Failed to read {}", path))?;
    let encoding = input_encoding(args, config, None)?;
    let report = inspect(&bytes, encoding).with_context(|| format!("Failed to inspect {}", path))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "File:        {}", path)?;
    writeln!(stdout, "Encoding:    {}", report.encoding)?;
    writeln!(stdout, "Size:        {} bytes", report.bytes)?;
    writeln!(stdout, "Characters:  {}", report.runes)?;
    writeln!(stdout, "Line break:  {}", report.line_break.describe())?;
    writeln!(stdout, "Columns:     {}", report.scan.columns)?;
    writeln!(stdout, "ANSI codes:  {}", report.scan.controls)?;
    writeln!(stdout, "Lines:       {}", report.scan.lines)?;
    writeln!(stdout, "Words:       {}", report.scan.words)?;
    if let Some(sauce) = &report.sauce {
        writeln!(stdout, "SAUCE:       {}", sauce.kind())?;
        let fields = [("Title", &sauce.title), ("Author", &sauce.author), ("Group", &sauce.group)];
        for (label, value) in fields {
            if !value.is_empty() {
                writeln!(stdout, "  {:<10} {}", format!("{}:", label), value)?;
            }
        }
        if let Some(date) = sauce.iso_date() {
            writeln!(stdout, "  Date:      {}", date)?;
        }
        if let Some((width, height)) = sauce.dimensions() {
            writeln!(stdout, "  Size:      {} x {}", width, height)?;
        }
        if sauce.ice_colors() {
            writeln!(stdout, "  iCE colours")?;
        }
        if !sauce.font.is_empty() {
            writeln!(stdout, "  Font:      {}", sauce.font)?;
        }
        for line in &sauce.comments {
            writeln!(stdout, "  > {}", line)?;
        }
    }
    Ok(())
}

fn run_config(config: &Config, save: bool) -> anyhow::Result<()> {
    if save {
        let path = config.save().map_err(anyhow::Error::msg)?;
        eprintln!("Saved {}", path.display());
        return Ok(());
    }
    let text = config.to_toml().map_err(anyhow::Error::msg)?;
    if text.is_empty() {
        bail!("Empty configuration");
    }
    print!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        let mut all = vec!["legacytxt".to_string()];
        all.extend(list.iter().map(|s| s.to_string()));
        parse_args(&all)
    }

    #[test]
    fn test_view_with_flags() {
        let a = args(&["view", "-i", "cp037", "-c", "eof, esc", "-x", "bar", "-w", "80", "file.txt"]).unwrap();
        assert_eq!(a.command, Command::View(vec!["file.txt".to_string()]));
        assert_eq!(a.encoding.as_deref(), Some("cp037"));
        assert_eq!(a.controls, Some(vec!["eof".to_string(), "esc".to_string()]));
        assert_eq!(a.swap, Some(vec!["bar".to_string()]));
        assert_eq!(a.width, Some(80));
        assert_eq!(a.mode, None);
    }

    #[test]
    fn test_negative_width_disables_wrapping() {
        assert_eq!(args(&["view", "-w", "-5", "f"]).unwrap().width, Some(0));
        assert!(args(&["view", "-w", "wide", "f"]).is_err());
    }

    #[test]
    fn test_commands() {
        assert_eq!(args(&["list"]).unwrap().command, Command::List);
        assert_eq!(
            args(&["table", "cp437", "cp850"]).unwrap().command,
            Command::Table(vec!["cp437".to_string(), "cp850".to_string()])
        );
        let Command::Table(all) = args(&["tables"]).unwrap().command else {
            panic!("tables is not a table command");
        };
        assert!(all.contains(&"cp437".to_string()));
        assert!(!all.contains(&"utf-16".to_string()));
        assert_eq!(
            args(&["config", "--save"]).unwrap().command,
            Command::Config { save: true }
        );
        assert_eq!(
            args(&["view", "--mode", "ansi", "ansi"]).unwrap().mode,
            Some(Mode::Ansi)
        );
    }

    #[test]
    fn test_files_default_to_stdin() {
        assert_eq!(args(&["view"]).unwrap().command, Command::View(vec!["-".to_string()]));
        assert_eq!(args(&["info"]).unwrap().command, Command::Info(vec!["-".to_string()]));
        assert_eq!(
            args(&["view", "-i", "cp850", "-"]).unwrap().command,
            Command::View(vec!["-".to_string()])
        );
        assert_eq!(
            args(&["info", "a.nfo", "b.ans"]).unwrap().command,
            Command::Info(vec!["a.nfo".to_string(), "b.ans".to_string()])
        );
    }

    #[test]
    fn test_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["table"]).is_err());
        assert!(args(&["play"]).is_err());
        assert!(args(&["view", "--mode", "html", "f"]).is_err());
        assert!(args(&["view", "--bogus", "f"]).is_err());
    }
}
