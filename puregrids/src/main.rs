use clap::{Parser, ValueEnum};
use puregrids_lib::config::{GridConfig, OptionOverrides};
use puregrids_lib::grid_generate::pure_grid;
use puregrids_lib::{BreakpointDescriptor, OutputFormat};
use std::fs;
use std::path::PathBuf;

const PUREGRIDS_INTRO: &str = r#"
     ___                  ___     _    _
    | _ \_  _ _ _ ___    / __|_ _(_)__| |___
    |  _/ || | '_/ -_)  | (_ | '_| / _` (_-<
    |_|  \_,_|_| \___|   \___|_| |_\__,_/__/

    Grid unit CSS, one fraction at a time.
"#;

/// Used when neither the command line nor the config names a column count.
const DEFAULT_COLUMNS: i64 = 12;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Indented CSS.
    Css,
    /// Minified CSS.
    Min,
    /// The stylesheet node tree as JSON.
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Css => OutputFormat::Css,
            Format::Min => OutputFormat::Minified,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "PureGrids")]
#[command(about = "Generate grid unit CSS from column counts and breakpoints")]
struct Args {
    /// Column counts, e.g. `5 12 24`. Defaults to 12.
    columns: Vec<i64>,

    /// JSON grid config; command line values take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file name. Writes to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Selector prefix, e.g. `.col-`.
    #[arg(long)]
    prefix: Option<String>,

    /// Fractional digits for non-integer percentages.
    #[arg(long)]
    decimals: Option<usize>,

    /// Skip the `*width` declarations.
    #[arg(long)]
    no_old_ie_widths: bool,

    /// Skip `*display: inline` and `zoom: 1` on the base rule.
    #[arg(long)]
    no_old_ie_display: bool,

    #[arg(long)]
    no_reduced_fractions: bool,

    /// Write reduced whole units as `N-1` instead of `N`.
    #[arg(long)]
    no_whole_numbers: bool,

    /// Named breakpoint as NAME=CONDITION, e.g. `sm=(min-width: 480px)`.
    #[arg(short, long = "breakpoint", value_parser = parse_breakpoint)]
    breakpoints: Vec<(String, String)>,

    /// Breakpoint descriptor as MIN:MAX:GRIDNAME; any part may be empty.
    #[arg(long = "media", value_parser = parse_descriptor)]
    media_queries: Vec<BreakpointDescriptor>,

    #[arg(long, value_enum, default_value_t = Format::Css)]
    format: Format,

    /// Log generation details.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_breakpoint(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, condition)) if !name.trim().is_empty() && !condition.trim().is_empty() => {
            Ok((name.trim().to_string(), condition.trim().to_string()))
        }
        _ => Err(format!("expected NAME=CONDITION, got `{}`", raw)),
    }
}

fn parse_descriptor(raw: &str) -> Result<BreakpointDescriptor, String> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let [min_width, max_width, grid_name] = parts.as_slice() else {
        return Err(format!("expected MIN:MAX:GRIDNAME, got `{}`", raw));
    };
    Ok(BreakpointDescriptor::new(
        non_empty(min_width),
        non_empty(max_width),
        non_empty(grid_name),
    ))
}

fn non_empty(part: &str) -> Option<&str> {
    if part.is_empty() {
        None
    } else {
        Some(part)
    }
}

impl Args {
    fn overrides(&self) -> OptionOverrides {
        let disabled = |flag: bool| if flag { Some(false) } else { None };
        OptionOverrides {
            decimals: self.decimals,
            include_old_ie_widths: disabled(self.no_old_ie_widths),
            include_old_ie_display: disabled(self.no_old_ie_display),
            include_reduced_fractions: disabled(self.no_reduced_fractions),
            include_whole_numbers: disabled(self.no_whole_numbers),
            selector_prefix: self.prefix.clone(),
        }
    }

    /// The config file (if any) with the command line layered on top.
    fn into_config(self) -> Result<GridConfig, String> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .map_err(|e| format!("Error reading config {}: {}", path.display(), e))?;
                GridConfig::from_json_str(&json).map_err(|e| e.to_string())?
            }
            None => GridConfig::default(),
        };

        config.options.merge(self.overrides());

        if !self.columns.is_empty() {
            config.columns = self.columns;
        }
        if config.columns.is_empty() {
            config.columns = vec![DEFAULT_COLUMNS];
        }

        config.breakpoints.extend(self.breakpoints);
        config.media_queries.extend(self.media_queries);
        Ok(config)
    }
}

fn run(args: Args) -> Result<(), String> {
    let format = OutputFormat::from(args.format);
    let output = args.output.clone();
    let config = args.into_config()?;

    let css = pure_grid::generate_to_string(&config, format).map_err(|e| e.to_string())?;

    match output {
        Some(path) => {
            println!("{}", PUREGRIDS_INTRO);
            fs::write(&path, css)
                .map_err(|e| format!("Error writing {}: {}", path.display(), e))?;
            println!("{} was saved!", path.display());
        }
        None => print!("{}", css),
    }
    Ok(())
}

fn main() {
    // parse the args given in terminal
    let args: Args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(args) {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
