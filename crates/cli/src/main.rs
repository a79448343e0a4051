// raci - headless RACI matrix editor
// Every editing subcommand opens the document, applies one editor command
// and saves only when something changed.

mod exit_codes;
mod logging;
mod sheet_ops;
mod view;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use raci_config::settings::{Settings, ViewPreference};
use raci_config::theme::{Palette, ThemeManager, ThemeSource};
use raci_config::ConfigError;
use raci_engine::{Document, ViewMode};
use raci_io::file_ops::{self, SaveOptions, SaveReport};
use raci_io::{svg, xlsx, DocumentError};

use exit_codes::{document_exit_code, EXIT_ERROR, EXIT_EXPORT, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use sheet_ops::{ColDirection, EditOp, RowDirection};

#[derive(Parser)]
#[command(name = "raci")]
#[command(about = "Edit RACI responsibility matrices stored as HTML tables")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/raci/settings.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Palette: light, dark, or a theme JSON file (overrides settings)
    #[arg(long, global = true, env = "RACI_THEME", value_name = "THEME")]
    theme: Option<String>,

    /// Don't write .xlsx/.svg siblings when saving
    #[arg(long, global = true)]
    no_exports: bool,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a document holding only its title
    #[command(after_help = "\
Examples:
  raci new plan.html --title 'Q3 Launch'
  raci new plan.html --force")]
    New {
        file: PathBuf,

        /// Title (default: TITLE)
        #[arg(long)]
        title: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the matrix
    Show {
        file: PathBuf,

        /// Machine-readable output
        #[arg(long)]
        json: bool,

        /// Show move/delete availability for every header
        #[arg(long)]
        expanded: bool,
    },

    /// Set the text of any cell (0,0 is the title)
    Set {
        file: PathBuf,
        row: usize,
        col: usize,
        value: String,
    },

    /// Advance a role cell to the next role
    #[command(after_help = "\
Roles cycle: (blank) -> Responsible -> Accountable -> Consulted -> Informed -> (blank)
Text that is not a role counts as blank.")]
    Cycle {
        file: PathBuf,
        row: usize,
        col: usize,

        /// Number of steps
        #[arg(long, default_value_t = 1)]
        times: usize,
    },

    /// Append a row
    AddRow {
        file: PathBuf,

        /// Row label (default: ROW <n>)
        #[arg(long)]
        label: Option<String>,
    },

    /// Append a column
    AddCol {
        file: PathBuf,

        /// Column label (default: COL <n>)
        #[arg(long)]
        label: Option<String>,
    },

    /// Delete a row (row 0 holds the column labels and can't be deleted)
    DeleteRow { file: PathBuf, row: usize },

    /// Delete a column (column 0 holds the row labels and can't be deleted)
    DeleteCol { file: PathBuf, col: usize },

    /// Swap a row with its neighbour
    MoveRow {
        file: PathBuf,
        row: usize,
        #[arg(value_enum)]
        direction: RowDirection,
    },

    /// Swap a column with its neighbour
    MoveCol {
        file: PathBuf,
        col: usize,
        #[arg(value_enum)]
        direction: ColDirection,
    },

    /// Save the document under a new name
    SaveAs { file: PathBuf, dest: PathBuf },

    /// Write spreadsheet and/or image exports
    #[command(after_help = "\
Without --xlsx/--svg both exports are written next to the document.")]
    Export {
        file: PathBuf,

        /// Spreadsheet output path
        #[arg(long, value_name = "PATH")]
        xlsx: Option<PathBuf>,

        /// Image output path
        #[arg(long, value_name = "PATH")]
        svg: Option<PathBuf>,
    },

    /// List available palettes, or pick one for future runs
    #[command(after_help = "\
Examples:
  raci themes
  raci themes --use dark
  raci themes --use ~/.config/raci/themes/mine.json")]
    Themes {
        /// Store this palette (light, dark, or a theme JSON file) in the settings file
        #[arg(long = "use", value_name = "THEME")]
        select: Option<String>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("RACI_COMMIT"), ")",
        "\ntarget:  ", env!("RACI_TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::load(&cli)?;

    match cli.command {
        Commands::New { file, title, force } => cmd_new(&ctx, &file, title, force),
        Commands::Show { file, json, expanded } => cmd_show(&ctx, &file, json, expanded),
        Commands::Set { file, row, col, value } => cmd_edit(&ctx, &file, EditOp::SetValue { row, col, value }),
        Commands::Cycle { file, row, col, times } => cmd_edit(&ctx, &file, EditOp::Cycle { row, col, times }),
        Commands::AddRow { file, label } => cmd_edit(&ctx, &file, EditOp::AddRow { label }),
        Commands::AddCol { file, label } => cmd_edit(&ctx, &file, EditOp::AddCol { label }),
        Commands::DeleteRow { file, row } => cmd_edit(&ctx, &file, EditOp::DeleteRow { row }),
        Commands::DeleteCol { file, col } => cmd_edit(&ctx, &file, EditOp::DeleteCol { col }),
        Commands::MoveRow { file, row, direction } => cmd_edit(&ctx, &file, EditOp::MoveRow { row, direction }),
        Commands::MoveCol { file, col, direction } => cmd_edit(&ctx, &file, EditOp::MoveCol { col, direction }),
        Commands::SaveAs { file, dest } => cmd_save_as(&ctx, &file, &dest),
        Commands::Export { file, xlsx, svg } => cmd_export(&ctx, &file, xlsx, svg),
        Commands::Themes { select: None } => cmd_themes(&ctx),
        Commands::Themes { select: Some(theme) } => cmd_use_theme(&ctx, &theme),
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<DocumentError> for CliError {
    fn from(err: DocumentError) -> Self {
        let code = document_exit_code(&err);
        let hint = match &err {
            DocumentError::DataNotFound { .. } => {
                Some("the file needs a <table id=\"RACI\"> whose rows all have the same number of cells".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let code = match err {
            ConfigError::Io { .. } => EXIT_IO,
            ConfigError::Parse { .. } => EXIT_ERROR,
        };
        Self { code, message: err.to_string(), hint: None }
    }
}

// ============================================================================
// Context: settings + palette
// ============================================================================

struct Context {
    settings: Settings,
    settings_path: PathBuf,
    themes: ThemeManager,
    no_exports: bool,
}

impl Context {
    fn load(cli: &Cli) -> Result<Self, CliError> {
        let (settings, settings_path) = match &cli.config {
            Some(path) => (Settings::load_from(path)?, path.clone()),
            None => (Settings::load(), Settings::config_path()),
        };

        let source = match cli.theme.as_deref() {
            Some(theme) => theme_source(theme),
            None => settings.theme_source.clone(),
        };
        let themes = ThemeManager::new(source);
        log::debug!("palette: {}", themes.name());

        Ok(Context {
            settings,
            settings_path,
            themes,
            no_exports: cli.no_exports,
        })
    }

    fn palette(&self) -> Palette {
        self.themes.palette()
    }

    fn save_options(&self) -> SaveOptions {
        let options = SaveOptions::from_settings(&self.settings, self.palette());
        if self.no_exports {
            options.without_exports()
        } else {
            options
        }
    }

    fn open(&self, file: &Path) -> Result<Document, CliError> {
        let mut doc = Document::new();
        file_ops::open(&mut doc, file)?;
        if self.settings.view_mode == ViewPreference::Expanded {
            doc.set_view_mode(ViewMode::Expanded);
        }
        Ok(doc)
    }
}

fn theme_source(theme: &str) -> ThemeSource {
    match theme.to_ascii_lowercase().as_str() {
        "light" => ThemeSource::Light,
        "dark" => ThemeSource::Dark,
        _ => ThemeSource::Custom(theme.to_string()),
    }
}

/// Report sibling exports; a failed export turns into the command's error.
fn finish_save(report: SaveReport) -> Result<(), CliError> {
    for path in [&report.xlsx, &report.svg].into_iter().flatten() {
        eprintln!("wrote {}", path.display());
    }
    if report.export_errors.is_empty() {
        return Ok(());
    }
    let message = report
        .export_errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    Err(CliError {
        code: EXIT_EXPORT,
        message: format!("{} was saved but exports failed: {}", report.document.display(), message),
        hint: Some("re-run with --no-exports to skip them".to_string()),
    })
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_new(ctx: &Context, file: &Path, title: Option<String>, force: bool) -> Result<(), CliError> {
    if file.exists() && !force {
        return Err(CliError::args(format!("{} already exists", file.display()))
            .with_hint("pass --force to overwrite it"));
    }

    let mut doc = Document::new();
    if let Some(title) = title {
        doc.set_cell_value(0, 0, &title);
    }
    let report = file_ops::save_as(&mut doc, file, &ctx.save_options())?;
    println!("created {}", report.document.display());
    finish_save(report)
}

fn cmd_show(ctx: &Context, file: &Path, json: bool, expanded: bool) -> Result<(), CliError> {
    let mut doc = ctx.open(file)?;
    if expanded {
        doc.set_view_mode(ViewMode::Expanded);
    }

    if json {
        let payload = view::ShowJson::new(&doc);
        let text = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
        println!("{}", text);
    } else {
        print!("{}", view::render(&doc));
    }
    Ok(())
}

fn cmd_edit(ctx: &Context, file: &Path, op: EditOp) -> Result<(), CliError> {
    let mut doc = ctx.open(file)?;
    let outcome = op.apply(&mut doc);

    if !outcome.changed {
        // Rejected edits are not errors; the file is left as it was
        eprintln!("note: {} (nothing changed)", outcome.message);
        return Ok(());
    }

    let report = file_ops::save(&mut doc, &ctx.save_options())?;
    println!("{}", outcome.message);
    finish_save(report)
}

fn cmd_save_as(ctx: &Context, file: &Path, dest: &Path) -> Result<(), CliError> {
    let mut doc = ctx.open(file)?;
    let report = file_ops::save_as(&mut doc, dest, &ctx.save_options())?;
    println!("saved {}", report.document.display());
    finish_save(report)
}

fn cmd_export(ctx: &Context, file: &Path, xlsx_path: Option<PathBuf>, svg_path: Option<PathBuf>) -> Result<(), CliError> {
    let doc = ctx.open(file)?;
    let palette = ctx.palette();

    let (xlsx_path, svg_path) = match (xlsx_path, svg_path) {
        (None, None) => (
            file_ops::sibling_path(file, "xlsx"),
            file_ops::sibling_path(file, "svg"),
        ),
        paths => paths,
    };
    if [&xlsx_path, &svg_path].into_iter().flatten().any(|p| p == file) {
        return Err(CliError::args(format!("refusing to export over {}", file.display()))
            .with_hint("pick an output path other than the document"));
    }

    if let Some(path) = xlsx_path {
        if let Some(result) = xlsx::export(doc.grid(), &path, &palette)? {
            println!("wrote {} ({})", path.display(), result.summary());
        }
    }
    if let Some(path) = svg_path {
        if svg::export(doc.grid(), &path, &palette)? {
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn cmd_themes(ctx: &Context) -> Result<(), CliError> {
    let current = ctx.themes.source();
    let themes = ThemeManager::list_themes();
    for (name, source) in &themes {
        let marker = if source == current { '*' } else { ' ' };
        match source {
            ThemeSource::Custom(path) => println!("{} {}  {}", marker, name, path),
            _ => println!("{} {}", marker, name),
        }
    }
    // A custom theme given by path that isn't in the themes directory
    if let ThemeSource::Custom(path) = current {
        if !themes.iter().any(|(_, source)| source == current) {
            println!("* {}  {}", ctx.themes.name(), path);
        }
    }
    Ok(())
}

fn cmd_use_theme(ctx: &Context, theme: &str) -> Result<(), CliError> {
    let source = theme_source(theme);
    let name = match &source {
        ThemeSource::Custom(path) => match ThemeManager::load_custom_theme(path) {
            Some((_, name)) => name,
            None => {
                return Err(CliError::args(format!("{} is not a readable theme file", path))
                    .with_hint("use light, dark, or a JSON file listed by `raci themes`"));
            }
        },
        _ => ThemeManager::new(source.clone()).name().to_string(),
    };

    let settings = Settings {
        theme_source: source,
        ..ctx.settings.clone()
    };
    settings.save_to(&ctx.settings_path)?;
    println!("theme set to {} in {}", name, ctx.settings_path.display());
    Ok(())
}
