use amd_to_cjs::{convert_with_options, ConvertError, ConvertOptions, TopLevelMode, UnresolvedPolicy};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "amd-to-cjs", about = "Rewrites AMD modules into CommonJS")]
struct Cli {
  /// File to convert; omit for stdin.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Output destination; omit for stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Whether file is a module or global script.
  #[arg(short, long, value_enum, default_value_t = ModeArg::Global)]
  mode: ModeArg,

  /// What to do with a dependency list identifier that has no array literal
  /// declaration in the file.
  #[arg(long, value_enum, default_value_t = UnresolvedArg::Abort)]
  on_unresolved: UnresolvedArg,

  /// Emit tracing spans and events (JSON) on stderr.
  #[arg(long)]
  trace: bool,

  /// Write a JSON report to stdout instead of the converted code.
  #[arg(long)]
  json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
  Global,
  Module,
}

impl ModeArg {
  fn name(self) -> &'static str {
    match self {
      ModeArg::Global => "global",
      ModeArg::Module => "module",
    }
  }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UnresolvedArg {
  Abort,
  Skip,
}

#[derive(Serialize)]
struct JsonDiagnostic {
  message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  line: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  column: Option<usize>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
  schema_version: u32,
  mode: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  output: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  diagnostics: Option<Vec<JsonDiagnostic>>,
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::DEBUG)
    .with_writer(std::io::stderr)
    .json()
    .with_ansi(false)
    .try_init();
}

/// One-based line and column (in chars) of the byte `offset` in `text`.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
  let mut offset = offset.min(text.len());
  while !text.is_char_boundary(offset) {
    offset -= 1;
  }
  let before = &text[..offset];
  let line = before.matches('\n').count() + 1;
  let line_start = before.rfind('\n').map_or(0, |i| i + 1);
  (line, before[line_start..].chars().count() + 1)
}

fn diagnostic(text: &str, message: String, offset: Option<usize>) -> JsonDiagnostic {
  let position = offset.map(|offset| line_column(text, offset));
  JsonDiagnostic {
    message,
    line: position.map(|(line, _)| line),
    column: position.map(|(_, column)| column),
  }
}

fn print_json(report: &JsonOutput) {
  match serde_json::to_string_pretty(report) {
    Ok(json) => println!("{json}"),
    Err(err) => {
      eprintln!("failed to serialize JSON output: {err}");
      process::exit(1);
    }
  }
}

struct Reporter {
  json: bool,
  mode: ModeArg,
}

impl Reporter {
  fn fail(&self, name: &str, diagnostic: JsonDiagnostic) -> ! {
    if self.json {
      print_json(&JsonOutput {
        schema_version: 1,
        mode: self.mode.name(),
        output: None,
        diagnostics: Some(vec![diagnostic]),
      });
    } else {
      match (diagnostic.line, diagnostic.column) {
        (Some(line), Some(column)) => {
          eprintln!("{name}:{line}:{column}: error: {}", diagnostic.message)
        }
        _ => eprintln!("{name}: error: {}", diagnostic.message),
      }
    }
    process::exit(1);
  }

  fn host_error(&self, name: &str, message: String) -> ! {
    self.fail(name, diagnostic("", message, None))
  }

  fn convert_error(&self, name: &str, source: &str, err: ConvertError) -> ! {
    let offset = err.offset();
    self.fail(name, diagnostic(source, err.to_string(), offset))
  }
}

fn main() {
  let args = Cli::parse();
  init_tracing(args.trace);
  let reporter = Reporter {
    json: args.json,
    mode: args.mode,
  };

  let input_name = args
    .input
    .as_ref()
    .map(|p| p.to_string_lossy().into_owned())
    .unwrap_or_else(|| "<stdin>".to_string());
  let mut input = Vec::new();
  let mut input_file: Box<dyn Read> = match args.input.as_ref() {
    Some(p) => match File::open(p) {
      Ok(f) => Box::new(f),
      Err(err) => reporter.host_error(
        &input_name,
        format!("failed to open {}: {err}", p.display()),
      ),
    },
    None => Box::new(stdin()),
  };
  if let Err(err) = input_file.read_to_end(&mut input) {
    reporter.host_error(&input_name, format!("failed to read input: {err}"));
  }
  let source = match std::str::from_utf8(&input) {
    Ok(source) => source,
    Err(err) => reporter.host_error(&input_name, format!("input is not valid UTF-8: {err}")),
  };

  let options = ConvertOptions::new(match args.mode {
    ModeArg::Global => TopLevelMode::Global,
    ModeArg::Module => TopLevelMode::Module,
  })
  .with_unresolved_policy(match args.on_unresolved {
    UnresolvedArg::Abort => UnresolvedPolicy::Abort,
    UnresolvedArg::Skip => UnresolvedPolicy::Skip,
  });
  let mut output = Vec::new();
  if let Err(err) = convert_with_options(options, source, &mut output) {
    reporter.convert_error(&input_name, source, err);
  }

  if args.json {
    let code = String::from_utf8_lossy(&output);
    print_json(&JsonOutput {
      schema_version: 1,
      mode: args.mode.name(),
      output: Some(&*code),
      diagnostics: None,
    });
    return;
  }
  let write_result = match args.output.as_ref() {
    Some(p) => File::create(p)
      .and_then(|mut file| file.write_all(&output))
      .map_err(|err| (p.display().to_string(), err)),
    None => stdout()
      .write_all(&output)
      .map_err(|err| ("<stdout>".to_string(), err)),
  };
  if let Err((dest, err)) = write_result {
    reporter.host_error(&dest, format!("failed to write output: {err}"));
  }
}
