use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use hl7_ast::{to_json, Message, TreePrinter};
use hl7_parser::{DecodeError, Decoder, DecoderConfig, EmptyInputPolicy, UnknownEscapePolicy};
use log::{debug, LevelFilter};

const EXIT_OK: i32 = 0;
const EXIT_DECODE: i32 = 1;
const EXIT_IO: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One node per line, indented by depth
    Tree,
    /// One line per segment
    Compact,
    /// Pretty-printed JSON of the whole message
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EscapeMode {
    Strip,
    Preserve,
}

impl From<EscapeMode> for UnknownEscapePolicy {
    fn from(mode: EscapeMode) -> Self {
        match mode {
            EscapeMode::Strip => UnknownEscapePolicy::Strip,
            EscapeMode::Preserve => UnknownEscapePolicy::Preserve,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "hl7dump",
    version,
    about = "Decode an HL7 v2 message and print its tree",
    long_about = "hl7dump decodes a single HL7 v2 pipe/caret message and prints the\n\
        resulting segment tree.\n\n\
        EXAMPLES:\n\
        \n  hl7dump message.hl7                  Print the tree of a message file\n\
        \n  hl7dump --format json message.hl7    Print the tree as JSON\n\
        \n  cat message.hl7 | hl7dump -vv        Decode stdin with debug logging"
)]
struct Cli {
    /// Input message file (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Decode zero-length input to an empty message instead of failing
    #[arg(long)]
    allow_empty: bool,

    /// What to do with escape sequences that are not delimiter escapes
    #[arg(long = "escapes", value_enum, default_value_t = EscapeMode::Strip)]
    escapes: EscapeMode,

    /// Longest escape sequence body accepted, in bytes
    #[arg(long, value_name = "N")]
    max_escape_len: Option<usize>,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn decoder_config(&self) -> DecoderConfig {
        let mut config = DecoderConfig::new().with_unknown_escape(self.escapes.into());
        if self.allow_empty {
            config = config.with_empty_input(EmptyInputPolicy::Accept);
        }
        if let Some(limit) = self.max_escape_len {
            config = config.with_max_escape_len(limit);
        }
        config
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::builder()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();
}

fn decode_input(cli: &Cli) -> Result<Message, DecodeError> {
    let config = cli.decoder_config();
    match &cli.input {
        Some(path) => {
            debug!("reading {}", path.display());
            Decoder::from_path(path)?.with_config(config).decode()
        }
        None => Decoder::new(io::stdin().lock()).with_config(config).decode(),
    }
}

fn render(message: &Message, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Tree => Ok(TreePrinter::new().print_message(message)),
        OutputFormat::Compact => Ok(message
            .iter()
            .map(|segment| format!("{segment}\n"))
            .collect()),
        OutputFormat::Json => to_json(message)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| format!("failed to serialize JSON: {e}")),
    }
}

fn run(cli: &Cli, out: &mut dyn Write) -> i32 {
    let message = match decode_input(cli) {
        Ok(message) => message,
        Err(DecodeError::Io(e)) => {
            match &cli.input {
                Some(path) => eprintln!("error: failed to read '{}': {e}", path.display()),
                None => eprintln!("error: failed to read from stdin: {e}"),
            }
            return EXIT_IO;
        }
        Err(e) => {
            eprintln!("decode error: {e}");
            return EXIT_DECODE;
        }
    };
    debug!("decoded {} segments", message.len());

    let rendered = match render(&message, cli.format) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_IO;
        }
    };
    if let Err(e) = out.write_all(rendered.as_bytes()).and_then(|_| out.flush()) {
        eprintln!("error: failed to write output: {e}");
        return EXIT_IO;
    }
    EXIT_OK
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}

fn main() {
    std::process::exit(run_cli());
}
