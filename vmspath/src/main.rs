//! Command-line front end: translate OpenVMS filespecs to POSIX paths.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use vmspath::{CurrentDir, FixedCurrentDir, ProcessCurrentDir, TranslateError, Translator};

/// Translate OpenVMS file specifications into POSIX paths.
///
/// Input that is not a valid filespec is echoed unchanged unless --strict is
/// given. With no FILESPEC arguments, filespecs are read from stdin, one per
/// line.
#[derive(Parser, Debug)]
#[command(name = "vmspath")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Anchor relative filespecs on this directory instead of the working
    /// directory
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Fail on input that has no translation instead of echoing it
    #[arg(long)]
    strict: bool,

    /// Filespecs to translate
    filespecs: Vec<String>,
}

fn convert(
    translator: &Translator<&dyn CurrentDir>,
    filespec: &str,
    strict: bool,
) -> Result<String, TranslateError> {
    match translator.translate(filespec) {
        Ok(path) => Ok(path),
        Err(e) if strict => Err(e),
        Err(_) => Ok(filespec.to_string()),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let fixed;
    let provider: &dyn CurrentDir = match &args.cwd {
        Some(dir) => match FixedCurrentDir::canonicalize(dir) {
            Ok(dir) => {
                fixed = dir;
                &fixed
            }
            Err(e) => {
                eprintln!("Error: cannot use {} as current directory: {}", dir.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => &ProcessCurrentDir,
    };
    let translator = Translator::new(provider);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    if !args.filespecs.is_empty() {
        for filespec in &args.filespecs {
            match convert(&translator, filespec, args.strict) {
                Ok(path) => {
                    let _ = writeln!(stdout, "{}", path);
                }
                Err(e) => {
                    eprintln!("Error translating '{}': {}", filespec, e);
                    return ExitCode::FAILURE;
                }
            }
        }
        return ExitCode::SUCCESS;
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                return ExitCode::FAILURE;
            }
        };
        match convert(&translator, &line, args.strict) {
            Ok(path) => {
                let _ = writeln!(stdout, "{}", path);
            }
            Err(e) => {
                eprintln!("Error translating '{}': {}", line, e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
