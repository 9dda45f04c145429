use std::{
    env,
    fs::read_to_string,
    io::{self, Write},
    path::PathBuf,
    process::{self, ExitCode},
    time::Instant,
};

use num_traits::ToPrimitive;
use plc::{check, display_error, environment::value::Value, run};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn usage() -> ExitCode {
    eprintln!("Usage: plc [--check] <file>");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let (check_only, file_path) = match args.as_slice() {
        [file] if file != "--check" => (false, file),
        [flag, file] if flag == "--check" => (true, file),
        _ => return usage(),
    };

    let path = PathBuf::from(file_path);
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.clone());

    let contents = match read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) => {
            error!(path = %path.display(), "failed to read source file");
            eprintln!("Error: could not read {}: {}", path.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    if check_only {
        return match check(&contents, &file_name) {
            Ok(_) => {
                info!(elapsed = ?start.elapsed(), "checked");
                ExitCode::SUCCESS
            }
            Err(err) => {
                display_error(&err, &contents, &path);
                ExitCode::FAILURE
            }
        };
    }

    match run(&contents, &file_name, io::stdout()) {
        Ok(value) => {
            info!(elapsed = ?start.elapsed(), "finished");
            debug!("exit value: {}", value);

            let code = match value {
                Value::Integer(code) => code.to_i32().unwrap_or(0),
                _ => 0,
            };

            let _ = io::stdout().flush();
            process::exit(code)
        }
        Err(err) => {
            display_error(&err, &contents, &path);
            ExitCode::FAILURE
        }
    }
}
