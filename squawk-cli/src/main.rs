mod args;
mod logging;

use anyhow::Result;
use args::Cli;
use clap::Parser;
use squawk_channel::server::{Reply, RequestHeader, RequestObject};
use squawk_channel::opcode::RESULT_BADPARAMETER;
use squawk_core::{GlobalBanks, Heap, NullBarrier};
use squawk_executive::{Isolate, Scheduler};
use squawk_suite::Suite;
use squawk_translator::{load_class_file, TranslatorError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Exit codes: 0 normal, 95 reserved for a TCK pass, anything else signals failure.
const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;

fn main() {
    let raw_args: Vec<String> = args::rewrite_colon_flags(std::env::args().skip(1));
    let mut argv = vec!["squawk".to_string()];
    argv.extend(raw_args);
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => {
            err.print().ok();
            std::process::exit(EXIT_FAILURE);
        }
    };

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("squawk: {err:#}");
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let _log_guard = logging::init(cli.verbose)?;

    let xmx = cli.xmx.as_deref().map(args::parse_size).transpose()?;
    let xmxnvm = cli.xmxnvm.as_deref().map(args::parse_size).transpose()?;
    info!(
        xmx_bytes = ?xmx,
        xmxnvm_bytes = ?xmxnvm,
        xtgc = cli.xtgc.as_deref(),
        "squawk starting"
    );

    if let Some(port) = cli.xioport {
        spawn_io_server(port);
    }

    let mut suite = Suite::new(0, None);
    let mut classpath_entries: Vec<PathBuf> = Vec::new();
    if let Some(boot) = &cli.xboot {
        classpath_entries.push(boot.clone());
    }
    if let Some(cp) = &cli.classpath {
        classpath_entries.extend(args::split_classpath(cp));
    }
    let loaded = load_classpath(&mut suite, &classpath_entries)?;
    info!(classes_loaded = loaded, "boot classpath processed");

    let main_class = match (&cli.suite, &cli.main_class) {
        (Some(name), _) => name.clone(),
        (None, Some(class)) => class.clone(),
        (None, None) => {
            warn!("no -suite:<name> or main class given; nothing to run");
            return Ok(EXIT_OK);
        }
    };

    let _heap = Heap::new(Box::new(NullBarrier));
    let mut globals = GlobalBanks::new();
    globals.map(256, 256, 256);

    let mut isolate = Isolate::new(
        1,
        cli.xboot
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "file:///".to_string()),
        main_class.clone(),
        cli.program_args.clone(),
    );
    let mut scheduler = Scheduler::new();
    let thread_id = scheduler.spawn(isolate.id, 256);
    isolate.add_thread(thread_id);
    debug!(thread_id, main_class = %main_class, "main thread spawned");

    match suite.lookup(&main_class, &[]) {
        Some(_) => {
            info!(main_class = %main_class, "resolved main class; suite has no executable method body yet");
            Ok(EXIT_OK)
        }
        None => {
            warn!(main_class = %main_class, "NoClassDefFoundError: class not found on the boot classpath");
            Ok(EXIT_FAILURE)
        }
    }
}

/// Reads every `.class` file under each classpath entry (a single file or a directory, searched
/// non-recursively) and interns it into `suite` via the class-file loader. Legality failures
/// are logged and skip just that file, matching the translator's per-klass isolation.
fn load_classpath(suite: &mut Suite, entries: &[PathBuf]) -> Result<usize> {
    let mut loaded = 0usize;
    for entry in entries {
        let files = class_files_under(entry)?;
        for file in files {
            let bytes = fs::read(&file)?;
            match load_class_file(&bytes) {
                Ok(parsed) => {
                    let id = suite.intern(&parsed.this_class_name, &[]);
                    let klass = suite.klass_mut(id)?;
                    klass.mark_converted();
                    loaded += 1;
                    debug!(class = %parsed.this_class_name, path = %file.display(), "loaded class");
                }
                Err(err @ TranslatorError::ClassFormatError(_))
                | Err(err @ TranslatorError::UnsupportedClassVersionError { .. }) => {
                    warn!(path = %file.display(), error = %err, "skipping unloadable class file");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(loaded)
}

fn class_files_under(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry_path.extension().and_then(|e| e.to_str()) == Some("class") {
            files.push(entry_path);
        }
    }
    Ok(files)
}

/// Runs the split I/O server on its own OS thread when `-Xioport:<port>` is given. Requests
/// this launcher cannot yet route to a live channel context are answered with
/// `RESULT_BADPARAMETER` rather than dropped.
fn spawn_io_server(port: u16) {
    std::thread::spawn(move || {
        let handler = |header: RequestHeader, _object: Option<RequestObject>| -> Reply {
            debug!(op = header.op, cid = header.cid, "split I/O request");
            Reply {
                status: RESULT_BADPARAMETER,
                low: 0,
                high: 0,
                payload: Vec::new(),
            }
        };
        if let Err(err) = squawk_channel::server::run(port, handler) {
            warn!(port, error = %err, "split I/O server exited");
        }
    });
}
