#![forbid(unsafe_code)]

//! vdump demo binary entry point.

mod cli;
mod sample;

use std::fs;
use std::io;
use std::path::Path;
use std::process;

use cli::{Command, HELP_TEXT, Opts, VERSION};
use vdump::{DumpSession, ErrorReport, InspectorConfig, TableView};

fn main() {
    let opts = match Command::from_env() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{HELP_TEXT}");
            return;
        }
        Ok(Command::Version) => {
            println!("vdump-demo {VERSION}");
            return;
        }
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("Run with --help for usage information.");
            process::exit(2);
        }
    };

    if let Err(e) = run(&opts) {
        eprintln!("vdump-demo: {e}");
        process::exit(1);
    }
}

fn run(opts: &Opts) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &opts.config {
        Some(path) => InspectorConfig::from_toml_file(path)?,
        None => InspectorConfig::default(),
    };
    if let Some(log) = &opts.log {
        config = config.with_log_file(log);
    }

    let session = build_session(opts)?.config(config);
    if opts.plain {
        print!("{}", session.plain_text());
        return Ok(());
    }
    session.run_or_print(&mut io::stdout().lock())?;
    Ok(())
}

fn build_session(opts: &Opts) -> Result<DumpSession, Box<dyn std::error::Error>> {
    let Some(path) = &opts.file else {
        return Ok(DumpSession::new(&sample::library())
            .name("sample")
            .stack_trace(sample::trace())
            .view(Box::new(TableView::from_profiles(
                "Profiler",
                &sample::timings(),
            ))));
    };
    if opts.report {
        let report: ErrorReport = serde_json::from_str(&fs::read_to_string(path)?)?;
        tracing::debug!(class = %report.class, frames = report.trace.len(), "loaded report");
        return Ok(report.into_session());
    }
    let document: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(DumpSession::new(&document).name(file_label(path)))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn json_document_session() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"users": [{"name": "ada"}], "count": 1}"#).unwrap();
        let opts = Opts {
            file: Some(file.path().to_path_buf()),
            ..Opts::default()
        };
        let text = build_session(&opts).unwrap().plain_text();
        assert!(text.starts_with("array(2) {\n"));
        assert!(text.contains("[count] => int(1)"));
    }

    #[test]
    fn report_file_session() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"class": "IoError", "message": "gone"}"#).unwrap();
        let opts = Opts {
            file: Some(file.path().to_path_buf()),
            report: true,
            ..Opts::default()
        };
        let screen = build_session(&opts).unwrap().into_screen();
        assert_eq!(screen.context(), "IoError");
        assert_eq!(screen.labels(), ["Description", "Stack trace"]);
    }

    #[test]
    fn sample_session_views() {
        let screen = build_session(&Opts::default()).unwrap().into_screen();
        assert_eq!(screen.context(), "sample");
        assert_eq!(screen.labels(), ["Variables", "Stack trace", "Profiler"]);
    }

    #[test]
    fn labels_use_file_name() {
        assert_eq!(file_label(Path::new("/tmp/data/report.json")), "report.json");
    }
}
