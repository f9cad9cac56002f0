//! End-to-end report handling without a terminal.
//!
//! Reports travel as JSON, configuration comes from a TOML file, and the
//! resulting session is rendered both headlessly and as plain text.

use std::io::Write;

use vdump::prelude::*;
use vdump::{Buffer, KeyCode, KeyEvent};

fn report() -> ErrorReport {
    let request = RecordRef::new("Request");
    request.set("path", "/users/7");
    request.set("attempt", 2i64);
    request.set("self", Value::Record(request.clone()));
    ErrorReport::new("TimeoutError", "upstream did not answer")
        .at("client.rs", 88)
        .with_trace(vec![
            StackFrame::new("Client::send").at("client.rs", 88),
            StackFrame::new("main").at("main.rs", 12),
        ])
        .with_context(&Value::Record(request))
}

#[test]
fn report_survives_json() {
    let json = serde_json::to_string(&report()).unwrap();
    let back: ErrorReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report());
    assert_eq!(back.trace.len(), 2);
    let context = back.context.unwrap();
    assert_eq!(context.stats.aliases, 1);
}

#[test]
fn plain_text_of_report() {
    let text = report().into_session().plain_text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "TimeoutError");
    assert_eq!(lines[2], "upstream did not answer");
    assert_eq!(lines[4], "in client.rs:88");
    assert!(lines[6].starts_with("object(Request) #"));
    assert_eq!(text.matches("*ALIAS*").count(), 1);
    assert!(text.ends_with("#0 Client::send at client.rs:88\n#1 main at main.rs:12\n"));
}

#[test]
fn config_file_drives_session() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "indent = 4\n[keys]\nview_list = \"l\"").unwrap();
    let config = InspectorConfig::from_toml_file(file.path()).unwrap();

    let mut screen = report().into_session().config(config).into_screen();
    screen.resize(80, 10);
    screen.handle_key(KeyEvent::new(KeyCode::Tab));
    assert_eq!(screen.current_label(), Some("Context"));

    let mut buf = Buffer::new(80, 10);
    screen.render(&mut buf);
    assert!(buf.row_text(2).starts_with("    [public:path] => "));
    assert!(buf.row_text(9).contains("l:Views"));

    screen.handle_key(KeyEvent::new(KeyCode::Char('l')));
    assert!(screen.selector_open());
}
