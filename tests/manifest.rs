use std::path::PathBuf;
use std::sync::Arc;

use linedispatch::manifest::{Aliases, Manifest, ManifestError, ReplySink, Session};
use linedispatch::{DispatchError, Registrar};
use parking_lot::Mutex;
use tempfile::TempDir;

const SAMPLE: &str = r#"
[settings]
prompt = "bot> "

[[commands]]
name = "greet"
aliases = ["hi", "hello"]
params = [ { type = "string" }, { type = "int", default = "1" } ]
reply = "hello {0} x{1}"

[[commands]]
name = "whoami"
params = [ { type = "session" } ]
reply = "you are {0}"

[[commands]]
name = "loud"
parent = ["greet"]
aliases = "l, shout"
params = [ { type = "string" }, { type = "int" }, { type = "bool", default = "false" } ]
reply = "{0}! x{1} loud={2}"

[[commands]]
name = "echo"
params = [ { type = "string", default = "null" } ]
"#;

fn write_manifest(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("commands.toml");
    std::fs::write(&path, content).expect("Failed to write manifest");
    (temp_dir, path)
}

fn capture() -> (ReplySink, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink_lines = Arc::clone(&lines);
    let sink: ReplySink = Arc::new(move |line| sink_lines.lock().push(line));
    (sink, lines)
}

/// Test that Manifest::manifest_path() ends with the expected file name.
#[test]
fn test_manifest_path_ends_with_expected() {
    let path = Manifest::manifest_path();
    assert!(path.ends_with("linedispatch/commands.toml"));
}

#[test]
fn test_default_manifest_is_empty() {
    let manifest = Manifest::default();
    assert_eq!(manifest.settings.prompt, "> ");
    assert!(manifest.commands.is_empty());
    assert!(manifest.validate().is_ok());
}

#[test]
fn test_load_sample_manifest() {
    let (_dir, path) = write_manifest(SAMPLE);
    let manifest = Manifest::load_from(&path).unwrap();

    assert_eq!(manifest.settings.prompt, "bot> ");
    assert_eq!(manifest.commands.len(), 4);
    let greet = &manifest.commands[0];
    assert_eq!(greet.aliases, Aliases::List(vec!["hi".into(), "hello".into()]));
    assert_eq!(greet.params[1].default.as_deref(), Some("1"));
    assert_eq!(manifest.commands[2].aliases.to_vec(), vec!["l", "shout"]);
}

/// Test that manifest commands dispatch and render their replies.
#[test]
fn test_manifest_commands_dispatch() {
    let (_dir, path) = write_manifest(SAMPLE);
    let manifest = Manifest::load_from(&path).unwrap();
    let (sink, lines) = capture();

    let mut registrar = Registrar::new();
    registrar.register(manifest.into_specs(sink)).unwrap();
    let dispatcher = registrar.finish();
    let session = Session::new("alice").into_value();

    dispatcher.dispatch(Some(&session), "greet bob").unwrap();
    dispatcher.dispatch(Some(&session), "HI bob 3").unwrap();
    dispatcher.dispatch(Some(&session), "whoami").unwrap();
    dispatcher.dispatch(Some(&session), "greet bob 2 shout").unwrap();
    dispatcher.dispatch(None, "echo").unwrap();
    dispatcher.dispatch(None, "echo words").unwrap();

    assert_eq!(
        *lines.lock(),
        vec![
            "hello bob x1",
            "hello bob x3",
            "you are alice",
            "bob! x2 loud=false",
            "echo [null]",
            "echo [words]",
        ]
    );
}

#[test]
fn test_session_without_context_is_too_few_arguments() {
    let (_dir, path) = write_manifest(SAMPLE);
    let manifest = Manifest::load_from(&path).unwrap();
    let (sink, lines) = capture();

    let mut registrar = Registrar::new();
    registrar.register(manifest.into_specs(sink)).unwrap();
    let err = registrar.finish().dispatch(None, "whoami").unwrap_err();

    assert!(matches!(err, DispatchError::TooFewArguments { .. }));
    assert!(lines.lock().is_empty());
}

#[test]
fn test_missing_file_is_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    match Manifest::load_from(&path).unwrap_err() {
        ManifestError::ReadError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected ReadError, got {other:?}"),
    }
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let (_dir, path) = write_manifest("[[commands]]\nname = ");
    assert!(matches!(
        Manifest::load_from(&path).unwrap_err(),
        ManifestError::ParseError { .. }
    ));
}

#[test]
fn test_unknown_type_fails_validation() {
    let (_dir, path) = write_manifest(
        r#"
[[commands]]
name = "draw"
params = [ { type = "point" } ]
"#,
    );

    match Manifest::load_from(&path).unwrap_err() {
        ManifestError::ValidationError { message } => {
            assert!(message.contains("point"));
            assert!(message.contains("draw"));
        }
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

#[test]
fn test_invalid_name_fails_validation() {
    let (_dir, path) = write_manifest("[[commands]]\nname = \"two words\"\n");
    assert!(matches!(
        Manifest::load_from(&path).unwrap_err(),
        ManifestError::ValidationError { .. }
    ));
}

/// Test that a bad default passes the loader but fails registration.
#[test]
fn test_bad_default_fails_registration() {
    let (_dir, path) = write_manifest(
        r#"
[[commands]]
name = "count"
params = [ { type = "int", default = "many" } ]
"#,
    );
    let manifest = Manifest::load_from(&path).unwrap();
    let (sink, _lines) = capture();

    let mut registrar = Registrar::new();
    assert!(registrar.register(manifest.into_specs(sink)).is_err());
}
