use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clio::{Clio, Error};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("clio-parse-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn clio(argv: &[&str]) -> Clio {
    Clio::new("unit", argv.iter().copied())
}

#[test]
fn recognizes_required_argument() {
    let mut c = clio(&["arg1"]);
    c.argument("first");
    let args = c.argument_values().unwrap();
    assert_eq!(args.len(), 1);
    assert_eq!(args["first"], "arg1");
    assert_eq!(c.argument_value("first").unwrap(), Some("arg1"));
}

#[test]
fn overflow_arguments_are_keyed_by_position() {
    let mut c = clio(&["arg1", "arg2", "arg3"]);
    c.argument("first");
    let args = c.argument_values().unwrap();
    assert_eq!(args["first"], "arg1");
    assert_eq!(args["1"], "arg2");
    assert_eq!(args["2"], "arg3");
    assert_eq!(c.argument_count().unwrap(), 3);
}

#[test]
fn recognizes_all_short_options() {
    let mut c = clio(&["-abc", "--long", "-de", "-f"]);
    c.option("a").unwrap().alias("b").unwrap().accumulates();
    c.option("c").unwrap();
    c.option("d").unwrap().with_value();
    c.option("e").unwrap();
    c.option("f").unwrap();
    c.option("l").unwrap();
    c.option("long").unwrap();

    c.parse().unwrap();

    assert!(c.was_present("a").unwrap());
    assert_eq!(c.presence_count("a").unwrap(), 2);
    assert!(c.was_present("c").unwrap());
    assert!(c.was_present("d").unwrap());
    assert_eq!(c.value("d").unwrap(), Some("e"));
    assert!(c.was_present("f").unwrap());
    assert!(c.was_present("long").unwrap());
    // -e is the value of -d.
    assert!(!c.was_present("e").unwrap());
    // -l is only the first letter of a long option.
    assert!(!c.was_present("l").unwrap());
}

#[test]
fn absent_option_is_not_present() {
    let mut c = clio(&[]);
    c.option("b").unwrap();
    assert!(!c.was_present("b").unwrap());
    assert_eq!(c.presence_count("b").unwrap(), 0);
}

#[test]
fn unknown_option_fails_the_parse() {
    let mut c = clio(&["-a"]);
    assert!(matches!(c.parse(), Err(Error::UnknownOption(n)) if n == "-a"));

    let mut c = clio(&["--nope"]);
    c.option("n").unwrap();
    assert!(matches!(c.parse(), Err(Error::UnknownOption(n)) if n == "--nope"));

    // Unknown letter in the middle of a cluster.
    let mut c = clio(&["-axb"]);
    c.option("a").unwrap();
    c.option("b").unwrap();
    assert!(matches!(c.parse(), Err(Error::UnknownOption(n)) if n == "-x"));
}

#[test]
fn missing_value_fails_the_parse() {
    let mut c = clio(&["-a"]);
    c.option("a").unwrap().with_value();
    assert!(matches!(c.value("a"), Err(Error::MissingOptionValue(n)) if n == "-a"));
}

#[test]
fn present_values_are_collected() {
    let mut c = clio(&["-aVal1", "--long=\"stuff\""]);
    c.option("a").unwrap().with_value();
    c.option("long").unwrap().with_value();
    let values = c.option_values().unwrap();
    assert_eq!(values["a"], "Val1");
    assert_eq!(values["long"], "\"stuff\"");
}

#[test]
fn defaults_fill_missing_values() {
    let mut c = clio(&["-a"]);
    c.option("a").unwrap().with_default_value("Val1");
    c.option("long").unwrap().with_default_value("\"stuff\"");
    let values = c.option_values().unwrap();
    assert_eq!(values["a"], "Val1");
    assert_eq!(values["long"], "\"stuff\"");
    assert!(c.was_present("a").unwrap());
    assert!(!c.was_present("long").unwrap());
}

#[test]
fn arguments_and_options_in_any_order() {
    let mut c = clio(&["-a", "valA", "arg1", "-b", "arg2"]);
    c.argument("one");
    c.argument("two");
    c.option("a").unwrap().with_value();
    c.option("b").unwrap();

    c.parse().unwrap();
    assert_eq!(c.value("a").unwrap(), Some("valA"));
    assert!(c.was_present("b").unwrap());
    let args = c.argument_values().unwrap();
    assert_eq!(args["one"], "arg1");
    assert_eq!(args["two"], "arg2");
}

#[test]
fn accumulates_for_all_aliases() {
    let mut c = clio(&["-abc", "--aLong", "-c"]);
    c.option("a")
        .unwrap()
        .alias("b")
        .unwrap()
        .alias("c")
        .unwrap()
        .alias("aLong")
        .unwrap()
        .accumulates();
    assert_eq!(c.presence_count("a").unwrap(), 5);
    assert_eq!(c.presence_count("aLong").unwrap(), 5);
}

#[test]
fn invalid_value_by_pattern() {
    let pattern = r"|\d+|";
    let mut c = clio(&["-vInvalid"]);
    c.option("v").unwrap().with_value().matching_pattern(pattern);
    match c.parse() {
        Err(Error::InvalidOptionValue { option, message }) => {
            assert_eq!(option, "-v");
            assert!(message.contains(pattern), "{message}");
        }
        other => panic!("expected InvalidOptionValue, got: {other:?}"),
    }
}

#[test]
fn valid_value_by_pattern() {
    let mut c = clio(&["-v valid"]);
    c.option("v").unwrap().with_value().matching_pattern("|valid|");
    c.parse().unwrap();
    assert_eq!(c.value("v").unwrap(), Some(" valid"));
}

#[test]
fn malformed_pattern_is_an_invalid_value() {
    let mut c = clio(&["--n=1"]);
    c.option("n").unwrap().with_value().matching_pattern("[0-9");
    assert!(matches!(c.parse(), Err(Error::InvalidOptionValue { .. })));
}

#[test]
fn invalid_value_by_predicate() {
    let mut c = clio(&["-vInvalid"]);
    c.option("v").unwrap().with_value().validated_by(|_| false);
    let err = c.parse().unwrap_err();
    assert_eq!(err.to_string(), "the value of `-v` is not valid");

    let mut c = clio(&["-vInvalid"]);
    c.option("v").unwrap().with_value().validated_by(|_| true);
    c.parse().unwrap();
}

#[test]
fn custom_error_message_replaces_generated_one() {
    let mut c = clio(&["--port", "http"]);
    c.option("port")
        .unwrap()
        .with_value()
        .matching_pattern(r"^\d+$")
        .with_error_message("port must be numeric");
    assert_eq!(c.parse().unwrap_err().to_string(), "port must be numeric");
}

#[test]
fn multi_valued_option_gathers_all_values() {
    let mut c = clio(&["-aOne", "-a", "Two"]);
    c.option("a").unwrap().with_many_values();
    assert_eq!(c.value_list("a").unwrap(), ["One", "Two"]);
    assert_eq!(c.value("a").unwrap(), Some("Two"));
}

#[test]
fn multi_valued_checks_every_element() {
    let mut c = clio(&["-n1", "-n", "2", "-nx"]);
    c.option("n").unwrap().with_many_values().matching_pattern(r"^\d$");
    match c.parse() {
        Err(Error::InvalidOptionValue { message, .. }) => assert!(message.contains("-n")),
        other => panic!("expected InvalidOptionValue, got: {other:?}"),
    }
}

#[test]
fn multi_valued_default_on_bare_occurrence() {
    let mut c = clio(&["-I"]);
    c.option("I").unwrap().with_many_values_or(["include", "vendor"]);
    assert_eq!(c.value_list("I").unwrap(), ["include", "vendor"]);
    assert_eq!(c.presence_count("I").unwrap(), 1);
}

#[test]
fn cluster_stops_at_value_bearing_letter() {
    let mut c = clio(&["-vvo", "out.txt", "-vofile"]);
    c.option("v").unwrap().accumulates();
    c.option("o").unwrap().with_many_values();
    assert_eq!(c.presence_count("v").unwrap(), 3);
    assert_eq!(c.value_list("o").unwrap(), ["out.txt", "file"]);
}

#[test]
fn reparse_is_idempotent() {
    let mut c = clio(&["-vv", "--name", "x", "a", "b"]);
    c.argument("first");
    c.option("v").unwrap().accumulates();
    c.option("name").unwrap().with_value();

    c.parse().unwrap();
    let first = (
        c.argument_values().unwrap(),
        c.option_values().unwrap(),
        c.presence_count("v").unwrap(),
    );
    c.parse().unwrap();
    let second = (
        c.argument_values().unwrap(),
        c.option_values().unwrap(),
        c.presence_count("v").unwrap(),
    );
    assert_eq!(first, second);
}

#[test]
fn path_options_are_canonicalized() {
    let dir = make_temp_dir("path-option");
    let file = dir.join("config.toml");
    fs::write(&file, "").expect("failed to write fixture");
    let expected = fs::canonicalize(&file).unwrap().to_string_lossy().into_owned();

    let raw = format!("{}/./config.toml", dir.display());
    let mut c = clio(&["-c", &raw, "--out", "/no/such/clio/path"]);
    c.option("c").unwrap().as_path();
    c.option("out").unwrap().as_path();
    match c.parse() {
        Err(Error::InvalidPath { path, .. }) => assert_eq!(path, "/no/such/clio/path"),
        other => panic!("expected InvalidPath, got: {other:?}"),
    }

    c.set_args(["-c", raw.as_str()]);
    assert_eq!(c.value("c").unwrap(), Some(expected.as_str()));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn path_arguments_are_canonicalized() {
    let dir = make_temp_dir("path-argument");
    let expected = fs::canonicalize(&dir).unwrap().to_string_lossy().into_owned();

    let raw = dir.display().to_string();
    let mut c = clio(&[raw.as_str()]);
    c.argument("dir").should_be_path();
    assert_eq!(c.argument_value("dir").unwrap(), Some(expected.as_str()));

    c.set_args(["/no/such/clio/dir"]);
    assert!(matches!(c.parse(), Err(Error::InvalidPath { .. })));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_option_names_are_rejected() {
    let mut c = clio(&[]);
    for name in ["-", "=", "long--with--dashes", "--"] {
        match c.option(name) {
            Err(err @ Error::InvalidOptionName(_)) => {
                assert_eq!(err.to_string(), format!("{name} is not a valid name for an option"));
            }
            Err(other) => panic!("expected InvalidOptionName for {name}, got: {other:?}"),
            Ok(_) => panic!("{name} should be rejected"),
        }
    }
}

#[test]
fn path_default_is_canonicalized_on_bare_occurrence() {
    let dir = make_temp_dir("path-default");
    let raw = format!("{}/./", dir.display());
    let expected = fs::canonicalize(&dir).unwrap().to_string_lossy().into_owned();

    let mut c = clio(&["-o"]);
    c.option("o").unwrap().as_path_or(raw.as_str());
    assert_eq!(c.value("o").unwrap(), Some(expected.as_str()));

    // Absent, the default is reported as declared.
    c.set_args(Vec::<String>::new());
    assert_eq!(c.value("o").unwrap(), Some(raw.as_str()));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn short_inline_value_keeps_the_equals_sign() {
    let mut c = clio(&["-d=x", "--define=y"]);
    c.option("d").unwrap().with_value();
    c.option("define").unwrap().with_value();
    assert_eq!(c.value("d").unwrap(), Some("=x"));
    assert_eq!(c.value("define").unwrap(), Some("y"));
}

#[test]
fn multi_valued_predicate_checks_every_element() {
    let mut c = clio(&["-Jok", "-Jbad"]);
    c.option("J").unwrap().with_many_values().validated_by(|v| v != "bad");
    match c.parse() {
        Err(Error::InvalidOptionValue { option, message }) => {
            assert_eq!(option, "-J");
            assert_eq!(message, "the value of `-J` is not valid");
        }
        other => panic!("expected InvalidOptionValue, got: {other:?}"),
    }

    c.set_args(["-Jok", "-J", "fine"]);
    assert_eq!(c.value_list("J").unwrap(), ["ok", "fine"]);
}

#[test]
fn multi_valued_defaults_are_appended_once() {
    let mut c = clio(&["-I", "-I", "-Ilocal", "-I"]);
    c.option("I").unwrap().with_many_values_or(["a", "b"]);
    assert_eq!(c.value_list("I").unwrap(), ["a", "b", "local"]);
    assert_eq!(c.presence_count("I").unwrap(), 4);
}
