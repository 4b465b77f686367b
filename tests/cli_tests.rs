use clap::error::ErrorKind;
use dyncli::*;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

fn single(app_name: &str, command: CommandFn) -> App {
    let mut app = App::builder(app_name).version("1.2.3").build();
    app.command().register(command).unwrap();
    app
}

fn output(app: &App, argv: &[&str]) -> String {
    let mut out = Vec::new();
    app.run_from(argv.iter().copied(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn clap_kind(app: &App, argv: &[&str]) -> ErrorKind {
    let mut out = Vec::new();
    match app.run_from(argv.iter().copied(), &mut out) {
        Err(DynCliError::Clap(e)) => e.kind(),
        other => panic!("expected a clap error, got {:?}", other),
    }
}

/// Prints every bound argument as `name=value`
fn echo(signature: Signature) -> CommandFn {
    CommandFn::new("echo", signature, |args, out| {
        for (name, value) in args.iter() {
            writeln!(out, "{}={}", name, value)?;
        }
        Ok(())
    })
}

#[test]
fn test_help_shows_injected_metadata() {
    let specs = SpecTable::application()
        .with(
            "name",
            ArgSpec::new(ValueType::String, Marker::argument().help("Who to greet"))
                .with_default("World"),
        )
        .unwrap();
    let mut app = App::builder("greeter")
        .specs(specs)
        .about("Says hello")
        .build();
    app.command()
        .register(echo(Signature::from_names(["name"]).unwrap()))
        .unwrap();

    let help = output(&app, &["greeter", "--help"]);
    assert!(help.contains("Says hello"));
    assert!(help.contains("Who to greet"));
    assert!(help.contains("[default: World]"));
}

#[test]
fn test_version_is_written_to_output() {
    let app = single("tool", echo(Signature::default()));
    assert!(output(&app, &["tool", "--version"]).contains("1.2.3"));
}

#[test]
fn test_typed_values_reach_the_handler() {
    let signature = Signature::new(vec![
        Param::new("count").default(1),
        Param::new("ratio").default(0.5),
        Param::new("verbose").default(false),
        Param::new("color").default(true),
        Param::keyword_only("tags")
            .typed(ValueType::List)
            .default(ArgValue::null()),
    ])
    .unwrap();
    let app = single("tool", echo(signature));

    assert_eq!(
        output(&app, &["tool"]),
        "count=1\nratio=0.5\nverbose=false\ncolor=true\ntags=null\n"
    );
    assert_eq!(
        output(
            &app,
            &[
                "tool", "--count", "3", "--ratio", "2.5", "--verbose", "--no-color", "--tags",
                "a", "--tags", "b"
            ]
        ),
        "count=3\nratio=2.5\nverbose=true\ncolor=false\ntags=[\"a\",\"b\"]\n"
    );
}

#[test]
fn test_invalid_values_are_rejected() {
    let signature = Signature::new(vec![
        Param::new("count").default(1),
        Param::new("mode")
            .default("fast")
            .marker(Marker::option().choices(["fast", "slow"])),
    ])
    .unwrap();
    let app = single("tool", echo(signature));

    assert_eq!(
        clap_kind(&app, &["tool", "--count", "many"]),
        ErrorKind::ValueValidation
    );
    assert_eq!(
        clap_kind(&app, &["tool", "--mode", "medium"]),
        ErrorKind::InvalidValue
    );
    assert_eq!(
        output(&app, &["tool", "--mode", "slow"]),
        "count=1\nmode=\"slow\"\n"
    );
}

#[test]
fn test_variadic_collects_trailing_values() {
    let signature = Signature::new(vec![Param::new("first"), Param::variadic("rest")]).unwrap();
    let app = single("tool", echo(signature));

    assert_eq!(
        output(&app, &["tool", "a", "b", "c"]),
        "first=\"a\"\nrest=[\"b\",\"c\"]\n"
    );
    assert_eq!(output(&app, &["tool", "a"]), "first=\"a\"\nrest=[]\n");
}

#[test]
fn test_marker_attributes_are_forwarded() {
    let signature = Signature::new(vec![Param::new("output")
        .default("out.txt")
        .marker(
            Marker::option()
                .short('o')
                .long("out")
                .value_name("FILE")
                .alias("dest")
                .help("Where to write"),
        )])
    .unwrap();
    let app = single("tool", echo(signature));

    assert_eq!(output(&app, &["tool", "-o", "a.txt"]), "output=\"a.txt\"\n");
    assert_eq!(output(&app, &["tool", "--out", "b.txt"]), "output=\"b.txt\"\n");
    assert_eq!(output(&app, &["tool", "--dest", "c.txt"]), "output=\"c.txt\"\n");

    let help = output(&app, &["tool", "--help"]);
    assert!(help.contains("--out <FILE>"));
    assert!(help.contains("Where to write"));
}

#[test]
fn test_subcommand_required_with_many_commands() {
    let mut app = App::new("tool");
    app.command()
        .name("a")
        .register(echo(Signature::default()))
        .unwrap();
    app.command()
        .name("b")
        .register(echo(Signature::default()))
        .unwrap();

    assert_eq!(
        clap_kind(&app, &["tool"]),
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    );
    assert_eq!(
        clap_kind(&app, &["tool", "c"]),
        ErrorKind::InvalidSubcommand
    );
    assert_eq!(output(&app, &["tool", "b"]), "");
}

#[test]
fn test_handler_errors_are_returned() {
    let app = single(
        "tool",
        CommandFn::new("fail", Signature::default(), |_, _| {
            anyhow::bail!("boom")
        }),
    );
    let mut out = Vec::new();
    let err = app.run_from(["tool"], &mut out).unwrap_err();
    assert!(matches!(err, DynCliError::Handler(_)));
    assert_eq!(err.to_string(), "boom");
}

#[test]
fn test_clashing_option_names_fail_at_registration() {
    let mut app = App::new("tool");
    let signature = Signature::new(vec![Param::keyword_only("help")]).unwrap();
    let err = app.command().register(echo(signature)).unwrap_err();
    assert!(matches!(err, DynCliError::Framework { .. }));

    let signature = Signature::new(vec![
        Param::new("a").default(1).marker(Marker::option().short('x')),
        Param::new("b").default(2).marker(Marker::option().short('x')),
    ])
    .unwrap();
    let err = app.command().register(echo(signature)).unwrap_err();
    assert!(matches!(err, DynCliError::Framework { .. }));
}

#[test]
fn test_conf_file_option_overrides_defaults_but_not_command_line() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("conf.json");
    fs::write(
        &path,
        r#"{"global": {"greet": "Howdy", "unused": 1}, "hello": {"name": "Zed"}}"#,
    )
    .unwrap();
    let path = path.to_string_lossy().to_string();

    let specs = SpecTable::application()
        .with(
            "name",
            ArgSpec::new(ValueType::String, Marker::argument()).with_default("World"),
        )
        .unwrap()
        .with(
            "greet",
            ArgSpec::new(ValueType::String, Marker::option()).with_default("Hello"),
        )
        .unwrap();
    let mut app = App::builder("greeter").specs(specs).build();
    app.command()
        .with_config_option(true)
        .register(CommandFn::new(
            "hello",
            Signature::from_names(["greet", "name"]).unwrap(),
            |args, out| {
                assert!(!args.contains("conf_file"));
                writeln!(out, "{} {}", args.str("greet")?, args.str("name")?)?;
                Ok(())
            },
        ))
        .unwrap();

    assert_eq!(output(&app, &["greeter"]), "Hello World\n");
    assert_eq!(
        output(&app, &["greeter", "--conf-file", path.as_str()]),
        "Howdy Zed\n"
    );
    assert_eq!(
        output(&app, &["greeter", "Amy", "--conf-file", path.as_str()]),
        "Howdy Amy\n"
    );

    let mut out = Vec::new();
    let missing = temp_dir.path().join("missing.json");
    let err = app
        .run_from(
            ["greeter".to_string(), "--conf-file".to_string(), missing.to_string_lossy().to_string()],
            &mut out,
        )
        .unwrap_err();
    assert!(matches!(err, DynCliError::Io(_)));
}

#[test]
fn test_conf_file_values_follow_declared_types() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("conf.toml");
    fs::write(&path, "[global]\ncount = \"5\"\nlabel = 7\n").unwrap();
    let path = path.to_string_lossy().to_string();

    let signature = Signature::new(vec![
        Param::new("count").typed(ValueType::Int).default(1),
        Param::new("label").default("none"),
    ])
    .unwrap();
    let mut app = App::new("tool");
    app.command()
        .with_config_option(true)
        .register(CommandFn::new("show", signature, |args, out| {
            writeln!(out, "{} {}", args.int("count")?, args.str("label")?)?;
            Ok(())
        }))
        .unwrap();

    assert_eq!(output(&app, &["tool"]), "1 none\n");
    assert_eq!(output(&app, &["tool", "--conf-file", path.as_str()]), "5 7\n");

    fs::write(temp_dir.path().join("conf.toml"), "[global]\ncount = \"five\"\n").unwrap();
    let mut out = Vec::new();
    let err = app
        .run_from(["tool", "--conf-file", path.as_str()], &mut out)
        .unwrap_err();
    assert!(matches!(err, DynCliError::TypeConversion { .. }));
}
