//! Integration tests for the dyncli library
//!
//! These tests drive complete applications through `App::run_from`, from
//! spec tables and configuration files down to the handler output.

use dyncli::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

fn shared_specs() -> SpecTable {
    SpecTable::application()
        .with(
            "name",
            ArgSpec::new(ValueType::String, Marker::argument().help("Who to greet"))
                .with_default("World"),
        )
        .unwrap()
        .with(
            "greet",
            ArgSpec::new(ValueType::String, Marker::option().help("Greeting word"))
                .with_default("Hello"),
        )
        .unwrap()
        .with(
            "time",
            ArgSpec::new(ValueType::String, Marker::option().help("Time of day"))
                .with_default("12:00"),
        )
        .unwrap()
}

fn greet_with_time(name: &str) -> CommandFn {
    CommandFn::new(
        name,
        Signature::from_names(["greet", "name", "time"]).unwrap(),
        |args, out| {
            writeln!(
                out,
                "{} {} ({})",
                args.str("greet")?,
                args.str("name")?,
                args.str("time")?
            )?;
            Ok(())
        },
    )
}

fn run(app: &App, argv: &[&str]) -> String {
    let mut out = Vec::new();
    app.run_from(argv.iter().copied(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_app_spec_fills_missing_defaults() {
    let specs = SpecTable::application()
        .with(
            "name",
            ArgSpec::new(ValueType::String, Marker::argument()).with_default("World"),
        )
        .unwrap()
        .with(
            "time",
            ArgSpec::new(ValueType::String, Marker::option()).with_default("12:00"),
        )
        .unwrap();
    let mut app = App::builder("app").specs(specs).build();
    let registered = app.command().register(greet_with_time("greet1")).unwrap();

    let signature = registered.command().signature();
    assert_eq!(signature.get("name").unwrap().default, Some("World".into()));
    assert_eq!(signature.get("time").unwrap().default, Some("12:00".into()));
    // no spec for `greet`: untouched and still required
    assert_eq!(signature.get("greet").unwrap(), &Param::new("greet"));

    assert_eq!(run(&app, &["app", "Hey"]), "Hey World (12:00)\n");

    let mut out = Vec::new();
    let err = app.run_from(["app"], &mut out).unwrap_err();
    match err {
        DynCliError::Clap(e) => {
            assert_eq!(e.kind(), clap::error::ErrorKind::MissingRequiredArgument)
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_multi_command_app() {
    let mut app = App::builder("app").specs(shared_specs()).build();
    app.command().register(greet_with_time("cmd1")).unwrap();
    app.command()
        .specs(
            SpecTable::command()
                .with(
                    "name",
                    ArgSpec::new(ValueType::String, Marker::argument()).with_default("Bob"),
                )
                .unwrap(),
        )
        .register(greet_with_time("cmd2"))
        .unwrap();

    assert_eq!(run(&app, &["app", "cmd1"]), "Hello World (12:00)\n");
    assert_eq!(run(&app, &["app", "cmd2"]), "Hello Bob (12:00)\n");
    assert_eq!(
        run(
            &app,
            &["app", "cmd2", "Alice", "--greet", "Hi", "--time", "13:00"]
        ),
        "Hi Alice (13:00)\n"
    );
}

#[test]
fn test_single_command_app() {
    let mut app = App::builder("greeter").specs(shared_specs()).build();
    app.command()
        .register(CommandFn::new(
            "hello",
            Signature::from_names(["greet", "name"]).unwrap(),
            |args, out| {
                writeln!(out, "{} {}", args.str("greet")?, args.str("name")?)?;
                Ok(())
            },
        ))
        .unwrap();

    assert_eq!(run(&app, &["greeter"]), "Hello World\n");
    assert_eq!(run(&app, &["greeter", "Alice"]), "Hello Alice\n");
    assert_eq!(run(&app, &["greeter", "Alice", "--greet", "Hi"]), "Hi Alice\n");
}

#[test]
fn test_explicit_default_beats_every_source() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".app.toml");
    fs::write(&path, "[global]\nname = \"Zed\"\n").unwrap();

    let mut app = App::builder("app")
        .specs(shared_specs())
        .config(ConfigSource::File(path))
        .build();
    app.command()
        .specs(
            SpecTable::command()
                .with("name", ArgSpec::typed(ValueType::String).with_default("Bob"))
                .unwrap(),
        )
        .register(CommandFn::new(
            "hello",
            Signature::new(vec![Param::new("name").default("Alice")]).unwrap(),
            |args, out| {
                writeln!(out, "Hello {}", args.str("name")?)?;
                Ok(())
            },
        ))
        .unwrap();

    assert_eq!(run(&app, &["app"]), "Hello Alice\n");
    assert_eq!(run(&app, &["app", "--name", "Eve"]), "Hello Eve\n");
}

#[test]
fn test_config_file_supplies_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".app.toml");
    fs::write(
        &path,
        r#"
[global]
greet = "Hi"

[cmd2]
greet = "Yo"
"#,
    )
    .unwrap();

    let specs = SpecTable::application()
        .with(
            "name",
            ArgSpec::new(ValueType::String, Marker::argument()).with_default("World"),
        )
        .unwrap();
    let mut app = App::builder("app")
        .specs(specs)
        .config(ConfigSource::File(path))
        .build();
    for name in ["cmd1", "cmd2"] {
        app.command()
            .register(CommandFn::new(
                name,
                Signature::from_names(["greet", "name"]).unwrap(),
                |args, out| {
                    writeln!(out, "{} {}", args.str("greet")?, args.str("name")?)?;
                    Ok(())
                },
            ))
            .unwrap();
    }

    assert_eq!(run(&app, &["app", "cmd1"]), "Hi World\n");
    assert_eq!(run(&app, &["app", "cmd2", "Ann"]), "Yo Ann\n");
    assert_eq!(run(&app, &["app", "cmd1", "--greet", "Hey"]), "Hey World\n");
}

#[test]
fn test_yaml_config_discovered_in_home() {
    let cwd = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    fs::write(
        home.path().join(".app.yml"),
        "global:\n  time: \"08:00\"\n",
    )
    .unwrap();

    let finder = ConfigFinder::with_config(
        "app",
        FinderConfig {
            format: ConfigFormat::Yaml,
            location: ConfigLocation::Both,
            current_dir: Some(cwd.path().to_path_buf()),
            home_dir: Some(home.path().to_path_buf()),
            config_dir: Some(config_dir.path().to_path_buf()),
        },
    );
    let path = finder.find().unwrap();
    assert_eq!(path, home.path().join(".app.yml"));

    let config = ConfigDefaults::load(&path).unwrap();
    let mut app = App::builder("app")
        .specs(
            SpecTable::application()
                .with("time", ArgSpec::typed(ValueType::String))
                .unwrap(),
        )
        .config(ConfigSource::Defaults(config))
        .build();
    app.command()
        .register(CommandFn::new(
            "clock",
            Signature::from_names(["time"]).unwrap(),
            |args, out| {
                writeln!(out, "{}", args.str("time")?)?;
                Ok(())
            },
        ))
        .unwrap();

    assert_eq!(run(&app, &["app"]), "08:00\n");
}

#[test]
fn test_broken_config_is_ignored_at_build() {
    let temp_dir = TempDir::new().unwrap();
    let broken = temp_dir.path().join(".app.toml");
    fs::write(&broken, "[global\nname = ").unwrap();

    let app = App::builder("app")
        .config(ConfigSource::File(broken.clone()))
        .build();
    assert!(app.config_defaults().is_empty());

    let app = App::builder("app")
        .config(ConfigSource::File(temp_dir.path().join("missing.toml")))
        .build();
    assert!(app.config_defaults().is_empty());

    assert!(ConfigDefaults::load(&broken).is_err());
}

#[test]
fn test_rewritten_command_behaves_like_original() {
    let original = greet_with_time("greet");
    let injected = convenience::inject(&original, &shared_specs());
    let args = CallArgs::new()
        .with("greet", "Hi")
        .with("name", "Alice")
        .with("time", "13:00");

    let mut expected = Vec::new();
    let mut actual = Vec::new();
    original.call(&args, &mut expected).unwrap();
    injected.call(&args, &mut actual).unwrap();
    assert_eq!(actual, expected);

    let names: Vec<&str> = injected.signature().names().collect();
    assert_eq!(names, vec!["greet", "name", "time"]);
}

#[test]
fn test_specs_render_and_instantiate() {
    let specs = shared_specs();
    let doc = specs.render_doc();
    assert!(doc.contains("    name : str\n        Who to greet (default: \"World\")\n"));

    let settings = specs.instantiate([("time", "18:00")]).unwrap();
    assert_eq!(settings.str("name").unwrap(), "World");
    assert_eq!(settings.str("time").unwrap(), "18:00");

    let err = specs.instantiate([("nope", 1)]).unwrap_err();
    assert!(matches!(err, DynCliError::UnknownParameter { .. }));
}

#[test]
fn test_config_scalars_follow_declared_types() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".app.yaml");
    fs::write(&path, "global:\n  name: 42\n  count: \"3\"\n").unwrap();

    let specs = SpecTable::application()
        .with("name", ArgSpec::typed(ValueType::String))
        .unwrap()
        .with("count", ArgSpec::typed(ValueType::Int))
        .unwrap();
    let mut app = App::builder("app")
        .specs(specs)
        .config(ConfigSource::File(path))
        .build();
    app.command()
        .register(CommandFn::new(
            "show",
            Signature::from_names(["name", "count"]).unwrap(),
            |args, out| {
                writeln!(out, "{} {}", args.str("name")?, args.int("count")?)?;
                Ok(())
            },
        ))
        .unwrap();

    assert_eq!(run(&app, &["app"]), "42 3\n");
    assert_eq!(run(&app, &["app", "--name", "42"]), "42 3\n");
    assert_eq!(run(&app, &["app", "--count", "7"]), "42 7\n");
}
