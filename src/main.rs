use anyhow::Result;
use std::io::Write;

use dyncli::{
    App, ArgSpec, CommandFn, ConfigSource, Marker, Param, Signature, SpecTable, ValueType,
};

/// Argument metadata shared by every greeter command
fn shared_specs() -> dyncli::Result<SpecTable> {
    SpecTable::application()
        .with(
            "name",
            ArgSpec::new(ValueType::String, Marker::argument().help("Who to greet"))
                .with_default("World"),
        )?
        .with(
            "greet",
            ArgSpec::new(ValueType::String, Marker::option().short('g').help("Greeting word"))
                .with_default("Hello"),
        )?
        .with(
            "time",
            ArgSpec::new(ValueType::String, Marker::option().help("Time of day"))
                .with_default("12:00"),
        )?
        .with(
            "shout",
            ArgSpec::new(ValueType::Bool, Marker::option().help("Print in capitals"))
                .with_default(false),
        )
}

fn greeting(greet: &str, name: &str, time: &str, shout: bool) -> String {
    let line = format!("{} {} ({})", greet, name, time);
    if shout {
        line.to_uppercase()
    } else {
        line
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let specs = shared_specs()?;
    let doc = specs.render_doc();

    let mut app = App::builder("dyncli")
        .about("Greeter built from shared argument specs")
        .version(env!("CARGO_PKG_VERSION"))
        .specs(specs)
        .config(ConfigSource::discover())
        .build();

    app.command()
        .about("Greet someone using the shared defaults")
        .with_config_option(true)
        .register(CommandFn::new(
            "hello",
            Signature::from_names(["name", "greet", "time", "shout"])?,
            |args, out| {
                let line = greeting(
                    args.str("greet")?,
                    args.str("name")?,
                    args.str("time")?,
                    args.bool("shout")?,
                );
                writeln!(out, "{}", line)?;
                Ok(())
            },
        ))?;

    app.command()
        .about("Greet Bob unless told otherwise")
        .specs(SpecTable::command().with(
            "name",
            ArgSpec::new(ValueType::String, Marker::argument().help("Who to greet"))
                .with_default("Bob"),
        )?)
        .register(CommandFn::new(
            "bob",
            Signature::from_names(["name", "greet", "time", "shout"])?,
            |args, out| {
                let line = greeting(
                    args.str("greet")?,
                    args.str("name")?,
                    args.str("time")?,
                    args.bool("shout")?,
                );
                writeln!(out, "{}", line)?;
                Ok(())
            },
        ))?;

    app.command()
        .about("Greet Alice in the afternoon")
        .register(CommandFn::new(
            "alice",
            Signature::new(vec![
                Param::new("name").default("Alice"),
                Param::new("greet").default("Hi"),
                Param::new("time").default("13:00"),
            ])?,
            |args, out| {
                writeln!(
                    out,
                    "{}",
                    greeting(args.str("greet")?, args.str("name")?, args.str("time")?, false)
                )?;
                Ok(())
            },
        ))?;

    app.command()
        .about("Describe the shared arguments")
        .register(CommandFn::new("specs", Signature::default(), move |_, out| {
            write!(out, "{}", doc)?;
            Ok(())
        }))?;

    app.run()?;
    Ok(())
}
