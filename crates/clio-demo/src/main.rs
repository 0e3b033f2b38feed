use anyhow::{Context, Result};
use clio::Clio;
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_NAME: &str = "world";

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let default_name = std::env::var("CLIO_DEMO_NAME").unwrap_or_else(|_| DEFAULT_NAME.to_string());

    let mut clio = Clio::from_env();
    clio.argument("input").described_as("Token to greet with");
    clio.argument("target").described_as("Optional second token");
    clio.option("verbose")?
        .alias("v")?
        .described_as("Increase verbosity, may be repeated")
        .accumulates();
    clio.option("name")?
        .alias("n")?
        .described_as("Who to greet (defaults to $CLIO_DEMO_NAME)")
        .with_default_value(default_name);
    clio.option("include")?
        .alias("I")?
        .described_as("Directory to search, may be repeated")
        .with_many_values();
    clio.option("config")?
        .alias("c")?
        .described_as("Existing file to read settings from")
        .as_path();
    clio.option("port")?
        .alias("p")?
        .described_as("Port number")
        .with_value()
        .matching_pattern(r"/^\d{1,5}$/")
        .with_error_message("--port must be a number between 0 and 99999");
    clio.option("json")?.described_as("Print the parse result as JSON");

    clio.parse_or_exit();
    tracing::debug!("command line parsed");

    if clio.was_present("json")? {
        let report = json!({
            "program": clio.program(),
            "arguments": clio.argument_values()?,
            "options": clio.option_values()?,
            "verbosity": clio.presence_count("verbose")?,
            "includes": clio.value_list("include").map(<[String]>::to_vec).unwrap_or_default(),
            "declared": {
                "arguments": clio.argument_infos(),
                "options": clio.option_infos(),
            },
        });
        let text = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        println!("{text}");
        return Ok(());
    }

    let verbosity = clio.presence_count("v")?;
    let name = clio.value("name")?.unwrap_or(DEFAULT_NAME).to_string();
    let input = clio.argument_value("input")?.map(str::to_string);
    match input {
        Some(input) => println!("{input}, {name}!"),
        None => println!("Hello, {name}!"),
    }

    if verbosity > 0 {
        if let Some(config) = clio.value("config")? {
            println!("config: {config}");
        }
        if let Some(port) = clio.value("port")? {
            println!("port: {port}");
        }
        if clio.was_present("include")? {
            for dir in clio.value_list("include")? {
                println!("include: {dir}");
            }
        }
        let extra = clio.argument_count()?.saturating_sub(2);
        if extra > 0 {
            println!("{extra} extra argument(s)");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
