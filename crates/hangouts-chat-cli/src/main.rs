mod card_file;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use hangouts_chat_card::{
    CatalogTranslator, ChatIcon, ConnectorMessage, I18nTranslator, PassthroughTranslator,
};
use hangouts_chat_config::{ConnectorConfig, configuration_fields};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::card_file::CardFile;

#[derive(Parser)]
#[command(name = "hangouts-chat-cli")]
#[command(about = "Render Hangouts Chat cards and check connector settings", long_about = None)]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a card file (JSON or YAML) to the platform payload.
    Render {
        /// Card file; read from stdin when omitted.
        #[arg(long, value_name = "CARD_FILE")]
        card: Option<PathBuf>,
        /// Translation catalog: a flat JSON object of template -> localized text.
        #[arg(long, value_name = "CATALOG_JSON")]
        catalog: Option<PathBuf>,
        /// Fail on templates missing from the catalog.
        #[arg(long, requires = "catalog")]
        strict: bool,
        /// Print the connector-agnostic projection instead of the wire payload.
        #[arg(long)]
        generic: bool,
        #[arg(long)]
        pretty: bool,
    },
    /// Validate connector parameters stored as a flat JSON object.
    Config {
        #[arg(long, value_name = "PARAMETERS_JSON")]
        parameters: Option<PathBuf>,
        /// Print the parameter descriptors instead of validating.
        #[arg(long, conflicts_with = "parameters")]
        describe: bool,
    },
    /// List the built-in icon names.
    Icons,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = format!("hangouts_chat_cli={log_level},hangouts_chat_card={log_level}");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Render {
            card,
            catalog,
            strict,
            generic,
            pretty,
        } => render(card.as_deref(), catalog.as_deref(), strict, generic, pretty),
        Command::Config {
            parameters,
            describe,
        } => {
            if describe {
                return print_json(&configuration_fields(), true);
            }
            check_config(parameters.as_deref())
        }
        Command::Icons => {
            for icon in ChatIcon::ALL {
                println!("{icon}");
            }
            Ok(())
        }
    }
}

fn render(
    card: Option<&Path>,
    catalog: Option<&Path>,
    strict: bool,
    generic: bool,
    pretty: bool,
) -> Result<()> {
    let raw = read_input(card, "card")?;
    let file = CardFile::parse(&raw, card).context("parse card file")?;
    let translator = load_translator(catalog, strict)?;
    let message = file.build(translator.as_ref()).context("build card")?;
    debug!(sections = message.card().sections().len(), "card built");

    if generic {
        let projection = message
            .to_generic_message()
            .ok_or_else(|| anyhow!("card has no generic projection"))?;
        return print_json(&projection, pretty);
    }
    let payload = message.to_message().context("serialize card")?;
    print_json(&payload, pretty)
}

fn load_translator(catalog: Option<&Path>, strict: bool) -> Result<Box<dyn I18nTranslator>> {
    let Some(path) = catalog else {
        return Ok(Box::new(PassthroughTranslator));
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read catalog {}", path.display()))?;
    let catalog = CatalogTranslator::from_json(&raw)
        .with_context(|| format!("parse catalog {}", path.display()))?
        .strict(strict);
    info!(entries = catalog.len(), strict, "catalog loaded");
    Ok(Box::new(catalog))
}

fn check_config(parameters: Option<&Path>) -> Result<()> {
    let raw = read_input(parameters, "parameters")?;
    let parameters: BTreeMap<String, String> =
        serde_json::from_str(&raw).context("parse connector parameters")?;
    let config = ConnectorConfig::from_parameters(&parameters);
    config.validate().context("invalid connector configuration")?;
    info!(bot_project_number = %config.bot_project_number, "connector configuration is valid");
    println!("ok");
    Ok(())
}

fn read_input(path: Option<&Path>, what: &str) -> Result<String> {
    if let Some(path) = path {
        return fs::read_to_string(path)
            .with_context(|| format!("read {what} file {}", path.display()));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    if buf.trim().is_empty() {
        return Err(anyhow!("{what} required via --{what} or stdin"));
    }
    Ok(buf)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
