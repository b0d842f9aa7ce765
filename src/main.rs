use std::sync::Arc;

use eyre::{Context, Result};
use insight::backend::new_transport;
use insight::cli::{Action, Command, ParseArgs, SummarizeArgs};
use insight::config::{Configuration, init_logger, resolve_path, verbose};
use insight::models::{
    ArcEventTx, Event, FileContext, IncontextInsight, Interaction, StaticContext,
};
use insight::parsers::ParserRegistry;
use insight::popover::{EventChatRegistry, SummaryPopover, SummaryState};
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let config = cmd.get_config()?;
    init_logger(&config.log)?;
    Configuration::init(config)?;
    verbose!("[+] Logger initialized");

    match cmd.action() {
        Some(Action::Summarize(args)) => summarize(args).await,
        Some(Action::Parse(args)) => parse(args).await,
        None => eyre::bail!("No command given, see --help"),
    }
}

async fn summarize(args: &SummarizeArgs) -> Result<()> {
    let config = Configuration::instance();

    let mut insight = IncontextInsight::new(&args.key)
        .with_suggestions(args.suggestions.clone())
        .with_datasource_id(
            args.data_source_id
                .clone()
                .or_else(|| config.assistant.data_source_id.clone()),
        );
    if let Some(path) = args.context_file.as_deref() {
        let path = resolve_path(path).wrap_err(format!("resolving context file {}", path))?;
        insight = insight.with_context_provider(Arc::new(FileContext::new(path)));
    } else if let Some(context) = args.context.as_deref() {
        insight = insight.with_context_provider(Arc::new(StaticContext(context.to_string())));
    }

    let (tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let event_tx: ArcEventTx = Arc::new(tx);

    verbose!("[+] Connecting to {}", config.assistant.endpoint);
    let mut popover = SummaryPopover::new(
        insight,
        new_transport(&config.assistant),
        Arc::clone(&event_tx),
    )
    .with_registry(Arc::new(EventChatRegistry::new(Arc::clone(&event_tx))));

    verbose!("[+] Generating summary...");
    let generated = match popover.generate_summary().await {
        SummaryState::Completed(summary) => {
            println!("{}", summary.text);
            true
        }
        _ => false,
    };

    if generated && args.continue_in_chat {
        popover
            .continue_in_chat()
            .await
            .wrap_err("continuing in chat")?;
    }

    while let Ok(event) = event_rx.try_recv() {
        match event {
            Event::Notice(notice) => eprintln!("{}", notice),
            Event::ContinueInChat {
                insight,
                conversation_id,
            } => println!(
                "Continue {} insight in conversation {}",
                insight.key(),
                conversation_id
            ),
            Event::ClosePopover => log::debug!("Popover closed"),
        }
    }

    if !generated {
        eyre::bail!("Summary generation failed, see {}", config.log.file.path);
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InteractionInput {
    Many(Vec<Interaction>),
    One(Interaction),
}

async fn parse(args: &ParseArgs) -> Result<()> {
    let raw = match args.file.as_deref() {
        Some(path) => {
            let path = resolve_path(path).wrap_err(format!("resolving {}", path))?;
            tokio::fs::read_to_string(&path)
                .await
                .wrap_err(format!("reading {}", path))?
        }
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .wrap_err("reading stdin")?;
            buf
        }
    };

    let interactions = match serde_json::from_str::<InteractionInput>(&raw)
        .wrap_err("parsing interaction")?
    {
        InteractionInput::Many(interactions) => interactions,
        InteractionInput::One(interaction) => vec![interaction],
    };

    let registry = ParserRegistry::builtin();
    verbose!(
        "[+] Parsing {} interactions with {} parsers",
        interactions.len(),
        registry.len()
    );

    let messages = interactions
        .iter()
        .flat_map(|interaction| registry.parse(interaction))
        .collect::<Vec<_>>();

    println!(
        "{}",
        serde_json::to_string_pretty(&messages).wrap_err("serializing messages")?
    );
    Ok(())
}
