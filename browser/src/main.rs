//! `character-browser` -- browse the character API from a terminal.
//!
//! Reads one command per line from stdin (`help` lists them) and redraws the
//! page after each. Logs go to stderr; see `RUST_LOG`.

use std::io::{self, BufRead, Write};

use character_browser::{Command, CommandError, Config, Renderer, Session, Step, UreqTransport};
use character_core::CharacterClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "character_browser=info,character_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env()?;
    let client = CharacterClient::new(&config.api_url);
    tracing::info!(api_url = %client.base_url(), layout = ?config.layout, "Starting character browser");

    let renderer = Renderer::new(config.color);
    let mut session = Session::new(client, UreqTransport::new(), config.layout);
    let mut out = io::stdout().lock();

    let view = session.refresh();
    draw(&mut out, &renderer, &mut session, Step::Render(view))?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                writeln!(out, "{e} (type `help`)")?;
                continue;
            }
        };
        let step = session.apply(command);
        if matches!(step, Step::Quit) {
            break;
        }
        draw(&mut out, &renderer, &mut session, step)?;
    }
    Ok(())
}

fn draw(
    out: &mut impl Write,
    renderer: &Renderer,
    session: &mut Session<UreqTransport>,
    step: Step,
) -> io::Result<()> {
    for note in session.drain_notifications() {
        writeln!(out, "{}", renderer.notification(&note))?;
    }
    match step {
        Step::Render(view) => {
            writeln!(out, "{}", renderer.page(&view, session.cards(), session.layout()))?
        }
        Step::Detail(Ok(character)) => writeln!(out, "{}", renderer.detail(&character))?,
        Step::Detail(Err(e)) => writeln!(out, "could not load character: {e}")?,
        Step::Ignored(reason) => writeln!(out, "{reason}")?,
        Step::Help => writeln!(out, "{}", character_browser::command::HELP)?,
        Step::Quit => {}
    }
    out.flush()
}
