use anyhow::Result;
use log::{error, info};
use std::sync::Arc;
use tokio::io::BufReader;

use kiosk::cli::{parse_line, Command, Input};
use kiosk::console::Console;
use kiosk::services::{logging, ApiClient, HttpGateway, SystemClock};
use kiosk::settings::SettingsStore;
use kiosk::ui::{render_status_bar, render_update, Notice, Update, HELP_TEXT};
use kiosk::KioskController;

fn show(updates: &[Update]) {
    for update in updates {
        println!("{}", render_update(update));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    info!("Starting attendance kiosk");

    let store = SettingsStore::default_location()?;
    let settings = store
        .load()?
        .with_overrides(|key| std::env::var(key).ok());

    let api = ApiClient::new(Arc::new(HttpGateway::new()?), None);
    let (mut controller, mut completions) =
        KioskController::new(api, Arc::new(SystemClock), settings, Some(store));
    let loading = controller.loading_flag();

    println!("{}", HELP_TEXT);
    match controller.start().await {
        Ok(count) => info!("Roster loaded: {} students", count),
        Err(e) => show(&[Notice::from(&e).into()]),
    }
    println!("{}", render_status_bar(&controller.status_line()));

    let mut console = Console::new(BufReader::new(tokio::io::stdin()));
    loop {
        let line = tokio::select! {
            line = console.next_line() => match line {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("Input closed, shutting down");
                    break;
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            },
            Some(completion) = completions.recv() => {
                if let Some(update) = controller.apply_completion(completion) {
                    show(&[update]);
                }
                continue;
            }
        };

        // A focused field takes the next line even while loading
        let refuse_scans = controller.state().focus.focused().is_none();
        let updates = match parse_line(&line) {
            Ok(Input::Scan(raw)) => {
                console
                    .while_busy(controller.handle_scan(&raw), &loading, refuse_scans, |u| {
                        show(&[u])
                    })
                    .await
            }
            Ok(Input::Command(Command::Quit)) => break,
            Ok(Input::Command(Command::Help)) => {
                println!("{}", HELP_TEXT);
                continue;
            }
            Ok(Input::Command(Command::Status)) => {
                println!("{}", render_status_bar(&controller.status_line()));
                continue;
            }
            Ok(Input::Command(command)) => {
                console
                    .while_busy(controller.execute(command), &loading, refuse_scans, |u| {
                        show(&[u])
                    })
                    .await
            }
            Err(e) => {
                println!("❌ {}", e);
                continue;
            }
        };
        show(&updates);
    }

    info!("Kiosk stopped with {} background task(s) pending", controller.pending_tasks());
    Ok(())
}
