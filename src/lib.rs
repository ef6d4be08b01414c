pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod notifications;
pub mod remote;
pub mod session;
pub mod store;
pub mod terminal;

use cli::Args;
use config::users::UserDirectory;
use error::ClientError;
use log::info;
use notifications::DeviceNotifications;
use remote::HttpRemoteService;
use session::{ run_event_loop, spawn_refresh_timer, Event, Session, SessionController, EVENT_QUEUE_CAPACITY };
use std::sync::Arc;
use std::time::Duration;
use terminal::Printer;
use tokio::sync::mpsc;

pub async fn run(args: Args) -> Result<Session, ClientError> {
    info!("--- Core Configuration ---");
    info!("Endpoint: {}", args.endpoint);
    info!("Store Type: {}", args.store_type);
    info!("Users Path: {}", args.users_path.as_deref().unwrap_or("built-in"));
    info!("Notifications Granted: {}", args.notifications_granted);
    info!("Refresh Interval: {}s", args.refresh_secs);
    info!("-------------------------");

    let directory = UserDirectory::load(args.users_path.as_deref())?;
    let store = store::create_store(&args).await?;
    let remote = Arc::new(HttpRemoteService::new(&args.endpoint)?);
    let device = Arc::new(DeviceNotifications::from_args(&args));

    let controller = SessionController::new(store, remote, device.clone(), directory);

    let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    tx.send(Event::Started).await?;
    if let (Some(username), Some(password)) = (args.username.clone(), args.password.clone()) {
        tx.send(Event::LoginSubmitted { username, password }).await?;
    }
    if args.refresh_secs > 0 {
        spawn_refresh_timer(tx.clone(), Duration::from_secs(args.refresh_secs));
    }
    println!("{}", terminal::HELP);
    terminal::spawn_stdin_reader(tx, device)?;

    let mut printer = Printer::default();
    let session = run_event_loop(controller, rx, |s| printer.print(s)).await;
    info!("Session ended on the {} screen with {} messages", session.screen, session.messages.len());
    Ok(session)
}
