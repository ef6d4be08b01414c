use log::{ debug, warn };
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;

use crate::notifications::DeviceNotifications;
use crate::session::{ AppState, Event, Screen, Session };

pub const HELP: &str =
    "commands: /login <user> <password>, /refresh, /notify, /background, /foreground, /quit; anything else is sent as a message";

/// Maps one input line to an event. Blank lines and unknown commands yield `None`.
pub fn parse_command(line: &str) -> Option<Event> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if !line.starts_with('/') {
        return Some(Event::Compose(line.to_string()));
    }

    let mut parts = line.split_whitespace();
    match parts.next()? {
        "/login" => {
            let username = parts.next().unwrap_or_default().to_string();
            let password = parts.next().unwrap_or_default().to_string();
            Some(Event::LoginSubmitted { username, password })
        }
        "/refresh" => Some(Event::Refresh),
        "/notify" => Some(Event::NotificationReceived),
        "/background" => Some(Event::AppStateChanged(AppState::Background)),
        "/foreground" => Some(Event::AppStateChanged(AppState::Active)),
        "/quit" => Some(Event::Shutdown),
        _ => None,
    }
}

/// Feeds stdin lines into the event queue from a dedicated thread, so a
/// blocked read never holds up runtime shutdown. A `/notify` line also
/// records a pending notification on the device so foreground dismissal has
/// something to clear. End of input sends `Shutdown`.
pub fn spawn_stdin_reader(
    sender: mpsc::Sender<Event>,
    device: Arc<DeviceNotifications>
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new().name("stdin-reader".into()).spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            };
            match parse_command(&line) {
                Some(event) => {
                    if event == Event::NotificationReceived {
                        device.deliver();
                    }
                    if sender.blocking_send(event).is_err() {
                        return;
                    }
                }
                None if line.trim().is_empty() => {}
                None => println!("{}", HELP),
            }
        }
        debug!("stdin closed");
        if sender.blocking_send(Event::Shutdown).is_err() {
            debug!("event loop already stopped");
        }
    })
}

/// Prints screen changes, warnings and newly arrived messages.
#[derive(Default)]
pub struct Printer {
    screen: Option<Screen>,
    warning: Option<String>,
    shown: usize,
}

impl Printer {
    pub fn render(&mut self, session: &Session) -> Vec<String> {
        let mut out = Vec::new();
        if self.screen != Some(session.screen) {
            self.screen = Some(session.screen);
            out.push(format!("== {} ==", session.screen));
            if session.screen == Screen::Login {
                out.push("log in with /login <user> <password>".to_string());
            }
        }
        if session.warning_message != self.warning {
            if let Some(warning) = &session.warning_message {
                out.push(format!("! {}", warning));
            }
            self.warning = session.warning_message.clone();
        }
        if session.messages.len() < self.shown {
            self.shown = 0;
        }
        for message in &session.messages[self.shown..] {
            out.push(format!("[{}] {}", message.sender_name(), message.text));
        }
        self.shown = session.messages.len();
        out
    }

    pub fn print(&mut self, session: &Session) {
        for line in self.render(session) {
            println!("{}", line);
        }
    }
}
