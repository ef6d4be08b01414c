use log::{ debug, info };
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::controller::SessionController;
use super::event::Event;
use super::state::Session;

pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Drains `events` one at a time until `Shutdown` or until every sender is
/// gone. A handler's follow-up event runs before the next queued event, and
/// `observer` sees the session after each handled event.
pub async fn run_event_loop<F>(
    mut controller: SessionController,
    mut events: mpsc::Receiver<Event>,
    mut observer: F
) -> Session
    where F: FnMut(&Session)
{
    while let Some(event) = events.recv().await {
        if event == Event::Shutdown {
            info!("Shutdown requested");
            break;
        }

        let mut next = Some(event);
        while let Some(current) = next.take() {
            next = controller.handle(current).await;
            observer(controller.session());
        }
    }

    debug!("Event loop finished on the {} screen", controller.session().screen);
    controller.into_session()
}

/// Queues a `Refresh` every `period`, starting one period from now. Stops
/// when the loop's receiver is dropped.
pub fn spawn_refresh_timer(sender: mpsc::Sender<Event>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            interval.tick().await;
            if sender.send(Event::Refresh).await.is_err() {
                break;
            }
        }
    })
}
