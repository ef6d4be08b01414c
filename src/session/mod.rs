pub mod controller;
pub mod event;
pub mod event_loop;
pub mod state;

#[cfg(test)]
mod testing;

pub use controller::SessionController;
pub use event::Event;
pub use event_loop::{ run_event_loop, spawn_refresh_timer, EVENT_QUEUE_CAPACITY };
pub use state::{ AppState, Screen, Session };
