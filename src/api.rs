//! HTTP API for the chat widget

mod busy;
mod handlers;
mod types;

pub use handlers::create_router;

use crate::notify::LeadNotifier;
use crate::profile::Profile;
use crate::render::Renderer;
use crate::responder::Responder;
use crate::store::SessionStore;
use busy::BusySessions;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub responder: Arc<Responder>,
    pub renderer: Arc<Renderer>,
    pub notifier: Arc<dyn LeadNotifier>,
    pub profile: &'static Profile,
    pub summary_delay: Duration,
    busy: Arc<BusySessions>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        responder: Responder,
        renderer: Renderer,
        notifier: Arc<dyn LeadNotifier>,
        profile: &'static Profile,
        summary_delay: Duration,
    ) -> Self {
        Self {
            store,
            responder: Arc::new(responder),
            renderer: Arc::new(renderer),
            notifier,
            profile,
            summary_delay,
            busy: Arc::new(BusySessions::default()),
        }
    }
}
