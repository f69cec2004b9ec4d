//! Channel-backed implementations of the form's navigation and dialog
//! collaborators. The [`App`](super::App) owns the receiving ends and drains
//! them after every event.

use std::sync::mpsc;

use futures::channel::oneshot;

use crate::form::{ConfirmDialog, DialogConfig, DialogResult, NavigationError, Navigator, Route};

/// Forwards navigation requests to the app.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::Sender<Route>,
}

impl ChannelNavigator {
    pub fn new(tx: mpsc::Sender<Route>) -> Self {
        Self { tx }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&mut self, route: Route) -> Result<(), NavigationError> {
        self.tx
            .send(route)
            .map_err(|_| NavigationError::Closed(route.key().to_string()))
    }
}

/// A confirmation dialog the app should show, with the channel for its answer.
#[derive(Debug)]
pub struct DialogRequest {
    pub config: DialogConfig,
    pub responder: oneshot::Sender<DialogResult>,
}

/// Forwards confirmation requests to the app, which renders them as a modal.
#[derive(Debug, Clone)]
pub struct DialogRequests {
    tx: mpsc::Sender<DialogRequest>,
}

impl DialogRequests {
    pub fn new(tx: mpsc::Sender<DialogRequest>) -> Self {
        Self { tx }
    }
}

impl ConfirmDialog for DialogRequests {
    fn open_confirmation(&mut self, config: DialogConfig) -> oneshot::Receiver<DialogResult> {
        let (responder, answer) = oneshot::channel();
        // If the app is gone the request (and its responder) is dropped here,
        // which the form sees as a dismissed dialog.
        if self.tx.send(DialogRequest { config, responder }).is_err() {
            tracing::warn!("confirmation dialog requested with no app listening");
        }
        answer
    }
}
