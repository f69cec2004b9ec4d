use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Frame, Terminal};

use crate::config::Config;
use crate::form::Route;
use crate::state::SubscriptionState;

use super::action::Action;
use super::channels::{ChannelNavigator, DialogRequest, DialogRequests};
use super::error::AppError;
use super::screens::{
    CreateSubscriptionState, HelpState, SubscriptionListState, draw_create_subscription,
    draw_help, draw_subscription_list,
};
use super::widgets::{ConfirmDialogState, draw_confirm_dialog};

const CLEAR_QUESTION: &str = "Clear the form?";

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// The sign-up form.
    CreateSubscription,
    /// Subscriptions stored this session.
    SubscriptionList,
    /// Keybinding help.
    Help,
}

impl Screen {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::CreateSubscription => "Create Subscription",
            Self::SubscriptionList => "Subscription List",
            Self::Help => "Help",
        }
    }
}

impl From<Route> for Screen {
    fn from(route: Route) -> Self {
        match route {
            Route::CreateSubscription => Self::CreateSubscription,
            Route::SubscriptionList => Self::SubscriptionList,
        }
    }
}

/// Top-level application state.
pub struct App {
    screen: Screen,
    subscriptions: SubscriptionState,
    create: CreateSubscriptionState,
    list: SubscriptionListState,
    help: HelpState,
    dialog: Option<ConfirmDialogState>,
    routes: mpsc::Receiver<Route>,
    dialog_requests: mpsc::Receiver<DialogRequest>,
    tick_rate: Duration,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` starting on the sign-up form.
    pub fn new(config: &Config) -> Self {
        let subscriptions = SubscriptionState::new();
        let (route_tx, routes) = mpsc::channel();
        let (dialog_tx, dialog_requests) = mpsc::channel();
        let create = CreateSubscriptionState::from_config(
            subscriptions.clone(),
            ChannelNavigator::new(route_tx),
            DialogRequests::new(dialog_tx),
            config,
        );
        Self {
            screen: Screen::CreateSubscription,
            subscriptions,
            create,
            list: SubscriptionListState::new(),
            help: HelpState::new(),
            dialog: None,
            routes,
            dialog_requests,
            tick_rate: config.tick_rate(),
            should_quit: false,
        }
    }

    /// Creates an `App` from the user's config file, defaults if there is none.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn load() -> Result<Self, AppError> {
        let config = Config::load()?;
        tracing::info!(?config, "config loaded");
        Ok(Self::new(&config))
    }

    /// Creates an `App` from the config file at `path`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, AppError> {
        Ok(Self::new(&Config::load_from(path)?))
    }

    /// Main event loop: draw → wait for input or the next deadline → dispatch → tick.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        tracing::info!("event loop started");
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            let timeout = self.poll_timeout(Instant::now());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key, Instant::now());
                }
            }
            self.tick(Instant::now());
        }
        tracing::info!("event loop stopped");
        Ok(())
    }

    /// How long the loop may block: until the idle deadline, at most one tick.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.create
            .time_until_idle(now)
            .map_or(self.tick_rate, |left| left.min(self.tick_rate))
    }

    /// Renders the current screen and any open dialog.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        match self.screen {
            Screen::CreateSubscription => {
                draw_create_subscription(&self.create, self.subscriptions.len(), frame, area)
            }
            Screen::SubscriptionList => draw_subscription_list(&self.list, frame, area),
            Screen::Help => draw_help(&self.help, frame, area),
        }
        if let Some(dialog) = &self.dialog {
            draw_confirm_dialog(dialog, frame, area);
        }
    }

    /// Handles a key event: an open dialog first, then global keys, then the screen.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if let Some(dialog) = self.dialog.as_mut() {
            if dialog.handle_key(key) {
                self.dialog = None;
            }
            self.tick(now);
            return;
        }

        if key.code == KeyCode::F(1) {
            if self.screen != Screen::Help {
                self.help.open_from(self.screen);
                self.screen = Screen::Help;
            }
            return;
        }

        let action = match self.screen {
            Screen::CreateSubscription => self.create.handle_key(key, now),
            Screen::SubscriptionList => self.list.handle_key(key),
            Screen::Help => self.help.handle_key(key),
        };
        self.apply(action);
        self.drain_requests();
    }

    /// Advances timers and picks up requests made by the form.
    pub fn tick(&mut self, now: Instant) {
        self.create.tick(now);
        self.drain_requests();
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(screen) => self.show(screen),
            Action::Quit => self.should_quit = true,
        }
    }

    fn show(&mut self, screen: Screen) {
        if screen == Screen::SubscriptionList {
            self.list.load(&self.subscriptions);
        }
        self.screen = screen;
    }

    /// Opens requested dialogs and follows navigation requested by the form.
    fn drain_requests(&mut self) {
        while let Ok(request) = self.dialog_requests.try_recv() {
            // A newer request replaces an open one; dropping it dismisses it.
            self.dialog = Some(ConfirmDialogState::new(request, CLEAR_QUESTION));
        }
        while let Ok(route) = self.routes.try_recv() {
            tracing::debug!(%route, "navigating");
            if route == Route::SubscriptionList {
                // Leaving after a submit starts the next visit with a fresh form.
                self.create.reset();
            }
            self.show(route.into());
        }
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns `true` while a confirmation dialog is shown.
    pub fn dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    /// The shared subscription state.
    pub fn subscriptions(&self) -> &SubscriptionState {
        &self.subscriptions
    }

    /// The sign-up screen state.
    pub fn create(&self) -> &CreateSubscriptionState {
        &self.create
    }

    /// The list screen state.
    pub fn list(&self) -> &SubscriptionListState {
        &self.list
    }
}
