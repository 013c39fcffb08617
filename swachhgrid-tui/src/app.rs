use std::{mem, sync::Arc};

use swachhgrid_core::{
    model::{Alert, Bin, DashboardStats, RouteOptimization},
    notify::{Notification, NotificationReceiver},
    service::{ServiceError, SwachhService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Bins,
    Alerts,
    Route,
}

impl Screen {
    pub(crate) fn next(self) -> Self {
        match self {
            Screen::Bins => Screen::Alerts,
            Screen::Alerts => Screen::Route,
            Screen::Route => Screen::Bins,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Browse,
    FillLevel,
    NewBin,
}

pub(crate) struct App {
    pub service: Arc<SwachhService>,
    pub notifications: NotificationReceiver,

    pub screen: Screen,
    pub input_mode: InputMode,
    pub input: String,

    pub bins: Vec<Bin>,
    pub bin_index: usize,
    pub alerts: Vec<Alert>,
    pub alert_index: usize,
    pub stats: DashboardStats,
    pub route: RouteOptimization,

    pub is_loading: bool,
    pub info_message: Option<String>,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<SwachhService>) -> Self {
        let notifications = service.subscribe();
        Self {
            service,
            notifications,
            screen: Screen::Bins,
            input_mode: InputMode::Browse,
            input: String::new(),
            bins: Vec::new(),
            bin_index: 0,
            alerts: Vec::new(),
            alert_index: 0,
            stats: DashboardStats::default(),
            route: RouteOptimization::default(),
            is_loading: false,
            info_message: None,
            error_message: None,
        }
    }

    /// Reload every view from the service.
    pub(crate) async fn refresh(&mut self) -> Result<(), ServiceError> {
        self.bins = self.service.list_bins().await?;
        self.alerts = self.service.list_alerts().await?;
        self.stats = self.service.dashboard_stats().await?;
        self.route = self.service.optimize_route().await?;

        self.bin_index = self.bin_index.min(self.bins.len().saturating_sub(1));
        self.alert_index = self.alert_index.min(self.alerts.len().saturating_sub(1));
        Ok(())
    }

    pub(crate) fn selected_bin(&self) -> Option<&Bin> {
        self.bins.get(self.bin_index)
    }

    pub(crate) fn selected_alert(&self) -> Option<&Alert> {
        self.alerts.get(self.alert_index)
    }

    pub(crate) fn start_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
        self.error_message = None;
    }

    pub(crate) fn finish_input(&mut self) -> String {
        self.input_mode = InputMode::Browse;
        mem::take(&mut self.input)
    }

    /// Drain pending notifications; returns whether any arrived.
    pub(crate) fn drain_notifications(&mut self) -> bool {
        let mut received = false;
        while let Ok(notification) = self.notifications.try_recv() {
            self.info_message = Some(describe(&notification));
            received = true;
        }
        received
    }
}

fn describe(notification: &Notification) -> String {
    match notification {
        Notification::BinCreated(bin) => format!("Created {} ({})", bin.name, bin.id),
        Notification::BinUpdated(bin) => {
            format!("{} now {}% full ({})", bin.name, bin.fill_level, bin.status)
        }
        Notification::AlertAcknowledged(alert) => format!("Acknowledged {}", alert.id),
        Notification::DemoDataInitialized(summary) => format!(
            "Loaded {} demo bins, {} alerts and {} new accounts",
            summary.bins_count, summary.alerts_count, summary.users_count
        ),
    }
}
