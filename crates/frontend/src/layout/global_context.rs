use contracts::dashboards::d100_candy_sales::ViewDescriptor;
use leptos::prelude::*;

/// App-wide UI state shared via context: the loaded view catalog and
/// which analysis is currently shown.
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    /// Catalog fetched once at startup.
    pub views: RwSignal<Vec<ViewDescriptor>>,
    /// Id of the active analysis, `None` until the user picks one.
    pub active: RwSignal<Option<String>>,
    pub sidebar_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            views: RwSignal::new(Vec::new()),
            active: RwSignal::new(None),
            sidebar_open: RwSignal::new(true),
        }
    }

    pub fn activate(&self, id: &str) {
        self.active.set(Some(id.to_string()));
    }

    pub fn active_view(&self) -> Option<ViewDescriptor> {
        let active = self.active.get()?;
        self.views
            .with(|views| views.iter().find(|v| v.id == active).cloned())
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}
