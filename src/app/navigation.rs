//! Navigation - Routes, Path Resolution and Lazily Built Views
//!
//! Every path resolves to exactly one [`Route`]. The root path redirects to
//! the dashboard and anything unknown lands on [`Route::NotFound`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{APP_NAME, ROUTER_HISTORY_LIMIT};
use crate::eventing::{AppEvent, EventSink};
use crate::i18n::{Locale, current_locale, tr_in};

const ROOT_REDIRECT: &str = "/dashboard";

/// Pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Route {
    #[default]
    Dashboard,
    DataInput,
    Analysis,
    PdfOutput,
    QuickCalc,
    Heatpump,
    Crm,
    AdminPanel,
    /// Catch-all for unmatched paths
    NotFound,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::DataInput => "DataInput",
            Route::Analysis => "Analysis",
            Route::PdfOutput => "PdfOutput",
            Route::QuickCalc => "QuickCalc",
            Route::Heatpump => "Heatpump",
            Route::Crm => "Crm",
            Route::AdminPanel => "AdminPanel",
            Route::NotFound => "NotFound",
        }
    }

    /// Canonical path; the catch-all has none
    pub fn path(&self) -> Option<&'static str> {
        match self {
            Route::Dashboard => Some("/dashboard"),
            Route::DataInput => Some("/input"),
            Route::Analysis => Some("/analysis"),
            Route::PdfOutput => Some("/pdf"),
            Route::QuickCalc => Some("/quick-calc"),
            Route::Heatpump => Some("/heatpump"),
            Route::Crm => Some("/crm"),
            Route::AdminPanel => Some("/admin"),
            Route::NotFound => None,
        }
    }

    /// Get the icon name for the page
    pub fn icon(&self) -> &'static str {
        match self {
            Route::Dashboard => "mdi-view-dashboard",
            Route::DataInput => "mdi-form-select",
            Route::Analysis => "mdi-chart-line",
            Route::PdfOutput => "mdi-file-pdf-box",
            Route::QuickCalc => "mdi-calculator",
            Route::Heatpump => "mdi-heat-pump",
            Route::Crm => "mdi-account-group",
            Route::AdminPanel => "mdi-cog",
            Route::NotFound => "mdi-help-circle",
        }
    }

    /// Translation key prefix for the route metadata
    fn meta_key(&self) -> Option<&'static str> {
        match self {
            Route::Dashboard => Some("routes.dashboard"),
            Route::DataInput => Some("routes.input"),
            Route::Analysis => Some("routes.analysis"),
            Route::PdfOutput => Some("routes.pdf"),
            Route::QuickCalc => Some("routes.quick_calc"),
            Route::Heatpump => Some("routes.heatpump"),
            Route::Crm => Some("routes.crm"),
            Route::AdminPanel => Some("routes.admin"),
            Route::NotFound => None,
        }
    }

    /// Title and description in the given locale
    pub fn meta_in(&self, locale: Locale) -> Option<RouteMeta> {
        let key = self.meta_key()?;
        Some(RouteMeta {
            title: tr_in(locale, &format!("{key}.title")),
            description: tr_in(locale, &format!("{key}.description")),
        })
    }

    pub fn meta(&self) -> Option<RouteMeta> {
        self.meta_in(current_locale())
    }

    /// Navigable pages in sidebar order
    pub fn all() -> &'static [Route] {
        &[
            Route::Dashboard,
            Route::DataInput,
            Route::Analysis,
            Route::PdfOutput,
            Route::QuickCalc,
            Route::Heatpump,
            Route::Crm,
            Route::AdminPanel,
        ]
    }

    fn from_normalized(path: &str) -> Route {
        Route::all()
            .iter()
            .copied()
            .find(|r| r.path().is_some_and(|p| p.eq_ignore_ascii_case(path)))
            .unwrap_or(Route::NotFound)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display metadata of a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: String,
    pub description: String,
}

/// Outcome of resolving a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub route: Route,
    /// Normalized path that was matched
    pub path: String,
    /// Original path when a redirect applied
    pub redirected_from: Option<String>,
}

/// A page instance owned by the router
pub trait View: Send {
    fn route(&self) -> Route;

    /// Called every time the router navigates to this view
    fn on_enter(&mut self) {}
}

/// Builds a view on first visit
pub type ViewFactory = Box<dyn Fn() -> Box<dyn View> + Send + Sync>;

/// Strip query, fragment and trailing slashes; empty means root
fn normalize(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Maps paths to routes, owns view instances and the document title
pub struct Router {
    factories: HashMap<Route, ViewFactory>,
    views: HashMap<Route, Box<dyn View>>,
    current: Option<Resolution>,
    history: Vec<Resolution>,
    document_title: String,
    events: EventSink,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("registered", &self.factories.keys().collect::<Vec<_>>())
            .field("instantiated", &self.views.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("document_title", &self.document_title)
            .finish()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            views: HashMap::new(),
            current: None,
            history: Vec::new(),
            document_title: APP_NAME.to_string(),
            events: EventSink::disabled(),
        }
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Register the factory for a route's view
    pub fn register<F>(&mut self, route: Route, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn View> + Send + Sync + 'static,
    {
        self.factories.insert(route, Box::new(factory));
        self.views.remove(&route);
        self
    }

    /// Resolve a path to exactly one route
    pub fn resolve(path: &str) -> Resolution {
        let normalized = normalize(path);
        if normalized == "/" {
            return Resolution {
                route: Route::Dashboard,
                path: ROOT_REDIRECT.to_string(),
                redirected_from: Some(normalized),
            };
        }

        Resolution {
            route: Route::from_normalized(&normalized),
            path: normalized,
            redirected_from: None,
        }
    }

    /// Navigate to a path
    ///
    /// Builds the target view on first visit and sets the document title to
    /// `"<title> - Solar Configurator"` when the route has metadata.
    pub fn navigate(&mut self, path: &str) -> Resolution {
        let resolution = Self::resolve(path);
        let route = resolution.route;

        if !self.views.contains_key(&route) {
            if let Some(factory) = self.factories.get(&route) {
                debug!(route = %route, "Instantiating view");
                self.views.insert(route, factory());
            }
        }
        if let Some(view) = self.views.get_mut(&route) {
            view.on_enter();
        }

        let title = route.meta().map(|meta| meta.title);
        if let Some(title) = &title {
            self.document_title = format!("{title} - {APP_NAME}");
        }

        debug!(
            path,
            route = %route,
            redirected = resolution.redirected_from.is_some(),
            "Navigated"
        );
        self.events.emit(AppEvent::Navigated {
            route,
            path: resolution.path.clone(),
            title,
        });
        self.history.push(resolution.clone());
        if self.history.len() > ROUTER_HISTORY_LIMIT {
            let excess = self.history.len() - ROUTER_HISTORY_LIMIT;
            self.history.drain(..excess);
        }
        self.current = Some(resolution.clone());
        resolution
    }

    pub fn current(&self) -> Option<&Resolution> {
        self.current.as_ref()
    }

    pub fn current_route(&self) -> Option<Route> {
        self.current.as_ref().map(|r| r.route)
    }

    pub fn document_title(&self) -> &str {
        &self.document_title
    }

    /// Past navigations, oldest first, capped at the most recent entries
    pub fn history(&self) -> &[Resolution] {
        &self.history
    }

    /// Whether the route's view has been built
    pub fn is_instantiated(&self, route: Route) -> bool {
        self.views.contains_key(&route)
    }

    pub fn view(&self, route: Route) -> Option<&dyn View> {
        self.views.get(&route).map(|v| v.as_ref())
    }
}
