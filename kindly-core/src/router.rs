//! Registered navigation paths and the lifetime of the views behind them.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::model::CategoryId;
use crate::ports::ProviderGateway;
use crate::synchronizer::ResultSynchronizer;

/// Views reachable through navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page.
    Home,
    /// Listing of every provider.
    Offers,
    /// Category selector and filtered results.
    Services,
    /// About the team.
    AboutUs,
    /// Contact details.
    Contact,
}

impl Route {
    /// Every route, in header order.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Services,
        Self::Offers,
        Self::AboutUs,
        Self::Contact,
    ];

    /// Path the route is registered under.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Offers => "/offers",
            Self::Services => "/services",
            Self::AboutUs => "/about-us",
            Self::Contact => "/contact",
        }
    }

    /// Header title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Offers => "Offers",
            Self::Services => "Services",
            Self::AboutUs => "About us",
            Self::Contact => "Contact",
        }
    }

    /// Resolve a path, ignoring a trailing slash.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = match trimmed.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => trimmed,
        };
        Self::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.path())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised while navigating.
pub enum RouteError {
    /// No view is registered for the path.
    #[error("No view registered for {0}")]
    NotFound(String),
}

/// Mounted view. Views holding results own their synchronizer.
pub enum ActiveView {
    /// Static page without state.
    Page(Route),
    /// Selector plus filtered result list.
    Services(ResultSynchronizer),
    /// Listing of every provider.
    Offers(ResultSynchronizer),
}

impl ActiveView {
    /// Route the view is mounted for.
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::Page(route) => *route,
            Self::Services(_) => Route::Services,
            Self::Offers(_) => Route::Offers,
        }
    }
}

/// Maps paths to views and creates or releases the synchronizers behind them.
pub struct ViewRouter {
    gateway: Arc<dyn ProviderGateway>,
    active: ActiveView,
    initial_category: Option<CategoryId>,
}

impl ViewRouter {
    /// Create a router showing the landing page.
    #[must_use]
    pub fn new(gateway: Arc<dyn ProviderGateway>) -> Self {
        Self {
            gateway,
            active: ActiveView::Page(Route::Home),
            initial_category: None,
        }
    }

    /// Category to select automatically whenever the services view is entered.
    #[must_use]
    pub fn with_initial_category(mut self, category: Option<CategoryId>) -> Self {
        self.initial_category = category;
        self
    }

    /// Route currently shown.
    #[must_use]
    pub const fn current(&self) -> Route {
        self.active.route()
    }

    /// Mounted view.
    #[must_use]
    pub const fn active(&self) -> &ActiveView {
        &self.active
    }

    /// Navigate to `path`, replacing the mounted view.
    ///
    /// Navigating to the route already shown keeps its state. Views with results
    /// start from an empty result set each time they are entered.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NotFound`] when no view is registered for `path`;
    /// the mounted view is left as it was.
    pub fn navigate(&mut self, path: &str) -> Result<Route, RouteError> {
        let route = Route::from_path(path).ok_or_else(|| RouteError::NotFound(path.to_owned()))?;
        if route == self.current() {
            return Ok(route);
        }

        info!(from = %self.current(), to = %route, "navigating");
        self.active = self.mount(route);
        Ok(route)
    }

    /// Synchronizer of the mounted view, if it has one.
    pub fn synchronizer_mut(&mut self) -> Option<&mut ResultSynchronizer> {
        match &mut self.active {
            ActiveView::Page(_) => None,
            ActiveView::Services(sync) | ActiveView::Offers(sync) => Some(sync),
        }
    }

    /// Synchronizer of the mounted view, read-only.
    #[must_use]
    pub const fn synchronizer(&self) -> Option<&ResultSynchronizer> {
        match &self.active {
            ActiveView::Page(_) => None,
            ActiveView::Services(sync) | ActiveView::Offers(sync) => Some(sync),
        }
    }

    /// Apply completions that have arrived for the mounted view.
    pub fn drain_completions(&mut self) -> usize {
        self.synchronizer_mut()
            .map_or(0, ResultSynchronizer::drain_completions)
    }

    fn mount(&self, route: Route) -> ActiveView {
        match route {
            Route::Services => {
                let mut sync = ResultSynchronizer::new(Arc::clone(&self.gateway));
                if let Some(category) = self.initial_category {
                    sync.select_category(category);
                }
                ActiveView::Services(sync)
            }
            Route::Offers => {
                let mut sync = ResultSynchronizer::new(Arc::clone(&self.gateway));
                sync.select_category(CategoryId::All);
                ActiveView::Offers(sync)
            }
            Route::Home | Route::AboutUs | Route::Contact => ActiveView::Page(route),
        }
    }
}
