use kindly_core::{CATEGORY_OPTIONS, CategoryId, ResultViewModel, Route, ViewRouter};
use tracing::warn;

pub(crate) struct App {
    pub router: ViewRouter,

    pub selector_index: usize,
    pub result_index: usize,

    pub notice: Option<String>,
}

impl App {
    pub(crate) const fn new(router: ViewRouter) -> Self {
        Self {
            router,
            selector_index: 0,
            result_index: 0,
            notice: None,
        }
    }

    pub(crate) const fn route(&self) -> Route {
        self.router.current()
    }

    pub(crate) fn navigate(&mut self, path: &str) {
        match self.router.navigate(path) {
            Ok(_) => {
                self.notice = None;
                self.result_index = 0;
            }
            Err(err) => {
                warn!(path, error = %err, "navigation rejected");
                self.notice = Some(err.to_string());
            }
        }
    }

    pub(crate) fn navigate_relative(&mut self, step: isize) {
        let routes = Route::ALL;
        let current = routes
            .iter()
            .position(|route| *route == self.route())
            .unwrap_or(0);
        let target = current
            .checked_add_signed(step)
            .unwrap_or(routes.len() - 1)
            % routes.len();
        if let Some(route) = routes.get(target) {
            self.navigate(route.path());
        }
    }

    pub(crate) fn select_category(&mut self, category: CategoryId) {
        if let Some(sync) = self.router.synchronizer_mut() {
            sync.select_category(category);
            self.result_index = 0;
        }
    }

    pub(crate) fn move_selector(&mut self, forward: bool) {
        let last = CATEGORY_OPTIONS.len() - 1;
        self.selector_index = if forward {
            (self.selector_index + 1).min(last)
        } else {
            self.selector_index.saturating_sub(1)
        };
    }

    pub(crate) fn move_result(&mut self, forward: bool) {
        let count = self.view_model().map_or(0, |view| view.entry_count());
        if forward {
            if self.result_index + 1 < count {
                self.result_index += 1;
            }
        } else {
            self.result_index = self.result_index.saturating_sub(1);
        }
    }

    /// Apply finished queries; returns whether anything changed.
    pub(crate) fn sync_results(&mut self) -> bool {
        let handled = self.router.drain_completions();
        if handled > 0 {
            let count = self.view_model().map_or(0, |view| view.entry_count());
            self.result_index = self.result_index.min(count.saturating_sub(1));
        }
        handled > 0
    }

    pub(crate) fn view_model(&self) -> Option<ResultViewModel> {
        self.router
            .synchronizer()
            .map(|sync| ResultViewModel::render(&sync.snapshot()))
    }
}
