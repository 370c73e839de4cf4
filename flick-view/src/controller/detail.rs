use std::sync::Arc;

use flick_core::movie::{Movie, MovieId};
use im::Vector;

use crate::{
    controller::{
        fetch::{Completion, FetchCoordinator, LoadRequest, LoadToken},
        genre_filter::GenreFilter,
        history::HistoryTracker,
    },
    data::{BackdropSignal, Config, HistoryCounter, Nav, Navigator, SelectionPolicy, Store},
    error::Error,
};

/// Everything the presentation layer needs to draw the detail page.
#[derive(Clone, Debug)]
pub struct DetailView {
    pub subject: Option<Arc<Movie>>,
    pub loading: bool,
    pub load_error: Option<Error>,
    pub filtered: Vector<Arc<Movie>>,
    pub selection: Vector<Arc<str>>,
    pub can_go_forward: bool,
    pub can_go_back: bool,
    pub backdrop: Option<Arc<str>>,
}

impl DetailView {
    pub fn is_selected(&self, genre: &str) -> bool {
        self.selection.iter().any(|selected| selected.as_ref() == genre)
    }
}

pub struct DetailController {
    subject: Option<Arc<Movie>>,
    recommendation_count: usize,
    selection_policy: SelectionPolicy,
    fetch: FetchCoordinator,
    history: HistoryTracker,
    filter: GenreFilter,
}

impl DetailController {
    pub fn new(
        config: &Config,
        backdrop: impl BackdropSignal + 'static,
        counter: impl HistoryCounter + 'static,
        navigator: impl Navigator + 'static,
    ) -> Self {
        Self {
            subject: None,
            recommendation_count: config.recommendation_count(),
            selection_policy: config.selection_policy,
            fetch: FetchCoordinator::new(backdrop),
            history: HistoryTracker::new(navigator, counter),
            filter: GenreFilter::new(),
        }
    }

    pub fn with_store(config: &Config, store: &Store, navigator: impl Navigator + 'static) -> Self {
        Self::new(config, store.backdrop(), store.forward_history(), navigator)
    }

    pub fn subject(&self) -> Option<&Arc<Movie>> {
        self.subject.as_ref()
    }

    pub fn subject_id(&self) -> Option<MovieId> {
        self.subject.as_ref().map(|movie| movie.id)
    }

    pub fn recommendation_count(&self) -> usize {
        self.recommendation_count
    }

    /// The detail page is now showing `subject`.  A different movie starts a
    /// fresh load, the same one is left alone.
    pub fn enter(&mut self, subject: Arc<Movie>) -> Option<LoadRequest> {
        if self.subject_id() == Some(subject.id) {
            log::debug!("already showing {}", subject.id);
            return None;
        }
        log::info!("showing {} ({})", subject.title, subject.id);

        if self.selection_policy == SelectionPolicy::ResetOnSubjectChange {
            self.filter.clear();
        }
        let request = self.fetch.load(&subject, self.recommendation_count);
        self.subject = Some(subject);
        self.refilter();
        Some(request)
    }

    /// Visit `subject` as a new history entry.
    pub fn open(&mut self, subject: Arc<Movie>) -> Option<LoadRequest> {
        self.history.push(Nav::MovieDetail(subject.clone()));
        self.enter(subject)
    }

    /// Open the recommendation at `index` of the filtered list.
    pub fn open_recommendation(&mut self, index: usize) -> Option<LoadRequest> {
        let Some(movie) = self.filter.filtered().get(index).cloned() else {
            log::warn!("no recommendation at {}", index);
            return None;
        };
        self.open(movie)
    }

    pub fn go_back(&mut self) -> Option<LoadRequest> {
        let nav = self.history.go_back()?;
        self.route(nav)
    }

    pub fn go_forward(&mut self) -> Option<LoadRequest> {
        let nav = self.history.go_forward()?;
        self.route(nav)
    }

    fn route(&mut self, nav: Nav) -> Option<LoadRequest> {
        match nav {
            Nav::MovieDetail(movie) => self.enter(movie),
            Nav::Home => {
                self.dispose();
                None
            }
        }
    }

    pub fn toggle_genre(&mut self, genre: &str) -> bool {
        let selected = self.filter.toggle(genre);
        self.refilter();
        selected
    }

    pub fn set_genres<I, S>(&mut self, genres: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        self.filter.set_selection(genres);
        self.refilter();
    }

    pub fn clear_genres(&mut self) {
        self.filter.clear();
        self.refilter();
    }

    pub fn set_recommendation_count(&mut self, count: usize) -> Option<LoadRequest> {
        let count = count.max(1);
        if count == self.recommendation_count {
            return None;
        }
        self.recommendation_count = count;
        self.refetch()
    }

    pub fn refetch(&mut self) -> Option<LoadRequest> {
        let subject = self.subject.clone()?;
        Some(self.fetch.load(&subject, self.recommendation_count))
    }

    pub fn complete(&mut self, token: LoadToken, result: Result<Vec<Movie>, Error>) -> Completion {
        let completion = self.fetch.complete(token, result);
        if completion == Completion::Applied {
            self.refilter();
        }
        completion
    }

    pub fn dispose(&mut self) {
        self.fetch.dispose();
        self.subject = None;
        self.refilter();
    }

    pub fn view(&self) -> DetailView {
        DetailView {
            subject: self.subject.clone(),
            loading: self.fetch.is_loading(),
            load_error: self.fetch.error().cloned(),
            filtered: self.filter.filtered().clone(),
            selection: self.filter.selection().clone(),
            can_go_forward: self.history.can_go_forward(),
            can_go_back: self.history.can_go_back(),
            backdrop: self
                .subject
                .as_ref()
                .and_then(|movie| movie.backdrop_path.clone()),
        }
    }

    fn refilter(&mut self) {
        self.filter.recompute(self.fetch.recommendations());
    }
}
