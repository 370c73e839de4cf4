use std::{collections::HashMap, sync::Arc, time::Duration};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use flick_core::{
    error::Error,
    movie::{Movie, MovieId},
    webapi::RecommendationSource,
};
use flick_view::{
    cmd::ViewEvent,
    controller::DetailController,
    data::{Config, NavStack, Store},
    delegate::{Act, Delegate},
};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Answers with `count` movies derived from the subject id.  Subjects with a
/// gate block until the test opens it; subject 99 always fails.
#[derive(Default)]
struct GatedSource {
    gates: HashMap<MovieId, Receiver<()>>,
}

impl GatedSource {
    fn gate(&mut self, id: u64) -> Sender<()> {
        let (open, gate) = bounded(1);
        self.gates.insert(MovieId(id), gate);
        open
    }
}

impl RecommendationSource for GatedSource {
    fn recommendations(&self, id: MovieId, count: usize) -> Result<Vec<Movie>, Error> {
        if let Some(gate) = self.gates.get(&id) {
            let _ = gate.recv_timeout(TIMEOUT);
        }
        if id == MovieId(99) {
            return Err(Error::WebApiError("service unavailable".into()));
        }
        Ok((1..=count as u64)
            .map(|n| {
                let genre = if n % 2 == 0 { "Drama" } else { "Action" };
                Movie::new(id.0 * 100 + n, format!("Similar {n}")).with_genres([genre])
            })
            .collect())
    }
}

fn subject(id: u64) -> Arc<Movie> {
    Arc::new(Movie::new(id, format!("Movie {id}")))
}

fn delegate(source: GatedSource, sink: Sender<ViewEvent>) -> (Delegate, Store) {
    let store = Store::new();
    let config = Config {
        recommendation_count: 4,
        ..Config::default()
    };
    let controller = DetailController::with_store(&config, &store, NavStack::default());
    (Delegate::new(controller, Arc::new(source), sink), store)
}

fn deliver_next(delegate: &mut Delegate, events: &Receiver<ViewEvent>) {
    let event = events.recv_timeout(TIMEOUT).unwrap();
    assert!(matches!(event, ViewEvent::RecommendationsLoaded(..)));
    assert!(matches!(delegate.handle(event), Act::Continue));
}

fn shown_ids(delegate: &Delegate) -> Vec<u64> {
    delegate.view().filtered.iter().map(|movie| movie.id.0).collect()
}

#[test]
fn newer_subject_wins_when_it_resolves_first() {
    let mut source = GatedSource::default();
    let open_10 = source.gate(10);
    let open_20 = source.gate(20);
    let (sink, events) = unbounded();
    let (mut delegate, _store) = delegate(source, sink);

    delegate.handle(ViewEvent::Open(subject(10)));
    delegate.handle(ViewEvent::Open(subject(20)));

    open_20.send(()).unwrap();
    deliver_next(&mut delegate, &events);
    assert_eq!(shown_ids(&delegate), [2001, 2002, 2003, 2004]);

    open_10.send(()).unwrap();
    deliver_next(&mut delegate, &events);
    assert_eq!(shown_ids(&delegate), [2001, 2002, 2003, 2004]);
    assert!(!delegate.view().loading);
}

#[test]
fn newer_subject_wins_when_it_resolves_last() {
    let mut source = GatedSource::default();
    let open_10 = source.gate(10);
    let open_20 = source.gate(20);
    let (sink, events) = unbounded();
    let (mut delegate, _store) = delegate(source, sink);

    delegate.handle(ViewEvent::Open(subject(10)));
    delegate.handle(ViewEvent::Open(subject(20)));

    open_10.send(()).unwrap();
    deliver_next(&mut delegate, &events);
    assert!(shown_ids(&delegate).is_empty());
    assert!(delegate.view().loading);

    open_20.send(()).unwrap();
    deliver_next(&mut delegate, &events);
    assert_eq!(shown_ids(&delegate), [2001, 2002, 2003, 2004]);
}

#[test]
fn genre_toggle_filters_loaded_results() {
    let (sink, events) = unbounded();
    let (mut delegate, _store) = delegate(GatedSource::default(), sink);

    delegate.handle(ViewEvent::Open(subject(3)));
    deliver_next(&mut delegate, &events);
    delegate.handle(ViewEvent::ToggleGenre("Drama".into()));
    assert_eq!(shown_ids(&delegate), [302, 304]);

    delegate.handle(ViewEvent::ClearGenres);
    assert_eq!(shown_ids(&delegate).len(), 4);
}

#[test]
fn failure_surfaces_as_load_error() {
    let (sink, events) = unbounded();
    let (mut delegate, _store) = delegate(GatedSource::default(), sink);

    delegate.handle(ViewEvent::Open(subject(99)));
    deliver_next(&mut delegate, &events);

    let view = delegate.view();
    assert!(!view.loading);
    assert!(view.load_error.is_some());
    assert!(view.filtered.is_empty());
}

#[test]
fn process_runs_until_shutdown() {
    let (sink, events) = unbounded();
    let (delegate, store) = delegate(GatedSource::default(), sink.clone());

    sink.send(ViewEvent::Open(subject(1))).unwrap();
    let mut loaded = Vec::new();
    delegate.process(events, |view| {
        if !view.loading && !view.filtered.is_empty() {
            loaded.push(view.filtered.len());
            sink.send(ViewEvent::Shutdown).unwrap();
        }
    });

    assert_eq!(loaded, [4]);
    assert_eq!(store.background_path(), None);
}
