use std::sync::Arc;

use flick_core::movie::{Movie, MovieId};

#[derive(Clone, Debug)]
pub enum Nav {
    Home,
    MovieDetail(Arc<Movie>),
}

impl Nav {
    pub fn title(&self) -> String {
        match self {
            Nav::Home => "Home".to_string(),
            Nav::MovieDetail(movie) => movie.title.to_string(),
        }
    }

    pub fn full_title(&self) -> String {
        match self {
            Nav::Home => "Home".to_string(),
            Nav::MovieDetail(movie) => format!("{} ({})", movie.title, movie.release_year()),
        }
    }

    pub fn subject(&self) -> Option<&Arc<Movie>> {
        match self {
            Nav::MovieDetail(movie) => Some(movie),
            Nav::Home => None,
        }
    }

    pub fn subject_id(&self) -> Option<MovieId> {
        self.subject().map(|movie| movie.id)
    }
}

/// Host-side navigation: a cursor moving through a stack of visited entries.
pub trait Navigator: Send {
    fn current(&self) -> Option<&Nav>;

    fn can_move_by(&self, delta: isize) -> bool;

    /// Move the cursor and return the entry it lands on, or `None` if the
    /// stack doesn't reach that far.
    fn move_by(&mut self, delta: isize) -> Option<Nav>;

    /// Visit a new entry, dropping everything after the cursor.
    fn push(&mut self, nav: Nav);
}

/// In-memory browser-style history.
#[derive(Clone, Debug)]
pub struct NavStack {
    entries: Vec<Nav>,
    cursor: usize,
}

impl NavStack {
    pub fn new(initial: Nav) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn target(&self, delta: isize) -> Option<usize> {
        self.cursor
            .checked_add_signed(delta)
            .filter(|&target| target < self.entries.len())
    }
}

impl Default for NavStack {
    fn default() -> Self {
        Self::new(Nav::Home)
    }
}

impl Navigator for NavStack {
    fn current(&self) -> Option<&Nav> {
        self.entries.get(self.cursor)
    }

    fn can_move_by(&self, delta: isize) -> bool {
        self.target(delta).is_some()
    }

    fn move_by(&mut self, delta: isize) -> Option<Nav> {
        let target = self.target(delta)?;
        self.cursor = target;
        self.entries.get(target).cloned()
    }

    fn push(&mut self, nav: Nav) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(nav);
        self.cursor = self.entries.len() - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: u64) -> Nav {
        Nav::MovieDetail(Arc::new(Movie::new(id, format!("Movie {id}"))))
    }

    #[test]
    fn moves_within_bounds_only() {
        let mut stack = NavStack::default();
        stack.push(detail(1));
        stack.push(detail(2));

        assert!(!stack.can_move_by(1));
        assert!(stack.can_move_by(-2));
        assert!(!stack.can_move_by(-3));
        assert!(stack.move_by(-3).is_none());
        assert_eq!(stack.cursor(), 2);

        assert_eq!(stack.move_by(-1).and_then(|nav| nav.subject_id()), Some(MovieId(1)));
        assert!(matches!(stack.move_by(-1), Some(Nav::Home)));
        assert_eq!(stack.move_by(2).and_then(|nav| nav.subject_id()), Some(MovieId(2)));
    }

    #[test]
    fn push_drops_forward_entries() {
        let mut stack = NavStack::new(detail(1));
        stack.push(detail(2));
        stack.push(detail(3));
        stack.move_by(-2);
        stack.push(detail(4));

        assert_eq!(stack.len(), 2);
        assert!(!stack.can_move_by(1));
        assert_eq!(stack.current().and_then(Nav::subject_id), Some(MovieId(4)));
    }

    #[test]
    fn titles() {
        assert_eq!(Nav::Home.title(), "Home");
        assert_eq!(detail(5).title(), "Movie 5");
        assert_eq!(detail(5).full_title(), "Movie 5 (20XX)");
    }
}
