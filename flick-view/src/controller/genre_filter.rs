use std::sync::Arc;

use flick_core::movie::Movie;
use im::Vector;

/// Active genre filters and the recommendations that pass them.
#[derive(Clone, Debug, Default)]
pub struct GenreFilter {
    selection: Vector<Arc<str>>,
    filtered: Vector<Arc<Movie>>,
}

impl GenreFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Vector<Arc<str>> {
        &self.selection
    }

    pub fn filtered(&self) -> &Vector<Arc<Movie>> {
        &self.filtered
    }

    pub fn is_selected(&self, genre: &str) -> bool {
        self.selection.iter().any(|selected| selected.as_ref() == genre)
    }

    /// Add `genre` to the end of the selection, or drop it if it's already
    /// there.  Returns whether it is selected afterwards.
    pub fn toggle(&mut self, genre: &str) -> bool {
        let position = self.selection.iter().position(|selected| selected.as_ref() == genre);
        if let Some(index) = position {
            self.selection.remove(index);
            false
        } else {
            self.selection.push_back(genre.into());
            true
        }
    }

    pub fn set_selection<I, S>(&mut self, genres: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        self.selection.clear();
        for genre in genres {
            let genre = genre.into();
            if !self.is_selected(&genre) {
                self.selection.push_back(genre);
            }
        }
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn recompute(&mut self, source: &Vector<Arc<Movie>>) {
        self.filtered = derive(source, &self.selection);
    }
}

/// Movies from `source` tagged with every genre in `selection`.  An empty
/// selection passes everything.
pub fn derive(source: &Vector<Arc<Movie>>, selection: &Vector<Arc<str>>) -> Vector<Arc<Movie>> {
    if selection.is_empty() {
        return source.clone();
    }
    source
        .iter()
        .filter(|movie| selection.iter().all(|genre| movie.has_genre(genre)))
        .cloned()
        .collect()
}
