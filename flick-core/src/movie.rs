use std::{fmt, hash, sync::Arc};

use im::Vector;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use time::{macros::format_description, Date};

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

pub const PLACEHOLDER_URL: &str = "https://via.placeholder.com/200x300";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Genre tag.  Two genres are the same genre if their ids match, names are
/// only used for display and filtering.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Genre {
    #[serde(default)]
    pub id: u32,
    pub name: Arc<str>,
}

impl Genre {
    pub fn new(id: u32, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Resolve a bare genre name to a tag using the standard movie-database
    /// genre table.  Unknown names get id 0.
    pub fn from_name(name: &str) -> Self {
        let id = GENRE_TABLE
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(name))
            .map(|(id, _)| *id)
            .unwrap_or(0);
        Self::new(id, name)
    }
}

impl PartialEq for Genre {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Genre {}

impl hash::Hash for Genre {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

const GENRE_TABLE: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

#[derive(Clone, Debug, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default = "default_str")]
    pub title: Arc<str>,
    #[serde(default = "default_str")]
    pub overview: Arc<str>,
    #[serde(default = "default_str")]
    pub tagline: Arc<str>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub release_date: Option<Date>,
    #[serde(default, deserialize_with = "deserialize_path")]
    pub poster_path: Option<Arc<str>>,
    #[serde(default, deserialize_with = "deserialize_path")]
    pub backdrop_path: Option<Arc<str>>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "deserialize_genres")]
    pub genres: Vector<Genre>,
    #[serde(default)]
    pub similarity: Option<f64>,
    #[serde(flatten)]
    pub credits: Credits,
}

impl Movie {
    pub fn new(id: impl Into<MovieId>, title: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            overview: default_str(),
            tagline: default_str(),
            release_date: None,
            poster_path: None,
            backdrop_path: None,
            vote_average: 0.0,
            genres: Vector::new(),
            similarity: None,
            credits: Credits::default(),
        }
    }

    pub fn with_genres<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.genres = names.into_iter().map(Genre::from_name).collect();
        self
    }

    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(|genre| genre.name.as_ref())
    }

    pub fn has_genre(&self, name: &str) -> bool {
        self.genre_names().any(|genre| genre == name)
    }

    pub fn release_year(&self) -> String {
        self.release_date
            .map(|date| date.year().to_string())
            .unwrap_or_else(|| "20XX".to_string())
    }

    /// Long release date, e.g. "November 19, 2015".
    pub fn release(&self) -> String {
        let format = format_description!("[month repr:long] [day padding:none], [year]");
        self.release_date
            .and_then(|date| date.format(&format).ok())
            .unwrap_or_else(|| '-'.to_string())
    }

    pub fn poster_url(&self, size: &str) -> String {
        image_url(self.poster_path.as_deref(), size)
    }

    pub fn backdrop_url(&self, size: &str) -> String {
        image_url(self.backdrop_path.as_deref(), size)
    }
}

pub fn image_url(path: Option<&str>, size: &str) -> String {
    match path {
        Some(path) => format!("{IMAGE_BASE_URL}{size}{path}"),
        None => PLACEHOLDER_URL.to_string(),
    }
}

/// Director and cast.  Lists are stored comma-delimited, the way the back-end
/// sends them.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Credits {
    #[serde(default = "default_str")]
    pub director: Arc<str>,
    #[serde(default = "default_str")]
    pub actors: Arc<str>,
    #[serde(default = "default_str")]
    pub characters: Arc<str>,
}

impl Credits {
    pub fn actor_list(&self) -> Vec<&str> {
        split_delimited(&self.actors)
    }

    pub fn character_list(&self) -> Vec<&str> {
        split_delimited(&self.characters)
    }

    pub fn actors_display(&self) -> String {
        self.actor_list().iter().join(", ")
    }

    pub fn characters_display(&self) -> String {
        self.character_list().iter().join(", ")
    }
}

pub fn default_str() -> Arc<str> {
    "".into()
}

fn split_delimited(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let format = format_description!("[year]-[month]-[day]");
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|date| Date::parse(date.trim(), &format).ok()))
}

fn deserialize_path<'de, D>(deserializer: D) -> Result<Option<Arc<str>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Arc<str>>::deserialize(deserializer)?;
    Ok(value.filter(|path| !path.is_empty()))
}

fn deserialize_genres<'de, D>(deserializer: D) -> Result<Vector<Genre>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Genres {
        Tags(Vector<Genre>),
        Delimited(String),
    }

    Ok(match Option::<Genres>::deserialize(deserializer)? {
        Some(Genres::Tags(tags)) => tags,
        Some(Genres::Delimited(names)) => split_delimited(&names)
            .into_iter()
            .map(Genre::from_name)
            .collect(),
        None => Vector::new(),
    })
}
