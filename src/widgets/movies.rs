//! Favorite movies with optional 1-5 star ratings, newest first.

use crate::storage::{KeyValueStore, Namespace};
use crate::widgets::{new_id, required, Widget, WidgetError, WidgetResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const FAVORITES_KEY: &str = "favorites";

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub added_at: DateTime<Utc>,
    pub rating: Option<u8>,
}

pub struct MovieFavorites {
    ns: Namespace,
    movies: Vec<Movie>,
}

impl Widget for MovieFavorites {
    const NAMESPACE: &'static str = "movies";

    fn reset(&mut self) {
        self.movies.clear();
    }
}

impl MovieFavorites {
    pub fn mount(store: Arc<dyn KeyValueStore>) -> Self {
        let ns = Self::namespace(store);
        let movies: Vec<Movie> = ns.load_or_default(FAVORITES_KEY);

        tracing::info!(movies = movies.len(), "Movie favorites mounted");
        Self { ns, movies }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn add(&mut self, title: &str) -> WidgetResult<Movie> {
        let movie = Movie {
            id: new_id(),
            title: required(title, "Movie title")?,
            added_at: Utc::now(),
            rating: None,
        };

        let mut next = Vec::with_capacity(self.movies.len() + 1);
        next.push(movie.clone());
        next.extend(self.movies.iter().cloned());
        self.commit(next)?;

        tracing::info!(id = %movie.id, title = %movie.title, "Movie added");
        Ok(movie)
    }

    pub fn remove(&mut self, id: &str) -> WidgetResult<Movie> {
        let index = self.position(id)?;

        let mut next = self.movies.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        tracing::info!(id = %removed.id, "Movie removed");
        Ok(removed)
    }

    /// Set or clear a rating
    pub fn rate(&mut self, id: &str, rating: Option<u8>) -> WidgetResult<Movie> {
        if let Some(r) = rating {
            if !(1..=MAX_RATING).contains(&r) {
                return Err(WidgetError::Validation(format!(
                    "Rating must be between 1 and {}",
                    MAX_RATING
                )));
            }
        }
        let index = self.position(id)?;

        let mut next = self.movies.clone();
        next[index].rating = rating;
        let rated = next[index].clone();
        self.commit(next)?;

        tracing::debug!(id = %rated.id, ?rating, "Movie rated");
        Ok(rated)
    }

    fn position(&self, id: &str) -> WidgetResult<usize> {
        self.movies
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| WidgetError::NotFound(format!("movie {}", id)))
    }

    fn commit(&mut self, next: Vec<Movie>) -> WidgetResult<()> {
        self.ns.save(FAVORITES_KEY, &next)?;
        self.movies = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn favorites() -> (MovieFavorites, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (MovieFavorites::mount(Arc::clone(&store)), store)
    }

    #[test]
    fn test_add_newest_first() {
        let (mut movies, _) = favorites();
        movies.add("Heat").unwrap();
        movies.add("Alien").unwrap();

        let titles: Vec<_> = movies.movies().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien", "Heat"]);
        assert!(movies.movies().iter().all(|m| m.rating.is_none()));
        assert!(movies.add(" ").is_err());
    }

    #[test]
    fn test_rate_and_remove() {
        let (mut movies, store) = favorites();
        let heat = movies.add("Heat").unwrap();

        assert_eq!(movies.rate(&heat.id, Some(5)).unwrap().rating, Some(5));
        assert!(matches!(
            movies.rate(&heat.id, Some(6)),
            Err(WidgetError::Validation(_))
        ));
        assert!(movies.rate(&heat.id, Some(0)).is_err());

        let remounted = MovieFavorites::mount(Arc::clone(&store));
        assert_eq!(remounted.movies()[0].rating, Some(5));

        assert_eq!(movies.rate(&heat.id, None).unwrap().rating, None);
        movies.remove(&heat.id).unwrap();
        assert!(movies.movies().is_empty());
        assert!(matches!(movies.remove(&heat.id), Err(WidgetError::NotFound(_))));
    }
}
