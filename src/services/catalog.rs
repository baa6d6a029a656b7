use crate::models::MovieRecord;

/// Immutable, in-memory table of known movies
///
/// Row order is fixed at load time; feature vectors are aligned to it by position.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<MovieRecord>,
}

impl Catalog {
    pub fn new(movies: Vec<MovieRecord>) -> Self {
        Self { movies }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&MovieRecord> {
        self.movies.get(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.movies.iter()
    }

    /// Finds the first row whose name equals `name`, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<(usize, &MovieRecord)> {
        let needle = name.to_lowercase();
        self.movies
            .iter()
            .enumerate()
            .find(|(_, movie)| movie.name.to_lowercase() == needle)
    }

    /// Filters the catalog by case-insensitive substring match on the name
    ///
    /// A blank term returns every movie. Row order is preserved.
    pub fn search(&self, term: &str) -> Vec<&MovieRecord> {
        let term = term.trim();
        if term.is_empty() {
            return self.movies.iter().collect();
        }

        let needle = term.to_lowercase();
        self.movies
            .iter()
            .filter(|movie| movie.name.to_lowercase().contains(&needle))
            .collect()
    }
}
