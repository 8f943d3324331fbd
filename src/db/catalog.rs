use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::models::Movie;

pub const MOVIES_FILE: &str = "movies.json";
pub const SIMILARITY_FILE: &str = "similarity.json";

/// Errors raised while loading the precomputed catalog artifacts.
///
/// All of these are fatal: the service refuses to start without a consistent catalog.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Similarity matrix has {rows} rows but the catalog has {movies} movies")]
    DimensionMismatch { movies: usize, rows: usize },

    #[error("Similarity row {row} has {len} columns, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Similarity score at ({row}, {col}) is not a finite number")]
    NonFinite { row: usize, col: usize },
}

/// Dense square matrix of similarity scores, stored row-major at full `f64` precision
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    dim: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Flattens nested rows, rejecting ragged or non-finite input
    fn from_rows(rows: Vec<Vec<f64>>, expected: usize) -> Result<Self, LoadError> {
        if rows.len() != expected {
            return Err(LoadError::DimensionMismatch {
                movies: expected,
                rows: rows.len(),
            });
        }

        let mut scores = Vec::with_capacity(expected * expected);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != expected {
                return Err(LoadError::NotSquare {
                    row,
                    len: values.len(),
                    expected,
                });
            }
            if let Some(col) = values.iter().position(|score| !score.is_finite()) {
                return Err(LoadError::NonFinite { row, col });
            }
            scores.extend(values);
        }

        Ok(Self {
            dim: expected,
            scores,
        })
    }

    #[cfg(test)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Scores of catalog entry `index` against every entry, in catalog order
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.dim {
            return None;
        }
        let start = index * self.dim;
        Some(&self.scores[start..start + self.dim])
    }
}

/// Read-only movie catalog paired with its similarity matrix.
///
/// Row/column `i` of the matrix describes `movies()[i]`. Built once at startup and
/// shared behind an `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    lowercase_titles: Vec<String>,
    similarity: SimilarityMatrix,
}

impl Catalog {
    /// Builds a catalog from in-memory data, validating the matrix shape
    pub fn new(movies: Vec<Movie>, similarity: Vec<Vec<f64>>) -> Result<Self, LoadError> {
        let similarity = SimilarityMatrix::from_rows(similarity, movies.len())?;
        let lowercase_titles = movies.iter().map(|m| m.title.to_lowercase()).collect();

        Ok(Self {
            movies,
            lowercase_titles,
            similarity,
        })
    }

    /// Loads `movies.json` and `similarity.json` from `model_dir`
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let model_dir = model_dir.as_ref();
        let movies: Vec<Movie> = read_json(&model_dir.join(MOVIES_FILE))?;
        let similarity: Vec<Vec<f64>> = read_json(&model_dir.join(SIMILARITY_FILE))?;

        let catalog = Self::new(movies, similarity)?;

        tracing::info!(
            model_dir = %model_dir.display(),
            movies = catalog.len(),
            "Loaded movie catalog"
        );

        Ok(catalog)
    }

    pub(crate) fn len(&self) -> usize {
        self.movies.len()
    }

    #[cfg(test)]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn movie(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// First `count` movies in load order
    pub fn head(&self, count: usize) -> &[Movie] {
        &self.movies[..count.min(self.movies.len())]
    }

    pub fn titles(&self) -> Vec<String> {
        self.movies.iter().map(|m| m.title.clone()).collect()
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Index of the first movie whose lowercased title equals the lowercased query
    pub fn find_by_title_case_insensitive(&self, title: &str) -> Option<usize> {
        let needle = title.to_lowercase();
        self.lowercase_titles.iter().position(|t| *t == needle)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![
                Movie::new(1, "Alpha"),
                Movie::new(2, "Beta"),
                Movie::new(3, "alpha"),
            ],
            vec![
                vec![1.0, 0.2, 0.9],
                vec![0.2, 1.0, 0.1],
                vec![0.9, 0.1, 1.0],
            ],
        )
        .unwrap()
    }

    fn write_artifacts(dir: &Path, movies: &str, similarity: &str) {
        fs::write(dir.join(MOVIES_FILE), movies).unwrap();
        fs::write(dir.join(SIMILARITY_FILE), similarity).unwrap();
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = sample_catalog();
        assert_eq!(catalog.find_by_title_case_insensitive("BETA"), Some(1));
        assert_eq!(catalog.find_by_title_case_insensitive("beta"), Some(1));
    }

    #[test]
    fn test_find_returns_first_occurrence() {
        let catalog = sample_catalog();
        assert_eq!(catalog.find_by_title_case_insensitive("ALPHA"), Some(0));
    }

    #[test]
    fn test_find_missing_title() {
        let catalog = sample_catalog();
        assert_eq!(catalog.find_by_title_case_insensitive("Gamma"), None);
    }

    #[test]
    fn test_row_access() {
        let catalog = sample_catalog();
        assert_eq!(catalog.similarity().row(1), Some(&[0.2, 1.0, 0.1][..]));
        assert_eq!(catalog.similarity().row(3), None);
    }

    #[test]
    fn test_head_clamps_to_len() {
        let catalog = sample_catalog();
        assert_eq!(catalog.head(2).len(), 2);
        assert_eq!(catalog.head(12).len(), 3);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = Catalog::new(vec![Movie::new(1, "Alpha")], vec![]);
        assert!(matches!(
            result,
            Err(LoadError::DimensionMismatch { movies: 1, rows: 0 })
        ));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let result = Catalog::new(
            vec![Movie::new(1, "Alpha"), Movie::new(2, "Beta")],
            vec![vec![1.0, 0.5], vec![0.5]],
        );
        assert!(matches!(
            result,
            Err(LoadError::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn test_non_finite_score_rejected() {
        let result = Catalog::new(vec![Movie::new(1, "Alpha")], vec![vec![f64::NAN]]);
        assert!(matches!(result, Err(LoadError::NonFinite { row: 0, col: 0 })));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(
            dir.path(),
            r#"[{"id": 1, "title": "Alpha"}, {"id": 2, "title": "Beta"}]"#,
            "[[1.0, 0.3], [0.3, 1.0]]",
        );

        let catalog = Catalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.titles(), vec!["Alpha", "Beta"]);
        assert_eq!(catalog.similarity().dim(), 2);
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Catalog::load(dir.path()), Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_load_malformed_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "not json", "[]");
        assert!(matches!(
            Catalog::load(dir.path()),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_inconsistent_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), r#"[{"id": 1, "title": "Alpha"}]"#, "[[1.0], [0.5]]");
        assert!(matches!(
            Catalog::load(dir.path()),
            Err(LoadError::DimensionMismatch { movies: 1, rows: 2 })
        ));
    }
}
