//! In-memory movie repository implementation

use std::cmp::Ordering;
use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{
    join_category_names, CategoryId, DomainError, EidrCode, Movie, MovieOrderBy, MoviePage,
    MovieQuery, MovieRepository, MovieTableRow, SortDirection,
};
use crate::infrastructure::storage::{CatalogData, InMemoryCatalog};

/// In-memory implementation of MovieRepository
#[derive(Debug, Clone)]
pub struct InMemoryMovieRepository {
    catalog: InMemoryCatalog,
}

impl InMemoryMovieRepository {
    pub fn new(catalog: InMemoryCatalog) -> Self {
        Self { catalog }
    }
}

fn ensure_categories_exist(
    data: &CatalogData,
    category_ids: &[CategoryId],
) -> Result<BTreeSet<CategoryId>, DomainError> {
    let ids: BTreeSet<_> = category_ids.iter().copied().collect();

    if ids.iter().any(|id| !data.categories.contains_key(id)) {
        return Err(DomainError::validation("Some categories do not exist."));
    }

    Ok(ids)
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn is_listed(data: &CatalogData, movie: &Movie, query: &MovieQuery) -> bool {
    let Some(links) = data.links.get(movie.eidr_code()).filter(|l| !l.is_empty()) else {
        return false;
    };

    if !query.category_ids.is_empty() && !query.category_ids.iter().any(|id| links.contains(id)) {
        return false;
    }

    contains_ignore_case(movie.eidr_code().as_str(), query.eidr_code.as_deref())
        && contains_ignore_case(movie.name(), query.name.as_deref())
        && query.accepts_status(movie.status())
}

/// Case-insensitive first so both backends agree under a locale collation
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare(a: &Movie, b: &Movie, order_by: MovieOrderBy, direction: SortDirection) -> Ordering {
    let primary = match order_by {
        MovieOrderBy::Name => compare_names(a.name(), b.name()),
        MovieOrderBy::Rating => a.rating().total_cmp(&b.rating()),
    };

    let primary = match direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };

    primary.then_with(|| a.eidr_code().cmp(b.eidr_code()))
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn get(&self, eidr_code: &EidrCode) -> Result<Option<Movie>, DomainError> {
        let data = self.catalog.data().read().await;
        Ok(data.movies.get(eidr_code).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Movie>, DomainError> {
        let data = self.catalog.data().read().await;
        let name = name.to_lowercase();

        Ok(data
            .movies
            .values()
            .filter(|m| m.name().to_lowercase() == name)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        movie: Movie,
        category_ids: Vec<CategoryId>,
    ) -> Result<Movie, DomainError> {
        let mut data = self.catalog.data().write().await;

        if data.movies.contains_key(movie.eidr_code()) {
            return Err(DomainError::conflict(format!(
                "Movie with eidrCode {} already exists.",
                movie.eidr_code()
            )));
        }

        let ids = ensure_categories_exist(&data, &category_ids)?;

        data.links.insert(movie.eidr_code().clone(), ids);
        data.movies.insert(movie.eidr_code().clone(), movie.clone());

        Ok(movie)
    }

    async fn update(
        &self,
        movie: &Movie,
        category_ids: Option<Vec<CategoryId>>,
    ) -> Result<Movie, DomainError> {
        let mut data = self.catalog.data().write().await;

        if !data.movies.contains_key(movie.eidr_code()) {
            return Err(DomainError::not_found(format!(
                "Movie with eidrCode {} does not exist.",
                movie.eidr_code()
            )));
        }

        if let Some(category_ids) = category_ids {
            let ids = ensure_categories_exist(&data, &category_ids)?;
            data.links.insert(movie.eidr_code().clone(), ids);
        }

        data.movies.insert(movie.eidr_code().clone(), movie.clone());

        Ok(movie.clone())
    }

    async fn delete_many(&self, eidr_codes: Vec<EidrCode>) -> Result<u64, DomainError> {
        let mut data = self.catalog.data().write().await;
        let codes: BTreeSet<_> = eidr_codes.into_iter().collect();

        if codes.iter().any(|code| !data.movies.contains_key(code)) {
            return Err(DomainError::not_found("Some movies do not exist."));
        }

        for code in &codes {
            data.links.remove(code);
            data.movies.remove(code);
        }

        Ok(codes.len() as u64)
    }

    async fn search(&self, query: &MovieQuery) -> Result<MoviePage, DomainError> {
        let data = self.catalog.data().read().await;

        let mut found: Vec<&Movie> = data
            .movies
            .values()
            .filter(|movie| is_listed(&data, movie, query))
            .collect();
        found.sort_by(|a, b| compare(a, b, query.order_by, query.direction));

        let total_items = found.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit()).unwrap_or(usize::MAX);

        let rows = found
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|movie| {
                let categories = data.categories_of(movie.eidr_code());

                MovieTableRow {
                    eidr_code: movie.eidr_code().clone(),
                    name: movie.name().to_string(),
                    rating: movie.rating(),
                    year: movie.year(),
                    status: movie.status(),
                    categories: join_category_names(categories.iter().map(|c| c.name())),
                }
            })
            .collect();

        Ok(MoviePage { rows, total_items })
    }
}
