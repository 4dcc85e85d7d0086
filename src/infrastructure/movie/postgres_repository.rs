//! PostgreSQL movie repository implementation

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction};

use crate::domain::{
    CategoryId, DomainError, EidrCode, Movie, MovieOrderBy, MoviePage, MovieQuery,
    MovieRepository, MovieStatus, MovieTableRow,
};
use crate::infrastructure::storage::{begin_serializable, commit, storage_error, write_error};

const MOVIE_COLUMNS: &str = "m.eidr_code, m.name, m.rating, m.year, m.status";

/// PostgreSQL implementation of MovieRepository
#[derive(Debug, Clone)]
pub struct PostgresMovieRepository {
    pool: PgPool,
}

impl PostgresMovieRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn get(&self, eidr_code: &EidrCode) -> Result<Option<Movie>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM movies m WHERE m.eidr_code = $1",
            MOVIE_COLUMNS
        ))
        .bind(eidr_code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("get movie", e))?;

        match row {
            Some(row) => Ok(Some(row_to_movie(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Movie>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM movies m WHERE LOWER(m.name) = LOWER($1) ORDER BY m.eidr_code",
            MOVIE_COLUMNS
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("find movies by name", e))?;

        rows.iter().map(row_to_movie).collect()
    }

    async fn create(
        &self,
        movie: Movie,
        category_ids: Vec<CategoryId>,
    ) -> Result<Movie, DomainError> {
        let mut tx = begin_serializable(&self.pool).await?;

        sqlx::query(
            r#"
            INSERT INTO movies (eidr_code, name, rating, year, status)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(movie.eidr_code().as_str())
        .bind(movie.name())
        .bind(movie.rating())
        .bind(movie.year())
        .bind(movie.status().as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("create movie", &already_exists(movie.eidr_code()), e))?;

        insert_links(&mut tx, movie.eidr_code(), &category_ids).await?;
        commit(tx).await?;

        Ok(movie)
    }

    async fn update(
        &self,
        movie: &Movie,
        category_ids: Option<Vec<CategoryId>>,
    ) -> Result<Movie, DomainError> {
        let mut tx = begin_serializable(&self.pool).await?;

        let result = sqlx::query(
            r#"
            UPDATE movies
            SET name = $2, rating = $3, year = $4, status = $5
            WHERE eidr_code = $1
            "#,
        )
        .bind(movie.eidr_code().as_str())
        .bind(movie.name())
        .bind(movie.rating())
        .bind(movie.year())
        .bind(movie.status().as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("update movie", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(does_not_exist(movie.eidr_code())));
        }

        if let Some(category_ids) = category_ids {
            sqlx::query("DELETE FROM movie_category WHERE movie_eidr = $1")
                .bind(movie.eidr_code().as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| storage_error("unlink movie categories", e))?;

            insert_links(&mut tx, movie.eidr_code(), &category_ids).await?;
        }

        commit(tx).await?;

        Ok(movie.clone())
    }

    async fn delete_many(&self, eidr_codes: Vec<EidrCode>) -> Result<u64, DomainError> {
        let codes: Vec<String> = eidr_codes
            .into_iter()
            .map(String::from)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if codes.is_empty() {
            return Ok(0);
        }

        let mut tx = begin_serializable(&self.pool).await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM movies WHERE eidr_code = ANY($1)")
                .bind(&codes)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| storage_error("count movies", e))?;

        if existing as usize != codes.len() {
            return Err(DomainError::not_found("Some movies do not exist."));
        }

        sqlx::query("DELETE FROM movie_category WHERE movie_eidr = ANY($1)")
            .bind(&codes)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("unlink movie categories", e))?;

        let result = sqlx::query("DELETE FROM movies WHERE eidr_code = ANY($1)")
            .bind(&codes)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("delete movies", e))?;

        commit(tx).await?;

        Ok(result.rows_affected())
    }

    async fn search(&self, query: &MovieQuery) -> Result<MoviePage, DomainError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_filters(&mut count, query);

        let total_items = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("count movies", e))?;

        if total_items == 0 {
            return Ok(MoviePage::default());
        }

        let mut select = QueryBuilder::<Postgres>::new("SELECT ");
        select.push(MOVIE_COLUMNS).push(
            r#",
            COALESCE((
                SELECT string_agg(c.name, ', ' ORDER BY c.id)
                FROM movie_category mc2
                JOIN categories c ON c.id = mc2.category_id
                WHERE mc2.movie_eidr = m.eidr_code
            ), '') AS categories"#,
        );
        push_filters(&mut select, query);
        select
            .push(" ORDER BY ")
            .push(order_column(query.order_by))
            .push(" ")
            .push(query.direction.as_sql())
            .push(", m.eidr_code ASC LIMIT ")
            .push_bind(to_i64(query.limit()))
            .push(" OFFSET ")
            .push_bind(to_i64(query.offset()));

        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("search movies", e))?;

        let rows = rows
            .iter()
            .map(|row| {
                let movie = row_to_movie(row)?;
                let categories: String = row
                    .try_get("categories")
                    .map_err(|e| storage_error("read movie categories", e))?;

                Ok(MovieTableRow {
                    eidr_code: movie.eidr_code().clone(),
                    name: movie.name().to_string(),
                    rating: movie.rating(),
                    year: movie.year(),
                    status: movie.status(),
                    categories,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(MoviePage {
            rows,
            total_items: total_items as u64,
        })
    }
}

/// Appends the FROM clause and every filter of the query
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &MovieQuery) {
    builder.push(
        " FROM movies m WHERE EXISTS (SELECT 1 FROM movie_category mc WHERE mc.movie_eidr = m.eidr_code",
    );
    if !query.category_ids.is_empty() {
        builder
            .push(" AND mc.category_id = ANY(")
            .push_bind(query.category_ids.clone())
            .push(")");
    }
    builder.push(")");

    if let Some(eidr_code) = query.eidr_code.as_deref().filter(|s| !s.is_empty()) {
        builder
            .push(" AND m.eidr_code ILIKE ")
            .push_bind(contains_pattern(eidr_code));
    }

    if let Some(name) = query.name.as_deref().filter(|s| !s.is_empty()) {
        builder
            .push(" AND m.name ILIKE ")
            .push_bind(contains_pattern(name));
    }

    if query.only_active {
        builder
            .push(" AND m.status = ")
            .push_bind(MovieStatus::Active.as_str());
    }
}

fn order_column(order_by: MovieOrderBy) -> &'static str {
    match order_by {
        MovieOrderBy::Name => "m.name",
        MovieOrderBy::Rating => "m.rating",
    }
}

/// LIKE pattern matching `value` anywhere, with wildcards taken literally
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

async fn insert_links(
    tx: &mut Transaction<'static, Postgres>,
    eidr_code: &EidrCode,
    category_ids: &[CategoryId],
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO movie_category (movie_eidr, category_id)
        SELECT $1, UNNEST($2::BIGINT[])
        "#,
    )
    .bind(eidr_code.as_str())
    .bind(category_ids)
    .execute(&mut **tx)
    .await
    .map_err(|e| write_error("link movie categories", "Movie categories already linked.", e))?;

    Ok(())
}

fn already_exists(eidr_code: &EidrCode) -> String {
    format!("Movie with eidrCode {} already exists.", eidr_code)
}

fn does_not_exist(eidr_code: &EidrCode) -> String {
    format!("Movie with eidrCode {} does not exist.", eidr_code)
}

fn row_to_movie(row: &PgRow) -> Result<Movie, DomainError> {
    let eidr_code: String = row
        .try_get("eidr_code")
        .map_err(|e| storage_error("read movie eidr code", e))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| storage_error("read movie name", e))?;
    let rating: f64 = row
        .try_get("rating")
        .map_err(|e| storage_error("read movie rating", e))?;
    let year: i32 = row
        .try_get("year")
        .map_err(|e| storage_error("read movie year", e))?;
    let status: String = row
        .try_get("status")
        .map_err(|e| storage_error("read movie status", e))?;

    let invalid = |e: crate::domain::MovieValidationError| {
        DomainError::storage(format!("Invalid movie row: {}", e))
    };

    let eidr_code = EidrCode::new(eidr_code).map_err(invalid)?;
    let status = status.parse::<MovieStatus>().map_err(invalid)?;

    Movie::new(eidr_code, name, rating, year, status).map_err(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortDirection;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Matrix"), "%Matrix%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\"), "%c:\\\\%");
    }

    #[test]
    fn test_order_column() {
        assert_eq!(order_column(MovieOrderBy::Name), "m.name");
        assert_eq!(order_column(MovieOrderBy::Rating), "m.rating");
    }

    #[test]
    fn test_filters_sql() {
        let query = MovieQuery {
            category_ids: vec![1, 2],
            eidr_code: Some("10.5240".to_string()),
            name: Some("matrix".to_string()),
            only_active: true,
            direction: SortDirection::Desc,
            ..Default::default()
        };

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_filters(&mut builder, &query);
        let sql = builder.sql();

        assert!(sql.contains("mc.category_id = ANY($1)"));
        assert!(sql.contains("m.eidr_code ILIKE $2"));
        assert!(sql.contains("m.name ILIKE $3"));
        assert!(sql.contains("m.status = $4"));
    }

    #[test]
    fn test_filters_sql_without_filters() {
        let query = MovieQuery::default();

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_filters(&mut builder, &query);
        let sql = builder.sql();

        assert!(sql.contains("EXISTS (SELECT 1 FROM movie_category mc"));
        assert!(!sql.contains("ANY("));
        assert!(!sql.contains("ILIKE"));
        assert!(!sql.contains("m.status"));
    }

    #[test]
    fn test_messages() {
        let code = EidrCode::new("10.5240/X").unwrap();
        assert_eq!(
            already_exists(&code),
            "Movie with eidrCode 10.5240/X already exists."
        );
        assert_eq!(
            does_not_exist(&code),
            "Movie with eidrCode 10.5240/X does not exist."
        );
    }
}
