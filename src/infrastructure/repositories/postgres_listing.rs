// src/infrastructure/repositories/postgres_listing.rs
use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::{
    Listing, ListingFilter, ListingId, ListingReadRepository, ListingSlug, ListingSort,
    ListingUpdate, ListingWriteRepository, MakeName, Mileage, ModelName, NewListing, PageRequest,
    Price, RegistrationYear, VariantName,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

pub(super) const LISTING_COLUMNS: &str = "id, make, model, variant, registration_year, price, mileage, \
     description, slug, view_count, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresListingWriteRepository {
    pool: PgPool,
}

impl PostgresListingWriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Clone)]
pub struct PostgresListingReadRepository {
    pool: PgPool,
}

impl PostgresListingReadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ListingRow {
    id: i64,
    make: String,
    model: String,
    variant: Option<String>,
    registration_year: Option<i32>,
    price: Option<i64>,
    mileage: Option<i64>,
    description: String,
    slug: String,
    view_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = DomainError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        Ok(Listing {
            id: ListingId::new(row.id)?,
            make: MakeName::new(row.make)?,
            model: ModelName::new(row.model)?,
            variant: row.variant.map(VariantName::new).transpose()?,
            registration_year: row.registration_year.map(RegistrationYear::new).transpose()?,
            price: row.price.map(Price::new).transpose()?,
            mileage: row.mileage.map(Mileage::new).transpose()?,
            description: row.description,
            slug: ListingSlug::new(row.slug)?,
            view_count: row.view_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ListingWriteRepository for PostgresListingWriteRepository {
    async fn insert(&self, listing: NewListing) -> DomainResult<Listing> {
        let NewListing {
            make,
            model,
            variant,
            registration_year,
            price,
            mileage,
            description,
            slug,
            created_at,
            updated_at,
        } = listing;

        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "INSERT INTO listings (make, model, variant, registration_year, price, mileage, description, slug, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {LISTING_COLUMNS}"
        ))
        .bind(make.as_str())
        .bind(model.as_str())
        .bind(variant.as_ref().map(|v| v.as_str()))
        .bind(registration_year.map(|y| y.value()))
        .bind(price.map(|p| p.value()))
        .bind(mileage.map(|m| m.value()))
        .bind(description.as_str())
        .bind(slug.as_str())
        .bind(created_at)
        .bind(updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Listing::try_from(row)
    }

    async fn update(&self, update: ListingUpdate) -> DomainResult<Listing> {
        let ListingUpdate {
            id,
            make,
            model,
            variant,
            registration_year,
            price,
            mileage,
            description,
            slug,
            original_updated_at,
            updated_at,
        } = update;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE listings SET updated_at = ");
        builder.push_bind(updated_at);

        if let Some(make) = make {
            builder.push(", make = ");
            builder.push_bind(String::from(make));
        }
        if let Some(model) = model {
            builder.push(", model = ");
            builder.push_bind(String::from(model));
        }
        if let Some(variant) = variant {
            builder.push(", variant = ");
            builder.push_bind(variant.map(String::from));
        }
        if let Some(year) = registration_year {
            builder.push(", registration_year = ");
            builder.push_bind(year.map(|y| y.value()));
        }
        if let Some(price) = price {
            builder.push(", price = ");
            builder.push_bind(price.map(|p| p.value()));
        }
        if let Some(mileage) = mileage {
            builder.push(", mileage = ");
            builder.push_bind(mileage.map(|m| m.value()));
        }
        if let Some(description) = description {
            builder.push(", description = ");
            builder.push_bind(description);
        }
        if let Some(slug) = slug {
            builder.push(", slug = ");
            builder.push_bind(String::from(slug));
        }

        builder.push(" WHERE id = ");
        builder.push_bind(i64::from(id));
        builder.push(" AND updated_at = ");
        builder.push_bind(original_updated_at);
        builder.push(" RETURNING ");
        builder.push(LISTING_COLUMNS);

        let maybe_row = builder
            .build_query_as::<ListingRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        match maybe_row {
            Some(row) => Listing::try_from(row),
            None => {
                let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM listings WHERE id = $1")
                    .bind(i64::from(id))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx)?;
                if exists.is_some() {
                    Err(DomainError::Conflict(
                        "listing update conflict, please retry".into(),
                    ))
                } else {
                    Err(DomainError::NotFound("listing not found".into()))
                }
            }
        }
    }

    async fn delete(&self, id: ListingId) -> DomainResult<()> {
        // listing_views rows go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("listing not found".into()));
        }
        Ok(())
    }
}

impl PostgresListingReadRepository {
    fn apply_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListingFilter) {
        builder.push(" WHERE TRUE");

        if let Some(make) = &filter.make {
            builder.push(" AND lower(make) = lower(");
            builder.push_bind(make.trim().to_string());
            builder.push(")");
        }
        if let Some(model) = &filter.model {
            builder.push(" AND lower(model) = lower(");
            builder.push_bind(model.trim().to_string());
            builder.push(")");
        }
        if let Some(year) = filter.registration_year {
            builder.push(" AND registration_year = ");
            builder.push_bind(year);
        }
        if let Some(min) = filter.min_price {
            builder.push(" AND price >= ");
            builder.push_bind(min);
        }
        if let Some(max) = filter.max_price {
            builder.push(" AND price <= ");
            builder.push_bind(max);
        }
        if let Some(max) = filter.max_mileage {
            builder.push(" AND mileage <= ");
            builder.push_bind(max);
        }
        if let Some(query) = filter.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", escape_like(query));
            builder.push(" AND (make ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR model ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }

    fn order_clause(sort: ListingSort) -> &'static str {
        match sort {
            ListingSort::PriceAsc => " ORDER BY price ASC NULLS LAST, id ASC",
            ListingSort::PriceDesc => " ORDER BY price DESC NULLS LAST, id DESC",
            ListingSort::YearAsc => " ORDER BY registration_year ASC NULLS LAST, id ASC",
            ListingSort::YearDesc => " ORDER BY registration_year DESC NULLS LAST, id DESC",
            ListingSort::MileageAsc => " ORDER BY mileage ASC NULLS LAST, id ASC",
            ListingSort::MileageDesc => " ORDER BY mileage DESC NULLS LAST, id DESC",
            ListingSort::CreatedDesc => " ORDER BY created_at DESC, id DESC",
            ListingSort::ViewsDesc => " ORDER BY view_count DESC, id DESC",
        }
    }
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl ListingReadRepository for PostgresListingReadRepository {
    async fn find_by_slug(&self, slug: &ListingSlug) -> DomainResult<Option<Listing>> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE slug = $1"
        ))
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Listing::try_from).transpose()
    }

    async fn slug_exists(&self, slug: &ListingSlug) -> DomainResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM listings WHERE slug = $1)")
            .bind(slug.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn list_page(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
        page: PageRequest,
    ) -> DomainResult<(Vec<Listing>, u64)> {
        let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM listings");
        Self::apply_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {LISTING_COLUMNS} FROM listings"));
        Self::apply_filters(&mut builder, filter);
        builder.push(Self::order_clause(sort));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(page.page_size));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = builder
            .build_query_as::<ListingRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let listings = rows
            .into_iter()
            .map(Listing::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((listings, u64::try_from(total).unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_patterns_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn every_sort_has_a_stable_tiebreaker() {
        for sort in [
            ListingSort::PriceAsc,
            ListingSort::PriceDesc,
            ListingSort::YearAsc,
            ListingSort::YearDesc,
            ListingSort::MileageAsc,
            ListingSort::MileageDesc,
            ListingSort::CreatedDesc,
            ListingSort::ViewsDesc,
        ] {
            let clause = PostgresListingReadRepository::order_clause(sort);
            assert!(clause.contains("id"), "{clause}");
        }
    }
}
