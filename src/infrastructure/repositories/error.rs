use crate::domain::errors::DomainError;
use sqlx::postgres::PgDatabaseError;

const CNT_LISTING_SLUG: &str = "listings_slug_key";
const CNT_VIEW_LISTING: &str = "listing_views_listing_id_fkey";
const CNT_LISTING_PRICE_CHECK: &str = "listings_price_non_negative_chk";
const CNT_LISTING_MILEAGE_CHECK: &str = "listings_mileage_non_negative_chk";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_LISTING_SLUG => {
                        let detail = db_err
                            .try_downcast_ref::<PgDatabaseError>()
                            .and_then(PgDatabaseError::detail)
                            .unwrap_or_else(|| db_err.message());
                        DomainError::DuplicateSlug(detail.to_string())
                    }
                    CNT_VIEW_LISTING => DomainError::NotFound("listing not found".into()),
                    CNT_LISTING_PRICE_CHECK => {
                        DomainError::Validation("price cannot be negative".into())
                    }
                    CNT_LISTING_MILEAGE_CHECK => {
                        DomainError::Validation("mileage cannot be negative".into())
                    }
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    "23514" => {
                        return DomainError::Validation("check constraint violated".into());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
