use super::ListingQueryService;
use crate::{
    application::{
        dto::{ListingDto, NumberedPage},
        error::{ApplicationError, ApplicationResult},
    },
    domain::listing::{ListingFilter, ListingSort, PageRequest},
};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Default)]
pub struct ListListingsQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub max_mileage: Option<i64>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListingQueryService {
    pub async fn list_listings(
        &self,
        query: ListListingsQuery,
    ) -> ApplicationResult<NumberedPage<ListingDto>> {
        let sort = match query.sort.as_deref().map(str::trim) {
            None | Some("") => ListingSort::default(),
            Some(value) => ListingSort::parse(value)
                .ok_or_else(|| ApplicationError::validation(format!("unknown sort key: {value}")))?,
        };

        if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
            if min > max {
                return Err(ApplicationError::validation(
                    "min_price cannot exceed max_price",
                ));
            }
        }

        let page = PageRequest {
            page: query.page.unwrap_or(1).max(1),
            page_size: match query.page_size {
                None | Some(0) => DEFAULT_PAGE_SIZE,
                Some(size) => size.min(MAX_PAGE_SIZE),
            },
        };

        let filter = ListingFilter {
            make: non_blank(query.make),
            model: non_blank(query.model),
            registration_year: query.year,
            min_price: query.min_price,
            max_price: query.max_price,
            max_mileage: query.max_mileage,
            search: non_blank(query.search),
        };

        let (records, total) = self.read_repo.list_page(&filter, sort, page).await?;
        let items = records.into_iter().map(Into::into).collect();
        Ok(NumberedPage::new(items, page.page, page.page_size, total))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
