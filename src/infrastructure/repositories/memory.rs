// src/infrastructure/repositories/memory.rs
//! Process-local backend used for `memory://` deployments and tests. Every
//! repository shares one async mutex, so each operation is atomic.
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::{
    Listing, ListingFilter, ListingId, ListingReadRepository, ListingSlug, ListingSort,
    ListingUpdate, ListingWriteRepository, NewListing, PageRequest,
};
use crate::domain::tracking::{
    DailyVisits, DedupWindow, ListingView, ListingViewRepository, MostViewedListing,
    NewListingView, NewSiteVisit, RecordOutcome, SiteVisit, SiteVisitCursor, SiteVisitRepository,
    TrafficStatsRepository, VisitorSessionId,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    listings: BTreeMap<i64, Listing>,
    views: Vec<ListingView>,
    visits: Vec<SiteVisit>,
    last_listing_id: i64,
    last_view_id: i64,
    last_visit_id: i64,
}

impl State {
    fn slug_taken(&self, slug: &ListingSlug, except: Option<i64>) -> bool {
        self.listings
            .values()
            .any(|l| &l.slug == slug && Some(i64::from(l.id)) != except)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingWriteRepository for InMemoryStore {
    async fn insert(&self, listing: NewListing) -> DomainResult<Listing> {
        let mut state = self.state.lock().await;
        if state.slug_taken(&listing.slug, None) {
            return Err(DomainError::DuplicateSlug(listing.slug.into_inner()));
        }

        state.last_listing_id += 1;
        let created = Listing {
            id: ListingId::new(state.last_listing_id)?,
            make: listing.make,
            model: listing.model,
            variant: listing.variant,
            registration_year: listing.registration_year,
            price: listing.price,
            mileage: listing.mileage,
            description: listing.description,
            slug: listing.slug,
            view_count: 0,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        };
        state.listings.insert(i64::from(created.id), created.clone());
        Ok(created)
    }

    async fn update(&self, update: ListingUpdate) -> DomainResult<Listing> {
        let mut state = self.state.lock().await;
        let id = i64::from(update.id);
        if let Some(slug) = &update.slug {
            if state.slug_taken(slug, Some(id)) {
                return Err(DomainError::DuplicateSlug(slug.as_str().to_string()));
            }
        }

        let listing = state
            .listings
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("listing not found".into()))?;
        if listing.updated_at != update.original_updated_at {
            return Err(DomainError::Conflict(
                "listing update conflict, please retry".into(),
            ));
        }

        update.apply_to(listing);
        Ok(listing.clone())
    }

    async fn delete(&self, id: ListingId) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        if state.listings.remove(&i64::from(id)).is_none() {
            return Err(DomainError::NotFound("listing not found".into()));
        }
        state.views.retain(|view| view.listing_id != id);
        Ok(())
    }
}

fn as_count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

fn as_len(n: u32) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

fn compare_nullable<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_listings(sort: ListingSort, a: &Listing, b: &Listing) -> Ordering {
    let (a_id, b_id) = (i64::from(a.id), i64::from(b.id));
    match sort {
        ListingSort::PriceAsc => compare_nullable(a.price, b.price, false).then(a_id.cmp(&b_id)),
        ListingSort::PriceDesc => compare_nullable(a.price, b.price, true).then(b_id.cmp(&a_id)),
        ListingSort::YearAsc => compare_nullable(
            a.registration_year.map(|y| y.value()),
            b.registration_year.map(|y| y.value()),
            false,
        )
        .then(a_id.cmp(&b_id)),
        ListingSort::YearDesc => compare_nullable(
            a.registration_year.map(|y| y.value()),
            b.registration_year.map(|y| y.value()),
            true,
        )
        .then(b_id.cmp(&a_id)),
        ListingSort::MileageAsc => {
            compare_nullable(a.mileage, b.mileage, false).then(a_id.cmp(&b_id))
        }
        ListingSort::MileageDesc => {
            compare_nullable(a.mileage, b.mileage, true).then(b_id.cmp(&a_id))
        }
        ListingSort::CreatedDesc => b.created_at.cmp(&a.created_at).then(b_id.cmp(&a_id)),
        ListingSort::ViewsDesc => b.view_count.cmp(&a.view_count).then(b_id.cmp(&a_id)),
    }
}

#[async_trait]
impl ListingReadRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &ListingSlug) -> DomainResult<Option<Listing>> {
        let state = self.state.lock().await;
        Ok(state.listings.values().find(|l| &l.slug == slug).cloned())
    }

    async fn list_page(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
        page: PageRequest,
    ) -> DomainResult<(Vec<Listing>, u64)> {
        let state = self.state.lock().await;
        let mut matching: Vec<&Listing> =
            state.listings.values().filter(|l| filter.matches(l)).collect();
        matching.sort_by(|a, b| compare_listings(sort, a, b));

        let total = as_count(matching.len());
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(as_len(page.page_size))
            .cloned()
            .collect();
        Ok((items, total))
    }
}

#[async_trait]
impl ListingViewRepository for InMemoryStore {
    async fn record(
        &self,
        view: NewListingView,
        window: DedupWindow,
    ) -> DomainResult<RecordOutcome> {
        let mut state = self.state.lock().await;
        let listing_key = i64::from(view.listing_id);
        if !state.listings.contains_key(&listing_key) {
            return Err(DomainError::NotFound("listing not found".into()));
        }

        let last = state
            .views
            .iter()
            .filter(|v| v.listing_id == view.listing_id && v.session_id == view.session_id)
            .map(|v| v.viewed_at)
            .max();
        if !window.should_record(last, view.viewed_at) {
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        state.last_view_id += 1;
        let id = state.last_view_id;
        state.views.push(ListingView {
            id,
            listing_id: view.listing_id,
            session_id: view.session_id,
            ip_address: view.ip_address,
            viewed_at: view.viewed_at,
        });
        if let Some(listing) = state.listings.get_mut(&listing_key) {
            listing.view_count += 1;
        }
        Ok(RecordOutcome::Recorded)
    }

    async fn latest_for(
        &self,
        listing_id: ListingId,
        session_id: &VisitorSessionId,
    ) -> DomainResult<Option<ListingView>> {
        let state = self.state.lock().await;
        Ok(state
            .views
            .iter()
            .filter(|v| v.listing_id == listing_id && &v.session_id == session_id)
            .max_by_key(|v| (v.viewed_at, v.id))
            .cloned())
    }
}

#[async_trait]
impl SiteVisitRepository for InMemoryStore {
    async fn record(
        &self,
        visit: NewSiteVisit,
        window: DedupWindow,
    ) -> DomainResult<RecordOutcome> {
        let mut state = self.state.lock().await;
        let last = state
            .visits
            .iter()
            .filter(|v| v.path == visit.path && v.session_id == visit.session_id)
            .map(|v| v.visited_at)
            .max();
        if !window.should_record(last, visit.visited_at) {
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        state.last_visit_id += 1;
        let id = state.last_visit_id;
        state.visits.push(SiteVisit {
            id,
            path: visit.path,
            session_id: visit.session_id,
            ip_address: visit.ip_address,
            user_agent: visit.user_agent,
            referrer: visit.referrer,
            visited_at: visit.visited_at,
        });
        Ok(RecordOutcome::Recorded)
    }

    async fn list_page(
        &self,
        limit: u32,
        cursor: Option<SiteVisitCursor>,
    ) -> DomainResult<(Vec<SiteVisit>, Option<SiteVisitCursor>)> {
        let limit = as_len(limit.clamp(1, 200));
        let state = self.state.lock().await;
        let mut visits: Vec<&SiteVisit> = state
            .visits
            .iter()
            .filter(|v| {
                cursor
                    .as_ref()
                    .is_none_or(|c| (v.visited_at, v.id) < (c.visited_at, c.id))
            })
            .collect();
        visits.sort_by(|a, b| (b.visited_at, b.id).cmp(&(a.visited_at, a.id)));

        let has_more = visits.len() > limit;
        let page: Vec<SiteVisit> = visits.into_iter().take(limit).cloned().collect();
        let next_cursor = if has_more {
            page.last()
                .map(|last| SiteVisitCursor::new(last.visited_at, last.id))
        } else {
            None
        };
        Ok((page, next_cursor))
    }
}

#[async_trait]
impl TrafficStatsRepository for InMemoryStore {
    async fn unique_visitors(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        let state = self.state.lock().await;
        let sessions: HashSet<&str> = state
            .visits
            .iter()
            .filter(|v| v.visited_at >= since)
            .map(|v| v.session_id.as_str())
            .collect();
        Ok(as_count(sessions.len()))
    }

    async fn page_views(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        let state = self.state.lock().await;
        Ok(as_count(
            state.visits.iter().filter(|v| v.visited_at >= since).count(),
        ))
    }

    async fn listing_views(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        let state = self.state.lock().await;
        Ok(as_count(
            state.views.iter().filter(|v| v.viewed_at >= since).count(),
        ))
    }

    async fn most_viewed(&self, limit: u32) -> DomainResult<Vec<MostViewedListing>> {
        let state = self.state.lock().await;
        let mut listings: Vec<&Listing> = state.listings.values().collect();
        listings.sort_by(|a, b| {
            b.view_count
                .cmp(&a.view_count)
                .then(i64::from(a.id).cmp(&i64::from(b.id)))
        });
        Ok(listings
            .into_iter()
            .take(as_len(limit))
            .map(MostViewedListing::from)
            .collect())
    }

    async fn daily_visits(&self, since: DateTime<Utc>) -> DomainResult<Vec<DailyVisits>> {
        let state = self.state.lock().await;
        let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for visit in state.visits.iter().filter(|v| v.visited_at >= since) {
            *per_day.entry(visit.visited_at.date_naive()).or_default() += 1;
        }
        Ok(per_day
            .into_iter()
            .map(|(date, views)| DailyVisits { date, views })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{MakeName, ModelName, Price};
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn new_listing(slug: &str, price: Option<i64>) -> NewListing {
        NewListing {
            make: MakeName::new("Audi").unwrap(),
            model: ModelName::new("A4").unwrap(),
            variant: None,
            registration_year: None,
            price: price.map(|p| Price::new(p).unwrap()),
            mileage: None,
            description: String::new(),
            slug: ListingSlug::new(slug).unwrap(),
            created_at: t0(),
            updated_at: t0(),
        }
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected_on_insert() {
        let store = InMemoryStore::new();
        store.insert(new_listing("audi-a4-ab12cd", None)).await.unwrap();
        let err = store
            .insert(new_listing("audi-a4-ab12cd", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateSlug(_)));
    }

    #[tokio::test]
    async fn stale_update_is_a_conflict() {
        let store = InMemoryStore::new();
        let listing = store.insert(new_listing("audi-a4-ab12cd", None)).await.unwrap();
        let mut update = ListingUpdate::new(listing.id, t0() - Duration::seconds(1))
            .with_description("new".into());
        update.set_updated_at(t0() + Duration::seconds(1));
        let err = store.update(update).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn price_sort_puts_unpriced_last() {
        let store = InMemoryStore::new();
        store.insert(new_listing("a-1", None)).await.unwrap();
        store.insert(new_listing("a-2", Some(9000))).await.unwrap();
        store.insert(new_listing("a-3", Some(5000))).await.unwrap();

        let page = PageRequest {
            page: 1,
            page_size: 12,
        };
        let (items, total) =
            ListingReadRepository::list_page(&store, &ListingFilter::default(), ListingSort::PriceAsc, page)
            .await
            .unwrap();
        let slugs: Vec<&str> = items.iter().map(|l| l.slug.as_str()).collect();
        assert_eq!(total, 3);
        assert_eq!(slugs, ["a-3", "a-2", "a-1"]);
    }

    #[tokio::test]
    async fn view_for_unknown_listing_is_not_found() {
        let store = InMemoryStore::new();
        let view = NewListingView {
            listing_id: ListingId::new(7).unwrap(),
            session_id: VisitorSessionId::new("sess-1").unwrap(),
            ip_address: None,
            viewed_at: t0(),
        };
        let err = ListingViewRepository::record(&store, view, DedupWindow::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
