// src/domain/listing/services/mod.rs
use std::sync::Arc;

use tracing::debug;

use crate::application::ports::util::SlugGenerator;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::repository::ListingReadRepository;
use crate::domain::listing::value_objects::{ListingId, ListingSlug, SLUG_MAX_LEN};

const FALLBACK_PREFIX: &str = "listing";

/// Tunables for slug assignment.
#[derive(Debug, Clone, Copy)]
pub struct SlugPolicy {
    /// Length of the random token appended to every slug.
    pub disambiguator_len: usize,
    /// How many numeric suffixes (`-1`, `-2`, ...) to try before giving up.
    pub max_suffix_attempts: u32,
    /// How many times create/regenerate re-run the whole sequence when the
    /// storage unique constraint rejects a slug.
    pub persist_attempts: u32,
}

impl Default for SlugPolicy {
    fn default() -> Self {
        Self {
            disambiguator_len: 6,
            max_suffix_attempts: 100,
            persist_attempts: 3,
        }
    }
}

/// Descriptive attributes a slug is derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlugSource<'a> {
    pub make: Option<&'a str>,
    pub model: Option<&'a str>,
    pub variant: Option<&'a str>,
    pub registration_year: Option<i32>,
}

impl SlugSource<'_> {
    /// `make-model[-variant][-year]` with blank parts omitted.
    fn raw_base(&self) -> DomainResult<String> {
        let make = self.make.map(str::trim).filter(|s| !s.is_empty());
        let model = self.model.map(str::trim).filter(|s| !s.is_empty());
        if make.is_none() && model.is_none() {
            return Err(DomainError::Validation(
                "make or model is required to build a slug".into(),
            ));
        }

        let year = self.registration_year.map(|y| y.to_string());
        let parts: Vec<&str> = [
            make,
            model,
            self.variant.map(str::trim).filter(|s| !s.is_empty()),
            year.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(parts.join("-"))
    }
}

/// Domain service responsible for producing unique slugs for listings.
pub struct ListingSlugService {
    read_repo: Arc<dyn ListingReadRepository>,
    generator: Arc<dyn SlugGenerator>,
    policy: SlugPolicy,
}

impl ListingSlugService {
    pub fn new(
        read_repo: Arc<dyn ListingReadRepository>,
        generator: Arc<dyn SlugGenerator>,
        policy: SlugPolicy,
    ) -> Self {
        Self {
            read_repo,
            generator,
            policy,
        }
    }

    pub fn policy(&self) -> SlugPolicy {
        self.policy
    }

    /// Build a candidate and walk numeric suffixes until the persisted slug
    /// set has no match. A slug already owned by `listing_id` counts as free.
    pub async fn generate_unique_slug(
        &self,
        source: &SlugSource<'_>,
        listing_id: Option<ListingId>,
    ) -> DomainResult<ListingSlug> {
        let root = self.candidate_root(source, listing_id)?;

        let mut candidate = root.clone();
        for counter in 0..=self.policy.max_suffix_attempts {
            if counter > 0 {
                candidate = format!("{root}-{counter}");
            }
            let slug = ListingSlug::new(candidate.clone())?;

            let taken = match listing_id {
                Some(id) => self
                    .read_repo
                    .find_by_slug(&slug)
                    .await?
                    .is_some_and(|existing| existing.id != id),
                None => self.read_repo.slug_exists(&slug).await?,
            };

            if !taken {
                return Ok(slug);
            }
            debug!(slug = %slug, "slug candidate taken");
        }

        Err(DomainError::Conflict(format!(
            "no free slug for {root} after {} attempts",
            self.policy.max_suffix_attempts
        )))
    }

    fn candidate_root(
        &self,
        source: &SlugSource<'_>,
        listing_id: Option<ListingId>,
    ) -> DomainResult<String> {
        let raw = source.raw_base()?;
        let token = self.generator.disambiguator(self.policy.disambiguator_len);

        let base = self.generator.slugify(&raw);
        let base = if base.is_empty() {
            match listing_id {
                Some(id) => format!("{FALLBACK_PREFIX}-{id}"),
                None => FALLBACK_PREFIX.to_string(),
            }
        } else {
            base
        };

        // room for "-<token>" plus a numeric suffix
        let suffix_room = 1 + token.len() + 1 + self.policy.max_suffix_attempts.to_string().len();
        let budget = SLUG_MAX_LEN.saturating_sub(suffix_room).max(1);
        let base = truncate_on_boundary(&base, budget);

        Ok(format!("{base}-{token}"))
    }
}

fn truncate_on_boundary(base: &str, max: usize) -> &str {
    if base.len() <= max {
        return base;
    }
    base[..max].trim_end_matches('-')
}
