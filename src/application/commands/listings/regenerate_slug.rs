// src/application/commands/listings/regenerate_slug.rs
use super::{ListingCommandService, capability::ensure_capability, service::slug_source};
use crate::{
    application::{
        dto::{AuthenticatedUser, ListingDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{errors::DomainError, listing::ListingUpdate},
};
use tracing::{info, warn};

pub struct RegenerateSlugCommand {
    pub slug: String,
}

impl ListingCommandService {
    /// Re-derive the slug from the listing's current attributes. Links using
    /// the previous slug stop resolving.
    pub async fn regenerate_slug(
        &self,
        actor: &AuthenticatedUser,
        command: RegenerateSlugCommand,
    ) -> ApplicationResult<ListingDto> {
        ensure_capability(actor, "listings", "update")?;
        let listing = self.load_by_slug(&command.slug).await?;
        let source = slug_source(&listing);

        let attempts = self.persist_attempts();
        for attempt in 1..=attempts {
            let slug = self
                .slug_service
                .generate_unique_slug(&source, Some(listing.id))
                .await?;

            let mut update = ListingUpdate::new(listing.id, listing.updated_at).with_slug(slug);
            update.set_updated_at(self.clock.now());

            match self.write_repo.update(update).await {
                Ok(updated) => {
                    info!(
                        listing_id = %updated.id,
                        old_slug = %listing.slug,
                        new_slug = %updated.slug,
                        "listing slug regenerated"
                    );
                    return Ok(updated.into());
                }
                Err(DomainError::DuplicateSlug(taken)) => {
                    warn!(slug = %taken, attempt, "slug collided on update, regenerating");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ApplicationError::conflict(format!(
            "could not persist a unique slug after {attempts} attempts"
        )))
    }
}
