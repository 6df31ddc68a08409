// src/application/commands/listings/delete.rs
use super::{ListingCommandService, capability::ensure_capability};
use crate::application::{dto::AuthenticatedUser, error::ApplicationResult};
use tracing::info;

pub struct DeleteListingCommand {
    pub slug: String,
}

impl ListingCommandService {
    pub async fn delete_listing(
        &self,
        actor: &AuthenticatedUser,
        command: DeleteListingCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "listings", "delete")?;
        let listing = self.load_by_slug(&command.slug).await?;

        self.write_repo.delete(listing.id).await?;
        info!(listing_id = %listing.id, slug = %listing.slug, "listing deleted");
        Ok(())
    }
}
