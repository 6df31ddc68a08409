// src/application/commands/listings/update.rs
use super::{ListingCommandService, capability::ensure_capability};
use crate::{
    application::{
        dto::{AuthenticatedUser, ListingDto},
        error::ApplicationResult,
    },
    domain::listing::{
        ListingUpdate, MakeName, Mileage, ModelName, Price, RegistrationYear, VariantName,
    },
};

/// Attribute changes. The outer `Option` on nullable fields means "leave
/// untouched", the inner one "clear". The slug is never changed here.
#[derive(Default)]
pub struct UpdateListingCommand {
    pub slug: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub variant: Option<Option<String>>,
    pub registration_year: Option<Option<i32>>,
    pub price: Option<Option<i64>>,
    pub mileage: Option<Option<i64>>,
    pub description: Option<String>,
}

impl ListingCommandService {
    pub async fn update_listing(
        &self,
        actor: &AuthenticatedUser,
        command: UpdateListingCommand,
    ) -> ApplicationResult<ListingDto> {
        ensure_capability(actor, "listings", "update")?;
        let listing = self.load_by_slug(&command.slug).await?;

        let UpdateListingCommand {
            slug: _,
            make,
            model,
            variant,
            registration_year,
            price,
            mileage,
            description,
        } = command;

        let mut update = ListingUpdate::new(listing.id, listing.updated_at);
        if let Some(make) = make {
            update = update.with_make(MakeName::new(make)?);
        }
        if let Some(model) = model {
            update = update.with_model(ModelName::new(model)?);
        }
        if let Some(variant) = variant {
            let variant = variant
                .filter(|v| !v.trim().is_empty())
                .map(VariantName::new)
                .transpose()?;
            update = update.with_variant(variant);
        }
        if let Some(year) = registration_year {
            update = update.with_registration_year(year.map(RegistrationYear::new).transpose()?);
        }
        if let Some(price) = price {
            update = update.with_price(price.map(Price::new).transpose()?);
        }
        if let Some(mileage) = mileage {
            update = update.with_mileage(mileage.map(Mileage::new).transpose()?);
        }
        if let Some(description) = description {
            update = update.with_description(description.trim().to_string());
        }

        if update.is_empty() {
            return Ok(listing.into());
        }

        update.set_updated_at(self.clock.now());
        let updated = self.write_repo.update(update).await?;
        Ok(updated.into())
    }
}
