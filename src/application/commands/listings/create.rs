// src/application/commands/listings/create.rs
use super::{ListingCommandService, capability::ensure_capability};
use crate::{
    application::{
        dto::{AuthenticatedUser, ListingDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        errors::DomainError,
        listing::{
            MakeName, Mileage, ModelName, NewListing, Price, RegistrationYear, VariantName,
            services::SlugSource,
        },
    },
};
use tracing::{info, warn};

pub struct CreateListingCommand {
    pub make: String,
    pub model: String,
    pub variant: Option<String>,
    pub registration_year: Option<i32>,
    pub price: Option<i64>,
    pub mileage: Option<i64>,
    pub description: String,
}

impl CreateListingCommand {
    pub fn builder() -> CreateListingCommandBuilder {
        CreateListingCommandBuilder::default()
    }
}

#[derive(Default)]
pub struct CreateListingCommandBuilder {
    make: Option<String>,
    model: Option<String>,
    variant: Option<String>,
    registration_year: Option<i32>,
    price: Option<i64>,
    mileage: Option<i64>,
    description: String,
}

impl CreateListingCommandBuilder {
    pub fn make(mut self, make: impl Into<String>) -> Self {
        self.make = Some(make.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn registration_year(mut self, year: i32) -> Self {
        self.registration_year = Some(year);
        self
    }

    pub fn price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn mileage(mut self, mileage: i64) -> Self {
        self.mileage = Some(mileage);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn build(self) -> Result<CreateListingCommand, &'static str> {
        Ok(CreateListingCommand {
            make: self.make.ok_or("make is required")?,
            model: self.model.ok_or("model is required")?,
            variant: self.variant,
            registration_year: self.registration_year,
            price: self.price,
            mileage: self.mileage,
            description: self.description,
        })
    }
}

impl ListingCommandService {
    pub async fn create_listing(
        &self,
        actor: &AuthenticatedUser,
        command: CreateListingCommand,
    ) -> ApplicationResult<ListingDto> {
        ensure_capability(actor, "listings", "create")?;

        let make = MakeName::new(command.make)?;
        let model = ModelName::new(command.model)?;
        let variant = command
            .variant
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(VariantName::new)
            .transpose()?;
        let registration_year = command
            .registration_year
            .map(RegistrationYear::new)
            .transpose()?;
        let price = command.price.map(Price::new).transpose()?;
        let mileage = command.mileage.map(Mileage::new).transpose()?;
        let description = command.description.trim().to_string();

        let source = SlugSource {
            make: Some(make.as_str()),
            model: Some(model.as_str()),
            variant: variant.as_ref().map(|v| v.as_str()),
            registration_year: registration_year.map(|y| y.value()),
        };

        let attempts = self.persist_attempts();
        for attempt in 1..=attempts {
            let slug = self.slug_service.generate_unique_slug(&source, None).await?;
            let now = self.clock.now();
            let new_listing = NewListing {
                make: make.clone(),
                model: model.clone(),
                variant: variant.clone(),
                registration_year,
                price,
                mileage,
                description: description.clone(),
                slug,
                created_at: now,
                updated_at: now,
            };

            match self.write_repo.insert(new_listing).await {
                Ok(created) => {
                    info!(listing_id = %created.id, slug = %created.slug, "listing created");
                    return Ok(created.into());
                }
                Err(DomainError::DuplicateSlug(taken)) => {
                    warn!(slug = %taken, attempt, "slug collided on insert, regenerating");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ApplicationError::conflict(format!(
            "could not persist a unique slug after {attempts} attempts"
        )))
    }
}
