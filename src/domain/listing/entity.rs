// src/domain/listing/entity.rs
use crate::domain::listing::value_objects::{
    ListingId, ListingSlug, MakeName, Mileage, ModelName, Price, RegistrationYear, VariantName,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Listing {
    pub id: ListingId,
    pub make: MakeName,
    pub model: ModelName,
    pub variant: Option<VariantName>,
    pub registration_year: Option<RegistrationYear>,
    pub price: Option<Price>,
    pub mileage: Option<Mileage>,
    pub description: String,
    pub slug: ListingSlug,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Human readable title, e.g. `Audi A4 S4 (2020)`.
    pub fn display_name(&self) -> String {
        let mut name = format!("{} {}", self.make, self.model);
        if let Some(variant) = &self.variant {
            name.push(' ');
            name.push_str(variant.as_str());
        }
        match self.registration_year {
            Some(year) => format!("{name} ({})", year.value()),
            None => format!("{name} (N/A)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewListing {
    pub make: MakeName,
    pub model: ModelName,
    pub variant: Option<VariantName>,
    pub registration_year: Option<RegistrationYear>,
    pub price: Option<Price>,
    pub mileage: Option<Mileage>,
    pub description: String,
    pub slug: ListingSlug,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update. `None` leaves a field untouched; the nested `Option` on
/// nullable attributes distinguishes "clear" from "keep".
#[derive(Debug, Clone)]
pub struct ListingUpdate {
    pub id: ListingId,
    pub make: Option<MakeName>,
    pub model: Option<ModelName>,
    pub variant: Option<Option<VariantName>>,
    pub registration_year: Option<Option<RegistrationYear>>,
    pub price: Option<Option<Price>>,
    pub mileage: Option<Option<Mileage>>,
    pub description: Option<String>,
    pub slug: Option<ListingSlug>,
    pub original_updated_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingUpdate {
    pub fn new(id: ListingId, original_updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            make: None,
            model: None,
            variant: None,
            registration_year: None,
            price: None,
            mileage: None,
            description: None,
            slug: None,
            original_updated_at,
            updated_at: original_updated_at,
        }
    }

    pub fn with_make(mut self, make: MakeName) -> Self {
        self.make = Some(make);
        self
    }

    pub fn with_model(mut self, model: ModelName) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_variant(mut self, variant: Option<VariantName>) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn with_registration_year(mut self, year: Option<RegistrationYear>) -> Self {
        self.registration_year = Some(year);
        self
    }

    pub fn with_price(mut self, price: Option<Price>) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_mileage(mut self, mileage: Option<Mileage>) -> Self {
        self.mileage = Some(mileage);
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_slug(mut self, slug: ListingSlug) -> Self {
        self.slug = Some(slug);
        self
    }

    pub fn set_updated_at(&mut self, updated_at: DateTime<Utc>) {
        self.updated_at = updated_at;
    }

    pub fn is_empty(&self) -> bool {
        self.make.is_none()
            && self.model.is_none()
            && self.variant.is_none()
            && self.registration_year.is_none()
            && self.price.is_none()
            && self.mileage.is_none()
            && self.description.is_none()
            && self.slug.is_none()
    }

    /// Apply the changes to an in-memory copy of the listing.
    pub fn apply_to(&self, listing: &mut Listing) {
        if let Some(make) = &self.make {
            listing.make = make.clone();
        }
        if let Some(model) = &self.model {
            listing.model = model.clone();
        }
        if let Some(variant) = &self.variant {
            listing.variant = variant.clone();
        }
        if let Some(year) = self.registration_year {
            listing.registration_year = year;
        }
        if let Some(price) = self.price {
            listing.price = price;
        }
        if let Some(mileage) = self.mileage {
            listing.mileage = mileage;
        }
        if let Some(description) = &self.description {
            listing.description = description.clone();
        }
        if let Some(slug) = &self.slug {
            listing.slug = slug.clone();
        }
        listing.updated_at = self.updated_at;
    }
}
