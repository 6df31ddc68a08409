// tests/support/builders.rs
use dealership_core::application::commands::listings::CreateListingCommand;
use serde_json::{Value, json};

pub struct ListingBuilder {
    make: String,
    model: String,
    variant: Option<String>,
    year: Option<i32>,
    price: Option<i64>,
    mileage: Option<i64>,
}

impl ListingBuilder {
    pub fn new() -> Self {
        Self {
            make: "Audi".into(),
            model: "A4".into(),
            variant: None,
            year: Some(2019),
            price: Some(18_500),
            mileage: Some(64_000),
        }
    }

    pub fn make(mut self, make: impl Into<String>) -> Self {
        self.make = make.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn command(self) -> CreateListingCommand {
        CreateListingCommand {
            make: self.make,
            model: self.model,
            variant: self.variant,
            registration_year: self.year,
            price: self.price,
            mileage: self.mileage,
            description: "One owner, full service history.".into(),
        }
    }

    pub fn json(self) -> Value {
        json!({
            "make": self.make,
            "model": self.model,
            "variant": self.variant,
            "registration_year": self.year,
            "price": self.price,
            "mileage": self.mileage,
            "description": "One owner, full service history."
        })
    }
}

impl Default for ListingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
