pub mod entity;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use entity::{Listing, ListingUpdate, NewListing};
pub use repository::{
    ListingFilter, ListingReadRepository, ListingSort, ListingWriteRepository, PageRequest,
};
pub use value_objects::{
    ListingId, ListingSlug, MakeName, Mileage, ModelName, Price, RegistrationYear, VariantName,
};
