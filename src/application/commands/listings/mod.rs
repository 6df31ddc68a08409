// src/application/commands/listings/mod.rs
mod capability;
mod create;
mod delete;
mod regenerate_slug;
mod service;
mod update;

pub use create::{CreateListingCommand, CreateListingCommandBuilder};
pub use delete::DeleteListingCommand;
pub use regenerate_slug::RegenerateSlugCommand;
pub use service::ListingCommandService;
pub use update::UpdateListingCommand;
