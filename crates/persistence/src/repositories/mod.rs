//! Repository implementations for database operations.

pub mod cart;
pub mod folder;
pub mod notification;
pub mod offer;
pub mod offer_plate;
pub mod profile;
pub mod quote;

pub use cart::CartRepository;
pub use folder::FolderRepository;
pub use notification::NotificationRepository;
pub use offer::OfferRepository;
pub use offer_plate::OfferPlateRepository;
pub use profile::ProfileRepository;
pub use quote::QuoteRepository;
