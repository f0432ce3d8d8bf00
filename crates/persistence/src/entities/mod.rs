//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod folder;
pub mod notification;
pub mod offer;
pub mod offer_plate;
pub mod payment_info;
pub mod profile;
pub mod quote;

pub use folder::{FolderEntity, FolderSummaryEntity};
pub use notification::{NotificationEntity, NotificationTypeDb};
pub use offer::{OfferEntity, OfferExtraEntity, OfferFeatureEntity};
pub use offer_plate::{
    ItemExtraEntity, OfferPlateEntity, OfferPlateStatusDb, OfferPlateSummaryEntity,
    PlateItemEntity, PlateItemWithOfferEntity,
};
pub use payment_info::PaymentInfoEntity;
pub use profile::{ProfileEntity, UserRoleDb};
pub use quote::{PaymentStatusDb, QuoteEntity, QuoteStatusDb, QuoteSummaryEntity};
