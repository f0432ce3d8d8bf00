//! Domain model definitions.

pub mod cart;
pub mod folder;
pub mod notification;
pub mod offer;
pub mod offer_plate;
pub mod payment;
pub mod profile;
pub mod quote;

pub use cart::{AddToCartRequest, CartItem, CartOffer, CartResponse, SelectedExtra};
pub use folder::{CreateFolderRequest, Folder};
pub use notification::{Notification, NotificationType};
pub use offer::{Offer, OfferExtra};
pub use offer_plate::{OfferPlate, OfferPlateStatus, TransitionError};
pub use payment::PaymentInfo;
pub use profile::{Profile, UserRole};
pub use quote::{PaymentStatus, Quote, QuoteStatus};
