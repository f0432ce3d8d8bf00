//! Application services.

pub mod notify;
pub mod payment_link;

#[allow(unused_imports)] // Re-exports for downstream use
pub use notify::PgNotificationSink;
#[allow(unused_imports)] // Re-exports for downstream use
pub use payment_link::{PaymentLinkClient, PaymentLinkError};
