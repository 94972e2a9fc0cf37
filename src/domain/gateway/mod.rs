//! Gateway context - Payment-gateway notifications and payment views.

mod event;
mod payment;

pub use event::{GatewayEvent, GatewayEventKind};
pub use payment::{GatewayPayment, PaymentStatus};
