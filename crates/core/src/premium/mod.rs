//! Premium module - entitlement, checkout orders and the payment gateway seam.

mod premium_model;
mod premium_service;
mod premium_traits;

pub use premium_model::{
    NewOrder, Order, PaymentConfirmation, PaymentOrder, PaymentOrderRequest, Premium,
    PremiumStatus,
};
pub use premium_service::PremiumService;
pub use premium_traits::{PaymentGatewayTrait, PremiumRepositoryTrait, PremiumServiceTrait};
