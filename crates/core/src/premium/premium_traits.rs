use async_trait::async_trait;

use super::premium_model::{
    NewOrder, Order, PaymentConfirmation, PaymentOrder, PaymentOrderRequest, Premium,
    PremiumStatus,
};
use crate::errors::Result;
use crate::users::AuthenticatedUser;

#[async_trait]
pub trait PremiumRepositoryTrait: Send + Sync {
    fn get_by_user(&self, user_id: &str) -> Result<Option<Premium>>;

    /// Records the order and marks the user's entitlement active in one write.
    async fn activate(&self, user_id: &str, order: NewOrder) -> Result<(Premium, Order)>;
}

/// Hosted checkout provider.
#[async_trait]
pub trait PaymentGatewayTrait: Send + Sync {
    async fn create_order(&self, request: PaymentOrderRequest) -> Result<PaymentOrder>;

    /// Checks the checkout signature the gateway issued for `order_id|payment_id`.
    fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool>;
}

#[async_trait]
pub trait PremiumServiceTrait: Send + Sync {
    fn is_premium(&self, user_id: &str) -> Result<bool>;

    fn status(&self, user_id: &str) -> Result<PremiumStatus>;

    /// Fails with an authorization error unless the user is premium.
    fn ensure_premium(&self, user_id: &str) -> Result<()>;

    async fn create_order(&self, user: &AuthenticatedUser) -> Result<PaymentOrder>;

    async fn confirm_payment(
        &self,
        user_id: &str,
        confirmation: PaymentConfirmation,
    ) -> Result<Premium>;
}
