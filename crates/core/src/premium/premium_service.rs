use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::premium_model::{
    NewOrder, PaymentConfirmation, PaymentOrder, PaymentOrderRequest, Premium, PremiumStatus,
};
use super::premium_traits::{PaymentGatewayTrait, PremiumRepositoryTrait, PremiumServiceTrait};
use crate::constants::{PREMIUM_CURRENCY, PREMIUM_REQUIRED_MESSAGE};
use crate::errors::{Error, Result};
use crate::users::AuthenticatedUser;

const ALREADY_PREMIUM: &str = "User is already a premium member";

pub struct PremiumService {
    repository: Arc<dyn PremiumRepositoryTrait>,
    payment_gateway: Arc<dyn PaymentGatewayTrait>,
    /// Price in whole currency units.
    price: i64,
}

impl PremiumService {
    pub fn new(
        repository: Arc<dyn PremiumRepositoryTrait>,
        payment_gateway: Arc<dyn PaymentGatewayTrait>,
        price: i64,
    ) -> Self {
        Self {
            repository,
            payment_gateway,
            price,
        }
    }
}

#[async_trait]
impl PremiumServiceTrait for PremiumService {
    fn is_premium(&self, user_id: &str) -> Result<bool> {
        Ok(self
            .repository
            .get_by_user(user_id)?
            .is_some_and(|p| p.active))
    }

    fn status(&self, user_id: &str) -> Result<PremiumStatus> {
        Ok(PremiumStatus {
            is_premium: self.is_premium(user_id)?,
        })
    }

    fn ensure_premium(&self, user_id: &str) -> Result<()> {
        if self.is_premium(user_id)? {
            Ok(())
        } else {
            Err(Error::Unauthorized(PREMIUM_REQUIRED_MESSAGE.to_string()))
        }
    }

    async fn create_order(&self, user: &AuthenticatedUser) -> Result<PaymentOrder> {
        if self.is_premium(&user.id)? {
            return Err(Error::Conflict(ALREADY_PREMIUM.to_string()));
        }

        let mut notes = BTreeMap::new();
        notes.insert("user_id".to_string(), user.id.clone());
        let request = PaymentOrderRequest {
            amount: self.price.saturating_mul(100),
            currency: PREMIUM_CURRENCY.to_string(),
            receipt: user.email.clone(),
            notes,
        };
        debug!("Creating premium order for user {}", user.id);
        self.payment_gateway.create_order(request).await
    }

    async fn confirm_payment(
        &self,
        user_id: &str,
        confirmation: PaymentConfirmation,
    ) -> Result<Premium> {
        confirmation.validate()?;
        if self.is_premium(user_id)? {
            return Err(Error::Conflict(ALREADY_PREMIUM.to_string()));
        }

        let order_id = confirmation.order_id.trim();
        let payment_id = confirmation.payment_id.trim();
        if !self.payment_gateway.verify_payment_signature(
            order_id,
            payment_id,
            confirmation.signature.trim(),
        )? {
            warn!(
                "Rejected payment {} for order {}: signature mismatch",
                payment_id, order_id
            );
            return Err(Error::Unauthorized("Invalid payment signature".to_string()));
        }

        let (premium, order) = self
            .repository
            .activate(
                user_id,
                NewOrder {
                    total: confirmation.amount.unwrap_or_default(),
                    payment_id: payment_id.to_string(),
                    order_id: order_id.to_string(),
                },
            )
            .await?;
        info!("User {} upgraded to premium with order {}", user_id, order.id);
        Ok(premium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::premium::Order;
    use chrono::NaiveDateTime;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockPremiumRepository {
        premiums: Mutex<Vec<Premium>>,
        orders: Mutex<Vec<Order>>,
    }

    #[async_trait]
    impl PremiumRepositoryTrait for MockPremiumRepository {
        fn get_by_user(&self, user_id: &str) -> Result<Option<Premium>> {
            Ok(self
                .premiums
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.user_id == user_id)
                .cloned())
        }

        async fn activate(&self, user_id: &str, order: NewOrder) -> Result<(Premium, Order)> {
            let premium = Premium {
                id: format!("premium-{user_id}"),
                user_id: user_id.to_string(),
                active: true,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            };
            let order = Order {
                id: format!("order-{}", order.order_id),
                user_id: user_id.to_string(),
                total: order.total,
                payment_id: order.payment_id,
                order_id: order.order_id,
                created_at: NaiveDateTime::default(),
            };
            let mut premiums = self.premiums.lock().unwrap();
            premiums.retain(|p| p.user_id != user_id);
            premiums.push(premium.clone());
            self.orders.lock().unwrap().push(order.clone());
            Ok((premium, order))
        }
    }

    #[derive(Default)]
    struct MockGateway {
        requests: Mutex<Vec<PaymentOrderRequest>>,
    }

    #[async_trait]
    impl PaymentGatewayTrait for MockGateway {
        async fn create_order(&self, request: PaymentOrderRequest) -> Result<PaymentOrder> {
            let order = PaymentOrder {
                id: "order_1".to_string(),
                amount: request.amount,
                currency: request.currency.clone(),
                receipt: Some(request.receipt.clone()),
                status: Some("created".to_string()),
            };
            self.requests.lock().unwrap().push(request);
            Ok(order)
        }

        fn verify_payment_signature(
            &self,
            _order_id: &str,
            _payment_id: &str,
            signature: &str,
        ) -> Result<bool> {
            Ok(signature == "valid")
        }
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: "user-1".into(),
            email: "ann@example.com".into(),
            name: Some("Ann".into()),
            is_two_factor_enabled: false,
            is_oauth: false,
        }
    }

    fn confirmation(signature: &str) -> PaymentConfirmation {
        PaymentConfirmation {
            payment_id: "pay_1".into(),
            order_id: "order_1".into(),
            amount: Some(900),
            signature: signature.into(),
        }
    }

    fn service() -> (PremiumService, Arc<MockPremiumRepository>, Arc<MockGateway>) {
        let repo = Arc::new(MockPremiumRepository::default());
        let gateway = Arc::new(MockGateway::default());
        (
            PremiumService::new(repo.clone(), gateway.clone(), 9),
            repo,
            gateway,
        )
    }

    #[tokio::test]
    async fn order_uses_minor_units_and_user_details() {
        let (service, _, gateway) = service();
        let order = service.create_order(&user()).await.unwrap();
        assert_eq!(order.amount, 900);

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests[0].currency, "INR");
        assert_eq!(requests[0].receipt, "ann@example.com");
        assert_eq!(requests[0].notes.get("user_id").map(String::as_str), Some("user-1"));
    }

    #[tokio::test]
    async fn confirmed_payment_activates_premium_once() {
        let (service, repo, _) = service();
        assert!(service.ensure_premium("user-1").is_err());

        service
            .confirm_payment("user-1", confirmation("valid"))
            .await
            .unwrap();
        assert!(service.ensure_premium("user-1").is_ok());
        assert_eq!(repo.orders.lock().unwrap()[0].total, 900);

        let again = service
            .confirm_payment("user-1", confirmation("valid"))
            .await
            .unwrap_err();
        assert_eq!(again.kind(), ErrorKind::Conflict);
        let order = service.create_order(&user()).await.unwrap_err();
        assert_eq!(order.to_string(), "User is already a premium member");
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_without_activation() {
        let (service, repo, _) = service();
        let err = service
            .confirm_payment("user-1", confirmation("forged"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(repo.premiums.lock().unwrap().is_empty());
        assert!(!service.status("user-1").unwrap().is_premium);
    }

    #[test]
    fn gate_message_names_the_upgrade() {
        let (service, _, _) = service();
        let err = service.ensure_premium("nobody").unwrap_err();
        assert_eq!(err.to_string(), PREMIUM_REQUIRED_MESSAGE);
    }
}
