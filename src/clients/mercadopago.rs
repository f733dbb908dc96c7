use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::MercadoPagoConfig;

#[derive(Debug, Serialize)]
struct PaymentRequest {
    transaction_amount: f64,
    description: String,
    payment_method_id: &'static str,
    payer: Payer,
}

#[derive(Debug, Serialize)]
struct Payer {
    email: String,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    point_of_interaction: Option<PointOfInteraction>,
}

#[derive(Debug, Deserialize)]
struct PointOfInteraction {
    transaction_data: Option<TransactionData>,
}

#[derive(Debug, Deserialize)]
struct TransactionData {
    qr_code: Option<String>,
    qr_code_base64: Option<String>,
}

/// QR payload of a successfully created PIX payment intent.
#[derive(Debug, Clone)]
pub struct PixIntent {
    pub qr_code: String,
    pub qr_code_base64: String,
}

#[derive(Clone)]
pub struct MercadoPagoClient {
    client: Client,
    access_token: String,
    api_base: String,
}

impl MercadoPagoClient {
    /// Returns `None` when no access token is configured, which disables
    /// deposit creation for the whole process lifetime.
    #[must_use]
    pub fn with_shared_client(client: Client, config: &MercadoPagoConfig) -> Option<Self> {
        config.access_token.as_ref().map(|token| Self {
            client,
            access_token: token.clone(),
            api_base: config.api_base.clone(),
        })
    }

    /// Create a PIX payment intent. Exactly one attempt per call; the
    /// idempotency key protects against provider-side duplication, not
    /// against local retries (there are none).
    pub async fn create_pix_payment(
        &self,
        amount: f64,
        description: &str,
        idempotency_key: &str,
    ) -> Result<PixIntent> {
        let url = format!("{}/v1/payments", self.api_base);
        let request = PaymentRequest {
            transaction_amount: amount,
            description: description.to_string(),
            payment_method_id: "pix",
            payer: Payer {
                email: "comprador@example.com".to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("X-Idempotency-Key", idempotency_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Mercado Pago payment creation failed: {} - {}",
                status,
                body
            ));
        }

        let payment: PaymentResponse = response.json().await?;

        // A response without both QR fields is a provider-contract
        // violation; never relay a partial intent to the client.
        let transaction_data = payment
            .point_of_interaction
            .and_then(|poi| poi.transaction_data);

        match transaction_data {
            Some(TransactionData {
                qr_code: Some(qr_code),
                qr_code_base64: Some(qr_code_base64),
            }) => Ok(PixIntent {
                qr_code,
                qr_code_base64,
            }),
            _ => Err(anyhow::anyhow!(
                "Mercado Pago response is missing the PIX QR payload"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MercadoPagoConfig;

    #[test]
    fn test_client_disabled_without_access_token() {
        let config = MercadoPagoConfig::default();
        assert!(MercadoPagoClient::with_shared_client(Client::new(), &config).is_none());
    }

    #[test]
    fn test_client_enabled_with_access_token() {
        let config = MercadoPagoConfig {
            access_token: Some("TEST-token".to_string()),
            ..MercadoPagoConfig::default()
        };
        assert!(MercadoPagoClient::with_shared_client(Client::new(), &config).is_some());
    }

    #[test]
    fn test_payment_request_wire_shape() {
        let request = PaymentRequest {
            transaction_amount: 2500.5,
            description: "Depósito PIX - usuário 42".to_string(),
            payment_method_id: "pix",
            payer: Payer {
                email: "comprador@example.com".to_string(),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["transaction_amount"], 2500.5);
        assert_eq!(json["payment_method_id"], "pix");
        assert_eq!(json["payer"]["email"], "comprador@example.com");
    }

    #[test]
    fn test_response_parsing_tolerates_missing_fields() {
        let payment: PaymentResponse = serde_json::from_str("{}").unwrap();
        assert!(payment.point_of_interaction.is_none());

        let payment: PaymentResponse = serde_json::from_str(
            r#"{"point_of_interaction": {"transaction_data": {"qr_code": "abc"}}}"#,
        )
        .unwrap();
        let data = payment
            .point_of_interaction
            .unwrap()
            .transaction_data
            .unwrap();
        assert_eq!(data.qr_code.as_deref(), Some("abc"));
        assert!(data.qr_code_base64.is_none());
    }
}
