use crate::config::Config;
use crate::payment::error::PaymentError;
use crate::payment::models::{
    CreateTransactionRequest, GatewayTransaction, PaymentDetail, SimulatePaymentRequest,
    TransactionDetailResponse,
};

/// Payment gateway client
///
/// Wraps the gateway's REST API: create a transaction, fetch its detail,
/// simulate a payment (non-production only) and build the hosted-payment
/// redirect URL. All calls are keyed by our order identifier.
#[derive(Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    base_url: String,
    slug: String,
    api_key: String,
    production: bool,
}

impl PaymentClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.payment_base_url.trim_end_matches('/').to_string(),
            slug: config.payment_slug.clone(),
            api_key: config.payment_api_key.clone(),
            production: config.production,
        }
    }

    /// Create an external payment record for an order
    ///
    /// The gateway keys the payment by our order id, so re-creating for the
    /// same order points at the same external payment on retry.
    pub async fn create_transaction(
        &self,
        order_id: &str,
        amount: i64,
        payment_method: &str,
    ) -> Result<PaymentDetail, PaymentError> {
        let url = format!("{}/api/transactioncreate", self.base_url);
        tracing::debug!(
            "Creating gateway transaction: order_id={}, amount={}, method={}",
            order_id,
            amount,
            payment_method
        );

        let response = self
            .http
            .post(&url)
            .json(&CreateTransactionRequest {
                project: &self.slug,
                order_id,
                amount,
                payment_method,
                api_key: &self.api_key,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway { status, body });
        }

        let detail: PaymentDetail = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        Ok(detail)
    }

    /// Fetch the gateway's view of a transaction
    pub async fn transaction_detail(
        &self,
        order_id: &str,
        amount: i64,
    ) -> Result<GatewayTransaction, PaymentError> {
        let url = format!(
            "{}/api/transactiondetail?project={}&amount={}&order_id={}&api_key={}",
            self.base_url, self.slug, amount, order_id, self.api_key
        );

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway { status, body });
        }

        let body: TransactionDetailResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        Ok(body.transaction)
    }

    /// Mark a payment as settled on the gateway's sandbox
    ///
    /// No-op in production mode.
    pub async fn simulate_payment(&self, order_id: &str, amount: i64) -> Result<(), PaymentError> {
        if self.production {
            tracing::warn!("Payment simulation requested in production mode; ignoring");
            return Ok(());
        }

        let url = format!("{}/api/paymentsimulation", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&SimulatePaymentRequest {
                project: &self.slug,
                order_id,
                amount,
                api_key: &self.api_key,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway { status, body });
        }

        Ok(())
    }

    /// Hosted-payment page URL for an order
    pub fn payment_url(&self, order_id: &str, amount: i64, redirect: &str) -> String {
        format!(
            "{}/pay/{}/{}?order_id={}&redirect={}",
            self.base_url,
            self.slug,
            amount,
            urlencode(order_id),
            urlencode(redirect)
        )
    }
}

/// Minimal percent-encoding for query string values
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> PaymentClient {
        PaymentClient {
            http: reqwest::Client::new(),
            base_url: "https://gateway.example.com".to_string(),
            slug: "my-shop".to_string(),
            api_key: "key".to_string(),
            production: false,
        }
    }

    #[test]
    fn test_payment_url_shape() {
        let client = test_client();
        let url = client.payment_url("ORDER_123", 150_000, "https://shop.example.com/success");
        assert_eq!(
            url,
            "https://gateway.example.com/pay/my-shop/150000?order_id=ORDER_123&redirect=https%3A%2F%2Fshop.example.com%2Fsuccess"
        );
    }

    #[test]
    fn test_urlencode_passthrough_for_safe_chars() {
        assert_eq!(urlencode("abc-DEF_123.~"), "abc-DEF_123.~");
    }

    #[test]
    fn test_urlencode_escapes_reserved() {
        assert_eq!(urlencode("a b&c"), "a%20b%26c");
    }
}
