//! LiqPay Checkout integration
//!
//! Builds signed Checkout requests, either as an auto-submitting redirect
//! form or as a direct server-to-server call, and verifies the callbacks the
//! gateway posts back.
//!
//! ```no_run
//! use liqpay_checkout::{LiqPay, LiqPayConfig};
//!
//! # async fn run() -> Result<(), liqpay_checkout::LiqPayError> {
//! let liqpay = LiqPay::new(LiqPayConfig::new("public_key", "private_key"))?;
//!
//! let response = liqpay
//!     .checkout_request()
//!     .order_id(123)
//!     .amount(123.45)
//!     .description("Order #123")
//!     .send()
//!     .await?;
//! println!("{}", response.status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod redirect;
pub mod request;
pub mod response;
pub mod signature;

pub use client::{CheckoutHandler, LiqPay};
pub use config::{CheckoutDefaults, LiqPayConfig};
pub use constants::{Action, Currency, Language, PayType};
pub use error::{FieldError, LiqPayError, ValidationErrors};
pub use redirect::RedirectForm;
pub use request::PaymentRequest;
pub use response::{PaymentResponse, PaymentStatus};
