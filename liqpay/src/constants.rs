//! Gateway constants: API version, endpoints and the value sets Checkout accepts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Checkout API version sent with every request
pub const API_VERSION: u32 = 3;

/// Server-to-server API endpoint
pub const URL_CHECKOUT_API: &str = "https://www.liqpay.ua/api/request";

/// Client redirect endpoint (form target)
pub const URL_CHECKOUT_CLIENT: &str = "https://www.liqpay.ua/api/3/checkout";

/// Format of `expired_date`, interpreted as UTC
pub const EXPIRED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A string outside of the gateway's value set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown value: {0:?}")]
pub struct UnknownValue(pub String);

macro_rules! gateway_values {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownValue(other.to_string())),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.as_str().to_string()
            }
        }
    };
}

gateway_values! {
    /// Operation type
    Action {
        Pay => "pay",
        /// Block funds on the sender's account
        Hold => "hold",
        Subscribe => "subscribe",
        PayDonate => "paydonate",
        /// Card pre-authorization
        Auth => "auth",
        /// Recurring charge, only ever reported by callbacks
        Regular => "regular",
    }
}

gateway_values! {
    /// Supported currencies (ISO 4217)
    Currency {
        Usd => "USD",
        Eur => "EUR",
        Rub => "RUB",
        Uah => "UAH",
        Byn => "BYN",
        Kzt => "KZT",
    }
}

gateway_values! {
    /// Checkout page language
    Language {
        Ru => "ru",
        En => "en",
        Uk => "uk",
    }
}

gateway_values! {
    /// Payment methods offered on the checkout page.
    /// When none are set the merchant cabinet settings apply.
    PayType {
        Cash => "cash",
        Card => "card",
        /// Invoice sent by e-mail
        Invoice => "invoice",
        Liqpay => "liqpay",
        Masterpass => "masterpass",
        Privat24 => "privat24",
        /// Installments
        MomentPart => "moment_part",
        Qr => "qr",
    }
}
