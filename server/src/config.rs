//! Configuration management

use anyhow::{bail, Context, Result};
use liqpay_checkout::LiqPayConfig;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Prefix the LiqPay routes are nested under
    pub liqpay_mount: String,
    pub liqpay: LiqPayConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT")?,

            liqpay_mount: parse_mount(
                &env::var("LIQPAY_MOUNT").unwrap_or_else(|_| "/liqpay".to_string()),
            )
            .context("Invalid LIQPAY_MOUNT")?,

            liqpay: LiqPayConfig::from_env().context("Invalid LIQPAY_* settings")?,
        })
    }
}

/// Route prefix for `Router::nest`: starts with `/` and isn't the root
fn parse_mount(value: &str) -> Result<String> {
    let mount = value.trim().trim_end_matches('/');
    if !value.trim().starts_with('/') {
        bail!("{:?} must start with '/'", value);
    }
    if mount.is_empty() {
        bail!("{:?} can't be the root path", value);
    }
    Ok(mount.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use liqpay_checkout::{handlers, LiqPay};
    use std::sync::Arc;

    #[test]
    fn test_mount_accepts_prefixes() {
        assert_eq!(parse_mount("/liqpay").unwrap(), "/liqpay");
        assert_eq!(parse_mount("/shop/liqpay/").unwrap(), "/shop/liqpay");
    }

    #[test]
    fn test_mount_rejects_relative_and_root() {
        let err = parse_mount("liqpay").unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));

        assert!(parse_mount("/").is_err());
        assert!(parse_mount("").is_err());
    }

    #[test]
    fn test_mount_nests_callback_router() {
        let liqpay = LiqPay::new(LiqPayConfig::new("pub1", "priv1")).unwrap();
        let mount = parse_mount("/shop/liqpay/").unwrap();
        let _app: Router = Router::new().nest(&mount, handlers::router(Arc::new(liqpay)));
    }
}
