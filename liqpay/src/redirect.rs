//! Auto-submitting form for the client-redirect flow

use axum::response::{Html, IntoResponse, Response};
use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Values the payer's browser must POST to the checkout page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectForm {
    pub action_url: String,
    pub data: String,
    pub signature: String,
}

impl RedirectForm {
    /// Page that posts the form as soon as it loads
    pub fn to_markup(&self) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    title { "Redirecting to LiqPay" }
                }
                body {
                    form #liqpay-form method="POST" action=(self.action_url) accept-charset="utf-8" {
                        input type="hidden" name="data" value=(self.data);
                        input type="hidden" name="signature" value=(self.signature);
                        noscript {
                            button type="submit" { "Continue to payment" }
                        }
                    }
                    (PreEscaped(r#"<script>window.document.forms[0].submit();</script>"#))
                }
            }
        }
    }

    pub fn to_html(&self) -> String {
        self.to_markup().into_string()
    }
}

impl IntoResponse for RedirectForm {
    fn into_response(self) -> Response {
        Html(self.to_html()).into_response()
    }
}
