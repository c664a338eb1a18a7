//! Email template rendering engine.
//!
//! Handlebars runs in non-strict mode: a missing field renders as an empty
//! string, so a partial payload still produces a best-effort message.

use crate::error::{NotificationError, NotificationResult};
use handlebars::Handlebars;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

/// Rendered email body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedEmail {
    /// HTML body content.
    pub html: String,
    /// Plain text body content.
    pub text: String,
}

/// Template engine for the notification emails.
#[derive(Clone)]
pub struct TemplateEngine {
    handlebars: Arc<Handlebars<'static>>,
}

impl TemplateEngine {
    /// Create a new template engine with all templates registered.
    pub fn new() -> NotificationResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        let templates = [
            ("order_placed_html", ORDER_PLACED_HTML_TEMPLATE),
            ("order_placed_text", ORDER_PLACED_TEXT_TEMPLATE),
            ("reset_password_html", RESET_PASSWORD_HTML_TEMPLATE),
            ("reset_password_text", RESET_PASSWORD_TEXT_TEMPLATE),
        ];
        for (name, source) in templates {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| NotificationError::Template(format!("Failed to register {}: {}", name, e)))?;
        }

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    fn render_pair(&self, prefix: &str, context: &Value) -> NotificationResult<RenderedEmail> {
        let html = self.handlebars.render(&format!("{}_html", prefix), context)?;
        let text = self.handlebars.render(&format!("{}_text", prefix), context)?;
        Ok(RenderedEmail { html, text })
    }

    /// Render the order confirmation.
    ///
    /// Uses `data.order` when it is an object, otherwise the whole payload is
    /// taken as the order.
    pub fn render_order_placed(&self, data: &Value) -> NotificationResult<RenderedEmail> {
        let order = match data.get("order") {
            Some(order @ Value::Object(_)) => order,
            _ => data,
        };
        debug!(display_id = ?order.get("display_id"), "Rendering order placed email");

        self.render_pair("order_placed", &json!({ "order": order }))
    }

    /// Render the password reset message around `url`.
    pub fn render_reset_password(&self, url: Option<&str>) -> NotificationResult<RenderedEmail> {
        debug!(has_url = url.is_some(), "Rendering reset password email");

        self.render_pair("reset_password", &json!({ "url": url }))
    }
}

// ============================================================================
// Email Templates
// ============================================================================

const ORDER_PLACED_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Order Confirmation</title>
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background-color: #f4f4f5;">
  <table role="presentation" width="100%" cellspacing="0" cellpadding="0" style="max-width: 600px; margin: 0 auto; padding: 40px 20px;">
    <tr>
      <td style="background-color: #ffffff; border-radius: 8px; padding: 40px;">
        <h1 style="color: #18181b; font-size: 24px; font-weight: 600; margin: 0 0 16px 0;">
          Thank you for your order{{#if order.shipping_address.first_name}}, {{order.shipping_address.first_name}}{{/if}}!
        </h1>
        <p style="color: #52525b; font-size: 16px; line-height: 24px; margin: 0 0 24px 0;">
          We received your order{{#if order.display_id}} <strong>#{{order.display_id}}</strong>{{/if}} and will let you know when it ships.
        </p>
        {{#if order.items}}
        <table width="100%" cellspacing="0" cellpadding="0" style="border-top: 1px solid #e4e4e7; margin-bottom: 24px;">
          {{#each order.items}}
          <tr>
            <td style="padding: 12px 0; color: #18181b; font-size: 14px;">
              {{#if this.product_title}}{{this.product_title}}{{else}}{{this.title}}{{/if}}
              {{#if this.variant_title}}<span style="color: #71717a;">({{this.variant_title}})</span>{{/if}}
            </td>
            <td style="padding: 12px 0; color: #52525b; font-size: 14px; text-align: center;">x {{this.quantity}}</td>
            <td style="padding: 12px 0; color: #18181b; font-size: 14px; text-align: right;">{{this.unit_price}} {{../order.currency_code}}</td>
          </tr>
          {{/each}}
        </table>
        {{/if}}
        <table width="100%" cellspacing="0" cellpadding="0" style="margin-bottom: 24px;">
          {{#if order.shipping_total}}
          <tr>
            <td style="color: #52525b; font-size: 14px;">Shipping</td>
            <td style="color: #52525b; font-size: 14px; text-align: right;">{{order.shipping_total}} {{order.currency_code}}</td>
          </tr>
          {{/if}}
          <tr>
            <td style="color: #18181b; font-size: 16px; font-weight: 600;">Total</td>
            <td style="color: #18181b; font-size: 16px; font-weight: 600; text-align: right;">{{order.total}} {{order.currency_code}}</td>
          </tr>
        </table>
        {{#if order.shipping_address}}
        <table width="100%" cellspacing="0" cellpadding="0">
          <tr>
            <td style="background-color: #f4f4f5; border-radius: 6px; padding: 16px; color: #52525b; font-size: 14px;">
              <strong>Shipping to</strong><br>
              {{order.shipping_address.first_name}} {{order.shipping_address.last_name}}<br>
              {{order.shipping_address.address_1}}<br>
              {{order.shipping_address.postal_code}} {{order.shipping_address.city}} {{order.shipping_address.country_code}}
            </td>
          </tr>
        </table>
        {{/if}}
      </td>
    </tr>
    <tr>
      <td style="padding: 24px 0; text-align: center;">
        <p style="color: #71717a; font-size: 12px; margin: 0;">
          Questions about your order? Reply to this email{{#if order.email}} from {{order.email}}{{/if}}.
        </p>
      </td>
    </tr>
  </table>
</body>
</html>"#;

const ORDER_PLACED_TEXT_TEMPLATE: &str = r#"Thank you for your order{{#if order.shipping_address.first_name}}, {{order.shipping_address.first_name}}{{/if}}!

We received your order{{#if order.display_id}} #{{order.display_id}}{{/if}} and will let you know when it ships.
{{#if order.items}}

ITEMS
=====
{{#each order.items}}
- {{#if this.product_title}}{{this.product_title}}{{else}}{{this.title}}{{/if}}{{#if this.variant_title}} ({{this.variant_title}}){{/if}} x {{this.quantity}} @ {{this.unit_price}} {{../order.currency_code}}
{{/each}}
{{/if}}

{{#if order.shipping_total}}Shipping: {{order.shipping_total}} {{order.currency_code}}
{{/if}}Total: {{order.total}} {{order.currency_code}}
{{#if order.shipping_address}}

Shipping to:
{{order.shipping_address.first_name}} {{order.shipping_address.last_name}}
{{order.shipping_address.address_1}}
{{order.shipping_address.postal_code}} {{order.shipping_address.city}} {{order.shipping_address.country_code}}
{{/if}}"#;

const RESET_PASSWORD_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Reset your password</title>
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background-color: #f4f4f5;">
  <table role="presentation" width="100%" cellspacing="0" cellpadding="0" style="max-width: 600px; margin: 0 auto; padding: 40px 20px;">
    <tr>
      <td style="background-color: #ffffff; border-radius: 8px; padding: 40px;">
        <h1 style="color: #18181b; font-size: 24px; font-weight: 600; margin: 0 0 16px 0; text-align: center;">
          Reset your password
        </h1>
        <p style="color: #52525b; font-size: 16px; line-height: 24px; margin: 0 0 24px 0; text-align: center;">
          We received a request to reset the password for your account. Use the button below to choose a new one.
        </p>
        <table width="100%" cellspacing="0" cellpadding="0">
          <tr>
            <td style="text-align: center;">
              <a href="{{url}}" style="display: inline-block; background-color: #18181b; color: #ffffff; font-size: 16px; font-weight: 500; padding: 12px 32px; text-decoration: none; border-radius: 6px;">
                Reset Password
              </a>
            </td>
          </tr>
        </table>
        <p style="color: #71717a; font-size: 12px; text-align: center; margin: 24px 0 0 0; word-break: break-all;">
          Or paste this link into your browser: {{url}}
        </p>
        <p style="color: #71717a; font-size: 12px; text-align: center; margin: 16px 0 0 0;">
          If you did not request a password reset, you can ignore this email.
        </p>
      </td>
    </tr>
  </table>
</body>
</html>"#;

const RESET_PASSWORD_TEXT_TEMPLATE: &str = r#"Reset your password

We received a request to reset the password for your account.
Open the link below to choose a new one:

{{{url}}}

If you did not request a password reset, you can ignore this email."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_engine_creation() {
        assert!(TemplateEngine::new().is_ok());
    }

    #[test]
    fn test_render_reset_password_embeds_url() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine
            .render_reset_password(Some("https://store.test/reset?token=abc123"))
            .unwrap();

        assert!(rendered.html.contains("https://store.test/reset"));
        assert!(rendered.text.contains("https://store.test/reset?token=abc123"));
    }

    #[test]
    fn test_render_reset_password_without_url() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine.render_reset_password(None).unwrap();
        assert!(rendered.text.contains("Reset your password"));
    }

    #[test]
    fn test_render_order_placed_from_order_object() {
        let engine = TemplateEngine::new().unwrap();
        let data = json!({
            "subject": "Your order",
            "order": {
                "display_id": 1042,
                "email": "jane@buyer.test",
                "currency_code": "eur",
                "total": 59.9,
                "items": [
                    {"product_title": "Linen Shirt", "variant_title": "M", "quantity": 2, "unit_price": 24.95}
                ],
                "shipping_address": {"first_name": "Jane", "city": "Lisbon"}
            }
        });

        let rendered = engine.render_order_placed(&data).unwrap();
        assert!(rendered.html.contains("#1042"));
        assert!(rendered.html.contains("Linen Shirt"));
        assert!(rendered.text.contains("Linen Shirt (M) x 2 @ 24.95 eur"));
        assert!(rendered.text.contains("Jane"));
        assert!(rendered.text.contains("Lisbon"));
    }

    #[test]
    fn test_render_order_placed_from_flat_payload() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine
            .render_order_placed(&json!({"display_id": 7, "total": 10}))
            .unwrap();
        assert!(rendered.text.contains("#7"));
        assert!(rendered.text.contains("Total: 10"));
    }

    #[test]
    fn test_render_order_placed_tolerates_empty_payload() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine.render_order_placed(&json!({"order": {}})).unwrap();
        assert!(rendered.text.starts_with("Thank you for your order!"));

        let rendered = engine.render_order_placed(&Value::Null).unwrap();
        assert!(rendered.html.contains("Thank you for your order"));
    }
}
