// SPDX-FileCopyrightText: 2026 Klaxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser push provider for the Klaxon dispatch engine.
//!
//! A push destination names the receiving user; delivery fans out to every
//! subscription stored for that user. Subscriptions the push service reports
//! as gone are removed as a side effect. The overall result is binary: sent
//! when at least one subscription accepts, permanent failure when none do.

pub mod payload;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use klaxon_config::KlaxonConfig;
use klaxon_core::KlaxonError;
use klaxon_core::traits::{
    DestDisplayer, DestValidator, MessageSender, Provider, SubscriptionStore,
};
use klaxon_core::types::{
    DestType, Destination, DisplayInfo, NotificationPayload, PushSubscription, SentMessage,
    TypeInfo,
};

pub const DEST_TYPE_WEBPUSH: &str = "builtin-webpush";

pub const FIELD_USER_ID: &str = "user_id";

/// Builds a push destination addressing a user's registered browsers.
pub fn webpush_dest(user_id: &str) -> Destination {
    Destination::new(DEST_TYPE_WEBPUSH, &[(FIELD_USER_ID, user_id)])
}

/// Delivery parameters passed to the transport for each attempt.
#[derive(Debug, Clone)]
pub struct DeliveryOptions {
    pub ttl: u32,
    pub urgency: &'static str,
    pub subscriber: String,
    pub vapid_public_key: String,
    pub vapid_private_key: String,
}

/// Transport seam for push delivery.
///
/// Implementations deliver the encoded payload to one subscription endpoint
/// and report the HTTP status the push service answered with. Transport
/// failures (connect, timeout, cancellation) are errors; any HTTP answer is
/// an `Ok` status for the sender to interpret.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn deliver(
        &self,
        sub: &PushSubscription,
        body: &[u8],
        opts: &DeliveryOptions,
    ) -> Result<u16, KlaxonError>;
}

/// Reqwest-backed push transport.
pub struct HttpPushTransport {
    http: reqwest::Client,
}

impl HttpPushTransport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpPushTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushTransport for HttpPushTransport {
    async fn deliver(
        &self,
        sub: &PushSubscription,
        body: &[u8],
        opts: &DeliveryOptions,
    ) -> Result<u16, KlaxonError> {
        let resp = self
            .http
            .post(&sub.endpoint)
            .header("TTL", opts.ttl)
            .header("Urgency", opts.urgency)
            .body(body.to_vec())
            .send()
            .await
            .map_err(|err| KlaxonError::provider_with("push delivery failed", err))?;
        Ok(resp.status().as_u16())
    }
}

/// Browser push provider.
pub struct Sender {
    cfg: KlaxonConfig,
    store: Arc<dyn SubscriptionStore>,
    transport: Arc<dyn PushTransport>,
}

impl Sender {
    pub fn new(cfg: &KlaxonConfig, store: Arc<dyn SubscriptionStore>) -> Self {
        Self::with_transport(cfg, store, Arc::new(HttpPushTransport::new()))
    }

    pub fn with_transport(
        cfg: &KlaxonConfig,
        store: Arc<dyn SubscriptionStore>,
        transport: Arc<dyn PushTransport>,
    ) -> Self {
        Self {
            cfg: cfg.clone(),
            store,
            transport,
        }
    }
}

impl Provider for Sender {
    fn dest_type(&self) -> DestType {
        DEST_TYPE_WEBPUSH.into()
    }

    fn type_info(&self) -> TypeInfo {
        TypeInfo {
            dest_type: self.dest_type(),
            name: "Browser Push",
            enabled: self.cfg.webpush.enable,
            supports_alert_notifications: true,
            supports_status_updates: true,
            supports_user_verification: true,
        }
    }
}

impl DestValidator for Sender {
    fn validate_field(&self, field: &str, value: &str) -> Result<(), KlaxonError> {
        if field != FIELD_USER_ID {
            return Err(KlaxonError::FieldValidation {
                field: field.to_string(),
                message: "unexpected field".to_string(),
            });
        }
        if value.is_empty() {
            return Err(KlaxonError::FieldValidation {
                field: field.to_string(),
                message: "user id is required".to_string(),
            });
        }
        if Uuid::parse_str(value).is_err() {
            return Err(KlaxonError::FieldValidation {
                field: field.to_string(),
                message: "user id must be a UUID".to_string(),
            });
        }
        Ok(())
    }
}

impl DestDisplayer for Sender {
    fn display_info(&self, _dest: &Destination) -> DisplayInfo {
        DisplayInfo {
            text: "Browser Push".to_string(),
        }
    }
}

#[async_trait]
impl MessageSender for Sender {
    async fn send(&self, payload: &NotificationPayload) -> Result<SentMessage, KlaxonError> {
        if self.cfg.webpush.vapid_public_key.is_empty()
            || self.cfg.webpush.vapid_private_key.is_empty()
        {
            return Err(KlaxonError::Config(
                "web push VAPID keys not configured".to_string(),
            ));
        }

        let user_id = payload
            .base()
            .dest
            .arg(FIELD_USER_ID)
            .ok_or_else(|| KlaxonError::provider("web push requires a user id"))?
            .to_owned();

        let push = payload::build_payload(&self.cfg, payload)?;
        let body = serde_json::to_vec(&push)
            .map_err(|err| KlaxonError::provider_with("marshal web push payload", err))?;

        let opts = DeliveryOptions {
            ttl: self.cfg.webpush.ttl,
            urgency: "high",
            subscriber: normalize_subscriber_address(&self.cfg),
            vapid_public_key: self.cfg.webpush.vapid_public_key.clone(),
            vapid_private_key: self.cfg.webpush.vapid_private_key.clone(),
        };

        let subs = self.store.find_all(&user_id).await?;
        if subs.is_empty() {
            return Ok(SentMessage::failed_perm(
                "no registered browsers for web push",
            ));
        }

        let mut delivered = 0usize;
        for sub in &subs {
            let suffix = endpoint_suffix(&sub.endpoint);
            match self.transport.deliver(sub, &body, &opts).await {
                Ok(status @ (410 | 404)) => {
                    debug!(endpoint = suffix, status, "push endpoint gone");
                    match self.store.delete(&sub.endpoint).await {
                        Ok(()) => info!(endpoint = suffix, "removed expired subscription"),
                        Err(err) => warn!(
                            endpoint = suffix,
                            error = %err,
                            "failed to delete expired subscription"
                        ),
                    }
                }
                Ok(status) if (200..300).contains(&status) => delivered += 1,
                Ok(status) => {
                    warn!(endpoint = suffix, status, "push delivery rejected");
                }
                Err(err) => {
                    warn!(endpoint = suffix, error = %err, "push delivery failed");
                }
            }
        }

        if delivered == 0 {
            return Ok(SentMessage::failed_perm(
                "web push delivery failed for all subscriptions",
            ));
        }

        Ok(SentMessage::sent())
    }
}

/// Deletes any stored push subscriptions for the given user.
///
/// A blank user id is a no-op.
pub async fn remove_user_subscriptions(
    store: &dyn SubscriptionStore,
    user_id: &str,
) -> Result<(), KlaxonError> {
    if user_id.is_empty() {
        return Ok(());
    }
    store.delete_for_user(user_id).await
}

/// Resolves the subscriber contact address reported to push services.
///
/// Prefers the configured email (display-name forms accepted, lowercased);
/// falls back to `no-reply@` the public URL's host, keeping the localhost
/// placeholder for local development.
fn normalize_subscriber_address(cfg: &KlaxonConfig) -> String {
    let raw = cfg.webpush.subscriber_email.trim();
    if let Some(addr) = parse_email(raw) {
        return addr;
    }
    if !raw.is_empty() {
        warn!(subscriber = raw, "invalid web push subscriber email");
    }

    let host = public_url_host(&cfg.general.public_url);
    match host.as_deref() {
        None | Some("" | "localhost" | "127.0.0.1" | "::1") => "no-reply@localhost".to_string(),
        Some(host) => format!("no-reply@{host}"),
    }
}

/// Extracts a bare lowercase address from `addr` or `Name <addr>` forms.
fn parse_email(raw: &str) -> Option<String> {
    let addr = match (raw.find('<'), raw.rfind('>')) {
        (Some(start), Some(end)) if start < end => &raw[start + 1..end],
        _ => raw,
    };
    let addr = addr.trim();
    let at = addr.find('@')?;
    if at == 0 || at == addr.len() - 1 || addr.contains(char::is_whitespace) {
        return None;
    }
    Some(addr.to_ascii_lowercase())
}

fn public_url_host(public_url: &str) -> Option<String> {
    let rest = public_url.split_once("://").map(|(_, r)| r)?;
    let host_port = rest.split(['/', '?', '#']).next()?;
    let host = host_port.rsplit_once(':').map_or(host_port, |(h, _)| h);
    Some(host.to_string())
}

/// Last characters of an endpoint, for log lines that must not leak the
/// full capability URL.
fn endpoint_suffix(endpoint: &str) -> &str {
    const SUFFIX_LEN: usize = 16;
    let endpoint = endpoint.trim();
    match endpoint.char_indices().nth_back(SUFFIX_LEN - 1) {
        Some((idx, _)) => &endpoint[idx..],
        None => endpoint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_prefers_configured_email() {
        let mut cfg = KlaxonConfig::default();
        cfg.webpush.subscriber_email = "Ops Team <Ops@Klaxon.example>".to_string();
        assert_eq!(normalize_subscriber_address(&cfg), "ops@klaxon.example");
    }

    #[test]
    fn subscriber_falls_back_to_public_host() {
        let mut cfg = KlaxonConfig::default();
        cfg.general.public_url = "https://klaxon.example:8443/app".to_string();
        assert_eq!(normalize_subscriber_address(&cfg), "no-reply@klaxon.example");
    }

    #[test]
    fn subscriber_keeps_placeholder_for_local_hosts() {
        let mut cfg = KlaxonConfig::default();
        cfg.general.public_url = "http://localhost:3030".to_string();
        assert_eq!(normalize_subscriber_address(&cfg), "no-reply@localhost");

        cfg.general.public_url = String::new();
        assert_eq!(normalize_subscriber_address(&cfg), "no-reply@localhost");
    }

    #[test]
    fn invalid_subscriber_email_is_ignored() {
        let mut cfg = KlaxonConfig::default();
        cfg.webpush.subscriber_email = "not an address".to_string();
        assert_eq!(normalize_subscriber_address(&cfg), "no-reply@localhost");
    }

    #[test]
    fn endpoint_suffix_truncates_long_urls() {
        let endpoint = "https://push.example/send/abcdefghijklmnopqrstuvwxyz";
        let suffix = endpoint_suffix(endpoint);
        assert_eq!(suffix.len(), 16);
        assert!(endpoint.ends_with(suffix));
        assert_eq!(endpoint_suffix("short"), "short");
    }

    #[test]
    fn user_id_field_must_be_a_uuid() {
        let sender = Sender::with_transport(
            &KlaxonConfig::default(),
            std::sync::Arc::new(NoopStore),
            std::sync::Arc::new(NoopTransport),
        );
        assert!(sender
            .validate_field(FIELD_USER_ID, "8a4e9ef4-4d1f-4a4e-9b6c-0c5d3e2f1a00")
            .is_ok());
        assert!(sender.validate_field(FIELD_USER_ID, "").is_err());
        assert!(sender.validate_field(FIELD_USER_ID, "bob").is_err());
        assert!(sender.validate_field("endpoint", "x").is_err());
    }

    struct NoopStore;

    #[async_trait]
    impl SubscriptionStore for NoopStore {
        async fn find_all(&self, _user_id: &str) -> Result<Vec<PushSubscription>, KlaxonError> {
            Ok(Vec::new())
        }
        async fn delete(&self, _endpoint: &str) -> Result<(), KlaxonError> {
            Ok(())
        }
        async fn delete_for_user(&self, _user_id: &str) -> Result<(), KlaxonError> {
            Ok(())
        }
    }

    struct NoopTransport;

    #[async_trait]
    impl PushTransport for NoopTransport {
        async fn deliver(
            &self,
            _sub: &PushSubscription,
            _body: &[u8],
            _opts: &DeliveryOptions,
        ) -> Result<u16, KlaxonError> {
            Ok(201)
        }
    }
}
