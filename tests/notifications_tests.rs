//! Notification factory: tag dispatch, per-channel validation, sending
//! through the shared logger.

use entity_registry::logger::Logger;
use entity_registry::notifications::{dispatch, Channel, Notification};
use entity_registry::{Attributes, EntityId, Registry, RegistryError};
use maplit::btreemap;
use serde_json::json;

fn attrs(map: std::collections::BTreeMap<&str, serde_json::Value>) -> Attributes {
    map.into_iter().collect()
}

#[test]
fn factory_builds_each_channel() {
    let registry: Registry<Channel> = Registry::new();

    let email = registry
        .create("email", &attrs(btreemap! { "from" => json!("alerts@example.com"), "to" => json!("dev@example.com") }))
        .unwrap();
    let sms = registry
        .create("SMS", &attrs(btreemap! { "number" => json!("+12065551234") }))
        .unwrap();
    let push = registry
        .create("push", &attrs(btreemap! { "token" => json!("device-123"), "app" => json!("AcmeApp") }))
        .unwrap();

    assert_eq!(email.kind(), Channel::Email);
    assert_eq!(sms.kind(), Channel::Sms);
    assert_eq!(push.kind(), Channel::Push);
    assert_eq!(
        push.record(),
        &Notification::Push {
            token: "device-123".into(),
            app: "AcmeApp".into(),
        }
    );
    assert_eq!(registry.count(), 3);
}

#[test]
fn unknown_channel_is_rejected_without_mutation() {
    let registry: Registry<Channel> = Registry::new();
    registry
        .create("sms", &attrs(btreemap! { "number" => json!("+1234567890") }))
        .unwrap();

    let res = registry.create("carrier_pigeon", &Attributes::new());
    assert!(matches!(
        res,
        Err(RegistryError::UnknownKind { tag, .. }) if tag == "carrier_pigeon"
    ));
    assert_eq!(registry.count(), 1);
    assert_eq!(registry.peek_next_id(), EntityId(2));
}

#[test]
fn sms_without_number_is_invalid() {
    let registry: Registry<Channel> = Registry::new();

    let res = registry.create("sms", &Attributes::new());
    assert!(matches!(
        res,
        Err(RegistryError::InvalidAttributes { kind, reason })
        if kind == "sms" && reason.contains("'number'")
    ));
    assert!(registry.is_empty());
}

#[test]
fn send_goes_through_shared_logger() {
    let registry: Registry<Channel> = Registry::new();
    let sms = registry
        .create("sms", &attrs(btreemap! { "number" => json!("+12065551234") }))
        .unwrap();

    let line = sms.send("Notification #1");
    assert!(line.ends_with("SMS #1 -> Number: +12065551234 | Msg: Notification #1"));
    assert!(Logger::instance().lines().contains(&line));

    // Messages land in the logger tail; the registry keeps one entry per
    // configured notification regardless of how often it is sent.
    let again = sms.send("Notification #2");
    assert!(Logger::instance().lines().contains(&again));
    assert_eq!(registry.count(), 1);
}

#[test]
fn dispatch_registers_only_on_success() {
    let registry: Registry<Channel> = Registry::new();

    let (email, line) = dispatch(&registry, "email", &Attributes::new(), "Welcome to our service!").unwrap();
    assert_eq!(email.id(), EntityId(1));
    assert!(line.contains("To: user@example.com | From: noreply@example.com"));

    let failed = dispatch(&registry, "fax", &Attributes::new(), "This won't work");
    assert!(failed.is_err());

    let history: Vec<_> = registry.all().iter().map(|n| n.kind()).collect();
    assert_eq!(history, [Channel::Email]);
}
