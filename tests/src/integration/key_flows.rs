//! # Key Generation Flows
//!
//! End-to-end paths through host selection, encoding and the orchestrator
//! over in-memory stores.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use bitten_key_generation::{
        encode_vless_key, EncodeError, ErrorKind, Host, InMemoryHostStore, KeyGenConfig,
        KeyGenError, KeyGenerationApi, KeyRequest, RequestContext, Tier, FREE_TIER_CLIENT_ID,
    };
    use uuid::Uuid;

    use crate::integration::fixtures::{host, reality_host, World};

    const CLIENT: &str = "00000000-0000-0000-0000-000000000001";

    fn scenario_host() -> Host {
        Host {
            id: 1,
            address: "1.2.3.4".to_string(),
            port: "443".to_string(),
            protocol: "vless".to_string(),
            network: Some(String::new()),
            security_type: Some("none".to_string()),
            sni: Some(String::new()),
            fingerprint: Some(String::new()),
            flow: Some(String::new()),
            is_free_tier: true,
            ..Default::default()
        }
    }

    fn params(key: &str) -> HashMap<String, String> {
        let parsed = url::Url::parse(key).unwrap();
        parsed.query_pairs().into_owned().collect()
    }

    // =========================================================================
    // ENCODING
    // =========================================================================

    #[test]
    fn test_plain_host_key() {
        let key = encode_vless_key(CLIENT, &scenario_host(), "").unwrap();
        assert_eq!(key, format!("vless://{}@1.2.3.4:443?type=tcp", CLIENT));
    }

    #[test]
    fn test_reality_host_key() {
        let reality = Host {
            security_type: Some("reality".to_string()),
            public_key: Some("PBK123".to_string()),
            short_id: Some("SID1".to_string()),
            ..scenario_host()
        };

        let key = encode_vless_key(CLIENT, &reality, "Test").unwrap();
        assert_eq!(
            key,
            format!(
                "vless://{}@1.2.3.4:443?pbk=PBK123&security=reality&sid=SID1&type=tcp#Test",
                CLIENT
            )
        );
    }

    #[test]
    fn test_reality_host_without_public_key_yields_nothing() {
        let broken = Host {
            security_type: Some("reality".to_string()),
            public_key: Some(String::new()),
            ..scenario_host()
        };

        assert_eq!(
            encode_vless_key(CLIENT, &broken, "x"),
            Err(EncodeError::MissingRealityPublicKey { host_id: 1 })
        );
    }

    // =========================================================================
    // FREE PATH
    // =========================================================================

    #[tokio::test]
    async fn test_free_key_full_reality_params() {
        let world = World::new([reality_host(7, true, "NL", "PUBKEY")]);
        let service = world.service();

        let key = service
            .generate_free_key(&RequestContext::background(), &KeyRequest::new())
            .await
            .unwrap();

        assert!(key
            .vless_key
            .starts_with(&format!("vless://{}@192.0.2.7:443?", FREE_TIER_CLIENT_ID)));
        assert!(key.vless_key.ends_with("#BittenVPN-Free"));

        let params = params(&key.vless_key);
        assert_eq!(params["security"], "reality");
        assert_eq!(params["pbk"], "PUBKEY");
        assert_eq!(params["sid"], "ab12");
        assert_eq!(params["sni"], "www.example.com");
        assert_eq!(params["fp"], "chrome");
        assert_eq!(params["flow"], "xtls-rprx-vision");
        assert_eq!(params["type"], "tcp");
    }

    #[tokio::test]
    async fn test_country_fallback_serves_other_country() {
        let world = World::new([host(1, true, "DE"), host(2, false, "US")]);
        let service = world.service();

        let key = service
            .generate_free_key(
                &RequestContext::background(),
                &KeyRequest::new().with_country("US"),
            )
            .await
            .unwrap();

        assert!(key.vless_key.contains("@192.0.2.1:443"));
    }

    #[tokio::test]
    async fn test_country_match_is_preferred() {
        let world = World::new([host(1, true, "DE"), host(2, true, "US")]);
        let service = world.service();

        for _ in 0..20 {
            let key = service
                .generate_free_key(
                    &RequestContext::background(),
                    &KeyRequest::new().with_country("us"),
                )
                .await
                .unwrap();
            assert!(key.vless_key.contains("@192.0.2.2:443"));
        }
    }

    #[tokio::test]
    async fn test_reality_host_missing_key_fails_request() {
        let world = World::new([reality_host(3, true, "US", "")]);
        let service = world.service();

        let err = service
            .generate_free_key(&RequestContext::background(), &KeyRequest::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            KeyGenError::Validation(EncodeError::MissingRealityPublicKey { host_id: 3 })
        ));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.public_message(), "Failed to generate VLESS key.");
    }

    // =========================================================================
    // USER PATH
    // =========================================================================

    #[tokio::test]
    async fn test_no_paid_host_online_is_unavailable() {
        let world = World::new([host(1, true, "US"), host(2, false, "US")]);
        world.subscribe();
        world.hosts.set_online(2, false);
        let service = world.service();

        let err = service
            .generate_key_for_user(&RequestContext::background(), world.user_id, &KeyRequest::new())
            .await
            .unwrap_err();

        match &err {
            KeyGenError::NoHostAvailable { query } => {
                assert_eq!(query.tier, Tier::Paid);
                assert_eq!(query.country, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert!(err.public_message().contains("No active hosts"));
    }

    #[tokio::test]
    async fn test_subscription_outage_serves_free_tier() {
        let world = World::new([host(1, true, "US"), host(2, false, "US")]);
        world.subscribe();
        world.subscriptions.set_unavailable(true);
        let service = world.service();

        let key = service
            .generate_key_for_user(&RequestContext::background(), world.user_id, &KeyRequest::new())
            .await
            .unwrap();

        assert!(!key.has_active_subscription);
        assert_eq!(
            key.vless_key,
            format!("vless://{}@192.0.2.1:443?type=tcp#BittenVPN", world.user_id)
        );
    }

    #[tokio::test]
    async fn test_subscriber_gets_paid_host_and_own_client_id() {
        let world = World::new([host(1, true, "US"), host(2, false, "US")]);
        world.subscribe();
        let service = world.service();

        let key = service
            .generate_key_for_user(
                &RequestContext::background(),
                world.user_id,
                &KeyRequest::new().with_remarks("My Phone"),
            )
            .await
            .unwrap();

        assert!(key.has_active_subscription);
        assert_eq!(key.user_id, world.user_id);
        assert_eq!(key.remarks, "My Phone");
        assert_eq!(
            key.vless_key,
            format!(
                "vless://{}@192.0.2.2:443?type=tcp#My%20Phone",
                world.user_id
            )
        );
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let world = World::new([host(1, true, "US")]);
        let service = world.service();
        let stranger = Uuid::new_v4();

        let err = service
            .generate_key_for_user(&RequestContext::background(), stranger, &KeyRequest::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            err.public_message(),
            format!("user with ID {} not found", stranger)
        );
    }

    #[tokio::test]
    async fn test_host_store_outage_is_not_reported_as_no_host() {
        let world = World::new([host(1, true, "US")]);
        world.hosts.set_unavailable(true);
        let service = world.service();

        let err = service
            .generate_key_for_user(
                &RequestContext::background(),
                world.user_id,
                &KeyRequest::new().with_country("US"),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            KeyGenError::HostLookupFailed {
                tier: Tier::Free,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    // =========================================================================
    // CONFIGURATION AND FIXTURE LOADING
    // =========================================================================

    #[tokio::test]
    async fn test_configured_defaults_flow_into_keys() {
        let client_id = Uuid::new_v4();
        let config = KeyGenConfig::from_lookup(|key| match key {
            "BV_FREE_TIER_CLIENT_ID" => Some(client_id.to_string()),
            "BV_FREE_REMARKS" => Some("Guest".to_string()),
            _ => None,
        })
        .unwrap();

        let world = World::new([host(1, true, "US")]);
        let service = world.service_with(config);

        let key = service
            .generate_free_key(&RequestContext::background(), &KeyRequest::new())
            .await
            .unwrap();

        assert_eq!(
            key.vless_key,
            format!("vless://{}@192.0.2.1:443?type=tcp#Guest", client_id)
        );
    }

    #[tokio::test]
    async fn test_hosts_loaded_from_json() {
        let hosts = InMemoryHostStore::from_json(
            r#"[
                {"id": 1, "address": "203.0.113.9", "port": "8443", "protocol": "vless",
                 "network": "ws", "security_type": "tls", "sni": "cdn.example.com",
                 "is_free_tier": true, "is_online": true, "status": "degraded",
                 "country": "FI"},
                {"id": 2, "address": "203.0.113.10", "port": "443", "protocol": "vless",
                 "is_free_tier": true, "is_online": false, "status": "active"}
            ]"#,
        )
        .unwrap();
        assert_eq!(hosts.len(), 2);

        let world = World {
            hosts: Arc::new(hosts),
            ..World::new(Vec::<Host>::new())
        };
        let key = world
            .service()
            .generate_free_key(&RequestContext::background(), &KeyRequest::new())
            .await
            .unwrap();

        assert_eq!(
            key.vless_key,
            format!(
                "vless://{}@203.0.113.9:8443?security=tls&sni=cdn.example.com&type=ws#BittenVPN-Free",
                FREE_TIER_CLIENT_ID
            )
        );
    }

    #[test]
    fn test_user_key_json_shape() {
        let key = bitten_key_generation::UserKey {
            vless_key: "vless://x@h:1?type=tcp".to_string(),
            user_id: Uuid::nil(),
            remarks: "BittenVPN".to_string(),
            has_active_subscription: true,
        };

        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["vless_key"], "vless://x@h:1?type=tcp");
        assert_eq!(json["has_active_subscription"], true);
        assert_eq!(json["user_id"], "00000000-0000-0000-0000-000000000000");
    }
}
