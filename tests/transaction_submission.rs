//! Transaction submission against a mock chain node.

use std::sync::atomic::Ordering;

use kale_wallet::actions::ContractAction;
use kale_wallet::session::SessionStatus;
use kale_wallet::tx::{FeeSpec, TransactionRequest};
use kale_wallet::{WalletCore, WalletError};

mod common;

use common::{
    account_body, broadcast_body, healthy_chain, start_mock_node, status_body, tx_body,
    ScriptedProvider, ALICE, TX_HASH,
};

fn swap(amount: &str) -> ContractAction {
    ContractAction::Swap {
        token_in: "ukale".into(),
        token_out: "uusdc".into(),
        amount: amount.parse().unwrap(),
    }
}

#[tokio::test]
async fn test_swap_is_signed_broadcast_and_included() {
    let node = start_mock_node(healthy_chain).await;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(common::config_for(&node.url()), provider.as_provider())
        .await
        .unwrap();
    core.connect().await.unwrap();

    let result = core.execute(&swap("100")).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.transaction_hash.as_deref(), Some(TX_HASH));
    assert_eq!(result.height, Some(4822));
    assert_eq!(provider.signs(), 1);

    let requests = node.requests();
    assert!(requests.iter().any(|r| r == &format!("GET /cosmos/auth/v1beta1/accounts/{}", ALICE)));
    assert!(requests.iter().any(|r| r == "POST /"));
    assert!(requests.iter().any(|r| r == &format!("GET /tx?hash=0x{}", TX_HASH)));

    core.shutdown().await;
}

#[tokio::test]
async fn test_submit_without_session_does_no_io() {
    let node = start_mock_node(healthy_chain).await;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(common::config_for(&node.url()), provider.as_provider())
        .await
        .unwrap();
    let before = node.request_count();

    let err = core.execute(&swap("1")).await.unwrap_err();
    assert_eq!(err, WalletError::SessionNotConnected);

    let request = core.adapter().request(vec![]);
    let err = core.broadcaster().submit(request).await.unwrap_err();
    assert_eq!(err, WalletError::SessionNotConnected);

    assert_eq!(node.request_count(), before);
    assert_eq!(provider.signs(), 0);

    core.shutdown().await;
}

#[tokio::test]
async fn test_insufficient_funds_surfaces_verbatim() {
    let node = start_mock_node(|method, path, body| {
        if *method == axum::http::Method::POST {
            return (200, broadcast_body(5, "insufficient funds"));
        }
        healthy_chain(method, path, body)
    })
    .await;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(common::config_for(&node.url()), provider.as_provider())
        .await
        .unwrap();
    core.connect().await.unwrap();

    let err = core.execute(&swap("100")).await.unwrap_err();

    assert_eq!(
        err,
        WalletError::TransactionRejectedByChain {
            code: 5,
            raw_log: "insufficient funds".to_string(),
        }
    );
    assert_eq!(err.to_string(), "Transaction failed with code 5: insufficient funds");
    assert!(!node.requests().iter().any(|r| r.starts_with("GET /tx")));
    assert_eq!(core.session_manager().status(), SessionStatus::Connected);

    core.shutdown().await;
}

#[tokio::test]
async fn test_failure_in_block_is_rejection() {
    let node = start_mock_node(|method, path, body| {
        if path.starts_with("/tx?") {
            return (200, tx_body(11, "out of gas in location: wasm contract"));
        }
        healthy_chain(method, path, body)
    })
    .await;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(common::config_for(&node.url()), provider.as_provider())
        .await
        .unwrap();
    core.connect().await.unwrap();

    let err = core.execute(&swap("1")).await.unwrap_err();
    assert_eq!(
        err,
        WalletError::TransactionRejectedByChain {
            code: 11,
            raw_log: "out of gas in location: wasm contract".to_string(),
        }
    );

    core.shutdown().await;
}

#[tokio::test]
async fn test_network_failure_keeps_session() {
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(common::unreachable_config(), provider.as_provider())
        .await
        .unwrap();
    core.connect().await.unwrap();

    let err = core.execute(&swap("1")).await.unwrap_err();

    assert!(matches!(err, WalletError::NetworkUnavailable(_)), "{:?}", err);
    let session = core.session_manager().snapshot();
    assert_eq!(session.status(), SessionStatus::Connected);
    assert_eq!(session.address(), Some(ALICE));
    assert!(session.last_error().is_none());

    core.shutdown().await;
}

#[tokio::test]
async fn test_broadcast_rpc_error_is_not_network_failure() {
    let node = start_mock_node(|method, path, body| {
        if *method == axum::http::Method::POST {
            return (
                500,
                serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": "1",
                    "error": {
                        "code": -32603,
                        "message": "Internal error",
                        "data": "tx already exists in cache"
                    }
                })
                .to_string(),
            );
        }
        healthy_chain(method, path, body)
    })
    .await;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(common::config_for(&node.url()), provider.as_provider())
        .await
        .unwrap();
    core.connect().await.unwrap();

    let err = core.execute(&swap("1")).await.unwrap_err();

    assert!(!matches!(err, WalletError::NetworkUnavailable(_)), "{:?}", err);
    assert_eq!(
        err,
        WalletError::Unknown("RPC error -32603: Internal error (tx already exists in cache)".to_string())
    );
    assert_eq!(
        node.requests().iter().filter(|r| *r == "POST /").count(),
        1,
        "broadcast must not be retried"
    );
    assert_eq!(core.session_manager().status(), SessionStatus::Connected);

    core.shutdown().await;
}

#[tokio::test]
async fn test_unknown_account() {
    let node = start_mock_node(|method, path, body| {
        if path.starts_with("/cosmos/auth/") {
            return (
                404,
                serde_json::json!({ "code": 5, "message": "account kale1alice not found" }).to_string(),
            );
        }
        healthy_chain(method, path, body)
    })
    .await;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(common::config_for(&node.url()), provider.as_provider())
        .await
        .unwrap();
    core.connect().await.unwrap();

    let err = core.execute(&swap("1")).await.unwrap_err();
    assert_eq!(err, WalletError::AccountNotFound(ALICE.to_string()));
    assert_eq!(provider.signs(), 0);

    core.shutdown().await;
}

#[tokio::test]
async fn test_signature_rejected() {
    let node = start_mock_node(healthy_chain).await;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(common::config_for(&node.url()), provider.as_provider())
        .await
        .unwrap();
    core.connect().await.unwrap();
    provider.reject_sign.store(true, Ordering::SeqCst);

    let err = core.execute(&swap("1")).await.unwrap_err();
    assert_eq!(err, WalletError::UserRejectedSignature);
    assert!(!node.requests().iter().any(|r| r == "POST /"));

    core.shutdown().await;
}

#[tokio::test]
async fn test_inclusion_timeout_reports_hash() {
    let node = start_mock_node(|method, path, body| {
        if path.starts_with("/tx?") {
            return (
                500,
                serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": -1,
                    "error": { "code": -32603, "message": "Internal error", "data": "tx (9F2C6D0E) not found" }
                })
                .to_string(),
            );
        }
        healthy_chain(method, path, body)
    })
    .await;
    let mut config = common::config_for(&node.url());
    config.node.inclusion_timeout_secs = 1;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(config, provider.as_provider()).await.unwrap();
    core.connect().await.unwrap();

    let err = core.execute(&swap("1")).await.unwrap_err();
    assert_eq!(
        err,
        WalletError::ConfirmationTimeout {
            tx_hash: TX_HASH.to_string(),
            secs: 1,
        }
    );

    core.shutdown().await;
}

#[tokio::test]
async fn test_without_inclusion_wait() {
    let node = start_mock_node(healthy_chain).await;
    let mut config = common::config_for(&node.url());
    config.node.await_inclusion = false;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(config, provider.as_provider()).await.unwrap();
    core.connect().await.unwrap();

    let result = core
        .execute(&ContractAction::Follow {
            target_address: "kale1trader".into(),
            stake_amount: 500,
        })
        .await
        .unwrap();

    assert_eq!(result.transaction_hash.as_deref(), Some(TX_HASH));
    assert_eq!(result.height, None);
    assert!(!node.requests().iter().any(|r| r.starts_with("GET /tx")));

    core.shutdown().await;
}

#[tokio::test]
async fn test_invalid_follow_fails_before_io() {
    let node = start_mock_node(healthy_chain).await;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(common::config_for(&node.url()), provider.as_provider())
        .await
        .unwrap();
    core.connect().await.unwrap();
    let before = node.request_count();

    let err = core
        .execute(&ContractAction::Follow {
            target_address: String::new(),
            stake_amount: 100,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, WalletError::InvalidActionInput(_)));
    assert_eq!(node.request_count(), before);
    assert_eq!(provider.signs(), 0);

    core.shutdown().await;
}

#[tokio::test]
async fn test_auto_fee_is_forwarded_to_signer() {
    let node = start_mock_node(|method, path, body| {
        if path.starts_with("/status") {
            return (200, status_body("kale-test-1"));
        }
        if path.starts_with("/cosmos/auth/") {
            return (200, account_body(ALICE));
        }
        healthy_chain(method, path, body)
    })
    .await;
    let provider = ScriptedProvider::new(&[ALICE]);
    let core = WalletCore::start(common::config_for(&node.url()), provider.as_provider())
        .await
        .unwrap();
    core.connect().await.unwrap();

    let msg = core.adapter().build(ALICE, &swap("2")).unwrap();
    let request = TransactionRequest::new(vec![msg], FeeSpec::Auto).with_memo("kale");
    let result = core.broadcaster().submit(request).await.unwrap();

    assert!(result.is_success());
    assert_eq!(provider.signs(), 1);

    core.shutdown().await;
}
