//! Overlapping transactions on a file-backed, multi-connection store.

mod common;

use std::time::Duration;

use auth_core::DomainError;
use common::{file_harness, PASSWORD};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_overlapping_renewals_both_succeed() {
    let h = file_harness().await;
    let alice = h.signup("alice").await;
    let bob = h.signup("bob").await;

    // Alice's request keeps its transaction open while Bob's arrives.
    let held = h.service.authenticate(&alice.auth_token).await.unwrap();

    let service = h.service.clone();
    let token = bob.auth_token.clone();
    let other = tokio::spawn(async move {
        let tx = service.authenticate(&token).await?;
        tx.commit().await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    held.commit().await.unwrap();
    other.await.unwrap().unwrap();

    assert!(h.service.resolve_session(&alice.auth_token).await.is_ok());
    assert!(h.service.resolve_session(&bob.auth_token).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_many_parallel_requests_on_one_session() {
    let h = file_harness().await;
    let alice = h.signup("alice").await;

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let service = h.service.clone();
            let token = alice.auth_token.clone();
            tokio::spawn(async move {
                let mut tx = service.authenticate(&token).await?;
                let sessions = tx.list_sessions().await?;
                tx.commit().await?;
                Ok::<_, DomainError>(sessions.len())
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_signout_racing_a_renewal_never_revives_the_session() {
    let h = file_harness().await;
    let alice = h.signup("alice").await;

    let mut signing_out = h.service.authenticate(&alice.auth_token).await.unwrap();
    signing_out.signout().await.unwrap();

    let service = h.service.clone();
    let token = alice.auth_token.clone();
    let renewal = tokio::spawn(async move { service.resolve_session(&token).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    signing_out.commit().await.unwrap();

    let err = renewal.await.unwrap().unwrap_err();
    assert!(matches!(err, DomainError::SessionExpired));
    assert_eq!(h.count("SELECT COUNT(*) FROM sessions").await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_parallel_signins_for_one_user() {
    let h = file_harness().await;
    h.signup("alice").await;

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let service = h.service.clone();
            tokio::spawn(async move {
                service
                    .signin("alice", PASSWORD, &format!("device-{i}"))
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert_eq!(h.count("SELECT COUNT(*) FROM sessions").await, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_signups_for_same_username() {
    let h = file_harness().await;
    h.seed_invite("invite-a", 1, None).await;
    h.seed_invite("invite-b", 1, None).await;

    let spawn_signup = |invite: &'static str| {
        let service = h.service.clone();
        tokio::spawn(async move { service.signup("carol", PASSWORD, invite, invite).await })
    };
    let a = spawn_signup("invite-a");
    let b = spawn_signup("invite-b");
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    let (loser, loser_invite) = match (&a, &b) {
        (Ok(_), Err(e)) => (e, "invite-b"),
        (Err(e), Ok(_)) => (e, "invite-a"),
        other => panic!("expected exactly one winner, got {other:?}"),
    };
    assert!(matches!(loser, DomainError::UsernameTaken));
    assert_eq!(h.invite_remaining(loser_invite).await, Some(1));
    assert_eq!(h.count("SELECT COUNT(*) FROM users").await, 1);
    assert_eq!(h.count("SELECT COUNT(*) FROM sessions").await, 1);

    // The rolled-back invite still works.
    h.service
        .signup("dave", PASSWORD, loser_invite, "curl")
        .await
        .unwrap();
}
