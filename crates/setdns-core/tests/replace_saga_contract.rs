//! Contract Test: Replace Saga
//!
//! Verifies the two-commit replace and its failure states.
//!
//! Constraints verified:
//! - DELETE is committed before CREATE, one change per commit
//! - A failed DELETE leaves the old record in place and skips CREATE
//! - A failed CREATE after DELETE is reported as an incomplete replace
//! - Invalid input is rejected before the provider is contacted
//! - Replacing with an unchanged value still deletes and recreates

mod common;

use common::*;
use setdns_core::types::{ChangeAction, RecordType};
use setdns_core::{Error, Record, RecordReconciler};

#[tokio::test]
async fn create_on_empty_set_adds_one_record() {
    let client = InMemoryDnsClient::with_default_zone();
    let reconciler = RecordReconciler::new(&client);

    let set = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap();
    assert!(set.is_empty());
    assert!(RecordReconciler::find_record(&set, "foo.nuk9.com.").is_none());

    reconciler
        .create_record(&set, RecordType::A, "foo.nuk9.com.", &["10.0.0.1".to_string()])
        .await
        .unwrap();

    let records = client.records_named("Z123", "foo.nuk9.com.");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].values, vec!["10.0.0.1".to_string()]);
    assert_eq!(records[0].ttl, 600);
}

#[tokio::test]
async fn create_carries_every_value_and_configured_ttl() {
    let client = InMemoryDnsClient::with_default_zone();
    let reconciler = RecordReconciler::new(&client).with_ttl(60);

    let set = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap();
    let values = vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()];
    reconciler
        .create_record(&set, RecordType::A, "foo.nuk9.com.", &values)
        .await
        .unwrap();

    let committed = client.committed();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].len(), 1, "one CREATE change per commit");
    assert_eq!(committed[0][0].record.values, values);
    assert_eq!(committed[0][0].record.ttl, 60);
}

#[tokio::test]
async fn replace_leaves_single_record_with_new_value() {
    let client = InMemoryDnsClient::with_default_zone();
    client.seed_record("Z123", a_record("foo.nuk9.com.", "10.0.0.1"));
    let reconciler = RecordReconciler::new(&client);

    let set = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap();
    let existing = RecordReconciler::find_record(&set, "foo.nuk9.com.");
    assert!(existing.is_some());

    let outcome = reconciler
        .replace_record(&set, existing, RecordType::A, &["10.0.0.9".to_string()])
        .await
        .unwrap();

    assert_eq!(outcome.deleted.action, ChangeAction::Delete);
    assert_eq!(outcome.deleted.record.values, vec!["10.0.0.1".to_string()]);

    assert_eq!(
        client.committed_actions(),
        vec![ChangeAction::Delete, ChangeAction::Create]
    );
    let records = client.records_named("Z123", "foo.nuk9.com.");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].values, vec!["10.0.0.9".to_string()]);
}

#[tokio::test]
async fn replace_can_change_record_type() {
    let client = InMemoryDnsClient::with_default_zone();
    client.seed_record("Z123", a_record("foo.nuk9.com.", "10.0.0.1"));
    let reconciler = RecordReconciler::new(&client);

    let set = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap();
    let existing = RecordReconciler::find_record(&set, "foo.nuk9.com.");

    reconciler
        .replace_record(&set, existing, RecordType::Cname, &["dev2.nuk9.com.".to_string()])
        .await
        .unwrap();

    let records = client.records_named("Z123", "foo.nuk9.com.");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, RecordType::Cname);
}

#[tokio::test]
async fn delete_without_record_is_rejected_before_commit() {
    let client = InMemoryDnsClient::with_default_zone();
    let reconciler = RecordReconciler::new(&client);

    let set = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap();

    let err = reconciler.delete_record(&set, None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(client.commit_attempts(), 0);
}

#[tokio::test]
async fn delete_of_foreign_record_is_rejected_before_commit() {
    let client = InMemoryDnsClient::with_default_zone();
    client.seed_record("Z123", a_record("foo.nuk9.com.", "10.0.0.1"));
    let reconciler = RecordReconciler::new(&client);

    let set = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap();
    let stranger = Record::new("foo.nuk9.com.", RecordType::A, vec!["10.9.9.9".into()]);

    let err = reconciler
        .replace_record(&set, Some(&stranger), RecordType::A, &["10.0.0.9".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(client.commit_attempts(), 0);
    assert_eq!(client.records_named("Z123", "foo.nuk9.com.").len(), 1);
}

#[tokio::test]
async fn failed_delete_keeps_old_record_and_skips_create() {
    let client = InMemoryDnsClient::with_default_zone();
    client.seed_record("Z123", a_record("foo.nuk9.com.", "10.0.0.1"));
    client.reject_commit_attempt(1);
    let reconciler = RecordReconciler::new(&client);

    let set = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap();
    let existing = RecordReconciler::find_record(&set, "foo.nuk9.com.");

    let err = reconciler
        .replace_record(&set, existing, RecordType::A, &["10.0.0.9".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Commit { .. }));
    assert!(!err.is_partial_replace());
    assert_eq!(client.commit_attempts(), 1, "create must not be attempted");

    let records = client.records_named("Z123", "foo.nuk9.com.");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].values, vec!["10.0.0.1".to_string()]);
}

#[tokio::test]
async fn failed_create_after_delete_is_incomplete_replace() {
    let client = InMemoryDnsClient::with_default_zone();
    client.seed_record("Z123", a_record("foo.nuk9.com.", "10.0.0.1"));
    client.reject_commit_attempt(2);
    let reconciler = RecordReconciler::new(&client);

    let set = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap();
    let existing = RecordReconciler::find_record(&set, "foo.nuk9.com.");

    let err = reconciler
        .replace_record(&set, existing, RecordType::A, &["10.0.0.9".to_string()])
        .await
        .unwrap_err();

    match &err {
        Error::ReplaceIncomplete {
            name,
            deleted,
            source,
        } => {
            assert_eq!(name, "foo.nuk9.com.");
            assert_eq!(deleted.record.values, vec!["10.0.0.1".to_string()]);
            assert!(matches!(**source, Error::Commit { .. }));
        }
        other => panic!("expected incomplete replace, got {:?}", other),
    }

    assert_eq!(client.commit_attempts(), 2);
    assert!(client.records_named("Z123", "foo.nuk9.com.").is_empty());
}

#[tokio::test]
async fn fetch_with_empty_arguments_never_calls_provider() {
    let client = InMemoryDnsClient::with_default_zone();
    let reconciler = RecordReconciler::new(&client);

    let err = reconciler.fetch_record_set("", "foo.nuk9.com.").await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = reconciler.fetch_record_set("Z123", "").await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    assert_eq!(client.list_records_calls(), 0);
}

#[tokio::test]
async fn fetch_failure_is_provider_request_error() {
    let client = InMemoryDnsClient::with_default_zone();
    client.fail_record_listing();
    let reconciler = RecordReconciler::new(&client);

    let err = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProviderRequest { .. }));
}

#[tokio::test]
async fn create_with_empty_values_is_rejected() {
    let client = InMemoryDnsClient::with_default_zone();
    let reconciler = RecordReconciler::new(&client);

    let set = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap();

    let err = reconciler
        .create_record(&set, RecordType::A, "foo.nuk9.com.", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(client.commit_attempts(), 0);
}

#[tokio::test]
async fn replacing_with_same_value_twice_runs_two_full_cycles() {
    let client = InMemoryDnsClient::with_default_zone();
    client.seed_record("Z123", a_record("foo.nuk9.com.", "10.0.0.1"));
    let reconciler = RecordReconciler::new(&client);
    let values = vec!["10.0.0.1".to_string()];

    for _ in 0..2 {
        let set = reconciler
            .fetch_record_set("Z123", "foo.nuk9.com.")
            .await
            .unwrap();
        let existing = RecordReconciler::find_record(&set, "foo.nuk9.com.");
        reconciler
            .replace_record(&set, existing, RecordType::A, &values)
            .await
            .unwrap();
    }

    assert_eq!(
        client.committed_actions(),
        vec![
            ChangeAction::Delete,
            ChangeAction::Create,
            ChangeAction::Delete,
            ChangeAction::Create,
        ]
    );
    let records = client.records_named("Z123", "foo.nuk9.com.");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].values, values);
}

#[tokio::test]
async fn select_prefers_requested_type_and_falls_back_to_name() {
    let client = InMemoryDnsClient::with_default_zone();
    client.seed_record("Z123", a_record("foo.nuk9.com.", "10.0.0.1"));
    client.seed_record(
        "Z123",
        Record::new("foo.nuk9.com.", RecordType::Txt, vec!["\"v=1\"".to_string()]),
    );
    let reconciler = RecordReconciler::new(&client);

    let set = reconciler
        .fetch_record_set("Z123", "foo.nuk9.com.")
        .await
        .unwrap();

    let txt = RecordReconciler::select_record(&set, "foo.nuk9.com.", RecordType::Txt).unwrap();
    assert_eq!(txt.record_type, RecordType::Txt);

    // No AAAA present: the first record of that name is chosen
    let fallback =
        RecordReconciler::select_record(&set, "foo.nuk9.com.", RecordType::Aaaa).unwrap();
    assert_eq!(fallback.record_type, RecordType::A);

    assert!(RecordReconciler::select_record(&set, "bar.nuk9.com.", RecordType::A).is_none());
    assert!(RecordReconciler::select_record(&set, "", RecordType::A).is_none());
}
