use async_trait::async_trait;
use crud_framework::mock::MockStore;
use crud_framework::{
    record, CrudService, DeleteResult, PersistencePort, ServiceError, StoreActor, StoreClient, StoreError,
    ValidationPort, ValidatorOptions, Violation,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Record ---

record! {
    pub struct Member {
        id: u64,
        pub handle: String,
        pub email: String,
        pub karma: i64,
    }
}

/// Handles must be non-empty; counts every call.
#[derive(Default)]
struct HandleRules {
    calls: AtomicUsize,
}

#[async_trait]
impl ValidationPort<Member> for HandleRules {
    type Error = std::convert::Infallible;

    async fn validate(
        &self,
        member: &Member,
        options: &ValidatorOptions,
    ) -> Result<Vec<Violation>, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if member.handle.is_empty() {
            let mut violation = Violation::new("handle");
            if options.include_values {
                violation = violation.with_value("");
            }
            return Ok(vec![violation.with_constraint("isNotEmpty", "handle should not be empty")]);
        }
        Ok(vec![])
    }
}

#[derive(Debug, thiserror::Error)]
#[error("rule engine offline")]
struct RuleEngineOffline;

struct OfflineRules;

#[async_trait]
impl ValidationPort<Member> for OfflineRules {
    type Error = RuleEngineOffline;

    async fn validate(&self, _: &Member, _: &ValidatorOptions) -> Result<Vec<Violation>, Self::Error> {
        Err(RuleEngineOffline)
    }
}

fn member(handle: &str, email: &str) -> MemberPartial {
    MemberPartial {
        handle: Some(handle.into()),
        email: Some(email.into()),
        ..Default::default()
    }
}

fn live_service() -> CrudService<Member, StoreClient<Member>, HandleRules> {
    let (actor, store) = StoreActor::<Member>::new(32);
    tokio::spawn(actor.with_unique("member_email", |m: &Member| m.email.clone()).run());
    CrudService::new(store, HandleRules::default(), Arc::new(ValidatorOptions::default()))
}

// --- Mocked store: control flow ---

#[tokio::test]
async fn test_invalid_create_never_reaches_save() {
    let mock = MockStore::<Member>::new();
    let members = CrudService::new(mock.client(), HandleRules::default(), Arc::new(ValidatorOptions::default()));

    let err = members.create(member("", "a@example.com")).await.unwrap_err();

    let violations = err.violations().expect("unprocessable");
    assert_eq!(violations[0].property, "handle");
    assert_eq!(violations[0].value.as_deref(), Some(""));
    assert!(mock.calls().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_patch_of_missing_id_stops_after_lookup() {
    let mock = MockStore::<Member>::new();
    mock.expect_find_by_id(9).return_ok(None);
    let members = CrudService::new(mock.client(), HandleRules::default(), Arc::new(ValidatorOptions::default()));

    let err = members.patch(9, member("x", "x@example.com")).await.unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { entity: "Member", .. }));
    assert_eq!(mock.calls(), vec!["find_by_id"]);
    assert_eq!(members.validator().calls.load(Ordering::SeqCst), 0);
    mock.verify();
}

#[tokio::test]
async fn test_patch_sends_merged_record_to_save() {
    let mock = MockStore::<Member>::new();
    let stored = Member {
        id: Some(4),
        handle: "neo".into(),
        email: "neo@example.com".into(),
        karma: 10,
    };
    mock.expect_find_by_id(4).return_ok(Some(stored));
    mock.expect_save().echo();
    let members = CrudService::new(mock.client(), HandleRules::default(), Arc::new(ValidatorOptions::default()));

    let patched = members
        .patch(
            4,
            MemberPartial {
                karma: Some(11),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.id, Some(4));
    assert_eq!(patched.handle, "neo");
    assert_eq!(patched.email, "neo@example.com");
    assert_eq!(patched.karma, 11);
    assert_eq!(mock.calls(), vec!["find_by_id", "save"]);
    mock.verify();
}

#[tokio::test]
async fn test_delete_does_not_look_up_first() {
    let mock = MockStore::<Member>::new();
    mock.expect_delete(77).return_ok(DeleteResult::affected(0));
    let members = CrudService::new(mock.client(), HandleRules::default(), Arc::new(ValidatorOptions::default()));

    assert_eq!(members.delete(77).await.unwrap().affected, 0);
    assert_eq!(mock.calls(), vec!["delete"]);
    mock.verify();
}

#[tokio::test]
async fn test_backend_failure_is_passed_through() {
    let mock = MockStore::<Member>::new();
    mock.expect_find_all().return_err(StoreError::Closed);
    let members = CrudService::new(mock.client(), HandleRules::default(), Arc::new(ValidatorOptions::default()));

    let err = members.find_all().await.unwrap_err();
    assert_eq!(err.backend_error::<StoreError>(), Some(&StoreError::Closed));
}

#[tokio::test]
async fn test_validator_failure_is_passed_through() {
    let mock = MockStore::<Member>::new();
    let members = CrudService::new(mock.client(), OfflineRules, Arc::new(ValidatorOptions::default()));

    let err = members.create(member("a", "a@example.com")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validator(_)));
    assert_eq!(err.to_string(), "Validator error: rule engine offline");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_options_are_shared_not_copied() {
    let options = Arc::new(ValidatorOptions {
        include_values: false,
        ..Default::default()
    });
    let mock = MockStore::<Member>::new();
    let members = CrudService::new(mock.client(), HandleRules::default(), options.clone());

    let err = members.create(member("", "a@example.com")).await.unwrap_err();
    assert_eq!(err.violations().unwrap()[0].value, None);
    assert_eq!(Arc::strong_count(&options), 2);
}

// --- Live store: end to end ---

#[tokio::test]
async fn test_created_record_is_retrievable() {
    let members = live_service();
    let created = members.create(member("trinity", "t@example.com")).await.unwrap();
    let id = created.id.expect("id assigned");

    assert_eq!(members.find_one_by_id(id).await.unwrap(), created);
    assert_eq!(members.find_all().await.unwrap(), vec![created]);
}

#[tokio::test]
async fn test_constraint_violation_surfaces_native_error() {
    let members = live_service();
    members.create(member("a", "same@example.com")).await.unwrap();

    let err = members.create(member("b", "same@example.com")).await.unwrap_err();
    assert_eq!(
        err.backend_error::<StoreError>(),
        Some(&StoreError::UniqueViolation {
            constraint: "member_email".into(),
            value: "same@example.com".into(),
        })
    );
    assert_eq!(members.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_then_lookup_is_not_found() {
    let members = live_service();
    let id = members.create(member("a", "a@example.com")).await.unwrap().id.unwrap();

    assert_eq!(members.delete(id).await.unwrap().affected, 1);
    assert!(members.find_one_by_id(id).await.unwrap_err().is_not_found());
    assert_eq!(members.delete(id).await.unwrap().affected, 0);
}

/// Two patches that read before either writes: each saves its own merge of the
/// stale record, so the second save drops the first patch's change.
#[tokio::test]
async fn test_concurrent_patches_are_last_writer_wins() {
    let stored = Member {
        id: Some(3),
        handle: "a".into(),
        email: "a@example.com".into(),
        karma: 0,
    };
    let mock = MockStore::<Member>::new();
    mock.expect_find_by_id(3).return_ok(Some(stored.clone()));
    mock.expect_find_by_id(3).return_ok(Some(stored));
    mock.expect_save().echo();
    mock.expect_save().echo();
    let members = CrudService::new(mock.client(), HandleRules::default(), Arc::new(ValidatorOptions::default()));

    let (karma, rename) = tokio::join!(
        members.patch(3, MemberPartial { karma: Some(5), ..Default::default() }),
        members.patch(3, MemberPartial { handle: Some("renamed".into()), ..Default::default() }),
    );

    assert_eq!(mock.calls(), vec!["find_by_id", "find_by_id", "save", "save"]);
    let karma = karma.unwrap();
    let rename = rename.unwrap();
    assert_eq!((karma.handle.as_str(), karma.karma), ("a", 5));
    assert_eq!(rename.handle, "renamed");
    assert_eq!(rename.karma, 0, "second save carries the stale karma");
    mock.verify();
}

#[tokio::test]
async fn test_concurrent_patches_store_one_writers_record() {
    let members = Arc::new(live_service());
    let id = members.create(member("a", "a@example.com")).await.unwrap().id.unwrap();

    let left = {
        let members = members.clone();
        tokio::spawn(async move {
            members
                .patch(id, MemberPartial { karma: Some(1), ..Default::default() })
                .await
        })
    };
    let right = {
        let members = members.clone();
        tokio::spawn(async move {
            members
                .patch(id, MemberPartial { handle: Some("b".into()), ..Default::default() })
                .await
        })
    };
    let left = left.await.unwrap().unwrap();
    let right = right.await.unwrap().unwrap();

    let stored = members.find_one_by_id(id).await.unwrap();
    assert!(stored == left || stored == right, "stored record is one writer's save");
}
