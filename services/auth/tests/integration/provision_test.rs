use coursemart_auth::domain::types::SignInOutcome;
use coursemart_auth::error::AuthServiceError;
use coursemart_auth::password::verify_password;
use coursemart_auth::usecase::provision::{
    CreateUserInput, CreateUserUseCase, SetPasswordInput, SetPasswordUseCase, ShowUserUseCase,
    UpdateUserFlagsInput, UpdateUserFlagsUseCase,
};
use coursemart_auth::usecase::sign_in::SignInUseCase;

use crate::helpers::{
    MockCodeRepo, MockNotifier, MockUserRepo, UnavailableUserRepo, input, user_a,
};

fn create_input(email: &str, password: &str) -> CreateUserInput {
    CreateUserInput {
        email: email.to_owned(),
        password: password.to_owned(),
        name: Some("Ada".to_owned()),
        is_admin: true,
        mfa_enabled: false,
    }
}

#[tokio::test]
async fn should_create_user_with_normalized_email_and_hash() {
    let users = MockUserRepo::empty();
    let uc = CreateUserUseCase {
        users: users.clone(),
    };

    let created = uc
        .execute(create_input("  Ada@Example.COM ", "hunter2"))
        .await
        .unwrap();

    assert_eq!(created.email, "ada@example.com");
    let stored = users.get("ada@example.com").expect("user stored");
    assert_eq!(stored.id, created.id);
    assert!(stored.is_admin);
    assert!(!stored.mfa_enabled);
    assert_eq!(stored.name.as_deref(), Some("Ada"));
    let hash = stored.hashed_password.expect("hash stored");
    assert_ne!(hash, "hunter2");
    assert!(verify_password("hunter2", Some(&hash)));
}

#[tokio::test]
async fn created_user_can_sign_in() {
    let users = MockUserRepo::empty();
    CreateUserUseCase {
        users: users.clone(),
    }
    .execute(create_input("ada@example.com", "hunter2"))
    .await
    .unwrap();

    let uc = SignInUseCase {
        users,
        codes: MockCodeRepo::default(),
        notifier: MockNotifier::default(),
    };
    let outcome = uc
        .execute(input("ada@example.com", "hunter2", None))
        .await
        .unwrap();

    match outcome {
        SignInOutcome::Authenticated(identity) => {
            assert_eq!(identity.email, "ada@example.com");
            assert!(identity.is_admin);
        }
        other => panic!("expected Authenticated, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let uc = CreateUserUseCase {
        users: MockUserRepo::new(vec![user_a()]),
    };

    let result = uc.execute(create_input("A@x.com", "hunter2")).await;

    assert!(
        matches!(result, Err(AuthServiceError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_validate_email_and_password() {
    let uc = CreateUserUseCase {
        users: MockUserRepo::empty(),
    };

    for (email, password) in [("not-an-email", "pw"), ("@x.com", "pw"), ("a@x.com", "")] {
        let result = uc.execute(create_input(email, password)).await;
        assert!(
            matches!(result, Err(AuthServiceError::InvalidInput(_))),
            "email={email:?} password={password:?}: got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_flip_flags() {
    let users = MockUserRepo::new(vec![user_a()]);
    let uc = UpdateUserFlagsUseCase {
        users: users.clone(),
    };
    let before = users.get("a@x.com").unwrap();

    let updated = uc
        .execute(UpdateUserFlagsInput {
            email: "a@x.com".to_owned(),
            is_admin: Some(true),
            mfa_enabled: None,
        })
        .await
        .unwrap();
    assert!(updated.is_admin);
    assert!(!updated.mfa_enabled);
    assert!(updated.updated_at >= before.updated_at);

    let updated = uc
        .execute(UpdateUserFlagsInput {
            email: "a@x.com".to_owned(),
            is_admin: None,
            mfa_enabled: Some(true),
        })
        .await
        .unwrap();
    assert!(updated.is_admin);
    assert!(updated.mfa_enabled);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_user() {
    let uc = UpdateUserFlagsUseCase {
        users: MockUserRepo::empty(),
    };

    let result = uc
        .execute(UpdateUserFlagsInput {
            email: "nobody@x.com".to_owned(),
            is_admin: Some(true),
            mfa_enabled: None,
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::UserNotFound)));

    let show = ShowUserUseCase {
        users: MockUserRepo::empty(),
    };
    assert!(matches!(
        show.execute("nobody@x.com").await,
        Err(AuthServiceError::UserNotFound)
    ));
}

#[tokio::test]
async fn should_rotate_password() {
    let users = MockUserRepo::new(vec![user_a()]);
    SetPasswordUseCase {
        users: users.clone(),
    }
    .execute(SetPasswordInput {
        email: "a@x.com".to_owned(),
        password: "new-password".to_owned(),
    })
    .await
    .unwrap();

    let hash = users.get("a@x.com").unwrap().hashed_password.unwrap();
    assert!(verify_password("new-password", Some(&hash)));
    assert!(!verify_password("secret", Some(&hash)));
}

#[tokio::test]
async fn should_show_user() {
    let uc = ShowUserUseCase {
        users: MockUserRepo::new(vec![user_a()]),
    };

    let user = uc.execute(" A@X.com").await.unwrap();

    assert_eq!(user.email, "a@x.com");
    assert!(user.hashed_password.is_some());
}

#[tokio::test]
async fn should_surface_store_unavailable() {
    let uc = CreateUserUseCase {
        users: UnavailableUserRepo,
    };

    let result = uc.execute(create_input("ada@example.com", "hunter2")).await;

    assert!(matches!(result, Err(AuthServiceError::StoreUnavailable(_))));
}
