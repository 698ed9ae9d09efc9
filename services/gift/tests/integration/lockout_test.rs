use chrono::{Duration, Utc};

use giftcode_domain::code::CodeStatus;
use giftcode_domain::lockout::{LOCKOUT_THRESHOLD, Lockout};
use giftcode_gift::error::GiftServiceError;
use giftcode_gift::usecase::recipient::{VerifyCodeInput, VerifyCodeUseCase};

use crate::helpers::{
    MockCodeRepo, MockProductRepo, PIN, WRONG_PIN, active_code, owner, test_shop,
};

fn verify_uc(repo: &MockCodeRepo) -> VerifyCodeUseCase<MockCodeRepo, MockCodeRepo, MockProductRepo>
{
    VerifyCodeUseCase {
        codes: repo.clone(),
        orders: repo.clone(),
        products: MockProductRepo::default(),
    }
}

#[tokio::test]
async fn should_count_a_wrong_pin_without_locking_below_threshold() {
    let code = active_code(test_shop(owner()).id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);

    let result = verify_uc(&repo)
        .execute(VerifyCodeInput {
            code_id: code.id,
            pin: WRONG_PIN.to_owned(),
            password: None,
        })
        .await;

    assert!(matches!(result, Err(GiftServiceError::Unauthorized)));
    let lockout = repo.get(code.id).lockout;
    assert_eq!(lockout.failed_attempts, 1);
    assert!(!lockout.is_locked(Utc::now()));
}

#[tokio::test]
async fn should_lock_after_five_failures_and_short_circuit_the_sixth() {
    let code = active_code(test_shop(owner()).id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);
    let uc = verify_uc(&repo);

    for attempt in 1..=LOCKOUT_THRESHOLD {
        let result = uc
            .execute(VerifyCodeInput {
                code_id: code.id,
                pin: WRONG_PIN.to_owned(),
                password: None,
            })
            .await;
        let expected_locked = attempt == LOCKOUT_THRESHOLD;
        assert!(
            matches!(result, Err(GiftServiceError::Unauthorized)),
            "attempt {attempt} should be Unauthorized, got {result:?}"
        );
        assert_eq!(
            repo.get(code.id).lockout.is_locked(Utc::now()),
            expected_locked,
            "lock state wrong after attempt {attempt}"
        );
    }

    // Sixth attempt, even with the correct PIN, is refused before any
    // comparison and must not move the counters.
    let result = uc
        .execute(VerifyCodeInput {
            code_id: code.id,
            pin: PIN.to_owned(),
            password: None,
        })
        .await;
    assert!(matches!(result, Err(GiftServiceError::Locked)));
    assert_eq!(repo.get(code.id).lockout.failed_attempts, LOCKOUT_THRESHOLD);
}

#[tokio::test]
async fn should_accept_the_correct_pin_after_the_window_and_clear_counters() {
    let code = active_code(test_shop(owner()).id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);

    // Lock window already elapsed.
    repo.set_lockout(
        code.id,
        Lockout {
            failed_attempts: LOCKOUT_THRESHOLD,
            locked_until: Some(Utc::now() - Duration::seconds(1)),
        },
    );

    let out = verify_uc(&repo)
        .execute(VerifyCodeInput {
            code_id: code.id,
            pin: PIN.to_owned(),
            password: None,
        })
        .await
        .unwrap();

    assert_eq!(out.status, CodeStatus::Active);
    assert!(out.is_authorized);
    assert_eq!(repo.get(code.id).lockout, Lockout::default());
}
