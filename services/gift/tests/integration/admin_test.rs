use chrono::{Duration, Utc};

use giftcode_domain::code::CodeStatus;
use giftcode_domain::pagination::PageRequest;
use giftcode_gift::error::GiftServiceError;
use giftcode_gift::usecase::admin::{
    BanCodeUseCase, GenerateCodesInput, GenerateCodesUseCase, ListCodesByStatusUseCase,
    PurgeBannedUseCase, SearchCodesUseCase,
};

use crate::helpers::{MockCodeRepo, unassigned_code};

#[tokio::test]
async fn should_generate_unassigned_codes_with_numeric_pins() {
    let repo = MockCodeRepo::default();
    let batch = GenerateCodesUseCase {
        codes: repo.clone(),
    }
    .execute(GenerateCodesInput { count: 25 })
    .await
    .unwrap();

    assert_eq!(batch.len(), 25);
    assert_eq!(repo.codes.lock().unwrap().len(), 25);
    for code in &batch {
        assert_eq!(code.status, CodeStatus::Unassigned);
        assert_eq!(code.pin.len(), 6);
        assert!(code.pin.chars().all(|c| c.is_ascii_digit()));
        assert!(code.password_hash.is_none());
    }
}

#[tokio::test]
async fn should_reject_out_of_range_batch_sizes() {
    let uc = GenerateCodesUseCase {
        codes: MockCodeRepo::default(),
    };
    for count in [0, 1001] {
        let result = uc.execute(GenerateCodesInput { count }).await;
        assert!(
            matches!(result, Err(GiftServiceError::InvalidInput(_))),
            "count {count} should be rejected"
        );
    }
}

#[tokio::test]
async fn should_report_not_found_when_banning_an_unknown_code() {
    let result = BanCodeUseCase {
        codes: MockCodeRepo::default(),
    }
    .execute(giftcode_domain::id::CodeId::generate())
    .await;
    assert!(matches!(result, Err(GiftServiceError::NotFound)));
}

#[tokio::test]
async fn should_refuse_to_ban_a_terminal_code() {
    let mut code = unassigned_code();
    code.status = CodeStatus::Completed;
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);

    let result = BanCodeUseCase {
        codes: repo.clone(),
    }
    .execute(code.id)
    .await;
    assert!(matches!(result, Err(GiftServiceError::StateConflict)));
    assert_eq!(repo.get(code.id).status, CodeStatus::Completed);
}

#[tokio::test]
async fn should_purge_only_banned_codes() {
    let mut banned_a = unassigned_code();
    banned_a.status = CodeStatus::Banned;
    let mut banned_b = unassigned_code();
    banned_b.status = CodeStatus::Banned;
    let kept = unassigned_code();
    let repo = MockCodeRepo::with_codes(vec![banned_a, banned_b, kept.clone()]);

    let purged = PurgeBannedUseCase {
        codes: repo.clone(),
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(purged, 2);
    let codes = repo.codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert!(codes.contains_key(&kept.id.0));
}

#[tokio::test]
async fn should_list_by_status_most_recently_updated_first() {
    let now = Utc::now();
    let mut older = unassigned_code();
    older.updated_at = now - Duration::minutes(10);
    let mut newer = unassigned_code();
    newer.updated_at = now;
    let mut other_status = unassigned_code();
    other_status.status = CodeStatus::Active;
    let repo = MockCodeRepo::with_codes(vec![older.clone(), newer.clone(), other_status]);

    let listed = ListCodesByStatusUseCase {
        codes: repo.clone(),
    }
    .execute(CodeStatus::Unassigned, PageRequest::default())
    .await
    .unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);
}

#[tokio::test]
async fn should_find_codes_by_pin_substring() {
    let mut code = unassigned_code();
    code.pin = "987654".to_owned();
    let repo = MockCodeRepo::with_codes(vec![code.clone(), unassigned_code()]);
    let uc = SearchCodesUseCase {
        codes: repo.clone(),
    };

    let hits = uc.execute("8765").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, code.id);

    let result = uc.execute("   ").await;
    assert!(matches!(result, Err(GiftServiceError::InvalidInput(_))));
}
