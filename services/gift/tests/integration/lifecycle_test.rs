use chrono::{Duration, Utc};

use giftcode_domain::code::CodeStatus;
use giftcode_gift::error::GiftServiceError;
use giftcode_gift::usecase::admin::{BanCodeUseCase, GenerateCodesInput, GenerateCodesUseCase};
use giftcode_gift::usecase::code::{
    ActivateCodeInput, ActivateCodeUseCase, ShipCodeInput, ShipCodeUseCase,
};
use giftcode_gift::usecase::recipient::{
    CompleteCodeInput, CompleteCodeUseCase, SubmitShippingInput, SubmitShippingUseCase,
    VerifyCodeInput, VerifyCodeUseCase,
};

use crate::helpers::{
    MockCodeRepo, MockMailer, MockProductRepo, MockShopRepo, active_code, owner, test_product,
    test_shop, unassigned_code,
};

fn shipping_input(code_id: giftcode_domain::id::CodeId, pin: &str) -> SubmitShippingInput {
    SubmitShippingInput {
        code_id,
        pin: pin.to_owned(),
        password: None,
        recipient_name: "Hanako Yamada".to_owned(),
        postal_code: "150-0001".to_owned(),
        address: "1-2-3 Jingumae, Shibuya".to_owned(),
        phone: None,
        email: None,
    }
}

#[tokio::test]
async fn should_walk_a_code_through_the_full_lifecycle() {
    let repo = MockCodeRepo::default();
    let shop = test_shop(owner());
    let product = test_product(shop.id, 30);
    let shops = MockShopRepo::with_shops(vec![shop.clone()]);
    let products = MockProductRepo::with_products(vec![product.clone()]);

    // Admin generates a batch of three; all start unassigned.
    let batch = GenerateCodesUseCase {
        codes: repo.clone(),
    }
    .execute(GenerateCodesInput { count: 3 })
    .await
    .unwrap();
    assert_eq!(batch.len(), 3);
    assert!(batch.iter().all(|c| c.status == CodeStatus::Unassigned));

    let code = &batch[0];
    let mut seen = vec![repo.get(code.id).status];

    // Shop activates straight from unassigned.
    let activated = ActivateCodeUseCase {
        codes: repo.clone(),
        shops: shops.clone(),
        products: products.clone(),
    }
    .execute(ActivateCodeInput {
        subject_id: owner(),
        code_id: code.id,
        shop_id: Some(shop.id),
        product_id: Some(product.id),
    })
    .await
    .unwrap();
    assert_eq!(activated.status, CodeStatus::Active);
    assert_eq!(
        activated.expires_at,
        activated.activated_at.map(|at| at + Duration::days(30))
    );
    seen.push(repo.get(code.id).status);

    // Recipient submits shipping details.
    SubmitShippingUseCase {
        codes: repo.clone(),
        mailer: MockMailer::default(),
    }
    .execute(shipping_input(code.id, &code.pin))
    .await
    .unwrap();
    seen.push(repo.get(code.id).status);
    assert_eq!(repo.order_count(), 1);

    // Shop ships with tracking.
    ShipCodeUseCase {
        codes: repo.clone(),
        orders: repo.clone(),
        shops: shops.clone(),
        mailer: MockMailer::default(),
    }
    .execute(ShipCodeInput {
        subject_id: owner(),
        code_id: code.id,
        carrier: "yamato".to_owned(),
        tracking_number: "T123".to_owned(),
    })
    .await
    .unwrap();
    seen.push(repo.get(code.id).status);

    // Recipient confirms receipt.
    CompleteCodeUseCase {
        codes: repo.clone(),
    }
    .execute(CompleteCodeInput {
        code_id: code.id,
        pin: code.pin.clone(),
    })
    .await
    .unwrap();
    seen.push(repo.get(code.id).status);

    assert_eq!(
        seen,
        vec![
            CodeStatus::Unassigned,
            CodeStatus::Active,
            CodeStatus::Used,
            CodeStatus::Shipped,
            CodeStatus::Completed,
        ]
    );

    let order = repo.orders.lock().unwrap().values().next().cloned().unwrap();
    assert_eq!(order.tracking_number.as_deref(), Some("T123"));
    assert_eq!(order.carrier.as_deref(), Some("yamato"));
}

#[tokio::test]
async fn should_reject_activation_of_a_banned_code_with_state_conflict() {
    let shop = test_shop(owner());
    let product = test_product(shop.id, 30);
    let mut code = unassigned_code();
    code.status = CodeStatus::Linked;
    code.shop_id = Some(shop.id);
    code.product_id = Some(product.id);

    let repo = MockCodeRepo::with_codes(vec![code.clone()]);
    let shops = MockShopRepo::with_shops(vec![shop]);
    let products = MockProductRepo::with_products(vec![product]);

    BanCodeUseCase {
        codes: repo.clone(),
    }
    .execute(code.id)
    .await
    .unwrap();
    assert_eq!(repo.get(code.id).status, CodeStatus::Banned);

    let result = ActivateCodeUseCase {
        codes: repo.clone(),
        shops,
        products,
    }
    .execute(ActivateCodeInput {
        subject_id: owner(),
        code_id: code.id,
        shop_id: None,
        product_id: None,
    })
    .await;

    assert!(
        matches!(result, Err(GiftServiceError::StateConflict)),
        "expected StateConflict, got {result:?}"
    );
}

#[tokio::test]
async fn should_let_exactly_one_of_two_concurrent_submissions_win() {
    let shop = test_shop(owner());
    let code = active_code(shop.id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);

    let uc_a = SubmitShippingUseCase {
        codes: repo.clone(),
        mailer: MockMailer::default(),
    };
    let uc_b = SubmitShippingUseCase {
        codes: repo.clone(),
        mailer: MockMailer::default(),
    };

    let (a, b) = tokio::join!(
        uc_a.execute(shipping_input(code.id, &code.pin)),
        uc_b.execute(shipping_input(code.id, &code.pin)),
    );

    let wins = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one submission must win: {a:?} / {b:?}");
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser, Err(GiftServiceError::StateConflict)));

    assert_eq!(repo.get(code.id).status, CodeStatus::Used);
    assert_eq!(repo.order_count(), 1, "no double order");
}

#[tokio::test]
async fn should_keep_the_order_when_the_confirmation_mail_fails() {
    let shop = test_shop(owner());
    let code = active_code(shop.id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);
    let mailer = MockMailer::failing();

    let mut input = shipping_input(code.id, &code.pin);
    input.email = Some("hanako@example.com".to_owned());

    let out = SubmitShippingUseCase {
        codes: repo.clone(),
        mailer: mailer.clone(),
    }
    .execute(input)
    .await
    .unwrap();

    // The redeem already committed; the dead mailer only downgrades
    // the confirmation flag.
    assert_eq!(out.confirmation_sent, Some(false));
    assert_eq!(repo.get(code.id).status, CodeStatus::Used);
    assert_eq!(repo.order_count(), 1);
    assert!(mailer.sent_mails().is_empty());
}

#[tokio::test]
async fn should_expire_an_overdue_active_code_on_read_and_stay_expired() {
    let shop = test_shop(owner());
    let mut code = active_code(shop.id, None);
    // Activated 25 hours ago with a one-day window.
    code.activated_at = Some(Utc::now() - Duration::hours(25));
    code.expires_at = Some(Utc::now() - Duration::hours(1));

    let repo = MockCodeRepo::with_codes(vec![code.clone()]);
    let uc = VerifyCodeUseCase {
        codes: repo.clone(),
        orders: repo.clone(),
        products: MockProductRepo::default(),
    };

    let first = uc
        .execute(VerifyCodeInput {
            code_id: code.id,
            pin: code.pin.clone(),
            password: None,
        })
        .await
        .unwrap();
    assert_eq!(first.status, CodeStatus::Expired);
    assert_eq!(repo.get(code.id).status, CodeStatus::Expired);

    // Subsequent reads see the stored expired status without re-evaluating.
    let second = uc
        .execute(VerifyCodeInput {
            code_id: code.id,
            pin: code.pin,
            password: None,
        })
        .await
        .unwrap();
    assert_eq!(second.status, CodeStatus::Expired);
}
