use giftcode_gift::error::GiftServiceError;
use giftcode_gift::usecase::access::hash_password;
use giftcode_gift::usecase::recipient::{
    SubmitShippingInput, SubmitShippingUseCase, VerifyCodeInput, VerifyCodeUseCase,
};

use crate::helpers::{
    MockCodeRepo, MockMailer, MockProductRepo, PIN, active_code, owner, test_product, test_shop,
};

const PASSWORD: &str = "correct horse battery staple";

#[tokio::test]
async fn should_store_the_password_hash_at_first_submission() {
    let shop = test_shop(owner());
    let code = active_code(shop.id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);

    assert!(!repo.get(code.id).is_password_protected());

    SubmitShippingUseCase {
        codes: repo.clone(),
        mailer: MockMailer::default(),
    }
    .execute(SubmitShippingInput {
        code_id: code.id,
        pin: PIN.to_owned(),
        password: Some(PASSWORD.to_owned()),
        recipient_name: "Taro".to_owned(),
        postal_code: "100-0001".to_owned(),
        address: "Chiyoda".to_owned(),
        phone: None,
        email: None,
    })
    .await
    .unwrap();

    assert!(repo.get(code.id).is_password_protected());
}

#[tokio::test]
async fn should_reveal_protection_but_withhold_detail_on_wrong_password() {
    let shop = test_shop(owner());
    let product = test_product(shop.id, 30);
    let mut code = active_code(shop.id, Some(product.id));
    code.password_hash = Some(hash_password(PASSWORD).unwrap());
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);

    let out = VerifyCodeUseCase {
        codes: repo.clone(),
        orders: repo.clone(),
        products: MockProductRepo::with_products(vec![product]),
    }
    .execute(VerifyCodeInput {
        code_id: code.id,
        pin: PIN.to_owned(),
        password: Some("wrong password".to_owned()),
    })
    .await
    .unwrap();

    assert!(out.is_password_protected);
    assert!(!out.is_authorized);
    assert!(out.detail.is_none(), "wrong password must not disclose");
    // A failed password check counts toward the same lockout.
    assert_eq!(repo.get(code.id).lockout.failed_attempts, 1);
}

#[tokio::test]
async fn should_disclose_detail_on_correct_password() {
    let shop = test_shop(owner());
    let product = test_product(shop.id, 30);
    let mut code = active_code(shop.id, Some(product.id));
    code.password_hash = Some(hash_password(PASSWORD).unwrap());
    code.memo_for_users = Some("enjoy".to_owned());
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);

    let out = VerifyCodeUseCase {
        codes: repo.clone(),
        orders: repo.clone(),
        products: MockProductRepo::with_products(vec![product.clone()]),
    }
    .execute(VerifyCodeInput {
        code_id: code.id,
        pin: PIN.to_owned(),
        password: Some(PASSWORD.to_owned()),
    })
    .await
    .unwrap();

    assert!(out.is_password_protected);
    assert!(out.is_authorized);
    let detail = out.detail.expect("authorized caller gets the detail");
    assert_eq!(detail.memo_for_users.as_deref(), Some("enjoy"));
    assert_eq!(detail.product.unwrap().id, product.id);
}

#[tokio::test]
async fn should_withhold_detail_when_protected_and_no_password_given() {
    let shop = test_shop(owner());
    let mut code = active_code(shop.id, None);
    code.password_hash = Some(hash_password(PASSWORD).unwrap());
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);

    let out = VerifyCodeUseCase {
        codes: repo.clone(),
        orders: repo.clone(),
        products: MockProductRepo::default(),
    }
    .execute(VerifyCodeInput {
        code_id: code.id,
        pin: PIN.to_owned(),
        password: None,
    })
    .await
    .unwrap();

    assert!(out.is_password_protected);
    assert!(!out.is_authorized);
    assert!(out.detail.is_none());
}

#[tokio::test]
async fn should_reject_resubmission_with_a_wrong_password() {
    let shop = test_shop(owner());
    let mut code = active_code(shop.id, None);
    code.password_hash = Some(hash_password(PASSWORD).unwrap());
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);

    let result = SubmitShippingUseCase {
        codes: repo.clone(),
        mailer: MockMailer::default(),
    }
    .execute(SubmitShippingInput {
        code_id: code.id,
        pin: PIN.to_owned(),
        password: Some("wrong password".to_owned()),
        recipient_name: "Taro".to_owned(),
        postal_code: "100-0001".to_owned(),
        address: "Chiyoda".to_owned(),
        phone: None,
        email: None,
    })
    .await;

    // Wrong PIN and wrong password surface identically.
    assert!(matches!(result, Err(GiftServiceError::Unauthorized)));
    assert_eq!(repo.order_count(), 0);
}
