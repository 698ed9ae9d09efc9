use uuid::Uuid;

use giftcode_domain::code::CodeStatus;
use giftcode_gift::domain::types::ProductStatus;
use giftcode_gift::error::GiftServiceError;
use giftcode_gift::usecase::code::{
    LinkCodeInput, LinkCodeUseCase, ShipCodeInput, ShipCodeUseCase, UpdateMemosInput,
    UpdateMemosUseCase,
};
use giftcode_gift::usecase::shop::{
    CreateProductInput, CreateProductUseCase, CreateShopInput, CreateShopUseCase,
    DeleteProductUseCase, StopProductUseCase,
};

use crate::helpers::{
    MockCodeRepo, MockMailer, MockProductRepo, MockShopRepo, active_code, owner, test_product,
    test_shop, unassigned_code,
};

fn stranger() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-00000000dead").unwrap()
}

#[tokio::test]
async fn should_create_a_shop_and_a_product_for_its_owner() {
    let shops = MockShopRepo::default();
    let shop = CreateShopUseCase {
        shops: shops.clone(),
    }
    .execute(CreateShopInput {
        owner_subject_id: owner(),
        name: "Gift Corner".to_owned(),
    })
    .await
    .unwrap();

    let products = MockProductRepo::default();
    let product = CreateProductUseCase {
        shops: shops.clone(),
        products: products.clone(),
    }
    .execute(CreateProductInput {
        subject_id: owner(),
        shop_id: shop.id,
        name: "Assorted Cookies".to_owned(),
        valid_days: 90,
    })
    .await
    .unwrap();

    assert_eq!(product.shop_id, shop.id);
    assert_eq!(product.status, ProductStatus::Active);
    assert_eq!(products.products.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_product_creation_by_a_non_owner() {
    let shop = test_shop(owner());
    let shops = MockShopRepo::with_shops(vec![shop.clone()]);

    let result = CreateProductUseCase {
        shops,
        products: MockProductRepo::default(),
    }
    .execute(CreateProductInput {
        subject_id: stranger(),
        shop_id: shop.id,
        name: "Cookies".to_owned(),
        valid_days: 30,
    })
    .await;

    assert!(matches!(result, Err(GiftServiceError::Forbidden)));
}

#[tokio::test]
async fn should_reject_non_positive_valid_days() {
    let shop = test_shop(owner());
    let result = CreateProductUseCase {
        shops: MockShopRepo::with_shops(vec![shop.clone()]),
        products: MockProductRepo::default(),
    }
    .execute(CreateProductInput {
        subject_id: owner(),
        shop_id: shop.id,
        name: "Cookies".to_owned(),
        valid_days: 0,
    })
    .await;
    assert!(matches!(result, Err(GiftServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn should_only_delete_a_stopped_product_with_no_pending_shipment() {
    let shop = test_shop(owner());
    let product = test_product(shop.id, 30);
    let shops = MockShopRepo::with_shops(vec![shop.clone()]);
    let products = MockProductRepo::with_products(vec![product.clone()]);

    // A redeemed-but-unshipped code still references the product.
    let mut used = active_code(shop.id, Some(product.id));
    used.status = CodeStatus::Used;
    let codes = MockCodeRepo::with_codes(vec![used.clone()]);

    let delete_uc = DeleteProductUseCase {
        shops: shops.clone(),
        products: products.clone(),
        codes: codes.clone(),
    };

    // Still active: refused.
    let result = delete_uc.execute(owner(), product.id).await;
    assert!(matches!(result, Err(GiftServiceError::StateConflict)));

    StopProductUseCase {
        shops: shops.clone(),
        products: products.clone(),
    }
    .execute(owner(), product.id)
    .await
    .unwrap();

    // Stopped, but an unshipped redemption remains: refused.
    let result = delete_uc.execute(owner(), product.id).await;
    assert!(matches!(result, Err(GiftServiceError::StateConflict)));

    // Ship the outstanding order, then deletion goes through.
    ShipCodeUseCase {
        codes: codes.clone(),
        orders: codes.clone(),
        shops: shops.clone(),
        mailer: MockMailer::default(),
    }
    .execute(ShipCodeInput {
        subject_id: owner(),
        code_id: used.id,
        carrier: "sagawa".to_owned(),
        tracking_number: "S-1".to_owned(),
    })
    .await
    .unwrap();

    delete_uc.execute(owner(), product.id).await.unwrap();
    assert!(products.products.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_refuse_stopping_an_already_stopped_product() {
    let shop = test_shop(owner());
    let mut product = test_product(shop.id, 30);
    product.status = ProductStatus::Stopped;

    let result = StopProductUseCase {
        shops: MockShopRepo::with_shops(vec![shop]),
        products: MockProductRepo::with_products(vec![product.clone()]),
    }
    .execute(owner(), product.id)
    .await;

    assert!(matches!(result, Err(GiftServiceError::StateConflict)));
}

#[tokio::test]
async fn should_refuse_linking_to_a_stopped_product() {
    let shop = test_shop(owner());
    let mut product = test_product(shop.id, 30);
    product.status = ProductStatus::Stopped;
    let code = unassigned_code();
    let codes = MockCodeRepo::with_codes(vec![code.clone()]);

    let result = LinkCodeUseCase {
        codes: codes.clone(),
        shops: MockShopRepo::with_shops(vec![shop.clone()]),
        products: MockProductRepo::with_products(vec![product.clone()]),
    }
    .execute(LinkCodeInput {
        subject_id: owner(),
        code_id: code.id,
        shop_id: shop.id,
        product_id: product.id,
    })
    .await;

    assert!(matches!(result, Err(GiftServiceError::StateConflict)));
    assert_eq!(codes.get(code.id).status, CodeStatus::Unassigned);
}

#[tokio::test]
async fn should_reject_memo_edits_from_a_non_owner() {
    let shop = test_shop(owner());
    let code = active_code(shop.id, None);
    let codes = MockCodeRepo::with_codes(vec![code.clone()]);

    let result = UpdateMemosUseCase {
        codes: codes.clone(),
        shops: MockShopRepo::with_shops(vec![shop]),
    }
    .execute(UpdateMemosInput {
        subject_id: stranger(),
        code_id: code.id,
        memo_for_users: Some("hi".to_owned()),
        memo_for_shop: None,
    })
    .await;

    assert!(matches!(result, Err(GiftServiceError::Forbidden)));
    assert!(codes.get(code.id).memo_for_users.is_none());
}

#[tokio::test]
async fn should_notify_the_order_email_on_shipment_best_effort() {
    let shop = test_shop(owner());
    let mut code = active_code(shop.id, None);
    code.status = CodeStatus::Used;
    let codes = MockCodeRepo::with_codes(vec![code.clone()]);
    codes.orders.lock().unwrap().insert(
        code.id.0,
        giftcode_gift::domain::types::Order {
            code_id: code.id,
            recipient_name: "Taro".to_owned(),
            postal_code: "100-0001".to_owned(),
            address: "Chiyoda".to_owned(),
            phone: None,
            email: Some("taro@example.com".to_owned()),
            carrier: None,
            tracking_number: None,
            shipped_at: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        },
    );
    let mailer = MockMailer::default();

    ShipCodeUseCase {
        codes: codes.clone(),
        orders: codes.clone(),
        shops: MockShopRepo::with_shops(vec![shop]),
        mailer: mailer.clone(),
    }
    .execute(ShipCodeInput {
        subject_id: owner(),
        code_id: code.id,
        carrier: "yamato".to_owned(),
        tracking_number: "T999".to_owned(),
    })
    .await
    .unwrap();

    let sent = mailer.sent_mails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, ["taro@example.com"]);
    assert!(sent[0].text.contains("T999"));
}
