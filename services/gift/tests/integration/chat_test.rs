use giftcode_gift::domain::types::ChatSubscriber;
use giftcode_gift::error::GiftServiceError;
use giftcode_gift::usecase::chat::{
    ListMessagesInput, ListMessagesUseCase, PostMessageInput, PostMessageUseCase, SubscribeInput,
    SubscribeUseCase,
};

use crate::helpers::{
    MockChatRepo, MockCodeRepo, MockMailer, PIN, WRONG_PIN, active_code, owner, test_shop,
};

fn post_input(code_id: giftcode_domain::id::CodeId, author: &str, body: &str) -> PostMessageInput {
    PostMessageInput {
        code_id,
        pin: PIN.to_owned(),
        author: author.to_owned(),
        body: body.to_owned(),
    }
}

#[tokio::test]
async fn should_reject_invalid_authors_and_empty_bodies() {
    let code = active_code(test_shop(owner()).id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);
    let uc = PostMessageUseCase {
        codes: repo.clone(),
        chat: MockChatRepo::default(),
        mailer: MockMailer::default(),
    };

    for (author, body) in [("", "hello"), ("system", "hello"), ("SYSTEM", "hi"), ("me", " ")] {
        let result = uc.execute(post_input(code.id, author, body)).await;
        assert!(
            matches!(result, Err(GiftServiceError::InvalidInput(_))),
            "({author:?}, {body:?}) should be rejected, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_fan_out_to_each_subscriber_in_its_stored_language() {
    let code = active_code(test_shop(owner()).id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);
    let chat = MockChatRepo::default();
    chat.subscribers.lock().unwrap().extend([
        ChatSubscriber {
            code_id: code.id,
            email: "en@example.com".to_owned(),
            lang: "en".to_owned(),
        },
        ChatSubscriber {
            code_id: code.id,
            email: "ja@example.com".to_owned(),
            lang: "ja".to_owned(),
        },
    ]);
    let mailer = MockMailer::default();

    let message = PostMessageUseCase {
        codes: repo.clone(),
        chat: chat.clone(),
        mailer: mailer.clone(),
    }
    .execute(post_input(code.id, "Taro", "It arrived, thank you!"))
    .await
    .unwrap();

    assert_eq!(chat.messages.lock().unwrap().len(), 1);
    assert_eq!(message.author, "Taro");

    let sent = mailer.sent_mails();
    assert_eq!(sent.len(), 2, "one send per subscriber");
    let to_en = sent.iter().find(|m| m.to == ["en@example.com"]).unwrap();
    let to_ja = sent.iter().find(|m| m.to == ["ja@example.com"]).unwrap();
    assert_ne!(to_en.subject, to_ja.subject, "subjects follow language");
    assert!(to_en.text.contains("It arrived"));
}

#[tokio::test]
async fn should_post_the_message_even_when_every_notification_fails() {
    let code = active_code(test_shop(owner()).id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);
    let chat = MockChatRepo::default();
    chat.subscribers.lock().unwrap().push(ChatSubscriber {
        code_id: code.id,
        email: "a@example.com".to_owned(),
        lang: "en".to_owned(),
    });

    let result = PostMessageUseCase {
        codes: repo,
        chat: chat.clone(),
        mailer: MockMailer::failing(),
    }
    .execute(post_input(code.id, "Taro", "hello"))
    .await;

    assert!(result.is_ok(), "mail failure must not fail the post");
    assert_eq!(chat.messages.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_gate_listing_on_the_pin() {
    let code = active_code(test_shop(owner()).id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);
    let uc = ListMessagesUseCase {
        codes: repo.clone(),
        chat: MockChatRepo::default(),
    };

    let result = uc
        .execute(ListMessagesInput {
            code_id: code.id,
            pin: WRONG_PIN.to_owned(),
        })
        .await;
    assert!(matches!(result, Err(GiftServiceError::Unauthorized)));

    let messages = uc
        .execute(ListMessagesInput {
            code_id: code.id,
            pin: PIN.to_owned(),
        })
        .await
        .unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn should_upsert_subscriptions_idempotently() {
    let code = active_code(test_shop(owner()).id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);
    let chat = MockChatRepo::default();
    let uc = SubscribeUseCase {
        codes: repo,
        chat: chat.clone(),
    };

    uc.execute(SubscribeInput {
        code_id: code.id,
        pin: PIN.to_owned(),
        email: "a@example.com".to_owned(),
        lang: "en".to_owned(),
    })
    .await
    .unwrap();

    // Same address again with a new language: no duplicate, preference
    // overwritten.
    uc.execute(SubscribeInput {
        code_id: code.id,
        pin: PIN.to_owned(),
        email: "a@example.com".to_owned(),
        lang: "ja".to_owned(),
    })
    .await
    .unwrap();

    let subscribers = chat.subscribers.lock().unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].lang, "ja");
}

#[tokio::test]
async fn should_reject_a_malformed_subscription_address() {
    let code = active_code(test_shop(owner()).id, None);
    let repo = MockCodeRepo::with_codes(vec![code.clone()]);

    let result = SubscribeUseCase {
        codes: repo,
        chat: MockChatRepo::default(),
    }
    .execute(SubscribeInput {
        code_id: code.id,
        pin: PIN.to_owned(),
        email: "not-an-address".to_owned(),
        lang: "en".to_owned(),
    })
    .await;

    assert!(matches!(result, Err(GiftServiceError::InvalidInput(_))));
}
