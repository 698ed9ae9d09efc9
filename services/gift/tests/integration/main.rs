
mod admin_test;
mod chat_test;
mod lifecycle_test;
mod lockout_test;
mod password_test;
mod shop_test;
