// botdeck-core/src/auth/mod.rs

pub mod login;
pub mod validation;

pub use login::{AuthApi, HttpAuthApi, LoginFlow, LoginState, REMEMBER_ME_DAYS};
pub use validation::validate_login_form;
