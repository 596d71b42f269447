pub mod extractor_auth;
pub mod signup_login;
