pub mod auth;
pub mod route_form;
pub mod route_id;
pub mod session;
