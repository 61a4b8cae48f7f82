pub mod assets;
pub mod audit;
pub mod auth;
pub mod bootstrap;
pub mod password;
pub mod routes;
