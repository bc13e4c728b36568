//! Cloud accounts group discovered resources and reports per provider.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/cloud-accounts` | List all accounts |
//! | POST | `/api/cloud-accounts` | Create an account |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CloudAccountService;
