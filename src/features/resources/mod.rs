//! Discovered cloud resources.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/resources/{account_id}` | List an account's resources, optionally `?type=EC2` |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ResourceService;
