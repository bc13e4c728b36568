//! Report lifecycle: creation, background generation, polling and download.
//!
//! Creating a report stores it as `pending` and queues a [`models::ReportJob`].
//! The [`workers::ReportDispatcher`] runs the external generator for each job
//! and reports the outcome back to [`ReportService`], which moves the report to
//! `completed` or `failed`. Credentials ride along on the job only.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/reports` | Create a report and queue generation |
//! | GET | `/api/reports/{id}` | List reports of cloud account `id` |
//! | GET | `/api/reports/{id}/status` | Poll status of report `id` |
//! | GET | `/api/reports/{id}/download` | Download the PDF of a completed report |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::ReportService;
pub use workers::{ReportDispatcher, ReportQueue, SubprocessGenerator};
