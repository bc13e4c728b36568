//! Modules layer - Infrastructure components shared by features
//!
//! Contains the storage backends the HTTP features persist through.

pub mod storage;
