//! Repository layer for Company Service.
//!
//! Database access for the Handler -> Repository flow. Every query records
//! `company_db_query*` metrics.

pub mod companies;

pub use companies::CompaniesRepository;
