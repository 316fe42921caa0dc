pub mod interest;
pub mod metrics;
pub mod profile;
pub mod table;
pub mod test_type;
