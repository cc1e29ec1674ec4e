pub mod orders;
pub mod pricing;
