pub mod currency;
pub mod math;
pub mod weather;
