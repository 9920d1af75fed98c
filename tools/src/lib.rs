mod http;

pub mod currency;
pub mod weather;

pub use currency::ExchangeRateClient;
pub use weather::OpenMeteoClient;
