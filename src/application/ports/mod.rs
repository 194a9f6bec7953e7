pub mod key_value_store;
pub mod marketplace_gateway;
pub mod wallet_provider;
