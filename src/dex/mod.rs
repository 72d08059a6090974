/*
 * DEX integrations
 */

pub mod ekubo;

pub use ekubo::EkuboClient;
