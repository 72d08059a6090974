/*
 * Lending market integrations
 */

pub mod zklend;

pub use zklend::ZkLendClient;
