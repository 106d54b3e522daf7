use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}
