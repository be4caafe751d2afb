//! Bank account identifier resolution
//!
//! The stored bank account identifier may be encrypted. The exporter never
//! decodes it itself; it asks a [`BankAccountResolver`] supplied by the caller.

use thiserror::Error;

use crate::models::Payment;

/// Error returned by a [`BankAccountResolver`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// The payment carries no stored identifier to resolve
    #[error("Payment has no bank account identifier")]
    MissingValue,

    /// The backing service failed
    #[error("Bank account resolution failed: {0}")]
    Failed(String),
}

/// Resolves a payment's bank account identifier (IBAN) to cleartext
///
/// Implementations may call remote services. They must be safe to call from
/// several threads when the `parallel` feature is enabled.
pub trait BankAccountResolver: Send + Sync {
    fn resolve(&self, payment: &Payment) -> Result<String, ResolveError>;
}

impl<R: BankAccountResolver + ?Sized> BankAccountResolver for &R {
    fn resolve(&self, payment: &Payment) -> Result<String, ResolveError> {
        (**self).resolve(payment)
    }
}

impl<R: BankAccountResolver + ?Sized> BankAccountResolver for Box<R> {
    fn resolve(&self, payment: &Payment) -> Result<String, ResolveError> {
        (**self).resolve(payment)
    }
}

/// Returns the stored identifier as-is (records already hold cleartext)
///
/// A payment without a stored identifier resolves to an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredIbanResolver;

impl BankAccountResolver for StoredIbanResolver {
    fn resolve(&self, payment: &Payment) -> Result<String, ResolveError> {
        Ok(payment.iban.clone().unwrap_or_default())
    }
}

/// Adapts a closure into a [`BankAccountResolver`]
///
/// # Example
///
/// ```rust
/// use pda_export::export::{BankAccountResolver, FnResolver, ResolveError};
/// use pda_export::models::Payment;
///
/// let resolver = FnResolver(|p: &Payment| -> Result<String, ResolveError> {
///     Ok(p.iban.clone().unwrap_or_default().to_uppercase())
/// });
/// let payment = Payment { iban: Some("it60x0542811101000000123456".into()), ..Default::default() };
/// assert_eq!(resolver.resolve(&payment).unwrap(), "IT60X0542811101000000123456");
/// ```
pub struct FnResolver<F>(pub F);

impl<F> BankAccountResolver for FnResolver<F>
where
    F: Fn(&Payment) -> Result<String, ResolveError> + Send + Sync,
{
    fn resolve(&self, payment: &Payment) -> Result<String, ResolveError> {
        (self.0)(payment)
    }
}
