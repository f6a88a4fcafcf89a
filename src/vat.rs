//! VAT arithmetic for journal amounts.

use serde::Serialize;

use crate::AMOUNT_EPSILON;

/// The VAT rates usually offered in entry forms, in percent.
///
/// A convenience list only; [compute] accepts any non-negative rate.
pub const COMMON_RATES: [f64; 4] = [0.0, 6.0, 13.0, 24.0];

/// The tax portion and cash-settled amount derived from a net amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VatBreakdown {
    /// The tax portion, rounded to cents.
    pub vat: f64,
    /// Net plus VAT, rounded to cents.
    pub gross: f64,
}

/// Round a money amount half-up to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derive the VAT and gross amounts from a net amount and a rate in
/// percent.
///
/// Negative inputs are the caller's mistake to reject; this function
/// only does the arithmetic.
pub fn compute(net: f64, rate_percent: f64) -> VatBreakdown {
    let vat = round_cents(net * rate_percent / 100.0);
    let gross = round_cents(net + vat);

    VatBreakdown { vat, gross }
}

/// Whether a manually entered net/VAT/gross triple is self-consistent.
///
/// Returns true iff gross differs from net plus VAT by at most one cent.
/// Triples that fail this check must be rejected with a visible error,
/// never silently corrected.
pub fn validate(net: f64, vat: f64, gross: f64) -> bool {
    (gross - (net + vat)).abs() <= AMOUNT_EPSILON
}

#[cfg(test)]
mod vat_tests {
    use super::{COMMON_RATES, compute, round_cents, validate};

    #[test]
    fn compute_standard_rate() {
        let breakdown = compute(1000.0, 24.0);

        assert_eq!(breakdown.vat, 240.0);
        assert_eq!(breakdown.gross, 1240.0);
    }

    #[test]
    fn compute_rounds_to_cents() {
        // 10.10 * 13% = 1.313, which rounds down to 1.31
        let low = compute(10.10, 13.0);
        assert_eq!(low.vat, 1.31);
        assert_eq!(low.gross, 11.41);

        // 10.90 * 13% = 1.417, which rounds up to 1.42
        let high = compute(10.90, 13.0);
        assert_eq!(high.vat, 1.42);
        assert_eq!(high.gross, 12.32);
    }

    #[test]
    fn compute_zero_rate_keeps_net() {
        let breakdown = compute(123.45, 0.0);

        assert_eq!(breakdown.vat, 0.0);
        assert_eq!(breakdown.gross, 123.45);
    }

    #[test]
    fn compute_accepts_arbitrary_rates() {
        let breakdown = compute(200.0, 17.5);

        assert_eq!(breakdown.vat, 35.0);
        assert_eq!(breakdown.gross, 235.0);
    }

    #[test]
    fn computed_amounts_always_validate() {
        // Sweep a grid of net amounts across every common rate; whatever
        // compute produces must pass the entry gate.
        for rate in COMMON_RATES {
            for tenths in 0..5_000 {
                let net = tenths as f64 / 10.0;
                let breakdown = compute(net, rate);

                assert!(
                    validate(net, breakdown.vat, breakdown.gross),
                    "net {net} at {rate}% produced an inconsistent triple {breakdown:?}"
                );
            }
        }
    }

    #[test]
    fn validate_rejects_beyond_one_cent() {
        assert!(validate(100.0, 24.0, 124.0));
        assert!(validate(100.0, 24.0, 124.01));
        assert!(!validate(100.0, 24.0, 124.02));
        assert!(!validate(100.0, 24.0, 120.0));
    }

    #[test]
    fn round_cents_to_two_decimals() {
        assert_eq!(round_cents(1.006), 1.01);
        assert_eq!(round_cents(1.004), 1.0);
        assert_eq!(round_cents(2.344), 2.34);
        assert_eq!(round_cents(2.346), 2.35);
        assert_eq!(round_cents(0.0), 0.0);
    }
}
