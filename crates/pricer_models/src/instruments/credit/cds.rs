//! Credit Default Swap definition.

use num_traits::Float;

use crate::schedules::Schedule;

/// Single-name credit default swap.
///
/// The protection leg pays `(1 - recovery) × notional` on default of the
/// reference entity; the premium leg pays `spread × notional × Δt` on each
/// schedule date while the entity survives.
///
/// # Example
///
/// ```
/// use pricer_models::instruments::credit::CreditDefaultSwap;
/// use pricer_models::schedules::{Frequency, ScheduleBuilder};
/// use pricer_core::types::time::Date;
///
/// let schedule = ScheduleBuilder::new()
///     .start(Date::from_ymd(2026, 3, 20).unwrap())
///     .end(Date::from_ymd(2031, 3, 20).unwrap())
///     .frequency(Frequency::Quarterly)
///     .build()
///     .unwrap();
///
/// let cds: CreditDefaultSwap<f64> =
///     CreditDefaultSwap::new("ACME Corp".to_string(), 1.0, 0.01, 0.4, schedule);
/// assert!((cds.loss_given_default() - 0.6).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CreditDefaultSwap<T: Float> {
    reference_entity: String,
    notional: T,
    spread: T,
    recovery_rate: T,
    schedule: Schedule,
}

impl<T: Float> CreditDefaultSwap<T> {
    /// Creates a new CDS.
    ///
    /// # Arguments
    ///
    /// * `reference_entity` - name of the reference obligor
    /// * `notional` - protected notional
    /// * `spread` - annual premium (e.g. `0.01` for 100bp)
    /// * `recovery_rate` - assumed recovery (e.g. `0.4`)
    /// * `schedule` - premium payment schedule
    pub fn new(
        reference_entity: String,
        notional: T,
        spread: T,
        recovery_rate: T,
        schedule: Schedule,
    ) -> Self {
        Self {
            reference_entity,
            notional,
            spread,
            recovery_rate,
            schedule,
        }
    }

    /// Reference entity name.
    #[inline]
    pub fn reference_entity(&self) -> &str {
        &self.reference_entity
    }

    /// Protected notional.
    #[inline]
    pub fn notional(&self) -> T {
        self.notional
    }

    /// Annual premium spread.
    #[inline]
    pub fn spread(&self) -> T {
        self.spread
    }

    /// Assumed recovery rate.
    #[inline]
    pub fn recovery_rate(&self) -> T {
        self.recovery_rate
    }

    /// Loss given default, `1 - recovery`.
    #[inline]
    pub fn loss_given_default(&self) -> T {
        T::one() - self.recovery_rate
    }

    /// Protection payment on default, `(1 - recovery) × notional`.
    #[inline]
    pub fn protection_payment(&self) -> T {
        self.loss_given_default() * self.notional
    }

    /// Premium payment schedule.
    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedules::{Frequency, ScheduleBuilder};
    use pricer_core::types::time::Date;

    fn test_cds() -> CreditDefaultSwap<f64> {
        let schedule = ScheduleBuilder::new()
            .start(Date::from_ymd(2026, 3, 20).unwrap())
            .end(Date::from_ymd(2031, 3, 20).unwrap())
            .frequency(Frequency::Quarterly)
            .build()
            .unwrap();
        CreditDefaultSwap::new("ACME Corp".to_string(), 10_000_000.0, 0.01, 0.4, schedule)
    }

    #[test]
    fn accessors() {
        let cds = test_cds();
        assert_eq!(cds.reference_entity(), "ACME Corp");
        assert_eq!(cds.notional(), 10_000_000.0);
        assert_eq!(cds.schedule().len(), 20);
    }

    #[test]
    fn protection_payment_uses_lgd() {
        let cds = test_cds();
        assert!((cds.protection_payment() - 6_000_000.0).abs() < 1e-6);
    }
}
