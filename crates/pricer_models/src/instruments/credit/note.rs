//! Credit-linked note definition.

use num_traits::Float;
use pricer_core::types::time::Date;

use super::pricing::PaymentStream;
use crate::schedules::Schedule;

/// When collateral recovery value is paid out after a credit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecoveryTiming {
    /// Recovery proceeds settle at the default time.
    AtDefault,
    /// Recovery proceeds are held and paid at note maturity.
    AtMaturity,
}

/// Collateral bond backing a credit-linked note.
///
/// Modelled as a unit-redemption bond: periodic coupons over `schedule`
/// plus a redemption of 1 at the final schedule date. `recovery` is the
/// fraction of face value recovered if the collateral issuer itself
/// defaults.
#[derive(Debug, Clone)]
pub struct CollateralBond<T: Float> {
    coupon: T,
    recovery: T,
    schedule: Schedule,
}

impl<T: Float> CollateralBond<T> {
    /// Creates a collateral bond description.
    pub fn new(coupon: T, recovery: T, schedule: Schedule) -> Self {
        Self {
            coupon,
            recovery,
            schedule,
        }
    }

    /// Annual coupon rate.
    #[inline]
    pub fn coupon(&self) -> T {
        self.coupon
    }

    /// Recovery rate on collateral default.
    #[inline]
    pub fn recovery(&self) -> T {
        self.recovery
    }

    /// Coupon schedule.
    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

impl CollateralBond<f64> {
    /// The bond's cashflow stream anchored at `as_of`: coupons over the
    /// schedule plus the unit redemption at the final date.
    pub fn payment_stream(&self, as_of: Date) -> PaymentStream {
        PaymentStream::from_schedule(&self.schedule, as_of, self.coupon, 1.0)
    }
}

/// Credit-linked note.
///
/// The investor funds the notional, receives coupons, and bears the credit
/// risk of the linked derivative: on exhaustion of the reference
/// protection, the note redeems early at the collateral value net of the
/// contingent protection payment.
#[derive(Debug, Clone)]
pub struct CreditLinkedNote<T: Float> {
    notional: T,
    coupon: T,
    coupon_schedule: Schedule,
    recovery_timing: RecoveryTiming,
    collateral: Option<CollateralBond<T>>,
}

impl<T: Float> CreditLinkedNote<T> {
    /// Creates a new note.
    ///
    /// # Arguments
    ///
    /// * `notional` - funded notional
    /// * `coupon` - annual coupon rate paid to the investor
    /// * `coupon_schedule` - coupon payment schedule (its end date is the
    ///   note maturity)
    /// * `recovery_timing` - when recovery value settles after a credit event
    /// * `collateral` - optional collateral bond (absent means cash
    ///   collateral with no cashflow value in the contingent leg)
    pub fn new(
        notional: T,
        coupon: T,
        coupon_schedule: Schedule,
        recovery_timing: RecoveryTiming,
        collateral: Option<CollateralBond<T>>,
    ) -> Self {
        Self {
            notional,
            coupon,
            coupon_schedule,
            recovery_timing,
            collateral,
        }
    }

    /// Funded notional.
    #[inline]
    pub fn notional(&self) -> T {
        self.notional
    }

    /// Annual coupon rate.
    #[inline]
    pub fn coupon(&self) -> T {
        self.coupon
    }

    /// Coupon schedule.
    #[inline]
    pub fn coupon_schedule(&self) -> &Schedule {
        &self.coupon_schedule
    }

    /// Recovery timing flag.
    #[inline]
    pub fn recovery_timing(&self) -> RecoveryTiming {
        self.recovery_timing
    }

    /// Collateral bond, if any.
    #[inline]
    pub fn collateral(&self) -> Option<&CollateralBond<T>> {
        self.collateral.as_ref()
    }
}
