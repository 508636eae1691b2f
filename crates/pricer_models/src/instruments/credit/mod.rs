//! Credit instruments: single-name CDS and the credit-linked note.

mod cds;
mod note;
mod pricing;

pub use cds::CreditDefaultSwap;
pub use note::{CollateralBond, CreditLinkedNote, RecoveryTiming};
pub use pricing::{premium_leg_pv, protection_leg_pv, PaymentStream};
