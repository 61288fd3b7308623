//! Wind farm siting around existing turbines
//!
//! - [`propose`]: random expansion sites near existing farms, away from strikes
//! - [`audit`]: how exposed the existing turbines are

pub mod audit;
pub mod propose;

pub use audit::{Attraction, AuditReport, HazardZone, TurbineExposure, Verdict};
pub use propose::{ExpansionRing, ProposalRun, SiteProposal};
