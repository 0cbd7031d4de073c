pub mod edit_distance;
pub mod normalize;
pub mod profile;
pub mod ranking;

pub use normalize::normalize;
pub use profile::{ActivityRecord, Identity, ProfileRecord, within_hops};
pub use ranking::{MatchTier, SCORE_TIER_WEIGHT, rank};
