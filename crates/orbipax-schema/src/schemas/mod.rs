pub mod demographics;
pub mod diagnoses;
pub mod goals;
pub mod insurance;
pub mod legal;
pub mod medications;
pub mod providers;
pub mod referrals;
pub mod review;
pub mod welcome;
