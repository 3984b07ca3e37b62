pub mod adsense;
pub mod advertisement;
pub mod affiliate;
pub mod api;
pub mod article;
pub mod category;
pub mod contact;
pub mod dashboard;
pub mod product;
pub mod public;
pub mod referral;
pub mod social_media;
pub mod sync;
pub mod testimonial;
pub mod user;
