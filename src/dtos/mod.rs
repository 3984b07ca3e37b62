pub mod adsense;
pub mod advertisement;
pub mod affiliate;
pub mod article;
pub mod category;
pub mod contact;
pub mod dashboard;
pub mod page;
pub mod product;
pub mod search;
pub mod social_media;
pub mod sync;
pub mod testimonial;
pub mod user;
