pub mod adsense_config;
pub mod advertisement;
pub mod affiliate;
pub mod article;
pub mod category;
pub mod contact_message;
pub mod product;
pub mod social_media_link;
pub mod sync_info;
pub mod testimonial;
pub mod user;
