//! Catalog row types mapped with diesel.

mod category;
mod image;
mod point;
mod site;

pub use category::{Category, NewCategory};
pub use image::{Image, NewImage};
pub use point::{NewPoint, Point};
pub use site::{NewSite, Site};
