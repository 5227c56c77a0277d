//! Database Models

pub mod account;
pub mod ad;
pub mod product;
pub mod vendor_application;

// Re-exports
pub use account::{
    Account, AccountCreate, AccountId, Order, OrderCreate, OrderItem, OrderItemCreate,
    ProfileUpdate,
};
pub use ad::{Ad, AdCreate, AdId};
pub use product::{PricePoint, Product, ProductCreate, ProductId, ProductUpdate, Review};
pub use vendor_application::{
    VendorApplication, VendorApplicationCreate, VendorApplicationId,
};
